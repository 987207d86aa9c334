//! Application state machine and event dispatcher.
//!
//! Key handlers never wait on the network. Each request is spawned inside the
//! current screen's [`ViewScope`] and its result comes back as a [`Msg`]
//! through [`App::drain`]; leaving a screen tears the scope down so late
//! answers for it are dropped.

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lifebridge_client::{
  ApiClient, Error, Result, SessionStore,
  services::{
    AppointmentService, AuthService, Collection, FeedbackService, MyAppointments, MyPrescriptions,
    PeopleService, PrescriptionService,
  },
  views::{
    Notice,
    appointment::AppointmentDetail,
    booking::BookingForm,
    feedback::FeedbackForm,
    login::{LoginView, MSG_EXPIRED},
    mine::MyRecords,
    prescribe::PrescriptionForm,
    profile::ProfileView,
    register::{self, RegisterForm},
    scope::{Tagged, ViewScope},
    table::CrudTable,
  },
};
use lifebridge_core::{
  model::{
    Appointment, AppointmentStatus, Feedback, LoginResponse, Person, PersonKind, Prescription,
  },
  role::Role,
  validate::FormMode,
};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::{
  fields::{self, Edit},
  route::{self, Route},
};

// ─── Services ─────────────────────────────────────────────────────────────────

/// Every service the screens talk to, sharing one client and one session.
#[derive(Clone)]
pub struct Services {
  pub api:           ApiClient,
  pub session:       SessionStore,
  pub auth:          AuthService,
  pub appointments:  AppointmentService,
  pub prescriptions: PrescriptionService,
  pub feedback:      FeedbackService,
}

impl Services {
  pub fn new(api: ApiClient, session: SessionStore) -> Self {
    Self {
      auth: AuthService::new(api.clone(), session.clone()),
      appointments: AppointmentService::new(api.clone()),
      prescriptions: PrescriptionService::new(api.clone()),
      feedback: FeedbackService::new(api.clone()),
      api,
      session,
    }
  }

  pub fn people(&self, kind: PersonKind) -> PeopleService { PeopleService::new(self.api.clone(), kind) }
}

// ─── Messages ─────────────────────────────────────────────────────────────────

/// A finished request.
pub enum Msg {
  Login(Result<LoginResponse>),
  Registered(Result<()>),
  Profile(Result<Person>),
  /// The signed-in user's own record, used to prefill other forms.
  OwnRecord(Result<Person>),
  People(Result<Vec<Person>>),
  Appointments(Result<Vec<Appointment>>),
  Appointment(Result<Appointment>),
  Prescriptions(Result<Vec<Prescription>>),
  Feedbacks(Result<Vec<Feedback>>),
  DoctorNames(Result<Vec<String>>),
  Mutation(Result<()>),
  ProfileSaved(Result<()>),
  StatusSaved(Result<()>),
  FeedbackSent(Result<()>),
  Booked(Result<Appointment>),
  Issued(Result<()>),
}

impl Msg {
  fn error(&self) -> Option<&Error> {
    match self {
      Msg::Login(r) => r.as_ref().err(),
      Msg::Profile(r) | Msg::OwnRecord(r) => r.as_ref().err(),
      Msg::People(r) => r.as_ref().err(),
      Msg::Appointments(r) => r.as_ref().err(),
      Msg::Appointment(r) | Msg::Booked(r) => r.as_ref().err(),
      Msg::Prescriptions(r) => r.as_ref().err(),
      Msg::Feedbacks(r) => r.as_ref().err(),
      Msg::DoctorNames(r) => r.as_ref().err(),
      Msg::Registered(r)
      | Msg::Mutation(r)
      | Msg::ProfileSaved(r)
      | Msg::StatusSaved(r)
      | Msg::FeedbackSent(r)
      | Msg::Issued(r) => r.as_ref().err(),
    }
  }
}

// ─── Screen ───────────────────────────────────────────────────────────────────

pub enum Screen {
  Home,
  Login(LoginView),
  Register(RegisterForm),
  Profile(ProfileView),
  People(PersonKind, CrudTable<PeopleService>),
  Appointments(CrudTable<AppointmentService>),
  Feedbacks(CrudTable<FeedbackService>),
  Schedule(MyRecords<MyAppointments>),
  Bookings(MyRecords<MyAppointments>),
  Prescriptions(MyRecords<MyPrescriptions>),
  Appointment(AppointmentDetail),
  Prescribe(PrescriptionForm),
  Booking(BookingForm),
  Feedback(FeedbackForm),
  NotFound(String),
}

/// Which part of the prescription form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxFocus {
  Appointment,
  Medicine(usize),
  Instructions,
}

// ─── App ──────────────────────────────────────────────────────────────────────

pub struct App {
  pub route:         Route,
  pub screen:        Screen,
  /// Role of the signed-in user, if any.
  pub role:          Option<Role>,
  /// Focused field of whichever form is showing.
  pub focus:         usize,
  pub rx_focus:      RxFocus,
  /// Whether keystrokes go into a table's search box.
  pub search_active: bool,
  /// The `Ctrl-G` path prompt.
  pub prompt:        Option<String>,
  /// Notice that outlives a screen change, such as a forced logout.
  pub banner:        Option<Notice>,
  pub services:      Services,
  scope:             ViewScope,
  tx:                UnboundedSender<Tagged<Msg>>,
  rx:                UnboundedReceiver<Tagged<Msg>>,
}

impl App {
  pub fn new(services: Services) -> Self {
    let (tx, rx) = unbounded_channel();
    Self {
      route: Route::Home,
      screen: Screen::Home,
      role: None,
      focus: 0,
      rx_focus: RxFocus::Appointment,
      search_active: false,
      prompt: None,
      banner: None,
      services,
      scope: ViewScope::new(),
      tx,
      rx,
    }
  }

  /// Resume a stored session if it is still valid, otherwise show login.
  pub fn start(&mut self) {
    let session = &self.services.session;
    match session.current(Utc::now()).map(|s| s.role()) {
      Ok(Some(role)) => {
        tracing::info!(%role, "resuming stored session");
        self.role = Some(role);
        self.navigate(Route::Profile(role));
      }
      Err(Error::NotAuthenticated) => self.navigate(Route::Home),
      _ => {
        tracing::info!("stored session is expired or unreadable");
        if let Err(e) = session.clear() {
          tracing::warn!(error = %e, "could not clear stored session");
        }
        self.navigate(Route::Home);
      }
    }
  }

  /// Tabs for the header: the signed-in role's menu or the public pages.
  pub fn menu(&self) -> Vec<Route> {
    match self.role {
      Some(role) => route::menu(role),
      None => vec![Route::Home, Route::Login, Route::Register],
    }
  }

  // ── Navigation ────────────────────────────────────────────────────────────

  pub fn navigate(&mut self, route: Route) {
    let route = self.guard(route);
    tracing::debug!(path = %route.full_path(), "navigate");

    self.scope.teardown();
    self.focus = 0;
    self.rx_focus = RxFocus::Appointment;
    self.search_active = false;

    let subject = self.services.session.subject_email();
    self.screen = match &route {
      Route::Home => Screen::Home,
      Route::Login => Screen::Login(LoginView::new()),
      Route::Register => Screen::Register(RegisterForm::new(Person::default())),
      Route::Profile(role) => Screen::Profile(ProfileView::new(PersonKind::for_role(*role), subject)),
      Route::Manage(kind) => Screen::People(*kind, CrudTable::new()),
      Route::AllAppointments => Screen::Appointments(CrudTable::new()),
      Route::AllFeedback => Screen::Feedbacks(CrudTable::new()),
      Route::DoctorAppointments => {
        Screen::Schedule(MyRecords::new(subject, "No appointments scheduled."))
      }
      Route::MyAppointments => Screen::Bookings(MyRecords::new(subject, "You have no appointments yet.")),
      Route::MyPrescriptions => {
        Screen::Prescriptions(MyRecords::new(subject, "No prescriptions have been issued to you."))
      }
      Route::DoctorAppointment(id) => Screen::Appointment(AppointmentDetail::new(*id)),
      Route::PrescribeFor(id) => Screen::Prescribe(PrescriptionForm::new(Some(*id))),
      Route::NewPrescription => Screen::Prescribe(PrescriptionForm::new(None)),
      Route::BookAppointment => Screen::Booking(BookingForm::new(String::new())),
      Route::GiveFeedback => Screen::Feedback(FeedbackForm::new()),
      Route::NotFound(path) => Screen::NotFound(path.clone()),
    };
    self.route = route;
    self.reload();
  }

  /// Redirect routes the current session may not see.
  fn guard(&mut self, route: Route) -> Route {
    if route.is_public() {
      return route;
    }
    if let Err(e) = self.services.session.current(Utc::now()) {
      tracing::info!(error = %e, "route needs a live session");
      self.role = None;
      self.banner = Some(Notice::error(MSG_EXPIRED));
      return Route::Login;
    }
    match (route.owner(), self.role) {
      (Some(owner), Some(role)) if owner != role => {
        self.banner = Some(Notice::error("You do not have access to that page."));
        Route::Profile(role)
      }
      _ => route,
    }
  }

  /// (Re)issue the requests the current screen is built from.
  pub fn reload(&mut self) {
    let s = self.services.clone();
    match &mut self.screen {
      Screen::Home | Screen::Login(_) | Screen::Register(_) | Screen::NotFound(_) => {}
      Screen::Profile(view) => {
        view.begin_load();
        let people = s.people(view.kind());
        self.scope.spawn(&self.tx, async move { Msg::Profile(people.fetch_mine().await) });
      }
      Screen::People(kind, table) => {
        table.begin_load();
        let people = s.people(*kind);
        self.scope.spawn(&self.tx, async move { Msg::People(people.fetch_all().await) });
      }
      Screen::Appointments(table) => {
        table.begin_load();
        self.scope.spawn(&self.tx, async move { Msg::Appointments(s.appointments.fetch_all().await) });
      }
      Screen::Feedbacks(table) => {
        table.begin_load();
        self.scope.spawn(&self.tx, async move { Msg::Feedbacks(s.feedback.fetch_all().await) });
      }
      Screen::Schedule(list) => {
        list.begin_load();
        let mine = MyAppointments::new(s.appointments.clone(), Role::Doctor);
        self.scope.spawn(&self.tx, async move { Msg::Appointments(mine.fetch_all().await) });
      }
      Screen::Bookings(list) => {
        list.begin_load();
        let mine = MyAppointments::new(s.appointments.clone(), Role::Patient);
        self.scope.spawn(&self.tx, async move { Msg::Appointments(mine.fetch_all().await) });
      }
      Screen::Prescriptions(list) => {
        list.begin_load();
        let mine = MyPrescriptions(s.prescriptions.clone());
        self.scope.spawn(&self.tx, async move { Msg::Prescriptions(mine.fetch_all().await) });
      }
      Screen::Appointment(view) => {
        view.begin_load();
        let id = view.id();
        self.scope.spawn(&self.tx, async move { Msg::Appointment(s.appointments.get(id).await) });
      }
      Screen::Prescribe(form) => {
        form.begin_load();
        let appointments = s.appointments.clone();
        self.scope.spawn(&self.tx, async move {
          Msg::Appointments(appointments.fetch_mine(Role::Doctor).await)
        });
        let doctors = s.people(PersonKind::Doctors);
        self.scope.spawn(&self.tx, async move { Msg::OwnRecord(doctors.fetch_mine().await) });
      }
      Screen::Booking(_) | Screen::Feedback(_) => {
        let doctors = s.people(PersonKind::Doctors);
        self.scope.spawn(&self.tx, async move { Msg::DoctorNames(doctors.doctor_names().await) });
        let patients = s.people(PersonKind::Patients);
        self.scope.spawn(&self.tx, async move { Msg::OwnRecord(patients.fetch_mine().await) });
      }
    }
  }

  fn logout(&mut self, notice: Option<Notice>) {
    if let Err(e) = self.services.auth.logout() {
      tracing::warn!(error = %e, "could not clear session");
    }
    self.role = None;
    self.navigate(Route::Login);
    if let (Screen::Login(view), Some(notice)) = (&mut self.screen, notice) {
      view.set_notice(notice);
    }
  }

  // ── Results ───────────────────────────────────────────────────────────────

  /// Apply every finished request that belongs to the current screen.
  pub fn drain(&mut self) {
    while let Ok(tagged) = self.rx.try_recv() {
      if !self.scope.accepts(&tagged) {
        tracing::trace!(generation = tagged.generation, "dropping stale result");
        continue;
      }
      self.apply(tagged.message);
    }
  }

  fn apply(&mut self, msg: Msg) {
    let auth_lost = !matches!(msg, Msg::Login(_)) && msg.error().is_some_and(Error::is_auth);
    if auth_lost {
      tracing::info!("authorization lost, returning to login");
      let message = msg.error().map(Error::user_message).unwrap_or_default();
      self.logout(Some(Notice::error(message)));
      return;
    }

    let mut refetch = false;
    let mut next = None;
    let s = self.services.clone();

    match (&mut self.screen, msg) {
      (Screen::Login(view), Msg::Login(result)) => {
        if let Some(role) = view.finish_submit(result, &s.session, Utc::now()) {
          self.role = Some(role);
          self.banner = None;
          next = Some(Route::Profile(role));
        }
      }
      (Screen::Register(form), Msg::Registered(result)) => {
        register::finish_register(form, result);
      }

      (Screen::Profile(view), Msg::Profile(result)) => view.finish_load(result),
      (Screen::Profile(view), Msg::ProfileSaved(result)) => refetch = view.finish_save(result),

      (Screen::People(_, table), Msg::People(result)) => table.finish_load(result),
      (Screen::People(_, table), Msg::Mutation(result)) => refetch = table.finish_mutation(result),
      (Screen::Appointments(table), Msg::Appointments(result)) => table.finish_load(result),
      (Screen::Appointments(table), Msg::Mutation(result)) => {
        refetch = table.finish_mutation(result)
      }
      (Screen::Feedbacks(table), Msg::Feedbacks(result)) => table.finish_load(result),

      (Screen::Schedule(list) | Screen::Bookings(list), Msg::Appointments(result)) => {
        list.finish_load(result)
      }
      (Screen::Prescriptions(list), Msg::Prescriptions(result)) => list.finish_load(result),

      (Screen::Appointment(view), Msg::Appointment(result)) => view.finish_load(result),
      (Screen::Appointment(view), Msg::StatusSaved(result)) => refetch = view.finish_status(result),

      (Screen::Prescribe(form), Msg::Appointments(result)) => form.finish_load(result),
      (Screen::Prescribe(form), Msg::OwnRecord(Ok(me))) => form.set_doctor_name(me.full_name()),
      (Screen::Prescribe(form), Msg::Issued(result)) => {
        form.finish_submit(result);
      }

      (Screen::Booking(form), Msg::DoctorNames(Ok(names))) => form.set_doctors(names),
      (Screen::Booking(form), Msg::OwnRecord(Ok(me))) => form.set_patient_name(me.full_name()),
      (Screen::Booking(form), Msg::Booked(result)) => {
        form.finish_submit(result);
      }

      (Screen::Feedback(form), Msg::DoctorNames(Ok(names))) => form.set_doctors(names),
      (Screen::Feedback(form), Msg::OwnRecord(Ok(me))) => {
        let value = &mut form.form.value;
        if value.name.is_empty() {
          value.name = me.full_name();
          value.email = me.email;
          value.phone = me.phone_number;
        }
      }
      (Screen::Feedback(form), Msg::FeedbackSent(result)) => {
        form.finish_submit(result);
      }

      (_, msg) => {
        if let Some(e) = msg.error() {
          tracing::warn!(error = %e, "background request failed");
          self.banner = Some(Notice::error(e.user_message()));
        }
      }
    }

    if let Some(route) = next {
      self.navigate(route);
    } else if refetch {
      self.reload();
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global chords work on every screen.
    if ctrl {
      match key.code {
        KeyCode::Char('c') => return false,
        KeyCode::Char('g') => {
          self.prompt = Some(String::new());
          return true;
        }
        KeyCode::Char('l') if self.role.is_some() => {
          self.logout(Some(Notice::success("You have been logged out.")));
          return true;
        }
        _ => {}
      }
    }

    if let Some(prompt) = &mut self.prompt {
      match key.code {
        KeyCode::Esc => self.prompt = None,
        KeyCode::Enter => {
          let path = std::mem::take(prompt);
          self.prompt = None;
          self.navigate(Route::parse(&path));
        }
        _ => {
          fields::edit_text(prompt, key);
        }
      }
      return true;
    }

    if let KeyCode::F(n) = key.code {
      if let Some(route) = self.menu().into_iter().nth(usize::from(n).saturating_sub(1)) {
        self.navigate(route);
      }
      return true;
    }

    if key.code == KeyCode::Esc && self.banner.is_some() && !self.is_editing() {
      self.banner = None;
      return true;
    }

    match self.screen {
      Screen::Home => self.home_key(key),
      Screen::Login(_) | Screen::Register(_) | Screen::Booking(_) | Screen::Feedback(_) => {
        self.form_key(key);
        true
      }
      Screen::Profile(_) => self.profile_key(key),
      Screen::People(..) | Screen::Appointments(_) | Screen::Feedbacks(_) => self.table_key(key),
      Screen::Schedule(_) | Screen::Bookings(_) | Screen::Prescriptions(_) => self.records_key(key),
      Screen::Appointment(_) => self.appointment_key(key),
      Screen::Prescribe(_) => {
        self.prescribe_key(key);
        true
      }
      Screen::NotFound(_) => self.not_found_key(key),
    }
  }

  /// Whether the focused screen is capturing text.
  pub fn is_editing(&self) -> bool {
    self.search_active
      || match &self.screen {
        Screen::Login(_)
        | Screen::Register(_)
        | Screen::Booking(_)
        | Screen::Feedback(_)
        | Screen::Prescribe(_) => true,
        Screen::Profile(view) => view.is_editing(),
        Screen::People(_, t) => t.modal().is_some(),
        Screen::Appointments(t) => t.modal().is_some(),
        _ => false,
      }
  }

  fn home_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Enter | KeyCode::Char('l') => self.navigate(Route::Login),
      KeyCode::Char('r') => self.navigate(Route::Register),
      _ => {}
    }
    true
  }

  fn not_found_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Enter | KeyCode::Esc => {
        let home = self.role.map(Route::Profile).unwrap_or(Route::Home);
        self.navigate(home);
      }
      _ => {}
    }
    true
  }

  /// Login, registration, booking and feedback: single-form screens.
  fn form_key(&mut self, key: KeyEvent) {
    let s = self.services.clone();
    match &mut self.screen {
      Screen::Login(view) => match fields::edit(view, &fields::LOGIN, &mut self.focus, key) {
        Edit::Submit => {
          if let Some(request) = view.begin_submit() {
            self
              .scope
              .spawn(&self.tx, async move { Msg::Login(s.auth.login(&request).await) });
          }
        }
        Edit::Cancel => self.navigate(Route::Home),
        _ => {}
      },
      Screen::Register(form) => {
        let layout = fields::person(PersonKind::Patients, FormMode::Add);
        match fields::edit(&mut form.value, &layout, &mut self.focus, key) {
          Edit::Submit => {
            if let Some(person) = register::begin_register(form) {
              let patients = s.people(PersonKind::Patients);
              self.scope.spawn(&self.tx, async move {
                Msg::Registered(patients.register(&person).await)
              });
            }
          }
          Edit::Cancel => self.navigate(Route::Home),
          _ => {}
        }
      }
      Screen::Booking(form) => {
        match fields::edit(&mut form.form.value, &fields::BOOKING, &mut self.focus, key) {
          Edit::Submit => {
            if let Some(request) = form.begin_submit() {
              self.scope.spawn(&self.tx, async move {
                Msg::Booked(s.appointments.book(&request).await)
              });
            }
          }
          Edit::Cycle { forward, .. } => form.cycle_doctor(forward),
          _ => {}
        }
      }
      Screen::Feedback(form) => {
        match fields::edit(&mut form.form.value, &fields::FEEDBACK, &mut self.focus, key) {
          Edit::Submit => {
            if let Some(feedback) = form.begin_submit() {
              self.scope.spawn(&self.tx, async move {
                Msg::FeedbackSent(s.feedback.submit(&feedback).await)
              });
            }
          }
          Edit::Cycle { key: "rating", forward } => form.nudge_rating(forward),
          Edit::Cycle { forward, .. } => form.cycle_doctor(forward),
          _ => {}
        }
      }
      _ => {}
    }
  }

  fn profile_key(&mut self, key: KeyEvent) -> bool {
    let Screen::Profile(view) = &mut self.screen else {
      return true;
    };

    if view.is_editing() {
      let layout = fields::person(view.kind(), FormMode::Edit);
      let Some(draft) = view.draft_mut() else {
        return true;
      };
      match fields::edit(draft, &layout, &mut self.focus, key) {
        Edit::Submit => {
          if let Some((email, body)) = view.begin_save() {
            let people = self.services.people(view.kind());
            self.scope.spawn(&self.tx, async move {
              Msg::ProfileSaved(people.update(&email, &body).await)
            });
          }
        }
        Edit::Cancel => view.cancel_edit(),
        _ => {}
      }
      return true;
    }

    match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Char('e') => {
        self.focus = 0;
        view.start_edit();
      }
      KeyCode::Char('r') => self.reload(),
      KeyCode::Esc => view.dismiss_notice(),
      _ => {}
    }
    true
  }

  fn table_key(&mut self, key: KeyEvent) -> bool {
    match self.screen {
      Screen::People(kind, _) => {
        let service = self.services.people(kind);
        crud_key(self, key, service, Person::default(), |mode| fields::person(kind, mode))
      }
      Screen::Appointments(_) => {
        let service = self.services.appointments.clone();
        crud_key(self, key, service, Appointment::default(), fields::appointment)
      }
      Screen::Feedbacks(_) => self.feedback_list_key(key),
      _ => true,
    }
  }

  /// Feedback is read-only for admins: no add, edit or delete.
  fn feedback_list_key(&mut self, key: KeyEvent) -> bool {
    let Screen::Feedbacks(table) = &mut self.screen else {
      return true;
    };
    if self.search_active {
      search_key(&mut self.search_active, table, key);
      return true;
    }
    if let Some(cont) = list_key(&mut self.search_active, table, key) {
      return cont;
    }
    match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Char('r') => self.reload(),
      _ => {}
    }
    true
  }

  fn records_key(&mut self, key: KeyEvent) -> bool {
    let open = match &mut self.screen {
      Screen::Schedule(list) | Screen::Bookings(list) => {
        let table = list.rows_mut();
        if self.search_active {
          search_key(&mut self.search_active, table, key);
          return true;
        }
        if let Some(cont) = list_key(&mut self.search_active, table, key) {
          return cont;
        }
        list.selected().map(|a| a.id)
      }
      Screen::Prescriptions(list) => {
        let table = list.rows_mut();
        if self.search_active {
          search_key(&mut self.search_active, table, key);
          return true;
        }
        if let Some(cont) = list_key(&mut self.search_active, table, key) {
          return cont;
        }
        None
      }
      _ => return true,
    };

    match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Char('r') => self.reload(),
      KeyCode::Enter if self.role == Some(Role::Doctor) => {
        if let Some(id) = open {
          self.navigate(Route::DoctorAppointment(id));
        }
      }
      KeyCode::Char('w') if self.role == Some(Role::Doctor) => {
        if let Some(id) = open {
          self.navigate(Route::PrescribeFor(id));
        }
      }
      _ => {}
    }
    true
  }

  fn appointment_key(&mut self, key: KeyEvent) -> bool {
    let Screen::Appointment(view) = &mut self.screen else {
      return true;
    };
    let status = match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Esc | KeyCode::Backspace => {
        self.navigate(Route::DoctorAppointments);
        return true;
      }
      KeyCode::Char('w') => {
        let id = view.id();
        self.navigate(Route::PrescribeFor(id));
        return true;
      }
      KeyCode::Char('r') => {
        self.reload();
        return true;
      }
      KeyCode::Char('p') => AppointmentStatus::Pending,
      KeyCode::Char('s') => AppointmentStatus::Scheduled,
      KeyCode::Char('c') => AppointmentStatus::Completed,
      KeyCode::Char('x') => AppointmentStatus::Cancelled,
      _ => return true,
    };
    if let Some((id, status)) = view.begin_status(status) {
      let appointments = self.services.appointments.clone();
      self.scope.spawn(&self.tx, async move {
        Msg::StatusSaved(appointments.update_status(id, status).await)
      });
    }
    true
  }

  fn prescribe_key(&mut self, key: KeyEvent) {
    let Screen::Prescribe(form) = &mut self.screen else {
      return;
    };
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let lines = form.medicines.len();

    match (key.code, self.rx_focus) {
      (KeyCode::Enter, _) => {
        if let Some(prescription) = form.begin_submit() {
          let prescriptions = self.services.prescriptions.clone();
          self.scope.spawn(&self.tx, async move {
            Msg::Issued(prescriptions.issue(&prescription).await)
          });
        }
      }
      (KeyCode::Esc, _) => self.navigate(Route::DoctorAppointments),
      (KeyCode::Char('n'), _) if ctrl => {
        form.add_medicine();
        self.rx_focus = RxFocus::Medicine(form.medicines.len() - 1);
      }
      (KeyCode::Char('x'), RxFocus::Medicine(i)) if ctrl => {
        form.remove_medicine(i);
        self.rx_focus = RxFocus::Medicine(i.min(form.medicines.len() - 1));
      }
      (KeyCode::Down | KeyCode::Tab, focus) => {
        self.rx_focus = match focus {
          RxFocus::Appointment => RxFocus::Medicine(0),
          RxFocus::Medicine(i) if i + 1 < lines => RxFocus::Medicine(i + 1),
          RxFocus::Medicine(_) => RxFocus::Instructions,
          RxFocus::Instructions => RxFocus::Appointment,
        }
      }
      (KeyCode::Up | KeyCode::BackTab, focus) => {
        self.rx_focus = match focus {
          RxFocus::Appointment => RxFocus::Instructions,
          RxFocus::Medicine(0) => RxFocus::Appointment,
          RxFocus::Medicine(i) => RxFocus::Medicine(i - 1),
          RxFocus::Instructions => RxFocus::Medicine(lines.saturating_sub(1)),
        }
      }
      (KeyCode::Left | KeyCode::Right, RxFocus::Appointment) => {
        form.cycle_appointment(key.code == KeyCode::Right)
      }
      (_, RxFocus::Medicine(i)) => {
        if let Some(line) = form.medicines.get_mut(i) {
          fields::edit_text(line, key);
        }
      }
      (_, RxFocus::Instructions) => {
        fields::edit_text(&mut form.instructions, key);
      }
      _ => {}
    }
  }
}

// ─── Shared table keys ────────────────────────────────────────────────────────

/// Search-box input. Esc clears, Enter keeps the filter.
fn search_key<S: Collection>(active: &mut bool, table: &mut CrudTable<S>, key: KeyEvent) {
  match key.code {
    KeyCode::Esc => {
      table.set_search("");
      *active = false;
    }
    KeyCode::Enter => *active = false,
    KeyCode::Backspace => table.pop_search(),
    KeyCode::Char(c) => table.push_search(c),
    _ => {}
  }
}

/// Cursor, paging and search keys common to every list. Returns `None` when
/// the key was not one of them.
fn list_key<S: Collection>(active: &mut bool, table: &mut CrudTable<S>, key: KeyEvent) -> Option<bool> {
  match key.code {
    KeyCode::Down | KeyCode::Char('j') => table.move_cursor(1),
    KeyCode::Up | KeyCode::Char('k') => table.move_cursor(-1),
    KeyCode::Right | KeyCode::PageDown | KeyCode::Char(']') => table.next_page(),
    KeyCode::Left | KeyCode::PageUp | KeyCode::Char('[') => table.prev_page(),
    KeyCode::Char('/') => *active = true,
    KeyCode::Char('s') => table.cycle_page_size(),
    KeyCode::Esc => table.dismiss_notice(),
    _ => return None,
  }
  Some(true)
}

/// Which CRUD table is showing, so [`crud_key`] can reach it through `app`.
trait TableScreen: lifebridge_client::services::CrudService + Clone + 'static {
  fn table(screen: &mut Screen) -> Option<&mut CrudTable<Self>>;
}

impl TableScreen for PeopleService {
  fn table(screen: &mut Screen) -> Option<&mut CrudTable<Self>> {
    match screen {
      Screen::People(_, t) => Some(t),
      _ => None,
    }
  }
}

impl TableScreen for AppointmentService {
  fn table(screen: &mut Screen) -> Option<&mut CrudTable<Self>> {
    match screen {
      Screen::Appointments(t) => Some(t),
      _ => None,
    }
  }
}

/// Keys for an editable table: list keys plus add, edit, delete and the
/// modal form.
fn crud_key<S>(
  app: &mut App,
  key: KeyEvent,
  service: S,
  blank: S::Item,
  layout: impl Fn(FormMode) -> Vec<fields::FieldSpec>,
) -> bool
where
  S: TableScreen,
  S::Item: fields::Editable,
{
  let Some(table) = S::table(&mut app.screen) else {
    return true;
  };

  // Delete confirmation.
  if table.pending_delete().is_some() {
    match key.code {
      KeyCode::Char('y') | KeyCode::Enter => {
        if let Some(mutation) = table.begin_delete() {
          app.scope.spawn(&app.tx, async move { Msg::Mutation(mutation.run(&service).await) });
        }
      }
      KeyCode::Char('n') | KeyCode::Esc => table.cancel_delete(),
      _ => {}
    }
    return true;
  }

  // Add/edit modal.
  if let Some(modal) = table.modal_mut() {
    let layout = layout(modal.mode);
    match fields::edit(&mut modal.form, &layout, &mut app.focus, key) {
      Edit::Submit => {
        if let Some(mutation) = table.begin_submit(&service) {
          app.scope.spawn(&app.tx, async move { Msg::Mutation(mutation.run(&service).await) });
        }
      }
      Edit::Cancel => table.close_modal(),
      _ => {}
    }
    return true;
  }

  if app.search_active {
    search_key(&mut app.search_active, table, key);
    return true;
  }
  if let Some(cont) = list_key(&mut app.search_active, table, key) {
    return cont;
  }

  match key.code {
    KeyCode::Char('q') => return false,
    KeyCode::Char('a') => {
      app.focus = 0;
      table.open_add(blank);
    }
    KeyCode::Char('e') | KeyCode::Enter => {
      app.focus = 0;
      table.open_edit();
    }
    KeyCode::Char('d') | KeyCode::Delete => {
      table.request_delete();
    }
    KeyCode::Char('r') => app.reload(),
    _ => {}
  }
  true
}

#[cfg(test)]
mod tests {
  use super::*;

  fn app() -> App {
    let api = ApiClient::new(&Default::default(), lifebridge_client::http::NoAuth).unwrap();
    App::new(Services::new(api, SessionStore::in_memory()))
  }

  fn press(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  #[tokio::test]
  async fn protected_routes_require_a_session() {
    let mut app = app();
    app.navigate(Route::DoctorAppointments);
    assert_eq!(app.route, Route::Login);
    assert_eq!(app.banner.as_ref().map(|n| n.message.as_str()), Some(MSG_EXPIRED));
  }

  #[tokio::test]
  async fn go_to_prompt_parses_paths() {
    let mut app = app();
    app.handle_key(KeyEvent::new(KeyCode::Char('g'), KeyModifiers::CONTROL));
    for c in "/nowhere".chars() {
      app.handle_key(press(KeyCode::Char(c)));
    }
    app.handle_key(press(KeyCode::Enter));
    assert_eq!(app.route, Route::NotFound("/nowhere".into()));
    assert!(matches!(app.screen, Screen::NotFound(_)));
  }

  #[tokio::test]
  async fn stale_results_are_ignored_after_navigation() {
    let mut app = app();
    app.navigate(Route::Login);
    let stale = Tagged { generation: app.scope.generation(), message: Msg::Registered(Ok(())) };
    app.navigate(Route::Register);
    app.tx.send(stale).unwrap();
    app.drain();
    let Screen::Register(form) = &app.screen else {
      panic!("expected the register screen");
    };
    assert!(form.notice().is_none());
  }

  #[tokio::test]
  async fn auth_failures_log_the_user_out() {
    let mut app = app();
    app.navigate(Route::Register);
    app.role = Some(Role::Admin);
    app.apply(Msg::People(Err(Error::Unauthorized { status: 401, message: String::new() })));
    assert_eq!(app.route, Route::Login);
    assert_eq!(app.role, None);
    let Screen::Login(view) = &app.screen else {
      panic!("expected the login screen");
    };
    assert_eq!(view.notice().map(|n| n.message.as_str()), Some("Please log in again."));
  }
}
