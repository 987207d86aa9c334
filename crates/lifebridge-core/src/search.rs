//! Client-side search over loaded collections.

use crate::model::{Appointment, Feedback, Person, Prescription};

/// A record that can be narrowed by a free-text search box.
pub trait Searchable {
  /// The fields a search term is matched against.
  fn search_fields(&self) -> Vec<&str>;

  /// Case-insensitive substring match of `needle` against any search field.
  /// An empty (or all-whitespace) needle matches everything.
  fn matches(&self, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
      return true;
    }
    self
      .search_fields()
      .into_iter()
      .any(|f| f.to_lowercase().contains(&needle))
  }
}

impl Searchable for Person {
  fn search_fields(&self) -> Vec<&str> {
    let mut fields = vec![
      self.first_name.as_str(),
      self.last_name.as_str(),
      self.email.as_str(),
      self.phone_number.as_str(),
    ];
    if let Some(s) = &self.specialization {
      fields.push(s.as_str());
    }
    fields
  }
}

impl Searchable for Appointment {
  fn search_fields(&self) -> Vec<&str> {
    vec![
      self.patient_name.as_str(),
      self.patient_email.as_str(),
      self.doctor_name.as_str(),
      self.status.as_ref(),
    ]
  }
}

impl Searchable for Prescription {
  fn search_fields(&self) -> Vec<&str> {
    vec![
      self.patient_name.as_str(),
      self.patient_email.as_str(),
      self.doctor_name.as_str(),
    ]
  }
}

impl Searchable for Feedback {
  fn search_fields(&self) -> Vec<&str> { vec![self.name.as_str(), self.email.as_str(), self.doctor.as_str()] }
}

/// Filter `items` down to those matching `needle`, preserving order.
pub fn filter<'a, T: Searchable>(items: &'a [T], needle: &str) -> Vec<&'a T> {
  items.iter().filter(|i| i.matches(needle)).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn doctor(first: &str, last: &str, email: &str, spec: &str) -> Person {
    Person {
      first_name: first.into(),
      last_name: last.into(),
      email: email.into(),
      specialization: Some(spec.into()),
      ..Person::default()
    }
  }

  #[test]
  fn matches_any_field_case_insensitively() {
    let rows = vec![
      doctor("Gregory", "House", "house@pp.org", "Diagnostics"),
      doctor("Meredith", "Grey", "grey@sg.org", "General Medicine"),
      doctor("John", "Dorian", "jd@sacred.org", "Cardiology"),
    ];
    assert_eq!(filter(&rows, "HOUSE").len(), 1);
    assert_eq!(filter(&rows, "cardio")[0].last_name, "Dorian");
    assert_eq!(filter(&rows, ".org").len(), 3);
    assert_eq!(filter(&rows, "  ").len(), 3);
    assert!(filter(&rows, "zzz").is_empty());
  }

  #[test]
  fn patients_are_found_by_phone_number() {
    let patient = Person {
      first_name: "Ada".into(),
      email: "ada@example.com".into(),
      phone_number: "9876543210".into(),
      ..Person::default()
    };
    let rows = [patient];
    assert_eq!(filter(&rows, "98765").len(), 1);
    assert!(filter(&rows, "12345").is_empty());
  }
}
