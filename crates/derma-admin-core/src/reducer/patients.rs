//! Patient reducer rules.

use chrono::{DateTime, Utc};

use super::Editable;
use crate::models::{Patient, PatientInput};

impl Editable for Patient {
    type Input = PatientInput;

    fn create(id: String, input: PatientInput, now: DateTime<Utc>) -> Self {
        Patient::new(id, input, now)
    }

    fn edit(&self, input: PatientInput, now: DateTime<Utc>) -> Self {
        Patient {
            id: self.id.clone(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            date_of_birth: input.date_of_birth,
            gender: input.gender,
            medical_history: input.medical_history,
            created_at: self.created_at,
            // A clock behind the creation stamp must not break created_at <= updated_at
            updated_at: now.max(self.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use crate::reducer::{create, update};
    use crate::store::seed;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn input() -> PatientInput {
        PatientInput {
            name: "Lucía Torres".into(),
            email: "lucia.torres@email.com".into(),
            phone: "+34 667 890 123".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 6, 2).unwrap(),
            gender: Gender::Other,
            medical_history: Some("Dermatitis atópica.".into()),
        }
    }

    #[test]
    fn test_create_stamps_both_timestamps() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 10, 30, 0).unwrap();
        let next = create(&seed::patients(), input(), now);
        let created = next.iter().last().unwrap();
        assert_eq!(created.created_at, now);
        assert_eq!(created.updated_at, now);
        assert_eq!(created.to_input(), input());
    }

    #[test]
    fn test_update_preserves_id_and_created_at() {
        let patients = seed::patients();
        let original = patients.get("4").unwrap().clone();
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 10, 30, 0).unwrap();

        let next = update(&patients, "4", input(), now);
        let edited = next.get("4").unwrap();

        assert_eq!(edited.id, "4");
        assert_eq!(edited.created_at, original.created_at);
        assert_eq!(edited.updated_at, now);
        assert_eq!(edited.to_input(), input());
        assert_eq!(next.len(), patients.len());
    }

    #[test]
    fn test_update_with_stale_clock_keeps_ordering() {
        let patients = seed::patients();
        let created_at = patients.get("3").unwrap().created_at;
        let stale = created_at - Duration::days(30);

        let next = update(&patients, "3", input(), stale);
        let edited = next.get("3").unwrap();
        assert!(edited.created_at <= edited.updated_at);
    }
}
