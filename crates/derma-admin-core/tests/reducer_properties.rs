//! Property tests for the collection reducers and stats.

use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

use derma_admin_core::models::{Gender, Patient, PatientInput, PrescriptionStatus};
use derma_admin_core::reducer::{self, TransitionPolicy};
use derma_admin_core::stats::{derive_patient_stats, derive_prescription_stats, derive_staff_stats};
use derma_admin_core::store::{seed, Collection};

fn gender_strategy() -> impl Strategy<Value = Gender> {
    prop_oneof![Just(Gender::Male), Just(Gender::Female), Just(Gender::Other)]
}

fn status_strategy() -> impl Strategy<Value = PrescriptionStatus> {
    prop_oneof![
        Just(PrescriptionStatus::Active),
        Just(PrescriptionStatus::Completed),
        Just(PrescriptionStatus::Cancelled),
    ]
}

prop_compose! {
    fn patient_input()(
        name in "[A-Za-z]{1,12}( [A-Za-z]{1,12})?",
        user in "[a-z]{1,10}",
        phone in "\\+34 [0-9]{3} [0-9]{3} [0-9]{3}",
        days in 0i64..30_000,
        gender in gender_strategy(),
        history in proptest::option::of("[a-z ]{0,40}"),
    ) -> PatientInput {
        PatientInput {
            name,
            email: format!("{}@email.com", user),
            phone,
            date_of_birth: NaiveDate::from_ymd_opt(1930, 1, 1).unwrap() + Duration::days(days),
            gender,
            medical_history: history,
        }
    }
}

fn timestamp(offset_secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + Duration::seconds(offset_secs)
}

fn build_patients(inputs: Vec<PatientInput>) -> Collection<Patient> {
    inputs
        .into_iter()
        .enumerate()
        .fold(Collection::new(), |acc, (i, input)| {
            reducer::create(&acc, input, timestamp(i as i64))
        })
}

proptest! {
    #[test]
    fn create_appends_record_with_input_fields(
        inputs in proptest::collection::vec(patient_input(), 0..8),
        input in patient_input(),
    ) {
        let patients = build_patients(inputs);
        let now = timestamp(3_600);
        let next = reducer::create(&patients, input.clone(), now);

        prop_assert_eq!(next.len(), patients.len() + 1);
        let added = next.iter().last().unwrap();
        prop_assert!(!patients.contains_id(&added.id));
        prop_assert_eq!(added.to_input(), input);
        prop_assert_eq!(added.created_at, now);
        prop_assert_eq!(added.updated_at, now);
        // Input collection untouched
        prop_assert_eq!(patients.len(), next.len() - 1);
    }

    #[test]
    fn update_preserves_identity(
        inputs in proptest::collection::vec(patient_input(), 1..8),
        pick in any::<prop::sample::Index>(),
        edit in patient_input(),
        later in 0i64..1_000_000,
    ) {
        let patients = build_patients(inputs);
        let target = patients.iter().nth(pick.index(patients.len())).unwrap().clone();
        let now = timestamp(later);

        let next = reducer::update(&patients, &target.id, edit.clone(), now);

        prop_assert_eq!(next.len(), patients.len());
        prop_assert_eq!(next.ids(), patients.ids());
        let updated = next.get(&target.id).unwrap();
        prop_assert_eq!(&updated.id, &target.id);
        prop_assert_eq!(updated.created_at, target.created_at);
        prop_assert!(updated.updated_at >= updated.created_at);
        prop_assert_eq!(updated.to_input(), edit);
    }

    #[test]
    fn unknown_id_changes_nothing(
        inputs in proptest::collection::vec(patient_input(), 0..8),
        edit in patient_input(),
        status in status_strategy(),
        policy in prop_oneof![Just(TransitionPolicy::Enforce), Just(TransitionPolicy::Permissive)],
    ) {
        let patients = build_patients(inputs);
        let unknown = "not-a-uuid".to_string();

        prop_assert_eq!(&reducer::update(&patients, &unknown, edit, timestamp(0)), &patients);
        prop_assert_eq!(&reducer::delete_many(&patients, &[unknown.clone()].into()), &patients);

        let prescriptions = seed::prescriptions();
        prop_assert_eq!(
            &reducer::set_status(&prescriptions, &unknown, status, policy),
            &prescriptions
        );
    }

    #[test]
    fn delete_removes_exactly_the_selection(
        inputs in proptest::collection::vec(patient_input(), 0..10),
        mask in proptest::collection::vec(any::<bool>(), 10),
    ) {
        let patients = build_patients(inputs);
        let selected: HashSet<String> = patients
            .iter()
            .zip(mask.iter())
            .filter(|(_, keep)| **keep)
            .map(|(p, _)| p.id.clone())
            .collect();

        let once = reducer::delete_many(&patients, &selected);
        prop_assert_eq!(once.len(), patients.len() - selected.len());
        prop_assert!(once.iter().all(|p| !selected.contains(&p.id)));

        let twice = reducer::delete_many(&once, &selected);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn stats_total_matches_collection(
        inputs in proptest::collection::vec(patient_input(), 0..10),
        statuses in proptest::collection::vec(status_strategy(), 0..4),
    ) {
        let patients = build_patients(inputs);
        let today = timestamp(0).date_naive();
        let stats = derive_patient_stats(&patients, today);
        prop_assert_eq!(stats.total, patients.len());
        prop_assert!(stats.female + stats.male <= stats.total);
        prop_assert!(stats.this_month <= stats.total);

        // Walk seed prescription 1 through a series of permitted changes
        let mut prescriptions = seed::prescriptions();
        for status in statuses {
            prescriptions =
                reducer::set_status(&prescriptions, "1", status, TransitionPolicy::Enforce);
        }
        let rx_stats = derive_prescription_stats(&prescriptions, today);
        prop_assert_eq!(rx_stats.total, prescriptions.len());
        prop_assert_eq!(rx_stats.active + rx_stats.completed + rx_stats.cancelled, rx_stats.total);

        let staff = derive_staff_stats(&seed::employees());
        prop_assert_eq!(staff.active + staff.inactive, staff.total);
    }
}
