//! Pure CRUD reducers over entity collections.
//!
//! Every function takes the current [`Collection`] by reference and returns a
//! new one; the input is never modified. Unknown identifiers are a no-op,
//! never an error. Input is assumed to have passed form validation
//! (see [`crate::validation`]).

mod employees;
mod patients;
pub mod prescriptions;

pub use prescriptions::{set_status, TransitionPolicy};

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::Entity;
use crate::store::Collection;

/// An entity that can be created from and edited with a form payload.
pub trait Editable: Entity + Sized {
    /// The user-editable fields.
    type Input;

    /// Build a new record with the given identifier.
    fn create(id: String, input: Self::Input, now: DateTime<Utc>) -> Self;

    /// Copy of `self` with all editable fields replaced, identity preserved.
    fn edit(&self, input: Self::Input, now: DateTime<Utc>) -> Self;
}

/// Generate an identifier not already used in `collection`.
pub fn fresh_id<T: Entity>(collection: &Collection<T>) -> String {
    loop {
        let id = uuid::Uuid::new_v4().to_string();
        if !collection.contains_id(&id) {
            return id;
        }
    }
}

/// Append a new record built from `input`.
pub fn create<T: Editable>(
    collection: &Collection<T>,
    input: T::Input,
    now: DateTime<Utc>,
) -> Collection<T> {
    let id = fresh_id(collection);
    debug!(id = %id, "Creating record");
    collection.with_appended(T::create(id, input, now))
}

/// Replace the editable fields of the record with `id`.
///
/// Returns an equal collection if no record has that identifier.
pub fn update<T: Editable>(
    collection: &Collection<T>,
    id: &str,
    input: T::Input,
    now: DateTime<Utc>,
) -> Collection<T> {
    match collection.position(id) {
        Some(index) => {
            let edited = collection.entries()[index].edit(input, now);
            collection.with_replaced(index, edited)
        }
        None => {
            debug!(id = %id, "Update ignored, record not found");
            collection.clone()
        }
    }
}

/// Remove every record whose identifier is in `ids`; unknown identifiers are ignored.
pub fn delete_many<T: Entity>(collection: &Collection<T>, ids: &HashSet<String>) -> Collection<T> {
    if ids.is_empty() {
        return collection.clone();
    }
    let next = collection.without_ids(ids);
    debug!(
        requested = ids.len(),
        removed = collection.len() - next.len(),
        "Deleted selection"
    );
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Employee, EmployeeInput, EmployeeRole, EmployeeStatus};
    use crate::store::seed;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn input(name: &str) -> EmployeeInput {
        EmployeeInput {
            name: name.into(),
            email: "nuevo@davossalud.com".into(),
            phone: "+34 600 000 000".into(),
            specialty: None,
            role: EmployeeRole::Nurse,
            hire_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            status: EmployeeStatus::Active,
        }
    }

    #[test]
    fn test_fresh_id_not_in_collection() {
        let staff = seed::employees();
        let id = fresh_id(&staff);
        assert!(!staff.contains_id(&id));
        assert_eq!(id.len(), 36);
    }

    #[test]
    fn test_create_does_not_touch_input() {
        let staff = seed::employees();
        let next = create(&staff, input("Enf. Lucía Torres"), Utc::now());
        assert_eq!(staff.len(), 5);
        assert_eq!(next.len(), 6);
        assert_eq!(next.iter().last().unwrap().name, "Enf. Lucía Torres");
    }

    #[test]
    fn test_update_replaces_one_entry_only() {
        let staff = seed::employees();
        let next = update(&staff, "3", input("Enf. Marta R."), Utc::now());
        assert_eq!(next.get("3").unwrap().name, "Enf. Marta R.");
        for (before, after) in staff.entries().iter().zip(next.entries()) {
            if before.id != "3" {
                assert!(Arc::ptr_eq(before, after));
            }
        }
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let staff = seed::employees();
        let next = update(&staff, "missing", input("Nobody"), Utc::now());
        assert_eq!(next, staff);
    }

    #[test]
    fn test_delete_empty_selection_is_noop() {
        let staff = seed::employees();
        let next = delete_many(&staff, &HashSet::new());
        assert_eq!(next, staff);
    }

    #[test]
    fn test_delete_ignores_unknown_ids() {
        let staff = seed::employees();
        let ids: HashSet<String> = ["2".into(), "99".into()].into();
        let next: Collection<Employee> = delete_many(&staff, &ids);
        assert_eq!(next.len(), 4);
        assert!(!next.contains_id("2"));
    }
}
