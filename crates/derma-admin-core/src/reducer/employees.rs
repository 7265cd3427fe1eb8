//! Employee reducer rules.

use chrono::{DateTime, Utc};

use super::Editable;
use crate::models::{Employee, EmployeeInput};

impl Editable for Employee {
    type Input = EmployeeInput;

    fn create(id: String, input: EmployeeInput, _now: DateTime<Utc>) -> Self {
        Employee::new(id, input)
    }

    fn edit(&self, input: EmployeeInput, _now: DateTime<Utc>) -> Self {
        Employee::new(self.id.clone(), input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmployeeRole, EmployeeStatus};
    use crate::reducer::update;
    use crate::store::seed;

    #[test]
    fn test_edit_can_deactivate() {
        let staff = seed::employees();
        let mut input = staff.get("1").unwrap().to_input();
        input.status = EmployeeStatus::Inactive;
        input.specialty = Some("Oncodermatología".into());

        let next = update(&staff, "1", input, Utc::now());
        let edited = next.get("1").unwrap();
        assert_eq!(edited.status, EmployeeStatus::Inactive);
        assert_eq!(edited.specialty.as_deref(), Some("Oncodermatología"));
        assert_eq!(edited.role, EmployeeRole::Doctor);
    }

    #[test]
    fn test_specialty_outside_suggestions_is_kept() {
        let staff = seed::employees();
        let mut input = staff.get("4").unwrap().to_input();
        input.specialty = Some("Facturación".into());

        let next = update(&staff, "4", input, Utc::now());
        assert_eq!(next.get("4").unwrap().specialty.as_deref(), Some("Facturación"));
    }
}
