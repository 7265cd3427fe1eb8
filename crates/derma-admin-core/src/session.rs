//! Session store.
//!
//! A [`ClinicSession`] owns the authoritative collections and filter state for
//! one dashboard session. Every mutation is validated, run through the
//! reducer, and the returned collection replaces the owned one.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::filters::{
    Criteria, FilterCapture, PatientCriteria, PrescriptionCriteria, StaffCriteria,
};
use crate::models::{
    Employee, EmployeeInput, EmployeeRole, Entity, Patient, PatientInput, Prescription,
    PrescriptionInput, PrescriptionStatus,
};
use crate::reducer::{self, Editable, TransitionPolicy};
use crate::stats::{self, PatientStats, PrescriptionStats, StaffStats};
use crate::store::{seed, Collection};
use crate::validation::{self, ValidationError, ValidationResult};

/// In-memory state for one dashboard session.
#[derive(Debug)]
pub struct ClinicSession {
    config: SessionConfig,
    patients: Collection<Patient>,
    employees: Collection<Employee>,
    prescriptions: Collection<Prescription>,
    patient_filters: FilterCapture<PatientCriteria>,
    prescription_filters: FilterCapture<PrescriptionCriteria>,
    staff_filters: FilterCapture<StaffCriteria>,
}

impl Default for ClinicSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl ClinicSession {
    pub fn new(config: SessionConfig) -> Self {
        let (patients, employees, prescriptions) = if config.seed_data {
            (seed::patients(), seed::employees(), seed::prescriptions())
        } else {
            Default::default()
        };
        info!(
            patients = patients.len(),
            employees = employees.len(),
            prescriptions = prescriptions.len(),
            "Session started"
        );
        Self {
            config,
            patients,
            employees,
            prescriptions,
            patient_filters: FilterCapture::new(),
            prescription_filters: FilterCapture::new(),
            staff_filters: FilterCapture::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // =========================================================================
    // Collections
    // =========================================================================

    /// The full, unfiltered patient collection.
    pub fn patients(&self) -> &Collection<Patient> {
        &self.patients
    }

    pub fn employees(&self) -> &Collection<Employee> {
        &self.employees
    }

    pub fn prescriptions(&self) -> &Collection<Prescription> {
        &self.prescriptions
    }

    /// Patients shown in the list view, narrowed by the filter bar when enabled.
    pub fn visible_patients(&self) -> Collection<Patient> {
        self.visible(&self.patients, &self.patient_filters)
    }

    pub fn visible_employees(&self) -> Collection<Employee> {
        self.visible(&self.employees, &self.staff_filters)
    }

    pub fn visible_prescriptions(&self) -> Collection<Prescription> {
        self.visible(&self.prescriptions, &self.prescription_filters)
    }

    fn visible<C: Criteria>(
        &self,
        collection: &Collection<C::Entity>,
        filters: &FilterCapture<C>,
    ) -> Collection<C::Entity> {
        if self.config.apply_filters {
            filters.apply(collection)
        } else {
            collection.clone()
        }
    }

    /// Staff selectable as prescribing doctor.
    pub fn doctors(&self) -> Collection<Employee> {
        self.employees.retained(|e| e.role == EmployeeRole::Doctor)
    }

    // =========================================================================
    // Filters
    // =========================================================================

    pub fn patient_filters(&mut self) -> &mut FilterCapture<PatientCriteria> {
        &mut self.patient_filters
    }

    pub fn prescription_filters(&mut self) -> &mut FilterCapture<PrescriptionCriteria> {
        &mut self.prescription_filters
    }

    pub fn staff_filters(&mut self) -> &mut FilterCapture<StaffCriteria> {
        &mut self.staff_filters
    }

    // =========================================================================
    // Stats
    // =========================================================================

    pub fn patient_stats(&self, today: NaiveDate) -> PatientStats {
        stats::derive_patient_stats(&self.patients, today)
    }

    pub fn prescription_stats(&self, today: NaiveDate) -> PrescriptionStats {
        stats::derive_prescription_stats(&self.prescriptions, today)
    }

    pub fn staff_stats(&self) -> StaffStats {
        stats::derive_staff_stats(&self.employees)
    }

    // =========================================================================
    // Patients
    // =========================================================================

    /// Validate and add a patient. Returns the new identifier.
    pub fn create_patient(
        &mut self,
        input: PatientInput,
        now: DateTime<Utc>,
    ) -> ValidationResult<String> {
        let input = rejected_on_error("patient", validation::validate_patient(input))?;
        self.patients = reducer::create(&self.patients, input, now);
        Ok(last_id(&self.patients, "patient"))
    }

    /// Validate and apply an edit. Returns `false` if no patient has `id`.
    pub fn update_patient(
        &mut self,
        id: &str,
        input: PatientInput,
        now: DateTime<Utc>,
    ) -> ValidationResult<bool> {
        let input = rejected_on_error("patient", validation::validate_patient(input))?;
        Ok(apply_update(&mut self.patients, id, input, now, "patient"))
    }

    /// Remove the selected patients. Returns how many were removed.
    pub fn delete_patients(&mut self, ids: &HashSet<String>) -> usize {
        apply_delete(&mut self.patients, ids, "patient")
    }

    // =========================================================================
    // Staff
    // =========================================================================

    pub fn create_employee(
        &mut self,
        input: EmployeeInput,
        now: DateTime<Utc>,
    ) -> ValidationResult<String> {
        let input = rejected_on_error("employee", validation::validate_employee(input))?;
        self.employees = reducer::create(&self.employees, input, now);
        Ok(last_id(&self.employees, "employee"))
    }

    pub fn update_employee(
        &mut self,
        id: &str,
        input: EmployeeInput,
        now: DateTime<Utc>,
    ) -> ValidationResult<bool> {
        let input = rejected_on_error("employee", validation::validate_employee(input))?;
        Ok(apply_update(&mut self.employees, id, input, now, "employee"))
    }

    pub fn delete_employees(&mut self, ids: &HashSet<String>) -> usize {
        apply_delete(&mut self.employees, ids, "employee")
    }

    // =========================================================================
    // Prescriptions
    // =========================================================================

    /// Resolve the patient and doctor of a submission and take their name
    /// snapshots. The patient must exist and the doctor must be a staff
    /// member with the doctor role.
    pub fn snapshot_names(&self, input: PrescriptionInput) -> ValidationResult<PrescriptionInput> {
        let patient = self
            .patients
            .get(&input.patient_id)
            .ok_or_else(|| ValidationError::UnknownPatient(input.patient_id.clone()))?;
        let doctor = self
            .employees
            .get(&input.doctor_id)
            .filter(|e| e.role == EmployeeRole::Doctor)
            .ok_or_else(|| ValidationError::UnknownDoctor(input.doctor_id.clone()))?;
        Ok(input.with_patient(patient).with_doctor(doctor))
    }

    /// Validate and add a prescription. A submission without any named
    /// medication is rejected and never reaches the reducer.
    pub fn create_prescription(
        &mut self,
        input: PrescriptionInput,
        now: DateTime<Utc>,
    ) -> ValidationResult<String> {
        let input = rejected_on_error("prescription", validation::validate_prescription(input))?;
        let input = rejected_on_error("prescription", self.snapshot_names(input))?;
        self.prescriptions = reducer::create(&self.prescriptions, input, now);
        Ok(last_id(&self.prescriptions, "prescription"))
    }

    /// Validate and apply an edit. Under [`TransitionPolicy::Enforce`] the
    /// edited status must be the current one or reachable from it.
    pub fn update_prescription(
        &mut self,
        id: &str,
        input: PrescriptionInput,
        now: DateTime<Utc>,
    ) -> ValidationResult<bool> {
        let input = rejected_on_error("prescription", validation::validate_prescription(input))?;
        let input = rejected_on_error("prescription", self.snapshot_names(input))?;
        if let Some(current) = self.prescriptions.get(id) {
            let (from, to) = (current.status, input.status);
            if self.config.transition_policy == TransitionPolicy::Enforce
                && from != to
                && !from.can_transition_to(to)
            {
                return rejected_on_error(
                    "prescription",
                    Err(ValidationError::StatusTransition { from, to }),
                );
            }
        }
        Ok(apply_update(&mut self.prescriptions, id, input, now, "prescription"))
    }

    pub fn delete_prescriptions(&mut self, ids: &HashSet<String>) -> usize {
        apply_delete(&mut self.prescriptions, ids, "prescription")
    }

    /// Change a prescription's status under the configured transition policy.
    /// Returns `true` if the status was changed.
    pub fn set_prescription_status(&mut self, id: &str, status: PrescriptionStatus) -> bool {
        let next = reducer::set_status(
            &self.prescriptions,
            id,
            status,
            self.config.transition_policy,
        );
        let changed = next.get(id).map(|p| p.status) == Some(status)
            && self.prescriptions.get(id).map(|p| p.status) != Some(status);
        if changed {
            info!(id = %id, status = %status, "Prescription status changed");
        }
        self.prescriptions = next;
        changed
    }
}

fn rejected_on_error<T>(kind: &str, result: ValidationResult<T>) -> ValidationResult<T> {
    result.map_err(|e: ValidationError| {
        warn!(kind, error = %e, "Submission rejected");
        e
    })
}

fn last_id<T: Entity>(collection: &Collection<T>, kind: &str) -> String {
    let id = collection
        .iter()
        .last()
        .map(|item| item.id().to_string())
        .unwrap_or_default();
    info!(kind, id = %id, "Record created");
    id
}

fn apply_update<T: Editable>(
    collection: &mut Collection<T>,
    id: &str,
    input: T::Input,
    now: DateTime<Utc>,
    kind: &str,
) -> bool {
    let found = collection.contains_id(id);
    *collection = reducer::update(collection, id, input, now);
    if found {
        info!(kind, id = %id, "Record updated");
    }
    found
}

fn apply_delete<T: Entity>(
    collection: &mut Collection<T>,
    ids: &HashSet<String>,
    kind: &str,
) -> usize {
    let before = collection.len();
    *collection = reducer::delete_many(collection, ids);
    let removed = before - collection.len();
    if removed > 0 {
        info!(kind, removed, "Records deleted");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, MedicationInput};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rx_input(patient_id: &str, doctor_id: &str, med_name: &str) -> PrescriptionInput {
        PrescriptionInput {
            patient_id: patient_id.into(),
            patient_name: String::new(),
            doctor_id: doctor_id.into(),
            doctor_name: String::new(),
            medications: vec![MedicationInput {
                id: None,
                name: med_name.into(),
                dosage: "15%".into(),
                frequency: "Dos veces al día".into(),
                duration: "12 semanas".into(),
                instructions: None,
            }],
            diagnosis: "Melasma".into(),
            instructions: "Evitar el sol.".into(),
            date: date(2024, 3, 1),
            status: PrescriptionStatus::Active,
            follow_up_date: Some(date(2024, 6, 1)),
            notes: None,
        }
    }

    #[test]
    fn test_create_prescription_snapshots_names() {
        let mut session = ClinicSession::default();
        let id = session
            .create_prescription(rx_input("3", "1", "Ácido azelaico"), Utc::now())
            .unwrap();

        let rx = session.prescriptions().get(&id).unwrap();
        assert_eq!(rx.patient_name, "Ana Martínez");
        assert_eq!(rx.doctor_name, "Dra. Rosa López");
    }

    #[test]
    fn test_snapshot_not_resynced_after_patient_edit() {
        let mut session = ClinicSession::default();
        let mut edit = session.patients().get("1").unwrap().to_input();
        edit.name = "María G. Pérez".into();
        assert!(session.update_patient("1", edit, Utc::now()).unwrap());

        assert_eq!(
            session.prescriptions().get("1").unwrap().patient_name,
            "María González"
        );
    }

    #[test]
    fn test_rejected_prescription_leaves_collection() {
        let mut session = ClinicSession::default();
        let before = session.prescriptions().clone();

        let result = session.create_prescription(rx_input("3", "1", "  "), Utc::now());
        assert_eq!(result, Err(ValidationError::NoMedications));
        assert_eq!(session.prescriptions(), &before);
    }

    #[test]
    fn test_prescription_requires_known_patient() {
        let mut session = ClinicSession::default();
        let input = rx_input("999", "1", "Ácido azelaico");
        let result = session.create_prescription(input, Utc::now());
        assert_eq!(result, Err(ValidationError::UnknownPatient("999".into())));
        assert_eq!(session.prescriptions().len(), 2);
    }

    #[test]
    fn test_prescription_requires_doctor_role() {
        let mut session = ClinicSession::default();
        // Ana García is administrative staff
        let input = rx_input("3", "4", "Ácido azelaico");
        let result = session.create_prescription(input, Utc::now());
        assert_eq!(result, Err(ValidationError::UnknownDoctor("4".into())));

        let input = rx_input("3", "42", "Ácido azelaico");
        let result = session.create_prescription(input, Utc::now());
        assert_eq!(result, Err(ValidationError::UnknownDoctor("42".into())));
        assert_eq!(session.prescriptions().len(), 2);
    }

    #[test]
    fn test_edit_cannot_bypass_transition_table() {
        let mut session = ClinicSession::default();
        let mut edit = session.prescriptions().get("2").unwrap().to_input();
        edit.status = PrescriptionStatus::Cancelled;

        let result = session.update_prescription("2", edit.clone(), Utc::now());
        assert_eq!(
            result,
            Err(ValidationError::StatusTransition {
                from: PrescriptionStatus::Completed,
                to: PrescriptionStatus::Cancelled,
            })
        );
        assert_eq!(
            session.prescriptions().get("2").unwrap().status,
            PrescriptionStatus::Completed
        );

        // Unchanged status and table transitions are accepted
        edit.status = PrescriptionStatus::Completed;
        edit.notes = Some("Revisado".into());
        assert!(session.update_prescription("2", edit.clone(), Utc::now()).unwrap());
        edit.status = PrescriptionStatus::Active;
        assert!(session.update_prescription("2", edit, Utc::now()).unwrap());
        assert_eq!(
            session.prescriptions().get("2").unwrap().status,
            PrescriptionStatus::Active
        );
    }

    #[test]
    fn test_permissive_policy_allows_any_edited_status() {
        let mut session = ClinicSession::new(SessionConfig {
            transition_policy: TransitionPolicy::Permissive,
            ..SessionConfig::default()
        });
        let mut edit = session.prescriptions().get("2").unwrap().to_input();
        edit.status = PrescriptionStatus::Cancelled;
        assert!(session.update_prescription("2", edit, Utc::now()).unwrap());
    }

    #[test]
    fn test_status_change_reports_refusal() {
        let mut session = ClinicSession::default();
        assert!(!session.set_prescription_status("2", PrescriptionStatus::Cancelled));
        assert!(session.set_prescription_status("1", PrescriptionStatus::Cancelled));
        assert!(!session.set_prescription_status("missing", PrescriptionStatus::Active));
    }

    #[test]
    fn test_permissive_policy_from_config() {
        let mut session = ClinicSession::new(SessionConfig {
            transition_policy: TransitionPolicy::Permissive,
            ..SessionConfig::default()
        });
        assert!(session.set_prescription_status("2", PrescriptionStatus::Cancelled));
    }

    #[test]
    fn test_visible_respects_apply_filters() {
        let mut session = ClinicSession::default();
        session.patient_filters().capture_pair("gender", "female").unwrap();
        assert_eq!(session.visible_patients().len(), 3);
        assert_eq!(session.patients().len(), 5);

        let mut stub = ClinicSession::new(SessionConfig {
            apply_filters: false,
            ..SessionConfig::default()
        });
        stub.patient_filters().capture_pair("gender", "female").unwrap();
        assert_eq!(stub.visible_patients().len(), 5);
    }

    #[test]
    fn test_doctors_lists_all_doctor_roles() {
        let session = ClinicSession::default();
        let names: Vec<_> = session.doctors().iter().map(|d| d.name.clone()).collect();
        assert_eq!(
            names,
            vec!["Dra. Rosa López", "Dr. Carlos Mendez", "Dr. Javier Ruiz"]
        );
    }

    #[test]
    fn test_empty_session() {
        let mut session = ClinicSession::new(SessionConfig {
            seed_data: false,
            ..SessionConfig::default()
        });
        assert!(session.patients().is_empty());

        let input = PatientInput {
            name: "Lucía Torres".into(),
            email: "lucia@email.com".into(),
            phone: "+34 667 890 123".into(),
            date_of_birth: date(1990, 6, 2),
            gender: Gender::Female,
            medical_history: None,
        };
        let id = session.create_patient(input, Utc::now()).unwrap();
        assert_eq!(session.patients().ids(), vec![id.as_str()]);
        assert_eq!(session.delete_patients(&[id].into()), 1);
    }
}
