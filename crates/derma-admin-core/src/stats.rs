//! Summary statistics shown above each list view.
//!
//! Stats are recomputed from the collection on every render; nothing is
//! cached. "This month" is evaluated against the caller's `today`; the
//! `_now` variants use the current UTC date.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    Employee, EmployeeRole, EmployeeStatus, Gender, Patient, Prescription, PrescriptionStatus,
};
use crate::store::Collection;

/// Patient list summary.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientStats {
    pub total: usize,
    pub female: usize,
    pub male: usize,
    /// Patients registered in the current calendar month
    pub this_month: usize,
}

/// Prescription list summary.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrescriptionStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub cancelled: usize,
    /// Prescriptions dated in the current calendar month
    pub this_month: usize,
}

/// Staff list summary.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaffStats {
    pub total: usize,
    pub doctors: usize,
    pub nurses: usize,
    pub administrative: usize,
    pub active: usize,
    pub inactive: usize,
}

fn count<T>(collection: &Collection<T>, predicate: impl Fn(&T) -> bool) -> usize {
    collection.iter().filter(|item| predicate(item)).count()
}

pub fn derive_patient_stats(patients: &Collection<Patient>, today: NaiveDate) -> PatientStats {
    PatientStats {
        total: patients.len(),
        female: count(patients, |p| p.gender == Gender::Female),
        male: count(patients, |p| p.gender == Gender::Male),
        this_month: count(patients, |p| p.created_in_month_of(today)),
    }
}

pub fn derive_prescription_stats(
    prescriptions: &Collection<Prescription>,
    today: NaiveDate,
) -> PrescriptionStats {
    PrescriptionStats {
        total: prescriptions.len(),
        active: count(prescriptions, |p| p.status == PrescriptionStatus::Active),
        completed: count(prescriptions, |p| p.status == PrescriptionStatus::Completed),
        cancelled: count(prescriptions, |p| p.status == PrescriptionStatus::Cancelled),
        this_month: count(prescriptions, |p| p.written_in_month_of(today)),
    }
}

/// Patient stats for the current UTC date.
pub fn derive_patient_stats_now(patients: &Collection<Patient>) -> PatientStats {
    derive_patient_stats(patients, Utc::now().date_naive())
}

pub fn derive_prescription_stats_now(
    prescriptions: &Collection<Prescription>,
) -> PrescriptionStats {
    derive_prescription_stats(prescriptions, Utc::now().date_naive())
}

pub fn derive_staff_stats(employees: &Collection<Employee>) -> StaffStats {
    StaffStats {
        total: employees.len(),
        doctors: count(employees, |e| e.role == EmployeeRole::Doctor),
        nurses: count(employees, |e| e.role == EmployeeRole::Nurse),
        administrative: count(employees, |e| e.role == EmployeeRole::Administrative),
        active: count(employees, |e| e.status == EmployeeStatus::Active),
        inactive: count(employees, |e| e.status == EmployeeStatus::Inactive),
    }
}
