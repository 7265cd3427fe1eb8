//! Derma-Admin Core Library
//!
//! In-memory administration core for a dermatology clinic dashboard: patient,
//! prescription and staff records with list filters, summary statistics and
//! create/edit/delete flows.
//!
//! # Architecture
//!
//! ```text
//!   UI form ──► validation ──► reducer ──► new Collection ──► ClinicSession
//!                                                                 │
//!                           ┌─────────────────────────────────────┤
//!                           ▼                                     ▼
//!                     stats (per render)              filters (list view)
//! ```
//!
//! Collections are never mutated in place. Every reducer returns a fresh
//! [`Collection`] that shares unchanged entries with its input, and the
//! session swaps it in. Unknown identifiers are a no-op, never an error.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Patient, Employee, Prescription, Medication)
//! - [`store`]: Copy-on-write collections and seed data
//! - [`reducer`]: Pure create/update/delete/status-transition functions
//! - [`stats`]: Summary counts per list view
//! - [`filters`]: Filter bar capture and matching
//! - [`validation`]: Form-layer checks run before the reducer
//! - [`session`]: Explicit per-session store
//! - [`config`]: Session configuration

pub mod config;
pub mod filters;
pub mod models;
pub mod reducer;
pub mod session;
pub mod stats;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use config::SessionConfig;
pub use models::{
    Employee, EmployeeInput, EmployeeRole, EmployeeStatus, Entity, Gender, Medication,
    MedicationInput, Patient, PatientInput, Prescription, PrescriptionInput, PrescriptionStatus,
};
pub use reducer::{create, delete_many, set_status, update, TransitionPolicy};
pub use session::ClinicSession;
pub use stats::{PatientStats, PrescriptionStats, StaffStats};
pub use store::Collection;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum DermaAdminError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session error: {0}")]
    Session(String),
}

impl From<validation::ValidationError> for DermaAdminError {
    fn from(e: validation::ValidationError) -> Self {
        DermaAdminError::Validation(e.to_string())
    }
}

impl From<filters::FilterError> for DermaAdminError {
    fn from(e: filters::FilterError) -> Self {
        DermaAdminError::InvalidInput(e.to_string())
    }
}

impl From<models::ParseEnumError> for DermaAdminError {
    fn from(e: models::ParseEnumError) -> Self {
        DermaAdminError::InvalidInput(e.to_string())
    }
}

impl From<chrono::ParseError> for DermaAdminError {
    fn from(e: chrono::ParseError) -> Self {
        DermaAdminError::InvalidInput(format!("Bad date: {}", e))
    }
}

impl From<config::ConfigError> for DermaAdminError {
    fn from(e: config::ConfigError) -> Self {
        DermaAdminError::Config(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for DermaAdminError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        DermaAdminError::Session(format!("Lock poisoned: {}", e))
    }
}

const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_date(value: &str) -> Result<NaiveDate, DermaAdminError> {
    Ok(NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)?)
}

fn parse_optional_date(value: Option<String>) -> Result<Option<NaiveDate>, DermaAdminError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| parse_date(&v))
        .transpose()
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open a session. `config_json` overrides [`SessionConfig`] defaults.
#[uniffi::export]
pub fn open_session(config_json: Option<String>) -> Result<Arc<DashboardSession>, DermaAdminError> {
    let config = match config_json {
        Some(json) => SessionConfig::from_json(&json)?,
        None => SessionConfig::default(),
    };
    Ok(Arc::new(DashboardSession {
        session: Arc::new(Mutex::new(ClinicSession::new(config))),
    }))
}

/// Open a session without seed data (for testing).
#[uniffi::export]
pub fn open_empty_session() -> Arc<DashboardSession> {
    let config = SessionConfig {
        seed_data: false,
        ..SessionConfig::default()
    };
    Arc::new(DashboardSession {
        session: Arc::new(Mutex::new(ClinicSession::new(config))),
    })
}

/// Install a `tracing` subscriber writing to stderr.
///
/// `directive` defaults to `derma_admin_core=info`; `RUST_LOG` is honoured as
/// well. Calling this more than once is harmless.
#[uniffi::export]
pub fn init_logging(directive: Option<String>) -> Result<(), DermaAdminError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let directive = directive.unwrap_or_else(|| "derma_admin_core=info".into());
    let directive = directive
        .parse()
        .map_err(|e| DermaAdminError::InvalidInput(format!("Bad log directive: {}", e)))?;

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
    Ok(())
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe session wrapper for FFI.
#[derive(uniffi::Object)]
pub struct DashboardSession {
    session: Arc<Mutex<ClinicSession>>,
}

#[uniffi::export]
impl DashboardSession {
    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Patients for the list view (filtered when filters are applied).
    pub fn list_patients(&self) -> Result<Vec<FfiPatient>, DermaAdminError> {
        let session = self.session.lock()?;
        let today = Utc::now().date_naive();
        Ok(session
            .visible_patients()
            .iter()
            .map(|p| FfiPatient::from_patient(p, today))
            .collect())
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: String) -> Result<Option<FfiPatient>, DermaAdminError> {
        let session = self.session.lock()?;
        let today = Utc::now().date_naive();
        Ok(session
            .patients()
            .get(&id)
            .map(|p| FfiPatient::from_patient(p, today)))
    }

    /// Create a new patient.
    pub fn create_patient(&self, input: FfiPatientInput) -> Result<FfiPatient, DermaAdminError> {
        let mut session = self.session.lock()?;
        let id = session.create_patient(input.try_into()?, Utc::now())?;
        let today = Utc::now().date_naive();
        session
            .patients()
            .get(&id)
            .map(|p| FfiPatient::from_patient(p, today))
            .ok_or(DermaAdminError::NotFound(id))
    }

    /// Edit a patient. Returns false if no patient has `id`.
    pub fn update_patient(
        &self,
        id: String,
        input: FfiPatientInput,
    ) -> Result<bool, DermaAdminError> {
        let mut session = self.session.lock()?;
        Ok(session.update_patient(&id, input.try_into()?, Utc::now())?)
    }

    /// Delete the selected patients. Returns how many were removed.
    pub fn delete_patients(&self, ids: Vec<String>) -> Result<u32, DermaAdminError> {
        let mut session = self.session.lock()?;
        let ids: HashSet<String> = ids.into_iter().collect();
        Ok(session.delete_patients(&ids) as u32)
    }

    pub fn patient_stats(&self) -> Result<FfiPatientStats, DermaAdminError> {
        let session = self.session.lock()?;
        Ok(stats::derive_patient_stats_now(session.patients()).into())
    }

    /// Capture one patient filter control change (`search`, `gender`, `dateRange`).
    pub fn change_patient_filter(&self, key: String, value: String) -> Result<(), DermaAdminError> {
        let mut session = self.session.lock()?;
        Ok(session.patient_filters().capture_pair(&key, &value)?)
    }

    pub fn clear_patient_filters(&self) -> Result<(), DermaAdminError> {
        let mut session = self.session.lock()?;
        session.patient_filters().clear();
        Ok(())
    }

    // =========================================================================
    // Staff Operations
    // =========================================================================

    pub fn list_employees(&self) -> Result<Vec<FfiEmployee>, DermaAdminError> {
        let session = self.session.lock()?;
        let today = Utc::now().date_naive();
        Ok(session
            .visible_employees()
            .iter()
            .map(|e| FfiEmployee::from_employee(e, today))
            .collect())
    }

    pub fn get_employee(&self, id: String) -> Result<Option<FfiEmployee>, DermaAdminError> {
        let session = self.session.lock()?;
        let today = Utc::now().date_naive();
        Ok(session
            .employees()
            .get(&id)
            .map(|e| FfiEmployee::from_employee(e, today)))
    }

    /// Staff selectable as prescribing doctor.
    pub fn doctors(&self) -> Result<Vec<FfiEmployee>, DermaAdminError> {
        let session = self.session.lock()?;
        let today = Utc::now().date_naive();
        Ok(session
            .doctors()
            .iter()
            .map(|e| FfiEmployee::from_employee(e, today))
            .collect())
    }

    /// Specialty suggestions for a role.
    pub fn specialty_suggestions(&self, role: String) -> Result<Vec<String>, DermaAdminError> {
        let role: EmployeeRole = role.parse()?;
        Ok(role
            .specialty_suggestions()
            .iter()
            .map(|s| s.to_string())
            .collect())
    }

    pub fn create_employee(&self, input: FfiEmployeeInput) -> Result<FfiEmployee, DermaAdminError> {
        let mut session = self.session.lock()?;
        let id = session.create_employee(input.try_into()?, Utc::now())?;
        let today = Utc::now().date_naive();
        session
            .employees()
            .get(&id)
            .map(|e| FfiEmployee::from_employee(e, today))
            .ok_or(DermaAdminError::NotFound(id))
    }

    pub fn update_employee(
        &self,
        id: String,
        input: FfiEmployeeInput,
    ) -> Result<bool, DermaAdminError> {
        let mut session = self.session.lock()?;
        Ok(session.update_employee(&id, input.try_into()?, Utc::now())?)
    }

    pub fn delete_employees(&self, ids: Vec<String>) -> Result<u32, DermaAdminError> {
        let mut session = self.session.lock()?;
        let ids: HashSet<String> = ids.into_iter().collect();
        Ok(session.delete_employees(&ids) as u32)
    }

    pub fn staff_stats(&self) -> Result<FfiStaffStats, DermaAdminError> {
        let session = self.session.lock()?;
        Ok(session.staff_stats().into())
    }

    /// Capture one staff filter control change (`search`, `role`, `status`).
    pub fn change_staff_filter(&self, key: String, value: String) -> Result<(), DermaAdminError> {
        let mut session = self.session.lock()?;
        Ok(session.staff_filters().capture_pair(&key, &value)?)
    }

    pub fn clear_staff_filters(&self) -> Result<(), DermaAdminError> {
        let mut session = self.session.lock()?;
        session.staff_filters().clear();
        Ok(())
    }

    // =========================================================================
    // Prescription Operations
    // =========================================================================

    pub fn list_prescriptions(&self) -> Result<Vec<FfiPrescription>, DermaAdminError> {
        let session = self.session.lock()?;
        Ok(session
            .visible_prescriptions()
            .iter()
            .map(FfiPrescription::from)
            .collect())
    }

    pub fn get_prescription(&self, id: String) -> Result<Option<FfiPrescription>, DermaAdminError> {
        let session = self.session.lock()?;
        Ok(session.prescriptions().get(&id).map(FfiPrescription::from))
    }

    /// Create a prescription. Fails with a validation error if no medication has a name.
    pub fn create_prescription(
        &self,
        input: FfiPrescriptionInput,
    ) -> Result<FfiPrescription, DermaAdminError> {
        let mut session = self.session.lock()?;
        let id = session.create_prescription(input.try_into()?, Utc::now())?;
        session
            .prescriptions()
            .get(&id)
            .map(FfiPrescription::from)
            .ok_or(DermaAdminError::NotFound(id))
    }

    pub fn update_prescription(
        &self,
        id: String,
        input: FfiPrescriptionInput,
    ) -> Result<bool, DermaAdminError> {
        let mut session = self.session.lock()?;
        Ok(session.update_prescription(&id, input.try_into()?, Utc::now())?)
    }

    pub fn delete_prescriptions(&self, ids: Vec<String>) -> Result<u32, DermaAdminError> {
        let mut session = self.session.lock()?;
        let ids: HashSet<String> = ids.into_iter().collect();
        Ok(session.delete_prescriptions(&ids) as u32)
    }

    /// Complete, cancel or reactivate a prescription. Returns false if the
    /// prescription is unknown or the transition was refused.
    pub fn set_prescription_status(
        &self,
        id: String,
        status: String,
    ) -> Result<bool, DermaAdminError> {
        let status: PrescriptionStatus = status.parse()?;
        let mut session = self.session.lock()?;
        Ok(session.set_prescription_status(&id, status))
    }

    pub fn prescription_stats(&self) -> Result<FfiPrescriptionStats, DermaAdminError> {
        let session = self.session.lock()?;
        Ok(stats::derive_prescription_stats_now(session.prescriptions()).into())
    }

    /// Capture one prescription filter control change
    /// (`search`, `status`, `patient`, `doctor`, `dateRange`).
    pub fn change_prescription_filter(
        &self,
        key: String,
        value: String,
    ) -> Result<(), DermaAdminError> {
        let mut session = self.session.lock()?;
        Ok(session.prescription_filters().capture_pair(&key, &value)?)
    }

    pub fn clear_prescription_filters(&self) -> Result<(), DermaAdminError> {
        let mut session = self.session.lock()?;
        session.prescription_filters().clear();
        Ok(())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient. Dates are `YYYY-MM-DD`, timestamps RFC 3339.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub age: u32,
    pub gender: String,
    pub medical_history: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl FfiPatient {
    fn from_patient(patient: &Patient, today: NaiveDate) -> Self {
        Self {
            id: patient.id.clone(),
            name: patient.name.clone(),
            email: patient.email.clone(),
            phone: patient.phone.clone(),
            date_of_birth: format_date(patient.date_of_birth),
            age: patient.age_on(today),
            gender: patient.gender.to_string(),
            medical_history: patient.medical_history.clone(),
            created_at: patient.created_at.to_rfc3339(),
            updated_at: patient.updated_at.to_rfc3339(),
        }
    }
}

/// FFI-safe patient form submission.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub gender: String,
    pub medical_history: Option<String>,
}

impl TryFrom<FfiPatientInput> for PatientInput {
    type Error = DermaAdminError;

    fn try_from(input: FfiPatientInput) -> Result<Self, Self::Error> {
        Ok(PatientInput {
            name: input.name,
            email: input.email,
            phone: input.phone,
            date_of_birth: parse_date(&input.date_of_birth)?,
            gender: input.gender.parse()?,
            medical_history: input.medical_history,
        })
    }
}

/// FFI-safe employee.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiEmployee {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub specialty: Option<String>,
    pub role: String,
    pub role_label: String,
    pub hire_date: String,
    pub seniority: String,
    pub status: String,
}

impl FfiEmployee {
    fn from_employee(employee: &Employee, today: NaiveDate) -> Self {
        Self {
            id: employee.id.clone(),
            name: employee.name.clone(),
            email: employee.email.clone(),
            phone: employee.phone.clone(),
            specialty: employee.specialty.clone(),
            role: employee.role.to_string(),
            role_label: employee.role.label().to_string(),
            hire_date: format_date(employee.hire_date),
            seniority: employee.seniority_on(today).to_string(),
            status: employee.status.to_string(),
        }
    }
}

/// FFI-safe employee form submission.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiEmployeeInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub specialty: Option<String>,
    pub role: String,
    pub hire_date: String,
    pub status: String,
}

impl TryFrom<FfiEmployeeInput> for EmployeeInput {
    type Error = DermaAdminError;

    fn try_from(input: FfiEmployeeInput) -> Result<Self, Self::Error> {
        Ok(EmployeeInput {
            name: input.name,
            email: input.email,
            phone: input.phone,
            specialty: input.specialty,
            role: input.role.parse()?,
            hire_date: parse_date(&input.hire_date)?,
            status: input.status.parse()?,
        })
    }
}

/// FFI-safe medication line.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedication {
    /// Empty for rows added in the form
    pub id: Option<String>,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub instructions: Option<String>,
}

impl From<&Medication> for FfiMedication {
    fn from(med: &Medication) -> Self {
        Self {
            id: Some(med.id.clone()),
            name: med.name.clone(),
            dosage: med.dosage.clone(),
            frequency: med.frequency.clone(),
            duration: med.duration.clone(),
            instructions: med.instructions.clone(),
        }
    }
}

impl From<FfiMedication> for MedicationInput {
    fn from(med: FfiMedication) -> Self {
        MedicationInput {
            id: med.id.filter(|id| !id.is_empty()),
            name: med.name,
            dosage: med.dosage,
            frequency: med.frequency,
            duration: med.duration,
            instructions: med.instructions,
        }
    }
}

/// FFI-safe prescription.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescription {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub medications: Vec<FfiMedication>,
    pub diagnosis: String,
    pub instructions: String,
    pub date: String,
    pub status: String,
    pub status_label: String,
    pub follow_up_date: Option<String>,
    pub notes: Option<String>,
}

impl From<&Prescription> for FfiPrescription {
    fn from(rx: &Prescription) -> Self {
        Self {
            id: rx.id.clone(),
            patient_id: rx.patient_id.clone(),
            patient_name: rx.patient_name.clone(),
            doctor_id: rx.doctor_id.clone(),
            doctor_name: rx.doctor_name.clone(),
            medications: rx.medications.iter().map(FfiMedication::from).collect(),
            diagnosis: rx.diagnosis.clone(),
            instructions: rx.instructions.clone(),
            date: format_date(rx.date),
            status: rx.status.to_string(),
            status_label: rx.status.label().to_string(),
            follow_up_date: rx.follow_up_date.map(format_date),
            notes: rx.notes.clone(),
        }
    }
}

/// FFI-safe prescription form submission.
///
/// Patient and doctor names may be left empty; they are filled from the
/// current records when the ids match.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescriptionInput {
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub medications: Vec<FfiMedication>,
    pub diagnosis: String,
    pub instructions: String,
    pub date: String,
    pub status: String,
    pub follow_up_date: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<FfiPrescriptionInput> for PrescriptionInput {
    type Error = DermaAdminError;

    fn try_from(input: FfiPrescriptionInput) -> Result<Self, Self::Error> {
        Ok(PrescriptionInput {
            patient_id: input.patient_id,
            patient_name: input.patient_name,
            doctor_id: input.doctor_id,
            doctor_name: input.doctor_name,
            medications: input.medications.into_iter().map(Into::into).collect(),
            diagnosis: input.diagnosis,
            instructions: input.instructions,
            date: parse_date(&input.date)?,
            status: input.status.parse()?,
            follow_up_date: parse_optional_date(input.follow_up_date)?,
            notes: input.notes,
        })
    }
}

/// FFI-safe patient stats.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientStats {
    pub total: u32,
    pub female: u32,
    pub male: u32,
    pub this_month: u32,
}

impl From<PatientStats> for FfiPatientStats {
    fn from(stats: PatientStats) -> Self {
        Self {
            total: stats.total as u32,
            female: stats.female as u32,
            male: stats.male as u32,
            this_month: stats.this_month as u32,
        }
    }
}

/// FFI-safe prescription stats.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescriptionStats {
    pub total: u32,
    pub active: u32,
    pub completed: u32,
    pub cancelled: u32,
    pub this_month: u32,
}

impl From<PrescriptionStats> for FfiPrescriptionStats {
    fn from(stats: PrescriptionStats) -> Self {
        Self {
            total: stats.total as u32,
            active: stats.active as u32,
            completed: stats.completed as u32,
            cancelled: stats.cancelled as u32,
            this_month: stats.this_month as u32,
        }
    }
}

/// FFI-safe staff stats.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStaffStats {
    pub total: u32,
    pub doctors: u32,
    pub nurses: u32,
    pub administrative: u32,
    pub active: u32,
    pub inactive: u32,
}

impl From<StaffStats> for FfiStaffStats {
    fn from(stats: StaffStats) -> Self {
        Self {
            total: stats.total as u32,
            doctors: stats.doctors as u32,
            nurses: stats.nurses as u32,
            administrative: stats.administrative as u32,
            active: stats.active as u32,
            inactive: stats.inactive as u32,
        }
    }
}
