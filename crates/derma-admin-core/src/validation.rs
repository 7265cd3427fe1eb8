//! Form-layer validation.
//!
//! Submissions are checked here before they reach a reducer. A rejected
//! submission leaves the collection untouched.

use thiserror::Error;

use crate::models::{
    non_blank, EmployeeInput, MedicationInput, PatientInput, PrescriptionInput,
    PrescriptionStatus,
};

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field is empty: {0}")]
    MissingField(&'static str),

    #[error("At least one medication is required")]
    NoMedications,

    #[error("Medication {index} is missing {field}")]
    IncompleteMedication { index: usize, field: &'static str },

    #[error("Unknown patient: {0}")]
    UnknownPatient(String),

    #[error("Not a doctor: {0}")]
    UnknownDoctor(String),

    #[error("Status cannot change from {from} to {to}")]
    StatusTransition {
        from: PrescriptionStatus,
        to: PrescriptionStatus,
    },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

fn required(field: &'static str, value: &str) -> ValidationResult<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(value.to_string())
    }
}

/// Check and trim a patient submission.
pub fn validate_patient(input: PatientInput) -> ValidationResult<PatientInput> {
    Ok(PatientInput {
        name: required("name", &input.name)?,
        email: required("email", &input.email)?,
        phone: required("phone", &input.phone)?,
        medical_history: non_blank(input.medical_history),
        ..input
    })
}

/// Check and trim an employee submission.
pub fn validate_employee(input: EmployeeInput) -> ValidationResult<EmployeeInput> {
    Ok(EmployeeInput {
        name: required("name", &input.name)?,
        email: required("email", &input.email)?,
        phone: required("phone", &input.phone)?,
        specialty: non_blank(input.specialty),
        ..input
    })
}

/// Check a prescription submission.
///
/// Medication rows with a blank name are dropped; if none remain the
/// submission is rejected. Every kept row needs dosage, frequency and duration.
/// Errors report the row's position in the submitted form.
pub fn validate_prescription(input: PrescriptionInput) -> ValidationResult<PrescriptionInput> {
    let patient_id = required("patient", &input.patient_id)?;
    let doctor_id = required("doctor", &input.doctor_id)?;
    let diagnosis = required("diagnosis", &input.diagnosis)?;
    let instructions = required("instructions", &input.instructions)?;

    let medications = input
        .medications
        .into_iter()
        .enumerate()
        .filter(|(_, med)| !med.name.trim().is_empty())
        .map(|(index, med)| validate_medication(index, med))
        .collect::<ValidationResult<Vec<_>>>()?;

    if medications.is_empty() {
        return Err(ValidationError::NoMedications);
    }

    Ok(PrescriptionInput {
        patient_id,
        doctor_id,
        diagnosis,
        instructions,
        medications,
        notes: non_blank(input.notes),
        ..input
    })
}

fn validate_medication(index: usize, med: MedicationInput) -> ValidationResult<MedicationInput> {
    let field = |name: &'static str, value: &str| {
        required(name, value)
            .map_err(|_| ValidationError::IncompleteMedication { index, field: name })
    };
    Ok(MedicationInput {
        name: med.name.trim().to_string(),
        dosage: field("dosage", &med.dosage)?,
        frequency: field("frequency", &med.frequency)?,
        duration: field("duration", &med.duration)?,
        instructions: non_blank(med.instructions),
        ..med
    })
}
