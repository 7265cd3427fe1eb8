//! Prescription models.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{Employee, Entity, ParseEnumError, Patient};

/// Prescription status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PrescriptionStatus {
    /// Treatment in progress
    Active,
    /// Treatment finished
    Completed,
    /// Treatment stopped
    Cancelled,
}

impl PrescriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrescriptionStatus::Active => "active",
            PrescriptionStatus::Completed => "completed",
            PrescriptionStatus::Cancelled => "cancelled",
        }
    }

    /// Display label used in the status badge.
    pub fn label(&self) -> &'static str {
        match self {
            PrescriptionStatus::Active => "Activa",
            PrescriptionStatus::Completed => "Completada",
            PrescriptionStatus::Cancelled => "Cancelada",
        }
    }

    /// Check the transition table.
    ///
    /// `active` may move to `completed` or `cancelled`; both of those may only
    /// be reactivated. A status never transitions to itself.
    pub fn can_transition_to(&self, target: PrescriptionStatus) -> bool {
        use PrescriptionStatus::*;
        matches!(
            (self, target),
            (Active, Completed) | (Active, Cancelled) | (Completed, Active) | (Cancelled, Active)
        )
    }
}

impl fmt::Display for PrescriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrescriptionStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(PrescriptionStatus::Active),
            "completed" => Ok(PrescriptionStatus::Completed),
            "cancelled" => Ok(PrescriptionStatus::Cancelled),
            _ => Err(ParseEnumError::new("prescription status", s)),
        }
    }
}

/// A single medication line on a prescription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    pub id: String,
    /// Drug name
    pub name: String,
    /// Dosage (e.g., "5%", "0.1%")
    pub dosage: String,
    /// Frequency (e.g., "Dos veces al día")
    pub frequency: String,
    /// Duration (e.g., "8 semanas")
    pub duration: String,
    /// Application instructions
    pub instructions: Option<String>,
}

/// Medication line as submitted by the form. Rows already on a prescription
/// keep their `id`; newly added rows have none.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationInput {
    pub id: Option<String>,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub instructions: Option<String>,
}

impl Medication {
    /// Build from form input, generating an id for new rows.
    pub fn from_input(input: MedicationInput) -> Self {
        Self {
            id: input
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: input.name,
            dosage: input.dosage,
            frequency: input.frequency,
            duration: input.duration,
            instructions: input.instructions,
        }
    }

    pub fn to_input(&self) -> MedicationInput {
        MedicationInput {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            dosage: self.dosage.clone(),
            frequency: self.frequency.clone(),
            duration: self.duration.clone(),
            instructions: self.instructions.clone(),
        }
    }
}

/// A prescription record.
///
/// Patient and doctor names are snapshots taken when the prescription was
/// written; they are not re-synced when the referenced records change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prescription {
    /// Unique identifier
    pub id: String,
    /// Patient identifier (snapshot)
    pub patient_id: String,
    /// Patient name (snapshot)
    pub patient_name: String,
    /// Prescribing doctor identifier (snapshot)
    pub doctor_id: String,
    /// Prescribing doctor name (snapshot)
    pub doctor_name: String,
    /// Ordered medication lines (never empty once validated)
    pub medications: Vec<Medication>,
    /// Diagnosis
    pub diagnosis: String,
    /// General instructions for the patient
    pub instructions: String,
    /// Date written
    pub date: NaiveDate,
    /// Status
    pub status: PrescriptionStatus,
    /// Follow-up appointment date
    pub follow_up_date: Option<NaiveDate>,
    /// Internal notes
    pub notes: Option<String>,
}

/// User-editable prescription fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionInput {
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub medications: Vec<MedicationInput>,
    pub diagnosis: String,
    pub instructions: String,
    pub date: NaiveDate,
    pub status: PrescriptionStatus,
    pub follow_up_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl PrescriptionInput {
    /// Snapshot the patient's id and name into this input.
    pub fn with_patient(mut self, patient: &Patient) -> Self {
        self.patient_id = patient.id.clone();
        self.patient_name = patient.name.clone();
        self
    }

    /// Snapshot the prescribing doctor's id and name into this input.
    pub fn with_doctor(mut self, doctor: &Employee) -> Self {
        self.doctor_id = doctor.id.clone();
        self.doctor_name = doctor.name.clone();
        self
    }
}

impl Prescription {
    /// Build a new prescription from form input.
    pub fn new(id: String, input: PrescriptionInput) -> Self {
        Self {
            id,
            patient_id: input.patient_id,
            patient_name: input.patient_name,
            doctor_id: input.doctor_id,
            doctor_name: input.doctor_name,
            medications: input
                .medications
                .into_iter()
                .map(Medication::from_input)
                .collect(),
            diagnosis: input.diagnosis,
            instructions: input.instructions,
            date: input.date,
            status: input.status,
            follow_up_date: input.follow_up_date,
            notes: input.notes,
        }
    }

    /// The editable fields of this record.
    pub fn to_input(&self) -> PrescriptionInput {
        PrescriptionInput {
            patient_id: self.patient_id.clone(),
            patient_name: self.patient_name.clone(),
            doctor_id: self.doctor_id.clone(),
            doctor_name: self.doctor_name.clone(),
            medications: self.medications.iter().map(Medication::to_input).collect(),
            diagnosis: self.diagnosis.clone(),
            instructions: self.instructions.clone(),
            date: self.date,
            status: self.status,
            follow_up_date: self.follow_up_date,
            notes: self.notes.clone(),
        }
    }

    /// Check if the prescription was written in the same calendar month as `today`.
    pub fn written_in_month_of(&self, today: NaiveDate) -> bool {
        self.date.year() == today.year() && self.date.month() == today.month()
    }
}

impl Entity for Prescription {
    fn id(&self) -> &str {
        &self.id
    }
}
