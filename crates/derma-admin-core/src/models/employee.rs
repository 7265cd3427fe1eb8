//! Staff (employee) models.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{Entity, ParseEnumError};

/// Staff role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeRole {
    Doctor,
    Nurse,
    Administrative,
}

impl EmployeeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeRole::Doctor => "doctor",
            EmployeeRole::Nurse => "nurse",
            EmployeeRole::Administrative => "administrative",
        }
    }

    /// Display label used in tables and detail views.
    pub fn label(&self) -> &'static str {
        match self {
            EmployeeRole::Doctor => "Médico",
            EmployeeRole::Nurse => "Enfermero/a",
            EmployeeRole::Administrative => "Administrativo",
        }
    }

    /// Specialty suggestions offered by the staff form for this role.
    ///
    /// Specialty stays free text; these are hints only.
    pub fn specialty_suggestions(&self) -> &'static [&'static str] {
        match self {
            EmployeeRole::Doctor => &[
                "Dermatología General",
                "Dermatología Pediátrica",
                "Dermatología Estética",
                "Cirugía Dermatológica",
                "Oncodermatología",
            ],
            EmployeeRole::Nurse => &[
                "Enfermería Dermatológica",
                "Enfermería Estética",
                "Atención al Paciente",
            ],
            EmployeeRole::Administrative => &[
                "Recepcionista",
                "Administrativo",
                "Coordinador de Citas",
                "Gestión de Pacientes",
            ],
        }
    }
}

impl fmt::Display for EmployeeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmployeeRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "doctor" => Ok(EmployeeRole::Doctor),
            "nurse" => Ok(EmployeeRole::Nurse),
            "administrative" => Ok(EmployeeRole::Administrative),
            _ => Err(ParseEnumError::new("role", s)),
        }
    }
}

/// Employment status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Active,
    Inactive,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmployeeStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(EmployeeStatus::Active),
            "inactive" => Ok(EmployeeStatus::Inactive),
            _ => Err(ParseEnumError::new("employee status", s)),
        }
    }
}

/// A staff member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    /// Unique identifier
    pub id: String,
    /// Full name
    pub name: String,
    /// Work email
    pub email: String,
    /// Work phone
    pub phone: String,
    /// Specialty (free text, see [`EmployeeRole::specialty_suggestions`])
    pub specialty: Option<String>,
    /// Role
    pub role: EmployeeRole,
    /// Hire date
    pub hire_date: NaiveDate,
    /// Employment status (changed only by explicit edits)
    pub status: EmployeeStatus,
}

/// User-editable employee fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmployeeInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub specialty: Option<String>,
    pub role: EmployeeRole,
    pub hire_date: NaiveDate,
    pub status: EmployeeStatus,
}

/// Time in service, in whole months split into years and months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seniority {
    pub years: u32,
    pub months: u32,
}

impl Seniority {
    /// Whole months elapsed between `start` and `today` (zero if `today` is earlier).
    pub fn between(start: NaiveDate, today: NaiveDate) -> Self {
        let mut months =
            (today.year() - start.year()) * 12 + today.month() as i32 - start.month() as i32;
        if today.day() < start.day() {
            months -= 1;
        }
        let months = months.max(0) as u32;
        Self {
            years: months / 12,
            months: months % 12,
        }
    }
}

impl fmt::Display for Seniority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let years = |n: u32| if n == 1 { "año" } else { "años" };
        let months = |n: u32| if n == 1 { "mes" } else { "meses" };
        match (self.years, self.months) {
            (0, 0) => f.write_str("Menos de 1 mes"),
            (y, 0) => write!(f, "{} {}", y, years(y)),
            (0, m) => write!(f, "{} {}", m, months(m)),
            (y, m) => write!(f, "{} {} y {} {}", y, years(y), m, months(m)),
        }
    }
}

impl Employee {
    /// Build a new employee from form input.
    pub fn new(id: String, input: EmployeeInput) -> Self {
        Self {
            id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            specialty: input.specialty,
            role: input.role,
            hire_date: input.hire_date,
            status: input.status,
        }
    }

    /// The editable fields of this record.
    pub fn to_input(&self) -> EmployeeInput {
        EmployeeInput {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            specialty: self.specialty.clone(),
            role: self.role,
            hire_date: self.hire_date,
            status: self.status,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }

    /// Time in service on the given day.
    pub fn seniority_on(&self, today: NaiveDate) -> Seniority {
        Seniority::between(self.hire_date, today)
    }
}

impl Entity for Employee {
    fn id(&self) -> &str {
        &self.id
    }
}
