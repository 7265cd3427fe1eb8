//! Filter bar state.
//!
//! Each filter control emits a one-key partial change. A [`FilterCapture`]
//! merges the changes into accumulated criteria, forwards every change to the
//! registered observer, and can narrow a collection to the matching entries.
//!
//! The date range control is captured but never evaluated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    Employee, EmployeeRole, EmployeeStatus, Gender, ParseEnumError, Patient, Prescription,
    PrescriptionStatus,
};
use crate::store::Collection;

/// Filter errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Unknown filter key: {0}")]
    UnknownKey(String),

    #[error("Invalid filter value: {0}")]
    InvalidValue(#[from] ParseEnumError),
}

pub type FilterResult<T> = Result<T, FilterError>;

/// Registration date range offered by the filter bar.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    Today,
    Week,
    Month,
    Year,
}

impl FromStr for DateRange {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(DateRange::Today),
            "week" => Ok(DateRange::Week),
            "month" => Ok(DateRange::Month),
            "year" => Ok(DateRange::Year),
            _ => Err(ParseEnumError::new("date range", s)),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DateRange::Today => "today",
            DateRange::Week => "week",
            DateRange::Month => "month",
            DateRange::Year => "year",
        })
    }
}

/// Accumulated filter criteria for one entity type.
pub trait Criteria: Default + Clone {
    type Entity;
    type Change: Clone + fmt::Debug;

    /// Fold one partial change into the criteria.
    fn merge(&mut self, change: Self::Change);

    /// The change emitted by the "clear" control.
    fn clear_change() -> Self::Change;

    /// Parse a `(key, value)` pair as emitted by the UI controls.
    /// An empty value on a select control means "all".
    fn parse_change(key: &str, value: &str) -> FilterResult<Self::Change>;

    fn matches(&self, entity: &Self::Entity) -> bool;

    fn is_empty(&self) -> bool;
}

fn search_term(value: &str) -> Option<String> {
    let term = value.trim().to_lowercase();
    (!term.is_empty()).then_some(term)
}

fn select<T: FromStr<Err = ParseEnumError>>(value: &str) -> FilterResult<Option<T>> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(value.parse()?))
    }
}

fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Case-insensitive substring match; `term` is already lowercase.
fn any_contains<'a>(term: &str, fields: impl IntoIterator<Item = &'a str>) -> bool {
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(term))
}

fn matches_select<T: PartialEq>(wanted: &Option<T>, actual: &T) -> bool {
    wanted.as_ref().map_or(true, |w| w == actual)
}

// =========================================================================
// Patients
// =========================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientCriteria {
    /// Lowercased search over name, email and phone
    pub search: Option<String>,
    pub gender: Option<Gender>,
    pub date_range: Option<DateRange>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatientFilterChange {
    Search(String),
    Gender(Option<Gender>),
    DateRange(Option<DateRange>),
    Clear,
}

impl Criteria for PatientCriteria {
    type Entity = Patient;
    type Change = PatientFilterChange;

    fn merge(&mut self, change: PatientFilterChange) {
        match change {
            PatientFilterChange::Search(text) => self.search = search_term(&text),
            PatientFilterChange::Gender(gender) => self.gender = gender,
            PatientFilterChange::DateRange(range) => self.date_range = range,
            PatientFilterChange::Clear => *self = Self::default(),
        }
    }

    fn clear_change() -> PatientFilterChange {
        PatientFilterChange::Clear
    }

    fn parse_change(key: &str, value: &str) -> FilterResult<PatientFilterChange> {
        match key {
            "search" => Ok(PatientFilterChange::Search(value.to_string())),
            "gender" => Ok(PatientFilterChange::Gender(select(value)?)),
            "dateRange" | "date_range" => Ok(PatientFilterChange::DateRange(select(value)?)),
            _ => Err(FilterError::UnknownKey(key.to_string())),
        }
    }

    fn matches(&self, patient: &Patient) -> bool {
        let search_ok = self.search.as_deref().map_or(true, |term| {
            any_contains(
                term,
                [
                    patient.name.as_str(),
                    patient.email.as_str(),
                    patient.phone.as_str(),
                ],
            )
        });
        search_ok && matches_select(&self.gender, &patient.gender)
    }

    fn is_empty(&self) -> bool {
        self.search.is_none() && self.gender.is_none() && self.date_range.is_none()
    }
}

// =========================================================================
// Prescriptions
// =========================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrescriptionCriteria {
    /// Lowercased search over patient name, doctor name and diagnosis
    pub search: Option<String>,
    pub status: Option<PrescriptionStatus>,
    /// Patient identifier
    pub patient: Option<String>,
    /// Doctor identifier
    pub doctor: Option<String>,
    pub date_range: Option<DateRange>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrescriptionFilterChange {
    Search(String),
    Status(Option<PrescriptionStatus>),
    Patient(Option<String>),
    Doctor(Option<String>),
    DateRange(Option<DateRange>),
    Clear,
}

impl Criteria for PrescriptionCriteria {
    type Entity = Prescription;
    type Change = PrescriptionFilterChange;

    fn merge(&mut self, change: PrescriptionFilterChange) {
        match change {
            PrescriptionFilterChange::Search(text) => self.search = search_term(&text),
            PrescriptionFilterChange::Status(status) => self.status = status,
            PrescriptionFilterChange::Patient(id) => self.patient = id,
            PrescriptionFilterChange::Doctor(id) => self.doctor = id,
            PrescriptionFilterChange::DateRange(range) => self.date_range = range,
            PrescriptionFilterChange::Clear => *self = Self::default(),
        }
    }

    fn clear_change() -> PrescriptionFilterChange {
        PrescriptionFilterChange::Clear
    }

    fn parse_change(key: &str, value: &str) -> FilterResult<PrescriptionFilterChange> {
        match key {
            "search" => Ok(PrescriptionFilterChange::Search(value.to_string())),
            "status" => Ok(PrescriptionFilterChange::Status(select(value)?)),
            "patient" => Ok(PrescriptionFilterChange::Patient(optional_text(value))),
            "doctor" => Ok(PrescriptionFilterChange::Doctor(optional_text(value))),
            "dateRange" | "date_range" => {
                Ok(PrescriptionFilterChange::DateRange(select(value)?))
            }
            _ => Err(FilterError::UnknownKey(key.to_string())),
        }
    }

    fn matches(&self, rx: &Prescription) -> bool {
        let search_ok = self.search.as_deref().map_or(true, |term| {
            any_contains(
                term,
                [
                    rx.patient_name.as_str(),
                    rx.doctor_name.as_str(),
                    rx.diagnosis.as_str(),
                ],
            )
        });
        search_ok
            && matches_select(&self.status, &rx.status)
            && matches_select(&self.patient, &rx.patient_id)
            && matches_select(&self.doctor, &rx.doctor_id)
    }

    fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.status.is_none()
            && self.patient.is_none()
            && self.doctor.is_none()
            && self.date_range.is_none()
    }
}

// =========================================================================
// Staff
// =========================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaffCriteria {
    /// Lowercased search over name, email and specialty
    pub search: Option<String>,
    pub role: Option<EmployeeRole>,
    pub status: Option<EmployeeStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaffFilterChange {
    Search(String),
    Role(Option<EmployeeRole>),
    Status(Option<EmployeeStatus>),
    Clear,
}

impl Criteria for StaffCriteria {
    type Entity = Employee;
    type Change = StaffFilterChange;

    fn merge(&mut self, change: StaffFilterChange) {
        match change {
            StaffFilterChange::Search(text) => self.search = search_term(&text),
            StaffFilterChange::Role(role) => self.role = role,
            StaffFilterChange::Status(status) => self.status = status,
            StaffFilterChange::Clear => *self = Self::default(),
        }
    }

    fn clear_change() -> StaffFilterChange {
        StaffFilterChange::Clear
    }

    fn parse_change(key: &str, value: &str) -> FilterResult<StaffFilterChange> {
        match key {
            "search" => Ok(StaffFilterChange::Search(value.to_string())),
            "role" => Ok(StaffFilterChange::Role(select(value)?)),
            "status" => Ok(StaffFilterChange::Status(select(value)?)),
            _ => Err(FilterError::UnknownKey(key.to_string())),
        }
    }

    fn matches(&self, employee: &Employee) -> bool {
        let search_ok = self.search.as_deref().map_or(true, |term| {
            any_contains(
                term,
                [
                    employee.name.as_str(),
                    employee.email.as_str(),
                    employee.specialty.as_deref().unwrap_or(""),
                ],
            )
        });
        search_ok
            && matches_select(&self.role, &employee.role)
            && matches_select(&self.status, &employee.status)
    }

    fn is_empty(&self) -> bool {
        self.search.is_none() && self.role.is_none() && self.status.is_none()
    }
}

// =========================================================================
// Capture
// =========================================================================

/// Observer invoked with each change and the criteria after merging it.
pub type FilterObserver<C> = Box<dyn FnMut(&<C as Criteria>::Change, &C) + Send>;

/// Accumulates filter changes for one list view.
pub struct FilterCapture<C: Criteria> {
    criteria: C,
    observer: Option<FilterObserver<C>>,
}

impl<C: Criteria> Default for FilterCapture<C> {
    fn default() -> Self {
        Self {
            criteria: C::default(),
            observer: None,
        }
    }
}

impl<C: Criteria> fmt::Debug for FilterCapture<C>
where
    C: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterCapture")
            .field("criteria", &self.criteria)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl<C: Criteria> FilterCapture<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler that receives every change. Replaces any previous one.
    pub fn register(&mut self, observer: impl FnMut(&C::Change, &C) + Send + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Merge one partial change and notify the observer.
    pub fn capture_filter_change(&mut self, change: C::Change) {
        tracing::debug!(?change, "Filter changed");
        self.criteria.merge(change.clone());
        if let Some(observer) = self.observer.as_mut() {
            observer(&change, &self.criteria);
        }
    }

    /// Parse a UI `(key, value)` pair and capture it.
    pub fn capture_pair(&mut self, key: &str, value: &str) -> FilterResult<()> {
        let change = C::parse_change(key, value)?;
        self.capture_filter_change(change);
        Ok(())
    }

    /// Reset every control.
    pub fn clear(&mut self) {
        self.capture_filter_change(C::clear_change());
    }

    pub fn criteria(&self) -> &C {
        &self.criteria
    }

    /// Entries of `collection` matching the current criteria.
    pub fn apply(&self, collection: &Collection<C::Entity>) -> Collection<C::Entity> {
        if self.criteria.is_empty() {
            return collection.clone();
        }
        collection.retained(|entity| self.criteria.matches(entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_changes_accumulate_one_key_at_a_time() {
        let mut capture = FilterCapture::<PatientCriteria>::new();
        capture.capture_filter_change(PatientFilterChange::Search("  GONZ ".into()));
        capture.capture_filter_change(PatientFilterChange::Gender(Some(Gender::Female)));

        assert_eq!(capture.criteria().search.as_deref(), Some("gonz"));
        assert_eq!(capture.criteria().gender, Some(Gender::Female));
    }

    #[test]
    fn test_observer_sees_each_change_and_merged_state() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut capture = FilterCapture::<StaffCriteria>::new();
        capture.register(move |change, criteria| {
            sink.lock()
                .unwrap()
                .push((change.clone(), criteria.clone()));
        });

        capture.capture_pair("role", "doctor").unwrap();
        capture.capture_pair("status", "inactive").unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, StaffFilterChange::Role(Some(EmployeeRole::Doctor)));
        assert_eq!(seen[1].1.role, Some(EmployeeRole::Doctor));
        assert_eq!(seen[1].1.status, Some(EmployeeStatus::Inactive));
    }

    #[test]
    fn test_empty_select_means_all() {
        let mut capture = FilterCapture::<StaffCriteria>::new();
        capture.capture_pair("role", "nurse").unwrap();
        capture.capture_pair("role", "").unwrap();
        assert!(capture.criteria().is_empty());
    }

    #[test]
    fn test_unknown_key_and_value_rejected() {
        let mut capture = FilterCapture::<PatientCriteria>::new();
        assert_eq!(
            capture.capture_pair("age", "40"),
            Err(FilterError::UnknownKey("age".into()))
        );
        assert!(matches!(
            capture.capture_pair("gender", "robot"),
            Err(FilterError::InvalidValue(_))
        ));
        assert!(capture.criteria().is_empty());
    }

    #[test]
    fn test_apply_patient_search_and_gender() {
        let patients = seed::patients();
        let mut capture = FilterCapture::<PatientCriteria>::new();

        capture.capture_pair("search", "email.com").unwrap();
        assert_eq!(capture.apply(&patients).len(), 5);

        capture.capture_pair("gender", "male").unwrap();
        let names: Vec<_> = capture.apply(&patients).iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, vec!["Carlos Rodríguez", "Pedro Sánchez"]);

        capture.capture_pair("search", "+34 645").unwrap();
        assert_eq!(capture.apply(&patients).ids(), vec!["4"]);
    }

    #[test]
    fn test_date_range_captured_but_not_evaluated() {
        let patients = seed::patients();
        let mut capture = FilterCapture::<PatientCriteria>::new();
        capture.capture_pair("dateRange", "today").unwrap();

        assert_eq!(capture.criteria().date_range, Some(DateRange::Today));
        assert_eq!(capture.apply(&patients).len(), patients.len());
    }

    #[test]
    fn test_apply_prescription_filters() {
        let prescriptions = seed::prescriptions();
        let mut capture = FilterCapture::<PrescriptionCriteria>::new();

        capture.capture_pair("search", "psoriasis").unwrap();
        assert_eq!(capture.apply(&prescriptions).ids(), vec!["2"]);

        capture.capture_pair("search", "").unwrap();
        capture.capture_pair("status", "active").unwrap();
        assert_eq!(capture.apply(&prescriptions).ids(), vec!["1"]);

        capture.capture_pair("doctor", "2").unwrap();
        assert!(capture.apply(&prescriptions).is_empty());
    }

    #[test]
    fn test_apply_staff_search_matches_specialty() {
        let staff = seed::employees();
        let mut capture = FilterCapture::<StaffCriteria>::new();
        capture.capture_pair("search", "pediátrica").unwrap();
        assert_eq!(capture.apply(&staff).ids(), vec!["5"]);
    }

    #[test]
    fn test_clear_resets_and_notifies() {
        let cleared = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&cleared);

        let mut capture = FilterCapture::<PrescriptionCriteria>::new();
        capture.capture_pair("status", "cancelled").unwrap();
        capture.register(move |change, criteria| {
            if *change == PrescriptionFilterChange::Clear {
                *flag.lock().unwrap() = criteria.is_empty();
            }
        });
        capture.clear();

        assert!(capture.criteria().is_empty());
        assert!(*cleared.lock().unwrap());
    }
}
