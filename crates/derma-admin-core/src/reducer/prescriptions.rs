//! Prescription reducer rules and status transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::Editable;
use crate::models::{Prescription, PrescriptionInput, PrescriptionStatus};
use crate::store::Collection;

impl Editable for Prescription {
    type Input = PrescriptionInput;

    fn create(id: String, input: PrescriptionInput, _now: DateTime<Utc>) -> Self {
        Prescription::new(id, input)
    }

    fn edit(&self, input: PrescriptionInput, _now: DateTime<Utc>) -> Self {
        Prescription::new(self.id.clone(), input)
    }
}

/// Whether [`set_status`] checks the transition table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Only table transitions are applied; others leave the collection unchanged.
    #[default]
    Enforce,
    /// Any status may be set from any status.
    Permissive,
}

/// Set the status of the prescription with `id`, leaving every other field alone.
///
/// Unknown ids, and transitions refused under [`TransitionPolicy::Enforce`],
/// return an equal collection.
pub fn set_status(
    collection: &Collection<Prescription>,
    id: &str,
    status: PrescriptionStatus,
    policy: TransitionPolicy,
) -> Collection<Prescription> {
    let Some(index) = collection.position(id) else {
        debug!(id = %id, "Status change ignored, prescription not found");
        return collection.clone();
    };

    let current = &collection.entries()[index];
    if policy == TransitionPolicy::Enforce && !current.status.can_transition_to(status) {
        warn!(
            id = %id,
            from = %current.status,
            to = %status,
            "Refused prescription status transition"
        );
        return collection.clone();
    }

    let mut updated = Prescription::clone(current);
    updated.status = status;
    collection.with_replaced(index, updated)
}
