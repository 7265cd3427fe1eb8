//! In-memory entity store.
//!
//! There is no database: a session starts from the seed collections and
//! holds the current [`Collection`] of each entity type until it ends.

mod collection;
pub mod seed;

pub use collection::*;
