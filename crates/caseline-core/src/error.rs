//! Typed errors for the row-editing path.

use thiserror::Error;

/// Errors an edit operation can produce.
///
/// Fetch and save failures are not represented here: they degrade or
/// propagate as `anyhow` errors at the service seam.
#[derive(Debug, Error)]
pub enum RowsError {
    /// An indexed operation addressed a row that does not exist.
    #[error("row index {0} is out of range")]
    IndexOutOfRange(usize),

    /// A discount edit carried a value that is not a number.
    #[error("discount value {0:?} is not a number")]
    BadDiscount(String),

    /// A navigation request named a plan absent from the current catalog.
    #[error("plan {0:?} not found in the current catalog")]
    UnknownPlan(String),

    /// A row was added while the context has no contact to own it.
    #[error("cannot add a product line without a contact in context")]
    NoContact,
}
