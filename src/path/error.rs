//! Error type for path normalization.

use thiserror::Error;

/// Failure while joining or normalizing a path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// A `..` segment was applied at an absolute root; root has no parent.
    #[error("can not get parent of root")]
    RootParent,
}
