use thiserror::Error;

/// Failure surfaced by a collaborator call.
///
/// This is only one of the two error channels: the deliveries lookups
/// additionally return a data-layer error string next to their data, and
/// that channel is never folded into this type.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The collaborator could not be reached or answered abnormally.
    #[error("{0}")]
    Unavailable(String),

    /// The collaborator refused a mutation.
    #[error("{0}")]
    Rejected(String),
}
