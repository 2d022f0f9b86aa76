use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum DrawError {
    #[error("invalid capacity '{raw}': {reason}")]
    InvalidCapacity { raw: String, reason: String },

    #[error("roster rejected: {}", violations.join("; "))]
    CapacityExceeded { violations: Vec<String> },

    #[error("draw not configured: no {missing} available")]
    NotConfigured { missing: String },

    #[error("record {external_id} not found")]
    RecordNotFound { external_id: String },
}
