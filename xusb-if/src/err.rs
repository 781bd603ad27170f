use alloc::string::String;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PadctlError {
    #[error("Timeout")]
    Timeout,
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Hardware sequence error: {0}")]
    HardwareSequence(String),
    #[error("Rejected: {0}")]
    Rejected(String),
    #[error("Not supported")]
    NotSupported,
}

impl PadctlError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::ResourceUnavailable(msg.into())
    }

    pub fn hw(msg: impl Into<String>) -> Self {
        Self::HardwareSequence(msg.into())
    }
}
