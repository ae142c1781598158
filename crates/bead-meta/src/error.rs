/// Errors raised while constructing metadata values
#[derive(Debug, thiserror::Error)]
pub enum MetaError {
    /// Freeze time does not follow the bead timestamp format
    #[error("invalid freeze time '{value}': {source}")]
    InvalidFreezeTime {
        /// Rejected text
        value: String,
        /// Why `chrono` rejected it
        #[source]
        source: chrono::ParseError,
    },

    /// Bead name is empty after stripping the timestamp suffix
    #[error("cannot derive a bead name from '{0}'")]
    InvalidName(String),
}

impl MetaError {
    /// Create invalid freeze time error
    pub fn invalid_freeze_time(value: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::InvalidFreezeTime {
            value: value.into(),
            source,
        }
    }
}
