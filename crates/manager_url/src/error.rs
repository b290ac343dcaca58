use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors raised by URL sync helpers.
///
/// Query decoding itself never fails; these surface from the strict helpers it builds on and
/// from configuration loading.
pub enum UrlSyncError {
    /// An item id component sanitized to nothing.
    #[error("invalid {part} `{raw}`: must include alphanumeric characters")]
    InvalidItemId {
        /// Which component was rejected (`kind` or `name`).
        part: &'static str,
        /// The raw component value.
        raw: String,
    },
    /// Configuration could not be parsed or failed validation.
    #[error("invalid url sync config: {0}")]
    Config(String),
}
