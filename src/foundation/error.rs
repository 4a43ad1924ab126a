/// Convenience result type used across ripplefx.
pub type RippleResult<T> = Result<T, RippleError>;

/// Error taxonomy for the transition pipeline.
///
/// None of these are fatal to a host: the controller routes each kind to a recovery path
/// (fallback synthesis, placeholder bands, or a silent skip to the new layout).
#[derive(thiserror::Error, Debug)]
pub enum RippleError {
    /// Rasterizing the live region failed (threw, rejected, or produced an empty image).
    #[error("capture error: {0}")]
    Capture(String),

    /// The content region was not present when a transition was requested.
    #[error("missing region: {0}")]
    MissingRegion(String),

    /// The fallback synthesizer could not build its structured placeholder.
    #[error("synthesis error: {0}")]
    Synthesis(String),

    /// Invalid configuration or malformed pixel data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Compositing or surface allocation failed.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RippleError {
    /// Build a [`RippleError::Capture`] value.
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Build a [`RippleError::MissingRegion`] value.
    pub fn missing_region(msg: impl Into<String>) -> Self {
        Self::MissingRegion(msg.into())
    }

    /// Build a [`RippleError::Synthesis`] value.
    pub fn synthesis(msg: impl Into<String>) -> Self {
        Self::Synthesis(msg.into())
    }

    /// Build a [`RippleError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RippleError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
