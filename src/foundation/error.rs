pub type TideloopResult<T> = Result<T, TideloopError>;

/// Errors surfaced by rendering, playback and export.
///
/// Invalid color input is never an error at the [`crate::normalize`] boundary; it is recovered
/// locally by substituting the fallback color.
#[derive(thiserror::Error, Debug)]
pub enum TideloopError {
    /// Input that fails a documented precondition (non-positive duration, zero frame rate, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// Raster surface could not be prepared or painted.
    #[error("render error: {0}")]
    Render(String),

    /// Frame capture or encoder failure during an export job.
    #[error("export error: {0}")]
    Export(String),

    /// A mounted presentation region (or its surface) could not be resolved.
    #[error("Target element not found: {0}")]
    TargetNotFound(String),

    /// An export job is already in flight on this trigger.
    #[error("an export is already in progress")]
    ExportBusy,

    /// Configuration file could not be read or is invalid.
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TideloopError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    pub fn target_not_found(id: impl Into<String>) -> Self {
        Self::TargetNotFound(id.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
