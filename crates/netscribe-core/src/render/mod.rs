// ── Document rendering ──

use serde::{Deserialize, Serialize};

use crate::model::SiteSnapshot;

mod markdown;

/// Maximum client rows printed per list in human-readable output.
/// Longer lists end with an exact "... and N more" summary line.
pub const CLIENT_DISPLAY_CAP: usize = 10;

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Markdown,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("could not encode snapshot: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Render a snapshot to document bytes.
///
/// Markdown is the human-readable report with capped client lists;
/// JSON is the lossless machine format — deserializing it yields a
/// snapshot equal to the input.
pub fn render(snapshot: &SiteSnapshot, format: OutputFormat) -> Result<Vec<u8>, RenderError> {
    match format {
        OutputFormat::Markdown => Ok(markdown::render(snapshot).into_bytes()),
        OutputFormat::Json => Ok(serde_json::to_vec_pretty(snapshot)?),
    }
}
