// Run-status ledger: `generation-status.json` in the output directory,
// one record per controller, replaced on every run. Written via temp
// file + rename so a crashed run never leaves a truncated ledger.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::OutputError;

const STATUS_FILE: &str = "generation-status.json";

/// Outcome of the most recent generation attempt for one controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    /// Path of the freshest document, relative to the output dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub warnings: usize,
}

pub(super) fn update(
    dir: &Path,
    controller: &str,
    record: GenerationRecord,
) -> Result<(), OutputError> {
    let path = dir.join(STATUS_FILE);
    let mut ledger: BTreeMap<String, GenerationRecord> = match fs::read(&path) {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
        Err(_) => BTreeMap::new(),
    };
    ledger.insert(controller.to_string(), record);

    let temp = dir.join(format!(".{STATUS_FILE}.tmp"));
    let bytes = serde_json::to_vec_pretty(&ledger)
        .map_err(|source| OutputError::Encode { source })?;
    fs::write(&temp, bytes).map_err(|source| OutputError::Io { path: temp.clone(), source })?;
    fs::rename(&temp, &path).map_err(|source| OutputError::Io { path, source })
}

/// Read the ledger back, for the `health` command.
pub fn read(dir: &Path) -> Result<BTreeMap<String, GenerationRecord>, OutputError> {
    let path = dir.join(STATUS_FILE);
    match fs::read(&path) {
        Ok(bytes) => serde_json::from_slice(&bytes)
            .map_err(|source| OutputError::Encode { source }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(source) => Err(OutputError::Io { path, source }),
    }
}
