use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::canonical::CanonicalAgencyInfo;
use crate::domain::common::RecordId;
use crate::domain::form::FlexibleFormState;
use crate::errors::{IntakeError, Result};
use crate::utils::paths::{self, ensure_dir, write_atomic};

use super::SubmissionStore;

/// Stores each record as pretty-printed JSON under
/// `<root>/submissions/<id>.json` and `<root>/drafts/<id>.json`.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    submissions_dir: PathBuf,
    drafts_dir: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = paths::resolve_base(root);
        ensure_dir(&root)?;
        let submissions_dir = paths::submissions_dir_in(&root);
        let drafts_dir = paths::drafts_dir_in(&root);
        ensure_dir(&submissions_dir)?;
        ensure_dir(&drafts_dir)?;
        Ok(Self {
            root,
            submissions_dir,
            drafts_dir,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn submission_path(&self, record: &RecordId) -> PathBuf {
        self.submissions_dir.join(format!("{}.json", record))
    }

    pub fn draft_path(&self, record: &RecordId) -> PathBuf {
        self.drafts_dir.join(format!("{}.json", record))
    }

    /// Ids of every stored submission, sorted.
    pub fn list_submissions(&self) -> Result<Vec<RecordId>> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.submissions_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(record) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<RecordId>().ok())
            {
                records.push(record);
            }
        }
        records.sort_by_key(|record| record.0);
        Ok(records)
    }
}

impl SubmissionStore for JsonStorage {
    fn save(&self, record: &RecordId, info: &CanonicalAgencyInfo) -> Result<()> {
        let path = self.submission_path(record);
        write_json(&path, info)?;
        info!(%record, path = %path.display(), "submission stored");
        Ok(())
    }

    fn load(&self, record: &RecordId) -> Result<CanonicalAgencyInfo> {
        read_json(&self.submission_path(record), record)
    }

    fn save_draft(&self, record: &RecordId, state: &FlexibleFormState) -> Result<()> {
        let path = self.draft_path(record);
        write_json(&path, state)?;
        debug!(%record, "draft saved");
        Ok(())
    }

    fn load_draft(&self, record: &RecordId) -> Result<FlexibleFormState> {
        read_json(&self.draft_path(record), record)
    }

    fn discard_draft(&self, record: &RecordId) -> Result<()> {
        let path = self.draft_path(record);
        if path.exists() {
            fs::remove_file(&path)?;
            debug!(%record, "draft discarded");
        }
        Ok(())
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_atomic(path, &json)
}

fn read_json<T: DeserializeOwned>(path: &Path, record: &RecordId) -> Result<T> {
    if !path.exists() {
        return Err(IntakeError::RecordNotFound(record.to_string()));
    }
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(Some(temp.path().to_path_buf())).expect("json storage");
        (storage, temp)
    }

    #[test]
    fn draft_roundtrip_and_discard() {
        let (storage, _guard) = storage_with_temp_dir();
        let record = RecordId::new();
        let state = FlexibleFormState {
            legal_name: "Helping Hands".into(),
            ..Default::default()
        };
        storage.save_draft(&record, &state).expect("save draft");
        assert_eq!(storage.load_draft(&record).expect("load draft"), state);

        storage.discard_draft(&record).expect("discard");
        storage.discard_draft(&record).expect("discard twice");
        assert!(matches!(
            storage.load_draft(&record),
            Err(IntakeError::RecordNotFound(_))
        ));
    }

    #[test]
    fn missing_submission_is_not_found() {
        let (storage, _guard) = storage_with_temp_dir();
        assert!(matches!(
            storage.load(&RecordId::new()),
            Err(IntakeError::RecordNotFound(_))
        ));
        assert!(storage.list_submissions().expect("list").is_empty());
    }
}
