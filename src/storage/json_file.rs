use crate::storage::{Record, RecordSink, StorageError, StorageResult};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::{Path, PathBuf};

/// Writes each record to `<directory>/<item-id>.json`
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    directory: PathBuf,
}

impl JsonFileSink {
    /// Opens a sink rooted at `directory`, creating it if missing
    ///
    /// # Returns
    ///
    /// * `Ok(JsonFileSink)` - Directory exists (or was created)
    /// * `Err(StorageError)` - Path exists but is not a directory, or could not be created
    pub fn new(directory: impl Into<PathBuf>) -> StorageResult<Self> {
        let directory = directory.into();
        ensure_output_dir(&directory)?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path that the record for `item_id` is written to
    pub fn path_for(&self, item_id: &str) -> PathBuf {
        self.directory.join(format!("{}.json", item_id))
    }
}

#[async_trait]
impl RecordSink for JsonFileSink {
    async fn persist(&self, record: &Record, item_id: &str) -> StorageResult<()> {
        if item_id.is_empty() || !item_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(StorageError::InvalidItemId(item_id.to_string()));
        }

        let content = to_json(record)?;

        // The directory may have been removed since startup
        tokio::fs::create_dir_all(&self.directory).await?;
        tokio::fs::write(self.path_for(item_id), content).await?;

        tracing::trace!("Persisted item {}", item_id);
        Ok(())
    }
}

/// Ensures the output directory exists; creates it if missing
pub fn ensure_output_dir(dir: &Path) -> StorageResult<()> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(StorageError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        return Ok(());
    }

    std::fs::create_dir_all(dir)
        .map_err(|e| StorageError::OutputDir(format!("{}: {}", dir.display(), e)))
}

/// Serializes a record as 4-space indented JSON
fn to_json(record: &Record) -> StorageResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    record.serialize(&mut serializer)?;
    Ok(buffer)
}
