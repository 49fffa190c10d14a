// JSON snapshot of the artisan store
use anyhow::{anyhow, Context, Result};
use atomicwrites::{AllowOverwrite, AtomicFile};
use nearby_core::ArtisanRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const SNAPSHOT_FILENAME: &str = "artisans.json";

#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotData {
    pub artisans: Vec<ArtisanRecord>,
    #[serde(default)]
    pub timestamp: u64,
}

pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            path: data_dir.as_ref().join(SNAPSHOT_FILENAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, or `None` when no snapshot has been written yet
    pub fn load(&self) -> Result<Option<SnapshotData>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file = fs::File::open(&self.path)
            .with_context(|| format!("opening snapshot {:?}", self.path))?;
        let data: SnapshotData = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing snapshot {:?}", self.path))?;
        Ok(Some(data))
    }

    /// Replace the snapshot atomically; readers see either the old or the new file.
    pub fn save(&self, artisans: Vec<ArtisanRecord>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = SnapshotData {
            artisans,
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        };

        AtomicFile::new(&self.path, AllowOverwrite)
            .write(|f| {
                let mut writer = BufWriter::new(f);
                serde_json::to_writer_pretty(&mut writer, &data)?;
                writer.flush()?;
                Ok::<(), anyhow::Error>(())
            })
            .map_err(|e| anyhow!("writing snapshot {:?}: {}", self.path, e))
    }
}
