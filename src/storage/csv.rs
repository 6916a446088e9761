use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};
use tokio::sync::Mutex;

use crate::error::Result;
use crate::storage::models::{ValidSale, RECORD_HEADERS};

/// Append-only CSV table of recorded sales. The file is created with the
/// header row on first use; concurrent writers are serialized through one
/// lock.
#[derive(Clone)]
pub struct CsvStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CsvStore {
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        };
        store.ensure_file_exists().await?;
        Ok(store)
    }

    async fn ensure_file_exists(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        if !self.path.exists() {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let mut writer = csv::Writer::from_path(&self.path)?;
            writer.write_record(RECORD_HEADERS)?;
            writer.flush()?;
            info!("Created new storage file: {}", self.path.display());
        }
        Ok(())
    }

    pub async fn append(&self, sale: &ValidSale) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record([&sale.buyer, &sale.occurred_at, &sale.amount, &sale.source])?;
        writer.flush()?;
        debug!("Appended sale record for {}", sale.buyer);
        Ok(())
    }

    /// Every row of the file, header included, as raw fields.
    pub async fn read_all(&self) -> Result<Vec<Vec<String>>> {
        let _guard = self.write_lock.lock().await;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
