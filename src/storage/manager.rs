use std::path::PathBuf;

use log::{info, warn};

use crate::config::Settings;
use crate::error::Result;
use crate::retry::{retry_with_backoff, RetryConfig};
use crate::storage::csv::CsvStore;
use crate::storage::models::ValidSale;
use crate::storage::sheets::SheetSink;

/// Writes every record to the CSV file first, then mirrors it to the remote
/// sheet when one is configured. The remote leg retries with backoff and
/// degrades to a warning: a sink outage never loses the local record and
/// never turns a stored sale into a user-visible failure.
#[derive(Clone)]
pub struct StorageManager {
    csv: CsvStore,
    sheets: SheetSink,
    retry: RetryConfig,
}

impl StorageManager {
    pub async fn new(settings: &Settings) -> Result<Self> {
        let csv = CsvStore::new(PathBuf::from(&settings.csv_path)).await?;
        let sheets = SheetSink::new(settings.sheets_webhook_url.clone());
        let retry = RetryConfig {
            max_attempts: settings.max_retry_attempts,
            ..RetryConfig::default()
        };
        Ok(Self::from_parts(csv, sheets, retry))
    }

    pub fn from_parts(csv: CsvStore, sheets: SheetSink, retry: RetryConfig) -> Self {
        Self { csv, sheets, retry }
    }

    pub async fn add_sale(&self, sale: &ValidSale) -> Result<()> {
        self.csv.append(sale).await?;
        info!(
            "Recorded sale: {} | {} | {} | {}",
            sale.buyer, sale.occurred_at, sale.amount, sale.source
        );

        if self.sheets.is_connected() {
            let sink = self.sheets.clone();
            let record = sale.clone();
            let mirrored = retry_with_backoff(
                move || {
                    let sink = sink.clone();
                    let record = record.clone();
                    async move { sink.append_row(&record).await }
                },
                self.retry.clone(),
                "sheet append",
            )
            .await;

            match mirrored {
                Ok(_) => info!("Mirrored sale to sheet: {}", sale.buyer),
                Err(e) => warn!("Sheet mirror failed, record kept in CSV: {e}"),
            }
        }

        Ok(())
    }

    pub fn csv(&self) -> &CsvStore {
        &self.csv
    }

    pub fn sheets(&self) -> &SheetSink {
        &self.sheets
    }
}
