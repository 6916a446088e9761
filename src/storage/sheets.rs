use log::{debug, warn};
use serde_json::json;

use crate::error::{Result, SalesBotError};
use crate::storage::models::ValidSale;

/// Remote spreadsheet mirror. The sheet side is a webhook that appends the
/// posted row; without a configured URL the sink reports disconnected and
/// every append is a no-op.
#[derive(Clone, Debug)]
pub struct SheetSink {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl SheetSink {
    pub fn new(webhook_url: Option<String>) -> Self {
        let webhook_url = webhook_url.filter(|url| !url.trim().is_empty());
        if webhook_url.is_none() {
            warn!("Sheet webhook URL not set, records are kept in CSV only");
        }
        Self {
            client: reqwest::Client::new(),
            webhook_url,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Posts one row. Returns Ok(false) when the sink is not configured.
    pub async fn append_row(&self, sale: &ValidSale) -> Result<bool> {
        let Some(url) = self.webhook_url.as_deref() else {
            debug!("Sheet sink disconnected, skipping append");
            return Ok(false);
        };

        let payload = json!({
            "buyer": sale.buyer,
            "datetime": sale.occurred_at,
            "amount": sale.amount,
            "source": sale.source,
        });

        let response = self.client.post(url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(SalesBotError::sheet_error(format!(
                "webhook returned {}",
                response.status()
            )));
        }

        debug!("Appended row to sheet for {}", sale.buyer);
        Ok(true)
    }
}
