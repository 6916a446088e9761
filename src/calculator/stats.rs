use log::debug;

use crate::error::Result;
use crate::parser::patterns::ParserPatterns;
use crate::storage::csv::CsvStore;
use crate::storage::models::SalesStats;

/// Aggregates the recorded sales for the /stats command.
#[derive(Clone)]
pub struct StatsCalculator {
    store: CsvStore,
}

impl StatsCalculator {
    pub fn new(store: CsvStore) -> Self {
        Self { store }
    }

    /// Total record count plus per-currency counts and sums. Amounts in
    /// currencies other than USDT and rubles only contribute to the total.
    pub async fn stats(&self) -> Result<SalesStats> {
        let rows = self.store.read_all().await?;
        // the first row is the header
        let records = rows.get(1..).unwrap_or_default();

        let mut stats = SalesStats {
            total: records.len(),
            ..SalesStats::default()
        };

        for record in records {
            let Some(amount) = record.get(2) else {
                continue;
            };
            if amount.to_lowercase().contains("usdt") {
                stats.usdt_count += 1;
                stats.usdt_total += amount_value(amount);
            } else if amount.contains('₽') {
                stats.rub_count += 1;
                stats.rub_total += amount_value(amount);
            }
        }

        debug!("Computed stats over {} records", stats.total);
        Ok(stats)
    }
}

/// Numeric part of a canonical amount string; a decimal comma from older
/// rows is tolerated.
fn amount_value(amount: &str) -> f64 {
    let patterns = ParserPatterns::get_instance();
    patterns
        .number
        .captures(amount)
        .and_then(|caps| caps[1].replace(',', ".").parse().ok())
        .unwrap_or(0.0)
}
