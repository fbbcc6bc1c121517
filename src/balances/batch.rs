/// Sequential batch export over an address list
use super::aggregator::BalanceAggregator;
use super::export::write_report;
use crate::logger::{self, LogTag};
use std::fs;
use std::path::{Path, PathBuf};

/// Non-blank, trimmed lines of an address file
pub fn parse_addresses(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_addresses(path: &Path) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read address file {}: {}", path.display(), e))?;
    Ok(parse_addresses(&content))
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub written: Vec<PathBuf>,
    /// `(address, error)` for every address that produced no report
    pub failed: Vec<(String, String)>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.written.len() + self.failed.len()
    }
}

/// Export one report per address, one address at a time
///
/// A failing address is logged and skipped; the rest of the batch continues.
pub async fn run_batch(
    aggregator: &BalanceAggregator,
    addresses: &[String],
    date: &str,
    output_dir: &Path,
) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for (index, address) in addresses.iter().enumerate() {
        logger::info(
            LogTag::Export,
            &format!("[{}/{}] Processing {}", index + 1, addresses.len(), address),
        );

        let rows = match aggregator.aggregate(address, date).await {
            Ok(rows) => rows,
            Err(e) => {
                logger::error(LogTag::Export, &format!("Skipping {}: {}", address, e));
                summary.failed.push((address.clone(), e.to_string()));
                continue;
            }
        };

        match write_report(output_dir, address, &rows) {
            Ok(path) => summary.written.push(path),
            Err(e) => {
                logger::error(LogTag::Export, &format!("Report for {} not written: {}", address, e));
                summary.failed.push((address.clone(), e.to_string()));
            }
        }
    }

    logger::info(
        LogTag::Export,
        &format!(
            "Batch finished: {} written, {} failed",
            summary.written.len(),
            summary.failed.len()
        ),
    );

    summary
}
