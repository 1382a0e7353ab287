use crate::error::{FunnelError, Result};
use crate::schema::StrategyRecord;
use log::debug;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Badge the extractor emits when a strategy has more funnel steps than fit
/// on the card. It is not a label.
const OVERFLOW_BADGE: &str = "+1";

/// Decodes the extractor's JSON array of strategies and normalizes it.
pub fn parse_strategies(json: &str) -> Result<Vec<StrategyRecord>> {
    let records: Vec<StrategyRecord> = serde_json::from_str(json)?;
    normalize_records(records)
}

pub fn read_strategies<R: Read>(reader: R) -> Result<Vec<StrategyRecord>> {
    let records: Vec<StrategyRecord> = serde_json::from_reader(reader)?;
    normalize_records(records)
}

pub fn load_strategies<P: AsRef<Path>>(path: P) -> Result<Vec<StrategyRecord>> {
    let file = File::open(path.as_ref())?;
    read_strategies(BufReader::new(file))
}

/// Trims names and labels, drops blank and overflow labels, and rejects
/// records without a name.
///
/// Duplicate names are kept; the engine resolves them by keeping the first.
pub fn normalize_records(records: Vec<StrategyRecord>) -> Result<Vec<StrategyRecord>> {
    let mut normalized = Vec::with_capacity(records.len());
    let mut dropped_labels = 0usize;

    for (index, mut record) in records.into_iter().enumerate() {
        let name = record.name.trim();
        if name.is_empty() {
            return Err(FunnelError::InvalidRecord {
                index,
                details: "Strategy name must not be empty".to_string(),
            });
        }
        record.name = name.to_string();

        let before = record.labels.len();
        record.labels = record
            .labels
            .into_iter()
            .map(|label| label.trim().to_string())
            .filter(|label| !label.is_empty() && label != OVERFLOW_BADGE)
            .collect();
        dropped_labels += before - record.labels.len();

        normalized.push(record);
    }

    debug!(
        "Ingested {} strategies ({} blank or overflow labels dropped)",
        normalized.len(),
        dropped_labels
    );

    Ok(normalized)
}
