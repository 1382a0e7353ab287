use crate::schema::StrategyRecord;
use log::debug;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Label-keyed view over an immutable strategy collection.
///
/// Records are held behind `Arc` and shared between buckets, so a strategy
/// carrying several labels is stored once. The index has no mutation API;
/// rebuilding means constructing a new one.
#[derive(Debug, Clone, Default)]
pub struct StrategyIndex {
    records: Vec<Arc<StrategyRecord>>,
    by_label: BTreeMap<String, Vec<Arc<StrategyRecord>>>,
}

impl StrategyIndex {
    pub fn new<I>(records: I) -> Self
    where
        I: IntoIterator<Item = StrategyRecord>,
    {
        Self::from_shared(records.into_iter().map(Arc::new))
    }

    pub fn from_shared<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Arc<StrategyRecord>>,
    {
        let records: Vec<Arc<StrategyRecord>> = records.into_iter().collect();
        let mut by_label: BTreeMap<String, Vec<Arc<StrategyRecord>>> = BTreeMap::new();
        let mut unlabeled = 0usize;

        for record in &records {
            if record.labels.is_empty() {
                unlabeled += 1;
                continue;
            }

            for (position, label) in record.labels.iter().enumerate() {
                // A label listed twice on one record still indexes it once.
                if record.labels[..position].contains(label) {
                    continue;
                }

                by_label
                    .entry(label.clone())
                    .or_default()
                    .push(Arc::clone(record));
            }
        }

        debug!(
            "Indexed {} strategies under {} labels ({} without labels)",
            records.len(),
            by_label.len(),
            unlabeled
        );

        Self { records, by_label }
    }

    /// Strategies carrying `label`, in input order. Unknown labels yield an
    /// empty slice.
    pub fn lookup(&self, label: &str) -> &[Arc<StrategyRecord>] {
        self.by_label
            .get(label)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.by_label.keys().map(String::as_str)
    }

    pub fn label_count(&self, label: &str) -> usize {
        self.lookup(label).len()
    }

    /// Every ingested record, including unlabeled ones.
    pub fn records(&self) -> &[Arc<StrategyRecord>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<StrategyRecord> for StrategyIndex {
    fn from_iter<I: IntoIterator<Item = StrategyRecord>>(iter: I) -> Self {
        Self::new(iter)
    }
}
