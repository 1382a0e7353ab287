use crate::schema::StrategyRecord;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageRecommendation {
    #[serde(skip)]
    pub stage_key: String,
    #[serde(skip)]
    pub order: u32,
    pub stage_name: String,
    pub description: String,
    pub strategies: Vec<Arc<StrategyRecord>>,
    pub count: usize,
}

impl StageRecommendation {
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Per-stage recommendations, always held in ascending funnel order.
///
/// Serializes as a JSON object keyed by stage key whose keys appear in that
/// same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunnelReport {
    entries: Vec<StageRecommendation>,
}

impl FunnelReport {
    pub(crate) fn from_ordered(entries: Vec<StageRecommendation>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].order < w[1].order));
        Self { entries }
    }

    pub fn get(&self, stage_key: &str) -> Option<&StageRecommendation> {
        self.entries.iter().find(|e| e.stage_key == stage_key)
    }

    pub fn contains(&self, stage_key: &str) -> bool {
        self.get(stage_key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StageRecommendation> {
        self.entries.iter()
    }

    pub fn stage_keys(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.stage_key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_strategies(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a FunnelReport {
    type Item = &'a StageRecommendation;
    type IntoIter = std::slice::Iter<'a, StageRecommendation>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for FunnelReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.stage_key, entry)?;
        }
        map.end()
    }
}

/// Stage line of the funnel overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageSummary {
    pub stage_key: String,
    pub order: u32,
    pub stage_name: String,
    pub description: String,
    /// Distinct strategies reachable for the stage before truncation.
    pub available: usize,
}
