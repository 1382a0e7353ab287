use crate::error::{FunnelError, Result};
use crate::schema::StageDefinition;
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Standard funnel from first contact to advocacy.
const FUNNEL_STAGES: [(&str, &str, &str, &[&str], u32); 6] = [
    (
        "awareness",
        "Awareness",
        "Draw attention to the product or brand",
        &["Awareness"],
        1,
    ),
    (
        "acquisition",
        "Acquisition",
        "Bring traffic to the site or app",
        &["Acquisition"],
        2,
    ),
    (
        "activation",
        "Activation",
        "Engage users: sign-up and first experience",
        &["Activation"],
        3,
    ),
    (
        "revenue",
        "Revenue",
        "Complete the first purchase",
        &["Revenue"],
        4,
    ),
    (
        "retention",
        "Retention",
        "Repeat purchases and customer loyalty",
        &["Retention"],
        5,
    ),
    (
        "referral",
        "Referral",
        "Recommendations and word of mouth",
        &["Referral"],
        6,
    ),
];

/// Immutable, validated set of funnel stages kept in ascending `order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<StageDefinition>",
    into = "Vec<StageDefinition>"
)]
pub struct StageCatalog {
    stages: Vec<StageDefinition>,
}

impl StageCatalog {
    pub fn new(mut stages: Vec<StageDefinition>) -> Result<Self> {
        validate_stages(&stages)?;
        stages.sort_by_key(|s| s.order);
        Ok(Self { stages })
    }

    pub fn funnel() -> Self {
        let stages = FUNNEL_STAGES
            .iter()
            .map(|(key, name, description, labels, order)| {
                StageDefinition::new(*key, *name, *description, labels, *order)
            })
            .collect();

        Self { stages }
    }

    pub fn get(&self, key: &str) -> Option<&StageDefinition> {
        self.stages.iter().find(|s| s.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Stages in funnel order.
    pub fn stages(&self) -> &[StageDefinition] {
        &self.stages
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(|s| s.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn key_for_order(&self, order: u32) -> Option<&str> {
        self.stages
            .iter()
            .find(|s| s.order == order)
            .map(|s| s.key.as_str())
    }

    /// Translates funnel positions (e.g. a numbered menu choice) into stage
    /// keys. Positions with no stage are skipped.
    pub fn keys_for_orders(&self, orders: &[u32]) -> Vec<String> {
        orders
            .iter()
            .filter_map(|order| self.key_for_order(*order))
            .map(str::to_string)
            .collect()
    }
}

impl Default for StageCatalog {
    fn default() -> Self {
        Self::funnel()
    }
}

impl TryFrom<Vec<StageDefinition>> for StageCatalog {
    type Error = FunnelError;

    fn try_from(stages: Vec<StageDefinition>) -> Result<Self> {
        Self::new(stages)
    }
}

impl From<StageCatalog> for Vec<StageDefinition> {
    fn from(catalog: StageCatalog) -> Self {
        catalog.stages
    }
}

impl JsonSchema for StageCatalog {
    fn schema_name() -> String {
        "StageCatalog".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        <Vec<StageDefinition>>::json_schema(gen)
    }
}

fn validate_stages(stages: &[StageDefinition]) -> Result<()> {
    let mut keys = HashSet::new();
    let mut orders = HashSet::new();

    for stage in stages {
        if stage.key.trim().is_empty() {
            return Err(FunnelError::InvalidCatalog(
                "Stage key must not be empty".to_string(),
            ));
        }

        if stage.labels.is_empty() {
            return Err(FunnelError::InvalidCatalog(format!(
                "Stage '{}' has no labels",
                stage.key
            )));
        }

        if !keys.insert(stage.key.as_str()) {
            return Err(FunnelError::InvalidCatalog(format!(
                "Duplicate stage key '{}'",
                stage.key
            )));
        }

        if !orders.insert(stage.order) {
            return Err(FunnelError::InvalidCatalog(format!(
                "Stage '{}' reuses order {}",
                stage.key, stage.order
            )));
        }
    }

    Ok(())
}
