use crate::catalog::StageCatalog;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STRATEGIES_PER_STAGE: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StrategyRecord {
    #[schemars(
        description = "The strategy title as it appears in the source document (e.g., 'Referral Program'). Must be unique within a collection; it is used to deduplicate strategies that appear under several labels."
    )]
    pub name: String,

    #[serde(default)]
    #[schemars(description = "Free-text summary of the strategy. May be empty.")]
    pub description: String,

    #[serde(rename = "types", alias = "labels", default)]
    #[schemars(
        description = "Funnel step badges attached to the strategy (e.g., 'Awareness', 'Retention'). A strategy with no labels cannot be attributed to any funnel stage."
    )]
    pub labels: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Estimated effort in hours, if the document states one.")]
    pub effort_hours: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(
        description = "Qualitative impact level exactly as written in the document (e.g., 'High'). Treated as an opaque text value when ranking."
    )]
    pub impact: Option<String>,
}

impl StrategyRecord {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            labels: Vec::new(),
            effort_hours: None,
            impact: None,
        }
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_impact(mut self, impact: impl Into<String>) -> Self {
        self.impact = Some(impact.into());
        self
    }

    pub fn with_effort_hours(mut self, hours: u32) -> Self {
        self.effort_hours = Some(hours);
        self
    }

    /// Ranking key. A missing impact sorts as the empty string, below every
    /// present value. Comparison is plain lexicographic text ordering, so
    /// "Medium" ranks above "High".
    pub fn impact_key(&self) -> &str {
        self.impact.as_deref().unwrap_or("")
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(Vec<StrategyRecord>)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StageDefinition {
    #[schemars(description = "Unique stage identifier (e.g., 'awareness').")]
    pub key: String,

    #[schemars(description = "Human readable stage title.")]
    pub display_name: String,

    #[serde(default)]
    #[schemars(description = "What the customer does during this stage.")]
    pub description: String,

    #[schemars(
        description = "Strategy labels that place a strategy in this stage. Must contain at least one entry."
    )]
    pub labels: Vec<String>,

    #[schemars(description = "Position in the funnel, ascending from the first touch point.")]
    pub order: u32,
}

impl StageDefinition {
    pub fn new(
        key: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        labels: &[&str],
        order: u32,
    ) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            description: description.into(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            order,
        }
    }
}

fn default_strategies_per_stage() -> i64 {
    DEFAULT_STRATEGIES_PER_STAGE
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RecommendationConfig {
    #[serde(default)]
    #[schemars(
        description = "Stage keys to include in the report. Omit to include every stage. Unknown keys are ignored and the report always follows funnel order."
    )]
    pub stages: Option<Vec<String>>,

    #[serde(default = "default_strategies_per_stage")]
    #[schemars(description = "Maximum strategies listed per stage. Must be zero or greater. Defaults to 5.")]
    pub strategies_per_stage: i64,

    #[serde(default)]
    #[schemars(description = "Replacement stage catalog. Omit to use the standard six-stage funnel.")]
    pub catalog: Option<StageCatalog>,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            stages: None,
            strategies_per_stage: DEFAULT_STRATEGIES_PER_STAGE,
            catalog: None,
        }
    }
}

impl RecommendationConfig {
    pub fn for_stages<I, S>(stages: I, strategies_per_stage: i64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stages: Some(stages.into_iter().map(Into::into).collect()),
            strategies_per_stage,
            catalog: None,
        }
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(RecommendationConfig)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}
