//! # Funnel Strategy Picker
//!
//! A library for mapping marketing strategies (extracted upstream from a
//! strategy catalogue document) onto the stages of a customer acquisition
//! funnel, producing ranked, deduplicated recommendations per stage.
//!
//! ## Core Concepts
//!
//! - **Strategy Record**: One marketing action with a name, description, funnel labels and
//!   optional effort/impact metadata
//! - **Strategy Index**: Label → strategies lookup built once from the record collection
//! - **Stage Catalog**: Immutable, ordered funnel stages (Awareness through Referral), each
//!   claiming one or more labels
//! - **Funnel Report**: Per-stage recommendations, always in funnel order
//!
//! Ranking uses the `impact` text of each strategy compared lexicographically. It is
//! not a severity scale: "Medium" ranks above "High".
//!
//! ## Example
//!
//! ```rust
//! use funnel_strategy_picker::*;
//!
//! let records = vec![
//!     StrategyRecord::new("X", "").with_labels(["Awareness"]).with_impact("High"),
//!     StrategyRecord::new("Y", "").with_labels(["Awareness", "Retention"]).with_impact("Low"),
//! ];
//!
//! let config = RecommendationConfig::for_stages(["awareness"], 10);
//! let report = recommend(records, &config).unwrap();
//!
//! let awareness = report.get("awareness").unwrap();
//! // Impact is compared as text, so "Low" ranks above "High".
//! assert_eq!(awareness.strategy_names(), vec!["Y", "X"]);
//! assert!(report.get("retention").is_none());
//! ```

pub mod catalog;
pub mod engine;
pub mod error;
pub mod index;
pub mod ingestion;
pub mod report;
pub mod schema;

pub use catalog::StageCatalog;
pub use engine::FunnelEngine;
pub use error::{FunnelError, Result};
pub use index::StrategyIndex;
pub use ingestion::*;
pub use report::{FunnelReport, StageRecommendation, StageSummary};
pub use schema::*;

use error::validate_limit;
use log::{debug, info, warn};

pub struct FunnelRecommender;

impl FunnelRecommender {
    /// Validates and normalizes `records`, then builds an engine over the
    /// configured catalog (the standard funnel unless one is supplied).
    pub fn engine(
        records: Vec<StrategyRecord>,
        config: &RecommendationConfig,
    ) -> Result<FunnelEngine> {
        let records = normalize_records(records)?;
        let catalog = config.catalog.clone().unwrap_or_default();
        Ok(FunnelEngine::with_catalog(StrategyIndex::new(records), catalog))
    }

    pub fn recommend(
        records: Vec<StrategyRecord>,
        config: &RecommendationConfig,
    ) -> Result<FunnelReport> {
        info!(
            "Building funnel recommendations from {} strategies",
            records.len()
        );

        let engine = Self::engine(records, config)?;
        validate_config(config, engine.catalog())?;

        let report = engine.build_report(config.stages.as_deref(), config.strategies_per_stage)?;

        debug!(
            "Report covers stages {:?} with {} strategies",
            report.stage_keys(),
            report.total_strategies()
        );

        Ok(report)
    }

    pub fn recommend_from_json(json: &str, config: &RecommendationConfig) -> Result<FunnelReport> {
        let records: Vec<StrategyRecord> = serde_json::from_str(json)?;
        Self::recommend(records, config)
    }
}

pub fn recommend(records: Vec<StrategyRecord>, config: &RecommendationConfig) -> Result<FunnelReport> {
    FunnelRecommender::recommend(records, config)
}

pub fn recommend_from_json(json: &str, config: &RecommendationConfig) -> Result<FunnelReport> {
    FunnelRecommender::recommend_from_json(json, config)
}

fn validate_config(config: &RecommendationConfig, catalog: &StageCatalog) -> Result<()> {
    validate_limit(config.strategies_per_stage)?;

    if let Some(stages) = &config.stages {
        for key in stages.iter().filter(|k| !catalog.contains(k)) {
            warn!("Requested stage '{}' is not in the catalog and will be skipped", key);
        }
    }

    Ok(())
}
