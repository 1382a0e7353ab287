use crate::catalog::StageCatalog;
use crate::error::{validate_limit, Result};
use crate::index::StrategyIndex;
use crate::report::{FunnelReport, StageRecommendation, StageSummary};
use crate::schema::{StageDefinition, StrategyRecord};
use log::debug;
use std::collections::HashSet;
use std::sync::Arc;

/// Answers per-stage recommendation queries over a built [`StrategyIndex`].
///
/// Both the index and the catalog are fixed at construction. Every query is a
/// pure function of them, so repeated calls with the same arguments return
/// identical results.
#[derive(Debug, Clone)]
pub struct FunnelEngine {
    index: StrategyIndex,
    catalog: StageCatalog,
}

impl FunnelEngine {
    pub fn new(index: StrategyIndex) -> Self {
        Self::with_catalog(index, StageCatalog::funnel())
    }

    pub fn with_catalog(index: StrategyIndex, catalog: StageCatalog) -> Self {
        Self { index, catalog }
    }

    pub fn index(&self) -> &StrategyIndex {
        &self.index
    }

    pub fn catalog(&self) -> &StageCatalog {
        &self.catalog
    }

    /// Ranked strategies for one stage, at most `limit` of them.
    ///
    /// Unknown stage keys yield an empty list. A negative `limit` is rejected.
    pub fn strategies_for_stage(
        &self,
        stage_key: &str,
        limit: i64,
    ) -> Result<Vec<Arc<StrategyRecord>>> {
        let limit = validate_limit(limit)?;

        let Some(stage) = self.catalog.get(stage_key) else {
            debug!("Unknown stage '{}' requested, returning no strategies", stage_key);
            return Ok(Vec::new());
        };

        let mut strategies = self.ranked_strategies(stage);
        strategies.truncate(limit);
        Ok(strategies)
    }

    /// Recommendations for the requested stages, or every stage when
    /// `requested` is `None`.
    ///
    /// Unknown keys are ignored and entries always come back in funnel order,
    /// regardless of the order they were requested in.
    pub fn build_report<S: AsRef<str>>(
        &self,
        requested: Option<&[S]>,
        per_stage_limit: i64,
    ) -> Result<FunnelReport> {
        let limit = validate_limit(per_stage_limit)?;

        let selected: Vec<&StageDefinition> = match requested {
            None => self.catalog.stages().iter().collect(),
            Some(keys) => {
                let wanted: HashSet<&str> = keys.iter().map(|k| k.as_ref()).collect();
                // Catalog iteration is already in ascending order.
                self.catalog
                    .stages()
                    .iter()
                    .filter(|stage| wanted.contains(stage.key.as_str()))
                    .collect()
            }
        };

        let entries = selected
            .into_iter()
            .map(|stage| {
                let mut strategies = self.ranked_strategies(stage);
                strategies.truncate(limit);

                StageRecommendation {
                    stage_key: stage.key.clone(),
                    order: stage.order,
                    stage_name: stage.display_name.clone(),
                    description: stage.description.clone(),
                    count: strategies.len(),
                    strategies,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            "Built funnel report with {} stages ({} strategies, limit {} per stage)",
            entries.len(),
            entries.iter().map(|e| e.count).sum::<usize>(),
            limit
        );

        Ok(FunnelReport::from_ordered(entries))
    }

    pub fn full_report(&self, per_stage_limit: i64) -> Result<FunnelReport> {
        self.build_report(None::<&[&str]>, per_stage_limit)
    }

    /// Every stage with the number of distinct strategies available to it.
    pub fn overview(&self) -> Vec<StageSummary> {
        self.catalog
            .stages()
            .iter()
            .map(|stage| StageSummary {
                stage_key: stage.key.clone(),
                order: stage.order,
                stage_name: stage.display_name.clone(),
                description: stage.description.clone(),
                available: self.ranked_strategies(stage).len(),
            })
            .collect()
    }

    /// Gathers the stage's label buckets in declaration order, keeps the first
    /// record seen for each name, then sorts by impact text descending.
    ///
    /// The sort is stable, so records with equal impact keep index order.
    /// Impact is compared as plain text, not as a severity scale.
    fn ranked_strategies(&self, stage: &StageDefinition) -> Vec<Arc<StrategyRecord>> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut strategies: Vec<Arc<StrategyRecord>> = Vec::new();

        for label in &stage.labels {
            for record in self.index.lookup(label) {
                if seen.insert(record.name.as_str()) {
                    strategies.push(Arc::clone(record));
                }
            }
        }

        strategies.sort_by(|a, b| b.impact_key().cmp(a.impact_key()));
        strategies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FunnelError;

    fn names(records: &[Arc<StrategyRecord>]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    fn sample_engine() -> FunnelEngine {
        let records = vec![
            StrategyRecord::new("X", "").with_labels(["Awareness"]).with_impact("High"),
            StrategyRecord::new("Y", "")
                .with_labels(["Awareness", "Retention"])
                .with_impact("Low"),
            StrategyRecord::new("Z", "").with_labels(["Retention"]),
            StrategyRecord::new("Orphan", "").with_impact("Very High"),
        ];
        FunnelEngine::new(StrategyIndex::new(records))
    }

    #[test]
    fn test_stage_ranking_by_impact() {
        let engine = sample_engine();
        let awareness = engine.strategies_for_stage("awareness", 10).unwrap();
        // "Low" sorts above "High" as text
        assert_eq!(names(&awareness), vec!["Y", "X"]);

        let retention = engine.strategies_for_stage("retention", 10).unwrap();
        assert_eq!(names(&retention), vec!["Y", "Z"]);
    }

    #[test]
    fn test_impact_is_compared_as_text() {
        let index = StrategyIndex::new(vec![
            StrategyRecord::new("A", "").with_labels(["Revenue"]).with_impact("High"),
            StrategyRecord::new("B", "").with_labels(["Revenue"]).with_impact("Medium"),
            StrategyRecord::new("C", "").with_labels(["Revenue"]),
            StrategyRecord::new("D", "").with_labels(["Revenue"]).with_impact("Low"),
        ]);
        let engine = FunnelEngine::new(index);

        let revenue = engine.strategies_for_stage("revenue", 10).unwrap();
        // "Medium" > "Low" > "High" > missing
        assert_eq!(names(&revenue), vec!["B", "D", "A", "C"]);
    }

    #[test]
    fn test_equal_impact_keeps_index_order() {
        let index = StrategyIndex::new(vec![
            StrategyRecord::new("First", "").with_labels(["Referral"]),
            StrategyRecord::new("Second", "").with_labels(["Referral"]).with_impact("High"),
            StrategyRecord::new("Third", "").with_labels(["Referral"]),
        ]);
        let engine = FunnelEngine::new(index);

        let referral = engine.strategies_for_stage("referral", 10).unwrap();
        assert_eq!(names(&referral), vec!["Second", "First", "Third"]);
    }

    #[test]
    fn test_unknown_stage_is_empty() {
        let engine = sample_engine();
        assert!(engine.strategies_for_stage("not_a_stage", 5).unwrap().is_empty());
    }

    #[test]
    fn test_truncation() {
        let engine = sample_engine();
        assert!(engine.strategies_for_stage("awareness", 0).unwrap().is_empty());
        assert_eq!(names(&engine.strategies_for_stage("awareness", 1).unwrap()), vec!["Y"]);
        assert_eq!(engine.strategies_for_stage("awareness", 2).unwrap().len(), 2);
        assert_eq!(engine.strategies_for_stage("awareness", 50).unwrap().len(), 2);
    }

    #[test]
    fn test_negative_limit_is_rejected() {
        let engine = sample_engine();
        assert!(matches!(
            engine.strategies_for_stage("awareness", -1),
            Err(FunnelError::InvalidLimit(-1))
        ));
        assert!(matches!(
            engine.strategies_for_stage("not_a_stage", -3),
            Err(FunnelError::InvalidLimit(-3))
        ));
        assert!(matches!(
            engine.full_report(-2),
            Err(FunnelError::InvalidLimit(-2))
        ));
    }

    #[test]
    fn test_multi_label_stage_deduplicates() {
        let catalog = StageCatalog::new(vec![StageDefinition::new(
            "top",
            "Top of Funnel",
            "",
            &["Awareness", "Acquisition"],
            1,
        )])
        .unwrap();
        let index = StrategyIndex::new(vec![
            StrategyRecord::new("Ads", "").with_labels(["Acquisition"]),
            StrategyRecord::new("SEO", "").with_labels(["Awareness", "Acquisition"]),
            StrategyRecord::new("Blog", "").with_labels(["Awareness"]),
        ]);
        let engine = FunnelEngine::with_catalog(index, catalog);

        let top = engine.strategies_for_stage("top", 10).unwrap();
        assert_eq!(names(&top), vec!["SEO", "Blog", "Ads"]);
    }

    #[test]
    fn test_duplicate_names_first_record_wins() {
        let index = StrategyIndex::new(vec![
            StrategyRecord::new("Webinar", "first").with_labels(["Activation"]),
            StrategyRecord::new("Webinar", "second")
                .with_labels(["Activation"])
                .with_impact("High"),
        ]);
        let engine = FunnelEngine::new(index);

        let activation = engine.strategies_for_stage("activation", 10).unwrap();
        assert_eq!(activation.len(), 1);
        assert_eq!(activation[0].description, "first");
    }

    #[test]
    fn test_report_uses_funnel_order() {
        let engine = sample_engine();
        let report = engine
            .build_report(Some(&["referral", "retention", "awareness"][..]), 10)
            .unwrap();

        assert_eq!(report.stage_keys(), vec!["awareness", "retention", "referral"]);
        assert_eq!(report.get("referral").unwrap().count, 0);
    }

    #[test]
    fn test_report_ignores_unknown_and_repeated_keys() {
        let engine = sample_engine();
        let requested = vec![
            "retention".to_string(),
            "bogus".to_string(),
            "retention".to_string(),
        ];
        let report = engine.build_report(Some(requested.as_slice()), 10).unwrap();
        assert_eq!(report.stage_keys(), vec!["retention"]);

        let empty: &[&str] = &[];
        assert!(engine.build_report(Some(empty), 10).unwrap().is_empty());
    }

    #[test]
    fn test_full_report_covers_catalog() {
        let engine = sample_engine();
        let report = engine.full_report(5).unwrap();
        assert_eq!(report.len(), 6);
        assert_eq!(report.total_strategies(), 4);
        assert_eq!(report, engine.full_report(5).unwrap());
    }

    #[test]
    fn test_overview_counts_distinct_strategies() {
        let engine = sample_engine();
        let overview = engine.overview();

        assert_eq!(overview.len(), 6);
        assert_eq!(overview[0].stage_key, "awareness");
        assert_eq!(overview[0].available, 2);
        assert_eq!(overview[4].stage_key, "retention");
        assert_eq!(overview[4].available, 2);
        assert_eq!(overview[5].available, 0);
    }
}
