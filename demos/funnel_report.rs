use funnel_strategy_picker::*;

const SAMPLE_STRATEGIES: &str = r#"[
    {"name": "Content Marketing Blog", "description": "Long-form articles targeting search intent", "types": ["Awareness", "Acquisition"], "effort_hours": 40, "impact": "High"},
    {"name": "Onboarding Email Sequence", "description": "Drip emails guiding new sign-ups", "types": ["Activation", "Retention"], "effort_hours": 12, "impact": "Medium"},
    {"name": "Referral Rewards", "description": "Credit for both parties on every invite", "types": ["Referral", "Revenue"], "impact": "High"},
    {"name": "Loyalty Points", "description": "Points for every repeat purchase", "types": ["Retention", "Revenue"]}
]"#;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let records = match std::env::args().nth(1) {
        Some(path) => load_strategies(path)?,
        None => parse_strategies(SAMPLE_STRATEGIES)?,
    };

    println!("Loaded {} marketing strategies\n", records.len());

    let config = RecommendationConfig::default();
    let engine = FunnelRecommender::engine(records, &config)?;

    for stage in engine.overview() {
        println!("{}. {} ({} strategies)", stage.order, stage.stage_name, stage.available);
        println!("   {}", stage.description);
    }

    let report = engine.build_report(config.stages.as_deref(), config.strategies_per_stage)?;
    println!("\n{}", report.to_json()?);

    Ok(())
}
