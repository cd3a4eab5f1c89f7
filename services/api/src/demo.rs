use crate::infra::{
    load_catalog, scoring_config, InMemoryAssessmentRepository, InMemoryNotificationPublisher,
};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use talent_ai::config::AppConfig;
use talent_ai::error::AppError;
use talent_ai::fixtures::{Archetype, SyntheticCandidateGenerator};
use talent_ai::workflows::assessment::{
    AssessmentScoringService, AssessmentSubmission, RedFlag, RoleSlug, ScoringOutcome,
};

type LocalService = AssessmentScoringService<InMemoryAssessmentRepository, InMemoryNotificationPublisher>;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file containing an assessment submission
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Score against this role instead of the one in the submission
    #[arg(long)]
    pub(crate) role: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Number of synthetic candidates to generate
    #[arg(long, default_value_t = 5)]
    pub(crate) candidates: usize,
    /// Seed for the synthetic generator; the same seed reproduces the same run
    #[arg(long, default_value_t = 42)]
    pub(crate) seed: u64,
    /// Role every synthetic candidate applies for
    #[arg(long, default_value = "field-technician")]
    pub(crate) role: String,
}

fn local_service() -> Result<(LocalService, Arc<InMemoryNotificationPublisher>), AppError> {
    let config = AppConfig::load()?;
    let catalog = load_catalog(&config.scoring)?;
    let scoring = scoring_config(&config.scoring)?;
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let service = AssessmentScoringService::new(
        Arc::new(InMemoryAssessmentRepository::default()),
        notifications.clone(),
        Arc::new(catalog),
        scoring,
    );
    Ok((service, notifications))
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs { input, role } = args;

    let raw = std::fs::read_to_string(&input)?;
    let mut submission: AssessmentSubmission = serde_json::from_str(&raw)?;
    if let Some(role) = role {
        submission.role = RoleSlug(role);
    }

    let (service, notifications) = local_service()?;
    let record = service.submit(submission)?;
    let outcome = service.score(&record.assessment.id)?;

    println!("Assessment {} ({})", outcome.assessment_id, input.display());
    render_outcome(&outcome, &record.assessment.role);

    for notification in notifications.events() {
        println!("\nNotification: {}", notification.template);
        for (key, value) in &notification.details {
            println!("  {key}: {value}");
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        candidates,
        seed,
        role,
    } = args;
    let role = RoleSlug(role);

    let (service, notifications) = local_service()?;
    let mut generator = SyntheticCandidateGenerator::new(seed);

    println!("Synthetic assessment demo (seed {seed}, role {role})");
    println!("Generated data only; narrative flags below are illustrative and never scored.");

    for index in 0..candidates {
        let archetype = Archetype::ALL[index % Archetype::ALL.len()];
        let submission = generator.submission(archetype, service.catalog(), &role);
        let candidate = submission.candidate_id.0.clone();

        let record = service.submit(submission)?;
        let outcome = service.score(&record.assessment.id)?;

        println!(
            "\n== {candidate} ({}) -> {}",
            archetype.label(),
            outcome.status.label()
        );
        render_outcome(&outcome, &role);

        let narrative = generator.narrative_flags(archetype);
        if !narrative.is_empty() {
            println!("  Narrative notes (synthetic):");
            render_flags(&narrative);
        }
    }

    let events = notifications.events();
    println!(
        "\n{} recruiter notification(s) queued: {} recommended, {} flagged",
        events.len(),
        events
            .iter()
            .filter(|event| event.template == "candidate_recommended")
            .count(),
        events
            .iter()
            .filter(|event| event.template == "candidate_flagged")
            .count()
    );

    Ok(())
}

fn render_outcome(outcome: &ScoringOutcome, role: &RoleSlug) {
    println!("  Status: {}", outcome.status.label());

    if outcome.construct_scores.is_empty() {
        println!("  No scores recorded; assessment was not completed.");
        return;
    }

    println!("  Constructs:");
    for score in &outcome.construct_scores {
        println!(
            "    {:<28} raw {:.2}  pct {:>2}  items {}",
            score.construct.label(),
            score.raw_score,
            score.percentile,
            score.item_count
        );
    }

    println!("  Composites:");
    for composite in &outcome.composite_scores {
        let marker = if &composite.role == role { "*" } else { " " };
        println!(
            "   {marker}{:<26} pct {:>2}  {} ({:+})",
            composite.role.as_str(),
            composite.percentile,
            if composite.passed { "pass" } else { "below cutline" },
            composite.distance
        );
    }

    if outcome.red_flags.is_empty() {
        println!("  Red flags: none");
    } else {
        println!("  Red flags:");
        render_flags(&outcome.red_flags);
    }

    if let Some(prediction) = &outcome.prediction {
        println!(
            "  Ramp time: {} weeks ({})",
            prediction.ramp_time.weeks,
            prediction.ramp_time.label.label()
        );
        println!(
            "  Supervision: {} (confidence {:.2})",
            prediction.supervision.level.label(),
            prediction.supervision.confidence
        );
        println!(
            "  Performance ceiling: {}",
            prediction.performance_ceiling.label
        );
        println!(
            "  Attrition risk: {} ({})",
            prediction.attrition_risk.level.label(),
            prediction.attrition_risk.risk_score
        );
    }
}

fn render_flags(flags: &[RedFlag]) {
    for flag in flags {
        println!(
            "    [{}] {}: {}",
            flag.severity.label(),
            flag.title,
            flag.description
        );
    }
}
