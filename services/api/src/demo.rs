use crate::infra::{parse_as_of, InMemoryAnalysisLog, InMemoryAssessmentRepository};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use miso_engine::analysis::{
    AnalysisReport, AnalysisService, AnalysisServiceError, AssessmentSubmission,
    BigFiveSubmission, DassSubmission, MbtiSubmission, StrengthCategory, TraitValues,
    ViaStrengthEntry, ViaSubmission,
};
use miso_engine::config::AppConfig;
use miso_engine::error::AppError;
use miso_engine::import::AssessmentCsvImporter;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

type CliService = AnalysisService<InMemoryAssessmentRepository, InMemoryAnalysisLog>;

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// JSON file holding one assessment submission
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Reference time for staleness checks (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_as_of)]
    pub(crate) as_of: Option<DateTime<Utc>>,
    /// Print the full report as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// Long-format CSV export (user_id,instrument,dimension,value,category,completed_at)
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Reference time for staleness checks (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_as_of)]
    pub(crate) as_of: Option<DateTime<Utc>>,
    /// Emit one JSON summary per user instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference time for staleness checks (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_as_of)]
    pub(crate) as_of: Option<DateTime<Utc>>,
}

/// Bundled sample user with a one-line description.
pub(crate) struct Persona {
    pub(crate) summary: &'static str,
    pub(crate) submission: AssessmentSubmission,
}

#[derive(Debug, Serialize)]
struct ReportSummary<'a> {
    user_id: &'a str,
    completeness: &'static str,
    confidence: miso_engine::analysis::Confidence,
    profile: Option<&'static str>,
    bvs: Option<f64>,
    rcs: Option<f64>,
    discrepancies: Vec<&'static str>,
}

impl<'a> From<&'a AnalysisReport> for ReportSummary<'a> {
    fn from(report: &'a AnalysisReport) -> Self {
        Self {
            user_id: &report.user_id.0,
            completeness: report.completeness_level.label(),
            confidence: report.confidence,
            profile: report.profile_id.map(|id| id.as_str()),
            bvs: report.bvs,
            rcs: report.rcs,
            discrepancies: report.discrepancies.iter().map(|d| d.id).collect(),
        }
    }
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs { input, as_of, json } = args;
    let file = std::fs::File::open(&input)?;
    let submission: AssessmentSubmission = serde_json::from_reader(io::BufReader::new(file))?;

    let service = cli_service()?;
    let report = service.analyze_submission(submission, as_of.unwrap_or_else(Utc::now))?;

    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        write_report(&mut out, &report)?;
    }
    Ok(())
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let ImportArgs { csv, as_of, json } = args;
    let reports = import_and_analyze(&csv, as_of.unwrap_or_else(Utc::now))?;

    let mut out = io::stdout().lock();
    for report in &reports {
        if json {
            serde_json::to_writer(&mut out, &ReportSummary::from(report))?;
            writeln!(out)?;
        } else {
            write_report(&mut out, report)?;
            writeln!(out)?;
        }
    }
    if !json {
        writeln!(out, "Analyzed {} users from {}", reports.len(), csv.display())?;
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let as_of = args.as_of.unwrap_or_else(Utc::now);
    let service = cli_service()?;

    let mut out = io::stdout().lock();
    writeln!(out, "MISO analysis demo")?;
    for persona in sample_personas_at(as_of) {
        writeln!(out, "\n== {} ==", persona.summary)?;
        let report = service.analyze_submission(persona.submission, as_of)?;
        write_report(&mut out, &report)?;
    }
    Ok(())
}

fn cli_service() -> Result<CliService, AppError> {
    let config = AppConfig::load()?;
    Ok(AnalysisService::new(
        Arc::new(InMemoryAssessmentRepository::default()),
        Arc::new(InMemoryAnalysisLog::default()),
        config.analysis,
    ))
}

/// Load every user from the export into a fresh service and analyze them in user order.
pub(crate) fn import_and_analyze(
    csv: &std::path::Path,
    as_of: DateTime<Utc>,
) -> Result<Vec<AnalysisReport>, AppError> {
    let submissions = AssessmentCsvImporter::from_path(csv)?;
    let users: Vec<_> = submissions
        .iter()
        .map(|submission| submission.user_id.clone())
        .collect();

    let repository = Arc::new(InMemoryAssessmentRepository::default());
    repository
        .extend(submissions)
        .map_err(AnalysisServiceError::from)?;
    let service = AnalysisService::new(
        repository,
        Arc::new(InMemoryAnalysisLog::default()),
        AppConfig::load()?.analysis,
    );

    users
        .iter()
        .map(|user_id| {
            service
                .analyze_user(user_id, as_of)
                .map_err(AppError::from)
        })
        .collect()
}

pub(crate) fn write_report<W: Write>(out: &mut W, report: &AnalysisReport) -> io::Result<()> {
    writeln!(
        out,
        "User {} | completeness {} | confidence {:?}",
        report.user_id,
        report.completeness_level.label(),
        report.confidence
    )?;

    if let (Some(bvs), Some(rcs)) = (report.bvs, report.rcs) {
        writeln!(out, "- Vulnerability {:.2} | Resilience {:.2}", bvs, rcs)?;
    }
    if let Some(profile) = &report.profile {
        writeln!(
            out,
            "- Profile: {} ({:?} risk)",
            profile.name, profile.risk_level
        )?;
    }
    if !report.completeness.stale_sources.is_empty() {
        let stale: Vec<_> = report
            .completeness
            .stale_sources
            .iter()
            .map(|source| source.label())
            .collect();
        writeln!(out, "- Stale results: {}", stale.join(", "))?;
    }
    for discrepancy in &report.discrepancies {
        writeln!(
            out,
            "- [{:?}] {}: {}",
            discrepancy.severity, discrepancy.name, discrepancy.interpretation
        )?;
    }

    let recommendations = &report.recommendations;
    if let Some(career) = &recommendations.career {
        let titles: Vec<_> = career.matches.iter().map(|m| m.title).collect();
        writeln!(
            out,
            "- Career ({}): {}",
            career.dominant_code,
            titles.join(", ")
        )?;
    }
    if let Some(learning) = &recommendations.learning {
        let names: Vec<_> = learning.techniques.iter().map(|t| t.name).collect();
        writeln!(out, "- Study techniques: {}", names.join(", "))?;
    }
    if let Some(sports) = &recommendations.sports {
        let names: Vec<_> = sports.activities.iter().map(|a| a.name).collect();
        writeln!(
            out,
            "- Mental toughness {:.0} | activities: {}",
            sports.mental_toughness,
            names.join(", ")
        )?;
    }
    if let Some(clinical) = &recommendations.clinical {
        writeln!(out, "- Support level: {:?}", clinical.support_level)?;
        for action in &clinical.actions {
            writeln!(out, "    * {}", action)?;
        }
    }
    Ok(())
}

pub(crate) fn sample_personas() -> Vec<Persona> {
    sample_personas_at(Utc::now())
}

fn sample_personas_at(as_of: DateTime<Utc>) -> Vec<Persona> {
    let recent = Some(as_of - Duration::days(21));
    let introvert = BigFiveSubmission {
        raw: TraitValues {
            openness: Some(60.0),
            conscientiousness: Some(75.0),
            extraversion: Some(30.0),
            agreeableness: Some(50.0),
            neuroticism: Some(80.0),
        },
        percentiles: TraitValues::default(),
        completed_at: recent,
    };

    let mut trait_only = AssessmentSubmission::empty("demo-trait-only");
    trait_only.big_five = Some(introvert.clone());

    let mut balanced = AssessmentSubmission::empty("demo-full-plus");
    balanced.big_five = Some(BigFiveSubmission {
        raw: TraitValues {
            openness: Some(72.0),
            conscientiousness: Some(80.0),
            extraversion: Some(70.0),
            agreeableness: Some(76.0),
            neuroticism: Some(38.0),
        },
        percentiles: TraitValues::default(),
        completed_at: recent,
    });
    balanced.mbti = Some(mbti("ENFJ", recent));
    balanced.via = Some(signature(&["Teamwork", "Zest", "Kindness"], recent));
    balanced.dass21 = Some(dass(4.0, 2.0, 6.0, recent));

    let mut masked = AssessmentSubmission::empty("demo-masked-distress");
    masked.big_five = Some(introvert);
    masked.mbti = Some(mbti("ISFJ", recent));
    masked.via = Some(signature(&["Hope", "Gratitude", "Kindness"], recent));
    masked.dass21 = Some(dass(28.0, 20.0, 22.0, Some(as_of - Duration::days(3))));

    vec![
        Persona {
            summary: "Trait-only introvert",
            submission: trait_only,
        },
        Persona {
            summary: "Fully assessed, low distress",
            submission: balanced,
        },
        Persona {
            summary: "Optimistic strengths over severe distress",
            submission: masked,
        },
    ]
}

fn mbti(code: &str, completed_at: Option<DateTime<Utc>>) -> MbtiSubmission {
    MbtiSubmission {
        code: code.to_string(),
        completed_at,
    }
}

fn signature(names: &[&str], completed_at: Option<DateTime<Utc>>) -> ViaSubmission {
    ViaSubmission {
        strengths: names
            .iter()
            .enumerate()
            .map(|(index, name)| ViaStrengthEntry {
                name: name.to_string(),
                rank: u8::try_from(index + 1).ok(),
                category: Some(StrengthCategory::Signature),
            })
            .collect(),
        completed_at,
    }
}

fn dass(
    depression: f64,
    anxiety: f64,
    stress: f64,
    completed_at: Option<DateTime<Utc>>,
) -> DassSubmission {
    DassSubmission {
        depression,
        anxiety,
        stress,
        completed_at,
    }
}
