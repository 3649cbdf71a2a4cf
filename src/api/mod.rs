use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::{
    FieldViolation, GoalKind, GoalPlan, GoalStatus, PortfolioSummary, Projection,
    ProjectionConfig, ProjectionError, days_remaining, project_goal_with, status_for, summarize,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliGoalKind {
    Education,
    Marriage,
    Investment,
}

impl From<CliGoalKind> for GoalKind {
    fn from(value: CliGoalKind) -> Self {
        match value {
            CliGoalKind::Education => GoalKind::Education,
            CliGoalKind::Marriage => GoalKind::Marriage,
            CliGoalKind::Investment => GoalKind::Investment,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ApiGoalKind {
    #[serde(alias = "EDUCATION", alias = "Education")]
    Education,
    #[serde(alias = "MARRIAGE", alias = "Marriage", alias = "wedding")]
    Marriage,
    #[serde(alias = "INVESTMENT", alias = "Investment", alias = "savings")]
    Investment,
}

impl From<ApiGoalKind> for GoalKind {
    fn from(value: ApiGoalKind) -> Self {
        match value {
            ApiGoalKind::Education => GoalKind::Education,
            ApiGoalKind::Marriage => GoalKind::Marriage,
            ApiGoalKind::Investment => GoalKind::Investment,
        }
    }
}

impl From<CliGoalKind> for ApiGoalKind {
    fn from(value: CliGoalKind) -> Self {
        match value {
            CliGoalKind::Education => ApiGoalKind::Education,
            CliGoalKind::Marriage => ApiGoalKind::Marriage,
            CliGoalKind::Investment => ApiGoalKind::Investment,
        }
    }
}

/// Form fields arrive either as JSON numbers or as the raw text typed into
/// the form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlanPayload {
    #[serde(alias = "planName", alias = "plan_name")]
    name: Option<String>,
    #[serde(alias = "goalType", alias = "goal_type")]
    kind: Option<ApiGoalKind>,

    #[serde(
        alias = "target_amount",
        alias = "goalAmount",
        alias = "estimatedTotal",
        alias = "estimated_total",
        alias = "estimatedTotalCost"
    )]
    target_amount: Option<NumberOrText>,
    #[serde(alias = "current_savings")]
    current_savings: Option<NumberOrText>,
    #[serde(
        alias = "monthly_contribution",
        alias = "monthlyContrib",
        alias = "monthly_contrib"
    )]
    monthly_contribution: Option<NumberOrText>,
    #[serde(
        alias = "annual_rate_percent",
        alias = "annualRate",
        alias = "expectedReturn",
        alias = "inflationRate",
        alias = "inflation_rate"
    )]
    annual_rate_percent: Option<NumberOrText>,
    #[serde(
        alias = "target_year",
        alias = "estimatedYear",
        alias = "estimated_year",
        alias = "estimatedStartYear"
    )]
    target_year: Option<NumberOrText>,
}

#[derive(Parser, Debug)]
#[command(
    name = "nestegg",
    version,
    about = "Goal projection and shortfall calculator for education, marriage and investment plans"
)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,
    #[arg(
        long,
        global = true,
        help = "Evaluation date (YYYY-MM-DD), defaults to today"
    )]
    pub as_of: Option<NaiveDate>,
    #[arg(
        long,
        global = true,
        help = "Evaluation year, defaults to the year of --as-of"
    )]
    pub current_year: Option<i32>,
    #[arg(
        long,
        global = true,
        default_value_t = 1000.0,
        help = "Rounding step for the recommended monthly increase"
    )]
    pub recommendation_step: f64,
    #[arg(
        long,
        global = true,
        default_value_t = 8.0,
        help = "Annual rate in percent for investment plans that omit one"
    )]
    pub default_investment_rate: f64,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Project a single goal given on the command line
    #[command(allow_negative_numbers = true)]
    Project {
        #[arg(long, help = "Present-day cost of the goal")]
        target_amount: f64,
        #[arg(long, default_value_t = 0.0)]
        current_savings: f64,
        #[arg(long, default_value_t = 0.0)]
        monthly_contribution: f64,
        #[arg(long, help = "Annual growth/inflation rate in percent, e.g. 6.5")]
        annual_rate: Option<f64>,
        #[arg(long)]
        target_year: i32,
        #[arg(long, value_enum, default_value_t = CliGoalKind::Investment)]
        kind: CliGoalKind,
    },
    /// Project every plan in a JSON array and summarise the portfolio
    Report {
        #[arg(long, help = "JSON file with an array of plans; reads stdin when omitted")]
        file: Option<PathBuf>,
    },
}

/// Everything a projection depends on besides the plan itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationContext {
    pub as_of: NaiveDate,
    pub current_year: i32,
    pub default_investment_rate: f64,
    pub config: ProjectionConfig,
}

impl EvaluationContext {
    pub fn from_cli(cli: &Cli, today: NaiveDate) -> Self {
        let as_of = cli.as_of.unwrap_or(today);
        Self {
            as_of,
            current_year: cli.current_year.unwrap_or_else(|| as_of.year()),
            default_investment_rate: cli.default_investment_rate,
            config: ProjectionConfig {
                recommendation_step: cli.recommendation_step,
                ..ProjectionConfig::default()
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub plan: GoalPlan,
    pub projection: Projection,
    pub days_remaining: i64,
    pub status: GoalStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedPlan {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub as_of: String,
    pub current_year: i32,
    pub plans: Vec<PlanReport>,
    pub rejected: Vec<RejectedPlan>,
    pub summary: PortfolioSummary,
}

pub fn run(cli: Cli, today: NaiveDate) -> anyhow::Result<String> {
    let ctx = EvaluationContext::from_cli(&cli, today);
    match cli.command {
        Command::Project {
            target_amount,
            current_savings,
            monthly_contribution,
            annual_rate,
            target_year,
            kind,
        } => {
            let payload = PlanPayload {
                name: None,
                kind: Some(kind.into()),
                target_amount: Some(NumberOrText::Number(target_amount)),
                current_savings: Some(NumberOrText::Number(current_savings)),
                monthly_contribution: Some(NumberOrText::Number(monthly_contribution)),
                annual_rate_percent: annual_rate.map(NumberOrText::Number),
                target_year: Some(NumberOrText::Number(f64::from(target_year))),
            };
            let report = evaluate_payload(payload, &ctx)?;
            info!(
                shortfall = report.projection.shortfall,
                status = ?report.status,
                "projected goal"
            );
            Ok(serde_json::to_string_pretty(&report)?)
        }
        Command::Report { file } => {
            let json = match file {
                Some(path) => fs::read_to_string(&path)
                    .with_context(|| format!("failed to read plans from {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read plans from stdin")?;
                    buf
                }
            };
            let response = report_from_json(&json, &ctx)?;
            info!(
                plans = response.plans.len(),
                rejected = response.rejected.len(),
                total_shortfall = response.summary.total_shortfall,
                "built portfolio report"
            );
            Ok(serde_json::to_string_pretty(&response)?)
        }
    }
}

pub fn report_from_json(json: &str, ctx: &EvaluationContext) -> anyhow::Result<ReportResponse> {
    let entries = serde_json::from_str::<Vec<serde_json::Value>>(json)
        .context("plans must be a JSON array of plan objects")?;

    let mut plans = Vec::with_capacity(entries.len());
    let mut rejected = Vec::new();
    for (index, entry) in entries.into_iter().enumerate() {
        let name = entry
            .get("name")
            .or_else(|| entry.get("planName"))
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let outcome = serde_json::from_value::<PlanPayload>(entry)
            .map_err(|e| format!("invalid plan payload: {e}"))
            .and_then(|payload| evaluate_payload(payload, ctx).map_err(|e| e.to_string()));
        match outcome {
            Ok(report) => plans.push(report),
            Err(error) => {
                warn!(index, name = name.as_deref(), %error, "rejected plan");
                rejected.push(RejectedPlan { index, name, error });
            }
        }
    }

    let summary = summarize(plans.iter().map(|r| (&r.plan, &r.projection)));
    Ok(ReportResponse {
        as_of: ctx.as_of.to_string(),
        current_year: ctx.current_year,
        plans,
        rejected,
        summary,
    })
}

fn evaluate_payload(
    payload: PlanPayload,
    ctx: &EvaluationContext,
) -> Result<PlanReport, ProjectionError> {
    let name = payload.name.clone();
    let plan = build_plan(payload, ctx)?;
    let projection = project_goal_with(&plan, &ctx.config)?;
    let days = days_remaining(plan.kind, plan.target_year, ctx.as_of);
    let status = status_for(&projection, days);
    Ok(PlanReport {
        name,
        plan,
        projection,
        days_remaining: days,
        status,
    })
}

fn build_plan(payload: PlanPayload, ctx: &EvaluationContext) -> Result<GoalPlan, ProjectionError> {
    let kind = payload.kind.map(GoalKind::from).unwrap_or_default();
    let mut violations = Vec::new();

    let mut amount = |field: &'static str, raw: Option<&NumberOrText>| -> Option<f64> {
        coerce_number(field, raw).unwrap_or_else(|violation| {
            violations.push(violation);
            None
        })
    };
    let target_amount = amount("targetAmount", payload.target_amount.as_ref());
    let current_savings = amount("currentSavings", payload.current_savings.as_ref());
    let monthly_contribution =
        amount("monthlyContribution", payload.monthly_contribution.as_ref());
    let annual_rate_percent = amount("annualRatePercent", payload.annual_rate_percent.as_ref());

    let target_year = coerce_year("targetYear", payload.target_year.as_ref()).unwrap_or_else(
        |violation| {
            violations.push(violation);
            None
        },
    );

    let already_rejected = |violations: &[FieldViolation], field: &str| {
        violations.iter().any(|v| v.field == field)
    };
    if target_amount.is_none() && !already_rejected(&violations, "targetAmount") {
        violations.push(FieldViolation::new("targetAmount", "missing", "is required"));
    }
    if target_year.is_none() && !already_rejected(&violations, "targetYear") {
        violations.push(FieldViolation::new("targetYear", "missing", "is required"));
    }
    let annual_rate_percent = match (annual_rate_percent, kind) {
        (Some(rate), _) => Some(rate),
        (None, GoalKind::Investment) => Some(ctx.default_investment_rate),
        (None, _) => {
            if !already_rejected(&violations, "annualRatePercent") {
                violations.push(FieldViolation::new(
                    "annualRatePercent",
                    "missing",
                    "is required",
                ));
            }
            None
        }
    };

    match (target_amount, target_year, annual_rate_percent) {
        (Some(target_amount), Some(target_year), Some(annual_rate_percent))
            if violations.is_empty() =>
        {
            Ok(GoalPlan {
                kind,
                target_amount,
                current_savings: current_savings.unwrap_or(0.0),
                monthly_contribution: monthly_contribution.unwrap_or(0.0),
                annual_rate_percent,
                target_year,
                current_year: ctx.current_year,
            })
        }
        _ => Err(ProjectionError::invalid(violations)),
    }
}

fn coerce_number(
    field: &'static str,
    raw: Option<&NumberOrText>,
) -> Result<Option<f64>, FieldViolation> {
    match raw {
        None => Ok(None),
        Some(NumberOrText::Number(v)) => Ok(Some(*v)),
        Some(NumberOrText::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| FieldViolation::new(field, trimmed, "not a number"))
        }
    }
}

fn coerce_year(
    field: &'static str,
    raw: Option<&NumberOrText>,
) -> Result<Option<i32>, FieldViolation> {
    match raw {
        None => Ok(None),
        Some(NumberOrText::Number(v)) => whole_year(field, *v).map(Some),
        Some(NumberOrText::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            let v = trimmed
                .parse::<f64>()
                .map_err(|_| FieldViolation::new(field, trimmed, "not a whole year"))?;
            whole_year(field, v).map(Some)
        }
    }
}

fn whole_year(field: &'static str, v: f64) -> Result<i32, FieldViolation> {
    if v.fract() == 0.0 && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX) {
        Ok(v as i32)
    } else {
        Err(FieldViolation::new(field, v, "not a whole year"))
    }
}
