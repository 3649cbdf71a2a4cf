use tracing::debug;

use super::error::{FieldViolation, ProjectionError, Result};
use super::types::{GoalPlan, Projection, ProjectionConfig};

pub fn project_goal(plan: &GoalPlan) -> Result<Projection> {
    project_goal_with(plan, &ProjectionConfig::default())
}

pub fn project_goal_with(plan: &GoalPlan, config: &ProjectionConfig) -> Result<Projection> {
    validate_config(config)?;
    validate_plan(plan)?;

    let years = plan.years_remaining();
    let rate = plan.annual_rate_percent / 100.0;
    debug!(
        kind = ?plan.kind,
        target_amount = plan.target_amount,
        current_savings = plan.current_savings,
        monthly_contribution = plan.monthly_contribution,
        annual_rate_percent = plan.annual_rate_percent,
        years_remaining = years,
        "projecting goal"
    );

    let inflated_target = inflated_target(plan.target_amount, rate, years);
    let fv_savings = future_value_of_savings(plan.current_savings, rate, years);
    let fv_contributions = future_value_of_contributions(plan.monthly_contribution, rate, years);
    let projected_value = fv_savings + fv_contributions;
    let total_contributions =
        plan.current_savings + plan.monthly_contribution * plan.months_remaining() as f64;
    ensure_finite_growth(
        plan,
        &[
            inflated_target,
            fv_savings,
            fv_contributions,
            projected_value,
            total_contributions,
        ],
    )?;

    let progress_current_raw = progress_ratio(plan.current_savings, inflated_target);
    let progress_projected_raw = progress_ratio(projected_value, inflated_target);
    let shortfall = (inflated_target - projected_value).max(0.0);

    Ok(Projection {
        years_remaining: years,
        inflated_target,
        fv_savings,
        fv_contributions,
        projected_value,
        progress_current_raw,
        progress_current_clamped: clamp_percent(progress_current_raw, config.progress_ceiling),
        progress_projected_raw,
        progress_projected_clamped: clamp_percent(progress_projected_raw, config.progress_ceiling),
        shortfall,
        recommended_increase: recommended_increase(shortfall, years, config.recommendation_step),
        total_contributions,
        expected_gains: (projected_value - total_contributions).max(0.0),
    })
}

pub fn validate_plan(plan: &GoalPlan) -> Result<()> {
    let violations = [
        ("targetAmount", plan.target_amount),
        ("currentSavings", plan.current_savings),
        ("monthlyContribution", plan.monthly_contribution),
        ("annualRatePercent", plan.annual_rate_percent),
    ]
    .into_iter()
    .filter_map(|(field, value)| {
        if !value.is_finite() {
            Some(FieldViolation::new(field, value, "must be a finite number"))
        } else if value < 0.0 {
            Some(FieldViolation::new(field, value, "must be >= 0"))
        } else {
            None
        }
    })
    .collect::<Vec<_>>();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ProjectionError::invalid(violations))
    }
}

fn validate_config(config: &ProjectionConfig) -> Result<()> {
    let violations = [
        ("recommendationStep", config.recommendation_step),
        ("progressCeiling", config.progress_ceiling),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_finite() || *value <= 0.0)
    .map(|(field, value)| FieldViolation::new(field, value, "must be > 0"))
    .collect::<Vec<_>>();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ProjectionError::invalid(violations))
    }
}

// Long horizons overflow f64. Reject before max/min clamping hides inf or NaN.
fn ensure_finite_growth(plan: &GoalPlan, amounts: &[f64]) -> Result<()> {
    if amounts.iter().all(|v| v.is_finite()) {
        return Ok(());
    }
    Err(ProjectionError::invalid(vec![
        FieldViolation::new(
            "annualRatePercent",
            plan.annual_rate_percent,
            "horizon overflows",
        ),
        FieldViolation::new("targetYear", plan.target_year, "horizon overflows"),
    ]))
}

fn growth_factor(rate: f64, years: u32) -> f64 {
    (1.0 + rate).powf(f64::from(years))
}

fn inflated_target(target_amount: f64, rate: f64, years: u32) -> f64 {
    target_amount * growth_factor(rate, years)
}

fn future_value_of_savings(current_savings: f64, rate: f64, years: u32) -> f64 {
    if years == 0 {
        return current_savings;
    }
    current_savings * growth_factor(rate, years)
}

// Ordinary annuity with monthly compounding. Zero rate accumulates linearly.
fn future_value_of_contributions(monthly_contribution: f64, rate: f64, years: u32) -> f64 {
    if years == 0 {
        return 0.0;
    }
    let total_months = f64::from(years) * 12.0;
    if rate == 0.0 {
        return monthly_contribution * total_months;
    }
    let monthly_rate = rate / 12.0;
    monthly_contribution * (((1.0 + monthly_rate).powf(total_months) - 1.0) / monthly_rate)
}

fn progress_ratio(value: f64, inflated_target: f64) -> f64 {
    if inflated_target == 0.0 {
        return 0.0;
    }
    value / inflated_target
}

fn clamp_percent(ratio: f64, ceiling: f64) -> f64 {
    (ratio * 100.0).min(ceiling)
}

fn recommended_increase(shortfall: f64, years: u32, step: f64) -> Option<f64> {
    if years == 0 || shortfall <= 0.0 {
        return None;
    }
    let per_month = shortfall / (f64::from(years) * 12.0);
    Some((per_month / step).ceil() * step)
}
