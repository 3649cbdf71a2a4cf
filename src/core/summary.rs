use serde::Serialize;

use super::types::{GoalKind, GoalPlan, Projection};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindTotals {
    pub plans: usize,
    pub current_savings: f64,
    pub projected_value: f64,
    pub shortfall: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_plans: usize,
    pub plans_with_shortfall: usize,
    pub total_current_savings: f64,
    pub total_inflated_target: f64,
    pub total_projected_value: f64,
    pub total_shortfall: f64,
    pub education: KindTotals,
    pub marriage: KindTotals,
    pub investment: KindTotals,
}

impl PortfolioSummary {
    pub fn kind(&self, kind: GoalKind) -> &KindTotals {
        match kind {
            GoalKind::Education => &self.education,
            GoalKind::Marriage => &self.marriage,
            GoalKind::Investment => &self.investment,
        }
    }

    fn kind_mut(&mut self, kind: GoalKind) -> &mut KindTotals {
        match kind {
            GoalKind::Education => &mut self.education,
            GoalKind::Marriage => &mut self.marriage,
            GoalKind::Investment => &mut self.investment,
        }
    }
}

pub fn summarize<'a, I>(entries: I) -> PortfolioSummary
where
    I: IntoIterator<Item = (&'a GoalPlan, &'a Projection)>,
{
    let mut summary = PortfolioSummary::default();
    for (plan, projection) in entries {
        summary.total_plans += 1;
        if projection.has_shortfall() {
            summary.plans_with_shortfall += 1;
        }
        summary.total_current_savings += plan.current_savings;
        summary.total_inflated_target += projection.inflated_target;
        summary.total_projected_value += projection.projected_value;
        summary.total_shortfall += projection.shortfall;

        let totals = summary.kind_mut(plan.kind);
        totals.plans += 1;
        totals.current_savings += plan.current_savings;
        totals.projected_value += projection.projected_value;
        totals.shortfall += projection.shortfall;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::project_goal;

    fn plan(kind: GoalKind, target: f64, savings: f64, monthly: f64) -> GoalPlan {
        GoalPlan {
            kind,
            target_amount: target,
            current_savings: savings,
            monthly_contribution: monthly,
            annual_rate_percent: 0.0,
            target_year: 2028,
            current_year: 2026,
        }
    }

    #[test]
    fn empty_portfolio_is_all_zero() {
        let summary = summarize(std::iter::empty());
        assert_eq!(summary, PortfolioSummary::default());
    }

    #[test]
    fn totals_split_by_kind() {
        let plans = vec![
            plan(GoalKind::Education, 100_000.0, 10_000.0, 1_000.0),
            plan(GoalKind::Marriage, 50_000.0, 60_000.0, 0.0),
            plan(GoalKind::Education, 20_000.0, 5_000.0, 0.0),
        ];
        let projections = plans
            .iter()
            .map(|p| project_goal(p).expect("valid plan"))
            .collect::<Vec<_>>();

        let summary = summarize(plans.iter().zip(projections.iter()));

        assert_eq!(summary.total_plans, 3);
        assert_eq!(summary.plans_with_shortfall, 2);
        assert_eq!(summary.total_current_savings, 75_000.0);
        assert_eq!(summary.total_inflated_target, 170_000.0);
        // 10k + 24 x 1k, 60k, 5k
        assert_eq!(summary.total_projected_value, 99_000.0);
        assert_eq!(summary.total_shortfall, 66_000.0 + 15_000.0);

        let education = summary.kind(GoalKind::Education);
        assert_eq!(education.plans, 2);
        assert_eq!(education.current_savings, 15_000.0);
        assert_eq!(education.shortfall, 81_000.0);
        assert_eq!(summary.kind(GoalKind::Marriage).plans, 1);
        assert_eq!(summary.kind(GoalKind::Investment), &KindTotals::default());
    }
}
