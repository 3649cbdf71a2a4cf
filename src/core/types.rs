use serde::Serialize;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalKind {
    Education,
    Marriage,
    #[default]
    Investment,
}

impl GoalKind {
    /// Month and day the goal falls due within its target year.
    pub fn due_month_day(self) -> (u32, u32) {
        match self {
            GoalKind::Education | GoalKind::Marriage => (6, 1),
            GoalKind::Investment => (12, 31),
        }
    }
}

/// One savings goal. Cost escalation and investment growth share
/// `annual_rate_percent`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPlan {
    pub kind: GoalKind,
    pub target_amount: f64,
    pub current_savings: f64,
    pub monthly_contribution: f64,
    pub annual_rate_percent: f64,
    pub target_year: i32,
    pub current_year: i32,
}

impl GoalPlan {
    pub fn years_remaining(&self) -> u32 {
        let diff = i64::from(self.target_year) - i64::from(self.current_year);
        diff.max(0) as u32
    }

    pub fn months_remaining(&self) -> u64 {
        u64::from(self.years_remaining()) * 12
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionConfig {
    pub recommendation_step: f64,
    pub progress_ceiling: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            recommendation_step: 1_000.0,
            progress_ceiling: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub years_remaining: u32,
    pub inflated_target: f64,
    pub fv_savings: f64,
    pub fv_contributions: f64,
    pub projected_value: f64,
    pub progress_current_raw: f64,
    pub progress_current_clamped: f64,
    pub progress_projected_raw: f64,
    pub progress_projected_clamped: f64,
    pub shortfall: f64,
    pub recommended_increase: Option<f64>,
    pub total_contributions: f64,
    pub expected_gains: f64,
}

impl Projection {
    pub fn has_shortfall(&self) -> bool {
        self.shortfall > 0.0
    }

    pub fn is_surplus(&self) -> bool {
        self.progress_projected_raw > 1.0
    }
}
