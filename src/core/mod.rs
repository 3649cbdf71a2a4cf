mod engine;
mod error;
mod status;
mod summary;
mod types;

pub use engine::{project_goal, project_goal_with, validate_plan};
pub use error::{FieldViolation, ProjectionError, Result};
pub use status::{GoalStatus, classify_status, days_remaining, due_date, status_for};
pub use summary::{KindTotals, PortfolioSummary, summarize};
pub use types::{GoalKind, GoalPlan, Projection, ProjectionConfig};
