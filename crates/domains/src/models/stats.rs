use serde::Serialize;

use crate::models::opportunity::Opportunity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

/// Percentage change between two adjacent 30-day windows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    pub current: u64,
    pub previous: u64,
    pub percent: f64,
    /// Rendered form, e.g. `+12.5%`, `-3.0%`, `0.0%`.
    pub change: String,
    pub direction: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardTrends {
    pub opportunities: Trend,
    pub applicants: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_opportunities: u64,
    pub total_applicants: u64,
    pub active_now: u64,
    pub closing_soon: u64,
    pub trends: DashboardTrends,
}

/// One labelled tile of the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub label: &'static str,
    pub value: u64,
    pub change: String,
    pub trend: TrendDirection,
}

impl DashboardStats {
    pub fn cards(&self) -> Vec<StatCard> {
        let closing = if self.closing_soon > 0 {
            (format!("-{}", self.closing_soon), TrendDirection::Down)
        } else {
            ("0".to_string(), TrendDirection::Neutral)
        };

        vec![
            StatCard {
                label: "Total Opportunities",
                value: self.total_opportunities,
                change: self.trends.opportunities.change.clone(),
                trend: self.trends.opportunities.direction,
            },
            StatCard {
                label: "Total Applicants",
                value: self.total_applicants,
                change: self.trends.applicants.change.clone(),
                trend: self.trends.applicants.direction,
            },
            StatCard {
                label: "Active Now",
                value: self.active_now,
                change: "0%".to_string(),
                trend: TrendDirection::Neutral,
            },
            StatCard {
                label: "Closing Soon",
                value: self.closing_soon,
                change: closing.0,
                trend: closing.1,
            },
        ]
    }
}

/// A recent posting annotated for the dashboard. Both extra fields are
/// recomputed on every read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentOpportunity {
    #[serde(flatten)]
    pub opportunity: Opportunity,
    pub applicants: u64,
    pub posted: String,
}
