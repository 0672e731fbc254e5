use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use domains::{
    ApplicationCount, ApplicationRepository, DashboardStats, DashboardTrends, DomainResult,
    OpportunityCount, OpportunityQuery, OpportunityRepository, OpportunityStatus, Page,
    RecentOpportunity, TimeWindow, Trend, TrendDirection, MAX_PAGE_LIMIT,
};

pub const DEFAULT_RECENT_LIMIT: u32 = 5;
const TREND_WINDOW_DAYS: i64 = 30;
const CLOSING_SOON_DAYS: i64 = 7;

#[derive(Clone)]
pub struct DashboardService {
    opportunities: Arc<dyn OpportunityRepository>,
    applications: Arc<dyn ApplicationRepository>,
}

impl DashboardService {
    pub fn new(
        opportunities: Arc<dyn OpportunityRepository>,
        applications: Arc<dyn ApplicationRepository>,
    ) -> Self {
        Self { opportunities, applications }
    }

    pub async fn stats(&self, now: DateTime<Utc>) -> DomainResult<DashboardStats> {
        let current = TimeWindow::closed(now - Duration::days(TREND_WINDOW_DAYS), now);
        let previous = TimeWindow::half_open(
            now - Duration::days(2 * TREND_WINDOW_DAYS),
            now - Duration::days(TREND_WINDOW_DAYS),
        );

        let total_opportunities = self.opportunities.count(&OpportunityCount::default()).await?;
        let total_applicants = self.applications.count(&ApplicationCount::default()).await?;

        let active_now = self
            .opportunities
            .count(&OpportunityCount {
                status: Some(OpportunityStatus::Active),
                deadline: Some(TimeWindow::since(now)),
                created: None,
            })
            .await?;
        let closing_soon = self
            .opportunities
            .count(&OpportunityCount {
                status: Some(OpportunityStatus::Active),
                deadline: Some(TimeWindow::closed(now, now + Duration::days(CLOSING_SOON_DAYS))),
                created: None,
            })
            .await?;

        let opportunities_trend = trend(
            self.opportunities
                .count(&OpportunityCount { created: Some(current), ..Default::default() })
                .await?,
            self.opportunities
                .count(&OpportunityCount { created: Some(previous), ..Default::default() })
                .await?,
        );
        let applicants_trend = trend(
            self.applications
                .count(&ApplicationCount { created: Some(current), ..Default::default() })
                .await?,
            self.applications
                .count(&ApplicationCount { created: Some(previous), ..Default::default() })
                .await?,
        );

        Ok(DashboardStats {
            total_opportunities,
            total_applicants,
            active_now,
            closing_soon,
            trends: DashboardTrends {
                opportunities: opportunities_trend,
                applicants: applicants_trend,
            },
        })
    }

    /// The newest postings with live applicant counts. A missing or
    /// non-positive `limit` means the default.
    pub async fn recent(
        &self,
        limit: Option<i64>,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<RecentOpportunity>> {
        let limit = limit
            .filter(|n| *n >= 1)
            .map_or(DEFAULT_RECENT_LIMIT, |n| n.min(i64::from(MAX_PAGE_LIMIT)) as u32);
        let query = OpportunityQuery {
            page: Some(Page { number: 1, limit }),
            ..Default::default()
        };

        let mut recent = Vec::new();
        for opportunity in self.opportunities.list(&query).await? {
            let applicants = self
                .applications
                .count(&ApplicationCount::for_opportunity(opportunity.id))
                .await?;
            let posted = time_ago(opportunity.created_at, now);
            recent.push(RecentOpportunity { opportunity, applicants, posted });
        }
        Ok(recent)
    }
}

pub fn trend(current: u64, previous: u64) -> Trend {
    let percent = if previous == 0 {
        if current > 0 { 100.0 } else { 0.0 }
    } else {
        (current as f64 - previous as f64) / previous as f64 * 100.0
    };
    let direction = if percent > 0.0 {
        TrendDirection::Up
    } else if percent < 0.0 {
        TrendDirection::Down
    } else {
        TrendDirection::Neutral
    };
    let change = if percent > 0.0 {
        format!("+{:.1}%", percent)
    } else {
        format!("{:.1}%", percent)
    };
    Trend { current, previous, percent, change, direction }
}

/// Coarse relative age, e.g. "3 hours ago".
pub fn time_ago(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created).num_seconds().max(0);
    let (count, unit) = match seconds {
        s if s < 60 => return "Just now".to_string(),
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s if s < 7 * 86_400 => (s / 86_400, "day"),
        s if s < 30 * 86_400 => (s / (7 * 86_400), "week"),
        s => (s / (30 * 86_400), "month"),
    };
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{MockApplicationRepository, MockOpportunityRepository, OpportunityInput};

    #[test]
    fn trend_edge_cases() {
        let flat = trend(0, 0);
        assert_eq!(flat.change, "0.0%");
        assert_eq!(flat.direction, TrendDirection::Neutral);

        let fresh = trend(4, 0);
        assert_eq!(fresh.change, "+100.0%");
        assert_eq!(fresh.direction, TrendDirection::Up);

        let down = trend(3, 4);
        assert_eq!(down.change, "-25.0%");
        assert_eq!(down.direction, TrendDirection::Down);

        assert_eq!(trend(7, 6).change, "+16.7%");
    }

    #[test]
    fn time_ago_buckets() {
        let now = Utc::now();
        assert_eq!(time_ago(now - Duration::seconds(30), now), "Just now");
        assert_eq!(time_ago(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(time_ago(now - Duration::minutes(59), now), "59 minutes ago");
        assert_eq!(time_ago(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(time_ago(now - Duration::days(1), now), "1 day ago");
        assert_eq!(time_ago(now - Duration::days(14), now), "2 weeks ago");
        assert_eq!(time_ago(now - Duration::days(95), now), "3 months ago");
        assert_eq!(time_ago(now + Duration::hours(1), now), "Just now");
    }

    #[tokio::test]
    async fn active_counts_require_a_live_deadline() {
        let now = Utc::now();
        let mut opportunities = MockOpportunityRepository::new();
        opportunities.expect_count().returning(move |c| {
            Ok(match (c.status, c.deadline) {
                (Some(OpportunityStatus::Active), Some(w)) => {
                    assert_eq!(w.start, Some(now));
                    if w.end.is_some() { 1 } else { 2 }
                }
                _ => 0,
            })
        });
        let mut applications = MockApplicationRepository::new();
        applications.expect_count().returning(|_| Ok(0));

        let stats = DashboardService::new(Arc::new(opportunities), Arc::new(applications))
            .stats(now)
            .await
            .unwrap();
        assert_eq!(stats.active_now, 2);
        assert_eq!(stats.closing_soon, 1);
        assert_eq!(stats.trends.applicants.change, "0.0%");
    }

    #[tokio::test]
    async fn recent_uses_default_limit_for_bad_values() {
        let mut opportunities = MockOpportunityRepository::new();
        opportunities
            .expect_list()
            .withf(|q| q.page == Some(Page { number: 1, limit: DEFAULT_RECENT_LIMIT }))
            .times(2)
            .returning(|_| Ok(Vec::new()));
        let service = DashboardService::new(
            Arc::new(opportunities),
            Arc::new(MockApplicationRepository::new()),
        );
        assert!(service.recent(None, Utc::now()).await.unwrap().is_empty());
        assert!(service.recent(Some(-3), Utc::now()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn recent_attaches_live_counts() {
        let now = Utc::now();
        let posting = OpportunityInput {
            title: Some("Field Officer".into()),
            company: Some("Relief Org".into()),
            location: Some("Gulu".into()),
            opp_type: Some("Job".into()),
            work_type: Some("Full Time".into()),
            industry: Some("NGO".into()),
            deadline: Some("2033-06-30".into()),
            description: Some("Coordinate field work".into()),
            ..Default::default()
        }
        .create(now - Duration::hours(2))
        .unwrap();
        let id = posting.id;

        let mut opportunities = MockOpportunityRepository::new();
        opportunities
            .expect_list()
            .withf(|q| q.page.map(|p| p.limit) == Some(100))
            .returning(move |_| Ok(vec![posting.clone()]));
        let mut applications = MockApplicationRepository::new();
        applications
            .expect_count()
            .withf(move |c| c.opportunity_id == Some(id))
            .returning(|_| Ok(3));

        let recent = DashboardService::new(Arc::new(opportunities), Arc::new(applications))
            .recent(Some(1_000), now)
            .await
            .unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].applicants, 3);
        assert_eq!(recent[0].posted, "2 hours ago");
    }
}
