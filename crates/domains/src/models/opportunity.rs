//! Opportunity postings and the input shape used to create or patch them.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};

/// Salary label used when a posting does not state one.
pub const DEFAULT_SALARY: &str = "Competitive";

string_enum! {
    /// The kind of listing.
    OpportunityType, "opportunity type" {
        Job => "Job",
        Internship => "Internship",
        Scholarship => "Scholarship",
        Tender => "Tender",
        Consultancy => "Consultancy",
    }
}

string_enum! {
    /// Work arrangement offered by the posting.
    WorkType, "work type" {
        FullTime => "Full Time",
        PartTime => "Part Time",
        Contract => "Contract",
        Remote => "Remote",
        Hybrid => "Hybrid",
    }
}

string_enum! {
    /// Publication state. Any state may move to any other.
    OpportunityStatus, "opportunity status" {
        Active => "Active",
        Draft => "Draft",
        Closed => "Closed",
        Archived => "Archived",
    }
}

impl Default for OpportunityStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// A postable listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub opp_type: OpportunityType,
    pub work_type: WorkType,
    pub industry: String,
    pub status: OpportunityStatus,
    pub salary: String,
    pub deadline: DateTime<Utc>,
    pub is_featured: bool,
    pub tags: Vec<String>,
    /// Short text or initials rendered in place of an image.
    pub logo: Option<String>,
    pub description: String,
    pub responsibilities: Vec<String>,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub about_company: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Opportunity {
    /// Expiry is never stored: a posting is expired once its deadline has
    /// passed or once it was closed/archived, whatever its stored status says.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.deadline < now
            || matches!(self.status, OpportunityStatus::Closed | OpportunityStatus::Archived)
    }
}

/// Client-supplied fields for create (all required ones present) and for
/// partial update (only supplied fields are applied).
///
/// Every field is optional at the type level so that missing or malformed
/// values surface as one [`DomainError::Validation`] listing every problem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpportunityInput {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub opp_type: Option<String>,
    pub work_type: Option<String>,
    pub industry: Option<String>,
    pub status: Option<String>,
    pub salary: Option<String>,
    /// RFC 3339 timestamp or plain `YYYY-MM-DD` date.
    pub deadline: Option<String>,
    pub is_featured: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub responsibilities: Option<Vec<String>>,
    pub requirements: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,
    pub about_company: Option<String>,
}

impl OpportunityInput {
    /// Validates a complete posting and stamps it with a fresh id.
    pub fn create(self, now: DateTime<Utc>) -> DomainResult<Opportunity> {
        self.build(Uuid::new_v4(), now, now)
    }

    /// Overlays the supplied fields on `existing` and validates the merged
    /// record as a whole.
    pub fn merge_into(self, existing: &Opportunity, now: DateTime<Utc>) -> DomainResult<Opportunity> {
        let base = OpportunityInput::from(existing);
        let merged = OpportunityInput {
            title: self.title.or(base.title),
            company: self.company.or(base.company),
            location: self.location.or(base.location),
            opp_type: self.opp_type.or(base.opp_type),
            work_type: self.work_type.or(base.work_type),
            industry: self.industry.or(base.industry),
            status: self.status.or(base.status),
            salary: self.salary.or(base.salary),
            deadline: self.deadline.or(base.deadline),
            is_featured: self.is_featured.or(base.is_featured),
            tags: self.tags.or(base.tags),
            logo: self.logo.or(base.logo),
            description: self.description.or(base.description),
            responsibilities: self.responsibilities.or(base.responsibilities),
            requirements: self.requirements.or(base.requirements),
            benefits: self.benefits.or(base.benefits),
            about_company: self.about_company.or(base.about_company),
        };
        merged.build(existing.id, existing.created_at, now)
    }

    fn build(
        self,
        id: Uuid,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<Opportunity> {
        let mut problems = Vec::new();

        let title = required_text(self.title, "A job title is required", &mut problems);
        let company = required_text(self.company, "Company name is required", &mut problems);
        let location = required_text(self.location, "location is required", &mut problems);
        let industry = required_text(self.industry, "industry is required", &mut problems);
        let description = required_text(self.description, "description is required", &mut problems);
        let opp_type = required_enum::<OpportunityType>(self.opp_type, "oppType", &mut problems);
        let work_type = required_enum::<WorkType>(self.work_type, "workType", &mut problems);

        let status = match self.status {
            None => Some(OpportunityStatus::default()),
            Some(raw) => raw.parse().map_err(|e: DomainError| problems.push(e.message().to_string())).ok(),
        };

        let deadline = match self.deadline.as_deref().map(str::trim) {
            None | Some("") => {
                problems.push("deadline is required".to_string());
                None
            }
            Some(raw) => parse_deadline(raw)
                .map_err(|e| problems.push(e.message().to_string()))
                .ok(),
        };

        let salary = self
            .salary
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SALARY.to_string());

        match (title, company, location, industry, description, opp_type, work_type, status, deadline) {
            (
                Some(title),
                Some(company),
                Some(location),
                Some(industry),
                Some(description),
                Some(opp_type),
                Some(work_type),
                Some(status),
                Some(deadline),
            ) if problems.is_empty() => Ok(Opportunity {
                id,
                title,
                company,
                location,
                opp_type,
                work_type,
                industry,
                status,
                salary,
                deadline,
                is_featured: self.is_featured.unwrap_or(false),
                tags: self.tags.unwrap_or_default(),
                logo: non_blank(self.logo),
                description,
                responsibilities: self.responsibilities.unwrap_or_default(),
                requirements: self.requirements.unwrap_or_default(),
                benefits: self.benefits.unwrap_or_default(),
                about_company: non_blank(self.about_company),
                created_at,
                updated_at,
            }),
            _ => Err(DomainError::validation(format!(
                "Invalid input data. {}",
                problems.join(". ")
            ))),
        }
    }
}

impl From<&Opportunity> for OpportunityInput {
    fn from(o: &Opportunity) -> Self {
        Self {
            title: Some(o.title.clone()),
            company: Some(o.company.clone()),
            location: Some(o.location.clone()),
            opp_type: Some(o.opp_type.as_str().to_string()),
            work_type: Some(o.work_type.as_str().to_string()),
            industry: Some(o.industry.clone()),
            status: Some(o.status.as_str().to_string()),
            salary: Some(o.salary.clone()),
            deadline: Some(o.deadline.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            is_featured: Some(o.is_featured),
            tags: Some(o.tags.clone()),
            logo: o.logo.clone(),
            description: Some(o.description.clone()),
            responsibilities: Some(o.responsibilities.clone()),
            requirements: Some(o.requirements.clone()),
            benefits: Some(o.benefits.clone()),
            about_company: o.about_company.clone(),
        }
    }
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM[:SS]` (read as UTC), or a plain
/// date (midnight UTC). Fractions below a microsecond are dropped.
pub fn parse_deadline(raw: &str) -> DomainResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc).trunc_subsecs(6));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(naive.and_utc().trunc_subsecs(6));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DomainError::validation(format!("`{}` is not a valid deadline date", raw)))
}

fn required_text(value: Option<String>, message: &str, problems: &mut Vec<String>) -> Option<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            problems.push(message.to_string());
            None
        }
    }
}

fn required_enum<T>(value: Option<String>, field: &str, problems: &mut Vec<String>) -> Option<T>
where
    T: std::str::FromStr<Err = DomainError>,
{
    match value.as_deref().map(str::trim) {
        None | Some("") => {
            problems.push(format!("{} is required", field));
            None
        }
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| problems.push(e.message().to_string()))
            .ok(),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
