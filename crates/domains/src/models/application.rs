use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};
use crate::models::opportunity::Opportunity;

/// Placeholder shown when an application outlives its opportunity.
pub const UNKNOWN_ROLE: &str = "Unknown Role";
pub const UNKNOWN_COMPANY: &str = "Unknown Company";

string_enum! {
    /// Review state of a submission. Transitions are unrestricted.
    ApplicationStatus, "application status" {
        New => "New",
        Reviewed => "Reviewed",
        Shortlisted => "Shortlisted",
        Rejected => "Rejected",
        Contacted => "Contacted",
    }
}

impl Default for ApplicationStatus {
    fn default() -> Self {
        Self::New
    }
}

/// A candidate's submission against one opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    /// Back-reference only; the opportunity may since have been deleted.
    pub opportunity_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// Durable link produced by the external asset host.
    pub resume_url: String,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public submission payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationInput {
    pub opportunity_id: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub resume_url: Option<String>,
    pub cover_letter: Option<String>,
}

impl ApplicationInput {
    /// The referenced opportunity, if the payload names a well-formed id.
    pub fn opportunity_ref(&self) -> Option<Uuid> {
        self.opportunity_id
            .as_deref()
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
    }

    /// Validates the candidate fields. The caller has already resolved
    /// `opportunity_id` against the store.
    pub fn into_application(self, opportunity_id: Uuid, now: DateTime<Utc>) -> DomainResult<Application> {
        let mut problems = Vec::new();

        let full_name = required(self.full_name, "Full name is required", &mut problems);
        let email = required(self.email, "Email is required", &mut problems).map(|e| e.to_lowercase());
        let phone = required(self.phone, "Phone number is required", &mut problems);
        let resume_url = required(self.resume_url, "Resume link is required", &mut problems)
            .and_then(|raw| match validate_resume_url(&raw) {
                Ok(()) => Some(raw),
                Err(e) => {
                    problems.push(e.message().to_string());
                    None
                }
            });

        if let Some(email) = email.as_deref() {
            if !email.contains('@') {
                problems.push(format!("`{}` is not a valid email", email));
            }
        }

        match (full_name, email, phone, resume_url) {
            (Some(full_name), Some(email), Some(phone), Some(resume_url)) if problems.is_empty() => {
                Ok(Application {
                    id: Uuid::new_v4(),
                    opportunity_id,
                    full_name,
                    email,
                    phone,
                    resume_url,
                    cover_letter: self
                        .cover_letter
                        .map(|c| c.trim().to_string())
                        .filter(|c| !c.is_empty()),
                    status: ApplicationStatus::New,
                    admin_notes: None,
                    created_at: now,
                    updated_at: now,
                })
            }
            _ => Err(DomainError::validation(format!(
                "Invalid input data. {}",
                problems.join(". ")
            ))),
        }
    }
}

/// Administrative review payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusUpdate {
    pub status: Option<String>,
    /// `None` leaves the stored notes untouched.
    pub admin_notes: Option<String>,
}

impl StatusUpdate {
    pub fn parse(self) -> DomainResult<(ApplicationStatus, Option<String>)> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => return Err(DomainError::validation("status is required")),
            Some(raw) => raw.parse::<ApplicationStatus>()?,
        };
        Ok((status, self.admin_notes))
    }
}

/// The slice of an opportunity shown next to each application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunitySummary {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    /// Set when the referenced opportunity no longer exists.
    pub orphaned: bool,
}

impl OpportunitySummary {
    pub fn of(opportunity: &Opportunity) -> Self {
        Self {
            id: opportunity.id,
            title: opportunity.title.clone(),
            company: opportunity.company.clone(),
            orphaned: false,
        }
    }

    pub fn missing(id: Uuid) -> Self {
        Self {
            id,
            title: UNKNOWN_ROLE.to_string(),
            company: UNKNOWN_COMPANY.to_string(),
            orphaned: true,
        }
    }
}

/// An application joined with its opportunity at read time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationListing {
    #[serde(flatten)]
    pub application: Application,
    pub opportunity: OpportunitySummary,
}

fn required(value: Option<String>, message: &str, problems: &mut Vec<String>) -> Option<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            problems.push(message.to_string());
            None
        }
    }
}

fn validate_resume_url(raw: &str) -> DomainResult<()> {
    let parsed = url::Url::parse(raw)
        .map_err(|_| DomainError::validation(format!("`{}` is not a valid resume link", raw)))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        _ => Err(DomainError::validation("Resume link must be an http(s) URL")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ApplicationInput {
        ApplicationInput {
            opportunity_id: Some(Uuid::new_v4().to_string()),
            full_name: Some("Jane Doe".into()),
            email: Some("Jane@Example.com".into()),
            phone: Some("+254700000000".into()),
            resume_url: Some("https://assets.example.com/resumes/jane.pdf".into()),
            cover_letter: Some("   ".into()),
        }
    }

    #[test]
    fn submission_defaults_to_new_and_lowercases_email() {
        let input = input();
        let opp_id = input.opportunity_ref().unwrap();
        let app = input.into_application(opp_id, Utc::now()).unwrap();
        assert_eq!(app.status, ApplicationStatus::New);
        assert_eq!(app.email, "jane@example.com");
        assert_eq!(app.cover_letter, None);
        assert_eq!(app.opportunity_id, opp_id);
    }

    #[test]
    fn malformed_opportunity_reference_is_none() {
        let mut input = input();
        input.opportunity_id = Some("not-an-id".into());
        assert!(input.opportunity_ref().is_none());
        input.opportunity_id = None;
        assert!(input.opportunity_ref().is_none());
    }

    #[test]
    fn missing_candidate_fields_are_reported() {
        let err = ApplicationInput::default()
            .into_application(Uuid::new_v4(), Utc::now())
            .unwrap_err();
        let msg = err.message();
        assert!(msg.contains("Full name is required"));
        assert!(msg.contains("Email is required"));
        assert!(msg.contains("Phone number is required"));
        assert!(msg.contains("Resume link is required"));
    }

    #[test]
    fn resume_link_must_be_http() {
        let mut bad = input();
        bad.resume_url = Some("file:///etc/passwd".into());
        assert!(bad.into_application(Uuid::new_v4(), Utc::now()).is_err());
    }

    #[test]
    fn status_update_requires_known_status() {
        let ok = StatusUpdate { status: Some("Shortlisted".into()), admin_notes: None };
        assert_eq!(ok.parse().unwrap(), (ApplicationStatus::Shortlisted, None));

        let missing = StatusUpdate::default();
        assert!(matches!(missing.parse(), Err(DomainError::Validation(_))));

        let unknown = StatusUpdate { status: Some("Hired".into()), admin_notes: None };
        assert!(matches!(unknown.parse(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn listing_flattens_application() {
        let input = input();
        let opp_id = input.opportunity_ref().unwrap();
        let app = input.into_application(opp_id, Utc::now()).unwrap();
        let listing = ApplicationListing {
            application: app,
            opportunity: OpportunitySummary::missing(opp_id),
        };
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["fullName"], "Jane Doe");
        assert_eq!(json["opportunity"]["title"], UNKNOWN_ROLE);
        assert_eq!(json["opportunity"]["orphaned"], true);
    }
}
