//! Typed listing and counting queries.
//!
//! Client query strings are never forwarded to a store. Each permitted key is
//! mapped to a typed field and its value parsed up front; anything else is
//! dropped. Adapters only ever see these structs.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};
use crate::models::application::{Application, ApplicationStatus};
use crate::models::opportunity::{Opportunity, OpportunityStatus, OpportunityType, WorkType};

/// Page size used when a client asks for a page without a limit.
pub const DEFAULT_PAGE_LIMIT: u32 = 100;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Opportunity fields a client may filter on, keyed by their query name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Title,
    Company,
    Location,
    OppType,
    WorkType,
    Industry,
    Status,
    IsFeatured,
}

impl FilterField {
    pub const ALLOWED: [(&'static str, FilterField); 8] = [
        ("title", FilterField::Title),
        ("company", FilterField::Company),
        ("location", FilterField::Location),
        ("oppType", FilterField::OppType),
        ("workType", FilterField::WorkType),
        ("industry", FilterField::Industry),
        ("status", FilterField::Status),
        ("isFeatured", FilterField::IsFeatured),
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALLOWED
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, field)| *field)
    }
}

/// Exact-match filter over the allow-listed opportunity fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpportunityFilter {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub opp_type: Option<OpportunityType>,
    pub work_type: Option<WorkType>,
    pub industry: Option<String>,
    pub status: Option<OpportunityStatus>,
    pub is_featured: Option<bool>,
}

impl OpportunityFilter {
    pub fn set(&mut self, field: FilterField, raw: &str) -> DomainResult<()> {
        match field {
            FilterField::Title => self.title = Some(raw.to_string()),
            FilterField::Company => self.company = Some(raw.to_string()),
            FilterField::Location => self.location = Some(raw.to_string()),
            FilterField::Industry => self.industry = Some(raw.to_string()),
            FilterField::OppType => self.opp_type = Some(raw.parse()?),
            FilterField::WorkType => self.work_type = Some(raw.parse()?),
            FilterField::Status => self.status = Some(raw.parse()?),
            FilterField::IsFeatured => self.is_featured = Some(parse_bool(raw)?),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, o: &Opportunity) -> bool {
        fn eq<T: PartialEq>(want: &Option<T>, have: &T) -> bool {
            want.as_ref().map_or(true, |w| w == have)
        }

        eq(&self.title, &o.title)
            && eq(&self.company, &o.company)
            && eq(&self.location, &o.location)
            && eq(&self.opp_type, &o.opp_type)
            && eq(&self.work_type, &o.work_type)
            && eq(&self.industry, &o.industry)
            && eq(&self.status, &o.status)
            && eq(&self.is_featured, &o.is_featured)
    }
}

/// Fields an opportunity listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Deadline,
    Title,
    Company,
    Location,
    Industry,
    Status,
    OppType,
    WorkType,
    IsFeatured,
    Salary,
}

impl SortField {
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "createdAt" => Self::CreatedAt,
            "updatedAt" => Self::UpdatedAt,
            "deadline" => Self::Deadline,
            "title" => Self::Title,
            "company" => Self::Company,
            "location" => Self::Location,
            "industry" => Self::Industry,
            "status" => Self::Status,
            "oppType" => Self::OppType,
            "workType" => Self::WorkType,
            "isFeatured" => Self::IsFeatured,
            "salary" => Self::Salary,
            _ => return None,
        })
    }

    /// Column name in the relational schema.
    pub fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Deadline => "deadline",
            Self::Title => "title",
            Self::Company => "company",
            Self::Location => "location",
            Self::Industry => "industry",
            Self::Status => "status",
            Self::OppType => "opp_type",
            Self::WorkType => "work_type",
            Self::IsFeatured => "is_featured",
            Self::Salary => "salary",
        }
    }

    fn compare(&self, a: &Opportunity, b: &Opportunity) -> Ordering {
        match self {
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            Self::Deadline => a.deadline.cmp(&b.deadline),
            Self::Title => a.title.cmp(&b.title),
            Self::Company => a.company.cmp(&b.company),
            Self::Location => a.location.cmp(&b.location),
            Self::Industry => a.industry.cmp(&b.industry),
            Self::Status => a.status.as_str().cmp(b.status.as_str()),
            Self::OppType => a.opp_type.as_str().cmp(b.opp_type.as_str()),
            Self::WorkType => a.work_type.as_str().cmp(b.work_type.as_str()),
            Self::IsFeatured => a.is_featured.cmp(&b.is_featured),
            Self::Salary => a.salary.cmp(&b.salary),
        }
    }
}

/// Single-field ordering; ties fall back to newest first, then id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpportunitySort {
    pub field: SortField,
    pub descending: bool,
}

impl Default for OpportunitySort {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            descending: true,
        }
    }
}

impl OpportunitySort {
    /// Parses `field` or `-field`. Only the first of several comma or space
    /// separated keys is honoured; an unknown field yields the default order.
    pub fn parse(raw: &str) -> Self {
        let first = raw
            .split(|c: char| c == ',' || c.is_whitespace())
            .find(|s| !s.is_empty())
            .unwrap_or("");
        let (descending, key) = match first.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, first.strip_prefix('+').unwrap_or(first)),
        };
        SortField::from_key(key)
            .map(|field| Self { field, descending })
            .unwrap_or_default()
    }

    pub fn compare(&self, a: &Opportunity, b: &Opportunity) -> Ordering {
        let primary = self.field.compare(a, b);
        let primary = if self.descending { primary.reverse() } else { primary };
        primary
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| a.id.cmp(&b.id))
    }
}

/// One-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub limit: u32,
}

impl Page {
    pub fn offset(&self) -> u64 {
        u64::from(self.number.saturating_sub(1)) * u64::from(self.limit)
    }

    fn parse(page: Option<&str>, limit: Option<&str>) -> DomainResult<Option<Self>> {
        if page.is_none() && limit.is_none() {
            return Ok(None);
        }
        let number = match page {
            Some(raw) => parse_positive(raw, "page")?,
            None => 1,
        };
        let limit = match limit {
            Some(raw) => parse_positive(raw, "limit")?.min(MAX_PAGE_LIMIT),
            None => DEFAULT_PAGE_LIMIT,
        };
        Ok(Some(Self { number, limit }))
    }
}

/// Everything a listing request can ask for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpportunityQuery {
    pub filter: OpportunityFilter,
    pub sort: OpportunitySort,
    pub page: Option<Page>,
}

impl OpportunityQuery {
    /// Builds a query from raw key/value pairs. Keys outside the allow-list
    /// (including `fields` and operator-shaped keys) are ignored.
    pub fn from_params<'a, I>(params: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut query = Self::default();
        let mut page = None;
        let mut limit = None;

        for (key, value) in params {
            match key {
                "sort" => query.sort = OpportunitySort::parse(value),
                "page" => page = Some(value),
                "limit" => limit = Some(value),
                _ => {
                    if let Some(field) = FilterField::from_key(key) {
                        query.filter.set(field, value)?;
                    }
                }
            }
        }

        query.page = Page::parse(page, limit)?;
        Ok(query)
    }

    /// Orders and windows an already filtered set in place.
    pub fn arrange(&self, items: &mut Vec<Opportunity>) {
        items.sort_by(|a, b| self.sort.compare(a, b));
        if let Some(page) = self.page {
            let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
            let kept: Vec<_> = items
                .drain(..)
                .skip(offset)
                .take(page.limit as usize)
                .collect();
            *items = kept;
        }
    }
}

/// A range over a timestamp column. The start is inclusive; the end is
/// inclusive or exclusive as constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub end_inclusive: bool,
}

impl TimeWindow {
    /// `[start, ∞)`
    pub fn since(start: DateTime<Utc>) -> Self {
        Self { start: Some(start), end: None, end_inclusive: false }
    }

    /// `[start, end]`
    pub fn closed(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start: Some(start), end: Some(end), end_inclusive: true }
    }

    /// `[start, end)`
    pub fn half_open(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start: Some(start), end: Some(end), end_inclusive: false }
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        let after_start = self.start.map_or(true, |s| t >= s);
        let before_end = match self.end {
            None => true,
            Some(e) if self.end_inclusive => t <= e,
            Some(e) => t < e,
        };
        after_start && before_end
    }
}

/// Predicate for dashboard opportunity counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpportunityCount {
    pub status: Option<OpportunityStatus>,
    pub deadline: Option<TimeWindow>,
    pub created: Option<TimeWindow>,
}

impl OpportunityCount {
    pub fn matches(&self, o: &Opportunity) -> bool {
        self.status.map_or(true, |s| s == o.status)
            && self.deadline.map_or(true, |w| w.contains(o.deadline))
            && self.created.map_or(true, |w| w.contains(o.created_at))
    }
}

/// Filter accepted by the application listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    pub opportunity_id: Option<Uuid>,
}

impl ApplicationFilter {
    pub fn from_params<'a, I>(params: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filter = Self::default();
        for (key, value) in params {
            match key {
                "status" => filter.status = Some(value.parse()?),
                "opportunityId" => {
                    let id = Uuid::parse_str(value.trim()).map_err(|_| {
                        DomainError::validation(format!("`{}` is not a valid opportunity id", value))
                    })?;
                    filter.opportunity_id = Some(id);
                }
                _ => {}
            }
        }
        Ok(filter)
    }

    pub fn matches(&self, a: &Application) -> bool {
        self.status.map_or(true, |s| s == a.status)
            && self.opportunity_id.map_or(true, |id| id == a.opportunity_id)
    }
}

/// Predicate for dashboard application counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplicationCount {
    pub opportunity_id: Option<Uuid>,
    pub created: Option<TimeWindow>,
}

impl ApplicationCount {
    pub fn for_opportunity(id: Uuid) -> Self {
        Self { opportunity_id: Some(id), created: None }
    }

    pub fn matches(&self, a: &Application) -> bool {
        self.opportunity_id.map_or(true, |id| id == a.opportunity_id)
            && self.created.map_or(true, |w| w.contains(a.created_at))
    }
}

fn parse_bool(raw: &str) -> DomainResult<bool> {
    match raw.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(DomainError::validation(format!(
            "`{}` is not a valid value for isFeatured; expected true or false",
            other
        ))),
    }
}

fn parse_positive(raw: &str, name: &str) -> DomainResult<u32> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| DomainError::validation(format!("`{}` must be a positive integer", name)))
}
