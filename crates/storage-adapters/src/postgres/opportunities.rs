use async_trait::async_trait;
use domains::{
    DomainResult, Opportunity, OpportunityCount, OpportunityQuery, OpportunityRepository,
};
use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder, Row};
use uuid::Uuid;

use super::{corrupt, push_window, store_error, PostgresStore};
use crate::timeout::with_timeout;

fn opportunity_from_row(row: &PgRow) -> DomainResult<Opportunity> {
    let text = |column: &str| row.try_get::<String, _>(column).map_err(store_error);
    let list = |column: &str| row.try_get::<Vec<String>, _>(column).map_err(store_error);
    let time = |column: &str| row.try_get(column).map_err(store_error);

    Ok(Opportunity {
        id: row.try_get("id").map_err(store_error)?,
        title: text("title")?,
        company: text("company")?,
        location: text("location")?,
        opp_type: text("opp_type")?.parse().map_err(|e| corrupt("opp_type", e))?,
        work_type: text("work_type")?.parse().map_err(|e| corrupt("work_type", e))?,
        industry: text("industry")?,
        status: text("status")?.parse().map_err(|e| corrupt("status", e))?,
        salary: text("salary")?,
        deadline: time("deadline")?,
        is_featured: row.try_get("is_featured").map_err(store_error)?,
        tags: list("tags")?,
        logo: row.try_get("logo").map_err(store_error)?,
        description: text("description")?,
        responsibilities: list("responsibilities")?,
        requirements: list("requirements")?,
        benefits: list("benefits")?,
        about_company: row.try_get("about_company").map_err(store_error)?,
        created_at: time("created_at")?,
        updated_at: time("updated_at")?,
    })
}

#[async_trait]
impl OpportunityRepository for PostgresStore {
    async fn list(&self, query: &OpportunityQuery) -> DomainResult<Vec<Opportunity>> {
        with_timeout(self.timeout, "list opportunities", async {
            let f = &query.filter;
            let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM opportunities WHERE TRUE");
            if let Some(v) = &f.title {
                qb.push(" AND title = ").push_bind(v.clone());
            }
            if let Some(v) = &f.company {
                qb.push(" AND company = ").push_bind(v.clone());
            }
            if let Some(v) = &f.location {
                qb.push(" AND location = ").push_bind(v.clone());
            }
            if let Some(v) = &f.industry {
                qb.push(" AND industry = ").push_bind(v.clone());
            }
            if let Some(v) = f.opp_type {
                qb.push(" AND opp_type = ").push_bind(v.as_str());
            }
            if let Some(v) = f.work_type {
                qb.push(" AND work_type = ").push_bind(v.as_str());
            }
            if let Some(v) = f.status {
                qb.push(" AND status = ").push_bind(v.as_str());
            }
            if let Some(v) = f.is_featured {
                qb.push(" AND is_featured = ").push_bind(v);
            }

            // Column names come from a closed enum, never from the request.
            qb.push(" ORDER BY ")
                .push(query.sort.field.column())
                .push(if query.sort.descending { " DESC" } else { " ASC" })
                .push(", created_at DESC, id ASC");

            if let Some(page) = query.page {
                qb.push(" LIMIT ")
                    .push_bind(i64::from(page.limit))
                    .push(" OFFSET ")
                    .push_bind(page.offset() as i64);
            }

            let rows = qb.build().fetch_all(&self.pool).await.map_err(store_error)?;
            tracing::debug!(rows = rows.len(), "opportunities listed");
            rows.iter().map(opportunity_from_row).collect()
        })
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Opportunity>> {
        with_timeout(self.timeout, "find opportunity", async {
            let row = sqlx::query("SELECT * FROM opportunities WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(store_error)?;
            row.as_ref().map(opportunity_from_row).transpose()
        })
        .await
    }

    async fn find_many(&self, ids: &[Uuid]) -> DomainResult<Vec<Opportunity>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        with_timeout(self.timeout, "find opportunities", async {
            let rows = sqlx::query("SELECT * FROM opportunities WHERE id = ANY($1)")
                .bind(ids.to_vec())
                .fetch_all(&self.pool)
                .await
                .map_err(store_error)?;
            rows.iter().map(opportunity_from_row).collect()
        })
        .await
    }

    async fn insert(&self, opportunity: Opportunity) -> DomainResult<Opportunity> {
        with_timeout(self.timeout, "insert opportunity", async {
            let o = &opportunity;
            let row = sqlx::query(
                "INSERT INTO opportunities (id, title, company, location, opp_type, work_type, industry, status, salary, deadline, \
                 is_featured, tags, logo, description, responsibilities, requirements, benefits, about_company, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20) \
                 RETURNING *",
            )
            .bind(o.id)
            .bind(&o.title)
            .bind(&o.company)
            .bind(&o.location)
            .bind(o.opp_type.as_str())
            .bind(o.work_type.as_str())
            .bind(&o.industry)
            .bind(o.status.as_str())
            .bind(&o.salary)
            .bind(o.deadline)
            .bind(o.is_featured)
            .bind(&o.tags)
            .bind(&o.logo)
            .bind(&o.description)
            .bind(&o.responsibilities)
            .bind(&o.requirements)
            .bind(&o.benefits)
            .bind(&o.about_company)
            .bind(o.created_at)
            .bind(o.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;
            opportunity_from_row(&row)
        })
        .await
    }

    async fn replace(&self, opportunity: Opportunity) -> DomainResult<Option<Opportunity>> {
        with_timeout(self.timeout, "update opportunity", async {
            let o = &opportunity;
            let row = sqlx::query(
                "UPDATE opportunities SET title = $2, company = $3, location = $4, opp_type = $5, work_type = $6, \
                 industry = $7, status = $8, salary = $9, deadline = $10, is_featured = $11, tags = $12, logo = $13, \
                 description = $14, responsibilities = $15, requirements = $16, benefits = $17, about_company = $18, \
                 updated_at = $19 WHERE id = $1 RETURNING *",
            )
            .bind(o.id)
            .bind(&o.title)
            .bind(&o.company)
            .bind(&o.location)
            .bind(o.opp_type.as_str())
            .bind(o.work_type.as_str())
            .bind(&o.industry)
            .bind(o.status.as_str())
            .bind(&o.salary)
            .bind(o.deadline)
            .bind(o.is_featured)
            .bind(&o.tags)
            .bind(&o.logo)
            .bind(&o.description)
            .bind(&o.responsibilities)
            .bind(&o.requirements)
            .bind(&o.benefits)
            .bind(&o.about_company)
            .bind(o.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;
            row.as_ref().map(opportunity_from_row).transpose()
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        with_timeout(self.timeout, "delete opportunity", async {
            let done = sqlx::query("DELETE FROM opportunities WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(store_error)?;
            Ok(done.rows_affected() > 0)
        })
        .await
    }

    async fn count(&self, predicate: &OpportunityCount) -> DomainResult<u64> {
        with_timeout(self.timeout, "count opportunities", async {
            let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM opportunities WHERE TRUE");
            if let Some(status) = predicate.status {
                qb.push(" AND status = ").push_bind(status.as_str());
            }
            if let Some(window) = &predicate.deadline {
                push_window(&mut qb, "deadline", window);
            }
            if let Some(window) = &predicate.created {
                push_window(&mut qb, "created_at", window);
            }
            let n: i64 = qb
                .build_query_scalar()
                .fetch_one(&self.pool)
                .await
                .map_err(store_error)?;
            Ok(n.max(0) as u64)
        })
        .await
    }
}
