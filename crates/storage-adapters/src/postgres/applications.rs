use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{
    Application, ApplicationCount, ApplicationFilter, ApplicationRepository, ApplicationStatus,
    DomainResult,
};
use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder, Row};
use uuid::Uuid;

use super::{corrupt, push_window, store_error, PostgresStore};
use crate::timeout::with_timeout;

fn application_from_row(row: &PgRow) -> DomainResult<Application> {
    let status: String = row.try_get("status").map_err(store_error)?;
    Ok(Application {
        id: row.try_get("id").map_err(store_error)?,
        opportunity_id: row.try_get("opportunity_id").map_err(store_error)?,
        full_name: row.try_get("full_name").map_err(store_error)?,
        email: row.try_get("email").map_err(store_error)?,
        phone: row.try_get("phone").map_err(store_error)?,
        resume_url: row.try_get("resume_url").map_err(store_error)?,
        cover_letter: row.try_get("cover_letter").map_err(store_error)?,
        status: status.parse().map_err(|e| corrupt("status", e))?,
        admin_notes: row.try_get("admin_notes").map_err(store_error)?,
        created_at: row.try_get("created_at").map_err(store_error)?,
        updated_at: row.try_get("updated_at").map_err(store_error)?,
    })
}

#[async_trait]
impl ApplicationRepository for PostgresStore {
    async fn insert(&self, application: Application) -> DomainResult<Application> {
        with_timeout(self.timeout, "insert application", async {
            let a = &application;
            let row = sqlx::query(
                "INSERT INTO applications (id, opportunity_id, full_name, email, phone, resume_url, cover_letter, \
                 status, admin_notes, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
                 RETURNING *",
            )
            .bind(a.id)
            .bind(a.opportunity_id)
            .bind(&a.full_name)
            .bind(&a.email)
            .bind(&a.phone)
            .bind(&a.resume_url)
            .bind(&a.cover_letter)
            .bind(a.status.as_str())
            .bind(&a.admin_notes)
            .bind(a.created_at)
            .bind(a.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;
            application_from_row(&row)
        })
        .await
    }

    async fn list(&self, filter: &ApplicationFilter) -> DomainResult<Vec<Application>> {
        with_timeout(self.timeout, "list applications", async {
            let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM applications WHERE TRUE");
            if let Some(status) = filter.status {
                qb.push(" AND status = ").push_bind(status.as_str());
            }
            if let Some(id) = filter.opportunity_id {
                qb.push(" AND opportunity_id = ").push_bind(id);
            }
            qb.push(" ORDER BY created_at DESC, id ASC");

            let rows = qb.build().fetch_all(&self.pool).await.map_err(store_error)?;
            rows.iter().map(application_from_row).collect()
        })
        .await
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        admin_notes: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<Option<Application>> {
        with_timeout(self.timeout, "update application status", async {
            let row = sqlx::query(
                "UPDATE applications SET status = $2, admin_notes = COALESCE($3, admin_notes), updated_at = $4 \
                 WHERE id = $1 RETURNING *",
            )
            .bind(id)
            .bind(status.as_str())
            .bind(&admin_notes)
            .bind(updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;
            row.as_ref().map(application_from_row).transpose()
        })
        .await
    }

    async fn count(&self, predicate: &ApplicationCount) -> DomainResult<u64> {
        with_timeout(self.timeout, "count applications", async {
            let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM applications WHERE TRUE");
            if let Some(id) = predicate.opportunity_id {
                qb.push(" AND opportunity_id = ").push_bind(id);
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
