//! PostgreSQL-backed implementation of the data-facing service traits.
//!
//! Thin delegation to `caseline-db` queries, except for `upsert`, which
//! runs the whole batch inside a single transaction so a failing row
//! rolls back the rest.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use caseline_db::models::{CaseContext, PlanReference, ProductLine};
use caseline_db::queries::{cases, plans, product_lines};

use super::trait_def::{CaseDirectory, PlanCatalogService, ProductLineService};

/// The production backend: all three data services over one pool.
#[derive(Clone)]
pub struct PgBackend {
    pool: PgPool,
}

impl PgBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CaseDirectory for PgBackend {
    async fn case_context(&self, case_id: Uuid) -> Result<CaseContext> {
        cases::get_case_context(&self.pool, case_id)
            .await?
            .with_context(|| format!("case {case_id} not found"))
    }
}

#[async_trait]
impl ProductLineService for PgBackend {
    async fn list(&self, contact_id: Uuid) -> Result<Vec<ProductLine>> {
        product_lines::list_for_contact(&self.pool, contact_id).await
    }

    async fn upsert(&self, lines: &[ProductLine]) -> Result<()> {
        if lines.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.context("failed to begin transaction")?;

        for line in lines {
            match line.id {
                Some(id) => {
                    let result = sqlx::query(
                        "UPDATE product_lines \
                         SET product_id = $1, plan_type = $2, price = $3, discount = $4, \
                             updated_at = now() \
                         WHERE id = $5",
                    )
                    .bind(line.product_id)
                    .bind(&line.plan_type)
                    .bind(line.price)
                    .bind(line.discount)
                    .bind(id)
                    .execute(&mut *tx)
                    .await
                    .with_context(|| format!("failed to update product line {id}"))?;

                    if result.rows_affected() == 0 {
                        // Transaction rolls back on drop (no commit).
                        bail!("product line {id} no longer exists");
                    }
                }
                None => {
                    sqlx::query(
                        "INSERT INTO product_lines \
                         (contact_id, product_id, plan_type, price, discount) \
                         VALUES ($1, $2, $3, $4, $5)",
                    )
                    .bind(line.contact_id)
                    .bind(line.product_id)
                    .bind(&line.plan_type)
                    .bind(line.price)
                    .bind(line.discount)
                    .execute(&mut *tx)
                    .await
                    .context("failed to insert product line")?;
                }
            }
        }

        tx.commit().await.context("failed to commit upsert")?;
        Ok(())
    }

    async fn delete(&self, lines: &[ProductLine]) -> Result<()> {
        let ids: Vec<Uuid> = lines.iter().filter_map(|line| line.id).collect();
        product_lines::delete_by_ids(&self.pool, &ids).await?;
        Ok(())
    }
}

#[async_trait]
impl PlanCatalogService for PgBackend {
    async fn plans(&self, product_id: Uuid, location_id: Uuid) -> Result<Vec<PlanReference>> {
        plans::list_for_scope(&self.pool, product_id, location_id).await
    }
}
