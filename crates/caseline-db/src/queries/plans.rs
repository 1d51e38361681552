//! Query functions for the `product_plans` catalog table.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{PlanReference, ProductPlan};

/// List the plan catalog for a product/location scope, in insertion order.
pub async fn list_for_scope(
    pool: &PgPool,
    product_id: Uuid,
    location_id: Uuid,
) -> Result<Vec<PlanReference>> {
    let plans = sqlx::query_as::<_, PlanReference>(
        "SELECT id, plan_type, standard_price FROM product_plans \
         WHERE product_id = $1 AND location_id = $2 \
         ORDER BY created_at ASC, id ASC",
    )
    .bind(product_id)
    .bind(location_id)
    .fetch_all(pool)
    .await
    .context("failed to list plan catalog")?;

    Ok(plans)
}

/// Insert a catalog row.
pub async fn insert_plan(
    pool: &PgPool,
    product_id: Uuid,
    location_id: Uuid,
    plan_type: &str,
    standard_price: f64,
) -> Result<ProductPlan> {
    let plan = sqlx::query_as::<_, ProductPlan>(
        "INSERT INTO product_plans (product_id, location_id, plan_type, standard_price) \
         VALUES ($1, $2, $3, $4) \
         RETURNING *",
    )
    .bind(product_id)
    .bind(location_id)
    .bind(plan_type)
    .bind(standard_price)
    .fetch_one(pool)
    .await
    .context("failed to insert product plan")?;

    Ok(plan)
}

/// Fetch a single catalog row by id.
pub async fn get_plan(pool: &PgPool, id: Uuid) -> Result<Option<ProductPlan>> {
    let plan = sqlx::query_as::<_, ProductPlan>("SELECT * FROM product_plans WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch product plan")?;

    Ok(plan)
}
