//! Query functions for the `cases` table and the denormalized case context.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::CaseContext;

/// Resolve the denormalized contact context for a case.
///
/// A single LEFT-JOIN query across cases, contacts, products, and
/// locations. Returns `None` when the case itself does not exist; a case
/// without a contact still resolves, with all contact-derived fields null.
pub async fn get_case_context(pool: &PgPool, case_id: Uuid) -> Result<Option<CaseContext>> {
    let context = sqlx::query_as::<_, CaseContext>(
        "SELECT cs.id AS case_id, \
                c.id AS contact_id, \
                c.name AS contact_name, \
                c.product_id AS product_id, \
                p.name AS product_name, \
                c.home_location_id AS home_location_id, \
                l.name AS home_location_name, \
                c.discount_applied AS discount_applied, \
                COALESCE(c.allow_multiple_plans, false) AS allow_multiple_plans \
         FROM cases cs \
         LEFT JOIN contacts c ON c.id = cs.contact_id \
         LEFT JOIN products p ON p.id = c.product_id \
         LEFT JOIN locations l ON l.id = c.home_location_id \
         WHERE cs.id = $1",
    )
    .bind(case_id)
    .fetch_optional(pool)
    .await
    .context("failed to fetch case context")?;

    Ok(context)
}
