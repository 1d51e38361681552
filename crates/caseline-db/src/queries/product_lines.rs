//! Query functions for the `product_lines` table.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::ProductLine;

const LINE_COLUMNS: &str = "id, contact_id, product_id, plan_type, price, discount";

/// List all product lines owned by a contact, oldest first.
pub async fn list_for_contact(pool: &PgPool, contact_id: Uuid) -> Result<Vec<ProductLine>> {
    let lines = sqlx::query_as::<_, ProductLine>(&format!(
        "SELECT {LINE_COLUMNS} FROM product_lines \
         WHERE contact_id = $1 ORDER BY created_at ASC, id ASC",
    ))
    .bind(contact_id)
    .fetch_all(pool)
    .await
    .context("failed to list product lines for contact")?;

    Ok(lines)
}

/// Insert a new product line. Returns the row with its server-generated id.
pub async fn insert_line(pool: &PgPool, line: &ProductLine) -> Result<ProductLine> {
    let inserted = sqlx::query_as::<_, ProductLine>(&format!(
        "INSERT INTO product_lines (contact_id, product_id, plan_type, price, discount) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING {LINE_COLUMNS}",
    ))
    .bind(line.contact_id)
    .bind(line.product_id)
    .bind(&line.plan_type)
    .bind(line.price)
    .bind(line.discount)
    .fetch_one(pool)
    .await
    .context("failed to insert product line")?;

    Ok(inserted)
}

/// Update an existing product line by id. Returns the number of rows touched.
pub async fn update_line(pool: &PgPool, id: Uuid, line: &ProductLine) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE product_lines \
         SET product_id = $1, plan_type = $2, price = $3, discount = $4, updated_at = now() \
         WHERE id = $5",
    )
    .bind(line.product_id)
    .bind(&line.plan_type)
    .bind(line.price)
    .bind(line.discount)
    .bind(id)
    .execute(pool)
    .await
    .context("failed to update product line")?;

    Ok(result.rows_affected())
}

/// Delete product lines by identifier. Returns the number of rows removed.
pub async fn delete_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<u64> {
    if ids.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query("DELETE FROM product_lines WHERE id = ANY($1)")
        .bind(ids)
        .execute(pool)
        .await
        .context("failed to delete product lines")?;

    Ok(result.rows_affected())
}

/// Count all product lines owned by a contact.
pub async fn count_for_contact(pool: &PgPool, contact_id: Uuid) -> Result<i64> {
    let row: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM product_lines WHERE contact_id = $1")
            .bind(contact_id)
            .fetch_one(pool)
            .await
            .context("failed to count product lines")?;

    Ok(row.0)
}
