//! Insert helpers for reference rows: locations, products, contacts, cases.
//!
//! Used by `caseline seed` and by the integration tests to build fixtures.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{CaseRecord, Contact, Location, Product};

/// Insert a location, or return the existing row with the same name.
pub async fn insert_location(pool: &PgPool, name: &str) -> Result<Location> {
    let location = sqlx::query_as::<_, Location>(
        "INSERT INTO locations (name) VALUES ($1) \
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
         RETURNING id, name",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .context("failed to insert location")?;

    Ok(location)
}

/// Insert a product, or return the existing row with the same name.
pub async fn insert_product(pool: &PgPool, name: &str) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (name) VALUES ($1) \
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
         RETURNING id, name",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .context("failed to insert product")?;

    Ok(product)
}

/// Insert a contact.
pub async fn insert_contact(
    pool: &PgPool,
    name: &str,
    product_id: Option<Uuid>,
    home_location_id: Option<Uuid>,
    discount_applied: Option<f64>,
    allow_multiple_plans: bool,
) -> Result<Contact> {
    let contact = sqlx::query_as::<_, Contact>(
        "INSERT INTO contacts (name, product_id, home_location_id, discount_applied, allow_multiple_plans) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING *",
    )
    .bind(name)
    .bind(product_id)
    .bind(home_location_id)
    .bind(discount_applied)
    .bind(allow_multiple_plans)
    .fetch_one(pool)
    .await
    .context("failed to insert contact")?;

    Ok(contact)
}

/// Insert a case for a contact.
pub async fn insert_case(
    pool: &PgPool,
    contact_id: Option<Uuid>,
    subject: &str,
) -> Result<CaseRecord> {
    let case = sqlx::query_as::<_, CaseRecord>(
        "INSERT INTO cases (contact_id, subject) VALUES ($1, $2) RETURNING *",
    )
    .bind(contact_id)
    .bind(subject)
    .fetch_one(pool)
    .await
    .context("failed to insert case")?;

    Ok(case)
}
