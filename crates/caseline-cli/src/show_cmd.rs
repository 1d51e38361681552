//! The `caseline show` and `caseline plans` commands.

use std::sync::Arc;

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use caseline_core::container::CaseContainer;
use caseline_core::rows::ProductRows;
use caseline_core::service::{LinkResolver, PgBackend};

/// Build the component pair for a case and load its state.
pub async fn open_components(
    pool: &PgPool,
    base_url: &str,
    case_id: Uuid,
) -> Result<(CaseContainer, ProductRows)> {
    let backend = Arc::new(PgBackend::new(pool.clone()));
    let navigator = Arc::new(LinkResolver::new(base_url));

    let mut container = CaseContainer::new(backend.clone());
    let mut rows = ProductRows::new(backend.clone(), backend, navigator);

    container.open(case_id).await?;
    container.attach(&rows);
    container.sync_rows(&mut rows).await;

    Ok((container, rows))
}

/// Print a case's context and product lines.
pub async fn run_show(pool: &PgPool, base_url: &str, case_id: Uuid, json: bool) -> Result<()> {
    let (container, rows) = open_components(pool, base_url, case_id).await?;

    if json {
        let payload = serde_json::json!({
            "context": container.context(),
            "rows": rows.rows(),
            "pending_deletions": rows.pending_deletions(),
            "dirty": rows.is_dirty(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Case {case_id}");
    println!("  contact:  {}", container.contact_name().unwrap_or("-"));
    println!("  product:  {}", container.product_name().unwrap_or("-"));
    println!("  location: {}", container.home_location_name().unwrap_or("-"));
    match container.discount_applied() {
        Some(discount) => println!("  discount: {discount}%"),
        None => println!("  discount: -"),
    }
    println!(
        "  multiple plans allowed: {}",
        container.allow_multiple_plans()
    );
    println!();

    print_rows(&rows);
    Ok(())
}

/// Print the plan catalog and the selection options for a case.
pub async fn run_plans(pool: &PgPool, base_url: &str, case_id: Uuid, json: bool) -> Result<()> {
    let (_container, rows) = open_components(pool, base_url, case_id).await?;

    if json {
        let payload = serde_json::json!({
            "catalog": rows.catalog(),
            "options": rows.plan_type_options(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if rows.catalog().is_empty() {
        println!("No plans available for this case's product/location scope.");
        return Ok(());
    }

    println!("{:<12} {:>10}  {}", "PLAN", "PRICE", "ID");
    for plan in rows.catalog() {
        println!(
            "{:<12} {:>10.2}  {}",
            plan.plan_type, plan.standard_price, plan.id
        );
    }

    println!();
    println!("Options:");
    for option in rows.plan_type_options() {
        match &option.value {
            Some(value) => println!("  {value}"),
            None => println!("  {} (no selection)", option.label),
        }
    }
    Ok(())
}

/// Print the editable row table.
pub fn print_rows(rows: &ProductRows) {
    if rows.rows().is_empty() {
        println!("No product lines.");
    } else {
        println!("{:<4} {:<12} {:>10} {:>10}  {}", "#", "PLAN", "PRICE", "DISC%", "ID");
        for (index, row) in rows.rows().iter().enumerate() {
            println!(
                "{:<4} {:<12} {:>10} {:>10}  {}",
                index,
                row.plan_type.as_deref().unwrap_or("-"),
                row.price.map(|p| format!("{p:.2}")).unwrap_or_else(|| "-".into()),
                row.discount.map(|d| format!("{d}")).unwrap_or_else(|| "-".into()),
                row.id.map(|id| id.to_string()).unwrap_or_else(|| "(unsaved)".into()),
            );
        }
    }

    if !rows.pending_deletions().is_empty() {
        println!("Pending deletions: {}", rows.pending_deletions().len());
    }
    println!("Unsaved changes: {}", rows.is_dirty());
}
