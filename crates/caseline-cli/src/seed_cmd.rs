//! The `caseline seed` command: insert a demo case with its contact,
//! product, location, and plan catalog.

use anyhow::Result;
use sqlx::PgPool;

use caseline_db::queries::{plans, seed};

pub async fn run_seed(pool: &PgPool) -> Result<()> {
    let location = seed::insert_location(pool, "Lisbon").await?;
    let product = seed::insert_product(pool, "FiberNet").await?;

    for (plan_type, standard_price) in [("Basic", 19.9), ("Plus", 39.9), ("Premium", 59.9)] {
        plans::insert_plan(pool, product.id, location.id, plan_type, standard_price).await?;
    }

    let contact = seed::insert_contact(
        pool,
        "Marta Silva",
        Some(product.id),
        Some(location.id),
        Some(10.0),
        false,
    )
    .await?;
    let case = seed::insert_case(pool, Some(contact.id), "Plan change request").await?;

    println!("Seeded demo data:");
    println!("  location: {} ({})", location.name, location.id);
    println!("  product:  {} ({})", product.name, product.id);
    println!("  contact:  {} ({})", contact.name, contact.id);
    println!("  case:     {}", case.id);
    println!();
    println!("Next: caseline show {}", case.id);

    Ok(())
}
