//! The `caseline edit` command: a scripted edit session against a case.
//!
//! Operations are applied in the order given, then the session finishes
//! with `--save`, `--cancel`, or neither (leaving the summary to show
//! what would be pending in a UI session).

use anyhow::{Context, Result, bail};
use sqlx::PgPool;
use uuid::Uuid;

use crate::show_cmd;

/// One scripted edit operation.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOp {
    Add,
    Remove(usize),
    Plan(usize, String),
    Price(usize, f64),
    Discount(usize, String),
}

/// Parse an operation string.
///
/// Syntax: `add`, `remove:<idx>`, `plan:<idx>=<label>`,
/// `price:<idx>=<value>`, `discount:<idx>=<value>` (an empty discount
/// value clears the discount).
pub fn parse_op(input: &str) -> Result<EditOp> {
    if input == "add" {
        return Ok(EditOp::Add);
    }

    let (kind, rest) = input
        .split_once(':')
        .with_context(|| format!("invalid op {input:?}: expected <kind>:<args>"))?;

    if kind == "remove" {
        let index = rest
            .parse()
            .with_context(|| format!("invalid op {input:?}: bad row index"))?;
        return Ok(EditOp::Remove(index));
    }

    let (index, value) = rest
        .split_once('=')
        .with_context(|| format!("invalid op {input:?}: expected {kind}:<idx>=<value>"))?;
    let index: usize = index
        .parse()
        .with_context(|| format!("invalid op {input:?}: bad row index"))?;

    match kind {
        "plan" => Ok(EditOp::Plan(index, value.to_owned())),
        "price" => {
            let price = value
                .parse()
                .with_context(|| format!("invalid op {input:?}: bad price"))?;
            Ok(EditOp::Price(index, price))
        }
        "discount" => Ok(EditOp::Discount(index, value.to_owned())),
        other => bail!("invalid op {input:?}: unknown kind {other:?}"),
    }
}

pub async fn run_edit(
    pool: &PgPool,
    base_url: &str,
    case_id: Uuid,
    ops: &[String],
    save: bool,
    cancel: bool,
) -> Result<()> {
    let parsed: Vec<EditOp> = ops.iter().map(|op| parse_op(op)).collect::<Result<_>>()?;

    let (container, mut rows) = show_cmd::open_components(pool, base_url, case_id).await?;

    for op in &parsed {
        match op {
            EditOp::Add => rows.add_row()?,
            EditOp::Remove(index) => rows.remove_row(*index)?,
            EditOp::Plan(index, label) => rows.select_plan(*index, label)?,
            EditOp::Price(index, value) => rows.edit_price(*index, *value)?,
            EditOp::Discount(index, value) => rows.edit_discount(*index, value)?,
        }
    }

    if save {
        container.save(&mut rows).await?;
        tracing::info!(%case_id, rows = rows.rows().len(), "product lines saved");
        println!("Saved.");
    } else if cancel {
        container.cancel(&mut rows);
        println!("Cancelled (local edits dismissed, not reverted).");
    }

    println!();
    show_cmd::print_rows(&rows);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_op_kind() {
        assert_eq!(parse_op("add").unwrap(), EditOp::Add);
        assert_eq!(parse_op("remove:2").unwrap(), EditOp::Remove(2));
        assert_eq!(
            parse_op("plan:0=Premium").unwrap(),
            EditOp::Plan(0, "Premium".to_owned())
        );
        assert_eq!(parse_op("price:1=99.5").unwrap(), EditOp::Price(1, 99.5));
        assert_eq!(
            parse_op("discount:1=10").unwrap(),
            EditOp::Discount(1, "10".to_owned())
        );
    }

    #[test]
    fn empty_discount_value_is_allowed() {
        assert_eq!(
            parse_op("discount:0=").unwrap(),
            EditOp::Discount(0, String::new())
        );
    }

    #[test]
    fn rejects_malformed_ops() {
        assert!(parse_op("frobnicate").is_err());
        assert!(parse_op("plan:x=Basic").is_err());
        assert!(parse_op("price:0=abc").is_err());
        assert!(parse_op("remove:first").is_err());
        assert!(parse_op("plan:0").is_err());
    }

    #[test]
    fn plan_labels_may_contain_equals_free_text() {
        assert_eq!(
            parse_op("plan:3=Family & Friends").unwrap(),
            EditOp::Plan(3, "Family & Friends".to_owned())
        );
    }
}
