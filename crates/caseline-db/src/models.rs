use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Reference rows
// ---------------------------------------------------------------------------

/// A home location a contact can belong to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
}

/// A product a contact is associated with.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
}

/// A contact record with its denormalized product and location links.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub product_id: Option<Uuid>,
    pub home_location_id: Option<Uuid>,
    /// Default discount percentage carried into new product lines.
    pub discount_applied: Option<f64>,
    pub allow_multiple_plans: bool,
    pub created_at: DateTime<Utc>,
}

/// A customer-support case, optionally linked to a contact.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CaseRecord {
    pub id: Uuid,
    pub contact_id: Option<Uuid>,
    pub subject: String,
    pub created_at: DateTime<Utc>,
}

/// A full plan-catalog row, scoped to a product and a location.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProductPlan {
    pub id: Uuid,
    pub product_id: Uuid,
    pub location_id: Uuid,
    pub plan_type: String,
    pub standard_price: f64,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Component-facing views
// ---------------------------------------------------------------------------

/// Denormalized contact attributes for a case, resolved in a single query.
///
/// Read-only context: the components never write any of these fields back.
/// Every contact-derived field is `Option` because a case may have no
/// contact, and a contact may lack a product or home location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CaseContext {
    pub case_id: Uuid,
    pub contact_id: Option<Uuid>,
    pub contact_name: Option<String>,
    pub product_id: Option<Uuid>,
    pub product_name: Option<String>,
    pub home_location_id: Option<Uuid>,
    pub home_location_name: Option<String>,
    pub discount_applied: Option<f64>,
    pub allow_multiple_plans: bool,
}

/// One editable product/plan/price/discount assignment for a contact.
///
/// `id` is `None` for rows created locally and not yet persisted; the
/// backend assigns an identifier on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProductLine {
    pub id: Option<Uuid>,
    pub contact_id: Uuid,
    pub product_id: Option<Uuid>,
    pub plan_type: Option<String>,
    pub price: Option<f64>,
    pub discount: Option<f64>,
}

impl ProductLine {
    /// Whether this row has been persisted (has a backend identifier).
    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }
}

/// A read-only catalog entry: an available plan type and its standard
/// price for a given product/location scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PlanReference {
    pub id: Uuid,
    pub plan_type: String,
    pub standard_price: f64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
