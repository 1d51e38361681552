//! The product rows manager: an editable list of product lines with
//! pending-deletion tracking and save/cancel reconciliation.
//!
//! Two invariants hold across every operation:
//!
//! - the live list and the pending-deletion list are disjoint; a row
//!   appears in at most one of them;
//! - the dirty flag ("actions available") is sticky: once any edit sets
//!   it, only a successful save-and-reload cycle or an explicit cancel
//!   clears it.
//!
//! Edits are copy-on-write at the row level: the addressed row is
//! cloned, modified, swapped back in, and the whole list is republished
//! so subscribers observe the replacement.

use std::sync::Arc;

use anyhow::Result;
use uuid::Uuid;

use caseline_db::models::{CaseContext, PlanReference, ProductLine};

use crate::error::RowsError;
use crate::service::{PlanCatalogService, ProductLineService, RecordNavigator};
use crate::signal::Signal;
use crate::wire::{WireState, Wired};

/// The no-selection entry at the head of the plan option list.
const NONE_OPTION_LABEL: &str = "--None--";

/// Read-only contact attributes the rows manager receives from its
/// container. Never mutated here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowsContext {
    pub contact_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub home_location_id: Option<Uuid>,
    pub discount_applied: Option<f64>,
    pub allow_multiple_plans: bool,
}

impl From<&CaseContext> for RowsContext {
    fn from(ctx: &CaseContext) -> Self {
        Self {
            contact_id: ctx.contact_id,
            product_id: ctx.product_id,
            home_location_id: ctx.home_location_id,
            discount_applied: ctx.discount_applied,
            allow_multiple_plans: ctx.allow_multiple_plans,
        }
    }
}

/// One entry in the plan selection list. The leading "no selection"
/// entry carries a `None` value.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PlanOption {
    pub label: String,
    pub value: Option<String>,
}

/// Editable product-line state for one contact.
pub struct ProductRows {
    lines: Arc<dyn ProductLineService>,
    plans: Arc<dyn PlanCatalogService>,
    navigator: Arc<dyn RecordNavigator>,

    context: RowsContext,
    live_rows: Vec<ProductLine>,
    pending_deletions: Vec<ProductLine>,
    plan_catalog: Vec<PlanReference>,
    dirty: bool,

    rows_wire: Wired<Uuid, Vec<ProductLine>>,
    catalog_wire: Wired<(Uuid, Uuid), Vec<PlanReference>>,

    loading: Signal<bool>,
    actions_available: Signal<bool>,
    last_error: Signal<Option<String>>,
}

impl ProductRows {
    pub fn new(
        lines: Arc<dyn ProductLineService>,
        plans: Arc<dyn PlanCatalogService>,
        navigator: Arc<dyn RecordNavigator>,
    ) -> Self {
        Self {
            lines,
            plans,
            navigator,
            context: RowsContext::default(),
            live_rows: Vec::new(),
            pending_deletions: Vec::new(),
            plan_catalog: Vec::new(),
            dirty: false,
            rows_wire: Wired::new(),
            catalog_wire: Wired::new(),
            // The spinner shows until the first row fetch completes.
            loading: Signal::new(true),
            actions_available: Signal::new(false),
            last_error: Signal::new(None),
        }
    }

    // -------------------------------------------------------------------
    // Fetch lifecycle
    // -------------------------------------------------------------------

    /// Apply a new context from the container.
    ///
    /// The row list is wired on the contact id and the plan catalog on
    /// the (product, location) pair: each refetches only when its key
    /// actually changed.
    pub async fn set_context(&mut self, context: RowsContext) {
        let rows_changed = {
            let key = context.contact_id;
            self.context = context;
            self.rows_wire.rekey(key)
        };
        if rows_changed {
            self.fetch_rows().await;
        }

        let scope = self.context.product_id.zip(self.context.home_location_id);
        if self.catalog_wire.rekey(scope) {
            self.fetch_catalog().await;
        }
    }

    /// Force a row refetch at the current key, bypassing the change check.
    pub async fn refresh(&mut self) {
        self.fetch_rows().await;
    }

    async fn fetch_rows(&mut self) {
        let Some(contact_id) = self.rows_wire.key().copied() else {
            self.live_rows.clear();
            self.rows_wire.reset();
            return;
        };

        match self.lines.list(contact_id).await {
            Ok(rows) => {
                self.live_rows = rows;
                self.rows_wire.publish(self.live_rows.clone());
                self.loading.set(false);
            }
            Err(e) => {
                // Fail-open: degrade to an empty list, surface the error.
                tracing::warn!(error = %e, %contact_id, "product line fetch failed");
                self.live_rows.clear();
                self.rows_wire.fail(format!("{e:#}"));
                self.last_error.set(Some(format!("{e:#}")));
                self.loading.set(false);
            }
        }
    }

    async fn fetch_catalog(&mut self) {
        let Some((product_id, location_id)) = self.catalog_wire.key().copied() else {
            self.plan_catalog.clear();
            self.catalog_wire.reset();
            return;
        };

        match self.plans.plans(product_id, location_id).await {
            Ok(catalog) => {
                self.plan_catalog = catalog;
                self.catalog_wire.publish(self.plan_catalog.clone());
            }
            Err(e) => {
                tracing::warn!(error = %e, %product_id, %location_id, "plan catalog fetch failed");
                self.plan_catalog.clear();
                self.catalog_wire.fail(format!("{e:#}"));
                self.last_error.set(Some(format!("{e:#}")));
            }
        }
    }

    // -------------------------------------------------------------------
    // Edit operations
    // -------------------------------------------------------------------

    /// Select a plan for a row by exact catalog label.
    ///
    /// A label absent from the catalog leaves the row unchanged, as does
    /// re-selecting the row's current plan. Otherwise the row takes the
    /// selected plan type and the catalog's standard price.
    pub fn select_plan(&mut self, index: usize, label: &str) -> Result<(), RowsError> {
        let row = self
            .live_rows
            .get(index)
            .ok_or(RowsError::IndexOutOfRange(index))?;

        let Some(plan) = self.plan_catalog.iter().find(|p| p.plan_type == label) else {
            return Ok(());
        };

        if row.plan_type.as_deref() == Some(label) {
            return Ok(());
        }

        let mut updated = row.clone();
        updated.plan_type = Some(plan.plan_type.clone());
        updated.price = Some(plan.standard_price);
        self.replace_row(index, updated);
        self.mark_dirty();
        Ok(())
    }

    /// Replace a row's price. An unchanged value is a no-op; no range
    /// validation is performed.
    pub fn edit_price(&mut self, index: usize, value: f64) -> Result<(), RowsError> {
        let row = self
            .live_rows
            .get(index)
            .ok_or(RowsError::IndexOutOfRange(index))?;

        if row.price == Some(value) {
            return Ok(());
        }

        let mut updated = row.clone();
        updated.price = Some(value);
        self.replace_row(index, updated);
        self.mark_dirty();
        Ok(())
    }

    /// Apply a discount entry to a row.
    ///
    /// An empty input clears the discount and leaves the price at its
    /// last-computed value. A non-empty input replaces the discount and
    /// recomputes the price from the row's *current* price, so repeated
    /// entries compound multiplicatively. That compounding matches the
    /// system of record and must not be "fixed" here.
    pub fn edit_discount(&mut self, index: usize, input: &str) -> Result<(), RowsError> {
        let row = self
            .live_rows
            .get(index)
            .ok_or(RowsError::IndexOutOfRange(index))?;

        if input.is_empty() {
            let mut updated = row.clone();
            updated.discount = None;
            self.replace_row(index, updated);
            self.mark_dirty();
            return Ok(());
        }

        let value: f64 = input
            .trim()
            .parse()
            .map_err(|_| RowsError::BadDiscount(input.to_owned()))?;

        let mut updated = row.clone();
        updated.discount = Some(value);
        if let Some(price) = updated.price {
            updated.price = Some(price - price * value / 100.0);
        }
        self.replace_row(index, updated);
        self.mark_dirty();
        Ok(())
    }

    /// Append a new unsaved row, pre-filled from the contact context.
    pub fn add_row(&mut self) -> Result<(), RowsError> {
        let contact_id = self.context.contact_id.ok_or(RowsError::NoContact)?;

        self.live_rows.push(ProductLine {
            id: None,
            contact_id,
            product_id: self.context.product_id,
            plan_type: None,
            price: None,
            discount: self.context.discount_applied,
        });
        self.publish_rows();
        self.mark_dirty();
        Ok(())
    }

    /// Remove a row from the live list.
    ///
    /// A persisted row moves to the pending-deletion set and marks the
    /// state dirty; an unsaved row is discarded outright and does not by
    /// itself touch the dirty flag.
    pub fn remove_row(&mut self, index: usize) -> Result<(), RowsError> {
        if index >= self.live_rows.len() {
            return Err(RowsError::IndexOutOfRange(index));
        }

        let removed = self.live_rows.remove(index);
        if removed.is_saved() {
            self.pending_deletions.push(removed);
            self.mark_dirty();
        }
        self.publish_rows();
        Ok(())
    }

    // -------------------------------------------------------------------
    // Save / cancel
    // -------------------------------------------------------------------

    /// Persist local state: upsert the live list, then delete the
    /// pending-deletion list, then resynchronize from the backend.
    ///
    /// The delete step never starts before the upsert has completed. On
    /// success, pending deletions are cleared, the live list is replaced
    /// by a fresh fetch (dropping any local-only state the backend did
    /// not round-trip), and the dirty flag resets. On failure state is
    /// left as-is: no rollback, the error is surfaced on the error
    /// signal, and the loading indicator clears.
    pub async fn save_records(&mut self) -> Result<()> {
        self.loading.set(true);

        let result = self.save_inner().await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "save failed, local state left as-is");
            self.last_error.set(Some(format!("{e:#}")));
            self.loading.set(false);
        }
        result
    }

    async fn save_inner(&mut self) -> Result<()> {
        use anyhow::Context;

        self.lines
            .upsert(&self.live_rows)
            .await
            .context("failed to upsert product lines")?;

        // Sequenced: the upsert above must be observed complete before
        // any deletion is issued.
        self.lines
            .delete(&self.pending_deletions)
            .await
            .context("failed to delete removed product lines")?;

        self.pending_deletions.clear();

        // Resynchronize. A fetch failure here degrades like any other
        // fetch (empty list + error signal) rather than failing the save.
        self.fetch_rows().await;

        self.dirty = false;
        self.actions_available.set(false);
        self.loading.set(false);
        Ok(())
    }

    /// Dismiss the edit affordances: reset the dirty flag and the
    /// loading indicator.
    ///
    /// Deliberately does not refetch or revert local edits; cancel is
    /// "dismiss", not "restore server state".
    pub fn cancel_changes(&mut self) {
        self.dirty = false;
        self.actions_available.set(false);
        self.loading.set(false);
    }

    // -------------------------------------------------------------------
    // Derived views
    // -------------------------------------------------------------------

    /// The plan selection list: a leading no-selection entry, then one
    /// entry per distinct catalog label in catalog order.
    pub fn plan_type_options(&self) -> Vec<PlanOption> {
        let mut options = vec![PlanOption {
            label: NONE_OPTION_LABEL.to_owned(),
            value: None,
        }];
        for plan in &self.plan_catalog {
            let seen = options
                .iter()
                .any(|o| o.value.as_deref() == Some(plan.plan_type.as_str()));
            if !seen {
                options.push(PlanOption {
                    label: plan.plan_type.clone(),
                    value: Some(plan.plan_type.clone()),
                });
            }
        }
        options
    }

    /// Whether the contact may take another line with this plan.
    ///
    /// False only when the contact disallows multiple products with the
    /// same plan and a live row has already selected it. Advisory: the
    /// edit path does not enforce this.
    pub fn allows_plan(&self, label: &str) -> bool {
        if self.context.allow_multiple_plans {
            return true;
        }
        !self
            .live_rows
            .iter()
            .any(|row| row.plan_type.as_deref() == Some(label))
    }

    /// Resolve the view URL for a catalog plan by label.
    pub async fn plan_url(&self, label: &str) -> Result<String> {
        let plan = self
            .plan_catalog
            .iter()
            .find(|p| p.plan_type == label)
            .ok_or_else(|| RowsError::UnknownPlan(label.to_owned()))?;
        self.navigator.record_url(plan.id).await
    }

    /// Resolve the view URL for an arbitrary record.
    pub async fn record_url(&self, record_id: Uuid) -> Result<String> {
        self.navigator.record_url(record_id).await
    }

    // -------------------------------------------------------------------
    // Accessors and subscriptions
    // -------------------------------------------------------------------

    pub fn rows(&self) -> &[ProductLine] {
        &self.live_rows
    }

    pub fn pending_deletions(&self) -> &[ProductLine] {
        &self.pending_deletions
    }

    pub fn catalog(&self) -> &[PlanReference] {
        &self.plan_catalog
    }

    pub fn context(&self) -> &RowsContext {
        &self.context
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.get()
    }

    pub fn subscribe_rows(&self) -> tokio::sync::watch::Receiver<WireState<Vec<ProductLine>>> {
        self.rows_wire.subscribe()
    }

    pub fn subscribe_catalog(
        &self,
    ) -> tokio::sync::watch::Receiver<WireState<Vec<PlanReference>>> {
        self.catalog_wire.subscribe()
    }

    pub fn subscribe_loading(&self) -> tokio::sync::watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn subscribe_actions(&self) -> tokio::sync::watch::Receiver<bool> {
        self.actions_available.subscribe()
    }

    pub fn subscribe_errors(&self) -> tokio::sync::watch::Receiver<Option<String>> {
        self.last_error.subscribe()
    }

    // -------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------

    fn replace_row(&mut self, index: usize, row: ProductLine) {
        self.live_rows[index] = row;
        self.publish_rows();
    }

    fn publish_rows(&self) {
        self.rows_wire.publish(self.live_rows.clone());
    }

    fn mark_dirty(&mut self) {
        if !self.dirty {
            self.dirty = true;
            self.actions_available.set(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_context_maps_case_context() {
        let contact_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();
        let location_id = Uuid::new_v4();
        let case = CaseContext {
            case_id: Uuid::new_v4(),
            contact_id: Some(contact_id),
            contact_name: Some("Iris Wang".to_owned()),
            product_id: Some(product_id),
            product_name: Some("FiberNet".to_owned()),
            home_location_id: Some(location_id),
            home_location_name: Some("Lisbon".to_owned()),
            discount_applied: Some(5.0),
            allow_multiple_plans: true,
        };

        let ctx = RowsContext::from(&case);
        assert_eq!(ctx.contact_id, Some(contact_id));
        assert_eq!(ctx.product_id, Some(product_id));
        assert_eq!(ctx.home_location_id, Some(location_id));
        assert_eq!(ctx.discount_applied, Some(5.0));
        assert!(ctx.allow_multiple_plans);
    }
}
