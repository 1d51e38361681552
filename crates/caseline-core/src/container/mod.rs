//! The context container: loads a case's denormalized contact context,
//! relays save/cancel commands to the rows manager, and mirrors the
//! rows manager's status signals for the presentation layer.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;
use uuid::Uuid;

use caseline_db::models::CaseContext;

use crate::rows::{ProductRows, RowsContext};
use crate::service::CaseDirectory;
use crate::wire::{WireState, Wired};

/// Hosts the rows manager for one case record.
pub struct CaseContainer {
    directory: Arc<dyn CaseDirectory>,
    case_wire: Wired<Uuid, CaseContext>,
    context: Option<CaseContext>,
    loading_rx: Option<watch::Receiver<bool>>,
    actions_rx: Option<watch::Receiver<bool>>,
}

impl CaseContainer {
    pub fn new(directory: Arc<dyn CaseDirectory>) -> Self {
        Self {
            directory,
            case_wire: Wired::new(),
            context: None,
            loading_rx: None,
            actions_rx: None,
        }
    }

    /// Load the context for a case. Re-invoking with the same id is a
    /// no-op; a different id refetches.
    ///
    /// The container does no error handling of its own: a directory
    /// failure propagates to the caller.
    pub async fn open(&mut self, case_id: Uuid) -> Result<()> {
        if !self.case_wire.rekey(Some(case_id)) {
            return Ok(());
        }

        match self.directory.case_context(case_id).await {
            Ok(ctx) => {
                self.case_wire.publish(ctx.clone());
                self.context = Some(ctx);
                Ok(())
            }
            Err(e) => {
                self.case_wire.fail(format!("{e:#}"));
                self.context = None;
                Err(e)
            }
        }
    }

    /// Subscribe to the rows manager's status signals so this container
    /// mirrors spinner visibility and action-button enablement.
    pub fn attach(&mut self, rows: &ProductRows) {
        self.loading_rx = Some(rows.subscribe_loading());
        self.actions_rx = Some(rows.subscribe_actions());
    }

    /// Push the current context down into the rows manager, re-firing
    /// its wired fetches where the keys changed.
    pub async fn sync_rows(&self, rows: &mut ProductRows) {
        let ctx = self
            .context
            .as_ref()
            .map(RowsContext::from)
            .unwrap_or_default();
        rows.set_context(ctx).await;
    }

    /// Delegate a save. The rows manager flips loading on immediately
    /// and clears it when the round-trip finishes.
    pub async fn save(&self, rows: &mut ProductRows) -> Result<()> {
        rows.save_records().await
    }

    /// Delegate a cancel: dismiss the edit affordances.
    pub fn cancel(&self, rows: &mut ProductRows) {
        rows.cancel_changes();
    }

    // -------------------------------------------------------------------
    // Read-only context accessors
    // -------------------------------------------------------------------

    pub fn context(&self) -> Option<&CaseContext> {
        self.context.as_ref()
    }

    pub fn contact_id(&self) -> Option<Uuid> {
        self.context.as_ref().and_then(|c| c.contact_id)
    }

    pub fn contact_name(&self) -> Option<&str> {
        self.context.as_ref().and_then(|c| c.contact_name.as_deref())
    }

    pub fn product_id(&self) -> Option<Uuid> {
        self.context.as_ref().and_then(|c| c.product_id)
    }

    pub fn product_name(&self) -> Option<&str> {
        self.context.as_ref().and_then(|c| c.product_name.as_deref())
    }

    pub fn home_location_id(&self) -> Option<Uuid> {
        self.context.as_ref().and_then(|c| c.home_location_id)
    }

    pub fn home_location_name(&self) -> Option<&str> {
        self.context
            .as_ref()
            .and_then(|c| c.home_location_name.as_deref())
    }

    pub fn discount_applied(&self) -> Option<f64> {
        self.context.as_ref().and_then(|c| c.discount_applied)
    }

    pub fn allow_multiple_plans(&self) -> bool {
        self.context
            .as_ref()
            .map(|c| c.allow_multiple_plans)
            .unwrap_or(false)
    }

    // -------------------------------------------------------------------
    // Mirrored status
    // -------------------------------------------------------------------

    /// Spinner visibility: the rows manager's loading status, or `true`
    /// before any rows manager is attached.
    pub fn is_loading(&self) -> bool {
        self.loading_rx
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or(true)
    }

    /// Action-button enablement: whether unsaved local changes exist.
    pub fn actions_available(&self) -> bool {
        self.actions_rx
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or(false)
    }

    /// Subscribe to context replacements.
    pub fn subscribe_context(&self) -> watch::Receiver<WireState<CaseContext>> {
        self.case_wire.subscribe()
    }
}
