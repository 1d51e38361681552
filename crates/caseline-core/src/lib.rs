//! Case product-line editing components.
//!
//! Two cooperating pieces, mirroring the container/rows split of the
//! support-case UI this crate backs:
//!
//! - [`container::CaseContainer`] loads the denormalized contact context
//!   for a case and relays save/cancel commands.
//! - [`rows::ProductRows`] owns the editable list of product lines,
//!   fetches the plan catalog for the current product/location scope,
//!   applies per-row edits, and reconciles local state with the backend
//!   on save.
//!
//! Backends are abstract: the components talk to the [`service`] traits
//! and never to a concrete store. All state mutation goes through
//! `&mut self` on a single owner, so mutation is confined to one
//! serialized execution context and no locking is needed.

pub mod container;
pub mod error;
pub mod rows;
pub mod service;
pub mod signal;
pub mod wire;
