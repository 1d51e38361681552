//! Service contracts the components consume, and their implementations.
//!
//! The traits are the abstract backend surface: a record directory, the
//! product-line store, the plan catalog, and URL resolution for record
//! navigation. [`PgBackend`] implements the data-facing traits over
//! PostgreSQL; [`LinkResolver`] resolves navigation URLs from a base.

mod navigator;
mod postgres;
mod trait_def;

pub use navigator::LinkResolver;
pub use postgres::PgBackend;
pub use trait_def::{CaseDirectory, PlanCatalogService, ProductLineService, RecordNavigator};
