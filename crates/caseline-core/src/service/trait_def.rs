//! The backend service traits the components are written against.
//!
//! Each trait is intentionally object-safe so implementations can be
//! stored as `Arc<dyn Trait>` and swapped for in-memory fakes in tests.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use caseline_db::models::{CaseContext, PlanReference, ProductLine};

/// Resolves the read-only contact context for a parent case record.
///
/// Re-invoked by the container whenever the case identifier changes.
#[async_trait]
pub trait CaseDirectory: Send + Sync {
    /// Return the denormalized context for `case_id`, or an error when the
    /// case cannot be resolved.
    async fn case_context(&self, case_id: Uuid) -> Result<CaseContext>;
}

/// The product-line record store.
#[async_trait]
pub trait ProductLineService: Send + Sync {
    /// List all product lines owned by a contact.
    async fn list(&self, contact_id: Uuid) -> Result<Vec<ProductLine>>;

    /// Persist every row: insert rows without an identifier, update rows
    /// with one. Implementations must apply the whole batch or none of it.
    async fn upsert(&self, lines: &[ProductLine]) -> Result<()>;

    /// Remove rows by identifier. Rows without an identifier are skipped.
    async fn delete(&self, lines: &[ProductLine]) -> Result<()>;
}

/// The read-only plan catalog, scoped to a product and a location.
#[async_trait]
pub trait PlanCatalogService: Send + Sync {
    /// List the plans available for the given product/location scope.
    async fn plans(&self, product_id: Uuid, location_id: Uuid) -> Result<Vec<PlanReference>>;
}

/// Resolves a viewable URL for a record identifier.
#[async_trait]
pub trait RecordNavigator: Send + Sync {
    /// Return a URL that opens the record in a browsing context.
    /// Resolution failures propagate unhandled.
    async fn record_url(&self, record_id: Uuid) -> Result<String>;
}

// Compile-time assertions: every service trait must stay object-safe.
const _: () = {
    fn _assert_object_safe(
        _: &dyn CaseDirectory,
        _: &dyn ProductLineService,
        _: &dyn PlanCatalogService,
        _: &dyn RecordNavigator,
    ) {
    }
};

#[cfg(test)]
mod tests {
    use super::*;

    /// A backend that returns empty data, used only to prove the traits
    /// can be implemented and used behind `dyn`.
    struct EmptyBackend;

    #[async_trait]
    impl CaseDirectory for EmptyBackend {
        async fn case_context(&self, case_id: Uuid) -> Result<CaseContext> {
            Ok(CaseContext {
                case_id,
                contact_id: None,
                contact_name: None,
                product_id: None,
                product_name: None,
                home_location_id: None,
                home_location_name: None,
                discount_applied: None,
                allow_multiple_plans: false,
            })
        }
    }

    #[async_trait]
    impl ProductLineService for EmptyBackend {
        async fn list(&self, _contact_id: Uuid) -> Result<Vec<ProductLine>> {
            Ok(Vec::new())
        }

        async fn upsert(&self, _lines: &[ProductLine]) -> Result<()> {
            Ok(())
        }

        async fn delete(&self, _lines: &[ProductLine]) -> Result<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl PlanCatalogService for EmptyBackend {
        async fn plans(&self, _product_id: Uuid, _location_id: Uuid) -> Result<Vec<PlanReference>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn traits_are_usable_behind_dyn() {
        let directory: Box<dyn CaseDirectory> = Box::new(EmptyBackend);
        let lines: Box<dyn ProductLineService> = Box::new(EmptyBackend);
        let plans: Box<dyn PlanCatalogService> = Box::new(EmptyBackend);

        let case_id = Uuid::new_v4();
        let ctx = directory.case_context(case_id).await.unwrap();
        assert_eq!(ctx.case_id, case_id);

        assert!(lines.list(Uuid::new_v4()).await.unwrap().is_empty());
        lines.upsert(&[]).await.unwrap();
        lines.delete(&[]).await.unwrap();

        let catalog = plans.plans(Uuid::new_v4(), Uuid::new_v4()).await.unwrap();
        assert!(catalog.is_empty());
    }
}
