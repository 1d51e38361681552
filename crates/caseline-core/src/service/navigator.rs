//! URL resolution for record navigation.

use anyhow::{Result, bail};
use async_trait::async_trait;
use uuid::Uuid;

use super::trait_def::RecordNavigator;

/// Resolves record view URLs against a configured base.
///
/// The resulting URL is handed to the presentation layer; actually
/// opening a browsing context is not this crate's concern.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    base_url: String,
}

impl LinkResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl RecordNavigator for LinkResolver {
    async fn record_url(&self, record_id: Uuid) -> Result<String> {
        let base = self.base_url.trim_end_matches('/');
        if base.is_empty() {
            bail!("navigation base URL is empty");
        }
        Ok(format!("{base}/r/{record_id}/view"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_view_url() {
        let resolver = LinkResolver::new("https://records.example.com");
        let id = Uuid::new_v4();
        let url = resolver.record_url(id).await.unwrap();
        assert_eq!(url, format!("https://records.example.com/r/{id}/view"));
    }

    #[tokio::test]
    async fn trailing_slash_is_normalized() {
        let resolver = LinkResolver::new("https://records.example.com/");
        let id = Uuid::new_v4();
        let url = resolver.record_url(id).await.unwrap();
        assert_eq!(url, format!("https://records.example.com/r/{id}/view"));
    }

    #[tokio::test]
    async fn empty_base_is_an_error() {
        let resolver = LinkResolver::new("");
        assert!(resolver.record_url(Uuid::new_v4()).await.is_err());
    }
}
