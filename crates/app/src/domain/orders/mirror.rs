//! Remote order mirror.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use storefront::Order;

use crate::domain::orders::errors::MirrorError;

/// Copies recorded orders to a remote endpoint.
#[automock]
#[async_trait]
pub trait OrderMirror: Send + Sync {
    /// Send one order.
    async fn mirror(&self, order: &Order) -> Result<(), MirrorError>;
}

/// Posts orders as JSON to a fixed URL.
#[derive(Debug, Clone)]
pub struct HttpOrderMirror {
    url: String,
    http: Client,
}

impl HttpOrderMirror {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: Client::new(),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl OrderMirror for HttpOrderMirror {
    async fn mirror(&self, order: &Order) -> Result<(), MirrorError> {
        let response = self.http.post(&self.url).json(order).send().await?;

        if !response.status().is_success() {
            return Err(MirrorError::Status(response.status()));
        }

        Ok(())
    }
}
