//! HTTP transport for the product lookup and purchase services.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{LineItem, ProductCode},
    error::ErrorBody,
    protocol::{
        ProductResponse, PurchaseRequest, PurchaseResponse, PRODUCTS_ROUTE, PURCHASE_ROUTE,
    },
};
use tracing::debug;
use url::Url;

use crate::error::BackendError;

#[async_trait]
pub trait CheckoutBackend: Send + Sync {
    async fn lookup_product(&self, code: &ProductCode) -> Result<ProductResponse, BackendError>;
    async fn submit_purchase(&self, items: &[LineItem]) -> Result<PurchaseResponse, BackendError>;
}

pub struct HttpCheckoutBackend {
    http: Client,
    api_base: Url,
}

impl HttpCheckoutBackend {
    pub fn new(api_base: Url) -> Self {
        Self {
            http: Client::new(),
            api_base,
        }
    }

    /// Builds a client that gives up on a request after `timeout`. `None` waits indefinitely.
    pub fn with_timeout(api_base: Url, timeout: Option<Duration>) -> Result<Self, BackendError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(BackendError::transport)?;
        Ok(Self { http, api_base })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url, BackendError> {
        let mut url = self.api_base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                BackendError::Transport(format!(
                    "api base url cannot carry a path: {}",
                    self.api_base
                ))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }
}

#[async_trait]
impl CheckoutBackend for HttpCheckoutBackend {
    async fn lookup_product(&self, code: &ProductCode) -> Result<ProductResponse, BackendError> {
        let url = self.endpoint([PRODUCTS_ROUTE, code.as_str()])?;
        debug!(%url, "lookup request");
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(BackendError::transport)?;
        decode_response(res).await
    }

    async fn submit_purchase(&self, items: &[LineItem]) -> Result<PurchaseResponse, BackendError> {
        let url = self.endpoint([PURCHASE_ROUTE])?;
        debug!(%url, items = items.len(), "purchase request");
        let res = self
            .http
            .post(url)
            .json(&PurchaseRequest {
                items: items.to_vec(),
            })
            .send()
            .await
            .map_err(BackendError::transport)?;
        decode_response(res).await
    }
}

async fn decode_response<T: DeserializeOwned>(res: Response) -> Result<T, BackendError> {
    let status = res.status();
    let body = res.bytes().await.map_err(BackendError::transport)?;

    if !status.is_success() {
        let err: ErrorBody = serde_json::from_slice(&body).map_err(|err| {
            BackendError::Transport(format!("malformed error body (status {status}): {err}"))
        })?;
        return Err(BackendError::Service {
            status: status.as_u16(),
            detail: err.detail,
        });
    }

    serde_json::from_slice(&body)
        .map_err(|err| BackendError::Transport(format!("malformed response body: {err}")))
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
