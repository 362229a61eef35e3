//! `RemoteBillsService` backed by the billing REST API.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Bill, BillId},
    error::ApiError,
    protocol::{BillPatch, NewBill},
};
use tracing::debug;
use url::Url;

use crate::{error::StoreError, session::JWT_KEY, RemoteBillsService, SessionStore};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpBillsService {
    http: Client,
    base_url: Url,
    session: Arc<dyn SessionStore>,
}

impl HttpBillsService {
    pub fn new(
        api_url: &str,
        session: Arc<dyn SessionStore>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let mut base_url = Url::parse(api_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        Ok(self.base_url.join(path)?)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.get_item(JWT_KEY) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl RemoteBillsService for HttpBillsService {
    async fn list(&self) -> Result<Vec<Bill>, StoreError> {
        let url = self.endpoint("bills")?;
        debug!(%url, "listing bills");
        let res = self.authorized(self.http.get(url)).send().await?;
        decode(res).await
    }

    async fn create(&self, bill: NewBill) -> Result<Bill, StoreError> {
        let url = self.endpoint("bills")?;
        debug!(%url, "creating bill");
        let res = self
            .authorized(self.http.post(url))
            .json(&bill)
            .send()
            .await?;
        decode(res).await
    }

    async fn update(&self, id: &BillId, patch: BillPatch) -> Result<Bill, StoreError> {
        let url = self.endpoint(&format!("bills/{id}"))?;
        debug!(%url, "updating bill");
        let res = self
            .authorized(self.http.patch(url))
            .json(&patch)
            .send()
            .await?;
        decode(res).await
    }
}

/// Non-success responses carry `{"message": ...}` when the server explains
/// itself; otherwise the status code alone is reported.
async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, StoreError> {
    let status = res.status();
    if !status.is_success() {
        let body = res.bytes().await.unwrap_or_default();
        return Err(match serde_json::from_slice::<ApiError>(&body) {
            Ok(api) if !api.message.trim().is_empty() => StoreError::Rejected(api.message),
            _ => StoreError::Status {
                status: status.as_u16(),
            },
        });
    }
    Ok(res.json::<T>().await?)
}

#[cfg(test)]
#[path = "tests/http_store_tests.rs"]
mod tests;
