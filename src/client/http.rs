//! Reqwest-backed API client.
//!
//! Every request carries the tenant header and, when configured, a bearer
//! token. Responses arrive in the `{ data, message? }` envelope; `data` is
//! unwrapped here so callers and the cache never see the wrapper.

use std::time::Duration;

use comanda_api_types::{
    ApiEnvelope, InventoryItemDto, OrderDto, RecipeDto, RestockItemDto, SalesDayDto,
    SalesTotalsDto, SyncOrdersRequest, SyncOrdersResponse, UpdateRecipeRequest, UpdateStockRequest,
    UpdateStockResponse,
};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use time::Date;
use tracing::debug;
use uuid::Uuid;

use crate::cache::DateWindow;

use super::error::ClientError;

const TENANT_HEADER: &str = "x-tenant-id";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client bound to one backend and one tenant.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base: Url,
    tenant_id: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        tenant_id: impl Into<String>,
        token: Option<String>,
    ) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, tenant_id, token, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: &str,
        tenant_id: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let base = Url::parse(base_url)?.join("/")?;
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base,
            tenant_id: tenant_id.into(),
            token,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("comanda/", env!("CARGO_PKG_VERSION"))
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base.join(path).map_err(ClientError::Url)
    }

    fn auth_header(&self, token: &str) -> Result<HeaderValue, ClientError> {
        HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ClientError::config(format!("bearer token is not a valid header: {e}")))
    }

    /// Issue a request and unwrap the response envelope.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        body: Option<serde_json::Value>,
    ) -> Result<T, ClientError> {
        let mut url = self.url(path)?;
        if let Some(q) = query {
            url.set_query(None);
            let mut qp = url.query_pairs_mut();
            for (k, v) in q {
                qp.append_pair(k, v);
            }
        }

        let mut req = self
            .client
            .request(method, url)
            .header(TENANT_HEADER, self.tenant_id.as_str());
        if let Some(token) = &self.token {
            req = req.header(AUTHORIZATION, self.auth_header(token)?);
        }
        if let Some(b) = body {
            req = req.json(&b);
        }

        let resp = req.send().await?;
        Self::unwrap_envelope(resp, path).await
    }

    async fn unwrap_envelope<T: DeserializeOwned>(
        resp: Response,
        path: &str,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            return Err(Self::status_error(status, &bytes));
        }

        let envelope: ApiEnvelope<T> = serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::parse(format!("{path}: {e}")))?;
        if let Some(message) = &envelope.message {
            debug!(path, message, "Server attached a message to the response");
        }
        Ok(envelope.data)
    }

    fn status_error(status: StatusCode, bytes: &[u8]) -> ClientError {
        let body = String::from_utf8_lossy(bytes).into_owned();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Unauthorized {
                status: status.as_u16(),
            },
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                // Prefer the server's human-readable message when present.
                let message = serde_json::from_slice::<serde_json::Value>(bytes)
                    .ok()
                    .and_then(|v| v.get("message").and_then(|m| m.as_str().map(String::from)))
                    .unwrap_or(body);
                ClientError::Validation { message }
            }
            _ => ClientError::Status {
                status: status.as_u16(),
                body,
            },
        }
    }

    // ========================================================================
    // Endpoints (raw DTOs)
    // ========================================================================

    pub async fn list_inventory_raw(&self) -> Result<Vec<InventoryItemDto>, ClientError> {
        self.request(Method::GET, "/inventory", None, None).await
    }

    pub async fn list_restock_raw(&self) -> Result<Vec<RestockItemDto>, ClientError> {
        self.request(Method::GET, "/inventory/restock", None, None)
            .await
    }

    pub async fn update_stock_raw(
        &self,
        request: &UpdateStockRequest,
    ) -> Result<UpdateStockResponse, ClientError> {
        let body = serde_json::to_value(request)
            .map_err(|e| ClientError::parse(format!("update-stock request: {e}")))?;
        self.request(Method::POST, "/stock/update-stock", None, Some(body))
            .await
    }

    pub async fn list_orders_raw(&self, window: DateWindow) -> Result<Vec<OrderDto>, ClientError> {
        let query = [
            ("start_date", window.start().to_string()),
            ("end_date", window.end().to_string()),
        ];
        self.request(Method::GET, "/orders", Some(&query), None)
            .await
    }

    pub async fn sync_orders_raw(
        &self,
        request: &SyncOrdersRequest,
    ) -> Result<SyncOrdersResponse, ClientError> {
        let body = serde_json::to_value(request)
            .map_err(|e| ClientError::parse(format!("orders-sync request: {e}")))?;
        self.request(Method::POST, "/orders/sync", None, Some(body))
            .await
    }

    pub async fn sales_day_raw(&self, date: Date) -> Result<SalesDayDto, ClientError> {
        self.request(Method::GET, &format!("/sales/{date}"), None, None)
            .await
    }

    pub async fn sales_totals_raw(&self, window: DateWindow) -> Result<SalesTotalsDto, ClientError> {
        let query = [
            ("start_date", window.start().to_string()),
            ("end_date", window.end().to_string()),
        ];
        self.request(Method::GET, "/sales/total-sales", Some(&query), None)
            .await
    }

    pub async fn list_recipes_raw(&self) -> Result<Vec<RecipeDto>, ClientError> {
        self.request(Method::GET, "/cookbook/", None, None).await
    }

    pub async fn update_recipe_raw(
        &self,
        recipe_id: Uuid,
        request: &UpdateRecipeRequest,
    ) -> Result<RecipeDto, ClientError> {
        let body = serde_json::to_value(request)
            .map_err(|e| ClientError::parse(format!("cookbook update request: {e}")))?;
        self.request(
            Method::PUT,
            &format!("/cookbook/{recipe_id}"),
            None,
            Some(body),
        )
        .await
    }
}
