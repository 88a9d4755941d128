//! REST client for the remote ledger API.
//!
//! Wraps the ledger's JSON-over-HTTP endpoints in the [`LedgerGateway`]
//! trait. Requests carry a bearer token when one is stored; error responses
//! are classified into the shared [`GatewayError`] taxonomy from their
//! status code and JSON body.
//!
//! # Example
//!
//! ```ignore
//! use utang_gateway_http::{HttpGateway, HttpGatewayConfig, TokenStore};
//! use utang_core::storage::ClientStorage;
//!
//! #[tokio::main]
//! async fn main() -> utang_core::Result<()> {
//!     let storage = ClientStorage::new("./data");
//!     let gateway = HttpGateway::new(HttpGatewayConfig::default(), TokenStore::new(storage))?;
//!
//!     let borrowers = gateway.list_borrowers().await?;
//!     println!("{} borrowers on file", borrowers.len());
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use utang_core::error::{GatewayError, Result};
use utang_core::gateway::LedgerGateway;
use utang_core::types::{
    Borrower, BorrowerUpdate, Contract, ContractUpdate, DashboardSummary, NewBorrower,
    NewContract, NewOffer, NewPayment, Offer, OfferUpdate, Payment,
};

use crate::auth::TokenStore;

// =============================================================================
// Constants
// =============================================================================

/// Default ledger API base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the HTTP gateway.
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// Base URL for the API, without a trailing slash.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl HttpGatewayConfig {
    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl From<&utang_core::config::ApiConfig> for HttpGatewayConfig {
    fn from(api: &utang_core::config::ApiConfig) -> Self {
        Self {
            base_url: api.base_url.clone(),
            timeout_secs: api.timeout_secs,
        }
    }
}

// =============================================================================
// Error Classification
// =============================================================================

/// Error body shape the ledger API uses. ASP.NET-style responses put the
/// summary under `title`; the ledger's own handlers use `message`.
#[derive(Debug, Deserialize)]
struct RawErrorBody {
    message: Option<String>,
    title: Option<String>,
    errors: Option<HashMap<String, Vec<String>>>,
}

/// Maps a failed response's status onto the error taxonomy.
fn classify_status(
    status_code: u16,
    message: String,
    field_errors: Option<HashMap<String, Vec<String>>>,
) -> GatewayError {
    match status_code {
        400 | 422 => GatewayError::Validation {
            message,
            status_code,
            errors: field_errors.unwrap_or_default(),
        },
        401 => GatewayError::Unauthorized(message),
        404 => GatewayError::NotFound(message),
        _ => GatewayError::Api {
            status_code,
            message,
        },
    }
}

/// Maps transport-level failures onto the error taxonomy.
fn from_reqwest(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout(err.to_string())
    } else if err.is_connect() {
        GatewayError::Network(format!("connection failed: {err}"))
    } else {
        GatewayError::Network(err.to_string())
    }
}

// =============================================================================
// HttpGateway
// =============================================================================

/// Gateway backed by the remote REST API.
///
/// The bearer token is read from the [`TokenStore`] on every request rather
/// than cached, so a token set or cleared elsewhere takes effect on the very
/// next call.
pub struct HttpGateway {
    /// Configuration.
    config: HttpGatewayConfig,

    /// HTTP client.
    http: Client,

    /// Bearer-token store.
    tokens: TokenStore,
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.config.base_url)
            .field("timeout_secs", &self.config.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl HttpGateway {
    /// Creates a gateway with the given configuration and token store.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: HttpGatewayConfig, tokens: TokenStore) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            http,
            tokens,
        })
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Contracts path, optionally filtered to one borrower.
    fn contracts_path(borrower_id: Option<i64>) -> String {
        match borrower_id {
            Some(id) => format!("/contracts?borrowerId={id}"),
            None => "/contracts".to_string(),
        }
    }

    /// Payments path, optionally filtered to one contract.
    fn payments_path(contract_id: Option<i64>) -> String {
        match contract_id {
            Some(id) => format!("/payments?contractId={id}"),
            None => "/payments".to_string(),
        }
    }

    /// Offers path, optionally filtered to one borrower.
    fn offers_path(borrower_id: Option<i64>) -> String {
        match borrower_id {
            Some(id) => format!("/offers?borrowerId={id}"),
            None => "/offers".to_string(),
        }
    }

    /// Attaches the bearer token when one is stored.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Makes a GET request and parses the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self
            .authorize(self.http.get(&url).header("Accept", "application/json"))
            .send()
            .await
            .map_err(from_reqwest)?;

        Self::parse_json(response).await
    }

    /// Makes a POST request with a JSON body and parses the JSON response.
    async fn post_json<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!("POST {}", url);

        let response = self
            .authorize(
                self.http
                    .post(&url)
                    .header("Accept", "application/json")
                    .json(body),
            )
            .send()
            .await
            .map_err(from_reqwest)?;

        Self::parse_json(response).await
    }

    /// Makes a PUT request with a JSON body and parses the JSON response.
    async fn put_json<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!("PUT {}", url);

        let response = self
            .authorize(
                self.http
                    .put(&url)
                    .header("Accept", "application/json")
                    .json(body),
            )
            .send()
            .await
            .map_err(from_reqwest)?;

        Self::parse_json(response).await
    }

    /// Makes a DELETE request, expecting an empty (204) success body.
    async fn delete_empty(&self, path: &str) -> Result<()> {
        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!("DELETE {}", url);

        let response = self
            .authorize(self.http.delete(&url).header("Accept", "application/json"))
            .send()
            .await
            .map_err(from_reqwest)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }

    /// Parses a successful JSON body, or classifies the failure.
    ///
    /// Typed create/update calls need the stored record back; a bodiless
    /// `204 No Content` (which the delete path accepts) cannot satisfy
    /// that, so it is reported as such instead of as a JSON parse failure.
    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Err(GatewayError::Serialization(
                "204 No Content where a record body was expected".to_string(),
            ));
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                GatewayError::Serialization(e.to_string())
            } else {
                from_reqwest(e)
            }
        })
    }

    /// Builds a typed error from a failed response.
    ///
    /// JSON bodies take their summary from `message`, then `title`; a body
    /// that is not JSON falls back to the status's canonical reason.
    async fn error_from_response(response: reqwest::Response) -> GatewayError {
        let status = response.status();
        let fallback = status
            .canonical_reason()
            .unwrap_or("An error occurred")
            .to_string();
        let body = response.text().await.unwrap_or_default();

        match serde_json::from_str::<RawErrorBody>(&body) {
            Ok(raw) => {
                let message = raw
                    .message
                    .or(raw.title)
                    .unwrap_or_else(|| "An error occurred".to_string());
                classify_status(status.as_u16(), message, raw.errors)
            }
            Err(_) => classify_status(status.as_u16(), fallback, None),
        }
    }
}

#[async_trait]
impl LedgerGateway for HttpGateway {
    async fn list_borrowers(&self) -> Result<Vec<Borrower>> {
        self.get_json("/borrowers").await
    }

    async fn get_borrower(&self, id: i64) -> Result<Borrower> {
        self.get_json(&format!("/borrowers/{id}")).await
    }

    async fn create_borrower(&self, new: &NewBorrower) -> Result<Borrower> {
        self.post_json("/borrowers", new).await
    }

    async fn update_borrower(&self, id: i64, update: &BorrowerUpdate) -> Result<Borrower> {
        self.put_json(&format!("/borrowers/{id}"), update).await
    }

    async fn delete_borrower(&self, id: i64) -> Result<()> {
        self.delete_empty(&format!("/borrowers/{id}")).await
    }

    async fn list_contracts(&self, borrower_id: Option<i64>) -> Result<Vec<Contract>> {
        self.get_json(&Self::contracts_path(borrower_id)).await
    }

    async fn get_contract(&self, id: i64) -> Result<Contract> {
        self.get_json(&format!("/contracts/{id}")).await
    }

    async fn create_contract(&self, new: &NewContract) -> Result<Contract> {
        self.post_json("/contracts", new).await
    }

    async fn update_contract(&self, id: i64, update: &ContractUpdate) -> Result<Contract> {
        self.put_json(&format!("/contracts/{id}"), update).await
    }

    async fn delete_contract(&self, id: i64) -> Result<()> {
        self.delete_empty(&format!("/contracts/{id}")).await
    }

    async fn list_payments(&self, contract_id: Option<i64>) -> Result<Vec<Payment>> {
        self.get_json(&Self::payments_path(contract_id)).await
    }

    async fn get_payment(&self, id: i64) -> Result<Payment> {
        self.get_json(&format!("/payments/{id}")).await
    }

    async fn create_payment(&self, new: &NewPayment) -> Result<Payment> {
        self.post_json("/payments", new).await
    }

    async fn delete_payment(&self, id: i64) -> Result<()> {
        self.delete_empty(&format!("/payments/{id}")).await
    }

    async fn list_offers(&self, borrower_id: Option<i64>) -> Result<Vec<Offer>> {
        self.get_json(&Self::offers_path(borrower_id)).await
    }

    async fn get_offer(&self, id: i64) -> Result<Offer> {
        self.get_json(&format!("/offers/{id}")).await
    }

    async fn create_offer(&self, new: &NewOffer) -> Result<Offer> {
        self.post_json("/offers", new).await
    }

    async fn update_offer(&self, id: i64, update: &OfferUpdate) -> Result<Offer> {
        self.put_json(&format!("/offers/{id}"), update).await
    }

    async fn delete_offer(&self, id: i64) -> Result<()> {
        self.delete_empty(&format!("/offers/{id}")).await
    }

    async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        self.get_json("/dashboard/summary").await
    }
}
