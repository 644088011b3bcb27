//! HTTP client for the admin backend
//!
//! One method per endpoint. Methods never retry and never touch the session;
//! callers pass the bearer token explicitly.

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use super::types::{Ack, Page, Pagination};
use super::AuthApi;
use crate::auth::{AuthResponse, Credentials, NewAdmin};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::presale::{
    validate_stage_price, CountdownSettings, DashboardStats, LiveStats, Participant, PresaleSettings,
    Tokenomics, TxLog,
};

/// Default page size used by the list screens
pub const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(Deserialize)]
struct ParticipantList {
    #[serde(default)]
    participants: Vec<Participant>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Deserialize)]
struct TransactionList {
    #[serde(default)]
    transactions: Vec<TxLog>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

/// Admin backend client
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the configured backend
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Url::parse(&config.base_url)
            .map_err(|e| Error::Config(format!("Invalid API base URL '{}': {}", config.base_url, e)))?;

        let http = http_client(
            Duration::from_secs(config.timeout_secs),
            concat!("presale-admin/", env!("CARGO_PKG_VERSION")),
        )?;

        tracing::debug!("Created API client for {}", config.base_url);

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> Result<Url> {
        Url::parse(&format!("{}{}", self.base_url, endpoint))
            .map_err(|e| Error::Config(format!("Invalid endpoint {}: {}", endpoint, e)))
    }

    fn url_with_segment(&self, endpoint: &str, segment: &str) -> Result<Url> {
        let mut url = self.url(endpoint)?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Cannot extend URL {}", endpoint)))?
            .push(segment);
        Ok(url)
    }

    fn url_with_query(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Url> {
        let mut url = self.url(endpoint)?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Send one request and decode the JSON body
    async fn send<B, T>(&self, method: Method, url: Url, token: Option<&str>, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let endpoint = url.path().to_string();
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::debug!("{} {} failed with {}: {}", method, endpoint, status, text);
            return Err(Error::Api {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| Error::InvalidResponse {
            endpoint,
            message: e.to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, url: Url, token: Option<&str>) -> Result<T> {
        self.send::<(), T>(Method::GET, url, token, None).await
    }

    async fn post<B, T>(&self, url: Url, token: Option<&str>, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, url, token, Some(body)).await
    }

    fn paging(page: u32, limit: u32) -> Result<Vec<(&'static str, String)>> {
        if page == 0 || limit == 0 {
            return Err(Error::validation("Page and limit must be at least 1"));
        }
        Ok(vec![("page", page.to_string()), ("limit", limit.to_string())])
    }

    // Presale settings

    /// `GET /admin/countdown`
    pub async fn countdown(&self, token: &str) -> Result<CountdownSettings> {
        self.get(self.url("/admin/countdown")?, Some(token)).await
    }

    /// `POST /admin/countdown`
    pub async fn update_countdown(&self, token: &str, settings: &CountdownSettings) -> Result<Ack> {
        settings.validate()?;
        let ack: Ack = self.post(self.url("/admin/countdown")?, Some(token), settings).await?;
        ack.into_result()
    }

    /// `GET /admin/live-stats`
    pub async fn live_stats(&self, token: &str) -> Result<LiveStats> {
        self.get(self.url("/admin/live-stats")?, Some(token)).await
    }

    /// `POST /admin/live-stats`
    pub async fn update_live_stats(&self, token: &str, stats: &LiveStats) -> Result<Ack> {
        stats.validate()?;
        let ack: Ack = self.post(self.url("/admin/live-stats")?, Some(token), stats).await?;
        ack.into_result()
    }

    /// `GET /admin/tokenomics`
    pub async fn tokenomics(&self, token: &str) -> Result<Tokenomics> {
        self.get(self.url("/admin/tokenomics")?, Some(token)).await
    }

    /// `POST /admin/tokenomics`
    pub async fn update_tokenomics(&self, token: &str, tokenomics: &Tokenomics) -> Result<Ack> {
        tokenomics.validate()?;
        let ack: Ack = self.post(self.url("/admin/tokenomics")?, Some(token), tokenomics).await?;
        ack.into_result()
    }

    /// `GET /presale/status`, no authentication
    pub async fn presale_status(&self) -> Result<Value> {
        self.get(self.url("/presale/status")?, None).await
    }

    /// `POST /admin/presale/update-stage`
    pub async fn update_presale_stage(&self, token: &str, stage: u8) -> Result<Ack> {
        if !(1..=crate::presale::tokenomics::STAGE_COUNT as u8).contains(&stage) {
            return Err(Error::validation("Stage must be between 1 and 5"));
        }
        let ack: Ack = self
            .post(self.url("/admin/presale/update-stage")?, Some(token), &json!({ "stage": stage }))
            .await?;
        ack.into_result()
    }

    /// `POST /admin/presale/update-price`
    pub async fn update_presale_price(&self, token: &str, stage: u8, price: f64) -> Result<Ack> {
        validate_stage_price(stage, price)?;
        let ack: Ack = self
            .post(
                self.url("/admin/presale/update-price")?,
                Some(token),
                &json!({ "stage": stage, "price": price }),
            )
            .await?;
        ack.into_result()
    }

    /// `POST /admin/presale/update-settings`
    pub async fn update_presale_settings(&self, token: &str, settings: &PresaleSettings) -> Result<Ack> {
        let settings = settings.normalized()?;
        let ack: Ack = self
            .post(self.url("/admin/presale/update-settings")?, Some(token), &settings)
            .await?;
        ack.into_result()
    }

    /// `POST /admin/presale/toggle-status`
    pub async fn toggle_presale(&self, token: &str, active: bool) -> Result<Ack> {
        let ack: Ack = self
            .post(self.url("/admin/presale/toggle-status")?, Some(token), &json!({ "isActive": active }))
            .await?;
        ack.into_result()
    }

    // Reporting

    /// `GET /admin/dashboard/stats`
    pub async fn dashboard_stats(&self, token: &str) -> Result<DashboardStats> {
        self.get(self.url("/admin/dashboard/stats")?, Some(token)).await
    }

    /// `GET /admin/analytics/overview`, optionally bounded by `YYYY-MM-DD` dates
    pub async fn analytics(&self, token: &str, start: Option<&str>, end: Option<&str>) -> Result<Value> {
        let mut params = Vec::new();
        for (key, value) in [("startDate", start), ("endDate", end)] {
            if let Some(value) = value {
                chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
                    Error::validation(format!("Invalid date '{}'. Expected YYYY-MM-DD", value))
                })?;
                params.push((key, value.to_string()));
            }
        }
        self.get(self.url_with_query("/admin/analytics/overview", &params)?, Some(token))
            .await
    }

    /// `GET /admin/participants?page&limit`
    pub async fn participants(&self, token: &str, page: u32, limit: u32) -> Result<Page<Participant>> {
        let url = self.url_with_query("/admin/participants", &Self::paging(page, limit)?)?;
        let list: ParticipantList = self.get(url, Some(token)).await?;
        Ok(Page::new(list.participants, list.pagination, page, limit))
    }

    /// `GET /admin/participants/search?q`
    pub async fn search_participants(&self, token: &str, query: &str) -> Result<Vec<Participant>> {
        let url = self.url_with_query("/admin/participants/search", &[("q", non_empty(query)?)])?;
        let list: ParticipantList = self.get(url, Some(token)).await?;
        Ok(list.participants)
    }

    /// `GET /admin/participants/{wallet}`
    pub async fn participant(&self, token: &str, wallet: &str) -> Result<Value> {
        let url = self.url_with_segment("/admin/participants", &non_empty(wallet)?)?;
        self.get(url, Some(token)).await
    }

    /// `GET /admin/transaction?page&limit`
    pub async fn transactions(&self, token: &str, page: u32, limit: u32) -> Result<Page<TxLog>> {
        let url = self.url_with_query("/admin/transaction", &Self::paging(page, limit)?)?;
        let list: TransactionList = self.get(url, Some(token)).await?;
        Ok(Page::new(list.transactions, list.pagination, page, limit))
    }

    /// `GET /admin/transactions/search?q`
    pub async fn search_transactions(&self, token: &str, query: &str) -> Result<Value> {
        let url = self.url_with_query("/admin/transactions/search", &[("q", non_empty(query)?)])?;
        self.get(url, Some(token)).await
    }

    /// `GET /admin/transactions/{hash}`
    pub async fn transaction(&self, token: &str, hash: &str) -> Result<Value> {
        let url = self.url_with_segment("/admin/transactions", &non_empty(hash)?)?;
        self.get(url, Some(token)).await
    }

    /// `GET /admin/newsletter/subscribers?page&limit`
    pub async fn newsletter_subscribers(&self, token: &str, page: u32, limit: u32) -> Result<Value> {
        let url = self.url_with_query("/admin/newsletter/subscribers", &Self::paging(page, limit)?)?;
        self.get(url, Some(token)).await
    }

    /// `GET /admin/newsletter/export`
    pub async fn export_newsletter_subscribers(&self, token: &str) -> Result<Value> {
        self.get(self.url("/admin/newsletter/export")?, Some(token)).await
    }

    // Operator accounts

    /// `GET /admin/all`
    pub async fn list_admins(&self, token: &str) -> Result<Value> {
        self.get(self.url("/admin/all")?, Some(token)).await
    }

    /// `POST /admin/create`
    pub async fn create_admin(&self, token: &str, admin: &NewAdmin) -> Result<Ack> {
        for (field, value) in [("Name", &admin.name), ("Email", &admin.email), ("Password", &admin.password)] {
            if value.trim().is_empty() {
                return Err(Error::validation(format!("{} is required", field)));
            }
        }
        let ack: Ack = self.post(self.url("/admin/create")?, Some(token), admin).await?;
        ack.into_result()
    }
}

/// A builder failure is a local setup problem, never an unreachable backend
fn http_client(timeout: Duration, user_agent: &str) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))
}

fn non_empty(value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation("A search term is required"));
    }
    Ok(value.to_string())
}

/// The backend answers bad credentials with 400/401 and a regular auth body
fn rejection_body(result: Result<AuthResponse>) -> Result<AuthResponse> {
    if let Err(Error::Api {
        status: 400 | 401,
        body,
        ..
    }) = &result
    {
        if let Ok(response) = serde_json::from_str::<AuthResponse>(body) {
            if !response.success {
                return Ok(response);
            }
        }
    }
    result
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        rejection_body(self.post(self.url("/admin/login")?, None, credentials).await)
    }

    async fn refresh_token(&self, credentials: &Credentials) -> Result<AuthResponse> {
        rejection_body(self.post(self.url("/admin/refresh-token")?, None, credentials).await)
    }
}
