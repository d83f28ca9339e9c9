//! Typed client for reading records off the services under test.
//!
//! Every service answers plain `GET` requests with either a JSON object or
//! a `{"body": {...}}` response envelope. [`RecordClient::fetch_record`]
//! normalizes both to a [`CandidateRecord`] so the result can be handed
//! straight to a [`TagValidator`].

use std::time::Duration;

use piitag_schema::{into_record, CandidateRecord, PiiLevel, RecordReport, TagValidator};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use url::Url;

use crate::config::ServiceEndpoints;
use crate::error::ClientError;

/// Path of the user lookup endpoint on the userinfo service.
pub const USER_BY_ID_PATH: &str = "user/fetchUserById";

/// Header map carrying `value` as the `Authorization` header.
///
/// # Errors
///
/// Returns [`ClientError::InvalidHeader`] if `value` is not a legal header
/// value (control characters, non-visible bytes).
pub fn authorization(value: &str) -> Result<HeaderMap, ClientError> {
    let value = HeaderValue::from_str(value).map_err(|e| ClientError::InvalidHeader {
        name: AUTHORIZATION.to_string(),
        reason: e.to_string(),
    })?;
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// HTTP client bound to one set of service endpoints.
#[derive(Debug, Clone)]
pub struct RecordClient {
    http: reqwest::Client,
    endpoints: ServiceEndpoints,
}

impl RecordClient {
    /// Build a client whose requests time out after the configured interval.
    pub fn new(endpoints: ServiceEndpoints) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(endpoints.timeout_secs))
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self { http, endpoints })
    }

    /// Endpoints this client talks to.
    pub fn endpoints(&self) -> &ServiceEndpoints {
        &self.endpoints
    }

    /// Append `path` to the base URL of `service`, keeping any path prefix
    /// the base carries.
    pub fn record_url(&self, service: &str, path: &str) -> Result<Url, ClientError> {
        let base = self
            .endpoints
            .url_for(service)
            .ok_or_else(|| ClientError::UnknownService(service.to_string()))?;
        let joined = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ClientError::InvalidPath {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// Fetch one record from `service` at `path`.
    ///
    /// Calls `GET {service base}/{path}` and strips a `body` envelope if
    /// the service wraps its response.
    pub async fn fetch_record(
        &self,
        service: &str,
        path: &str,
    ) -> Result<CandidateRecord, ClientError> {
        self.fetch_record_with(service, path, HeaderMap::new()).await
    }

    /// [`fetch_record`](Self::fetch_record) with extra request headers,
    /// e.g. an `Authorization` credential.
    pub async fn fetch_record_with(
        &self,
        service: &str,
        path: &str,
        headers: HeaderMap,
    ) -> Result<CandidateRecord, ClientError> {
        let url = self.record_url(service, path)?;
        let endpoint = format!("GET {url}");
        tracing::debug!(service, %url, headers = headers.len(), "fetching record");

        let resp = self
            .http
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(service, status, "record fetch failed");
            return Err(ClientError::Api {
                endpoint,
                status,
                body,
            });
        }

        let value: serde_json::Value =
            resp.json()
                .await
                .map_err(|e| ClientError::Deserialization {
                    endpoint: endpoint.clone(),
                    source: e,
                })?;

        into_record(value).ok_or(ClientError::NotAnObject { endpoint })
    }

    /// HTTP status `service` answers at `path` with the given headers.
    ///
    /// Unlike [`fetch_record_with`](Self::fetch_record_with), a non-2xx
    /// status is a result, not an error. Only transport failures fail.
    pub async fn status_of(
        &self,
        service: &str,
        path: &str,
        headers: HeaderMap,
    ) -> Result<u16, ClientError> {
        let url = self.record_url(service, path)?;
        let endpoint = format!("GET {url}");
        let resp = self
            .http
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| ClientError::Http {
                endpoint,
                source: e,
            })?;
        Ok(resp.status().as_u16())
    }

    /// Fetch a user record by id from the userinfo service.
    pub async fn fetch_user(&self, id: u64) -> Result<CandidateRecord, ClientError> {
        self.fetch_record("userinfo", &user_path(id)).await
    }

    /// Fetch a record and check it against the classification of `service`.
    pub async fn audit(
        &self,
        validator: &TagValidator,
        service: &str,
        path: &str,
        min_level: PiiLevel,
    ) -> Result<RecordReport, ClientError> {
        let record = self.fetch_record(service, path).await?;
        let report = validator.check_record(service, &record, min_level);
        if !report.is_complete() {
            tracing::info!(
                service,
                path,
                missing = ?report.missing_required,
                "record missing required fields"
            );
        }
        Ok(report)
    }
}

/// Request path of one user on the userinfo service.
pub fn user_path(id: u64) -> String {
    format!("{USER_BY_ID_PATH}/{id}")
}
