//! HTTP adapter for the managed optimization service's job API.

use std::cell::RefCell;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::debug;

use crate::solver::{JobHandle, JobStatus, RoutePlanningRequest, RoutesResult, SolverError};
use crate::traits::OptimizationService;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    pub token_url: String,
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8081".to_string(),
            consumer_key: None,
            consumer_secret: None,
            token_url: "https://gateway.platform.planqk.de/token".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ServiceConfig {
    fn credentials(&self) -> Option<(&str, &str)> {
        match (self.consumer_key.as_deref(), self.consumer_secret.as_deref()) {
            (Some(key), Some(secret)) => Some((key, secret)),
            _ => None,
        }
    }
}

/// Tokens are renewed this long before the expiry the gateway reports.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Option<Instant>,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        self.expires_at.is_none_or(|at| Instant::now() < at)
    }
}

/// Blocking client for the job API.
///
/// With consumer credentials configured, every call carries a bearer token.
/// The token is fetched on connect and fetched again once its reported
/// lifetime has run out.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    config: ServiceConfig,
    client: reqwest::blocking::Client,
    token: RefCell<Option<AccessToken>>,
}

impl ServiceClient {
    /// Build the client, exchanging consumer credentials for a bearer token
    /// when both are configured.
    pub fn connect(config: ServiceConfig) -> Result<Self, SolverError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let token = match config.credentials() {
            Some((key, secret)) => Some(fetch_token(&client, &config.token_url, key, secret)?),
            None => {
                debug!(endpoint = %config.endpoint, "no consumer credentials, calling service unauthenticated");
                None
            }
        };

        Ok(Self {
            config,
            client,
            token: RefCell::new(token),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    fn authorize(
        &self,
        request: reqwest::blocking::RequestBuilder,
    ) -> Result<reqwest::blocking::RequestBuilder, SolverError> {
        let Some((key, secret)) = self.config.credentials() else {
            return Ok(request);
        };

        let mut slot = self.token.borrow_mut();
        let token = match slot.take().filter(AccessToken::is_fresh) {
            Some(token) => token,
            None => {
                debug!(token_url = %self.config.token_url, "access token expired, fetching a new one");
                fetch_token(&self.client, &self.config.token_url, key, secret)?
            }
        };
        let request = request.bearer_auth(&token.value);
        *slot = Some(token);
        Ok(request)
    }
}

impl OptimizationService for ServiceClient {
    fn submit(&self, request: &RoutePlanningRequest) -> Result<JobHandle, SolverError> {
        let response = self.authorize(self.client.post(self.url("")).json(request))?.send()?;
        Ok(accept(response)?.json()?)
    }

    fn status(&self, job: &JobHandle) -> Result<JobStatus, SolverError> {
        let response = self.authorize(self.client.get(self.url(&job.id)))?.send()?;
        let handle: JobHandle = accept(response)?.json()?;
        Ok(handle.status)
    }

    fn result(&self, job: &JobHandle) -> Result<RoutesResult, SolverError> {
        let path = format!("{}/result", job.id);
        let response = self.authorize(self.client.get(self.url(&path)))?.send()?;
        let envelope: ResultEnvelope = accept(response)?.json()?;
        Ok(envelope.result)
    }
}

#[derive(Debug, Deserialize)]
struct ResultEnvelope {
    result: RoutesResult,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

fn fetch_token(
    client: &reqwest::blocking::Client,
    token_url: &str,
    key: &str,
    secret: &str,
) -> Result<AccessToken, SolverError> {
    let response = client
        .post(token_url)
        .basic_auth(key, Some(secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .map_err(|err| SolverError::Token(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SolverError::Token(format!("token endpoint returned HTTP {status}")));
    }

    let token: TokenResponse = response
        .json()
        .map_err(|err| SolverError::Token(err.to_string()))?;
    Ok(AccessToken {
        value: token.access_token,
        expires_at: token
            .expires_in
            .map(|secs| Instant::now() + Duration::from_secs(secs).saturating_sub(TOKEN_EXPIRY_MARGIN)),
    })
}

fn accept(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, SolverError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(SolverError::Rejected {
            status: status.as_u16(),
            body: response.text().unwrap_or_default(),
        })
    }
}
