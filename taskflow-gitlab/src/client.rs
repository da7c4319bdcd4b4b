//! GitLab REST client and the shared request pipeline

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use taskflow_core::{Notification, Notifier};
use tracing::{debug, error};
use url::Url;

use crate::{Error, ProjectConfig, Result};

/// Shown when no project is configured
pub const MSG_NOT_CONFIGURED: &str = "GitLab: Not enough settings provided, please set a project";
/// Shown when a request never got a response
pub const MSG_NETWORK: &str = "GitLab: Request failed because of a client side network error";
/// Shown when the server rejected a request; carries `statusCode` and
/// `errorMsg` parameters
pub const MSG_REQUEST_FAILED: &str = "GitLab: Request failed";

/// Options for building a [`GitLabClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Upper bound for every single request
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: "taskflow".to_string(),
        }
    }
}

/// GitLab issue tracker client
///
/// The client holds no project state; every operation takes the
/// [`ProjectConfig`] to work on. Problems are reported to the user through
/// the notifier before they are returned, see [`Error::is_handled`].
pub struct GitLabClient {
    http: reqwest::Client,
    notifier: Arc<dyn Notifier>,
}

impl GitLabClient {
    /// Create a client with default options
    pub fn new(notifier: Arc<dyn Notifier>) -> Result<Self> {
        Self::with_options(notifier, ClientOptions::default())
    }

    /// Create a client with custom options
    pub fn with_options(notifier: Arc<dyn Notifier>, options: ClientOptions) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent)
            .build()
            .map_err(|e| Error::Client(e.to_string()))?;

        debug!(timeout = ?options.timeout, "Created GitLab client");

        Ok(Self { http, notifier })
    }

    /// Check that `cfg` names a project, notifying the user if it doesn't
    pub(crate) fn ensure_configured(&self, cfg: &ProjectConfig) -> bool {
        if cfg.is_configured() {
            return true;
        }
        debug!("GitLab project not configured");
        self.notifier.notify(Notification::error(MSG_NOT_CONFIGURED));
        false
    }

    /// Address of `path` below the project resource in `cfg`, with `query`
    /// appended
    pub(crate) fn endpoint(
        &self,
        cfg: &ProjectConfig,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Url> {
        let mut url = cfg
            .api_link()
            .and_then(|link| {
                Url::parse(&format!("{}/{}", link, path))
                    .map_err(|e| Error::Configuration(format!("Invalid GitLab address: {}", e)))
            })
            .inspect_err(|e| {
                error!(project = %cfg.project, error = %e, "Cannot derive GitLab API address");
                self.notifier
                    .notify(Notification::error(MSG_NOT_CONFIGURED).with_param("errorMsg", e));
            })?;

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Send a GET request and decode the JSON body
    ///
    /// Any failure is reported to the user and returned as a handled error.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        cfg: &ProjectConfig,
    ) -> Result<T> {
        debug!(url = %url, "Sending GitLab request");

        let mut request = self.http.get(url.clone());
        if let Some(token) = cfg.token.as_deref().filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.network_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                debug!(url = %url, error = %e, "Failed to read GitLab error body");
                String::new()
            });
            let message = format!("Http failure response for {}: {}", url, status);
            return Err(self.remote_error(&url, status, server_message(&body), message));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.network_error(&url, e))?;

        serde_json::from_slice(&bytes).map_err(|e| {
            let detail = format!("Invalid response body from {}: {}", url, e);
            self.remote_error(&url, status, Some(detail.clone()), detail)
        })
    }

    fn network_error(&self, url: &Url, err: reqwest::Error) -> Error {
        error!(url = %url, error = %err, timeout = err.is_timeout(), "GitLab request failed without response");
        self.notifier.notify(Notification::error(MSG_NETWORK));

        let message = if err.is_timeout() {
            format!("Request to {} timed out", url)
        } else {
            err.to_string()
        };
        Error::Network(message)
    }

    fn remote_error(
        &self,
        url: &Url,
        status: StatusCode,
        server_msg: Option<String>,
        message: String,
    ) -> Error {
        error!(url = %url, status = status.as_u16(), server_message = ?server_msg, "GitLab request failed");

        let mut notification =
            Notification::error(MSG_REQUEST_FAILED).with_param("statusCode", status.as_u16());
        if let Some(ref msg) = server_msg {
            notification = notification.with_param("errorMsg", msg);
        }
        self.notifier.notify(notification);

        Error::Remote {
            status: status.as_u16(),
            message,
        }
    }
}

impl std::fmt::Debug for GitLabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitLabClient").finish_non_exhaustive()
    }
}

/// Extract the human readable part of a GitLab error body
///
/// GitLab answers with `{"message": "..."}`, `{"message": {...}}` for
/// validation errors, or `{"error": "...", "error_description": "..."}` for
/// OAuth failures.
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    let message = value
        .get("message")
        .or_else(|| value.get("error_description"))
        .or_else(|| value.get("error"))?;

    match message {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
