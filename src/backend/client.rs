//! HTTP client for the bot server's run endpoint
//!
//! One POST with no body per run. The server blocks until the simulated
//! call has ended, then answers with the outcome JSON. No timeout and no
//! retry are applied here.

use std::future::Future;

use reqwest::Client;

use crate::backend::outcome::CallOutcome;
use crate::core::config::DashboardConfig;
use crate::core::error::{DashboardError, Result};

/// Anything that can perform one run and hand back its outcome
pub trait OutcomeSource {
    fn run_bot(&self) -> impl Future<Output = Result<CallOutcome>> + Send;

    /// Where runs are sent, for logging
    fn describe(&self) -> String;
}

/// Client for the bot server
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    endpoint: String,
}

impl BackendClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.endpoint.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Trigger one simulated call and decode the outcome
    ///
    /// Non-2xx statuses and bodies that are not JSON are errors, same as a
    /// failed connection.
    pub async fn run_bot(&self) -> Result<CallOutcome> {
        let response = self.client.post(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DashboardError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        CallOutcome::from_slice(&body)
    }
}

impl OutcomeSource for BackendClient {
    fn run_bot(&self) -> impl Future<Output = Result<CallOutcome>> + Send {
        BackendClient::run_bot(self)
    }

    fn describe(&self) -> String {
        self.endpoint().to_string()
    }
}
