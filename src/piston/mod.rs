//! Reqwest-based client for the Piston execute endpoint.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;

#[derive(Debug, Clone, Serialize)]
pub struct ExecuteRequest {
    pub language: String,
    pub version: String,
    pub files: Vec<FilePayload>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilePayload {
    pub content: String,
}

impl ExecuteRequest {
    pub fn new(language: &str, version: &str, code: &str) -> Self {
        Self {
            language: language.to_string(),
            version: version.to_string(),
            files: vec![FilePayload { content: code.to_string() }],
        }
    }
}

/// Outcome of one stage (compile or run) inside the sandbox. `code` is the
/// process exit code; the service reports `null` when the stage was killed
/// by a signal, which still counts as a failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StageResult {
    pub code: Option<i64>,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    /// Interleaved stdout+stderr as the service captured it.
    #[serde(default)]
    pub output: String,
}

impl StageResult {
    pub fn failed(&self) -> bool {
        self.code != Some(0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecuteResponse {
    /// Present on API-level errors (rate limits, unknown runtime, ...).
    pub message: Option<String>,
    pub compile: Option<StageResult>,
    pub run: Option<StageResult>,
}

/// The one outbound call the session manager makes. Kept as a trait so tests
/// can drive the classification branches without a network.
pub trait ExecutionService {
    fn execute(
        &self,
        req: &ExecuteRequest,
    ) -> impl std::future::Future<Output = Result<ExecuteResponse>>;
}

#[derive(Debug, Clone)]
pub struct PistonClient {
    http: Client,
    base: String,
}

impl PistonClient {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs()))
            .build()?;
        Ok(Self { http, base: cfg.api_base() })
    }
}

impl ExecutionService for PistonClient {
    async fn execute(&self, req: &ExecuteRequest) -> Result<ExecuteResponse> {
        let url = format!("{}/execute", self.base.trim_end_matches('/'));
        let resp = self
            .http
            .post(&url)
            .json(req)
            .send()
            .await
            .context("failed to send execute request")?;

        if !resp.status().is_success() {
            bail!("HTTP error! status: {}", resp.status().as_u16());
        }

        let data = resp
            .json::<ExecuteResponse>()
            .await
            .context("malformed execute response")?;
        tracing::debug!(language = %req.language, version = %req.version, "execute call settled");
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_wraps_code_as_single_file() {
        let req = ExecuteRequest::new("python", "3.10.0", "print(7)");
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["language"], "python");
        assert_eq!(body["version"], "3.10.0");
        assert_eq!(body["files"][0]["content"], "print(7)");
        assert_eq!(body["files"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn stage_with_null_exit_code_counts_as_failed() {
        let stage: StageResult = serde_json::from_str(r#"{"code": null, "stderr": "killed"}"#).unwrap();
        assert!(stage.failed());
        let ok: StageResult = serde_json::from_str(r#"{"code": 0, "output": "hi\n"}"#).unwrap();
        assert!(!ok.failed());
    }

    #[test]
    fn response_fields_are_all_optional() {
        let resp: ExecuteResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.message.is_none());
        assert!(resp.compile.is_none());
        assert!(resp.run.is_none());
    }
}
