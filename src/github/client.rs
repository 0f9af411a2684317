//! reqwest-based implementation of the GitHub REST collaborator.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::{ApiError, ApiResult, GithubApi, GithubApiProvider};
use crate::config::GithubConfig;
use crate::models::pull_request::{FileChange, PullRequest, PullRequestWire};
use crate::models::repository::RepoRef;
use crate::{AppError, Result};

const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "x-github-api-version";
const FILES_PAGE_SIZE: u32 = 100;

/// Shared HTTP client state from which per-repository handles are bound.
pub struct GithubClientFactory {
    http: reqwest::Client,
    api_base: String,
}

impl GithubClientFactory {
    /// Build the shared HTTP client with authentication headers applied
    /// to every request.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Github` when a header value or the client
    /// cannot be constructed.
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_GITHUB_JSON));

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|err| AppError::Github(format!("invalid token header: {err}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let version = HeaderValue::from_str(&config.api_version)
            .map_err(|err| AppError::Github(format!("invalid api version header: {err}")))?;
        headers.insert(API_VERSION_HEADER, version);

        let http = reqwest::Client::builder()
            .user_agent(concat!("workflow-warden/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|err| AppError::Github(format!("failed to build http client: {err}")))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_owned(),
        })
    }
}

impl GithubApiProvider for GithubClientFactory {
    fn client_for(&self, repo: &RepoRef) -> Arc<dyn GithubApi> {
        Arc::new(GithubClient {
            http: self.http.clone(),
            api_base: self.api_base.clone(),
            repo: repo.clone(),
        })
    }
}

/// REST client bound to a single repository.
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
    repo: RepoRef,
}

/// Wire shape of one entry in the `GET /pulls/{n}/files` response.
#[derive(Debug, Deserialize)]
struct FileEntry {
    filename: String,
}

impl GithubClient {
    fn url(&self, tail: &str) -> String {
        format!(
            "{}/repos/{}/{}/{tail}",
            self.api_base, self.repo.owner, self.repo.name
        )
    }
}

/// Map a transport-level send failure into the collaborator taxonomy.
fn send_error(err: reqwest::Error) -> ApiError {
    ApiError::NetworkOrAuth(err.to_string())
}

/// Map a non-success status into the collaborator taxonomy, consuming the
/// response on the error path.
fn expect_success(response: Response) -> ApiResult<Response> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::FORBIDDEN => Err(ApiError::Forbidden),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound),
        status => Err(ApiError::NetworkOrAuth(format!(
            "unexpected status {status}"
        ))),
    }
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn list_pull_request_files(&self, pr_number: u64) -> ApiResult<Vec<FileChange>> {
        // TODO: follow the Link header for pull requests touching more
        // than FILES_PAGE_SIZE files.
        let response = self
            .http
            .get(self.url(&format!("pulls/{pr_number}/files")))
            .query(&[("per_page", FILES_PAGE_SIZE)])
            .send()
            .await
            .map_err(send_error)?;

        let entries: Vec<FileEntry> = expect_success(response)?
            .json()
            .await
            .map_err(|err| ApiError::NetworkOrAuth(format!("invalid files response: {err}")))?;

        Ok(entries
            .into_iter()
            .map(|entry| FileChange {
                path: entry.filename,
            })
            .collect())
    }

    async fn get_pull_request(&self, pr_number: u64) -> ApiResult<PullRequest> {
        let response = self
            .http
            .get(self.url(&format!("pulls/{pr_number}")))
            .send()
            .await
            .map_err(send_error)?;

        let wire: PullRequestWire = expect_success(response)?
            .json()
            .await
            .map_err(|err| ApiError::NetworkOrAuth(format!("invalid pull request response: {err}")))?;

        Ok(wire.into())
    }

    async fn create_issue_comment(&self, issue_number: u64, body: &str) -> ApiResult<()> {
        let response = self
            .http
            .post(self.url(&format!("issues/{issue_number}/comments")))
            .json(&json!({ "body": body }))
            .send()
            .await
            .map_err(send_error)?;

        expect_success(response)?;
        Ok(())
    }

    async fn approve_workflow_run(&self, run_id: u64) -> ApiResult<()> {
        let response = self
            .http
            .post(self.url(&format!("actions/runs/{run_id}/approve")))
            .send()
            .await
            .map_err(send_error)?;

        expect_success(response)?;
        Ok(())
    }
}
