use std::sync::Arc;

use async_trait::async_trait;
use color_eyre::eyre::{Result, bail, eyre};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use crate::{config::RepoTarget, issue::IssueTemplate};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Payload of an issue creation request
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct NewIssue {
	pub title: String,
	pub body: String,
	pub labels: Vec<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub assignees: Vec<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub milestone: Option<u64>,
}

impl From<&IssueTemplate> for NewIssue {
	fn from(t: &IssueTemplate) -> Self {
		Self {
			title: t.title.clone(),
			body: t.render_body(),
			labels: t.labels().into_iter().collect(),
			assignees: t.assignees.clone(),
			milestone: t.milestone,
		}
	}
}

/// Response from GitHub when creating an issue
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CreatedIssue {
	pub number: u64,
	pub html_url: String,
}

/// One search result, in the order GitHub ranked it
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, derive_new::new)]
pub struct SearchHit {
	pub number: u64,
	pub title: String,
}

//==============================================================================
// GitHub Client Trait
//==============================================================================

/// The two remote capabilities issue creation needs.
/// Implemented by the real API client and by [`crate::mock_github::MockGitHubClient`].
#[async_trait]
pub trait GitHubClient: Send + Sync {
	/// Create a new issue
	async fn create_issue(&self, repo: &RepoTarget, issue: &NewIssue) -> Result<CreatedIssue>;

	/// Search issues of `repo`, ranked by GitHub's own relevance
	async fn search_issues(&self, repo: &RepoTarget, query: &str) -> Result<Vec<SearchHit>>;
}

//==============================================================================
// Real GitHub Client Implementation
//==============================================================================

/// Real GitHub API client that makes HTTP requests
pub struct RealGitHubClient {
	http_client: Client,
	api_url: String,
	github_token: Option<String>,
}

impl RealGitHubClient {
	/// `github_token` may be absent; GitHub then serves unauthenticated (read-mostly, low rate limit) requests.
	pub fn new(api_url: impl Into<String>, github_token: Option<String>) -> Self {
		Self {
			http_client: Client::new(),
			api_url: api_url.into().trim_end_matches('/').to_string(),
			github_token: github_token.filter(|t| !t.trim().is_empty()),
		}
	}

	fn with_headers(&self, req: RequestBuilder) -> RequestBuilder {
		let req = req.header("User-Agent", "Rust GitHub Client").header("Accept", "application/vnd.github+json");
		match &self.github_token {
			Some(token) => req.header("Authorization", format!("token {token}")),
			None => req,
		}
	}
}

#[async_trait]
impl GitHubClient for RealGitHubClient {
	async fn create_issue(&self, repo: &RepoTarget, issue: &NewIssue) -> Result<CreatedIssue> {
		let api_url = format!("{}/repos/{}/{}/issues", self.api_url, repo.owner, repo.repo);

		let res = self
			.with_headers(self.http_client.post(&api_url))
			.header("Content-Type", "application/json")
			.json(issue)
			.send()
			.await?;

		if !res.status().is_success() {
			let status = res.status();
			let body = res.text().await.unwrap_or_default();
			bail!("Failed to create issue: {status} - {body}");
		}

		let issue = res.json::<CreatedIssue>().await?;
		Ok(issue)
	}

	async fn search_issues(&self, repo: &RepoTarget, query: &str) -> Result<Vec<SearchHit>> {
		let q = format!("{query} repo:{}/{} is:issue", repo.owner, repo.repo);
		let api_url = format!("{}/search/issues?q={}&per_page=10", self.api_url, urlencoding::encode(&q));

		let res = self.with_headers(self.http_client.get(&api_url)).send().await?;

		if !res.status().is_success() {
			let status = res.status();
			let body = res.text().await.unwrap_or_default();
			bail!("Failed to search issues: {status} - {body}");
		}

		#[derive(Deserialize)]
		struct SearchResult {
			items: Vec<SearchHit>,
		}

		let result: SearchResult = res.json().await?;
		Ok(result.items)
	}
}

//==============================================================================
// Convenience type alias for boxed client
//==============================================================================

pub type BoxedGitHubClient = Arc<dyn GitHubClient>;

pub fn create_client(api_url: &str, github_token: Option<String>) -> BoxedGitHubClient {
	Arc::new(RealGitHubClient::new(api_url, github_token))
}

//==============================================================================
// Issue references (URL parsing, etc.) - These don't need the trait
//==============================================================================

/// Parse a GitHub issue URL and extract owner, repo, and issue number.
/// Supports formats like:
/// - https://github.com/owner/repo/issues/123
/// - github.com/owner/repo/issues/123
pub fn parse_github_issue_url(url: &str) -> Result<(String, String, u64)> {
	let url = url.trim();

	// Remove protocol prefix if present (https://, http://)
	let path = url.strip_prefix("https://").or_else(|| url.strip_prefix("http://")).unwrap_or(url);

	// Remove github.com prefix
	let path = path.strip_prefix("github.com/").ok_or_else(|| eyre!("URL must be a GitHub URL: {url}"))?;

	let parts: Vec<&str> = path.split('/').collect();

	if parts.len() < 4 || parts[2] != "issues" {
		bail!("Invalid GitHub issue URL format. Expected: https://github.com/owner/repo/issues/123");
	}

	let owner = parts[0].to_string();
	let repo = parts[1].to_string();
	let issue_number: u64 = parts[3].parse().map_err(|_| eyre!("Invalid issue number: {}", parts[3]))?;

	Ok((owner, repo, issue_number))
}

/// Check if a string looks like a GitHub issue URL specifically
pub fn is_github_issue_url(s: &str) -> bool {
	let s = s.trim();
	s.contains("github.com/") && s.contains("/issues/")
}

/// Resolve an issue reference given on the command line to an issue number in `repo`.
///
/// Accepts `123`, `#123`, or an issue URL. URLs pointing at another repository are rejected,
/// since a bare `#N` link in the body would point at the wrong issue.
pub fn parse_issue_ref(s: &str, repo: &RepoTarget) -> Result<u64> {
	let s = s.trim();
	if is_github_issue_url(s) {
		let (owner, name, number) = parse_github_issue_url(s)?;
		if !owner.eq_ignore_ascii_case(&repo.owner) || !name.eq_ignore_ascii_case(&repo.repo) {
			bail!("Issue {s} belongs to {owner}/{name}, not {repo}");
		}
		return Ok(number);
	}
	s.trim_start_matches('#').parse().map_err(|_| eyre!("Invalid issue reference: {s}. Expected 123, #123 or an issue URL"))
}
