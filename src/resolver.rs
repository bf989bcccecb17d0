//! Related-issue discovery. Best-effort: it never fails, it only finds nothing.

use tracing::{debug, instrument, warn};

use crate::{config::RepoTarget, github::GitHubClient};

/// Default number of related issues linked to a new one.
pub const DEFAULT_RELATED_LIMIT: usize = 3;

/// Search query matching any of the keywords.
pub fn build_query(keywords: &[String]) -> String {
	keywords.join(" OR ")
}

/// Find up to `limit` existing issues related to `keywords`.
///
/// Searches once and keeps the first `limit` hits in the tracker's own relevance order.
/// No keywords means no search at all. A failed search is logged and yields an empty list.
#[instrument(skip(client, repo), fields(repo = %repo))]
pub async fn find_related(keywords: &[String], client: &dyn GitHubClient, repo: &RepoTarget, limit: usize) -> Vec<u64> {
	if keywords.is_empty() || limit == 0 {
		return Vec::new();
	}

	let query = build_query(keywords);
	match client.search_issues(repo, &query).await {
		Ok(hits) => {
			let related: Vec<u64> = hits.into_iter().take(limit).map(|hit| hit.number).collect();
			debug!(?related, "found related issues");
			related
		}
		Err(e) => {
			warn!(error = %e, %query, "related-issue search failed, continuing without links");
			Vec::new()
		}
	}
}
