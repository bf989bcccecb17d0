use std::{fmt, path::Path, str::FromStr};

use color_eyre::eyre::{Result, WrapErr, eyre};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

use crate::{
	github::DEFAULT_API_URL,
	issue::{DEFAULT_CHECKLIST, DEFAULT_MAX_KEYWORDS, IssueParser},
	resolver::DEFAULT_RELATED_LIMIT,
};

pub static EXE_NAME: &str = "todo-issues";
const ENV_PREFIX: &str = "TODO_ISSUES";

/// Repository issues are created in, written `owner/repo`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct RepoTarget {
	pub owner: String,
	pub repo: String,
}

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
#[error("invalid repository '{0}', expected the form owner/repo")]
pub struct RepoTargetError(String);

impl FromStr for RepoTarget {
	type Err = RepoTargetError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		let path = s.strip_prefix("https://github.com/").or_else(|| s.strip_prefix("github.com/")).unwrap_or(s);
		let path = path.trim_end_matches('/');
		let path = path.strip_suffix(".git").unwrap_or(path);
		match path.split_once('/') {
			Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => Ok(Self {
				owner: owner.to_string(),
				repo: repo.to_string(),
			}),
			_ => Err(RepoTargetError(s.to_string())),
		}
	}
}

impl fmt::Display for RepoTarget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.owner, self.repo)
	}
}

/// Values applied to every template at submission time.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct IssueDefaults {
	/// Used when a template has no assignees of its own
	pub assignees: Vec<String>,
	/// Merged into every template's labels
	pub labels: Vec<String>,
	/// Replaces the built-in checklist when set
	pub checklist: Option<Vec<String>>,
}

impl IssueDefaults {
	/// Parser producing templates with the configured (or built-in) checklist.
	pub fn parser(&self) -> IssueParser {
		match &self.checklist {
			Some(checklist) => IssueParser::with_checklist(checklist.iter().cloned()),
			None => IssueParser::with_checklist(DEFAULT_CHECKLIST.iter().copied()),
		}
	}
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, SmartDefault)]
#[serde(default)]
pub struct RelatedSettings {
	#[default(true)]
	pub enabled: bool,
	/// How many search results get linked
	#[default(DEFAULT_RELATED_LIMIT)]
	pub limit: usize,
	/// How many keywords go into the search query
	#[default(DEFAULT_MAX_KEYWORDS)]
	pub max_keywords: usize,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, SmartDefault)]
#[serde(default)]
pub struct AppConfig {
	pub github_token: Option<String>,
	/// Default target repository, `owner/repo`
	pub repo: Option<String>,
	#[default(DEFAULT_API_URL.to_string())]
	pub api_url: String,
	pub defaults: IssueDefaults,
	pub related: RelatedSettings,
}

impl AppConfig {
	/// Load configuration, lowest precedence first:
	/// built-in defaults, the TOML file (`path`, else `$XDG_CONFIG_HOME/todo-issues/config.toml` if present),
	/// `TODO_ISSUES__*` environment variables, and `GITHUB_TOKEN` when no token is configured.
	pub fn load(path: Option<&Path>) -> Result<Self> {
		let mut builder = config::Config::builder();

		match path {
			Some(path) => {
				builder = builder.add_source(config::File::from(path.to_path_buf()).required(true));
			}
			None =>
				if let Some(default_path) = xdg::BaseDirectories::with_prefix(EXE_NAME).find_config_file("config.toml") {
					tracing::debug!(path = %default_path.display(), "using config file");
					builder = builder.add_source(config::File::from(default_path).required(false));
				},
		}

		let settings = builder
			.add_source(config::Environment::with_prefix(ENV_PREFIX).prefix_separator("__").separator("__").try_parsing(true))
			.build()
			.wrap_err("Failed to read configuration")?;

		let mut app_config: AppConfig = settings
			.try_deserialize()
			.wrap_err("The config file is not correctly formatted TOML\nand/or\n has fields of the wrong type")?;

		if app_config.github_token.is_none() {
			app_config.github_token = std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
		}
		url::Url::parse(&app_config.api_url).wrap_err_with(|| format!("`api_url` is not a valid URL: {}", app_config.api_url))?;
		Ok(app_config)
	}

	/// Repository from the command line, falling back to the configured one.
	pub fn repo_target(&self, cli_repo: Option<&str>) -> Result<RepoTarget> {
		let raw = cli_repo
			.or(self.repo.as_deref())
			.ok_or_else(|| eyre!("No repository given. Pass --repo owner/repo or set `repo` in the config file"))?;
		Ok(raw.parse::<RepoTarget>()?)
	}
}
