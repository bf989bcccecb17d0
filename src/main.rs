use std::{
	io::{self, IsTerminal, Read, Write},
	path::{Path, PathBuf},
	process::ExitCode,
	sync::Arc,
};

use clap::{Args, CommandFactory, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, bail};
use serde::Serialize;
use todo_issues::{
	IssueTemplate, Priority, Status, SubmissionResult, SubmitOptions, Submitter,
	config::{AppConfig, EXE_NAME, RepoTarget},
	github::{BoxedGitHubClient, NewIssue, create_client, parse_issue_ref},
	logging,
	mock_github::{MOCK_STATE_ENV, MockGitHubClient},
};
use tracing::{debug, warn};

#[derive(Parser)]
#[command(author, version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"), about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
	/// Config file to use instead of `$XDG_CONFIG_HOME/todo-issues/config.toml`
	#[arg(long, global = true)]
	config: Option<PathBuf>,
	/// GitHub token, overrides the configured one and `GITHUB_TOKEN`
	#[arg(long, global = true)]
	token: Option<String>,
	/// Talk to an in-memory GitHub instead of the real API (seeded from $TODO_ISSUES_MOCK_STATE if set)
	#[arg(long, global = true)]
	mock: bool,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Create one issue from a prompt
	CreateIssue(CreateIssueArgs),
	/// Create several issues from a bullet list, numbered list, or blank-line separated paragraphs
	CreateIssues(CreateIssuesArgs),
	/// Show what a prompt would turn into, without talking to GitHub
	Parse(ParseArgs),
	/// Print a shell completion script
	Completions { shell: clap_complete::Shell },
}

/// Flags shared by both create commands
#[derive(Args)]
struct IssueFlags {
	/// Target repository, `owner/repo`. Falls back to `repo` from the config
	#[arg(long, short)]
	repo: Option<String>,
	/// Mark as in-progress instead of todo
	#[arg(long, short)]
	start: bool,
	/// Extra labels, comma separated
	#[arg(long, value_delimiter = ',')]
	labels: Vec<String>,
	#[arg(long = "assignee")]
	assignees: Vec<String>,
	#[arg(long)]
	milestone: Option<u64>,
	/// Don't search for and link related issues
	#[arg(long)]
	no_related: bool,
	/// Print what would be created, with configured defaults applied, and exit
	#[arg(long)]
	dry_run: bool,
}

#[derive(Args)]
struct CreateIssueArgs {
	prompt: String,
	#[clap(flatten)]
	flags: IssueFlags,
	/// Issue this one relates to: `12`, `#12` or an issue URL. Repeatable
	#[arg(long)]
	relates_to: Vec<String>,
	#[arg(long)]
	depends_on: Vec<String>,
	#[arg(long)]
	blocks: Vec<String>,
}

#[derive(Args)]
struct CreateIssuesArgs {
	/// Read the list from a file instead of stdin
	#[arg(long, short)]
	file: Option<PathBuf>,
	#[clap(flatten)]
	flags: IssueFlags,
	/// Stop at the first failed issue
	#[arg(long)]
	fail_fast: bool,
	/// Submit up to this many issues at once
	#[arg(long, short)]
	jobs: Option<usize>,
	/// Don't ask for confirmation
	#[arg(long, short)]
	yes: bool,
}

#[derive(Args)]
struct ParseArgs {
	/// Prompt text; read from --file or stdin when omitted
	prompt: Option<String>,
	#[arg(long, short)]
	file: Option<PathBuf>,
	/// Treat the input as a list of issues
	#[arg(long, short)]
	multiple: bool,
	#[arg(long, short)]
	start: bool,
	#[arg(long)]
	json: bool,
}

/// One template as shown by `parse --json`
#[derive(Serialize)]
struct Preview {
	priority: Priority,
	status: Status,
	#[serde(flatten)]
	issue: NewIssue,
}

impl From<&IssueTemplate> for Preview {
	fn from(t: &IssueTemplate) -> Self {
		Self {
			priority: t.priority,
			status: t.status,
			issue: NewIssue::from(t),
		}
	}
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
	color_eyre::install()?;
	logging::init()?;

	let Cli { config, token, mock, command } = Cli::parse();
	let load_config = || -> Result<AppConfig> {
		let mut app_config = AppConfig::load(config.as_deref())?;
		if token.is_some() {
			app_config.github_token = token.clone();
		}
		debug!(repo = ?app_config.repo, api_url = %app_config.api_url, "loaded config");
		Ok(app_config)
	};

	match command {
		Commands::CreateIssue(args) => {
			let config = load_config()?;
			create_issue(&cli_client(mock, &config)?, &config, args).await
		}
		Commands::CreateIssues(args) => {
			let config = load_config()?;
			create_issues(&cli_client(mock, &config)?, &config, args).await
		}
		Commands::Parse(args) => parse(&load_config()?, args),
		Commands::Completions { shell } => {
			clap_complete::generate(shell, &mut Cli::command(), EXE_NAME, &mut io::stdout());
			Ok(ExitCode::SUCCESS)
		}
	}
}

fn cli_client(mock: bool, config: &AppConfig) -> Result<BoxedGitHubClient> {
	if mock {
		let client = match std::env::var_os(MOCK_STATE_ENV) {
			Some(path) => MockGitHubClient::from_state_file(Path::new(&path))?,
			None => MockGitHubClient::new(),
		};
		return Ok(Arc::new(client));
	}
	if config.github_token.is_none() {
		warn!("no GitHub token configured, issue creation will be rejected by the API");
	}
	Ok(create_client(&config.api_url, config.github_token.clone()))
}

fn build_submitter(client: &BoxedGitHubClient, config: &AppConfig, repo: RepoTarget, flags: &IssueFlags, fail_fast: bool) -> Submitter {
	let mut options = SubmitOptions::from_config(config);
	options.find_related &= !flags.no_related;
	options.fail_fast = fail_fast;
	Submitter::new(client.clone(), repo, config.defaults.clone(), options)
}

fn apply_flags(template: &mut IssueTemplate, flags: &IssueFlags) {
	template.add_labels(&flags.labels);
	if !flags.assignees.is_empty() {
		template.assignees = flags.assignees.clone();
	}
	if flags.milestone.is_some() {
		template.milestone = flags.milestone;
	}
}

async fn create_issue(client: &BoxedGitHubClient, config: &AppConfig, args: CreateIssueArgs) -> Result<ExitCode> {
	let repo = config.repo_target(args.flags.repo.as_deref())?;
	let mut template = config.defaults.parser().parse_single(&args.prompt, args.flags.start)?;
	apply_flags(&mut template, &args.flags);
	for (refs, links) in [(&args.relates_to, &mut template.relates_to), (&args.depends_on, &mut template.depends_on), (&args.blocks, &mut template.blocks)] {
		for r in refs {
			links.push(parse_issue_ref(r, &repo)?);
		}
	}

	let submitter = build_submitter(client, config, repo, &args.flags, false);
	if args.flags.dry_run {
		submitter.apply_defaults(&mut template);
		print_preview(&template);
		return Ok(ExitCode::SUCCESS);
	}

	let title = template.title.clone();
	let result = submitter.submit_one(template).await;
	print_result(&title, &result);
	if let SubmissionResult::Created { url, .. } = &result {
		println!("  {url}");
	}
	Ok(if result.is_created() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn create_issues(client: &BoxedGitHubClient, config: &AppConfig, args: CreateIssuesArgs) -> Result<ExitCode> {
	let repo = config.repo_target(args.flags.repo.as_deref())?;
	let input = read_input(None, args.file.as_deref())?;
	let mut templates = config.defaults.parser().parse_multiple(&input, args.flags.start);
	if templates.is_empty() {
		bail!("No issues found in the input");
	}
	for template in &mut templates {
		apply_flags(template, &args.flags);
	}

	println!("Found {} issues to create in {repo}:", templates.len());
	for (i, t) in templates.iter().enumerate() {
		match t.priority {
			Priority::Medium => println!("  {}. {}", i + 1, t.title),
			p => println!("  {}. {} [{p}]", i + 1, t.title),
		}
	}

	if args.flags.dry_run {
		return Ok(ExitCode::SUCCESS);
	}
	if !args.yes {
		if !io::stdin().is_terminal() {
			bail!("Refusing to create issues without confirmation. Pass --yes when input is not a terminal");
		}
		if !confirm(&format!("Create {} issues?", templates.len()))? {
			println!("Aborted.");
			return Ok(ExitCode::SUCCESS);
		}
	}

	let titles: Vec<String> = templates.iter().map(|t| t.title.clone()).collect();
	let submitter = build_submitter(client, config, repo, &args.flags, args.fail_fast);
	let results = match args.jobs {
		Some(jobs) if jobs > 1 => {
			if args.fail_fast {
				warn!("--fail-fast has no effect together with --jobs");
			}
			submitter.submit_batch_concurrent(templates, jobs).await
		}
		_ => submitter.submit_batch(templates).await,
	};

	for (title, result) in titles.iter().zip(&results) {
		print_result(title, result);
	}
	for title in &titles[results.len()..] {
		println!("- Skipped: {title}");
	}
	let created = results.iter().filter(|r| r.is_created()).count();
	println!("\nCreated {created}/{} issues.", titles.len());

	Ok(if created == titles.len() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn parse(config: &AppConfig, args: ParseArgs) -> Result<ExitCode> {
	let input = read_input(args.prompt, args.file.as_deref())?;
	let parser = config.defaults.parser();
	let templates = if args.multiple {
		parser.parse_multiple(&input, args.start)
	} else {
		vec![parser.parse_single(&input, args.start)?]
	};

	if args.json {
		let previews: Vec<Preview> = templates.iter().map(Preview::from).collect();
		println!("{}", serde_json::to_string_pretty(&previews)?);
	} else {
		for (i, template) in templates.iter().enumerate() {
			if i > 0 {
				println!("\n---\n");
			}
			print_preview(template);
		}
	}
	Ok(ExitCode::SUCCESS)
}

fn print_result(title: &str, result: &SubmissionResult) {
	match result {
		SubmissionResult::Created { number, .. } => println!("✓ Created #{number}: {title}"),
		SubmissionResult::Failed { reason, .. } => println!("✗ Failed: {title}: {reason}"),
	}
}

fn print_preview(template: &IssueTemplate) {
	println!("Title: {}", template.title);
	println!("Priority: {}", template.priority);
	println!("Labels: {}", template.labels().into_iter().collect::<Vec<_>>().join(", "));
	if !template.assignees.is_empty() {
		println!("Assignees: {}", template.assignees.join(", "));
	}
	if let Some(milestone) = template.milestone {
		println!("Milestone: {milestone}");
	}
	let body = template.render_body();
	if !body.is_empty() {
		println!("\n{body}");
	}
}

/// Positional text if given, else the file, else all of stdin.
fn read_input(text: Option<String>, file: Option<&Path>) -> Result<String> {
	if let Some(text) = text {
		return Ok(text);
	}
	if let Some(path) = file {
		return std::fs::read_to_string(path).wrap_err_with(|| format!("Failed to read {}", path.display()));
	}
	let mut buf = String::new();
	io::stdin().read_to_string(&mut buf).wrap_err("Failed to read stdin")?;
	Ok(buf)
}

fn confirm(question: &str) -> Result<bool> {
	eprint!("{question} [y/N] ");
	io::stderr().flush()?;
	let mut answer = String::new();
	io::stdin().read_line(&mut answer)?;
	Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
