//! # Run Configuration
//!
//! Flags, environment variables and an optional `.env` file (loaded in
//! `main` before parsing) are merged by clap: a flag wins over its
//! environment variable, which wins over the default. [`SyncArgs::resolve`]
//! then checks every value and produces the immutable [`SyncConfig`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, ValueEnum};
use zeroize::Zeroizing;

use teamsync_core::FilterRuleSet;
use teamsync_engine::RunSettings;
use teamsync_github::{GithubApiConfig, RetryPolicy};

/// Keep one GitHub team's membership equal to the organization's members,
/// minus whoever the user filters reject.
///
/// Runs in dry-run mode unless `--dry-run false` (or `DRY_RUN=false`) is given.
#[derive(Parser, Debug)]
#[command(name = "teamsync", version, about, long_about = None)]
pub struct SyncArgs {
    /// GitHub token with `admin:org` scope. Falls back to `GITHUB_TOKEN`.
    #[arg(long, env = "PAT", hide_env_values = true)]
    pub token: Option<Secret>,

    /// Organization login.
    #[arg(long, env = "ORG")]
    pub org: Option<String>,

    /// Name (or slug) of the team to reconcile.
    #[arg(long, env = "TEAM_NAME")]
    pub team: Option<String>,

    /// `false`/`no` applies changes; anything else is a dry run.
    #[arg(long, env = "DRY_RUN", default_value = "true")]
    pub dry_run: String,

    /// REST API root, e.g. `https://github.example.com/api/v3`.
    #[arg(long, env = "API_URL", default_value = teamsync_github::config::DEFAULT_API_URL)]
    pub api_url: String,

    /// Filter document as JSON: `{"<field>": {"reject": [...], "allow": [...]}}`.
    #[arg(long, env = "USER_FILTERS", default_value = "[]")]
    pub filters: String,

    /// Filter document file (JSON, or YAML for `.yaml`/`.yml`). Overrides `--filters`.
    #[arg(long, env = "USER_FILTERS_FILE")]
    pub filters_file: Option<PathBuf>,

    /// Seconds to wait between consecutive GitHub API calls.
    #[arg(long, env = "DELAY", default_value_t = 3.0)]
    pub delay: f64,

    /// Log threshold: 10/20/30/40/50 or trace/debug/info/warn/error.
    #[arg(long, env = "LOG_LEVEL", default_value = "20")]
    pub log_level: String,

    /// More verbose output. Repeat for more (-v, -vv).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Create the team when it does not exist.
    #[arg(
        long,
        env = "CREATE_TEAM",
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        hide = true
    )]
    pub create_team: bool,

    /// Fail instead of creating a missing team.
    #[arg(long)]
    pub no_create_team: bool,

    /// Retries per API call for rate limits and transient failures.
    #[arg(long, env = "MAX_RETRIES", default_value_t = 3)]
    pub max_retries: u32,

    /// Report format on stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

/// Report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// A credential read from the command line or environment.
///
/// Zeroed on drop and redacted in `Debug`.
#[derive(Clone)]
pub struct Secret(Zeroizing<String>);

impl Secret {
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(Zeroizing::new(value))
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Everything a run needs, checked.
#[derive(Debug)]
pub struct SyncConfig {
    pub github: GithubApiConfig,
    pub settings: RunSettings,
    pub output: OutputFormat,
}

impl SyncArgs {
    /// Validate the arguments. `github_token` is the `GITHUB_TOKEN`
    /// fallback used when no `--token`/`PAT` is given.
    pub fn resolve(self, github_token: Option<String>) -> Result<SyncConfig> {
        let token = match (self.token, github_token) {
            (Some(token), _) if !token.expose().trim().is_empty() => token,
            (_, Some(token)) if !token.trim().is_empty() => Secret::from(token),
            _ => bail!("a GitHub token is required (--token, PAT or GITHUB_TOKEN)"),
        };
        let org = required(self.org, "organization (--org or ORG)")?;
        let team = required(self.team, "team name (--team or TEAM_NAME)")?;
        let delay = parse_delay(self.delay)?;

        let rules = match &self.filters_file {
            Some(path) => load_filter_file(path)?,
            None => FilterRuleSet::from_json_str(&self.filters).context("invalid USER_FILTERS")?,
        };

        // Retries count against the same call budget as the pass itself.
        let retry = RetryPolicy {
            max_retries: self.max_retries,
            ..RetryPolicy::default()
        }
        .with_min_delay(delay);
        let github = GithubApiConfig::new(&self.api_url, token.expose())
            .context("invalid GitHub API configuration")?
            .with_retry(retry);

        Ok(SyncConfig {
            github,
            settings: RunSettings {
                org,
                team,
                rules,
                dry_run: parse_dry_run(&self.dry_run),
                delay,
                create_team: self.create_team && !self.no_create_team,
            },
            output: self.output,
        })
    }
}

fn required(value: Option<String>, what: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => bail!("missing {what}"),
    }
}

/// `true`/`yes` and anything unrecognised mean dry run; only `false`/`no`
/// (any case) mean live.
pub fn parse_dry_run(raw: &str) -> bool {
    !matches!(raw.trim().to_ascii_lowercase().as_str(), "false" | "no")
}

/// Seconds to a [`Duration`]; negative, NaN and infinite values are rejected.
pub fn parse_delay(seconds: f64) -> Result<Duration> {
    if !seconds.is_finite() || seconds < 0.0 {
        bail!("DELAY must be a finite, non-negative number of seconds (got {seconds})");
    }
    Ok(Duration::from_secs_f64(seconds))
}

/// Read a filter document from disk. `.yaml`/`.yml` files are parsed as
/// YAML, anything else as JSON.
pub fn load_filter_file(path: &Path) -> Result<FilterRuleSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read filter file {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    let document: serde_json::Value = if is_yaml {
        serde_yaml::from_str(&content).with_context(|| format!("invalid YAML in {}", path.display()))?
    } else {
        serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))?
    };
    FilterRuleSet::from_value(document).with_context(|| format!("invalid filter document {}", path.display()))
}
