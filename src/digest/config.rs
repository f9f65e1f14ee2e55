use crate::digest::dates::date_pattern;
use crate::digest::retention::DEFAULT_RETENTION_DAYS;
use crate::error::NewsError;
use anyhow::Result;
use chrono::{DateTime, FixedOffset, Local, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Larger values overflow the deadline arithmetic inside the HTTP client.
pub const MAX_TIMEOUT_SECS: u64 = 3600;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a professional AI News Reporter. Deliver objective, insightful summaries with journalistic integrity. Structure reports using markdown: bold key terms, bullet points for lists, and tables for comparisons (e.g., model features, paper impacts). Always cite sources with hyperlinks. Focus on high-impact stories from the past 24 hours.";

pub const DEFAULT_USER_PROMPT: &str = "As a professional AI News Reporter, compile a daily briefing on AI/technology developments of the last 24 hours. Categorize into sections: Model Releases, Research Papers, Open-Source Projects. For each, use a markdown table with columns: Item, Summary (1-2 sentences), Key Impacts, Source Link. Limit to 4-6 items total. End with a forward-looking analysis paragraph.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchVariant {
    /// Summary text only, default live search.
    Simple,
    /// Date-bounded live search and a citation list stored with the entry.
    Rich,
}

impl FetchVariant {
    pub fn label(self) -> &'static str {
        match self {
            FetchVariant::Simple => "simple",
            FetchVariant::Rich => "rich",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "simple" => Some(FetchVariant::Simple),
            "rich" => Some(FetchVariant::Rich),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub variant: FetchVariant,
    pub system_prompt: String,
    pub user_prompt: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.x.ai/v1/chat/completions".to_string(),
            model: "grok-3".to_string(),
            temperature: 0.7,
            max_tokens: 3000,
            timeout_secs: 120,
            variant: FetchVariant::Simple,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            user_prompt: DEFAULT_USER_PROMPT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub mode: String,
    pub sources: Vec<String>,
    pub max_search_results: u32,
    pub lookback_hours: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: "auto".to_string(),
            sources: vec!["web".to_string(), "x".to_string()],
            max_search_results: 20,
            lookback_hours: 24,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub retention_days: u64,
    pub file_prefix: String,
    pub render_html: bool,
    pub timezone: Option<String>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            retention_days: DEFAULT_RETENTION_DAYS,
            file_prefix: "grok_news_summary".to_string(),
            render_html: true,
            timezone: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewsConfig {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub archive: ArchiveConfig,
}

impl NewsConfig {
    /// Current instant in the configured timezone, or system local time.
    pub fn now(&self) -> Result<DateTime<FixedOffset>> {
        match self.archive.timezone.as_deref() {
            Some(name) => {
                let tz = parse_timezone(name)?;
                Ok(Utc::now().with_timezone(&tz).fixed_offset())
            }
            None => Ok(Local::now().fixed_offset()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialNewsConfig {
    api: Option<ApiConfig>,
    search: Option<SearchConfig>,
    archive: Option<ArchiveConfig>,
}

fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| invalid(format!("unknown timezone `{name}`")))
}

fn env_or_f64(var: &str, fallback: f64) -> f64 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<f64>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_u64(var: &str, fallback: u64) -> u64 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u64>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_u32(var: &str, fallback: u32) -> u32 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u32>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_bool(var: &str, fallback: bool) -> bool {
    match env::var(var) {
        Ok(v) => match v.trim() {
            "1" | "true" | "TRUE" | "yes" | "on" => true,
            "0" | "false" | "FALSE" | "no" | "off" => false,
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn env_or_csv(var: &str, fallback: &[String]) -> Vec<String> {
    match env::var(var) {
        Ok(v) => {
            let out = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>();
            if out.is_empty() {
                fallback.to_vec()
            } else {
                out
            }
        }
        Err(_) => fallback.to_vec(),
    }
}

fn invalid(msg: impl Into<String>) -> anyhow::Error {
    NewsError::InvalidConfig(msg.into()).into()
}

/// The prefix becomes the head of every entry identifier, so it must stay a
/// plain file name and must not carry a date of its own.
fn validate_file_prefix(prefix: &str) -> Result<()> {
    if prefix.trim().is_empty() {
        return Err(invalid("file_prefix cannot be empty"));
    }
    if prefix.contains(['/', '\\']) || prefix.contains("..") {
        return Err(invalid(format!(
            "file_prefix `{prefix}` must be a plain file name"
        )));
    }
    if date_pattern().is_match(prefix) {
        return Err(invalid(format!(
            "file_prefix `{prefix}` must not contain a YYYY-MM-DD date"
        )));
    }
    Ok(())
}

pub fn validate(cfg: &NewsConfig) -> Result<()> {
    if !(0.0..=2.0).contains(&cfg.api.temperature) {
        return Err(invalid("temperature must be within 0.0..=2.0"));
    }
    if cfg.api.max_tokens == 0 {
        return Err(invalid("max_tokens must be >= 1"));
    }
    if !(1..=MAX_TIMEOUT_SECS).contains(&cfg.api.timeout_secs) {
        return Err(invalid(format!(
            "timeout_secs must be within 1..={MAX_TIMEOUT_SECS}"
        )));
    }
    if cfg.api.endpoint.trim().is_empty() {
        return Err(invalid("api endpoint cannot be empty"));
    }
    if cfg.search.sources.is_empty() {
        return Err(invalid("search sources cannot be empty"));
    }
    if cfg.archive.retention_days == 0 {
        return Err(invalid("retention_days must be >= 1"));
    }
    validate_file_prefix(&cfg.archive.file_prefix)?;
    if let Some(name) = cfg.archive.timezone.as_deref() {
        parse_timezone(name)?;
    }
    Ok(())
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(custom) = env::var("NEWS_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let home = dirs::home_dir()?;
    Some(home.join(".news-digest").join("config.toml"))
}

fn merge_toml(base: &mut NewsConfig, raw: &str, origin: &str) -> Result<()> {
    let parsed: PartialNewsConfig = toml::from_str(raw)
        .map_err(|err| invalid(format!("failed to parse {origin}: {err}")))?;
    if let Some(api) = parsed.api {
        base.api = api;
    }
    if let Some(search) = parsed.search {
        base.search = search;
    }
    if let Some(archive) = parsed.archive {
        base.archive = archive;
    }
    Ok(())
}

fn merge_file_config(base: &mut NewsConfig) -> Result<()> {
    let Some(path) = resolve_config_path() else {
        return Ok(());
    };
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&path)
        .map_err(|err| invalid(format!("failed to read {}: {err}", path.display())))?;
    merge_toml(base, &raw, &path.display().to_string())
}

fn apply_env_overrides(cfg: &mut NewsConfig) -> Result<()> {
    cfg.api.endpoint = env_or_string("NEWS_API_ENDPOINT", &cfg.api.endpoint);
    cfg.api.model = env_or_string("NEWS_MODEL", &cfg.api.model);
    cfg.api.temperature = env_or_f64("NEWS_TEMPERATURE", cfg.api.temperature);
    cfg.api.max_tokens = env_or_u32("NEWS_MAX_TOKENS", cfg.api.max_tokens);
    cfg.api.timeout_secs = env_or_u64("NEWS_TIMEOUT_SECS", cfg.api.timeout_secs);
    if let Ok(raw) = env::var("NEWS_VARIANT")
        && !raw.trim().is_empty()
    {
        cfg.api.variant = FetchVariant::parse(&raw)
            .ok_or_else(|| invalid(format!("unknown variant `{raw}`; use `simple` or `rich`")))?;
    }

    cfg.search.mode = env_or_string("NEWS_SEARCH_MODE", &cfg.search.mode);
    cfg.search.sources = env_or_csv("NEWS_SEARCH_SOURCES", &cfg.search.sources);
    cfg.search.max_search_results =
        env_or_u32("NEWS_MAX_SEARCH_RESULTS", cfg.search.max_search_results);
    cfg.search.lookback_hours = env_or_u64("NEWS_LOOKBACK_HOURS", cfg.search.lookback_hours);

    cfg.archive.retention_days = env_or_u64("NEWS_RETENTION_DAYS", cfg.archive.retention_days);
    cfg.archive.file_prefix = env_or_string("NEWS_FILE_PREFIX", &cfg.archive.file_prefix);
    cfg.archive.render_html = env_or_bool("NEWS_RENDER_HTML", cfg.archive.render_html);
    if let Ok(raw) = env::var("NEWS_TIMEZONE")
        && !raw.trim().is_empty()
    {
        cfg.archive.timezone = Some(raw.trim().to_string());
    }
    Ok(())
}

pub fn load_config() -> Result<NewsConfig> {
    let mut cfg = NewsConfig::default();
    merge_file_config(&mut cfg)?;
    apply_env_overrides(&mut cfg)?;
    validate(&cfg)?;
    Ok(cfg)
}

pub fn require_api_key() -> Result<String> {
    match env::var("XAI_API_KEY") {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(NewsError::MissingApiKey.into()),
    }
}
