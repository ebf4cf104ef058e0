// src/config/sources.rs
//! Typed career-source definitions, loaded once per run.
//!
//! Supported formats (picked by file extension): YAML (`.yaml`/`.yml`),
//! TOML (`.toml`) and JSON (`.json`). Every format carries a top-level
//! `sources` list.

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Which site-family parser handles a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserKind {
    Generic,
    BambooHr,
    Mbw,
    MusicWeek,
    Workday,
    /// No listing is parsed; the source page itself becomes one placeholder entry.
    PageOnly,
}

impl ParserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParserKind::Generic => "generic",
            ParserKind::BambooHr => "bamboohr",
            ParserKind::Mbw => "mbw",
            ParserKind::MusicWeek => "musicweek",
            ParserKind::Workday => "workday",
            ParserKind::PageOnly => "page_only",
        }
    }
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParserKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" => Ok(ParserKind::Generic),
            "bamboohr" => Ok(ParserKind::BambooHr),
            "mbw" => Ok(ParserKind::Mbw),
            "musicweek" => Ok(ParserKind::MusicWeek),
            "workday" => Ok(ParserKind::Workday),
            "page_only" => Ok(ParserKind::PageOnly),
            other => Err(anyhow!("unknown parser_type `{other}`")),
        }
    }
}

/// `junior_focus` runs the seniority classifier; any other value opts the source out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawSeniorityMode")]
pub enum SeniorityMode {
    #[default]
    JuniorFocus,
    /// Carries the configured value as text; empty for null.
    PassThrough(String),
}

impl From<String> for SeniorityMode {
    fn from(s: String) -> Self {
        if s.trim().eq_ignore_ascii_case("junior_focus") {
            SeniorityMode::JuniorFocus
        } else {
            SeniorityMode::PassThrough(s)
        }
    }
}

/// Whatever the config file holds for `seniority_mode`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSeniorityMode {
    Text(String),
    Flag(bool),
    Number(f64),
    Other(serde::de::IgnoredAny),
}

impl From<RawSeniorityMode> for SeniorityMode {
    fn from(raw: RawSeniorityMode) -> Self {
        match raw {
            RawSeniorityMode::Text(s) => s.into(),
            RawSeniorityMode::Flag(b) => SeniorityMode::PassThrough(b.to_string()),
            RawSeniorityMode::Number(n) => SeniorityMode::PassThrough(n.to_string()),
            RawSeniorityMode::Other(_) => SeniorityMode::PassThrough(String::new()),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_parser_type() -> String {
    ParserKind::PageOnly.as_str().to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_parser_type")]
    pub parser_type: String,
    #[serde(default)]
    pub default_country: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_true")]
    pub fetch_detail: bool,
    #[serde(default)]
    pub seniority_mode: SeniorityMode,
    #[serde(default = "default_true")]
    pub allow_senior_if_domain_match: bool,
    /// Lowercased at load time.
    #[serde(default)]
    pub include_patterns: Vec<String>,
    /// Lowercased at load time.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    #[serde(default)]
    pub location_hints: Vec<String>,
}

impl SourceConfig {
    /// A minimal source, mostly for tests and programmatic setups.
    pub fn new(id: &str, name: &str, parser: ParserKind, url: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            parser_type: parser.as_str().to_string(),
            default_country: String::new(),
            channel: String::new(),
            url: url.to_string(),
            fetch_detail: true,
            seniority_mode: SeniorityMode::JuniorFocus,
            allow_senior_if_domain_match: true,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            location_hints: Vec::new(),
        }
    }

    /// `None` for parser types this build does not know; the run loop skips those.
    pub fn parser_kind(&self) -> Option<ParserKind> {
        self.parser_type.parse().ok()
    }

    pub fn is_page_only(&self) -> bool {
        self.parser_kind() == Some(ParserKind::PageOnly)
    }

    pub fn junior_focus(&self) -> bool {
        self.seniority_mode == SeniorityMode::JuniorFocus
    }

    /// Detail pages are fetched unless the source opts out or is a page placeholder.
    pub fn should_fetch_details(&self) -> bool {
        self.fetch_detail && !self.is_page_only()
    }
}

#[derive(Debug, Deserialize)]
struct SourcesFile {
    #[serde(default)]
    sources: Vec<SourceConfig>,
}

/// Load and validate sources from `path`. Order is preserved.
pub fn load_sources_from(path: &Path) -> Result<Vec<SourceConfig>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading sources from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let sources = parse_sources(&content, ext.as_str())
        .with_context(|| format!("parsing sources in {}", path.display()))?;
    validate(sources)
}

fn parse_sources(s: &str, ext: &str) -> Result<Vec<SourceConfig>> {
    let file: SourcesFile = match ext {
        "toml" => toml::from_str(s)?,
        "json" => serde_json::from_str(s)?,
        "yaml" | "yml" | "" => serde_yaml::from_str(s)?,
        other => bail!("unsupported sources format `.{other}`"),
    };
    Ok(file.sources)
}

fn validate(mut sources: Vec<SourceConfig>) -> Result<Vec<SourceConfig>> {
    let mut ids = HashSet::new();
    for (i, src) in sources.iter_mut().enumerate() {
        src.id = src.id.trim().to_string();
        src.name = src.name.trim().to_string();
        src.url = src.url.trim().to_string();

        if src.id.is_empty() {
            bail!("source #{i}: missing `id`");
        }
        if src.name.is_empty() {
            bail!("source `{}`: missing `name`", src.id);
        }
        if src.url.is_empty() {
            bail!("source `{}`: missing `url`", src.id);
        }
        let parsed = url::Url::parse(&src.url)
            .with_context(|| format!("source `{}`: invalid url `{}`", src.id, src.url))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            bail!("source `{}`: url must be http(s)", src.id);
        }
        if !ids.insert(src.id.clone()) {
            bail!("duplicate source id `{}`", src.id);
        }

        src.include_patterns = clean_patterns(std::mem::take(&mut src.include_patterns));
        src.exclude_patterns = clean_patterns(std::mem::take(&mut src.exclude_patterns));
        src.location_hints = src
            .location_hints
            .drain(..)
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .collect();
    }
    Ok(sources)
}

fn clean_patterns(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}
