//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use citeset_core::config::MAX_TIMEOUT_SECS;

/// File configuration for citeset defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Default directory for summary files.
    pub output_dir: Option<PathBuf>,
    /// Default per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// User-Agent header override.
    pub user_agent: Option<String>,
    /// Agent name for robots.txt group matching.
    pub robots_agent: Option<String>,
    /// Article-source API endpoint.
    pub api_url: Option<String>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(timeout) = self.timeout_secs
            && !(1..=MAX_TIMEOUT_SECS).contains(&timeout)
        {
            bail!(
                "Invalid config value for `timeout_secs`: {timeout}. Expected range: 1..={MAX_TIMEOUT_SECS}"
            );
        }
        validate_non_empty("user_agent", self.user_agent.as_deref())?;
        validate_non_empty("robots_agent", self.robots_agent.as_deref())?;
        validate_non_empty("api_url", self.api_url.as_deref())?;
        Ok(())
    }
}

fn validate_non_empty(field: &str, value: Option<&str>) -> Result<()> {
    if value.is_some_and(|v| v.trim().is_empty()) {
        bail!("Invalid config value for `{field}`: must not be empty");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the tracing filter level for this mode.
    #[must_use]
    pub fn level(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Quiet => "error",
            Self::Debug => "trace",
        }
    }
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/citeset/config.toml`
/// 2. `$HOME/.config/citeset/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("citeset")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("citeset")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from the default path. A missing file yields the defaults.
pub fn load_default_file_config() -> Result<FileConfig> {
    match resolve_default_config_path() {
        Some(path) if path.exists() => load_file_config(&path),
        _ => Ok(FileConfig::default()),
    }
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let string_value = || {
            parse_string_literal(value)
                .with_context(|| format!("Invalid `{key}` value on line {line_no}"))
        };

        match key {
            "output_dir" => cfg.output_dir = Some(PathBuf::from(string_value()?)),
            "timeout_secs" => {
                let parsed = parse_integer_u64(value)
                    .with_context(|| format!("Invalid `timeout_secs` value on line {line_no}"))?;
                cfg.timeout_secs = Some(parsed);
            }
            "user_agent" => cfg.user_agent = Some(string_value()?),
            "robots_agent" => cfg.robots_agent = Some(string_value()?),
            "api_url" => cfg.api_url = Some(string_value()?),
            "verbosity" => {
                let parsed = string_value()?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_no}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = parse_config_str(
            r#"
timeout_secs = 10
verbosity = "verbose"
"#,
        )
        .expect("partial config should parse");
        assert_eq!(cfg.timeout_secs, Some(10));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Verbose));
        assert!(cfg.output_dir.is_none());
    }

    #[test]
    fn test_parse_config_all_fields() {
        let cfg = parse_config_str(
            r#"
output_dir = "/data/citations"
timeout_secs = 5
user_agent = "my-bot/1.0"
robots_agent = "my-bot"
api_url = "http://localhost:8080/w/api.php"
verbosity = "quiet"
"#,
        )
        .expect("full config should parse");
        assert_eq!(cfg.output_dir, Some(PathBuf::from("/data/citations")));
        assert_eq!(cfg.timeout_secs, Some(5));
        assert_eq!(cfg.user_agent.as_deref(), Some("my-bot/1.0"));
        assert_eq!(cfg.robots_agent.as_deref(), Some("my-bot"));
        assert_eq!(
            cfg.api_url.as_deref(),
            Some("http://localhost:8080/w/api.php")
        );
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Quiet));
    }

    #[test]
    fn test_parse_config_rejects_zero_timeout() {
        let err = parse_config_str("timeout_secs = 0").expect_err("invalid timeout expected");
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_parse_config_rejects_timeout_above_max() {
        let err = parse_config_str("timeout_secs = 31").expect_err("invalid timeout expected");
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_parse_config_rejects_numeric_values_with_trailing_tokens() {
        let err =
            parse_config_str("timeout_secs = 4 trailing").expect_err("expected trailing token error");
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_parse_config_rejects_unquoted_string() {
        let err = parse_config_str("user_agent = bot").expect_err("expected quoting error");
        assert!(err.to_string().contains("user_agent"));
    }

    #[test]
    fn test_parse_config_rejects_empty_api_url() {
        let err = parse_config_str(r#"api_url = """#).expect_err("empty api_url expected");
        assert!(err.to_string().contains("api_url"));
    }

    #[test]
    fn test_parse_config_supports_inline_comments() {
        let cfg = parse_config_str(
            r#"
timeout_secs = 4 # seconds
user_agent = "bot #1" # hash inside quotes is kept
"#,
        )
        .expect("config with comments should parse");
        assert_eq!(cfg.timeout_secs, Some(4));
        assert_eq!(cfg.user_agent.as_deref(), Some("bot #1"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_keys() {
        let err = parse_config_str("concurrency = 123").expect_err("unknown key error expected");
        assert!(err.to_string().contains("Unknown configuration key"));
        assert!(err.to_string().contains("concurrency"));
    }

    #[test]
    fn test_parse_config_rejects_missing_equals() {
        let err = parse_config_str("timeout_secs 4").expect_err("syntax error expected");
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_verbosity() {
        let err = parse_config_str(r#"verbosity = "loud""#).expect_err("invalid verbosity");
        assert!(err.to_string().contains("verbosity"));
    }

    #[test]
    fn test_verbosity_level() {
        assert_eq!(VerbositySetting::Default.level(), "info");
        assert_eq!(VerbositySetting::Verbose.level(), "debug");
        assert_eq!(VerbositySetting::Quiet.level(), "error");
        assert_eq!(VerbositySetting::Debug.level(), "trace");
    }

    #[test]
    fn test_load_file_config_reads_from_disk() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = 12\n").expect("write config");

        let cfg = load_file_config(&path).expect("config should load");
        assert_eq!(cfg.timeout_secs, Some(12));
    }

    #[test]
    fn test_load_file_config_reports_path_on_error() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "bogus = 1\n").expect("write config");

        let err = load_file_config(&path).expect_err("unknown key expected");
        assert!(err.to_string().contains("config.toml"));
    }
}
