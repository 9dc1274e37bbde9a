use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::layout::TextBudget;
use crate::report::ReportConfig;

/// Application configuration loaded from environment variables.
/// Every variable is optional; unset ones fall back to the report defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// PNG or JPEG drawn at the top of the first page instead of the title.
    pub logo_path: Option<PathBuf>,
    pub report: ReportConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = ReportConfig::default();

        let report = ReportConfig {
            title: lookup("REPORT_TITLE").unwrap_or(defaults.title.clone()),
            platform_name: lookup("REPORT_PLATFORM_NAME")
                .unwrap_or(defaults.platform_name.clone()),
            image_timeout: Duration::from_millis(parse_or(
                &lookup,
                "IMAGE_TIMEOUT_MS",
                defaults.image_timeout.as_millis() as u64,
            )?),
            max_competitors: parse_or(&lookup, "MAX_COMPETITORS", defaults.max_competitors)?,
            title_budget: TextBudget {
                max_chars_per_line: parse_or(
                    &lookup,
                    "TITLE_MAX_CHARS",
                    defaults.title_budget.max_chars_per_line,
                )?,
                ..defaults.title_budget
            },
            detail_budget: TextBudget {
                max_chars_per_line: parse_or(
                    &lookup,
                    "DETAIL_MAX_CHARS",
                    defaults.detail_budget.max_chars_per_line,
                )?,
                ..defaults.detail_budget
            },
            badge_budget: TextBudget {
                max_chars_per_line: parse_or(
                    &lookup,
                    "BADGE_MAX_CHARS",
                    defaults.badge_budget.max_chars_per_line,
                )?,
                ..defaults.badge_budget
            },
            chart_max_height: parse_or(&lookup, "CHART_MAX_HEIGHT_MM", defaults.chart_max_height)?,
            ..defaults
        };
        report.validate().context("Invalid report configuration")?;

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            logo_path: lookup("LOGO_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            report,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
