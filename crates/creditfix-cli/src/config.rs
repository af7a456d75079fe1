// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use creditfix_app::{RECENT_WINDOW_MONTHS, parse_report_date};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use time::Date;

pub const APP_NAME: &str = "creditfix";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_TICK: &str = "50ms";
const MAX_WINDOW_MONTHS: u32 = 120;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub report: Report,
    #[serde(default)]
    pub ui: Ui,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            report: Report::default(),
            ui: Ui::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Report {
    pub path: Option<String>,
    pub reference_date: Option<String>,
    pub recent_window_months: Option<u32>,
}

impl Default for Report {
    fn default() -> Self {
        Self {
            path: None,
            reference_date: None,
            recent_window_months: Some(RECENT_WINDOW_MONTHS),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub tick: Option<String>,
    pub start_expanded: Option<bool>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            tick: Some(DEFAULT_TICK.to_owned()),
            start_expanded: Some(false),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("CREDITFIX_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set CREDITFIX_CONFIG_PATH to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [report] and [ui]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(raw) = &self.report.reference_date
            && parse_report_date(raw).is_none()
        {
            bail!(
                "report.reference_date in {} must be YYYY-MM-DD, got {:?}",
                path.display(),
                raw
            );
        }

        if let Some(months) = self.report.recent_window_months
            && !(1..=MAX_WINDOW_MONTHS).contains(&months)
        {
            bail!(
                "report.recent_window_months in {} must be between 1 and {}, got {}",
                path.display(),
                MAX_WINDOW_MONTHS,
                months
            );
        }

        if let Some(tick) = &self.ui.tick {
            let parsed = parse_duration(tick)
                .with_context(|| format!("ui.tick in {}", path.display()))?;
            if parsed <= Duration::ZERO {
                bail!(
                    "ui.tick in {} must be positive, got {}",
                    path.display(),
                    tick
                );
            }
        }

        Ok(())
    }

    pub fn report_path(&self) -> Option<PathBuf> {
        self.report.path.as_deref().map(PathBuf::from)
    }

    pub fn reference_date(&self) -> Option<Date> {
        self.report
            .reference_date
            .as_deref()
            .and_then(parse_report_date)
    }

    pub fn recent_window_months(&self) -> u32 {
        self.report
            .recent_window_months
            .unwrap_or(RECENT_WINDOW_MONTHS)
    }

    pub fn tick(&self) -> Result<Duration> {
        parse_duration(self.ui.tick.as_deref().unwrap_or(DEFAULT_TICK))
    }

    pub fn start_expanded(&self) -> bool {
        self.ui.start_expanded.unwrap_or(false)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# creditfix config\n# Place this file at: {}\n\nversion = 1\n\n[report]\n# path = \"/absolute/path/to/report.json\"\n# Optional. Defaults to today (UTC).\n# reference_date = \"2025-06-18\"\nrecent_window_months = {}\n\n[ui]\ntick = \"{}\"\nstart_expanded = false\n",
            path.display(),
            RECENT_WINDOW_MONTHS,
            DEFAULT_TICK,
        )
    }
}

pub fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use <N>ms or <N>s (for example 50ms or 1s)")
}
