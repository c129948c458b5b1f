// src/config/scoring.rs
use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::{env, fs, path::Path, path::PathBuf};
use tracing::warn;

use crate::export::DEFAULT_FILE_NAME;
use crate::scorecard::{Scorecard, DEFAULT_BASE_SCORE, DEFAULT_PDO};

pub const DEFAULT_SCORING_CONFIG_PATH: &str = "config/scoring.toml";
pub const ENV_SCORING_CONFIG_PATH: &str = "SCORING_CONFIG_PATH";
pub const ENV_BASE_SCORE: &str = "SCORING_BASE_SCORE";
pub const ENV_PDO: &str = "SCORING_PDO";

fn default_base_score() -> f64 {
    DEFAULT_BASE_SCORE
}
fn default_pdo() -> f64 {
    DEFAULT_PDO
}
fn default_rows() -> usize {
    5
}
fn default_min_rows() -> usize {
    2
}
fn default_max_rows() -> usize {
    200
}
fn default_file_name() -> String {
    DEFAULT_FILE_NAME.to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScorecardSection {
    #[serde(default = "default_base_score")]
    pub base_score: f64,
    /// Points to double the odds of non-default.
    #[serde(default = "default_pdo")]
    pub pdo: f64,
}

impl Default for ScorecardSection {
    fn default() -> Self {
        Self {
            base_score: default_base_score(),
            pdo: default_pdo(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchSection {
    /// Rows shown when the editor opens.
    #[serde(default = "default_rows")]
    pub default_rows: usize,
    #[serde(default = "default_min_rows")]
    pub min_rows: usize,
    /// Upper bound enforced on every batch request (HTML and JSON).
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

impl Default for BatchSection {
    fn default() -> Self {
        Self {
            default_rows: default_rows(),
            min_rows: default_min_rows(),
            max_rows: default_max_rows(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExportSection {
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub scorecard: ScorecardSection,
    #[serde(default)]
    pub batch: BatchSection,
    #[serde(default)]
    pub export: ExportSection,
}

impl ScoringConfig {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let mut cfg: ScoringConfig = toml::from_str(s).context("parsing scoring config")?;
        cfg.sanitize();
        Ok(cfg)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading scoring config from {}", path.display()))?;
        Self::from_toml_str(&data)
    }

    /// Load using env var + fallbacks, then apply env overrides:
    /// 1) $SCORING_CONFIG_PATH (must exist)
    /// 2) config/scoring.toml
    /// 3) built-in defaults
    pub fn load_default() -> anyhow::Result<Self> {
        let mut cfg = if let Ok(p) = env::var(ENV_SCORING_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!(
                    "{ENV_SCORING_CONFIG_PATH} points to non-existent path {}",
                    pb.display()
                ));
            }
            Self::load_from_file(&pb)?
        } else {
            let default_path = PathBuf::from(DEFAULT_SCORING_CONFIG_PATH);
            if default_path.exists() {
                Self::load_from_file(&default_path)?
            } else {
                Self::default()
            }
        };

        if let Some(v) = parse_f64_env(env::var(ENV_BASE_SCORE).ok()) {
            cfg.scorecard.base_score = v;
        }
        if let Some(v) = parse_f64_env(env::var(ENV_PDO).ok()) {
            cfg.scorecard.pdo = v;
        }
        cfg.sanitize();
        Ok(cfg)
    }

    /// Scorecard built from the (sanitized) parameters.
    pub fn scorecard(&self) -> Scorecard {
        Scorecard::new(self.scorecard.base_score, self.scorecard.pdo).unwrap_or_default()
    }

    /// Clamp a requested editor row count into the configured range.
    pub fn clamp_rows(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.batch.default_rows)
            .clamp(self.batch.min_rows, self.batch.max_rows)
    }

    fn sanitize(&mut self) {
        if !self.scorecard.base_score.is_finite() {
            warn!(value = self.scorecard.base_score, "invalid base_score, using default");
            self.scorecard.base_score = default_base_score();
        }
        if !(self.scorecard.pdo.is_finite() && self.scorecard.pdo > 0.0) {
            warn!(value = self.scorecard.pdo, "invalid pdo, using default");
            self.scorecard.pdo = default_pdo();
        }

        if self.batch.min_rows == 0 {
            self.batch.min_rows = 1;
        }
        if self.batch.min_rows > self.batch.max_rows {
            // swap to keep a valid interval
            std::mem::swap(&mut self.batch.min_rows, &mut self.batch.max_rows);
        }
        self.batch.default_rows = self
            .batch
            .default_rows
            .clamp(self.batch.min_rows, self.batch.max_rows);

        if self.export.file_name.trim().is_empty() {
            self.export.file_name = default_file_name();
        }
    }
}

fn parse_f64_env(raw: Option<String>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
}
