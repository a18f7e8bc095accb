use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::eligibility::DEFAULT_PASS_THRESHOLD;
use crate::planner::Planner;
use crate::validation::GradeBounds;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grading: GradingConfig,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingConfig {
    #[serde(default = "default_min_grade")]
    pub min_grade: f64,
    #[serde(default = "default_max_grade")]
    pub max_grade: f64,
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    #[serde(default = "default_exhaustive_candidate_cap")]
    pub exhaustive_candidate_cap: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_decimals")]
    pub decimals: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub pass_threshold: Option<f64>,
    pub decimals: Option<usize>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/binary-pass/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        parsed
            .validate()
            .with_context(|| format!("invalid config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn validate(&self) -> Result<()> {
        let grading = &self.grading;
        if !grading.min_grade.is_finite() || !grading.max_grade.is_finite() {
            bail!("grade bounds must be finite");
        }
        if grading.min_grade > grading.max_grade {
            bail!(
                "min_grade {} is above max_grade {}",
                grading.min_grade,
                grading.max_grade
            );
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(threshold) = overrides.pass_threshold {
            self.grading.pass_threshold = threshold;
        }
        if let Some(decimals) = overrides.decimals {
            self.output.decimals = decimals;
        }
    }

    pub fn grade_bounds(&self) -> GradeBounds {
        GradeBounds {
            min: self.grading.min_grade,
            max: self.grading.max_grade,
        }
    }

    pub fn planner(&self) -> Planner {
        Planner::new(self.grade_bounds(), self.grading.pass_threshold)
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn default_template() -> String {
        let template = r#"[grading]
min_grade = 0.0
max_grade = 100.0
# courses graded at or above this may be converted to Pass/Fail
pass_threshold = 55.0

[optimizer]
# largest eligible-course count the `verify` command will enumerate
exhaustive_candidate_cap = 12

[output]
decimals = 2

[server]
host = "127.0.0.1"
port = 3001
"#;
        template.to_string()
    }
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            min_grade: default_min_grade(),
            max_grade: default_max_grade(),
            pass_threshold: default_pass_threshold(),
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            exhaustive_candidate_cap: default_exhaustive_candidate_cap(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            decimals: default_decimals(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_min_grade() -> f64 {
    GradeBounds::PERCENT.min
}

fn default_max_grade() -> f64 {
    GradeBounds::PERCENT.max
}

fn default_pass_threshold() -> f64 {
    DEFAULT_PASS_THRESHOLD
}

fn default_exhaustive_candidate_cap() -> usize {
    12
}

fn default_decimals() -> usize {
    2
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}
