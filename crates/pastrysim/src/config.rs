use anyhow::{Context, Result};
use pastry_routing::{ZeroEncoding, MAX_RADIX_EXPONENT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Experiment configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub nodes: NodeRange,
    /// Batches per node count, and trials per batch
    pub trials: usize,
    pub seed: u64,
    #[serde(default = "default_radix_exponents")]
    pub radix_exponents: Vec<u32>,
    /// How key 0 is written when node keys are encoded
    #[serde(default)]
    pub zero_encoding: ZeroEncoding,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Node counts to simulate: `lower`, `lower + step`, ... up to `upper`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRange {
    pub lower: usize,
    pub upper: usize,
    pub step: usize,
}

impl NodeRange {
    pub fn iter(&self) -> impl Iterator<Item = usize> {
        (self.lower..=self.upper).step_by(self.step.max(1))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.lower > self.upper
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

fn default_radix_exponents() -> Vec<u32> {
    (1..=MAX_RADIX_EXPONENT).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nodes: NodeRange {
                lower: 100,
                upper: 1000,
                step: 100,
            },
            trials: 10,
            seed: 42,
            radix_exponents: default_radix_exponents(),
            zero_encoding: ZeroEncoding::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            anyhow::bail!(
                "Configuration file not found: {}\nRun with --init to create a new configuration",
                config_path.display()
            );
        }

        let contents =
            fs::read_to_string(config_path).context("Failed to read configuration file")?;

        let config: Config =
            serde_yaml::from_str(&contents).context("Failed to parse configuration file")?;

        Ok(config)
    }

    /// Write the default configuration to `config_path`
    pub fn create_default(config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = config_path.unwrap_or_else(Self::default_config_path);

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let config = Config::default();
        let yaml = serde_yaml::to_string(&config)?;
        fs::write(&config_path, yaml)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;

        Ok(config)
    }

    /// Reject parameters the experiment cannot run with
    pub fn validate(&self) -> Result<()> {
        let nodes = &self.nodes;
        if nodes.lower < 2 {
            anyhow::bail!("Lower node bound must be at least 2, got {}", nodes.lower);
        }
        if nodes.upper < nodes.lower {
            anyhow::bail!(
                "Upper node bound {} is below lower bound {}",
                nodes.upper,
                nodes.lower
            );
        }
        if nodes.step == 0 {
            anyhow::bail!("Node count increment must be positive");
        }
        if self.trials < 2 {
            anyhow::bail!(
                "At least 2 trials are needed for a standard deviation, got {}",
                self.trials
            );
        }
        if self.radix_exponents.is_empty() {
            anyhow::bail!("No radix exponents configured");
        }
        if let Some(b) = self
            .radix_exponents
            .iter()
            .find(|&&b| b == 0 || b > MAX_RADIX_EXPONENT)
        {
            anyhow::bail!(
                "Radix exponent {} outside 1..={}",
                b,
                MAX_RADIX_EXPONENT
            );
        }
        Ok(())
    }

    pub fn default_config_path() -> PathBuf {
        PathBuf::from("pastrysim.yaml")
    }
}
