#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL_PATH: &str = "models/churn_model.json";
pub const DEFAULT_DECISION_THRESHOLD: f64 = 0.5;
pub const DEFAULT_RISK_BOUNDARIES: (f64, f64) = (0.3, 0.7);

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "churn-api")]
#[command(about = "HTTP service for telco customer churn prediction")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    pub model_path: String,

    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, default_value = "8000")]
    pub port: u16,

    #[arg(long, default_value = "0.5")]
    pub decision_threshold: f64,

    #[arg(long, value_delimiter = ',', default_values_t = [0.3, 0.7])]
    pub risk_boundaries: Vec<f64>,

    #[arg(long, help = "Load service configuration from a TOML file")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn model_path(&self) -> &str {
        &self.model_path
    }

    fn decision_threshold(&self) -> f64 {
        self.decision_threshold
    }

    fn risk_boundaries(&self) -> (f64, f64) {
        (self.risk_boundaries[0], self.risk_boundaries[1])
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("model_path", &self.model_path)?;
        validation::validate_non_empty_string("host", &self.host)?;
        validation::validate_positive_number("port", self.port as usize, 1)?;
        validation::validate_probability("decision_threshold", self.decision_threshold)?;

        if self.risk_boundaries.len() != 2 {
            return Err(crate::utils::error::ChurnError::InvalidConfigValueError {
                field: "risk_boundaries".to_string(),
                value: format!("{:?}", self.risk_boundaries),
                reason: "Expected exactly two comma-separated boundaries".to_string(),
            });
        }
        validation::validate_risk_boundaries(
            "risk_boundaries",
            self.risk_boundaries[0],
            self.risk_boundaries[1],
        )?;

        Ok(())
    }
}
