//! Hyperparameter-grid profile selector.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Named hyperparameter-grid profile controlling cluster coarseness.
///
/// `Default` yields finer clusters, `Broad` coarser ones. Any other requested
/// value is an input error — there is deliberately no catch-all profile.
///
/// # Example
///
/// ```
/// use response_atlas_core::types::Granularity;
///
/// assert_eq!("default".parse::<Granularity>().unwrap(), Granularity::Default);
/// assert_eq!("broad".parse::<Granularity>().unwrap(), Granularity::Broad);
/// assert!("fine".parse::<Granularity>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Finer clusters: smaller min_cluster_size candidates.
    #[default]
    Default,
    /// Coarser clusters: larger min_cluster_size candidates.
    Broad,
}

impl Granularity {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Default => "default",
            Granularity::Broad => "broad",
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Granularity::Default),
            "broad" => Ok(Granularity::Broad),
            other => Err(InputError::UnsupportedGranularity {
                value: other.to_string(),
            }),
        }
    }
}
