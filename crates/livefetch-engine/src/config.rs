//! Controller configuration.

use livefetch_core::errors::{FetchError, Result};
use livefetch_core::snapshot::SectionOrder;
use serde::{Deserialize, Serialize};

/// Default buffer size of the change feed
pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 64;

/// Tunables of a [`ResultsController`](crate::ResultsController)
///
/// ```toml
/// section_order = "descending"
/// notification_capacity = 128
/// ```
///
/// Missing keys take their defaults; unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    /// Order of sections in every snapshot
    pub section_order: SectionOrder,
    /// Number of change notifications buffered per subscriber before the
    /// slowest one starts lagging
    pub notification_capacity: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            section_order: SectionOrder::default(),
            notification_capacity: DEFAULT_NOTIFICATION_CAPACITY,
        }
    }
}

impl ControllerConfig {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the document does not parse or fails
    /// [`ControllerConfig::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| FetchError::InvalidInput {
            reason: format!("controller config: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `notification_capacity` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.notification_capacity == 0 {
            return Err(FetchError::InvalidInput {
                reason: "controller config: notification_capacity must be greater than 0"
                    .to_string(),
            });
        }
        Ok(())
    }
}
