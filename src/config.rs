//! Container options.
//!
//! Options are fixed when the provider is built. They can be set in code,
//! read from the environment, or (with the `config` feature) parsed from JSON.

use std::env;
use std::str::FromStr;

use crate::error::{DiError, DiResult};

/// Default limit on nested resolutions in a single `get` call.
///
/// A chain this deep fits in a 2 MiB thread stack in debug builds.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Environment variable read by [`ContainerOptions::from_env`] for the duplicate policy.
pub const ENV_DUPLICATE_POLICY: &str = "FERROUS_INJECT_DUPLICATE_POLICY";
/// Environment variable read by [`ContainerOptions::from_env`] for the depth limit.
pub const ENV_MAX_DEPTH: &str = "FERROUS_INJECT_MAX_DEPTH";

/// What happens when the same service type is registered more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum DuplicatePolicy {
    /// The earliest registration is resolved; later ones are ignored.
    #[default]
    FirstWins,
    /// The latest registration is resolved.
    LastWins,
    /// `build()` fails with [`DiError::DuplicateRegistration`].
    Reject,
}

impl FromStr for DuplicatePolicy {
    type Err = DiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "first_wins" => Ok(DuplicatePolicy::FirstWins),
            "last_wins" => Ok(DuplicatePolicy::LastWins),
            "reject" => Ok(DuplicatePolicy::Reject),
            other => Err(DiError::InvalidOptions(format!("unknown duplicate policy '{}'", other))),
        }
    }
}

/// Options for a [`ServiceCollection`](crate::ServiceCollection).
///
/// # Examples
///
/// ```
/// use ferrous_inject::{ContainerOptions, DuplicatePolicy, ServiceCollection};
///
/// let options = ContainerOptions::default()
///     .with_duplicate_policy(DuplicatePolicy::Reject)
///     .with_max_depth(64);
///
/// let services = ServiceCollection::with_options(options);
/// assert_eq!(services.options().max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerOptions {
    pub duplicate_policy: DuplicatePolicy,
    pub max_depth: usize,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ContainerOptions {
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Reads options from the environment, falling back to defaults for unset variables.
    pub fn from_env() -> DiResult<Self> {
        let mut options = Self::default();
        if let Ok(policy) = env::var(ENV_DUPLICATE_POLICY) {
            options.duplicate_policy = policy.parse()?;
        }
        if let Ok(depth) = env::var(ENV_MAX_DEPTH) {
            options.max_depth = depth
                .trim()
                .parse()
                .map_err(|e| DiError::InvalidOptions(format!("{}: {}", ENV_MAX_DEPTH, e)))?;
        }
        options.validate()?;
        Ok(options)
    }

    /// Parses options from a JSON document; missing fields take their defaults.
    #[cfg(feature = "config")]
    pub fn from_json_str(json: &str) -> DiResult<Self> {
        let options: Self =
            serde_json::from_str(json).map_err(|e| DiError::InvalidOptions(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub(crate) fn validate(&self) -> DiResult<()> {
        if self.max_depth == 0 {
            return Err(DiError::InvalidOptions("max_depth must be greater than 0".to_string()));
        }
        Ok(())
    }
}
