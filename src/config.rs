#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Harness configuration.
//!
//! Defaults suit the common classroom setup: run leniently without the real
//! library and forward to it when present. Environment variables let a
//! grading pipeline override either without code changes.

use bon::Builder;
use serde::{Deserialize, Serialize};

/// What to do at setup when the real backing library is unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackingPolicy {
    /// Degrade to no-op proxies; every call answers the neutral default.
    #[default]
    Lenient,
    /// Fail test setup explicitly.
    Strict,
}

/// Configuration for one harness [`TestContext`](crate::harness::TestContext).
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Policy applied when no real backing namespace exists.
    #[builder(default)]
    backing_policy: BackingPolicy,
    /// Whether unscripted calls forward to the real callable.
    #[builder(default = true)]
    passthrough:    bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl HarnessConfig {
    /// Builds a configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// * `PROCTOR_STRICT_BACKING` - set to `1` or `true` to fail setup when
    ///   the real library is unavailable.
    /// * `PROCTOR_PASSTHROUGH` - set to `0` or `false` to answer unscripted
    ///   calls with the neutral default instead of the real implementation.
    pub fn from_env() -> Self {
        let backing_policy = if env_flag("PROCTOR_STRICT_BACKING").unwrap_or(false) {
            BackingPolicy::Strict
        } else {
            BackingPolicy::Lenient
        };
        let passthrough = env_flag("PROCTOR_PASSTHROUGH").unwrap_or(true);

        Self::builder()
            .backing_policy(backing_policy)
            .passthrough(passthrough)
            .build()
    }

    /// Policy applied when no real backing namespace exists.
    pub fn backing_policy(&self) -> BackingPolicy {
        self.backing_policy
    }

    /// Whether unscripted calls forward to the real callable.
    pub fn passthrough(&self) -> bool {
        self.passthrough
    }
}

/// Parses an environment variable as a boolean flag; `None` if unset or
/// unrecognised.
fn env_flag(name: &str) -> Option<bool> {
    match std::env::var(name).ok()?.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
