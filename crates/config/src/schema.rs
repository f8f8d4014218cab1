use std::collections::BTreeMap;

use {
    envinterp_interpolate::UndefinedPolicy,
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvinterpConfig {
    /// Fallback for well-formed references to unbound names.
    pub undefined: UndefinedPolicy,

    /// Whether the process environment is consulted. Defaults to true.
    pub use_env: bool,

    /// Bindings that take precedence over the environment.
    pub vars: BTreeMap<String, String>,
}

impl Default for EnvinterpConfig {
    fn default() -> Self {
        Self {
            undefined: UndefinedPolicy::default(),
            use_env: true,
            vars: BTreeMap::new(),
        }
    }
}
