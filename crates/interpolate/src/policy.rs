use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParsePolicyError;

/// What to emit for a well-formed reference whose name is unbound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndefinedPolicy {
    /// Drop the reference entirely.
    #[default]
    Remove,
    /// Reproduce the reference exactly as written (`$NAME` or `${NAME}`).
    Preserve,
}

impl UndefinedPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Remove => "remove",
            Self::Preserve => "preserve",
        }
    }
}

impl fmt::Display for UndefinedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UndefinedPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("remove") {
            Ok(Self::Remove)
        } else if s.eq_ignore_ascii_case("preserve") {
            Ok(Self::Preserve)
        } else {
            Err(ParsePolicyError(s.to_string()))
        }
    }
}
