//! The closed set of generation capabilities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DispatchError;

/// A logical kind of generation request.
///
/// The set is closed: every capability must have a provider list in the
/// capability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Free text: chat replies, ad scripts.
    Script,
    Image,
    Voice,
    Music,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Capability; 4] = [
        Capability::Script,
        Capability::Image,
        Capability::Voice,
        Capability::Music,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Script => "script",
            Capability::Image => "image",
            Capability::Voice => "voice",
            Capability::Music => "music",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "script" => Ok(Capability::Script),
            "image" => Ok(Capability::Image),
            "voice" => Ok(Capability::Voice),
            "music" => Ok(Capability::Music),
            other => Err(DispatchError::UnknownCapability {
                name: other.to_string(),
            }),
        }
    }
}
