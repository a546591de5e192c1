// Monitored source identity

use serde::{Deserialize, Serialize};
use std::fmt;

/// One monitored system instance; each has its own independent tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Host,
    Guest,
}

impl Source {
    pub const ALL: [Source; 2] = [Source::Host, Source::Guest];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Host => "host",
            Source::Guest => "guest",
        }
    }

    /// Parse from a route segment (e.g. "host", "Guest").
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "host" => Some(Source::Host),
            "guest" => Some(Source::Guest),
            _ => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
