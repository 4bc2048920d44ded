//! Download transfer strategy definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a download is handed to the transport.
///
/// Both strategies deliver the same file; they differ in whether real byte
/// progress can be observed while the transfer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStrategy {
    /// Stream the body ourselves and report byte-level progress (default).
    #[default]
    Tracked,
    /// Hand the URL off and show timer-driven progress.
    Navigational,
}

impl fmt::Display for TransferStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferStrategy::Tracked => write!(f, "tracked"),
            TransferStrategy::Navigational => write!(f, "navigational"),
        }
    }
}

impl FromStr for TransferStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tracked" => Ok(TransferStrategy::Tracked),
            "navigational" => Ok(TransferStrategy::Navigational),
            _ => Err(format!("Unknown transfer strategy: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_from_str() {
        assert_eq!(
            "Navigational".parse::<TransferStrategy>().unwrap(),
            TransferStrategy::Navigational
        );
        assert!("iframe".parse::<TransferStrategy>().is_err());
    }
}
