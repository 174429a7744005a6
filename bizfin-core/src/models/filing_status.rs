use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilingStatus {
    Single,
    MarriedJoint,
    MarriedSeparate,
    HeadOfHousehold,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 4] = [
        Self::Single,
        Self::MarriedJoint,
        Self::MarriedSeparate,
        Self::HeadOfHousehold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::MarriedJoint => "married-joint",
            Self::MarriedSeparate => "married-separate",
            Self::HeadOfHousehold => "head-of-household",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single" => Some(Self::Single),
            "married-joint" => Some(Self::MarriedJoint),
            "married-separate" => Some(Self::MarriedSeparate),
            "head-of-household" => Some(Self::HeadOfHousehold),
            _ => None,
        }
    }

    /// Permissive variant used where status strings enter from storage or
    /// user input: anything unrecognized resolves to single.
    pub fn parse_or_single(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            tracing::warn!(status = s, "unknown filing status; defaulting to single");
            Self::Single
        })
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_round_trips_every_status() {
        for status in FilingStatus::ALL {
            assert_eq!(FilingStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn parse_rejects_unknown_status() {
        assert_eq!(FilingStatus::parse("widowed"), None);
    }

    #[test]
    fn parse_or_single_defaults_unknown_status() {
        assert_eq!(
            FilingStatus::parse_or_single("widowed"),
            FilingStatus::Single
        );
    }
}
