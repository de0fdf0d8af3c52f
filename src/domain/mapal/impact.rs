//! Impact levels for MAPAL score updates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

use super::MapalField;

/// How strongly one turn advanced a MAPAL dimension.
///
/// The model reports an impact label per dimension it addressed; the label
/// maps to a fixed point value added to the dimension (capped at the score
/// ceiling).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImpactLevel {
    None,
    Low,
    Medium,
    High,
    Quantum,
}

impl ImpactLevel {
    /// Point value this level adds to a dimension.
    pub fn points(&self) -> u8 {
        match self {
            ImpactLevel::None => 0,
            ImpactLevel::Low => 1,
            ImpactLevel::Medium => 2,
            ImpactLevel::High => 3,
            ImpactLevel::Quantum => 5,
        }
    }

    /// Wire label (`"NONE"`, `"LOW"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactLevel::None => "NONE",
            ImpactLevel::Low => "LOW",
            ImpactLevel::Medium => "MEDIUM",
            ImpactLevel::High => "HIGH",
            ImpactLevel::Quantum => "QUANTUM",
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImpactLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => Ok(ImpactLevel::None),
            "LOW" => Ok(ImpactLevel::Low),
            "MEDIUM" => Ok(ImpactLevel::Medium),
            "HIGH" => Ok(ImpactLevel::High),
            "QUANTUM" => Ok(ImpactLevel::Quantum),
            _ => Err(ValidationError::unrecognized("impact level", s)),
        }
    }
}

/// One requested score change, as reported by the model for a single turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    /// The dimension the turn addressed.
    pub field: MapalField,
    /// How strongly it was advanced.
    pub impact: ImpactLevel,
}

impl ScoreUpdate {
    /// Creates a new score update.
    pub fn new(field: MapalField, impact: ImpactLevel) -> Self {
        Self { field, impact }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_values_match_protocol() {
        assert_eq!(ImpactLevel::None.points(), 0);
        assert_eq!(ImpactLevel::Low.points(), 1);
        assert_eq!(ImpactLevel::Medium.points(), 2);
        assert_eq!(ImpactLevel::High.points(), 3);
        assert_eq!(ImpactLevel::Quantum.points(), 5);
    }

    #[test]
    fn serde_uses_uppercase_labels() {
        assert_eq!(
            serde_json::to_string(&ImpactLevel::Quantum).unwrap(),
            "\"QUANTUM\""
        );
        let parsed: ImpactLevel = serde_json::from_str("\"HIGH\"").unwrap();
        assert_eq!(parsed, ImpactLevel::High);
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!(ImpactLevel::from_str("medium").unwrap(), ImpactLevel::Medium);
        assert_eq!(ImpactLevel::from_str(" LOW ").unwrap(), ImpactLevel::Low);
    }

    #[test]
    fn from_str_rejects_unknown_labels() {
        assert!(ImpactLevel::from_str("MASSIVE").is_err());
    }

    #[test]
    fn score_update_serializes_with_wire_names() {
        let update = ScoreUpdate::new(MapalField::PensionPlanning, ImpactLevel::High);
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["field"], "pensionPlanning");
        assert_eq!(json["impact"], "HIGH");
    }
}
