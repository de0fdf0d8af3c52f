//! Advisor persona identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Identifier of one of the fixed advisor personas.
///
/// The set is closed: personas are defined once in the catalog and never
/// added at runtime. Wire names are the lowercase single-word ids the
/// model protocol uses (`"strategy"`, `"selfemployed"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisorId {
    /// Lead strategist and conversation entry point.
    Strategy,
    Budget,
    Mortgage,
    Investments,
    Pension,
    Risk,
    Behavior,
    SelfEmployed,
    Special,
    Data,
    Career,
    Meaning,
    Abundance,
    Young,
    AltInvest,
    Intergen,
    AltRetire,
    FutureSelf,
}

impl AdvisorId {
    /// All persona ids in catalog order.
    pub const ALL: [AdvisorId; 18] = [
        AdvisorId::Strategy,
        AdvisorId::Budget,
        AdvisorId::Mortgage,
        AdvisorId::Investments,
        AdvisorId::Pension,
        AdvisorId::Risk,
        AdvisorId::Behavior,
        AdvisorId::SelfEmployed,
        AdvisorId::Special,
        AdvisorId::Data,
        AdvisorId::Career,
        AdvisorId::Meaning,
        AdvisorId::Abundance,
        AdvisorId::Young,
        AdvisorId::AltInvest,
        AdvisorId::Intergen,
        AdvisorId::AltRetire,
        AdvisorId::FutureSelf,
    ];

    /// The advisor every new conversation starts with.
    pub const DEFAULT: AdvisorId = AdvisorId::Strategy;

    /// Returns the wire name of this id.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisorId::Strategy => "strategy",
            AdvisorId::Budget => "budget",
            AdvisorId::Mortgage => "mortgage",
            AdvisorId::Investments => "investments",
            AdvisorId::Pension => "pension",
            AdvisorId::Risk => "risk",
            AdvisorId::Behavior => "behavior",
            AdvisorId::SelfEmployed => "selfemployed",
            AdvisorId::Special => "special",
            AdvisorId::Data => "data",
            AdvisorId::Career => "career",
            AdvisorId::Meaning => "meaning",
            AdvisorId::Abundance => "abundance",
            AdvisorId::Young => "young",
            AdvisorId::AltInvest => "altinvest",
            AdvisorId::Intergen => "intergen",
            AdvisorId::AltRetire => "altretire",
            AdvisorId::FutureSelf => "futureself",
        }
    }
}

impl Default for AdvisorId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for AdvisorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdvisorId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| ValidationError::unrecognized("advisor id", s))
    }
}
