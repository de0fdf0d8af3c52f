//! The fourteen MAPAL score dimensions.
//!
//! MAPAL is the financial-readiness index tracked across a conversation.
//! Each dimension carries a fixed weight used for the derived readiness
//! percentage, a display label, and a fixed improvement recommendation
//! surfaced for the weakest dimensions in the rendered scoreboard.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// One dimension of the MAPAL readiness index.
///
/// Wire names are the camelCase keys of the model protocol
/// (`"financialFoundations"`, `"pensionPlanning"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MapalField {
    FinancialFoundations,
    BehaviorAndHabits,
    PensionPlanning,
    AssetDiversification,
    AlternativeInvestments,
    MortgageOptimization,
    LegalAndInsurance,
    IncomeGrowth,
    SpecialSituationsResilience,
    DataBasedManagement,
    ResourceLifeQualityBalance,
    AbundanceMindset,
    IntergenerationalTransfer,
    RetirementAlternatives,
}

impl MapalField {
    /// All dimensions in canonical (scoreboard) order.
    pub const ALL: [MapalField; 14] = [
        MapalField::FinancialFoundations,
        MapalField::BehaviorAndHabits,
        MapalField::PensionPlanning,
        MapalField::AssetDiversification,
        MapalField::AlternativeInvestments,
        MapalField::MortgageOptimization,
        MapalField::LegalAndInsurance,
        MapalField::IncomeGrowth,
        MapalField::SpecialSituationsResilience,
        MapalField::DataBasedManagement,
        MapalField::ResourceLifeQualityBalance,
        MapalField::AbundanceMindset,
        MapalField::IntergenerationalTransfer,
        MapalField::RetirementAlternatives,
    ];

    /// Readiness weight of this dimension. Weights sum to 110.
    pub fn weight(&self) -> u32 {
        match self {
            MapalField::FinancialFoundations => 12,
            MapalField::BehaviorAndHabits => 8,
            MapalField::PensionPlanning => 15,
            MapalField::AssetDiversification => 15,
            MapalField::AlternativeInvestments => 5,
            MapalField::MortgageOptimization => 8,
            MapalField::LegalAndInsurance => 7,
            MapalField::IncomeGrowth => 7,
            MapalField::SpecialSituationsResilience => 8,
            MapalField::DataBasedManagement => 5,
            MapalField::ResourceLifeQualityBalance => 6,
            MapalField::AbundanceMindset => 6,
            MapalField::IntergenerationalTransfer => 4,
            MapalField::RetirementAlternatives => 4,
        }
    }

    /// Wire name of this dimension.
    pub fn as_str(&self) -> &'static str {
        match self {
            MapalField::FinancialFoundations => "financialFoundations",
            MapalField::BehaviorAndHabits => "behaviorAndHabits",
            MapalField::PensionPlanning => "pensionPlanning",
            MapalField::AssetDiversification => "assetDiversification",
            MapalField::AlternativeInvestments => "alternativeInvestments",
            MapalField::MortgageOptimization => "mortgageOptimization",
            MapalField::LegalAndInsurance => "legalAndInsurance",
            MapalField::IncomeGrowth => "incomeGrowth",
            MapalField::SpecialSituationsResilience => "specialSituationsResilience",
            MapalField::DataBasedManagement => "dataBasedManagement",
            MapalField::ResourceLifeQualityBalance => "resourceLifeQualityBalance",
            MapalField::AbundanceMindset => "abundanceMindset",
            MapalField::IntergenerationalTransfer => "intergenerationalTransfer",
            MapalField::RetirementAlternatives => "retirementAlternatives",
        }
    }

    /// Human-readable label for scoreboards.
    pub fn label(&self) -> &'static str {
        match self {
            MapalField::FinancialFoundations => "Financial foundations",
            MapalField::BehaviorAndHabits => "Behavior and habits",
            MapalField::PensionPlanning => "Pension planning",
            MapalField::AssetDiversification => "Asset diversification",
            MapalField::AlternativeInvestments => "Alternative investments",
            MapalField::MortgageOptimization => "Mortgage and real estate",
            MapalField::LegalAndInsurance => "Legal and insurance readiness",
            MapalField::IncomeGrowth => "Income sources and growth",
            MapalField::SpecialSituationsResilience => "Resilience in special situations",
            MapalField::DataBasedManagement => "Data-driven management",
            MapalField::ResourceLifeQualityBalance => "Resources vs. quality of life",
            MapalField::AbundanceMindset => "Abundance mindset",
            MapalField::IntergenerationalTransfer => "Intergenerational transfer",
            MapalField::RetirementAlternatives => "Retirement alternatives",
        }
    }

    /// Short description of what the dimension covers, used when the model
    /// is told which dimensions it may update.
    pub fn focus(&self) -> &'static str {
        match self {
            MapalField::FinancialFoundations => "foundations, budget, monthly cash flow",
            MapalField::BehaviorAndHabits => "habits, spending patterns, money psychology",
            MapalField::PensionPlanning => "pension, study funds, retirement savings",
            MapalField::AssetDiversification => "investments, long-term savings, portfolio mix",
            MapalField::AlternativeInvestments => "crypto, startups, innovative investments",
            MapalField::MortgageOptimization => "mortgage, real estate, loan refinancing",
            MapalField::LegalAndInsurance => "insurance, risk management, self-employment cover",
            MapalField::IncomeGrowth => "career, raising income, personal branding",
            MapalField::SpecialSituationsResilience => "divorce, bereavement, crisis, complex situations",
            MapalField::DataBasedManagement => "data analysis, tracking, reports",
            MapalField::ResourceLifeQualityBalance => "life-money balance, life goals",
            MapalField::AbundanceMindset => "abundance mindset, limiting beliefs, mental blocks",
            MapalField::IntergenerationalTransfer => "inheritance, family business, transferring assets",
            MapalField::RetirementAlternatives => "early retirement, FIRE, sabbaticals",
        }
    }

    /// Fixed next-step recommendation shown for weak dimensions.
    pub fn recommendation(&self) -> &'static str {
        match self {
            MapalField::FinancialFoundations => "Review the monthly budget and grow the emergency fund to 6 months",
            MapalField::BehaviorAndHabits => "Set up automatic saving habits",
            MapalField::PensionPlanning => "Increase pension contributions toward the full rate",
            MapalField::AssetDiversification => "Diversify the portfolio with bonds and index funds",
            MapalField::AlternativeInvestments => "Consider a controlled allocation (up to 5%) to alternatives",
            MapalField::MortgageOptimization => "Check whether refinancing the mortgage pays off",
            MapalField::LegalAndInsurance => "Update the will and powers of attorney",
            MapalField::IncomeGrowth => "Invest in professional education",
            MapalField::SpecialSituationsResilience => "Build a contingency plan covering 6+ months",
            MapalField::DataBasedManagement => "Start monthly tracking against goals",
            MapalField::ResourceLifeQualityBalance => "Define quality-of-life goals",
            MapalField::AbundanceMindset => "Work on limiting beliefs",
            MapalField::IntergenerationalTransfer => "Start financial education for the children",
            MapalField::RetirementAlternatives => "Explore partial-retirement options",
        }
    }

    /// Sum of all dimension weights.
    pub fn total_weight() -> u32 {
        Self::ALL.iter().map(MapalField::weight).sum()
    }
}

impl fmt::Display for MapalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MapalField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s.trim())
            .ok_or_else(|| ValidationError::unrecognized("mapal field", s))
    }
}
