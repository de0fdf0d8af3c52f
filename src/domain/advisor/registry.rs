//! Read-only advisor lookup.
//!
//! The registry is built once at startup from the static catalog and passed
//! by reference to every component that needs it. There is no global lookup
//! table; tests can construct registries over a subset of personas.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::mapal::MapalField;

use super::{catalog, AdvisorId, AdvisorProfile};

/// Lookup failure for a persona the registry does not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("advisor not found in registry: {0}")]
pub struct AdvisorNotFound(pub AdvisorId);

/// Immutable catalog of advisor personas.
#[derive(Debug, Clone)]
pub struct AdvisorRegistry {
    ordered: Vec<AdvisorProfile>,
    by_id: HashMap<AdvisorId, usize>,
}

impl AdvisorRegistry {
    /// Builds the registry over the full built-in catalog.
    pub fn builtin() -> Self {
        Self::from_profiles(catalog::all().to_vec())
    }

    /// Builds a registry over an explicit set of profiles.
    pub fn from_profiles(profiles: Vec<AdvisorProfile>) -> Self {
        let by_id = profiles
            .iter()
            .enumerate()
            .map(|(index, profile)| (profile.id, index))
            .collect();
        Self {
            ordered: profiles,
            by_id,
        }
    }

    /// Looks up a persona by id.
    pub fn get(&self, id: AdvisorId) -> Result<&AdvisorProfile, AdvisorNotFound> {
        self.by_id
            .get(&id)
            .map(|index| &self.ordered[*index])
            .ok_or(AdvisorNotFound(id))
    }

    /// All personas in catalog order.
    pub fn all(&self) -> &[AdvisorProfile] {
        &self.ordered
    }

    /// The MAPAL dimension a persona primarily advances.
    pub fn domain_field_for(&self, id: AdvisorId) -> Result<MapalField, AdvisorNotFound> {
        self.get(id).map(|profile| profile.domain_field)
    }

    /// Best keyword match for a user message, if any keyword hits at all.
    ///
    /// Advisory only: the model's own structured hand-off decision is
    /// authoritative, and this hint is surfaced purely as a routing signal
    /// when the model declined to hand off. Ties resolve in catalog order.
    pub fn suggest_by_keywords(&self, text: &str) -> Option<AdvisorId> {
        let mut best: Option<(AdvisorId, usize)> = None;
        for profile in &self.ordered {
            let hits = profile.keyword_hits(text);
            // Strict comparison keeps the earliest persona on ties.
            if hits > best.map_or(0, |(_, h)| h) {
                best = Some((profile.id, hits));
            }
        }

        let (id, hits) = best?;
        debug!(advisor = %id, hits, "keyword routing hint");
        Some(id)
    }
}

impl Default for AdvisorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
