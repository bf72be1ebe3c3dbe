use serde::{Deserialize, Serialize};

use crate::modules::catalog::domain::{CatalogEntry, MalId};

/// A franchise: one representative plus every catalog entry sharing its key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedEntry {
    pub key: String,
    /// Highest-scoring member, shown as the main item
    pub representative: CatalogEntry,
    /// Members in input order; always contains the representative
    pub members: Vec<CatalogEntry>,
    /// Sum of known episode counts (unknown counts as zero)
    pub total_episodes: u32,
    pub best_score: Option<f32>,
}

impl GroupedEntry {
    /// Group holding a single entry under `key`
    pub fn single(key: String, entry: CatalogEntry) -> Self {
        Self {
            key,
            total_episodes: entry.episodes.unwrap_or(0),
            best_score: entry.score,
            representative: entry.clone(),
            members: vec![entry],
        }
    }

    /// Build a group from members already in input order
    ///
    /// Returns `None` for an empty member list.
    pub fn from_members(key: String, members: Vec<CatalogEntry>) -> Option<Self> {
        let representative = pick_representative(&members)?.clone();
        let total_episodes = members
            .iter()
            .filter_map(|m| m.episodes)
            .fold(0u32, |acc, e| acc.saturating_add(e));

        Some(Self {
            key,
            best_score: representative.score,
            representative,
            members,
            total_episodes,
        })
    }

    pub fn member_ids(&self) -> Vec<MalId> {
        self.members.iter().map(|m| m.id).collect()
    }

    pub fn season_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_franchise(&self) -> bool {
        self.members.len() > 1
    }
}

/// Highest score wins; missing or non-finite scores rank below any number and
/// ties keep the earliest member
fn pick_representative(members: &[CatalogEntry]) -> Option<&CatalogEntry> {
    let rank = |entry: &CatalogEntry| entry.score.filter(|s| s.is_finite());

    members.iter().reduce(|best, candidate| {
        match (rank(best), rank(candidate)) {
            (Some(b), Some(c)) if c > b => candidate,
            (None, Some(_)) => candidate,
            _ => best,
        }
    })
}
