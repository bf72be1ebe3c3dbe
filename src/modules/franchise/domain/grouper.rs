use std::collections::HashMap;

use crate::modules::catalog::domain::CatalogEntry;
use crate::shared::errors::AppResult;

use super::{GroupedEntry, GroupingMode, TitleNormalizer};

/// Folds flat catalog listings into franchise groups
///
/// Grouping is pure: the same input always yields the same groups, every
/// input entry lands in exactly one group, and groups come out in the order
/// their key first appears.
#[derive(Debug)]
pub struct FranchiseGrouper {
    mode: GroupingMode,
    normalizer: TitleNormalizer,
}

impl FranchiseGrouper {
    pub fn new(mode: GroupingMode) -> AppResult<Self> {
        Ok(Self {
            mode,
            normalizer: TitleNormalizer::franchise_pipeline()?,
        })
    }

    /// Grouper with a caller-supplied normalization pipeline
    pub fn with_normalizer(mode: GroupingMode, normalizer: TitleNormalizer) -> Self {
        Self { mode, normalizer }
    }

    pub fn mode(&self) -> GroupingMode {
        self.mode
    }

    /// Base franchise name for an entry (English title when available)
    pub fn franchise_key(&self, entry: &CatalogEntry) -> String {
        self.normalizer.normalize_or_lowercase(entry.display_title())
    }

    /// Key the entry is grouped under in the current mode
    pub fn grouping_key(&self, entry: &CatalogEntry) -> String {
        match self.mode {
            GroupingMode::PerEntry => entry.id.to_string(),
            GroupingMode::Franchise => self.franchise_key(entry),
        }
    }

    pub fn group(&self, entries: &[CatalogEntry]) -> Vec<GroupedEntry> {
        self.group_owned(entries.to_vec())
    }

    pub fn group_owned(&self, entries: Vec<CatalogEntry>) -> Vec<GroupedEntry> {
        match self.mode {
            GroupingMode::PerEntry => entries
                .into_iter()
                .map(|entry| GroupedEntry::single(entry.id.to_string(), entry))
                .collect(),
            GroupingMode::Franchise => self.group_by_franchise(entries),
        }
    }

    fn group_by_franchise(&self, entries: Vec<CatalogEntry>) -> Vec<GroupedEntry> {
        let mut slots: HashMap<String, usize> = HashMap::new();
        let mut partitions: Vec<(String, Vec<CatalogEntry>)> = Vec::new();

        for entry in entries {
            let key = self.franchise_key(&entry);
            match slots.get(&key) {
                Some(&slot) => partitions[slot].1.push(entry),
                None => {
                    slots.insert(key.clone(), partitions.len());
                    partitions.push((key, vec![entry]));
                }
            }
        }

        partitions
            .into_iter()
            .filter_map(|(key, members)| GroupedEntry::from_members(key, members))
            .collect()
    }
}
