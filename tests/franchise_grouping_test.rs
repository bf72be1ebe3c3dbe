//! Franchise grouping tests
//!
//! Exercises the grouper end to end on realistic catalog listings.

mod utils;

use std::collections::HashSet;

use anitier_lib::modules::franchise::{FranchiseGrouper, GroupingMode};
use utils::factories::{entry, CatalogEntryFactory};

fn franchise_grouper() -> FranchiseGrouper {
    FranchiseGrouper::new(GroupingMode::Franchise).unwrap()
}

#[test]
fn test_frieren_sequel_folds_into_one_group() {
    let entries = vec![
        CatalogEntryFactory::new()
            .with_id(1)
            .with_title("Frieren")
            .with_score(9.0)
            .with_episodes(28)
            .build(),
        CatalogEntryFactory::new()
            .with_id(2)
            .with_title("Frieren Season 2")
            .with_score(9.2)
            .with_episodes(12)
            .build(),
    ];

    let groups = franchise_grouper().group(&entries);

    assert_eq!(groups.len(), 1);
    let group = &groups[0];
    assert_eq!(group.key, "frieren");
    assert_eq!(group.representative.id, 2);
    assert_eq!(group.member_ids(), vec![1, 2]);
    assert_eq!(group.total_episodes, 40);
    assert!(group.is_franchise());
}

#[test]
fn test_final_season_shares_key_with_first_series() {
    let grouper = franchise_grouper();
    let first = entry(16498, "Attack on Titan", Some(8.5));
    let finale = entry(40028, "Attack on Titan: The Final Season", Some(8.8));

    assert_eq!(grouper.franchise_key(&first), grouper.franchise_key(&finale));
    assert_eq!(grouper.group(&[first, finale]).len(), 1);
}

#[test]
fn test_highest_score_represents_group() {
    let entries = vec![
        entry(1, "Mushoku Tensei", Some(7.8)),
        entry(2, "Mushoku Tensei Season 2", Some(8.9)),
    ];

    let groups = franchise_grouper().group(&entries);
    assert_eq!(groups[0].representative.id, 2);
    assert_eq!(groups[0].best_score, Some(8.9));
}

#[test]
fn test_unscored_entry_never_beats_scored_one() {
    let entries = vec![
        entry(1, "Dr. Stone Season 4", None),
        entry(2, "Dr. Stone", Some(8.2)),
    ];

    let groups = franchise_grouper().group(&entries);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].representative.id, 2);
}

#[test]
fn test_every_entry_lands_in_exactly_one_group() {
    let entries = vec![
        entry(1, "Frieren", Some(9.0)),
        entry(2, "Oshi no Ko", Some(8.4)),
        entry(3, "Frieren Season 2", Some(9.2)),
        entry(4, "Oshi no Ko 2nd Season", Some(8.1)),
        entry(5, "Mob Psycho 100", Some(8.5)),
        entry(6, "Mob Psycho 100 II", Some(8.8)),
        entry(7, "Vinland Saga", None),
    ];

    for mode in [GroupingMode::PerEntry, GroupingMode::Franchise] {
        let groups = FranchiseGrouper::new(mode).unwrap().group(&entries);
        let ids: Vec<u32> = groups.iter().flat_map(|g| g.member_ids()).collect();
        let unique: HashSet<u32> = ids.iter().copied().collect();

        assert_eq!(ids.len(), entries.len(), "coverage broken in {mode}");
        assert_eq!(unique.len(), entries.len(), "duplicate member in {mode}");
    }
}

#[test]
fn test_grouping_is_deterministic() {
    let entries: Vec<_> = ["Overlord", "Overlord II", "Overlord III", "Bleach"]
        .iter()
        .enumerate()
        .map(|(i, title)| entry(i as u32 + 1, title, Some(7.5)))
        .collect();

    let grouper = franchise_grouper();
    assert_eq!(grouper.group(&entries), grouper.group(&entries));
}

#[test]
fn test_per_entry_mode_keeps_sequels_apart() {
    let entries = vec![entry(1, "Frieren", Some(9.0)), entry(2, "Frieren Season 2", Some(9.2))];

    let groups = FranchiseGrouper::new(GroupingMode::PerEntry)
        .unwrap()
        .group(&entries);

    assert_eq!(groups.len(), 2);
    assert!(groups.iter().all(|g| !g.is_franchise()));
    assert_eq!(groups[0].key, "1");
}

#[test]
fn test_empty_and_single_inputs() {
    let grouper = franchise_grouper();
    assert!(grouper.group(&[]).is_empty());

    let only = CatalogEntryFactory::complete().with_id(7).build();
    let groups = grouper.group(std::slice::from_ref(&only));
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].members, vec![only.clone()]);
    assert_eq!(groups[0].representative, only);
}

#[test]
fn test_movie_sharing_a_key_joins_the_series() {
    let series = CatalogEntryFactory::new()
        .with_id(1)
        .with_title("Violet Evergarden")
        .with_kind("TV")
        .with_score(8.7)
        .with_episodes(13)
        .build();
    let movie = CatalogEntryFactory::new()
        .with_id(2)
        .with_title("Violet Evergarden")
        .with_kind("Movie")
        .with_score(8.9)
        .with_episodes(1)
        .build();

    let groups = franchise_grouper().group(&[series, movie]);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].representative.kind, "Movie");
    assert_eq!(groups[0].total_episodes, 14);
}

#[test]
fn test_non_latin_titles_group_by_lowercased_title() {
    let entries = vec![entry(1, "進撃の巨人", None), entry(2, "進撃の巨人", Some(8.0))];

    let groups = franchise_grouper().group(&entries);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key, "進撃の巨人");
}

#[test]
fn test_grouped_output_serializes_snake_case() {
    let groups = franchise_grouper().group(&[entry(1, "Frieren", Some(9.0))]);
    let json = serde_json::to_value(&groups).unwrap();

    assert_eq!(json[0]["key"], "frieren");
    assert_eq!(json[0]["representative"]["id"], 1);
    assert!(json[0].get("total_episodes").is_some());
    assert!(json[0].get("best_score").is_some());
}
