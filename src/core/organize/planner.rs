//! Groups a catalog into destination folders by time and place.

use super::types::{ClusterMember, ClusterPlan};
use crate::core::catalog::{Catalog, PhotoRecord};
use chrono::{NaiveDateTime, TimeDelta};
use tracing::debug;

/// Photos closer together than this (at the same place) share a folder
pub const ADJACENCY_WINDOW_MINUTES: i64 = 45;

/// Timestamp part of a folder name: "2024-01-15 14.30"
pub const KEY_TIME_FORMAT: &str = "%Y-%m-%d %H.%M";

/// State carried from one record to the next
struct Cursor<'a> {
    captured_at: NaiveDateTime,
    place: &'a str,
    key: String,
}

/// Single-pass clusterer over a sorted catalog
pub struct Clusterer;

impl Clusterer {
    /// Partition the catalog into folders
    ///
    /// Records are ordered by capture time, then basename. Walking that order,
    /// a record joins the previous record's folder when it has the same place
    /// and was taken less than [`ADJACENCY_WINDOW_MINUTES`] after it; otherwise
    /// it opens a new folder named after itself. Only the immediately preceding
    /// record is compared, so a chain of short gaps can span any length of time.
    pub fn cluster(catalog: &Catalog) -> ClusterPlan {
        let mut plan = ClusterPlan::new();
        let mut cursor: Option<Cursor> = None;

        for record in Self::sorted(catalog) {
            let key = match &cursor {
                Some(prev) if Self::is_adjacent(prev.captured_at, prev.place, record) => {
                    prev.key.clone()
                }
                _ => {
                    let key = Self::cluster_key(record);
                    debug!(key = %key, anchor = %record.path.display(), "new cluster");
                    key
                }
            };

            plan.push(
                &key,
                ClusterMember {
                    basename: record.basename(),
                    source: record.path.clone(),
                },
            );

            cursor = Some(Cursor {
                captured_at: record.captured_at,
                place: &record.place,
                key,
            });
        }

        plan
    }

    /// Catalog records ordered by (capture time, basename)
    ///
    /// The full path breaks remaining ties so the order never depends on
    /// how the files were enumerated.
    pub fn sorted(catalog: &Catalog) -> Vec<&PhotoRecord> {
        let mut records: Vec<&PhotoRecord> = catalog.iter().collect();
        records.sort_by_cached_key(|r| (r.captured_at, r.basename(), r.path.clone()));
        records
    }

    /// Whether `next` continues the folder of a record taken at `previous_at`/`previous_place`
    pub fn is_adjacent(previous_at: NaiveDateTime, previous_place: &str, next: &PhotoRecord) -> bool {
        next.place == previous_place
            && next.captured_at - previous_at < TimeDelta::minutes(ADJACENCY_WINDOW_MINUTES)
    }

    /// Folder name anchored on `record`
    pub fn cluster_key(record: &PhotoRecord) -> String {
        format!("{} {}", record.captured_at.format(KEY_TIME_FORMAT), record.place)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geocode::UNKNOWN_PLACE;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn at(minutes: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
            + TimeDelta::minutes(minutes)
    }

    fn record(path: &str, minutes: i64, place: &str) -> PhotoRecord {
        PhotoRecord::new(path, at(minutes), place)
    }

    fn members(plan: &ClusterPlan, key: &str) -> Vec<String> {
        plan.get(key)
            .unwrap_or_else(|| panic!("no cluster {key:?}"))
            .sorted_basenames()
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn empty_catalog_yields_empty_plan() {
        let plan = Clusterer::cluster(&Catalog::new());
        assert!(plan.is_empty());
    }

    #[test]
    fn key_uses_anchor_time_and_place() {
        let r = record("IMG_0001.jpg", 30, "Harbour");
        assert_eq!(Clusterer::cluster_key(&r), "2024-01-15 10.30 Harbour");
    }

    #[test]
    fn chain_of_short_gaps_stays_together() {
        let catalog: Catalog = vec![
            record("a.jpg", 0, "A"),
            record("b.jpg", 40, "A"),
            record("c.jpg", 80, "A"),
        ]
        .into_iter()
        .collect();

        let plan = Clusterer::cluster(&catalog);

        assert_eq!(plan.len(), 1);
        assert_eq!(members(&plan, "2024-01-15 10.00 A"), vec!["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn gap_of_exactly_the_window_splits() {
        let catalog: Catalog = vec![record("a.jpg", 0, "A"), record("b.jpg", 45, "A")]
            .into_iter()
            .collect();

        let plan = Clusterer::cluster(&catalog);

        assert_eq!(plan.len(), 2);
        assert_eq!(members(&plan, "2024-01-15 10.00 A"), vec!["a.jpg"]);
        assert_eq!(members(&plan, "2024-01-15 10.45 A"), vec!["b.jpg"]);
    }

    #[test]
    fn gap_just_under_the_window_joins() {
        let mut late = record("b.jpg", 44, "A");
        late.captured_at += TimeDelta::seconds(59);
        let catalog: Catalog = vec![record("a.jpg", 0, "A"), late].into_iter().collect();

        assert_eq!(Clusterer::cluster(&catalog).len(), 1);
    }

    #[test]
    fn place_change_splits_even_at_same_instant() {
        let catalog: Catalog = vec![record("a.jpg", 0, "A"), record("b.jpg", 0, "B")]
            .into_iter()
            .collect();

        let plan = Clusterer::cluster(&catalog);

        assert_eq!(plan.len(), 2);
        assert_eq!(members(&plan, "2024-01-15 10.00 A"), vec!["a.jpg"]);
        assert_eq!(members(&plan, "2024-01-15 10.00 B"), vec!["b.jpg"]);
    }

    #[test]
    fn unknown_place_only_joins_unknown() {
        let catalog: Catalog = vec![
            record("a.jpg", 0, UNKNOWN_PLACE),
            record("b.jpg", 5, UNKNOWN_PLACE),
            record("c.jpg", 10, "A"),
            record("d.jpg", 15, UNKNOWN_PLACE),
        ]
        .into_iter()
        .collect();

        let plan = Clusterer::cluster(&catalog);

        assert_eq!(members(&plan, "2024-01-15 10.00 unknown"), vec!["a.jpg", "b.jpg"]);
        assert_eq!(members(&plan, "2024-01-15 10.10 A"), vec!["c.jpg"]);
        assert_eq!(members(&plan, "2024-01-15 10.15 unknown"), vec!["d.jpg"]);
    }

    #[test]
    fn new_cluster_is_named_after_its_own_anchor() {
        let catalog: Catalog = vec![
            record("a.jpg", 0, "A"),
            record("b.jpg", 20, "A"),
            record("c.jpg", 90, "A"),
            record("d.jpg", 100, "A"),
        ]
        .into_iter()
        .collect();

        let plan = Clusterer::cluster(&catalog);

        assert_eq!(members(&plan, "2024-01-15 11.30 A"), vec!["c.jpg", "d.jpg"]);
    }

    #[test]
    fn equal_timestamps_are_ordered_by_basename() {
        let catalog: Catalog = vec![
            record("z/b.jpg", 0, "B"),
            record("y/a.jpg", 0, "A"),
        ]
        .into_iter()
        .collect();

        let sorted: Vec<String> = Clusterer::sorted(&catalog)
            .into_iter()
            .map(|r| r.basename())
            .collect();

        assert_eq!(sorted, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn every_record_lands_in_exactly_one_cluster() {
        let catalog: Catalog = (0..30)
            .map(|i| {
                let place = if i % 7 == 0 { "B" } else { "A" };
                record(&format!("dir{}/IMG_{i:04}.jpg", i % 3), i * 17, place)
            })
            .collect();

        let plan = Clusterer::cluster(&catalog);

        let mut sources: Vec<PathBuf> = plan
            .clusters()
            .flat_map(|c| c.members.iter().map(|m| m.source.clone()))
            .collect();
        sources.sort();
        let mut expected: Vec<PathBuf> = catalog.iter().map(|r| r.path.clone()).collect();
        expected.sort();
        assert_eq!(sources, expected);
    }

    #[test]
    fn result_does_not_depend_on_insertion_order() {
        let records = vec![
            record("a.jpg", 0, "A"),
            record("b.jpg", 0, "A"),
            record("c.jpg", 30, "B"),
            record("d.jpg", 50, "B"),
            record("e.jpg", 200, "A"),
        ];
        let forward: Catalog = records.clone().into_iter().collect();
        let backward: Catalog = records.into_iter().rev().collect();

        assert_eq!(Clusterer::cluster(&forward), Clusterer::cluster(&backward));
    }

    #[test]
    fn interleaved_places_with_same_minute_share_a_folder_name() {
        let catalog: Catalog = vec![
            record("a.jpg", 0, "A"),
            record("b.jpg", 0, "B"),
            record("c.jpg", 0, "A"),
        ]
        .into_iter()
        .collect();

        let plan = Clusterer::cluster(&catalog);

        assert_eq!(plan.len(), 2);
        assert_eq!(members(&plan, "2024-01-15 10.00 A"), vec!["a.jpg", "c.jpg"]);
    }
}
