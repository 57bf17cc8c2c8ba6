//! Hardcoded checkpoint tables
//!
//! What makes a good checkpoint block?
//! - surrounded by blocks with reasonable timestamps
//! - contains no strange transactions

use std::collections::BTreeMap;
use tracing::warn;

use crate::constants::Height;
use crate::crypto::Hash;

/// Immutable mapping Height -> block hash for one network
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckpointMap {
    entries: BTreeMap<Height, Hash>,
    ignored_duplicates: usize,
}

impl CheckpointMap {
    /// Map with no checkpoints
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from table rows; the first row for a height wins
    ///
    /// Later rows at an already-present height are dropped with a warning.
    pub fn from_entries<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (Height, Hash)>,
    {
        let mut entries = BTreeMap::new();
        let mut ignored_duplicates = 0;
        for (height, hash) in rows {
            match entries.get(&height) {
                Some(kept) if *kept != hash => {
                    warn!(
                        height,
                        kept = %kept,
                        ignored = %hash,
                        "conflicting checkpoint row ignored"
                    );
                    ignored_duplicates += 1;
                }
                Some(_) => ignored_duplicates += 1,
                None => {
                    entries.insert(height, hash);
                }
            }
        }
        Self {
            entries,
            ignored_duplicates,
        }
    }

    /// Checkpointed hash at `height`
    pub fn get(&self, height: Height) -> Option<&Hash> {
        self.entries.get(&height)
    }

    pub fn contains_height(&self, height: Height) -> bool {
        self.entries.contains_key(&height)
    }

    /// Highest checkpointed height
    pub fn max_height(&self) -> Option<Height> {
        self.entries.keys().next_back().copied()
    }

    /// Entries from the highest height to the lowest
    pub fn iter_desc(&self) -> impl Iterator<Item = (Height, &Hash)> + '_ {
        self.entries.iter().rev().map(|(h, hash)| (*h, hash))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of table rows dropped because their height was already taken
    pub fn ignored_duplicates(&self) -> usize {
        self.ignored_duplicates
    }
}

/// Main network table rows, in table order
///
/// Height 1 appears twice; only the first row is in force.
pub const MAIN_CHECKPOINT_ROWS: &[(Height, &str)] = &[
    (0, "0x0000060d6aaaf8d5f835567060dcfbff843677d10b92ef0e0036cb9b126a9ff0"),
    (1, "0x00000e830ed203aaa637aee5a40dc7338cb6f0bec138f1f3180a396f8e5417dc"),
    (1, "0x0000000000a800effc972bbb10315b6daf921f89a9e2c2241570db91002b5eed"),
];

/// Test network has no checkpoints
pub const TEST_CHECKPOINT_ROWS: &[(Height, &str)] = &[];

/// Parse a table of hex rows
///
/// Rows that fail to parse are skipped with a warning; the tables above are
/// covered by tests so this only matters for hand-edited tables.
pub fn checkpoints_from_rows(rows: &[(Height, &str)]) -> CheckpointMap {
    CheckpointMap::from_entries(rows.iter().filter_map(|(height, hex)| {
        match Hash::from_hex(hex) {
            Ok(hash) => Some((*height, hash)),
            Err(e) => {
                warn!(height, error = %e, "unparseable checkpoint row skipped");
                None
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(byte: u8) -> Hash {
        Hash([byte; 32])
    }

    #[test]
    fn test_main_table_parses() {
        let map = checkpoints_from_rows(MAIN_CHECKPOINT_ROWS);
        assert_eq!(map.len(), 2);
        assert_eq!(map.ignored_duplicates(), 1);
        assert_eq!(map.max_height(), Some(1));
    }

    #[test]
    fn test_first_write_wins() {
        let map = checkpoints_from_rows(MAIN_CHECKPOINT_ROWS);
        let expected = Hash::from_hex(
            "00000e830ed203aaa637aee5a40dc7338cb6f0bec138f1f3180a396f8e5417dc",
        )
        .unwrap();
        assert_eq!(map.get(1), Some(&expected));
    }

    #[test]
    fn test_test_table_is_empty() {
        let map = checkpoints_from_rows(TEST_CHECKPOINT_ROWS);
        assert!(map.is_empty());
        assert_eq!(map.max_height(), None);
    }

    #[test]
    fn test_iter_desc_order() {
        let map = CheckpointMap::from_entries(vec![(5, h(5)), (0, h(0)), (9, h(9))]);
        let heights: Vec<Height> = map.iter_desc().map(|(height, _)| height).collect();
        assert_eq!(heights, vec![9, 5, 0]);
    }

    #[test]
    fn test_identical_duplicate_counted() {
        let map = CheckpointMap::from_entries(vec![(3, h(1)), (3, h(1))]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.ignored_duplicates(), 1);
    }

    #[test]
    fn test_bad_row_skipped() {
        let map = checkpoints_from_rows(&[(0, "nothex"), (2, "0x00")]);
        assert!(map.is_empty());
    }
}
