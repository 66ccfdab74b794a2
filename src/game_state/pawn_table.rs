//! Fixed-size pawn-structure cache keyed by the pawn key.
//!
//! Each `Position` owns one. The table is never shared: a deep copy of a
//! position starts with an empty cache of the same size.

use crate::game_state::chess_types::Bitboard;
use crate::game_state::score::ScoreVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PawnEntry {
    pub key: u64,
    pub score: ScoreVector,
    /// Indexed by `Color::index()`.
    pub passed_pawns: [Bitboard; 2],
    pub weak_pawns: [Bitboard; 2],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PawnTableStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

#[derive(Debug)]
pub struct PawnTable {
    entries: Vec<Option<PawnEntry>>,
    stats: PawnTableStats,
}

impl PawnTable {
    pub const DEFAULT_ENTRIES: usize = 8192;

    pub fn with_entries(count: usize) -> Self {
        Self {
            entries: vec![None; count.max(1)],
            stats: PawnTableStats::default(),
        }
    }

    /// An empty table with the same capacity.
    pub fn empty_like(&self) -> Self {
        Self::with_entries(self.entries.len())
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.stats = PawnTableStats::default();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Option::is_none)
    }

    #[inline]
    pub fn stats(&self) -> PawnTableStats {
        self.stats
    }

    #[inline]
    fn idx(&self, key: u64) -> usize {
        (key as usize) % self.entries.len()
    }

    pub fn probe(&mut self, key: u64) -> Option<PawnEntry> {
        self.stats.probes += 1;
        let hit = self.entries[self.idx(key)].filter(|e| e.key == key);
        if hit.is_some() {
            self.stats.hits += 1;
        }
        hit
    }

    /// Always-replace store.
    pub fn store(&mut self, entry: PawnEntry) {
        self.stats.stores += 1;
        let idx = self.idx(entry.key);
        self.entries[idx] = Some(entry);
    }
}

impl Default for PawnTable {
    fn default() -> Self {
        Self::with_entries(Self::DEFAULT_ENTRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: u64) -> PawnEntry {
        PawnEntry {
            key,
            score: ScoreVector::new(12, -4),
            passed_pawns: [1 << 12, 0],
            weak_pawns: [0, 1 << 50],
        }
    }

    #[test]
    fn store_then_probe_hits_only_matching_key() {
        let mut table = PawnTable::with_entries(16);
        table.store(entry(5));
        assert_eq!(table.probe(5), Some(entry(5)));
        assert_eq!(table.probe(21), None);
        let stats = table.stats();
        assert_eq!((stats.probes, stats.hits, stats.stores), (2, 1, 1));
    }

    #[test]
    fn empty_like_keeps_capacity_but_no_entries() {
        let mut table = PawnTable::with_entries(32);
        table.store(entry(7));
        let copy = table.empty_like();
        assert_eq!(copy.len(), 32);
        assert!(copy.is_empty());
        table.clear();
        assert!(table.is_empty());
    }
}
