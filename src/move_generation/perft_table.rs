//! Fixed-size memo of perft subtree counts keyed by Zobrist hash.
//!
//! Entries are verified on the full 64-bit key and the remaining depth, so a
//! wrong count needs two positions sharing a full key. Deeper subtrees win
//! a contested slot since they are costlier to recompute.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerftEntry {
    pub key: u64,
    pub depth: u8,
    pub nodes: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftTableStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

#[derive(Debug, Clone)]
pub struct PerftTable {
    entries: Vec<Option<PerftEntry>>,
    stats: PerftTableStats,
}

impl PerftTable {
    pub const DEFAULT_ENTRIES: usize = 1 << 20;

    pub fn with_entries(count: usize) -> Self {
        Self {
            entries: vec![None; count.max(1)],
            stats: PerftTableStats::default(),
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.stats = PerftTableStats::default();
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
    pub fn stats(&self) -> PerftTableStats {
        self.stats
    }

    #[inline]
    fn idx(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }

    pub fn probe(&mut self, key: u64, depth: u8) -> Option<u64> {
        self.stats.probes += 1;
        let idx = self.idx(key);
        let hit = self.entries[idx]
            .filter(|e| e.key == key && e.depth == depth)
            .map(|e| e.nodes);
        if hit.is_some() {
            self.stats.hits += 1;
        }
        hit
    }

    pub fn store(&mut self, entry: PerftEntry) {
        self.stats.stores += 1;
        let idx = self.idx(entry.key);
        let replace = match self.entries[idx] {
            None => true,
            Some(existing) => existing.key == entry.key || entry.depth >= existing.depth,
        };
        if replace {
            self.entries[idx] = Some(entry);
        }
    }
}

impl Default for PerftTable {
    fn default() -> Self {
        Self::with_entries(Self::DEFAULT_ENTRIES)
    }
}
