//! Perft: exhaustive leaf counts of the legal move tree.
//!
//! Every variant drives `do_move`/`undo_move` on a single position and
//! leaves it exactly as it found it, errors included.

use std::thread;

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_generator::has_legal_move;
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerationError, MoveGenerator};
use crate::move_generation::perft_table::{PerftEntry, PerftTable};
use crate::moves::move_descriptions::Move;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub discovery_checks: u64,
    pub double_checks: u64,
    pub checkmates: u64,
}

/// How `run_perft` should count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerftConfig {
    /// Memoize subtree counts by position key.
    pub use_hash: bool,
    /// Entries per memo table; each worker thread owns one.
    pub hash_entries: usize,
    /// Worker threads splitting the root moves. 1 counts on the caller's thread.
    pub threads: usize,
}

impl Default for PerftConfig {
    fn default() -> Self {
        Self {
            use_hash: false,
            hash_entries: PerftTable::DEFAULT_ENTRIES,
            threads: 1,
        }
    }
}

/// Leaf count of the legal move tree `depth` plies deep.
pub fn perft<G: MoveGenerator + ?Sized>(
    generator: &G,
    position: &mut Position,
    depth: u8,
) -> MoveGenResult<u64> {
    if depth == 0 {
        return Ok(1);
    }
    let moves = generator.generate_legal_moves(position)?;
    if depth == 1 {
        return Ok(moves.len() as u64);
    }

    let mut nodes = 0;
    for mv in moves {
        position.do_move(mv);
        let result = perft(generator, position, depth - 1);
        position.undo_move();
        nodes += result?;
    }
    Ok(nodes)
}

/// Leaf count with per-leaf move statistics.
pub fn perft_detailed<G: MoveGenerator + ?Sized>(
    generator: &G,
    position: &mut Position,
    depth: u8,
) -> MoveGenResult<PerftCounts> {
    let mut counts = PerftCounts::default();
    if depth == 0 {
        counts.nodes = 1;
        return Ok(counts);
    }
    detailed_recurse(generator, position, depth, &mut counts)?;
    Ok(counts)
}

fn detailed_recurse<G: MoveGenerator + ?Sized>(
    generator: &G,
    position: &mut Position,
    depth: u8,
    counts: &mut PerftCounts,
) -> MoveGenResult<()> {
    let moves = generator.generate_legal_moves(position)?;
    for mv in moves {
        if depth == 1 {
            count_leaf(position, mv, counts);
            continue;
        }
        position.do_move(mv);
        let result = detailed_recurse(generator, position, depth - 1, counts);
        position.undo_move();
        result?;
    }
    Ok(())
}

fn count_leaf(position: &mut Position, mv: Move, counts: &mut PerftCounts) {
    counts.nodes += 1;
    if position.is_capture(mv) {
        counts.captures += 1;
    }
    if mv.is_en_passant() {
        counts.en_passant += 1;
    }
    if mv.is_castle() {
        counts.castles += 1;
    }
    if mv.is_promotion() {
        counts.promotions += 1;
    }
    if !position.move_gives_check(mv) {
        return;
    }

    counts.checks += 1;
    let direct = position.move_gives_direct_check(mv);
    let discovered = position.move_gives_discovered_check(mv);
    if direct && discovered {
        counts.double_checks += 1;
    } else if discovered {
        counts.discovery_checks += 1;
    }

    position.do_move(mv);
    if !has_legal_move(position) {
        counts.checkmates += 1;
    }
    position.undo_move();
}

/// Leaf counts per root move, in long algebraic notation, in generation order.
pub fn divide<G: MoveGenerator + ?Sized>(
    generator: &G,
    position: &mut Position,
    depth: u8,
) -> MoveGenResult<Vec<(String, u64)>> {
    let moves = generator.generate_legal_moves(position)?;
    let mut split = Vec::with_capacity(moves.len());
    for mv in moves {
        position.do_move(mv);
        let result = perft(generator, position, depth.saturating_sub(1));
        position.undo_move();
        let nodes = result?;
        log::info!("{mv}: {nodes}");
        split.push((mv.to_string(), nodes));
    }
    Ok(split)
}

/// Leaf count memoized in `table`. Exact unless two positions share a full
/// 64-bit key at the same remaining depth.
pub fn perft_hashed<G: MoveGenerator + ?Sized>(
    generator: &G,
    position: &mut Position,
    depth: u8,
    table: &mut PerftTable,
) -> MoveGenResult<u64> {
    if depth <= 1 {
        return perft(generator, position, depth);
    }
    if let Some(nodes) = table.probe(position.key(), depth) {
        return Ok(nodes);
    }

    let moves = generator.generate_legal_moves(position)?;
    let mut nodes = 0;
    for mv in moves {
        position.do_move(mv);
        let result = perft_hashed(generator, position, depth - 1, table);
        position.undo_move();
        nodes += result?;
    }
    table.store(PerftEntry {
        key: position.key(),
        depth,
        nodes,
    });
    Ok(nodes)
}

/// Leaf count with the root moves split across `config.threads` workers,
/// each counting on its own deep copy of `position`.
pub fn perft_parallel<G: MoveGenerator + ?Sized>(
    generator: &G,
    position: &Position,
    depth: u8,
    config: &PerftConfig,
) -> MoveGenResult<u64> {
    if depth <= 1 {
        return perft(generator, &mut position.clone(), depth);
    }
    let root_moves = generator.generate_legal_moves(position)?;
    let threads = config.threads.clamp(1, root_moves.len().max(1));
    let mut shares: Vec<Vec<Move>> = vec![Vec::new(); threads];
    for (i, mv) in root_moves.into_iter().enumerate() {
        shares[i % threads].push(mv);
    }

    thread::scope(|scope| -> MoveGenResult<u64> {
        let handles: Vec<_> = shares
            .into_iter()
            .map(|share| {
                let mut local = position.clone();
                scope.spawn(move || -> MoveGenResult<u64> {
                    let mut table = config.use_hash.then(|| PerftTable::with_entries(config.hash_entries));
                    let mut nodes = 0;
                    for mv in share {
                        local.do_move(mv);
                        let result = match table.as_mut() {
                            Some(table) => perft_hashed(generator, &mut local, depth - 1, table),
                            None => perft(generator, &mut local, depth - 1),
                        };
                        local.undo_move();
                        nodes += result?;
                    }
                    Ok(nodes)
                })
            })
            .collect();

        let mut total = 0;
        for handle in handles {
            total += handle.join().map_err(|_| MoveGenerationError::WorkerPanicked)??;
        }
        Ok(total)
    })
}

/// Runs the perft variant selected by `config`.
pub fn run_perft<G: MoveGenerator + ?Sized>(
    generator: &G,
    position: &mut Position,
    depth: u8,
    config: &PerftConfig,
) -> MoveGenResult<u64> {
    if config.threads > 1 {
        return perft_parallel(generator, position, depth, config);
    }
    if config.use_hash {
        let mut table = PerftTable::with_entries(config.hash_entries);
        return perft_hashed(generator, position, depth, &mut table);
    }
    perft(generator, position, depth)
}
