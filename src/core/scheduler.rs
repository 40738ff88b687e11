//! Database chunk scheduler: groups queries to fit a scoreboard budget,
//! splits database sequences into short/long partitions balanced across
//! worker threads, and drives the scan with [`rayon::Scope`].
//!
//! Grounded on `databaseIndicesCreate`/`preprocQueries`/`preprocDatabase`/
//! `scoreSequences` in the original tool: the ~1GB chunk loop, the
//! length-2000 short/long split, and the length-balanced thread
//! partitioning are reproduced here; the original's hand-rolled semaphore
//! thread pool is replaced with `rayon::Scope`, which SPEC_FULL.md leaves
//! open to implementation choice.

use std::sync::Arc;

use crate::core::candidates::{Candidate, CandidateStore};
use crate::core::hash::QueryIndex;
use crate::core::kmers::SubstitutionTable;
use crate::core::scorer::{diagonal_count, ScoreBoard};
use crate::core::sequence::Sequence;

/// Database sequences longer than this many residues are scanned in the
/// "long" partition, sized and balanced separately from short sequences.
pub const LONG_SEQUENCE_THRESHOLD: usize = 2000;

/// Target size, in bytes, of one streamed database chunk.
pub const CHUNK_BYTES: usize = 1_000_000_000;

/// Target size, in scoreboard cells, of one query group within a worker.
const GROUP_SCOREBOARD_BUDGET: usize = 250_000;

struct IndexedSeq<'a> {
    seq: &'a Sequence,
    len: usize,
}

/// Split `[queries]` into length-sorted groups whose combined scoreboard
/// footprint against `max_target_len` stays within budget, mirroring the
/// original's query-group construction inside `scoreSequences`.
fn group_queries_by_budget<'a>(
    queries: &[&'a Sequence],
    max_target_len: usize,
    l: usize,
) -> Vec<Vec<&'a Sequence>> {
    let mut sorted: Vec<&Sequence> = queries.to_vec();
    sorted.sort_by_key(|s| s.len());

    let mut groups = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let mut budget = 0usize;
        let mut j = i;
        while j < sorted.len() {
            let cells = diagonal_count(sorted[j].len() as u32, max_target_len as u32, l) as usize;
            if budget + cells > GROUP_SCOREBOARD_BUDGET && j > i {
                break;
            }
            budget += cells;
            j += 1;
        }
        groups.push(sorted[i..j].to_vec());
        i = j;
    }
    groups
}

/// Split `targets` into short (`<= LONG_SEQUENCE_THRESHOLD`) and long
/// partitions, each length-sorted, mirroring `preprocDatabase`.
fn split_short_long(targets: &[Sequence]) -> (Vec<IndexedSeq<'_>>, Vec<IndexedSeq<'_>>) {
    let mut short = Vec::new();
    let mut long = Vec::new();
    for seq in targets {
        let entry = IndexedSeq { seq, len: seq.len() };
        if seq.len() > LONG_SEQUENCE_THRESHOLD {
            long.push(entry);
        } else {
            short.push(entry);
        }
    }
    short.sort_by_key(|s| s.len);
    long.sort_by_key(|s| s.len);
    (short, long)
}

/// Partition a length-sorted sequence list into `thread_len` contiguous,
/// length-balanced segments, mirroring the greedy accumulate-until-over-
/// budget walk in `preprocDatabase`.
fn balanced_segments(seqs: &[IndexedSeq], thread_len: usize) -> Vec<usize> {
    if thread_len == 0 || seqs.is_empty() {
        return vec![0; thread_len + 1];
    }

    let total_len: usize = seqs.iter().map(|s| s.len).sum();
    let segment_max_len = (total_len / thread_len).max(1);

    let mut segments = vec![0usize];
    let mut running = 0usize;
    for (i, s) in seqs.iter().enumerate() {
        running += s.len;
        if running > segment_max_len {
            segments.push(i + 1);
            running = 0;
            if segments.len() == thread_len {
                break;
            }
        }
    }
    while segments.len() != thread_len {
        segments.push(*segments.last().unwrap());
    }
    segments.push(seqs.len());
    segments
}

/// Scan one partition (`seqs[segments[t]..segments[t+1]]`) against all
/// queries, folding hits into `store` as each query group completes.
/// Mirrors `scoreSequences`'s per-thread loop, including its admission
/// heuristic: a hit is buffered locally either while the query's store
/// entry is still below `max_candidates`, or once it clears the query's
/// current floor score.
fn scan_partition(
    seqs: &[IndexedSeq],
    segments: &[usize],
    thread_idx: usize,
    queries: &[&Sequence],
    table: &SubstitutionTable,
    l: usize,
    store: &CandidateStore,
) {
    let start = segments[thread_idx];
    let end = segments[thread_idx + 1];
    if start == end {
        return;
    }

    let max_target_len = seqs[end - 1].len as u32;
    let groups = group_queries_by_budget(queries, max_target_len as usize, l);

    for group in groups {
        let index = QueryIndex::build(&group, table);
        let query_lens: Vec<u32> = group.iter().map(|q| q.len() as u32).collect();
        let mut board = ScoreBoard::new(&query_lens, max_target_len, l);

        let found: Vec<usize> = group.iter().map(|q| store.candidates_for(q.id()).len()).collect();
        let mut floor: Vec<Option<u16>> = group.iter().map(|q| store.floor(q.id())).collect();

        let mut local: Vec<smallvec::SmallVec<[Candidate; 4]>> =
            vec![smallvec::SmallVec::new(); group.len()];

        for target in &seqs[start..end] {
            for &(slot, score) in board.score_target(&index, &query_lens, target.seq, l) {
                let slot = slot as usize;
                let below_cap = found[slot] + local[slot].len() < store.max_candidates();
                let clears_floor = floor[slot].is_none_or(|f| score >= f);

                if below_cap || clears_floor {
                    local[slot].push(Candidate {
                        score,
                        target_id: target.seq.id(),
                    });
                    if floor[slot].is_none_or(|f| score < f) {
                        floor[slot] = Some(score);
                    }
                }
            }
        }

        for (slot, query) in group.iter().enumerate() {
            store.admit(query.id(), &local[slot]);
        }
    }
}

/// Run the whole database-scan pass: split `targets` into short/long
/// partitions, balance each across `thread_len` workers, and dispatch via
/// `rayon::Scope`. One call processes one streamed chunk; callers loop
/// this over successive ~[`CHUNK_BYTES`]-sized reads.
pub fn scan_chunk(
    queries: &[Sequence],
    targets: &[Sequence],
    table: &SubstitutionTable,
    l: usize,
    thread_len: usize,
    store: &Arc<CandidateStore>,
) {
    let query_refs: Vec<&Sequence> = queries.iter().collect();
    let (short, long) = split_short_long(targets);

    let short_segments = balanced_segments(&short, thread_len);
    let long_segments = balanced_segments(&long, thread_len);

    rayon::scope(|scope| {
        for t in 0..thread_len {
            let query_refs = &query_refs;
            let short = &short;
            let long = &long;
            let short_segments = &short_segments;
            let long_segments = &long_segments;
            let store = Arc::clone(store);

            scope.spawn(move |_| {
                scan_partition(short, short_segments, t, query_refs, table, l, &store);
                scan_partition(long, long_segments, t, query_refs, table, l, &store);
            });
        }
    });
}
