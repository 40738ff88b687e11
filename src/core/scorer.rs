//! Diagonal hit-counting scorer: scans one target against a query index,
//! accumulating hits per (query, diagonal) and reporting per-query maxima.
//!
//! Grounded on the original tool's `scoreSequences` inner loop (`dlens`,
//! `dstarts`, `scores`, `max` vectors), with the automaton-state walk
//! replaced by the shift-and-mask rolling k-mer from [`crate::core::hash`].

use crate::core::hash::QueryIndex;
use crate::core::sequence::{delete_mask, Sequence, BITS_PER_SYMBOL};

/// Reusable per-group scratch space. Sized once from an upper bound on
/// target length for the group; per-target diagonal layout is recomputed
/// each call but never exceeds the buffer reserved here.
pub struct ScoreBoard {
    scores: Vec<u16>,
    max_score: Vec<u16>,
    diag_len: Vec<u32>,
    diag_start: Vec<u32>,
    /// (slot, score) pairs touched by the most recent `score_target` call.
    touched: Vec<(u32, u16)>,
}

/// Number of distinct diagonals between a query of length `qlen` and a
/// target of length `target_len` under a seed of length `l`. Zero if
/// either sequence is shorter than `l` — no k-mer from it can ever seed a
/// hit, so it must not perturb another slot's diagonal layout.
#[inline]
pub(crate) fn diagonal_count(qlen: u32, target_len: u32, l: usize) -> u32 {
    if (qlen as usize) < l || (target_len as usize) < l {
        return 0;
    }
    qlen + target_len - 2 * l as u32 + 1
}

impl ScoreBoard {
    /// `query_lens` are the lengths of the queries in this group, in slot
    /// order. `max_target_len` upper-bounds every target this board will
    /// ever score, per the chunk's grouping budget.
    pub fn new(query_lens: &[u32], max_target_len: u32, l: usize) -> Self {
        let group_len = query_lens.len();
        let budget: u64 = query_lens
            .iter()
            .map(|&q| diagonal_count(q, max_target_len, l) as u64)
            .sum();

        ScoreBoard {
            scores: vec![0u16; budget as usize],
            max_score: vec![0u16; group_len],
            diag_len: vec![0u32; group_len],
            diag_start: vec![0u32; group_len + 1],
            touched: Vec::new(),
        }
    }

    /// Score `target` against `index`, returning `(slot, max_score)` for
    /// every query slot that had at least one hit. The scoreboard is
    /// zeroed incrementally: only buckets touched by this target are reset,
    /// so cost stays proportional to active diagonals, not board size.
    pub fn score_target(
        &mut self,
        index: &QueryIndex,
        query_lens: &[u32],
        target: &Sequence,
        l: usize,
    ) -> &[(u32, u16)] {
        let group_len = query_lens.len();
        let target_len = target.len() as u32;

        self.diag_start[0] = 0;
        for (i, &qlen) in query_lens.iter().enumerate().take(group_len) {
            self.diag_len[i] = diagonal_count(qlen, target_len, l);
            self.diag_start[i + 1] = self.diag_start[i] + self.diag_len[i];
        }

        let mask = delete_mask(l);
        let codes = target.codes();
        let mut code = 0u32;

        for (k, &c) in codes.iter().enumerate() {
            code = ((code << BITS_PER_SYMBOL) | c as u32) & mask;
            if k + 1 < l {
                continue;
            }
            let tstart = (k + 1 - l) as u32;

            for hit in index.hits_for(code) {
                let slot = hit.slot as usize;
                let dlen = self.diag_len[slot];
                let d = ((tstart as i64 - hit.position as i64 + dlen as i64) % dlen as i64
                    + self.diag_start[slot] as i64) as usize;

                self.scores[d] = self.scores[d].saturating_add(1);
                if self.scores[d] > self.max_score[slot] {
                    self.max_score[slot] = self.scores[d];
                }
            }
        }

        self.touched.clear();
        for slot in 0..group_len {
            if self.max_score[slot] > 0 {
                self.touched.push((slot as u32, self.max_score[slot]));
            }
        }

        // Clean up: only zero the ranges we might have touched, and only
        // for slots that actually had hits.
        for &(slot, _) in &self.touched {
            let slot = slot as usize;
            let start = self.diag_start[slot] as usize;
            let end = self.diag_start[slot + 1] as usize;
            self.scores[start..end].fill(0);
            self.max_score[slot] = 0;
        }

        &self.touched
    }
}
