//! Substitution table: for every possible k-mer, the set of k-mers whose
//! similarity score against it clears a threshold.
//!
//! Grounded on the original tool's `Kmers::createSubstitutionsShort` /
//! `createSubstitutionsLong` (long = all-pairs enumeration for L=3, short =
//! single-position mutation for L=4/5).

use crate::core::sequence::{delete_mask, pack_kmer, VALID_CODES};
use crate::score_matrix::ScoreMatrix;

/// Supported k-mer lengths. L=3 uses the symmetric all-pairs construction;
/// L=4/5 use the single-substitution construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KmerLength {
    Three,
    Four,
    Five,
}

impl KmerLength {
    pub fn parse(n: u32) -> Option<Self> {
        match n {
            3 => Some(KmerLength::Three),
            4 => Some(KmerLength::Four),
            5 => Some(KmerLength::Five),
            _ => None,
        }
    }

    #[inline]
    pub fn get(self) -> usize {
        match self {
            KmerLength::Three => 3,
            KmerLength::Four => 4,
            KmerLength::Five => 5,
        }
    }

    #[inline]
    pub fn delete_mask(self) -> u32 {
        delete_mask(self.get())
    }

    /// Size of the dense code space a k-mer of this length can pack into.
    /// Over-provisions relative to the true `20^L` combinatorial count
    /// (not every packed integer in `0..=delete_mask` is reachable, since 6
    /// of the 26 letter codes are unused) in exchange for O(1) indexing by
    /// the packed code straight off the rolling window — see DESIGN.md.
    #[inline]
    pub fn code_space(self) -> usize {
        self.delete_mask() as usize + 1
    }
}

/// Flat CSR-style mapping from k-mer code to its substitution neighbours.
pub struct SubstitutionTable {
    kmer_length: KmerLength,
    starts: Vec<u32>,
    neighbours: Vec<u32>,
}

impl SubstitutionTable {
    /// Build the table. When `threshold <= 0` the table has no neighbours
    /// for any key: only exact k-mer matches will contribute hits.
    pub fn build(kmer_length: KmerLength, matrix: &ScoreMatrix, threshold: i32) -> Self {
        let code_space = kmer_length.code_space();

        if threshold <= 0 {
            return SubstitutionTable {
                kmer_length,
                starts: vec![0; code_space + 1],
                neighbours: Vec::new(),
            };
        }

        let pairs = match kmer_length {
            KmerLength::Three => long_pairs(kmer_length.get(), matrix, threshold),
            KmerLength::Four | KmerLength::Five => {
                short_pairs(kmer_length.get(), matrix, threshold)
            }
        };

        Self::from_pairs(kmer_length, code_space, pairs)
    }

    fn from_pairs(kmer_length: KmerLength, code_space: usize, pairs: Vec<(u32, u32)>) -> Self {
        // Two-pass counting sort into a dense CSR buffer, same shape as the
        // query index (§4.C) this table feeds into.
        let mut starts = vec![0u32; code_space + 1];
        for &(key, _) in &pairs {
            starts[key as usize + 1] += 1;
        }
        for i in 0..code_space {
            starts[i + 1] += starts[i];
        }

        let mut neighbours = vec![0u32; pairs.len()];
        let mut cursor = starts.clone();
        for (key, neighbour) in pairs {
            let slot = &mut cursor[key as usize];
            neighbours[*slot as usize] = neighbour;
            *slot += 1;
        }

        SubstitutionTable {
            kmer_length,
            starts,
            neighbours,
        }
    }

    pub fn kmer_length(&self) -> KmerLength {
        self.kmer_length
    }

    /// Neighbours of `kmer`, excluding `kmer` itself. Callers must test the
    /// identity k-mer separately.
    pub fn neighbours(&self, kmer: u32) -> &[u32] {
        let k = kmer as usize;
        &self.neighbours[self.starts[k] as usize..self.starts[k + 1] as usize]
    }
}

/// All valid (non-ambiguous) k-mers of length `l`, as `(packed_code, digits)`.
fn enumerate_kmers(l: usize) -> Vec<(u32, Vec<u8>)> {
    let mut out = Vec::new();
    let mut current = Vec::with_capacity(l);
    enumerate_kmers_rec(l, &mut current, &mut out);
    out
}

fn enumerate_kmers_rec(remaining: usize, current: &mut Vec<u8>, out: &mut Vec<(u32, Vec<u8>)>) {
    if remaining == 0 {
        out.push((pack_kmer(current), current.clone()));
        return;
    }
    for &aa in &VALID_CODES {
        current.push(aa);
        enumerate_kmers_rec(remaining - 1, current, out);
        current.pop();
    }
}

fn score_digits(a: &[u8], b: &[u8], matrix: &ScoreMatrix) -> i32 {
    a.iter().zip(b).map(|(&x, &y)| matrix.score(x, y)).sum()
}

/// L=3 construction: enumerate all ordered pairs `(a, b)` with `a < b`;
/// symmetric by construction (both directions recorded).
fn long_pairs(l: usize, matrix: &ScoreMatrix, threshold: i32) -> Vec<(u32, u32)> {
    let kmers = enumerate_kmers(l);
    let mut pairs = Vec::new();
    for (i, (code_a, digits_a)) in kmers.iter().enumerate() {
        for (code_b, digits_b) in &kmers[i + 1..] {
            if score_digits(digits_a, digits_b, matrix) >= threshold {
                pairs.push((*code_a, *code_b));
                pairs.push((*code_b, *code_a));
            }
        }
    }
    pairs
}

/// L=4/5 construction: mutate one position at a time to every other amino
/// acid; symmetric by construction since every mutation is considered from
/// both k-mers' perspective as the enumeration visits every k-mer.
fn short_pairs(l: usize, matrix: &ScoreMatrix, threshold: i32) -> Vec<(u32, u32)> {
    let kmers = enumerate_kmers(l);
    let mut pairs = Vec::new();
    for (code_a, digits_a) in &kmers {
        for pos in 0..l {
            for &alt in &VALID_CODES {
                if alt == digits_a[pos] {
                    continue;
                }
                let mut digits_b = digits_a.clone();
                digits_b[pos] = alt;
                if score_digits(digits_a, &digits_b, matrix) >= threshold {
                    pairs.push((*code_a, pack_kmer(&digits_b)));
                }
            }
        }
    }
    pairs
}
