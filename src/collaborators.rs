//! External collaborators downstream of candidate discovery: alignment,
//! e-value estimation and result formatting. These stay thin trait stubs —
//! full implementations are out of scope (spec Non-goals §1) — but the
//! CLI still wires concrete option enums through to them so the surface
//! a real `Aligner`/`Writer` would plug into is fixed now.

use crate::core::candidates::Candidate;
use crate::core::sequence::Sequence;

/// Pairwise alignment algorithm, matching the `-A/--algorithm` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Smith-Waterman (local).
    Sw,
    /// Needleman-Wunsch (global).
    Nw,
    /// Semi-global, query anchored (half-global).
    Hw,
    /// Overlap.
    Ov,
}

impl Algorithm {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SW" => Some(Algorithm::Sw),
            "NW" => Some(Algorithm::Nw),
            "HW" => Some(Algorithm::Hw),
            "OV" => Some(Algorithm::Ov),
            _ => None,
        }
    }
}

/// Result output format, matching the `-f/--outfmt` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pairwise alignment text.
    Bm0,
    /// Tabular, BLAST `-outfmt 6`-like.
    Bm8,
    /// Tabular with a header line.
    Bm9,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bm0" => Some(OutputFormat::Bm0),
            "bm8" => Some(OutputFormat::Bm8),
            "bm9" => Some(OutputFormat::Bm9),
            _ => None,
        }
    }
}

/// A full alignment between one query and one target candidate.
pub struct Alignment {
    pub query_id: u32,
    pub target_id: u32,
    pub score: i32,
}

/// Computes full alignments for candidates that survived the heuristic
/// filter. Not implemented in this pass (spec Non-goal): candidate
/// discovery hands off to this seam, it does not produce alignments.
pub trait Aligner {
    fn align(&self, query: &Sequence, target: &Sequence, algorithm: Algorithm) -> Alignment;
}

/// Estimates statistical significance of an alignment score against the
/// database size. Not implemented in this pass (spec Non-goal).
pub trait EValue {
    fn evalue(&self, alignment: &Alignment, database_len: usize) -> f64;
}

/// Serializes final results in one of the `OutputFormat` variants. Not
/// implemented in this pass (spec Non-goal): this crate stops at ranked
/// candidates, not formatted alignments.
pub trait Writer {
    fn write(&mut self, query: &Sequence, candidates: &[Candidate], format: OutputFormat) -> std::io::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_parses_case_insensitively() {
        assert_eq!(Algorithm::parse("sw"), Some(Algorithm::Sw));
        assert_eq!(Algorithm::parse("OV"), Some(Algorithm::Ov));
        assert_eq!(Algorithm::parse("xx"), None);
    }

    #[test]
    fn outfmt_parses_known_names() {
        assert_eq!(OutputFormat::parse("BM9"), Some(OutputFormat::Bm9));
        assert_eq!(OutputFormat::parse("bm0"), Some(OutputFormat::Bm0));
        assert_eq!(OutputFormat::parse("csv"), None);
    }
}
