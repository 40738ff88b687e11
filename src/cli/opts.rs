use clap::{value_parser, Parser};
use std::path::PathBuf;

use crate::collaborators::{Algorithm, OutputFormat};
use crate::error::CoreError;
use crate::score_matrix::MatrixName;

/// Command-line options for the candidate-discovery search tool.
#[derive(Parser, Debug)]
#[command(
    name = "kmersearch",
    about = "K-mer indexed heuristic candidate search for protein sequence databases",
    version = "0.0.1"
)]
pub struct Cli {
    /// Query FASTA file [path]
    #[clap(short = 'i', long, value_parser, required = true, help_heading = "Core")]
    pub query: PathBuf,

    /// Target database FASTA file [path]
    #[clap(short = 'j', long, value_parser, required = true, help_heading = "Core")]
    pub target: PathBuf,

    /// Gap open penalty, passed through to alignment [integer]
    #[clap(short = 'g', long, default_value = "10", help_heading = "Scoring")]
    pub gap_open: i32,

    /// Gap extend penalty, passed through to alignment [integer]
    #[clap(short = 'e', long, default_value = "1", help_heading = "Scoring")]
    pub gap_extend: i32,

    /// Similarity matrix name [string]
    #[clap(short = 'm', long, default_value = "BLOSUM_62", help_heading = "Scoring")]
    pub matrix: String,

    /// Output file [path] (default: stdout)
    #[clap(short = 'o', long, value_parser, help_heading = "Output")]
    pub out: Option<PathBuf>,

    /// Output format: bm0, bm8 or bm9 [string]
    #[clap(short = 'f', long, default_value = "bm9", help_heading = "Output")]
    pub outfmt: String,

    /// E-value significance cutoff [float]
    #[clap(short = 'v', long, default_value = "10.0", help_heading = "Output")]
    pub evalue: f64,

    /// Maximum alignments reported per query [integer]
    #[clap(short = 'a', long, default_value = "10", help_heading = "Output")]
    pub max_aligns: usize,

    /// Alignment algorithm: SW, NW, HW or OV [string]
    #[clap(short = 'A', long, default_value = "SW", help_heading = "Scoring")]
    pub algorithm: String,

    /// K-mer seed length: 3, 4 or 5 [integer]
    #[clap(short = 'k', long, default_value = "3", value_parser = value_parser!(u32).range(3..=5), help_heading = "Core")]
    pub kmer_length: u32,

    /// Maximum candidates retained per query before alignment [integer]
    #[clap(short = 'c', long, default_value = "30000", help_heading = "Core")]
    pub max_candidates: usize,

    /// Minimum substitution score for a k-mer to seed a hit [integer]
    #[clap(short = 'T', long, default_value = "13", help_heading = "Core")]
    pub threshold: i32,

    /// Worker thread count [integer] (default: half of hardware concurrency)
    #[clap(short = 't', long, help_heading = "Core")]
    pub threads: Option<usize>,

    /// Enable verbose logging [flag]
    #[clap(long, help_heading = "Core")]
    pub verbose: bool,
}

/// Validated, typed configuration derived from [`Cli`]. Validation runs
/// once at start-up, before any I/O, so a bad flag fails fast.
pub struct Config {
    pub query: PathBuf,
    pub target: PathBuf,
    pub gap_open: i32,
    pub gap_extend: i32,
    pub matrix: MatrixName,
    pub out: Option<PathBuf>,
    pub outfmt: OutputFormat,
    pub evalue: f64,
    pub max_aligns: usize,
    pub algorithm: Algorithm,
    pub kmer_length: u32,
    pub max_candidates: usize,
    pub threshold: i32,
    pub threads: usize,
}

impl Cli {
    pub fn resolve(self) -> Result<Config, CoreError> {
        let matrix = MatrixName::parse(&self.matrix)?;

        let outfmt = OutputFormat::parse(&self.outfmt).ok_or_else(|| {
            CoreError::InvalidConfiguration(format!(
                "unknown output format {:?} (supported: bm0, bm8, bm9)",
                self.outfmt
            ))
        })?;

        let algorithm = Algorithm::parse(&self.algorithm).ok_or_else(|| {
            CoreError::InvalidConfiguration(format!(
                "unknown algorithm {:?} (supported: SW, NW, HW, OV)",
                self.algorithm
            ))
        })?;

        if self.max_candidates == 0 {
            return Err(CoreError::InvalidConfiguration(
                "max-candidates must be at least 1".to_string(),
            ));
        }

        let threads = match self.threads {
            Some(0) => {
                return Err(CoreError::InvalidConfiguration(
                    "threads must be at least 1".to_string(),
                ))
            }
            Some(t) => t,
            None => (std::thread::available_parallelism().map(|n| n.get()).unwrap_or(2) / 2).max(1),
        };

        Ok(Config {
            query: self.query,
            target: self.target,
            gap_open: self.gap_open,
            gap_extend: self.gap_extend,
            matrix,
            out: self.out,
            outfmt,
            evalue: self.evalue,
            max_aligns: self.max_aligns,
            algorithm,
            kmer_length: self.kmer_length,
            max_candidates: self.max_candidates,
            threshold: self.threshold,
            threads,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli_from(args: &[&str]) -> Cli {
        let mut full = vec!["kmersearch"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    #[test]
    fn rejects_unknown_output_format() {
        let cli = cli_from(&["-i", "q.fa", "-j", "t.fa", "-f", "xml"]);
        assert!(cli.resolve().is_err());
    }

    #[test]
    fn rejects_zero_max_candidates() {
        let cli = cli_from(&["-i", "q.fa", "-j", "t.fa", "-c", "0"]);
        assert!(cli.resolve().is_err());
    }

    #[test]
    fn defaults_resolve_cleanly() {
        let cli = cli_from(&["-i", "q.fa", "-j", "t.fa"]);
        let cfg = cli.resolve().unwrap();
        assert_eq!(cfg.kmer_length, 3);
        assert_eq!(cfg.max_candidates, 30_000);
        assert!(cfg.threads >= 1);
    }
}
