use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use kmersearch::cli::opts::Cli;
use kmersearch::core::candidates::CandidateStore;
use kmersearch::core::kmers::{KmerLength, SubstitutionTable};
use kmersearch::core::scheduler::{scan_chunk, CHUNK_BYTES};
use kmersearch::core::sequence::Sequence;
use kmersearch::io::reader::{FastaReader, Reader};
use kmersearch::score_matrix::ScoreMatrix;

fn main() {
    if let Err(e) = run() {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
    std::process::exit(0);
}

fn run() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let cfg = cli.resolve().context("validating configuration")?;

    let kmer_length =
        KmerLength::parse(cfg.kmer_length).expect("clap value_parser already bounds this to 3..=5");

    let matrix = ScoreMatrix::load(cfg.matrix, cfg.gap_open, cfg.gap_extend);
    let table = SubstitutionTable::build(kmer_length, &matrix, cfg.threshold);

    let mut queries = Vec::new();
    let mut query_reader = FastaReader::new(BufReader::new(
        File::open(&cfg.query).with_context(|| format!("opening query file {:?}", cfg.query))?,
    ));
    loop {
        if !query_reader.read_chains(&mut queries, usize::MAX)? {
            break;
        }
    }
    log::info!("loaded {} query sequences", queries.len());

    rayon::ThreadPoolBuilder::new()
        .num_threads(cfg.threads)
        .build_global()
        .context("building worker thread pool")?;

    let store = Arc::new(CandidateStore::new(queries.len(), cfg.max_candidates));

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} scanned {pos} target chunks [{elapsed_precise}]")
            .unwrap(),
    );

    let mut target_reader = FastaReader::new(BufReader::new(
        File::open(&cfg.target).with_context(|| format!("opening target file {:?}", cfg.target))?,
    ));

    loop {
        let mut chunk: Vec<Sequence> = Vec::new();
        let more = target_reader.read_chains(&mut chunk, CHUNK_BYTES)?;
        scan_chunk(&queries, &chunk, &table, kmer_length.get(), cfg.threads, &store);
        pb.inc(1);
        if !more {
            break;
        }
    }
    pb.finish_with_message("scan complete");

    let mut out: Box<dyn Write> = match &cfg.out {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating output file {:?}", path))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout())),
    };

    let indexes = store.into_indexes();
    for query in &queries {
        for &target_id in &indexes[query.id() as usize] {
            writeln!(out, "{}\t{}", query.name(), target_id)?;
        }
    }

    log::info!("elapsed: {:.2?}", start_time.elapsed());
    Ok(())
}
