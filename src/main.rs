/*!
# repair-seq CLI

Command-line front end for turning change-annotated commit-file corpora into
sequence datasets.
*/

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use repair_seq::abstraction::AbstractionSettings;
use repair_seq::cli_common::{
    self, format_duration, print_error, print_info, print_success, print_warning, CommonArgs,
    CorpusArgs, ProgressReporter, SeqArgs,
};
use repair_seq::config::PipelineConfig;
use repair_seq::corpus::{
    abstracted_record, annotated_record, build_folds, filter_directory, mine_record,
    mutant_record, read_lines, BucketAssigner, Category, CommitFile, RecordOutput, SequencePair,
    SequenceSink, SplitOptions,
};
use repair_seq::vocabulary::{save_words, Vocabulary, VocabularyBuilder};

#[derive(Parser)]
#[command(
    name = "repair-seq",
    version = env!("CARGO_PKG_VERSION"),
    about = "Sequence dataset preparation for program repair models"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Mine the top-K vocabulary from MUTANT_REPAIR after-trees
    Vocab {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Vocabulary size (overrides the config)
        #[arg(long)]
        size: Option<usize>,

        /// Output word list, one word per line
        #[arg(short, long, default_value = "output/vocab.txt")]
        output: PathBuf,
    },

    /// Write change-annotated before/after sequences
    Sequences {
        #[command(flatten)]
        corpus: CorpusArgs,

        #[command(flatten)]
        seq: SeqArgs,
    },

    /// Write abstracted before/after sequences bucketed by pair type
    Abstract {
        #[command(flatten)]
        corpus: CorpusArgs,

        #[command(flatten)]
        seq: SeqArgs,

        /// Vocabulary file; without it only depth abstraction runs
        #[arg(long)]
        vocab: Option<PathBuf>,
    },

    /// Write missing-try mutant sequences of every after-tree
    Mutants {
        #[command(flatten)]
        corpus: CorpusArgs,

        #[command(flatten)]
        seq: SeqArgs,
    },

    /// Drop sequence pairs longer than the maximum length
    Filter {
        /// Directory holding the `.buggy`/`.correct` files
        #[arg(long)]
        dir: PathBuf,

        /// Output directory
        #[arg(long)]
        out: PathBuf,

        /// Maximum tokens per sequence (overrides the config)
        #[arg(long)]
        max_length: Option<usize>,
    },

    /// Split `.seq` files into cross-validation folds
    Xvalid {
        /// Directory holding the `.seq` files
        #[arg(long)]
        dir: PathBuf,

        /// File name prefix of the `.seq` files
        #[arg(long, default_value = "seq")]
        prefix: String,

        /// Output directory
        #[arg(long)]
        out: PathBuf,

        /// Number of folds (overrides the config)
        #[arg(long)]
        folds: Option<usize>,
    },
}

/// Counters printed after a corpus run
#[derive(Debug, Default)]
struct RunSummary {
    records: usize,
    malformed_records: usize,
    sequences: usize,
    failed_pairs: usize,
}

impl RunSummary {
    fn report(&self, elapsed: &str, common: &CommonArgs) {
        info!(
            records = self.records,
            malformed = self.malformed_records,
            sequences = self.sequences,
            failed_pairs = self.failed_pairs,
            "corpus processed"
        );
        if !common.should_print() {
            return;
        }
        print_success(&format!(
            "Wrote {} sequences from {} records in {}",
            self.sequences, self.records, elapsed
        ));
        if self.malformed_records > 0 || self.failed_pairs > 0 {
            print_warning(&format!(
                "Skipped {} malformed records and {} failed pairs",
                self.malformed_records, self.failed_pairs
            ));
        }
    }
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    cli_common::init_logging(cli.common.log_level())?;

    let config = PipelineConfig::load_or_default(cli.common.config.as_deref())?;
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Vocab {
            corpus,
            size,
            output,
        } => vocab_command(&corpus, size.unwrap_or(config.vocabulary.size), &output, &cli.common),
        Commands::Sequences { corpus, seq } => {
            sequences_command(&corpus, &seq, &config, &cli.common)
        }
        Commands::Abstract { corpus, seq, vocab } => {
            abstract_command(&corpus, &seq, vocab.as_deref(), &config, &cli.common)
        }
        Commands::Mutants { corpus, seq } => mutants_command(&corpus, &seq, &config, &cli.common),
        Commands::Filter {
            dir,
            out,
            max_length,
        } => filter_command(
            &dir,
            &out,
            max_length.unwrap_or(config.dataset.max_length),
            &cli.common,
        ),
        Commands::Xvalid {
            dir,
            prefix,
            out,
            folds,
        } => {
            let options = SplitOptions {
                folds: folds.unwrap_or(config.dataset.folds),
                buckets: config.dataset.buckets,
                nominal_sample_every: config.dataset.nominal_sample_every,
            };
            xvalid_command(&dir, &prefix, &out, &options, &cli.common)
        }
    }
}

/// Reads the corpus, honoring `--max`
fn load_corpus(args: &CorpusArgs) -> Result<Vec<String>> {
    args.validate().map_err(anyhow::Error::msg)?;
    let mut lines = read_lines(&args.code)?;
    if let Some(max) = args.max {
        lines.truncate(max);
    }
    info!(path = %args.code.display(), records = lines.len(), "corpus loaded");
    Ok(lines)
}

/// Parses and processes every record in parallel. Output order follows the
/// corpus so bucket assignment stays deterministic.
fn process_records<T, F>(
    lines: &[String],
    message: &str,
    common: &CommonArgs,
    process: F,
) -> Vec<Option<RecordOutput<T>>>
where
    T: Send,
    F: Fn(&CommitFile) -> RecordOutput<T> + Sync,
{
    let progress = ProgressReporter::new(lines.len(), message, common.should_print());
    let bar = progress.handle();

    let outputs = lines
        .par_iter()
        .enumerate()
        .map(|(index, line)| {
            let output = match CommitFile::from_line(line) {
                Ok(record) => Some(process(&record)),
                Err(e) => {
                    warn!(line = index + 1, error = %e, "skipping malformed record");
                    None
                }
            };
            bar.inc(1);
            output
        })
        .collect();

    let elapsed = progress.finish();
    debug!(elapsed = %elapsed, "records processed");
    outputs
}

/// Writes every item to its project's bucket sequentially
fn write_outputs<T, W>(
    outputs: Vec<Option<RecordOutput<T>>>,
    buckets: usize,
    sink: &mut SequenceSink,
    mut write: W,
) -> Result<RunSummary>
where
    W: FnMut(&mut SequenceSink, usize, T) -> Result<usize>,
{
    let mut assigner = BucketAssigner::new(buckets);
    let mut summary = RunSummary::default();

    for output in outputs {
        summary.records += 1;
        let Some(output) = output else {
            summary.malformed_records += 1;
            continue;
        };
        for (pair, error) in &output.failures {
            warn!(project = %output.project_id, pair, error = %error, "skipping pair");
        }
        summary.failed_pairs += output.failures.len();

        let bucket = assigner.assign(&output.project_id);
        for item in output.items {
            summary.sequences += write(sink, bucket, item)?;
        }
    }

    debug!(projects = assigner.projects(), "bucket assignment done");
    Ok(summary)
}

fn write_sequence_pair(sink: &mut SequenceSink, bucket: usize, pair: SequencePair) -> Result<usize> {
    sink.write_pair(pair.category, Some(bucket), &pair.buggy, &pair.correct)?;
    Ok(1)
}

fn finish_sink(sink: SequenceSink) -> Result<()> {
    for (path, lines) in sink.finish()? {
        debug!(path = %path.display(), lines, "sequence file written");
    }
    Ok(())
}

fn vocab_command(args: &CorpusArgs, size: usize, output: &Path, common: &CommonArgs) -> Result<()> {
    let start_time = Instant::now();
    let lines = load_corpus(args)?;
    let mut builder = VocabularyBuilder::new(size).context("Invalid vocabulary size")?;

    let progress = ProgressReporter::new(lines.len(), "Mining vocabulary", common.should_print());
    let mut failures = 0;
    for (index, line) in lines.iter().enumerate() {
        match CommitFile::from_line(line) {
            Ok(record) => failures += mine_record(&mut builder, &record),
            Err(e) => {
                warn!(line = index + 1, error = %e, "skipping malformed record");
                failures += 1;
            }
        }
        progress.inc();
    }
    progress.finish();

    let words = builder.top_words();
    save_words(output, &words)?;

    info!(
        trees = builder.ast_count(),
        words = words.len(),
        failures,
        "vocabulary mined"
    );
    if common.should_print() {
        print_success(&format!(
            "Saved {} words from {} trees to {} in {}",
            words.len(),
            builder.ast_count(),
            output.display(),
            format_duration(start_time.elapsed())
        ));
    }
    Ok(())
}

fn sequences_command(
    args: &CorpusArgs,
    seq: &SeqArgs,
    config: &PipelineConfig,
    common: &CommonArgs,
) -> Result<()> {
    let start_time = Instant::now();
    let lines = load_corpus(args)?;
    let outputs = process_records(&lines, "Generating sequences", common, annotated_record);

    let mut sink = SequenceSink::new(&seq.seq)?;
    let summary = write_outputs(outputs, config.dataset.buckets, &mut sink, write_sequence_pair)?;
    finish_sink(sink)?;

    summary.report(&format_duration(start_time.elapsed()), common);
    Ok(())
}

fn abstract_command(
    args: &CorpusArgs,
    seq: &SeqArgs,
    vocab_path: Option<&Path>,
    config: &PipelineConfig,
    common: &CommonArgs,
) -> Result<()> {
    let start_time = Instant::now();
    let settings: AbstractionSettings = config.abstraction.settings()?;
    let vocabulary = vocab_path.map(Vocabulary::load_from_file).transpose()?;
    match &vocabulary {
        Some(vocabulary) => info!(words = vocabulary.len(), "vocabulary loaded"),
        None if common.should_print() => {
            print_info("No vocabulary given, identifiers and literals stay concrete")
        }
        None => {}
    }

    let lines = load_corpus(args)?;
    let outputs = process_records(&lines, "Abstracting sequences", common, |record| {
        abstracted_record(record, &settings, vocabulary.as_ref())
    });

    let mut sink = SequenceSink::new(&seq.seq)?;
    let summary = write_outputs(outputs, config.dataset.buckets, &mut sink, write_sequence_pair)?;
    finish_sink(sink)?;

    summary.report(&format_duration(start_time.elapsed()), common);
    Ok(())
}

fn mutants_command(
    args: &CorpusArgs,
    seq: &SeqArgs,
    config: &PipelineConfig,
    common: &CommonArgs,
) -> Result<()> {
    let start_time = Instant::now();
    let lines = load_corpus(args)?;
    let outputs = process_records(&lines, "Generating mutants", common, mutant_record);

    let mut sink = SequenceSink::new(&seq.seq)?;
    let summary = write_outputs(outputs, config.dataset.buckets, &mut sink, |sink, bucket, set| {
        sink.write_sequence(set.category, Some(bucket), &set.original)?;
        for mutant in &set.mutants {
            sink.write_sequence(Category::Mutant, Some(bucket), mutant)?;
        }
        Ok(1 + set.mutants.len())
    })?;
    finish_sink(sink)?;

    summary.report(&format_duration(start_time.elapsed()), common);
    Ok(())
}

fn filter_command(dir: &Path, out: &Path, max_length: usize, common: &CommonArgs) -> Result<()> {
    cli_common::validate_path(dir, "Sequence directory")?;
    let start_time = Instant::now();

    let results = filter_directory(dir, out, max_length)?;
    let kept: usize = results.values().map(|stats| stats.kept).sum();
    let dropped: usize = results.values().map(|stats| stats.dropped).sum();

    if common.should_print() {
        print_success(&format!(
            "Kept {} pairs, dropped {} longer than {} tokens across {} files in {}",
            kept,
            dropped,
            max_length,
            results.len(),
            format_duration(start_time.elapsed())
        ));
    }
    Ok(())
}

fn xvalid_command(
    dir: &Path,
    prefix: &str,
    out: &Path,
    options: &SplitOptions,
    common: &CommonArgs,
) -> Result<()> {
    cli_common::validate_path(dir, "Sequence directory")?;
    if options.folds == 0 || options.folds > options.buckets {
        anyhow::bail!(
            "Number of folds must be between 1 and {} buckets",
            options.buckets
        );
    }
    let start_time = Instant::now();

    let results = build_folds(dir, prefix, out, options)?;

    if common.should_print() {
        for (fold, stats) in &results {
            print_info(&format!(
                "fold {}: {} train, {} test",
                fold, stats.train, stats.test
            ));
        }
        print_success(&format!(
            "Built {} folds in {} ({})",
            results.len(),
            out.display(),
            format_duration(start_time.elapsed())
        ));
    }
    Ok(())
}
