use super::parse_sequence;
use crate::cli::output::print_alignments;
use clap::Args;
use duplex_bio::alignment::{AlignerConfig, AlignmentAlgorithm, PairwiseAligner};
use duplex_bio::Alphabet;
use duplex_core::Config;

#[derive(Args)]
pub struct AlignArgs {
    /// Alignment algorithm (global, local, overlap)
    #[arg(short, long)]
    pub algorithm: Option<AlignmentAlgorithm>,

    /// Charge the gap open cost for every gap column
    #[arg(long)]
    pub simple: bool,

    /// diagonal(MATCH, MISMATCH), a standard matrix name (blosum62, pam250, ednafull, ...) or matrix file
    #[arg(short, long, value_name = "NAME|PATH")]
    pub matrix: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub gap_open: Option<i32>,

    #[arg(long, allow_negative_numbers = true)]
    pub gap_extension: Option<i32>,

    /// Sequence alphabet (dna, rna, protein); inferred when omitted
    #[arg(long)]
    pub alphabet: Option<Alphabet>,

    /// Maximum co-optimal tracebacks per origin
    #[arg(long = "co-optimal")]
    pub co_optimal: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// First (reference) sequence
    pub first: String,

    /// Second (query) sequence
    pub second: String,
}

pub fn run(args: AlignArgs, config: &Config) -> anyhow::Result<()> {
    let mut settings = config.pairwise.clone();
    if let Some(matrix) = args.matrix {
        settings.matrix = matrix;
    }
    if let Some(open) = args.gap_open {
        settings.gap_open = open;
    }
    if let Some(extension) = args.gap_extension {
        settings.gap_extension = extension;
    }
    if let Some(limit) = args.co_optimal {
        settings.co_optimal_limit = limit;
    }

    let algorithm = match args.algorithm {
        Some(algorithm) => algorithm,
        None => settings.algorithm.parse()?,
    };
    let aligner = PairwiseAligner::new(algorithm, AlignerConfig::from_settings(&settings)?);

    let first = parse_sequence(args.alphabet, &args.first, "first".to_string())?;
    let second = parse_sequence(args.alphabet, &args.second, "second".to_string())?;

    tracing::debug!(
        "Aligning {} x {} symbols with {} ({})",
        first.len(),
        second.len(),
        algorithm,
        settings.matrix
    );

    let result = if args.simple {
        aligner.align_simple(&first, &second)?
    } else {
        aligner.align(&first, &second)?
    };

    print_alignments(&result, args.json)
}
