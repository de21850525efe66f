use super::parse_sequence;
use crate::cli::output::print_alignments;
use clap::Args;
use duplex_bio::nucmer::{NucmerAligner, NucmerConfig};
use duplex_bio::{Alphabet, Sequence};
use duplex_core::Config;

#[derive(Args)]
pub struct NucmerArgs {
    /// Reference sequences
    #[arg(short, long = "reference", num_args = 1.., required = true)]
    pub references: Vec<String>,

    /// Query sequences
    #[arg(short, long = "query", num_args = 1.., required = true)]
    pub queries: Vec<String>,

    /// Minimum length of a maximal unique match
    #[arg(long)]
    pub mum_length: Option<usize>,

    /// Minimum total match length of a cluster
    #[arg(long)]
    pub min_score: Option<i64>,

    /// Distance below which clusters are always joined
    #[arg(long)]
    pub break_length: Option<usize>,

    /// Skip the reverse complement of each query
    #[arg(long)]
    pub forward_only: bool,

    /// Charge the gap open cost for every gap column
    #[arg(long)]
    pub simple: bool,

    /// Nucleotide alphabet (dna, rna)
    #[arg(long, default_value = "dna")]
    pub alphabet: Alphabet,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: NucmerArgs, config: &Config) -> anyhow::Result<()> {
    let mut settings = config.nucmer.clone();
    if let Some(length) = args.mum_length {
        settings.length_of_mum = length;
    }
    if let Some(score) = args.min_score {
        settings.minimum_score = score;
    }
    if let Some(length) = args.break_length {
        settings.break_length = length;
    }
    if args.forward_only {
        settings.forward_only = true;
    }

    let aligner = NucmerAligner::new(NucmerConfig::from_settings(&settings)?);
    let references = build_set(args.alphabet, &args.references, "reference")?;
    let queries = build_set(args.alphabet, &args.queries, "query")?;

    let result = if args.simple {
        aligner.align_simple(&references, &queries)?
    } else {
        aligner.align(&references, &queries)?
    };

    print_alignments(&result, args.json)
}

fn build_set(alphabet: Alphabet, texts: &[String], prefix: &str) -> anyhow::Result<Vec<Sequence>> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| Ok(parse_sequence(Some(alphabet), text, format!("{}{}", prefix, i + 1))?))
        .collect()
}
