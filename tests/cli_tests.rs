/// Command-line parsing and configuration layering
use clap::Parser;
use duplex::bio::alignment::AlignmentAlgorithm;
use duplex::bio::Alphabet;
use duplex::cli::commands::{align, nucmer};
use duplex::cli::{load_settings, log_level, Cli, Commands};
use duplex::DuplexError;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_parse_align_command() {
    let cli = Cli::try_parse_from([
        "duplex",
        "-vv",
        "align",
        "--algorithm",
        "local",
        "--gap-open",
        "-8",
        "--gap-extension",
        "-1",
        "--alphabet",
        "protein",
        "HEAGAWGHEE",
        "PAWHEAE",
    ])
    .unwrap();

    assert_eq!(cli.verbose, 2);
    match cli.command {
        Commands::Align(args) => {
            assert_eq!(args.algorithm, Some(AlignmentAlgorithm::SmithWaterman));
            assert_eq!(args.gap_open, Some(-8));
            assert_eq!(args.gap_extension, Some(-1));
            assert_eq!(args.alphabet, Some(Alphabet::Protein));
            assert_eq!(args.first, "HEAGAWGHEE");
            assert!(!args.simple);
        }
        _ => panic!("Expected align command"),
    }
}

#[test]
fn test_parse_nucmer_command() {
    let cli = Cli::try_parse_from([
        "duplex",
        "nucmer",
        "--reference",
        "ATGCGCATCCCCTAGCT",
        "TAGCT",
        "--query",
        "CCGCGCCCCCTCAGCT",
        "--mum-length",
        "3",
        "--forward-only",
    ])
    .unwrap();

    match cli.command {
        Commands::Nucmer(args) => {
            assert_eq!(args.references.len(), 2);
            assert_eq!(args.queries, vec!["CCGCGCCCCCTCAGCT".to_string()]);
            assert_eq!(args.mum_length, Some(3));
            assert!(args.forward_only);
            assert_eq!(args.alphabet, Alphabet::Dna);
        }
        _ => panic!("Expected nucmer command"),
    }
}

#[test]
fn test_nucmer_requires_queries() {
    assert!(Cli::try_parse_from(["duplex", "nucmer", "--reference", "ACGT"]).is_err());
}

#[test]
fn test_config_file_layering() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[pairwise]\nalgorithm = \"smith-waterman\"\nmatrix = \"blosum62\"\n\n[logging]\nlevel = \"warn\""
    )
    .unwrap();

    let config = load_settings(Some(file.path())).unwrap();
    assert_eq!(config.pairwise.algorithm, "smith-waterman");
    assert_eq!(config.pairwise.gap_open, -8);
    assert_eq!(config.nucmer.length_of_mum, 20);
    assert_eq!(log_level(0, &config.logging.level), "warn");
    assert_eq!(log_level(1, &config.logging.level), "debug");
    assert_eq!(log_level(3, &config.logging.level), "trace");
}

#[test]
fn test_missing_config_is_io_error() {
    let err = load_settings(Some(std::path::Path::new("/nonexistent/duplex.toml"))).unwrap_err();
    assert!(matches!(err, DuplexError::Io(_)));
}

#[test]
fn test_run_commands() {
    let config = load_settings(None).unwrap();

    let cli = Cli::try_parse_from(["duplex", "align", "--json", "GAATTCAGTTA", "GGATCGA"]).unwrap();
    if let Commands::Align(args) = cli.command {
        align::run(args, &config).unwrap();
    }

    let cli = Cli::try_parse_from([
        "duplex",
        "nucmer",
        "-r",
        "AGAAAAGTTTTCA",
        "-q",
        "TTTTGAGATAAAATC",
        "--mum-length",
        "3",
        "--min-score",
        "2",
    ])
    .unwrap();
    if let Commands::Nucmer(args) = cli.command {
        nucmer::run(args, &config).unwrap();
    }
}

#[test]
fn test_bad_configured_algorithm_is_configuration_error() {
    let mut config = load_settings(None).unwrap();
    config.pairwise.algorithm = "banded".to_string();

    let cli = Cli::try_parse_from(["duplex", "align", "ACGT", "ACGT"]).unwrap();
    let Commands::Align(args) = cli.command else {
        panic!("Expected align command");
    };
    let err = align::run(args, &config).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DuplexError>(),
        Some(DuplexError::Configuration(_))
    ));
}
