/// Integration tests for the pairwise aligners
use duplex_bio::alignment::dp::{self, DpMode, GapModel};
use duplex_bio::alignment::{
    compare_alignments, AlignerConfig, AlignmentAlgorithm, GapCosts, PairwiseAligner,
    PairwiseSequenceAlignment,
};
use duplex_bio::{Alphabet, Sequence, SimilarityMatrix, StandardMatrix};
use duplex_core::DuplexError;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use test_case::test_case;

fn protein(text: &str) -> Sequence {
    Sequence::new(Alphabet::Protein, text).unwrap()
}

fn dna(text: &str) -> Sequence {
    Sequence::new(Alphabet::Dna, text).unwrap()
}

fn aligner(algorithm: AlignmentAlgorithm) -> PairwiseAligner {
    PairwiseAligner::with_defaults(algorithm)
}

fn blosum62() -> SimilarityMatrix {
    SimilarityMatrix::standard(StandardMatrix::Blosum62)
}

/// (first, second, score, first_offset, second_offset) per fragment
fn fragments(result: &[PairwiseSequenceAlignment]) -> Vec<(String, String, i64, usize, usize)> {
    result
        .iter()
        .flat_map(|a| a.aligned_sequences.iter())
        .map(|f| {
            (
                f.first.to_string(),
                f.second.to_string(),
                f.score,
                f.first_offset,
                f.second_offset,
            )
        })
        .collect()
}

fn row(first: &str, second: &str, score: i64, offsets: (usize, usize)) -> (String, String, i64, usize, usize) {
    (first.to_string(), second.to_string(), score, offsets.0, offsets.1)
}

#[test]
fn test_smith_waterman_protein() {
    let sw = aligner(AlignmentAlgorithm::SmithWaterman);
    let (a, b) = (protein("HEAGAWGHEE"), protein("PAWHEAE"));

    let simple = sw.align_simple_with(&blosum62(), -8, &a, &b).unwrap();
    assert_eq!(fragments(&simple), vec![row("AWGHE", "AW-HE", 20, (0, 3))]);

    let affine = sw.align_with(&blosum62(), -8, -1, &a, &b).unwrap();
    assert_eq!(fragments(&affine), vec![row("AWGHE", "AW-HE", 20, (0, 3))]);
}

#[test_case("AAATTCCCAG", "AAAGCCC", -20, vec![("AAA", "AAA", 15, (0, 0)), ("CCC", "CCC", 15, (0, 1))] ; "two blocks separated by mismatches")]
#[test_case("AAAAGGGGGGCCCC", "AAAATTTTTTTCCCC", -4, vec![("AAAA", "AAAA", 20, (0, 0)), ("CCCC", "CCCC", 20, (1, 0))] ; "two blocks around a divergent core")]
fn test_smith_waterman_multiple_fragments(
    first: &str,
    second: &str,
    mismatch: i32,
    expected: Vec<(&str, &str, i64, (usize, usize))>,
) {
    let matrix = SimilarityMatrix::diagonal(5, mismatch);
    let result = aligner(AlignmentAlgorithm::SmithWaterman)
        .align_simple_with(&matrix, -5, &dna(first), &dna(second))
        .unwrap();

    let expected: Vec<_> = expected
        .into_iter()
        .map(|(a, b, s, o)| row(a, b, s, o))
        .collect();
    assert_eq!(fragments(&result), expected);
}

#[test]
fn test_needleman_wunsch_protein_simple() {
    let result = aligner(AlignmentAlgorithm::NeedlemanWunsch)
        .align_simple_with(&blosum62(), -8, &protein("HEAGAWGHEE"), &protein("PAWHEAE"))
        .unwrap();

    assert_eq!(fragments(&result), vec![row("HEAGAWGHE-E", "-PA--W-HEAE", -8, (0, 0))]);
    assert_eq!(result[0].aligned_sequences[0].consensus.to_string(), "HXAGAWGHEAE");
}

#[test]
fn test_needleman_wunsch_protein_affine() {
    let result = aligner(AlignmentAlgorithm::NeedlemanWunsch)
        .align_with(&blosum62(), -8, -1, &protein("HEAGAWGHEE"), &protein("PAWHEAE"))
        .unwrap();

    assert_eq!(fragments(&result), vec![row("HEAGAWGHE-E", "P---AW-HEAE", 5, (0, 0))]);
    assert_eq!(result[0].aligned_sequences[0].consensus.to_string(), "XEAGAWGHEAE");
    assert_eq!(result[0].metadata["gap_model"], "affine");
}

#[test]
fn test_needleman_wunsch_dna_consensus() {
    let result = aligner(AlignmentAlgorithm::NeedlemanWunsch)
        .align_simple_with(
            &SimilarityMatrix::diagonal(2, -1),
            -2,
            &dna("GAATTCAGTTA"),
            &dna("GGATCGA"),
        )
        .unwrap();

    assert_eq!(fragments(&result), vec![row("GAATTCAGTTA", "GGAT-C-G--A", 3, (0, 0))]);
    assert_eq!(result[0].aligned_sequences[0].consensus.to_string(), "GRATTCAGTTA");
}

#[test]
fn test_overlap_two_placements() {
    let result = aligner(AlignmentAlgorithm::PairwiseOverlap)
        .align_simple_with(&SimilarityMatrix::diagonal(5, -20), -10, &dna("CCCAACCC"), &dna("CCC"))
        .unwrap();

    assert_eq!(
        fragments(&result),
        vec![row("CCC", "CCC", 15, (0, 0)), row("CCC", "CCC", 15, (0, 5))]
    );
}

#[test_case(StandardMatrix::Blosum50, 25 ; "blosum50")]
#[test_case(StandardMatrix::Blosum62, 17 ; "blosum62")]
fn test_overlap_protein(standard: StandardMatrix, score: i64) {
    let result = aligner(AlignmentAlgorithm::PairwiseOverlap)
        .align_simple_with(
            &SimilarityMatrix::standard(standard),
            -8,
            &protein("HEAGAWGHEE"),
            &protein("PAWHEAE"),
        )
        .unwrap();
    assert_eq!(fragments(&result), vec![row("GAWGHEE", "PAW-HEA", score, (0, 3))]);
}

#[test]
fn test_overlap_without_positive_overlap_is_empty() {
    let result = aligner(AlignmentAlgorithm::PairwiseOverlap)
        .align_with(&SimilarityMatrix::diagonal(5, -5), -10, -1, &protein("ACDEF"), &protein("TVWYK"))
        .unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_align_list_requires_two_sequences() {
    let nw = aligner(AlignmentAlgorithm::NeedlemanWunsch);
    let err = nw.align_list(&[dna("ACGT")]).unwrap_err();
    assert!(matches!(err, DuplexError::WrongArgumentCount(1)));

    let result = nw.align_list(&[dna("ACGT"), dna("ACGT")]).unwrap();
    assert_eq!(result[0].aligned_sequences[0].first.to_string(), "ACGT");
}

#[test]
fn test_matrix_coverage_is_checked() {
    let ednafull = SimilarityMatrix::standard(StandardMatrix::EdnaFull);
    let err = aligner(AlignmentAlgorithm::NeedlemanWunsch)
        .align_with(&ednafull, -10, -1, &protein("ACGT"), &protein("ACGE"))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        DuplexError::IncompatibleMatrix(
            "EDNAFull does not cover symbol 'E' at position 3 of the second sequence".to_string()
        )
        .to_string()
    );
}

#[test]
fn test_size_guard() {
    let long = dna(&"A".repeat(46_345));
    let err = aligner(AlignmentAlgorithm::SmithWaterman)
        .align(&long, &long)
        .unwrap_err();
    assert!(matches!(err, DuplexError::SequenceTooLarge(_)));
}

#[test]
fn test_configured_aligner() {
    let config = AlignerConfig::builder()
        .matrix(blosum62())
        .gap_open(-8)
        .gap_extension(-8)
        .build()
        .unwrap();
    let sw = PairwiseAligner::new(AlignmentAlgorithm::SmithWaterman, config);

    let result = sw.align(&protein("HEAGAWGHEE"), &protein("PAWHEAE")).unwrap();
    assert_eq!(fragments(&result), vec![row("AWGHE", "AW-HE", 20, (0, 3))]);
    assert_eq!(result[0].metadata["gap_model"], "simple");
}

fn dna_text() -> impl Strategy<Value = String> {
    "[ACGT]{1,24}"
}

proptest! {
    #[test]
    fn prop_global_keeps_every_symbol(a in dna_text(), b in dna_text()) {
        let result = aligner(AlignmentAlgorithm::NeedlemanWunsch)
            .align(&dna(&a), &dna(&b))
            .unwrap();
        let fragment = &result[0].aligned_sequences[0];

        prop_assert_eq!(fragment.first.len(), fragment.second.len());
        prop_assert_eq!(fragment.first.ungapped(), a.as_bytes().to_vec());
        prop_assert_eq!(fragment.second.ungapped(), b.as_bytes().to_vec());
    }

    #[test]
    fn prop_global_is_symmetric(a in dna_text(), b in dna_text()) {
        let nw = aligner(AlignmentAlgorithm::NeedlemanWunsch);
        let forward = nw.align(&dna(&a), &dna(&b)).unwrap();
        let backward = nw.align(&dna(&b), &dna(&a)).unwrap();
        prop_assert_eq!(forward[0].total_score(), backward[0].total_score());

        // Every co-optimal path, with its rows swapped, is a co-optimal path
        // of the swapped inputs
        let matrix = SimilarityMatrix::diagonal(2, -2);
        let gaps = GapCosts::new(-8, -1);
        let paths = |x: &str, y: &str| {
            dp::align(x.as_bytes(), y.as_bytes(), &matrix, gaps, DpMode::Global, GapModel::Affine, 64)
                .unwrap()
        };
        let mut there: Vec<(Vec<u8>, Vec<u8>)> =
            paths(a.as_str(), b.as_str()).into_iter().map(|p| (p.first, p.second)).collect();
        let mut back: Vec<(Vec<u8>, Vec<u8>)> =
            paths(b.as_str(), a.as_str()).into_iter().map(|p| (p.second, p.first)).collect();
        if there.len() < 64 && back.len() < 64 {
            there.sort();
            back.sort();
            prop_assert_eq!(&there, &back);
        }

        // Without ties the facade returns the swapped rows
        if there.len() == 1 {
            let f = &forward[0].aligned_sequences[0];
            let g = &backward[0].aligned_sequences[0];
            prop_assert_eq!(f.first.to_string(), g.second.to_string());
            prop_assert_eq!(f.second.to_string(), g.first.to_string());
        }
    }

    #[test]
    fn prop_equal_affine_costs_match_simple_model(
        a in dna_text(),
        b in dna_text(),
        cost in -8i32..=-1,
        mode in prop_oneof![Just(DpMode::Global), Just(DpMode::Local), Just(DpMode::Overlap)],
    ) {
        let matrix = SimilarityMatrix::diagonal(2, -1);
        let affine = dp::align(
            a.as_bytes(),
            b.as_bytes(),
            &matrix,
            GapCosts::new(cost, cost),
            mode,
            GapModel::Affine,
            1,
        )
        .unwrap();
        let simple = dp::align(
            a.as_bytes(),
            b.as_bytes(),
            &matrix,
            GapCosts::simple(cost),
            mode,
            GapModel::Simple,
            1,
        )
        .unwrap();
        prop_assert_eq!(affine, simple);
    }

    #[test]
    fn prop_local_scores_positive(a in dna_text(), b in dna_text()) {
        let result = aligner(AlignmentAlgorithm::SmithWaterman)
            .align(&dna(&a), &dna(&b))
            .unwrap();
        for alignment in &result {
            for fragment in &alignment.aligned_sequences {
                prop_assert!(fragment.score > 0);
            }
        }
    }

    #[test]
    fn prop_deterministic(a in dna_text(), b in dna_text()) {
        let sw = aligner(AlignmentAlgorithm::SmithWaterman);
        let first = sw.align(&dna(&a), &dna(&b)).unwrap();
        let second = sw.align(&dna(&a), &dna(&b)).unwrap();
        prop_assert_eq!(first.len(), second.len());
        for (x, y) in first.iter().zip(second.iter()) {
            prop_assert!(compare_alignments(&x.aligned_sequences, &y.aligned_sequences));
        }
    }
}
