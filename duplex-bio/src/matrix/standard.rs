/// Embedded standard similarity matrices
use super::SimilarityMatrix;
use duplex_core::DuplexError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const BLOSUM45_TEXT: &str = include_str!("data/blosum45.txt");
const BLOSUM50_TEXT: &str = include_str!("data/blosum50.txt");
const BLOSUM62_TEXT: &str = include_str!("data/blosum62.txt");
const BLOSUM80_TEXT: &str = include_str!("data/blosum80.txt");
const PAM250_TEXT: &str = include_str!("data/pam250.txt");
const EDNAFULL_TEXT: &str = include_str!("data/ednafull.txt");
const AMBIGUOUS_DNA_TEXT: &str = include_str!("data/ambiguous_dna.txt");
const AMBIGUOUS_RNA_TEXT: &str = include_str!("data/ambiguous_rna.txt");

static BLOSUM45: Lazy<SimilarityMatrix> = Lazy::new(|| embedded(BLOSUM45_TEXT));
static BLOSUM50: Lazy<SimilarityMatrix> = Lazy::new(|| embedded(BLOSUM50_TEXT));
static BLOSUM62: Lazy<SimilarityMatrix> = Lazy::new(|| embedded(BLOSUM62_TEXT));
static BLOSUM80: Lazy<SimilarityMatrix> = Lazy::new(|| embedded(BLOSUM80_TEXT));
static PAM250: Lazy<SimilarityMatrix> = Lazy::new(|| embedded(PAM250_TEXT));
static EDNAFULL: Lazy<SimilarityMatrix> = Lazy::new(|| embedded(EDNAFULL_TEXT));
static AMBIGUOUS_DNA: Lazy<SimilarityMatrix> = Lazy::new(|| embedded(AMBIGUOUS_DNA_TEXT));
static AMBIGUOUS_RNA: Lazy<SimilarityMatrix> = Lazy::new(|| embedded(AMBIGUOUS_RNA_TEXT));
static DIAGONAL_SCORE: Lazy<SimilarityMatrix> = Lazy::new(|| {
    let mut matrix = SimilarityMatrix::diagonal(3, -3);
    matrix.name = "DiagonalScoreMatrix".to_string();
    matrix
});

fn embedded(text: &str) -> SimilarityMatrix {
    SimilarityMatrix::parse(text).expect("embedded matrix is well-formed")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardMatrix {
    Blosum45,
    Blosum50,
    Blosum62,
    Blosum80,
    Pam250,
    /// NCBI NUC.4.4 nucleotide matrix
    EdnaFull,
    /// IUPAC DNA codes; ambiguous codes score 1 against any base they include
    AmbiguousDna,
    /// [`StandardMatrix::AmbiguousDna`] over the RNA alphabet
    AmbiguousRna,
    /// Diagonal matrix scoring matches 3 and mismatches -3
    DiagonalScore,
}

impl StandardMatrix {
    pub fn matrix(&self) -> &'static SimilarityMatrix {
        match self {
            StandardMatrix::Blosum45 => &BLOSUM45,
            StandardMatrix::Blosum50 => &BLOSUM50,
            StandardMatrix::Blosum62 => &BLOSUM62,
            StandardMatrix::Blosum80 => &BLOSUM80,
            StandardMatrix::Pam250 => &PAM250,
            StandardMatrix::EdnaFull => &EDNAFULL,
            StandardMatrix::AmbiguousDna => &AMBIGUOUS_DNA,
            StandardMatrix::AmbiguousRna => &AMBIGUOUS_RNA,
            StandardMatrix::DiagonalScore => &DIAGONAL_SCORE,
        }
    }

    pub fn all() -> &'static [StandardMatrix] {
        &[
            StandardMatrix::Blosum45,
            StandardMatrix::Blosum50,
            StandardMatrix::Blosum62,
            StandardMatrix::Blosum80,
            StandardMatrix::Pam250,
            StandardMatrix::EdnaFull,
            StandardMatrix::AmbiguousDna,
            StandardMatrix::AmbiguousRna,
            StandardMatrix::DiagonalScore,
        ]
    }
}

impl fmt::Display for StandardMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StandardMatrix::Blosum45 => "blosum45",
            StandardMatrix::Blosum50 => "blosum50",
            StandardMatrix::Blosum62 => "blosum62",
            StandardMatrix::Blosum80 => "blosum80",
            StandardMatrix::Pam250 => "pam250",
            StandardMatrix::EdnaFull => "ednafull",
            StandardMatrix::AmbiguousDna => "ambiguous-dna",
            StandardMatrix::AmbiguousRna => "ambiguous-rna",
            StandardMatrix::DiagonalScore => "diagonal-score",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for StandardMatrix {
    type Err = DuplexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blosum45" => Ok(StandardMatrix::Blosum45),
            "blosum50" => Ok(StandardMatrix::Blosum50),
            "blosum62" => Ok(StandardMatrix::Blosum62),
            "blosum80" => Ok(StandardMatrix::Blosum80),
            "pam250" => Ok(StandardMatrix::Pam250),
            "ednafull" | "nuc.4.4" => Ok(StandardMatrix::EdnaFull),
            "ambiguous-dna" | "ambiguousdna" => Ok(StandardMatrix::AmbiguousDna),
            "ambiguous-rna" | "ambiguousrna" => Ok(StandardMatrix::AmbiguousRna),
            "diagonal" | "diagonal-score" | "diagonalscorematrix" => {
                Ok(StandardMatrix::DiagonalScore)
            }
            other => Err(DuplexError::Configuration(format!(
                "Unknown similarity matrix: {}",
                other
            ))),
        }
    }
}
