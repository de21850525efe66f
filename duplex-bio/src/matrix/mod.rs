//! Similarity matrices
//!
//! A [`SimilarityMatrix`] is either backed by a parsed table or is the
//! closed-form diagonal matrix scoring every pair of symbols as a match or a
//! mismatch. Both kinds resolve scores through a dense 256×256 lookup built at
//! construction time, so scoring inside the DP fill is a single index.

mod standard;

pub use standard::StandardMatrix;

use crate::alphabet::{describe_byte, Alphabet};
use crate::sequence::Sequence;
use duplex_core::{DuplexError, DuplexResult};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const LOOKUP_SIZE: usize = 256 * 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixKind {
    /// Explicit n×n table over an ordered symbol list
    Table { symbols: Vec<u8>, values: Vec<i32> },
    /// Closed-form scoring covering every symbol
    Diagonal { match_score: i32, mismatch_score: i32 },
}

#[derive(Clone)]
pub struct SimilarityMatrix {
    name: String,
    molecule: Option<Alphabet>,
    kind: MatrixKind,
    present: [bool; 256],
    lookup: Vec<i32>,
}

impl SimilarityMatrix {
    /// Diagonal matrix: `match_score` for identical symbols (case-insensitive),
    /// `mismatch_score` otherwise.
    pub fn diagonal(match_score: i32, mismatch_score: i32) -> Self {
        let mut lookup = vec![mismatch_score; LOOKUP_SIZE];
        for a in 0..256usize {
            for b in 0..256usize {
                if (a as u8).eq_ignore_ascii_case(&(b as u8)) {
                    lookup[a * 256 + b] = match_score;
                }
            }
        }

        Self {
            name: format!("diagonal({}, {})", match_score, mismatch_score),
            molecule: None,
            kind: MatrixKind::Diagonal {
                match_score,
                mismatch_score,
            },
            present: [true; 256],
            lookup,
        }
    }

    /// Build a table-backed matrix. `values` is row-major, `symbols.len()²` long.
    pub fn from_table(
        name: impl Into<String>,
        molecule: Option<Alphabet>,
        symbols: Vec<u8>,
        values: Vec<i32>,
    ) -> DuplexResult<Self> {
        let name = name.into();
        let n = symbols.len();
        if n == 0 {
            return Err(DuplexError::MalformedMatrix(format!(
                "{} declares no symbols",
                name
            )));
        }
        if values.len() != n * n {
            return Err(DuplexError::MalformedMatrix(format!(
                "{} has {} values, expected {}",
                name,
                values.len(),
                n * n
            )));
        }

        let mut index: [Option<usize>; 256] = [None; 256];
        for (i, &symbol) in symbols.iter().enumerate() {
            if index[symbol as usize].is_some() {
                return Err(DuplexError::MalformedMatrix(format!(
                    "duplicate symbol {} in header",
                    describe_byte(symbol)
                )));
            }
            index[symbol as usize] = Some(i);
        }
        // Lowercase letters score like their declared uppercase form
        for &symbol in &symbols {
            if symbol.is_ascii_uppercase() {
                let lower = symbol.to_ascii_lowercase() as usize;
                if index[lower].is_none() {
                    index[lower] = index[symbol as usize];
                }
            }
        }

        let mut present = [false; 256];
        let mut lookup = vec![0; LOOKUP_SIZE];
        for a in 0..256usize {
            let Some(row) = index[a] else { continue };
            present[a] = true;
            for b in 0..256usize {
                if let Some(col) = index[b] {
                    lookup[a * 256 + b] = values[row * n + col];
                }
            }
        }

        Ok(Self {
            name,
            molecule,
            kind: MatrixKind::Table { symbols, values },
            present,
            lookup,
        })
    }

    /// Parse the plain-text matrix format (name, optional molecule type,
    /// symbol header, then one row of integers per symbol).
    pub fn parse(text: &str) -> DuplexResult<Self> {
        parse_matrix(text)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> DuplexResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::debug!("Parsing similarity matrix from {}", path.display());
        parse_matrix(&text)
    }

    /// Owned copy of one of the embedded standard matrices
    pub fn standard(which: StandardMatrix) -> Self {
        which.matrix().clone()
    }

    /// Resolve `diagonal(match, mismatch)`, a standard matrix name or, failing
    /// that, a path to a matrix file
    pub fn resolve(name_or_path: &str) -> DuplexResult<Self> {
        if let Some(matrix) = parse_diagonal_name(name_or_path)? {
            return Ok(matrix);
        }
        match name_or_path.parse::<StandardMatrix>() {
            Ok(standard) => Ok(Self::standard(standard)),
            Err(_) if Path::new(name_or_path).exists() => Self::from_file(name_or_path),
            Err(e) => Err(e),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn molecule(&self) -> Option<Alphabet> {
        self.molecule
    }

    pub fn kind(&self) -> &MatrixKind {
        &self.kind
    }

    /// Declared symbols, in header order. Empty for the diagonal matrix,
    /// which covers every symbol.
    pub fn symbols(&self) -> &[u8] {
        match &self.kind {
            MatrixKind::Table { symbols, .. } => symbols,
            MatrixKind::Diagonal { .. } => &[],
        }
    }

    pub fn contains(&self, symbol: u8) -> bool {
        self.present[symbol as usize]
    }

    pub fn score(&self, a: u8, b: u8) -> DuplexResult<i32> {
        for symbol in [a, b] {
            if !self.contains(symbol) {
                return Err(DuplexError::InvalidAlphabetSymbol(format!(
                    "{} is not in {}",
                    describe_byte(symbol),
                    self.name
                )));
            }
        }
        Ok(self.pair_score(a, b))
    }

    /// Lookup without the membership check; absent symbols score 0.
    #[inline]
    pub(crate) fn pair_score(&self, a: u8, b: u8) -> i32 {
        self.lookup[(a as usize) << 8 | b as usize]
    }

    pub fn validate_sequence(&self, sequence: &Sequence) -> DuplexResult<()> {
        let label = match sequence.id() {
            Some(id) => format!("sequence '{}'", id),
            None => "sequence".to_string(),
        };
        self.check_symbols(sequence.symbols(), &label)
    }

    /// Fail with `IncompatibleMatrix` on the first symbol the matrix cannot score
    pub(crate) fn check_symbols(&self, symbols: &[u8], label: &str) -> DuplexResult<()> {
        match symbols.iter().position(|&s| !self.contains(s)) {
            None => Ok(()),
            Some(position) => Err(DuplexError::IncompatibleMatrix(format!(
                "{} does not cover symbol {} at position {} of the {}",
                self.name,
                describe_byte(symbols[position]),
                position,
                label
            ))),
        }
    }
}

impl fmt::Debug for SimilarityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimilarityMatrix")
            .field("name", &self.name)
            .field("molecule", &self.molecule)
            .field("kind", &self.kind)
            .finish()
    }
}

impl PartialEq for SimilarityMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.molecule == other.molecule && self.kind == other.kind
    }
}

impl fmt::Display for SimilarityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl FromStr for SimilarityMatrix {
    type Err = DuplexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_matrix(s)
    }
}

fn tokens(line: &str) -> Vec<&str> {
    line.split(|c: char| c == ' ' || c == '\t' || c == ',')
        .filter(|t| !t.is_empty())
        .collect()
}

/// Read back the `diagonal(match, mismatch)` name given by [`SimilarityMatrix::diagonal`]
fn parse_diagonal_name(text: &str) -> DuplexResult<Option<SimilarityMatrix>> {
    let lowered = text.trim().to_ascii_lowercase();
    let Some(inner) = lowered
        .strip_prefix("diagonal(")
        .and_then(|rest| rest.strip_suffix(')'))
    else {
        return Ok(None);
    };

    let scores: Vec<Result<i32, _>> = inner.split(',').map(|part| part.trim().parse::<i32>()).collect();
    match scores.as_slice() {
        [Ok(match_score), Ok(mismatch_score)] => {
            Ok(Some(SimilarityMatrix::diagonal(*match_score, *mismatch_score)))
        }
        _ => Err(DuplexError::Configuration(format!(
            "Invalid diagonal matrix '{}': expected diagonal(match, mismatch)",
            text.trim()
        ))),
    }
}

fn molecule_keyword(token: &str) -> Option<Alphabet> {
    match token.to_ascii_uppercase().as_str() {
        "DNA" => Some(Alphabet::Dna),
        "RNA" => Some(Alphabet::Rna),
        "PROTEIN" => Some(Alphabet::Protein),
        _ => None,
    }
}

fn parse_matrix(text: &str) -> DuplexResult<SimilarityMatrix> {
    if text.trim().is_empty() {
        return Err(DuplexError::MalformedMatrix("matrix text is empty".to_string()));
    }

    let mut lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'));

    let name = match lines.next() {
        Some(line) if !line.is_empty() => line.to_string(),
        _ => {
            return Err(DuplexError::MalformedMatrix(
                "matrix name is missing".to_string(),
            ))
        }
    };

    let mut content = lines.filter(|line| !line.is_empty());

    let second = content.next().ok_or_else(|| {
        DuplexError::MalformedMatrix(format!("{} has no symbol header", name))
    })?;
    let second_tokens = tokens(second);

    let (molecule, header) = match second_tokens.as_slice() {
        [single] if single.len() > 1 => match molecule_keyword(single) {
            Some(molecule) => {
                let header = content.next().ok_or_else(|| {
                    DuplexError::MalformedMatrix(format!("{} has no symbol header", name))
                })?;
                (Some(molecule), tokens(header))
            }
            None => {
                return Err(DuplexError::MalformedMatrix(format!(
                    "invalid molecule type '{}'",
                    single
                )))
            }
        },
        _ => (None, second_tokens),
    };

    let mut symbols = Vec::with_capacity(header.len());
    for token in &header {
        let bytes = token.as_bytes();
        if bytes.len() != 1 {
            return Err(DuplexError::MalformedMatrix(format!(
                "header symbol '{}' is not a single character",
                token
            )));
        }
        if symbols.contains(&bytes[0]) {
            return Err(DuplexError::MalformedMatrix(format!(
                "duplicate symbol '{}' in header",
                token
            )));
        }
        symbols.push(bytes[0]);
    }

    let n = symbols.len();
    let mut values = Vec::with_capacity(n * n);
    for row in 0..n {
        let line = content.next().ok_or_else(|| {
            DuplexError::MalformedMatrix(format!("expected {} rows, found {}", n, row))
        })?;
        let mut fields = tokens(line);

        if fields.len() == n + 1 {
            let label = fields.remove(0);
            if label.as_bytes() != [symbols[row]] {
                return Err(DuplexError::MalformedMatrix(format!(
                    "row {} is labelled '{}' but the header expects '{}'",
                    row + 1,
                    label,
                    symbols[row] as char
                )));
            }
        }
        if fields.len() != n {
            return Err(DuplexError::MalformedMatrix(format!(
                "row {} has {} values, expected {}",
                row + 1,
                fields.len(),
                n
            )));
        }

        for field in fields {
            let value = field.parse::<i32>().map_err(|_| {
                DuplexError::MalformedMatrix(format!(
                    "invalid score '{}' in row {}",
                    field,
                    row + 1
                ))
            })?;
            values.push(value);
        }
    }

    if let Some(extra) = content.next() {
        return Err(DuplexError::MalformedMatrix(format!(
            "unexpected content after {} rows: '{}'",
            n, extra
        )));
    }

    SimilarityMatrix::from_table(name, molecule, symbols, values)
}
