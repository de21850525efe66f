//! Immutable biological sequences

use crate::alphabet::{Alphabet, GAP};
use duplex_core::DuplexResult;
use serde::{Serialize, Serializer};
use std::fmt;

/// Ordered symbols drawn from one [`Alphabet`], with an optional identifier.
///
/// Sequences built through [`Sequence::new`] never contain gaps; gapped
/// sequences are only produced by the aligners.
#[derive(Debug, Clone, Eq, Serialize)]
pub struct Sequence {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    alphabet: Alphabet,
    #[serde(serialize_with = "serialize_symbols")]
    symbols: Vec<u8>,
}

impl Sequence {
    /// Validate `text` against `alphabet`. Lowercase letters are kept as given.
    pub fn new(alphabet: Alphabet, text: &str) -> DuplexResult<Self> {
        alphabet.validate(text.as_bytes())?;
        Ok(Self {
            id: None,
            alphabet,
            symbols: text.as_bytes().to_vec(),
        })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Aligned output row; may contain [`GAP`].
    pub(crate) fn gapped(alphabet: Alphabet, symbols: Vec<u8>) -> Self {
        Self {
            id: None,
            alphabet,
            symbols,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn gap_count(&self) -> usize {
        self.symbols.iter().filter(|&&s| s == GAP).count()
    }

    /// Symbols with every gap removed
    pub fn ungapped(&self) -> Vec<u8> {
        self.symbols.iter().copied().filter(|&s| s != GAP).collect()
    }

    /// Reverse complement for nucleotide sequences, `None` for protein
    pub fn reverse_complement(&self) -> Option<Sequence> {
        if !self.alphabet.is_nucleotide() {
            return None;
        }

        let symbols = self
            .symbols
            .iter()
            .rev()
            .map(|&s| self.alphabet.complement(s))
            .collect::<Option<Vec<u8>>>()?;

        Some(Sequence {
            id: self.id.clone(),
            alphabet: self.alphabet,
            symbols,
        })
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.alphabet == other.alphabet && self.symbols == other.symbols
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.symbols))
    }
}

fn serialize_symbols<S: Serializer>(symbols: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(symbols))
}
