//! Sequence alphabets, IUPAC ambiguity resolution and complements

use duplex_core::{DuplexError, DuplexResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gap symbol inserted into aligned sequences
pub const GAP: u8 = b'-';

const DNA_SYMBOLS: &[u8] = b"ACGTRYSWKMBDHVN";
const RNA_SYMBOLS: &[u8] = b"ACGURYSWKMBDHVN";
const PROTEIN_SYMBOLS: &[u8] = b"ACDEFGHIKLMNPQRSTVWYBZJXUO*";

// Nucleotide base sets, one bit per base. T and U share a bit.
const BASE_A: u8 = 0b0001;
const BASE_C: u8 = 0b0010;
const BASE_G: u8 = 0b0100;
const BASE_T: u8 = 0b1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alphabet {
    Dna,
    Rna,
    Protein,
}

impl Alphabet {
    pub fn name(&self) -> &'static str {
        match self {
            Alphabet::Dna => "DNA",
            Alphabet::Rna => "RNA",
            Alphabet::Protein => "Protein",
        }
    }

    /// Uppercase symbols accepted by this alphabet (gap excluded)
    pub fn symbols(&self) -> &'static [u8] {
        match self {
            Alphabet::Dna => DNA_SYMBOLS,
            Alphabet::Rna => RNA_SYMBOLS,
            Alphabet::Protein => PROTEIN_SYMBOLS,
        }
    }

    pub fn is_nucleotide(&self) -> bool {
        matches!(self, Alphabet::Dna | Alphabet::Rna)
    }

    /// Case-insensitive membership test. The gap symbol is never a member.
    pub fn contains(&self, symbol: u8) -> bool {
        self.symbols().contains(&symbol.to_ascii_uppercase())
    }

    /// Symbol summarising an aligned column.
    ///
    /// Identical residues give the residue, a residue against a gap gives the
    /// residue, and differing residues give the ambiguity code covering both.
    pub fn consensus(&self, a: u8, b: u8) -> u8 {
        let a = a.to_ascii_uppercase();
        let b = b.to_ascii_uppercase();

        if a == GAP {
            return b;
        }
        if b == GAP || a == b {
            return a;
        }

        match self {
            Alphabet::Dna | Alphabet::Rna => {
                let mask = base_mask(a) | base_mask(b);
                if mask == 0 {
                    return b'N';
                }
                mask_to_code(mask, *self == Alphabet::Rna)
            }
            Alphabet::Protein => protein_ambiguity(a, b),
        }
    }

    /// Watson-Crick complement, preserving case. `None` for protein alphabets
    /// or symbols outside the alphabet.
    pub fn complement(&self, symbol: u8) -> Option<u8> {
        if !self.is_nucleotide() || !self.contains(symbol) {
            return None;
        }

        let upper = symbol.to_ascii_uppercase();
        let complemented = match upper {
            b'A' if *self == Alphabet::Rna => b'U',
            b'A' => b'T',
            b'T' | b'U' => b'A',
            b'C' => b'G',
            b'G' => b'C',
            b'R' => b'Y',
            b'Y' => b'R',
            b'K' => b'M',
            b'M' => b'K',
            b'B' => b'V',
            b'V' => b'B',
            b'D' => b'H',
            b'H' => b'D',
            other => other, // S, W and N are self-complementary
        };

        if symbol.is_ascii_lowercase() {
            Some(complemented.to_ascii_lowercase())
        } else {
            Some(complemented)
        }
    }

    /// Check every byte of `text` against the alphabet
    pub fn validate(&self, text: &[u8]) -> DuplexResult<()> {
        for (position, &symbol) in text.iter().enumerate() {
            if !self.contains(symbol) {
                return Err(DuplexError::InvalidSymbol(format!(
                    "{} at position {} is not valid for {}",
                    describe_byte(symbol),
                    position,
                    self.name()
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Alphabet {
    type Err = DuplexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dna" | "nucleotide" => Ok(Alphabet::Dna),
            "rna" => Ok(Alphabet::Rna),
            "protein" | "aa" | "amino" => Ok(Alphabet::Protein),
            other => Err(DuplexError::Configuration(format!(
                "Unknown alphabet: {}",
                other
            ))),
        }
    }
}

pub(crate) fn describe_byte(symbol: u8) -> String {
    if symbol.is_ascii_graphic() {
        format!("'{}'", symbol as char)
    } else {
        format!("byte 0x{:02X}", symbol)
    }
}

fn base_mask(symbol: u8) -> u8 {
    match symbol {
        b'A' => BASE_A,
        b'C' => BASE_C,
        b'G' => BASE_G,
        b'T' | b'U' => BASE_T,
        b'R' => BASE_A | BASE_G,
        b'Y' => BASE_C | BASE_T,
        b'S' => BASE_C | BASE_G,
        b'W' => BASE_A | BASE_T,
        b'K' => BASE_G | BASE_T,
        b'M' => BASE_A | BASE_C,
        b'B' => BASE_C | BASE_G | BASE_T,
        b'D' => BASE_A | BASE_G | BASE_T,
        b'H' => BASE_A | BASE_C | BASE_T,
        b'V' => BASE_A | BASE_C | BASE_G,
        b'N' => BASE_A | BASE_C | BASE_G | BASE_T,
        _ => 0,
    }
}

fn mask_to_code(mask: u8, rna: bool) -> u8 {
    match mask {
        BASE_A => b'A',
        BASE_C => b'C',
        BASE_G => b'G',
        BASE_T if rna => b'U',
        BASE_T => b'T',
        m if m == BASE_A | BASE_G => b'R',
        m if m == BASE_C | BASE_T => b'Y',
        m if m == BASE_C | BASE_G => b'S',
        m if m == BASE_A | BASE_T => b'W',
        m if m == BASE_G | BASE_T => b'K',
        m if m == BASE_A | BASE_C => b'M',
        m if m == BASE_C | BASE_G | BASE_T => b'B',
        m if m == BASE_A | BASE_G | BASE_T => b'D',
        m if m == BASE_A | BASE_C | BASE_T => b'H',
        m if m == BASE_A | BASE_C | BASE_G => b'V',
        _ => b'N',
    }
}

fn protein_ambiguity(a: u8, b: u8) -> u8 {
    let pair = if a < b { (a, b) } else { (b, a) };
    match pair {
        (b'D', b'N') | (b'B', b'D') | (b'B', b'N') => b'B',
        (b'E', b'Q') | (b'E', b'Z') | (b'Q', b'Z') => b'Z',
        (b'I', b'L') | (b'I', b'J') | (b'J', b'L') => b'J',
        _ => b'X',
    }
}
