pub mod align;
pub mod nucmer;

use duplex_bio::{Alphabet, Sequence};
use duplex_core::DuplexResult;

/// Build a sequence from command-line text. Without an explicit alphabet,
/// text that is valid DNA is read as DNA and anything else as protein.
pub fn parse_sequence(alphabet: Option<Alphabet>, text: &str, id: String) -> DuplexResult<Sequence> {
    let alphabet = alphabet.unwrap_or_else(|| {
        if Alphabet::Dna.validate(text.as_bytes()).is_ok() {
            Alphabet::Dna
        } else {
            Alphabet::Protein
        }
    });
    Ok(Sequence::new(alphabet, text)?.with_id(id))
}
