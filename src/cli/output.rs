//! Text and JSON rendering of alignment results

use colored::*;
use duplex_bio::{PairwiseSequenceAlignment, Sequence, Strand};

pub fn print_alignments(alignments: &[PairwiseSequenceAlignment], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(alignments)?);
        return Ok(());
    }

    if alignments.is_empty() {
        println!("{}", "No alignment found".yellow());
        return Ok(());
    }

    for (index, alignment) in alignments.iter().enumerate() {
        println!(
            "{} {} vs {}",
            format!("Alignment {}:", index + 1).bold(),
            label(&alignment.first_sequence),
            label(&alignment.second_sequence)
        );
        for (key, value) in &alignment.metadata {
            println!("  {}: {}", key.dimmed(), value);
        }

        if alignment.is_empty() {
            println!("  {}", "no fragments".yellow());
        }
        for fragment in &alignment.aligned_sequences {
            if fragment.metadata.strand == Strand::Reverse {
                println!("{}", "reverse strand".cyan());
            }
            println!("{}\n", fragment);
        }
    }

    Ok(())
}

fn label(sequence: &Sequence) -> String {
    match sequence.id() {
        Some(id) => id.green().to_string(),
        None => format!("{} {}", sequence.alphabet(), sequence.len()),
    }
}
