use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use duplex_bio::alignment::{AlignmentAlgorithm, PairwiseAligner};
use duplex_bio::nucmer::{NucmerAligner, NucmerConfig};
use duplex_bio::{Alphabet, Sequence, SimilarityMatrix, StandardMatrix};

fn create_dna_sequence(length: usize) -> String {
    let bases = b"ATGC";
    (0..length).map(|_| bases[rand::random::<usize>() % 4] as char).collect()
}

fn create_protein_sequence(length: usize) -> String {
    let amino_acids = b"ACDEFGHIKLMNPQRSTVWY";
    (0..length).map(|i| amino_acids[(i * 7) % 20] as char).collect()
}

fn mutate(base: &str, mutation_rate: f64) -> String {
    base.chars()
        .map(|b| {
            if rand::random::<f64>() < mutation_rate {
                match b {
                    'A' => 'T',
                    'T' => 'G',
                    'G' => 'C',
                    'C' => 'A',
                    _ => b,
                }
            } else {
                b
            }
        })
        .collect()
}

fn bench_dna_alignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("dna_alignment");
    let matrix = SimilarityMatrix::standard(StandardMatrix::EdnaFull);

    for length in &[50, 100, 500, 1000] {
        let reference = create_dna_sequence(*length);
        let query = mutate(&reference, 0.05); // 5% mutation rate
        let reference = Sequence::new(Alphabet::Dna, &reference).unwrap();
        let query = Sequence::new(Alphabet::Dna, &query).unwrap();

        group.throughput(Throughput::Elements(*length as u64));

        for algorithm in [
            AlignmentAlgorithm::NeedlemanWunsch,
            AlignmentAlgorithm::SmithWaterman,
            AlignmentAlgorithm::PairwiseOverlap,
        ] {
            let aligner = PairwiseAligner::with_defaults(algorithm);
            group.bench_with_input(
                BenchmarkId::new(format!("{}_affine", algorithm), length),
                &(reference.clone(), query.clone()),
                |b, (reference, query)| {
                    b.iter(|| {
                        aligner.align_with(&matrix, -10, -1, black_box(reference), black_box(query))
                    });
                },
            );
        }

        let aligner = PairwiseAligner::with_defaults(AlignmentAlgorithm::NeedlemanWunsch);
        group.bench_with_input(
            BenchmarkId::new("needleman-wunsch_simple", length),
            &(reference.clone(), query.clone()),
            |b, (reference, query)| {
                b.iter(|| aligner.align_simple_with(&matrix, -10, black_box(reference), black_box(query)));
            },
        );
    }

    group.finish();
}

fn bench_protein_alignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("protein_alignment");
    let matrix = SimilarityMatrix::standard(StandardMatrix::Blosum62);
    let aligner = PairwiseAligner::with_defaults(AlignmentAlgorithm::SmithWaterman);

    for length in &[50, 200, 500] {
        let first = Sequence::new(Alphabet::Protein, &create_protein_sequence(*length)).unwrap();
        let second =
            Sequence::new(Alphabet::Protein, &create_protein_sequence(*length + 17)).unwrap();

        group.throughput(Throughput::Elements(*length as u64));
        group.bench_with_input(
            BenchmarkId::new("smith-waterman_blosum62", length),
            &(first, second),
            |b, (first, second)| {
                b.iter(|| aligner.align_with(&matrix, -8, -1, black_box(first), black_box(second)));
            },
        );
    }

    group.finish();
}

fn bench_nucmer(c: &mut Criterion) {
    let mut group = c.benchmark_group("nucmer");
    group.sample_size(20);

    for length in &[1_000, 10_000] {
        let reference = create_dna_sequence(*length);
        let query = mutate(&reference, 0.01);
        let references = vec![Sequence::new(Alphabet::Dna, &reference).unwrap()];
        let queries = vec![Sequence::new(Alphabet::Dna, &query).unwrap()];
        let aligner = NucmerAligner::new(NucmerConfig::default());

        group.throughput(Throughput::Elements(*length as u64));
        group.bench_with_input(
            BenchmarkId::new("mum_cluster_extend", length),
            &(references, queries),
            |b, (references, queries)| {
                b.iter(|| aligner.align(black_box(references), black_box(queries)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_dna_alignment, bench_protein_alignment, bench_nucmer);
criterion_main!(benches);
