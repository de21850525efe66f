/// Maximal unique match seeding
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An exact match between reference and query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    pub reference_start: usize,
    pub query_start: usize,
    pub length: usize,
}

impl Match {
    pub fn new(reference_start: usize, query_start: usize, length: usize) -> Self {
        Self {
            reference_start,
            query_start,
            length,
        }
    }

    pub fn reference_end(&self) -> usize {
        self.reference_start + self.length
    }

    pub fn query_end(&self) -> usize {
        self.query_start + self.length
    }

    /// Query start minus reference start
    pub fn diagonal(&self) -> i64 {
        self.query_start as i64 - self.reference_start as i64
    }
}

/// Source of seed matches for the MUM aligner
pub trait MatchFinder: Send + Sync {
    /// Matches of at least `min_length` symbols between `reference` and `query`
    fn find_matches(&self, reference: &[u8], query: &[u8], min_length: usize) -> Vec<Match>;
}

/// Maximal exact matches whose matched text occurs exactly once in the
/// reference. Query repeats are allowed.
///
/// Seeds come from a hash index of every reference k-mer of length
/// `min_length`; each seed is extended to the right and kept only when it
/// cannot be extended to the left. Uniqueness is read from a per-position
/// table of shortest unique lengths built once per reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaximalUniqueMatchFinder;

impl MatchFinder for MaximalUniqueMatchFinder {
    fn find_matches(&self, reference: &[u8], query: &[u8], min_length: usize) -> Vec<Match> {
        if min_length == 0 || reference.len() < min_length || query.len() < min_length {
            return Vec::new();
        }

        let shortest = shortest_unique_lengths(reference);

        // Positions whose every extension repeats can never start a unique match
        let mut index: HashMap<&[u8], Vec<usize>> = HashMap::new();
        for (position, kmer) in reference.windows(min_length).enumerate() {
            if shortest[position].is_some() {
                index.entry(kmer).or_default().push(position);
            }
        }

        let mut matches = Vec::new();
        for (query_start, seed) in query.windows(min_length).enumerate() {
            let Some(positions) = index.get(seed) else {
                continue;
            };

            for &reference_start in positions {
                if query_start > 0
                    && reference_start > 0
                    && query[query_start - 1] == reference[reference_start - 1]
                {
                    continue;
                }

                let Some(unique_from) = shortest[reference_start] else {
                    continue;
                };
                let reach = (reference.len() - reference_start).min(query.len() - query_start);
                if reach < unique_from {
                    continue;
                }

                let mut length = min_length;
                while query_start + length < query.len()
                    && reference_start + length < reference.len()
                    && query[query_start + length] == reference[reference_start + length]
                {
                    length += 1;
                }

                if length >= unique_from && length > 1 {
                    matches.push(Match::new(reference_start, query_start, length));
                }
            }
        }

        tracing::trace!("Found {} maximal unique matches", matches.len());
        matches
    }
}

/// For each position, the shortest length at which the substring starting
/// there occurs only once in `text`; `None` when even the whole suffix repeats.
fn shortest_unique_lengths(text: &[u8]) -> Vec<Option<usize>> {
    let n = text.len();
    let order = suffix_array(text);
    let mut rank = vec![0usize; n];
    for (r, &p) in order.iter().enumerate() {
        rank[p] = r;
    }

    // Kasai: lcp[r] is the common prefix of the suffixes ranked r - 1 and r
    let mut lcp = vec![0usize; n];
    let mut h = 0usize;
    for p in 0..n {
        if rank[p] == 0 {
            h = 0;
            continue;
        }
        let q = order[rank[p] - 1];
        while p + h < n && q + h < n && text[p + h] == text[q + h] {
            h += 1;
        }
        lcp[rank[p]] = h;
        h = h.saturating_sub(1);
    }

    (0..n)
        .map(|p| {
            let r = rank[p];
            let shared = lcp[r].max(lcp.get(r + 1).copied().unwrap_or(0));
            (p + shared < n).then_some(shared + 1)
        })
        .collect()
}

/// Suffix array by prefix doubling
fn suffix_array(text: &[u8]) -> Vec<usize> {
    let n = text.len();
    let mut order: Vec<usize> = (0..n).collect();
    let mut rank: Vec<usize> = text.iter().map(|&b| b as usize).collect();
    let mut next = vec![0usize; n];
    let mut span = 1;

    while n > 1 {
        let key = |i: usize, rank: &[usize]| {
            (rank[i], if i + span < n { rank[i + span] + 1 } else { 0 })
        };
        order.sort_unstable_by_key(|&i| key(i, &rank));

        next[order[0]] = 0;
        for w in 1..n {
            let step = usize::from(key(order[w - 1], &rank) != key(order[w], &rank));
            next[order[w]] = next[order[w - 1]] + step;
        }
        std::mem::swap(&mut rank, &mut next);

        if rank[order[n - 1]] == n - 1 {
            break;
        }
        span *= 2;
    }

    order
}
