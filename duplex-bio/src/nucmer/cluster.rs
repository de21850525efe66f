/// Grouping of seed matches into consistent, chained clusters
use super::mum::Match;
use tracing::debug;

/// Ordered chain of matches, monotone in both coordinates
pub type Cluster = Vec<Match>;

#[derive(Debug, Clone, Copy)]
struct FilterMatch {
    reference_start: i64,
    query_start: i64,
    length: i64,
    tentative: bool,
    removed: bool,
}

impl FilterMatch {
    fn diagonal(&self) -> i64 {
        self.query_start - self.reference_start
    }
}

#[derive(Debug, Clone, Copy)]
struct ChainEntry {
    m: Match,
    score: i64,
    adjust: i64,
    from: Option<usize>,
    good: bool,
}

/// Union-find with union by size; negative entries are root sizes
struct DisjointSet {
    parent: Vec<i64>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: vec![-1; size],
        }
    }

    fn find(&self, mut node: usize) -> usize {
        while self.parent[node] >= 0 {
            node = self.parent[node] as usize;
        }
        node
    }

    fn union(&mut self, a: usize, b: usize) {
        if self.parent[a] >= 0 || self.parent[b] >= 0 {
            return;
        }
        if self.parent[a] < self.parent[b] {
            self.parent[a] += self.parent[b];
            self.parent[b] = a as i64;
        } else {
            self.parent[b] += self.parent[a];
            self.parent[a] = b as i64;
        }
    }
}

/// Builds clusters from raw matches: filters duplicates, unions nearby
/// matches on compatible diagonals, then extracts the best chains.
#[derive(Debug, Clone, Copy)]
pub struct ClusterBuilder {
    pub fixed_separation: i64,
    pub maximum_separation: i64,
    pub minimum_score: i64,
    pub separation_factor: f32,
}

impl Default for ClusterBuilder {
    fn default() -> Self {
        Self {
            fixed_separation: 5,
            maximum_separation: 1000,
            minimum_score: 200,
            separation_factor: 0.05,
        }
    }
}

impl ClusterBuilder {
    pub fn build(&self, mut matches: Vec<Match>) -> Vec<Cluster> {
        matches.sort_by_key(|m| (m.query_start, m.reference_start));
        let matches = filter_matches(&matches);
        let count = matches.len();

        let mut sets = DisjointSet::new(count);
        for i in 0..count {
            let end = matches[i].query_end() as i64;
            let diagonal = matches[i].diagonal();
            for j in i + 1..count {
                let separation = matches[j].query_start as i64 - end;
                if separation > self.maximum_separation {
                    break;
                }
                let shift = (matches[j].diagonal() - diagonal).abs() as f64;
                let allowed = (self.fixed_separation as f64)
                    .max(self.separation_factor as f64 * separation as f64);
                if shift <= allowed {
                    let (a, b) = (sets.find(i), sets.find(j));
                    if a != b {
                        sets.union(a, b);
                    }
                }
            }
        }

        let mut grouped: Vec<(usize, Match)> = matches
            .iter()
            .enumerate()
            .map(|(i, m)| (sets.find(i), *m))
            .collect();
        grouped.sort_by_key(|(id, m)| (*id, m.query_start, m.reference_start));

        let mut clusters = Vec::new();
        let mut start = 0;
        while start < grouped.len() {
            let id = grouped[start].0;
            let mut end = start + 1;
            while end < grouped.len() && grouped[end].0 == id {
                end += 1;
            }
            let members: Vec<Match> = grouped[start..end].iter().map(|(_, m)| *m).collect();
            self.extract_chains(members, &mut clusters);
            start = end;
        }

        debug!(
            "Built {} cluster(s) from {} filtered match(es)",
            clusters.len(),
            count
        );
        clusters
    }

    /// Repeatedly pull the highest-scoring chain out of one union group
    fn extract_chains(&self, members: Vec<Match>, clusters: &mut Vec<Cluster>) {
        let mut group: Vec<ChainEntry> = members
            .into_iter()
            .map(|m| ChainEntry {
                m,
                score: 0,
                adjust: 0,
                from: None,
                good: false,
            })
            .collect();

        while !group.is_empty() {
            for k in 0..group.len() {
                let current = group[k].m;
                let mut score = current.length as i64;
                let mut adjust = 0;
                let mut from = None;

                for (p, previous) in group[..k].iter().enumerate() {
                    let prev = previous.m;
                    let overlap = 0i64
                        .max(prev.reference_end() as i64 - current.reference_start as i64)
                        .max(prev.query_end() as i64 - current.query_start as i64);
                    let cost = overlap + (current.diagonal() - prev.diagonal()).abs();
                    let candidate = previous.score + current.length as i64 - cost;
                    if candidate > score {
                        score = candidate;
                        adjust = overlap;
                        from = Some(p);
                    }
                }

                let entry = &mut group[k];
                entry.score = score;
                entry.adjust = adjust;
                entry.from = from;
                entry.good = false;
            }

            let mut best = 0;
            for k in 1..group.len() {
                if group[k].score > group[best].score {
                    best = k;
                }
            }

            let mut total = 0;
            let mut cursor = Some(best);
            while let Some(k) = cursor {
                group[k].good = true;
                total += group[k].m.length as i64;
                cursor = group[k].from;
            }

            if total >= self.minimum_score {
                let cluster: Cluster = group
                    .iter()
                    .filter(|e| e.good && (e.m.length as i64) > e.adjust)
                    .map(|e| {
                        let shift = e.adjust as usize;
                        Match::new(
                            e.m.reference_start + shift,
                            e.m.query_start + shift,
                            e.m.length - shift,
                        )
                    })
                    .collect();
                if !cluster.is_empty() {
                    clusters.push(cluster);
                }
            }

            group.retain(|e| !e.good);
        }
    }
}

/// Merge same-diagonal duplicates and drop heavily overlapping matches that
/// share a start coordinate. Input is sorted by (query, reference) start.
fn filter_matches(matches: &[Match]) -> Vec<Match> {
    let mut entries: Vec<FilterMatch> = matches
        .iter()
        .map(|m| FilterMatch {
            reference_start: m.reference_start as i64,
            query_start: m.query_start as i64,
            length: m.length as i64,
            tentative: false,
            removed: false,
        })
        .collect();

    for i in 0..entries.len() {
        if entries[i].removed {
            continue;
        }
        let diagonal = entries[i].diagonal();
        let mut end = entries[i].query_start + entries[i].length;

        for j in i + 1..entries.len() {
            if entries[j].removed {
                continue;
            }
            if entries[j].query_start > end {
                break;
            }

            let (a, b) = (entries[i], entries[j]);
            if b.diagonal() == diagonal {
                let extent = b.length + b.query_start - a.query_start;
                if extent > a.length {
                    entries[i].length = extent;
                    end = a.query_start + extent;
                }
                entries[j].removed = true;
            } else if a.reference_start == b.reference_start || a.query_start == b.query_start {
                let overlap = if a.reference_start == b.reference_start {
                    a.query_start + a.length - b.query_start
                } else {
                    a.reference_start + a.length - b.reference_start
                };

                if a.length < b.length {
                    if overlap >= a.length / 2 {
                        entries[i].removed = true;
                        break;
                    }
                } else if b.length < a.length {
                    if overlap >= b.length / 2 {
                        entries[j].removed = true;
                    }
                } else if overlap >= a.length / 2 {
                    entries[j].tentative = true;
                    if a.tentative {
                        entries[i].removed = true;
                        break;
                    }
                }
            }
        }
    }

    entries
        .into_iter()
        .filter(|e| !e.removed)
        .map(|e| Match::new(e.reference_start as usize, e.query_start as usize, e.length as usize))
        .collect()
}
