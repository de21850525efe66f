/// Fragment extension around and between cluster anchors
use super::cluster::Cluster;
use super::mum::Match;
use crate::alignment::dp::{self, DpMode, GapModel};
use crate::alignment::gap::GapCosts;
use crate::alphabet::GAP;
use crate::matrix::SimilarityMatrix;
use duplex_core::DuplexResult;
use tracing::trace;

/// Longest region handed to a single extension or bridge
pub const MAXIMUM_ALIGNMENT_LENGTH: usize = 10_000;

// Heuristic used when deciding whether a distant cluster is worth joining,
// and the per-symbol allowance of the extension drop-off
const VALID_SCORE: i64 = 3;
const GAP_EXTENSION_SCORE: i64 = -7;

const UNREACHABLE: i64 = i64::MIN / 4;

/// Gapped fragment under construction. Ends are exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fragment {
    pub first: Vec<u8>,
    pub second: Vec<u8>,
    pub reference_start: usize,
    pub query_start: usize,
    pub reference_end: usize,
    pub query_end: usize,
}

impl Fragment {
    fn at(reference_start: usize, query_start: usize) -> Self {
        Self {
            first: Vec::new(),
            second: Vec::new(),
            reference_start,
            query_start,
            reference_end: reference_start,
            query_end: query_start,
        }
    }

    fn covers(&self, reference: (usize, usize), query: (usize, usize)) -> bool {
        self.reference_start <= reference.0
            && self.query_start <= query.0
            && self.reference_end >= reference.1
            && self.query_end >= query.1
    }

    fn append(&mut self, first: &[u8], second: &[u8]) {
        self.reference_end += first.iter().filter(|&&s| s != GAP).count();
        self.query_end += second.iter().filter(|&&s| s != GAP).count();
        self.first.extend_from_slice(first);
        self.second.extend_from_slice(second);
    }

    /// Drop trailing columns until the fragment ends at or before the given
    /// coordinates. Returns false if the fragment ran out of columns first.
    fn trim_to(&mut self, reference_limit: usize, query_limit: usize) -> bool {
        while self.reference_end > reference_limit || self.query_end > query_limit {
            match (self.first.pop(), self.second.pop()) {
                (Some(a), Some(b)) => {
                    if a != GAP {
                        self.reference_end -= 1;
                    }
                    if b != GAP {
                        self.query_end -= 1;
                    }
                }
                _ => return false,
            }
        }
        true
    }
}

/// Turns sorted clusters into fragments using the DP core for every region
/// not covered by an exact match.
pub(crate) struct Extender<'a> {
    pub reference: &'a [u8],
    pub query: &'a [u8],
    pub matrix: &'a SimilarityMatrix,
    pub gaps: GapCosts,
    pub model: GapModel,
    pub break_length: usize,
}

impl<'a> Extender<'a> {
    pub fn extend(&self, clusters: Vec<Cluster>) -> DuplexResult<Vec<Fragment>> {
        let mut clusters: Vec<Cluster> = clusters
            .into_iter()
            .map(|c| c.into_iter().filter(|m| m.length > 1).collect::<Cluster>())
            .filter(|c| !c.is_empty())
            .collect();
        clusters.sort_by_key(|c| c[0].reference_start);

        let mut fused = vec![false; clusters.len()];
        let mut fragments: Vec<Fragment> = Vec::new();

        for origin in 0..clusters.len() {
            if fused[origin] {
                continue;
            }

            let first = clusters[origin][0];
            let last = clusters[origin][clusters[origin].len() - 1];
            let span_r = (first.reference_start, last.reference_end());
            let span_q = (first.query_start, last.query_end());
            if fragments.iter().any(|f| f.covers(span_r, span_q)) {
                trace!("Cluster {} is shadowed by an emitted fragment", origin);
                continue;
            }

            let mut fragment = self.open_fragment(&fragments, first)?;
            let mut current = origin;
            let mut cursor = 1;

            loop {
                let next = if cursor < clusters[current].len() {
                    cursor += 1;
                    clusters[current][cursor - 1]
                } else {
                    match self.next_cluster(&clusters, &fused, origin, &fragment) {
                        Some((target, entry)) => {
                            trace!("Fusing cluster {} into cluster {}", target, origin);
                            fused[target] = true;
                            current = target;
                            cursor = entry + 1;
                            clusters[target][entry]
                        }
                        None => {
                            self.extend_forward(&mut fragment)?;
                            break;
                        }
                    }
                };

                if fragment.reference_start > next.reference_start
                    || fragment.query_start > next.query_start
                    || !fragment.trim_to(next.reference_start, next.query_start)
                {
                    continue;
                }

                let interior_r = next.reference_start - fragment.reference_end;
                let interior_q = next.query_start - fragment.query_end;
                if interior_r > MAXIMUM_ALIGNMENT_LENGTH || interior_q > MAXIMUM_ALIGNMENT_LENGTH {
                    self.extend_forward(&mut fragment)?;
                    fragments.push(fragment);
                    fragment = self.open_fragment(&fragments, next)?;
                    continue;
                }

                self.bridge(&mut fragment, next)?;
            }

            trace!(
                "Fragment reference {}..{} query {}..{}",
                fragment.reference_start,
                fragment.reference_end,
                fragment.query_start,
                fragment.query_end
            );
            fragments.push(fragment);
        }

        Ok(fragments)
    }

    /// Start a fragment at `anchor`, extended backwards towards the nearest
    /// emitted fragment (or the sequence start).
    fn open_fragment(&self, emitted: &[Fragment], anchor: Match) -> DuplexResult<Fragment> {
        let mut bound_r = anchor.reference_start.saturating_sub(MAXIMUM_ALIGNMENT_LENGTH);
        let mut bound_q = anchor.query_start.saturating_sub(MAXIMUM_ALIGNMENT_LENGTH);
        for f in emitted {
            if f.reference_end <= anchor.reference_start && f.query_end <= anchor.query_start {
                bound_r = bound_r.max(f.reference_end);
                bound_q = bound_q.max(f.query_end);
            }
        }

        let reversed_r: Vec<u8> = self.reference[bound_r..anchor.reference_start]
            .iter()
            .rev()
            .copied()
            .collect();
        let reversed_q: Vec<u8> = self.query[bound_q..anchor.query_start]
            .iter()
            .rev()
            .copied()
            .collect();

        let (mut first, mut second) = self.extension(&reversed_r, &reversed_q)?;
        first.reverse();
        second.reverse();
        let consumed_r = first.iter().filter(|&&s| s != GAP).count();
        let consumed_q = second.iter().filter(|&&s| s != GAP).count();

        let mut fragment = Fragment::at(
            anchor.reference_start - consumed_r,
            anchor.query_start - consumed_q,
        );
        fragment.append(&first, &second);
        self.push_match(&mut fragment, anchor);
        Ok(fragment)
    }

    /// Pick the cluster the current fragment should continue into.
    ///
    /// The entry match of a candidate is its first match starting at or after
    /// the fragment's last aligned symbol. Nearby candidates are taken in
    /// order; otherwise the closest one wins if it is nearer than the end of
    /// either sequence.
    fn next_cluster(
        &self,
        clusters: &[Cluster],
        fused: &[bool],
        origin: usize,
        fragment: &Fragment,
    ) -> Option<(usize, usize)> {
        let end_r = fragment.reference_end as i64 - 1;
        let end_q = fragment.query_end as i64 - 1;
        let mut closest: Option<(usize, usize, i64)> = None;

        for (target, cluster) in clusters.iter().enumerate().skip(origin + 1) {
            if fused[target] {
                continue;
            }
            let Some(entry) = cluster.iter().position(|m| {
                m.reference_start as i64 >= end_r && m.query_start as i64 >= end_q
            }) else {
                continue;
            };

            let m = cluster[entry];
            let gap_r = m.reference_start as i64 - end_r;
            let gap_q = m.query_start as i64 - end_q;
            let high = gap_r.max(gap_q);
            let low = gap_r.min(gap_q);

            if high < self.break_length as i64
                || low * VALID_SCORE + (high - low) * GAP_EXTENSION_SCORE >= 0
            {
                return Some((target, entry));
            }

            if high <= MAXIMUM_ALIGNMENT_LENGTH as i64 {
                let distance = 2 * high - low;
                if closest.map_or(true, |(_, _, best)| distance < best) {
                    closest = Some((target, entry, distance));
                }
            }
        }

        let remaining = (self.reference.len() - fragment.reference_end)
            .min(self.query.len() - fragment.query_end) as i64;
        closest
            .filter(|&(_, _, distance)| distance < remaining)
            .map(|(target, entry, _)| (target, entry))
    }

    /// Align the interior between the fragment end and `next`, then append `next`
    fn bridge(&self, fragment: &mut Fragment, next: Match) -> DuplexResult<()> {
        let interior_r = &self.reference[fragment.reference_end..next.reference_start];
        let interior_q = &self.query[fragment.query_end..next.query_start];

        match (interior_r.is_empty(), interior_q.is_empty()) {
            (true, true) => {}
            (false, true) => fragment.append(interior_r, &vec![GAP; interior_r.len()]),
            (true, false) => fragment.append(&vec![GAP; interior_q.len()], interior_q),
            (false, false) => {
                let aligned = dp::align(
                    interior_r,
                    interior_q,
                    self.matrix,
                    self.gaps,
                    DpMode::Global,
                    self.dp_model(),
                    1,
                )?;
                if let Some(path) = aligned.into_iter().next() {
                    fragment.append(&path.first, &path.second);
                }
            }
        }

        self.push_match(fragment, next);
        Ok(())
    }

    fn extend_forward(&self, fragment: &mut Fragment) -> DuplexResult<()> {
        let limit_r = self.reference.len().min(fragment.reference_end + MAXIMUM_ALIGNMENT_LENGTH);
        let limit_q = self.query.len().min(fragment.query_end + MAXIMUM_ALIGNMENT_LENGTH);
        let (first, second) = self.extension(
            &self.reference[fragment.reference_end..limit_r],
            &self.query[fragment.query_end..limit_q],
        )?;
        fragment.append(&first, &second);
        Ok(())
    }

    /// Best-scoring anchored prefix alignment; empty when nothing scores above zero.
    ///
    /// The end point comes from [`Extender::bounded_end`]; the columns are the
    /// global alignment of the two prefixes ending there.
    fn extension(&self, reference: &[u8], query: &[u8]) -> DuplexResult<(Vec<u8>, Vec<u8>)> {
        let Some((reference_len, query_len)) = self.bounded_end(reference, query) else {
            return Ok((Vec::new(), Vec::new()));
        };
        let aligned = dp::align(
            &reference[..reference_len],
            &query[..query_len],
            self.matrix,
            self.gaps,
            DpMode::Global,
            self.dp_model(),
            1,
        )?;
        Ok(aligned
            .into_iter()
            .next()
            .map(|path| (path.first, path.second))
            .unwrap_or_default())
    }

    /// Scan anti-diagonals outward from the anchor and return the prefix
    /// lengths `(reference, query)` of the best-scoring cell.
    ///
    /// The scan stops once `break_length` anti-diagonals pass without reaching
    /// the best score, or once every cell on the frontier has fallen more than
    /// `VALID_SCORE * break_length` below it. Ties go to the shortest query
    /// prefix, then the shortest reference prefix.
    fn bounded_end(&self, reference: &[u8], query: &[u8]) -> Option<(usize, usize)> {
        let (n, m) = (reference.len(), query.len());
        if n == 0 || m == 0 {
            return None;
        }

        let open = self.gaps.open as i64;
        let extend = match self.dp_model() {
            GapModel::Simple => open,
            GapModel::Affine => self.gaps.extension as i64,
        };
        let max_difference =
            VALID_SCORE.saturating_mul(i64::try_from(self.break_length).unwrap_or(i64::MAX));

        let mut before = Diagonal::default();
        let mut previous = Diagonal::origin();
        let mut best = 0i64;
        let mut end = (0usize, 0usize);
        let mut best_diagonal = 0usize;

        for d in 1..=n + m {
            if d - best_diagonal > self.break_length {
                trace!("Extension stopped at anti-diagonal {}", d);
                break;
            }

            let lo = previous.lo.max(d.saturating_sub(m));
            let hi = (previous.end() + 1).min(n + 1).min(d + 1);
            if lo >= hi {
                break;
            }

            let mut current = Diagonal {
                lo,
                ..Diagonal::default()
            };
            for i in lo..hi {
                let j = d - i;

                let matched = match (i, j) {
                    (0, _) | (_, 0) => UNREACHABLE,
                    _ => before.cell(i - 1).map_or(UNREACHABLE, |c| {
                        c.best() + self.matrix.pair_score(reference[i - 1], query[j - 1]) as i64
                    }),
                };
                let deleted = match i {
                    0 => UNREACHABLE,
                    _ => previous.cell(i - 1).map_or(UNREACHABLE, |c| {
                        (c.matched + open).max(c.inserted + open).max(c.deleted + extend)
                    }),
                };
                let inserted = match j {
                    0 => UNREACHABLE,
                    _ => previous.cell(i).map_or(UNREACHABLE, |c| {
                        (c.matched + open).max(c.deleted + open).max(c.inserted + extend)
                    }),
                };

                let cell = Cell {
                    matched,
                    deleted,
                    inserted,
                };
                let value = cell.best();
                if value >= best {
                    best_diagonal = d;
                    if value > best || (j, i) < (end.1, end.0) {
                        best = value;
                        end = (i, j);
                    }
                }
                current.cells.push(cell);
            }

            current.trim(best.saturating_sub(max_difference));
            if current.cells.is_empty() {
                trace!("Extension dropped off at anti-diagonal {}", d);
                break;
            }
            before = std::mem::replace(&mut previous, current);
        }

        (best > 0).then_some(end)
    }

    fn push_match(&self, fragment: &mut Fragment, m: Match) {
        fragment.append(
            &self.reference[m.reference_start..m.reference_end()],
            &self.query[m.query_start..m.query_end()],
        );
    }

    fn dp_model(&self) -> GapModel {
        if self.model == GapModel::Affine && self.gaps.is_linear() {
            GapModel::Simple
        } else {
            self.model
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    matched: i64,
    deleted: i64,
    inserted: i64,
}

impl Cell {
    fn best(&self) -> i64 {
        self.matched.max(self.deleted).max(self.inserted)
    }
}

/// Live cells of one anti-diagonal, indexed by reference prefix length
#[derive(Debug, Default)]
struct Diagonal {
    lo: usize,
    cells: Vec<Cell>,
}

impl Diagonal {
    fn origin() -> Self {
        Self {
            lo: 0,
            cells: vec![Cell {
                matched: 0,
                deleted: UNREACHABLE,
                inserted: UNREACHABLE,
            }],
        }
    }

    fn end(&self) -> usize {
        self.lo + self.cells.len()
    }

    fn cell(&self, i: usize) -> Option<Cell> {
        i.checked_sub(self.lo).and_then(|k| self.cells.get(k)).copied()
    }

    /// Drop cells below `floor` from both ends
    fn trim(&mut self, floor: i64) {
        while self.cells.last().is_some_and(|c| c.best() < floor) {
            self.cells.pop();
        }
        let leading = self.cells.iter().take_while(|c| c.best() < floor).count();
        self.cells.drain(..leading);
        self.lo += leading;
    }
}

/// Score gapped rows: matrix scores for aligned pairs, and per gap run
/// `open + L * extension` (affine) or `open` per column (simple).
pub(crate) fn score_columns(
    first: &[u8],
    second: &[u8],
    matrix: &SimilarityMatrix,
    gaps: GapCosts,
    model: GapModel,
) -> i64 {
    let mut score = 0i64;
    let mut column = 0;

    while column < first.len() {
        let (a, b) = (first[column], second[column]);
        if a != GAP && b != GAP {
            score += matrix.pair_score(a, b) as i64;
            column += 1;
            continue;
        }

        if model == GapModel::Simple {
            score += gaps.open as i64;
            column += 1;
            continue;
        }

        let gap_in_first = a == GAP;
        let mut run = 0i64;
        while column < first.len() {
            let (a, b) = (first[column], second[column]);
            let is_gap = a == GAP || b == GAP;
            if !is_gap || (a == GAP) != gap_in_first {
                break;
            }
            run += 1;
            column += 1;
        }
        score += gaps.open as i64 + run * gaps.extension as i64;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extender<'a>(reference: &'a [u8], query: &'a [u8], matrix: &'a SimilarityMatrix) -> Extender<'a> {
        Extender {
            reference,
            query,
            matrix,
            gaps: GapCosts::new(-13, -8),
            model: GapModel::Affine,
            break_length: 200,
        }
    }

    fn text(bytes: &[u8]) -> String {
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_score_columns() {
        let matrix = SimilarityMatrix::diagonal(3, -3);
        let gaps = GapCosts::new(-13, -8);

        assert_eq!(score_columns(b"AG--AAAA", b"AGATAAAA", &matrix, gaps, GapModel::Affine), -11);
        assert_eq!(score_columns(b"AG--AAAA", b"AGATAAAA", &matrix, gaps, GapModel::Simple), -8);
        // Adjacent runs in different rows are scored separately
        assert_eq!(score_columns(b"A-C", b"AG-", &matrix, gaps, GapModel::Affine), 3 - 21 - 21);
    }

    #[test]
    fn test_trim_to() {
        let mut fragment = Fragment::at(2, 0);
        fragment.append(b"ACG-T", b"ACGGT");
        assert_eq!((fragment.reference_end, fragment.query_end), (6, 5));

        assert!(fragment.trim_to(5, 4));
        assert_eq!(text(&fragment.first), "ACG-");
        assert_eq!((fragment.reference_end, fragment.query_end), (5, 4));

        assert!(fragment.trim_to(5, 3));
        assert_eq!(text(&fragment.second), "ACG");
        assert!(!fragment.trim_to(0, 0));
    }

    #[test]
    fn test_single_cluster_extends_both_ways() {
        let matrix = SimilarityMatrix::diagonal(3, -3);
        let reference = b"GGACGTACGTTT";
        let query = b"CGACGTACGTAA";
        let ext = extender(reference, query, &matrix);

        let fragments = ext.extend(vec![vec![Match::new(4, 4, 6)]]).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(text(&fragments[0].first), "GACGTACGT");
        assert_eq!(text(&fragments[0].second), "GACGTACGT");
        assert_eq!(fragments[0].reference_start, 1);
        assert_eq!(fragments[0].query_start, 1);
    }

    #[test]
    fn test_bridge_pure_gap_run() {
        let matrix = SimilarityMatrix::diagonal(3, -3);
        let reference = b"AAAACCCCTTGGGG";
        let query = b"AAAACCCCGGGG";
        let ext = extender(reference, query, &matrix);

        let fragments = ext
            .extend(vec![vec![Match::new(0, 0, 8), Match::new(10, 8, 4)]])
            .unwrap();
        assert_eq!(text(&fragments[0].first), "AAAACCCCTTGGGG");
        assert_eq!(text(&fragments[0].second), "AAAACCCC--GGGG");
    }

    #[test]
    fn test_extension_stops_after_break_length() {
        let matrix = SimilarityMatrix::diagonal(3, -3);
        let reference = b"ACGTAAAAAAAAAAAAGTCAGTCAGTCAGTCAGTCA";
        let query = b"ACGTCCCCCCCCCCCCGTCAGTCAGTCAGTCAGTCA";

        // A 12-symbol mismatch run is crossed when the break length allows it
        let ext = extender(reference, query, &matrix);
        let (first, second) = ext.extension(reference, query).unwrap();
        assert_eq!(text(&first), text(reference));
        assert_eq!(text(&second), text(query));

        let short = Extender {
            break_length: 5,
            ..extender(reference, query, &matrix)
        };
        assert_eq!(short.bounded_end(reference, query), Some((4, 4)));
        let (first, second) = short.extension(reference, query).unwrap();
        assert_eq!(text(&first), "ACGT");
        assert_eq!(text(&second), "ACGT");
    }

    #[test]
    fn test_bounded_end_nothing_positive() {
        let matrix = SimilarityMatrix::diagonal(3, -3);
        let ext = extender(b"TTT", b"GGG", &matrix);
        assert_eq!(ext.bounded_end(b"TTT", b"GGG"), None);
        assert_eq!(ext.bounded_end(b"", b"GGG"), None);
        // Ties keep the shortest prefixes
        assert_eq!(ext.bounded_end(b"ACGA", b"ACT"), Some((2, 2)));
    }

    #[test]
    fn test_shadowed_cluster_is_skipped() {
        let matrix = SimilarityMatrix::diagonal(3, -3);
        let reference = b"ACGTACGTAC";
        let ext = extender(reference, reference, &matrix);

        let fragments = ext
            .extend(vec![vec![Match::new(0, 0, 10)], vec![Match::new(2, 2, 4)]])
            .unwrap();
        assert_eq!(fragments.len(), 1);
    }
}
