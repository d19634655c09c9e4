//! Diff boundary between the token lists of two adjacent snapshots.

use crate::document::token::Token;

/// One element of the diff between snapshot `i` (left) and `i + 1` (right).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TokenCorrespondence {
    /// Index into the left token list.
    pub left: Option<usize>,
    /// Index into the right token list.
    pub right: Option<usize>,
}

/// How a correspondence is animated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CorrespondenceKind {
    /// Present on both sides; travels between layout positions.
    Moved {
        /// Left token index.
        left: usize,
        /// Right token index.
        right: usize,
    },
    /// Only on the left; fades out.
    Removed(usize),
    /// Only on the right; fades in.
    Added(usize),
}

impl TokenCorrespondence {
    /// Token kept across the transition.
    pub fn moved(left: usize, right: usize) -> Self {
        Self {
            left: Some(left),
            right: Some(right),
        }
    }

    /// Token deleted by the transition.
    pub fn removed(left: usize) -> Self {
        Self {
            left: Some(left),
            right: None,
        }
    }

    /// Token inserted by the transition.
    pub fn added(right: usize) -> Self {
        Self {
            left: None,
            right: Some(right),
        }
    }

    /// Classify this correspondence. `None` when both sides are empty.
    pub fn kind(self) -> Option<CorrespondenceKind> {
        match (self.left, self.right) {
            (Some(left), Some(right)) => Some(CorrespondenceKind::Moved { left, right }),
            (Some(left), None) => Some(CorrespondenceKind::Removed(left)),
            (None, Some(right)) => Some(CorrespondenceKind::Added(right)),
            (None, None) => None,
        }
    }
}

/// Computes ordered correspondences between two token lists.
pub trait TokenDiff: Send + Sync {
    /// Diff `left` against `right`.
    fn diff(&self, left: &[Token], right: &[Token]) -> Vec<TokenCorrespondence>;
}

/// Longest-common-subsequence diff over the text of ink-bearing tokens.
///
/// Whitespace and newline tokens never appear in the output. Common prefixes and suffixes are
/// matched directly; the remaining middle is solved with a dynamic-programming table unless it
/// exceeds `max_cells`, in which case the middle is reported as removed-then-added.
#[derive(Clone, Copy, Debug)]
pub struct LcsDiff {
    /// Upper bound on the DP table size.
    pub max_cells: usize,
}

impl Default for LcsDiff {
    fn default() -> Self {
        Self {
            max_cells: 4_000_000,
        }
    }
}

impl TokenDiff for LcsDiff {
    fn diff(&self, left: &[Token], right: &[Token]) -> Vec<TokenCorrespondence> {
        let l: Vec<usize> = ink_indices(left);
        let r: Vec<usize> = ink_indices(right);
        let same = |a: usize, b: usize| left[l[a]].text == right[r[b]].text;

        let mut out = Vec::with_capacity(l.len().max(r.len()));

        let mut prefix = 0;
        while prefix < l.len() && prefix < r.len() && same(prefix, prefix) {
            out.push(TokenCorrespondence::moved(l[prefix], r[prefix]));
            prefix += 1;
        }

        let mut suffix = 0;
        while suffix < l.len() - prefix
            && suffix < r.len() - prefix
            && same(l.len() - 1 - suffix, r.len() - 1 - suffix)
        {
            suffix += 1;
        }

        let (l_mid, r_mid) = (
            prefix..l.len() - suffix,
            prefix..r.len() - suffix,
        );
        let n = l_mid.len();
        let m = r_mid.len();

        if n.saturating_mul(m) > self.max_cells {
            tracing::debug!(n, m, "token diff too large for LCS table; replacing middle");
            out.extend(l_mid.map(|a| TokenCorrespondence::removed(l[a])));
            out.extend(r_mid.map(|b| TokenCorrespondence::added(r[b])));
        } else {
            // table[a][b] = LCS length of l[a..] and r[b..] within the middle.
            let width = m + 1;
            let mut table = vec![0u32; (n + 1) * width];
            for a in (0..n).rev() {
                for b in (0..m).rev() {
                    table[a * width + b] = if same(prefix + a, prefix + b) {
                        table[(a + 1) * width + b + 1] + 1
                    } else {
                        table[(a + 1) * width + b].max(table[a * width + b + 1])
                    };
                }
            }

            let (mut a, mut b) = (0, 0);
            while a < n && b < m {
                if same(prefix + a, prefix + b) {
                    out.push(TokenCorrespondence::moved(l[prefix + a], r[prefix + b]));
                    a += 1;
                    b += 1;
                } else if table[(a + 1) * width + b] >= table[a * width + b + 1] {
                    out.push(TokenCorrespondence::removed(l[prefix + a]));
                    a += 1;
                } else {
                    out.push(TokenCorrespondence::added(r[prefix + b]));
                    b += 1;
                }
            }
            out.extend((a..n).map(|a| TokenCorrespondence::removed(l[prefix + a])));
            out.extend((b..m).map(|b| TokenCorrespondence::added(r[prefix + b])));
        }

        for s in (0..suffix).rev() {
            out.push(TokenCorrespondence::moved(
                l[l.len() - 1 - s],
                r[r.len() - 1 - s],
            ));
        }
        out
    }
}

fn ink_indices(tokens: &[Token]) -> Vec<usize> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.kind.is_blank())
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/document/diff.rs"]
mod tests;
