//! Line-oriented shortest-edit-script diff (Myers' algorithm)
//!
//! Operates on exact line identity, not semantic similarity. Runs in
//! O((N+M)*D) time and memory, which is fine for record-sized inputs (tens to
//! low hundreds of lines); it is not meant for whole-database diffing.
//!
//! Determinism: identical inputs always produce the identical script. When a
//! deletion and an insertion are both possible at a position, the deletion
//! comes first (conventional Myers traversal order).

use serde::Serialize;

/// Operation applied to one line of the edit script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffOp {
    /// Line exists only in the old text
    Delete,
    /// Line exists only in the new text
    Insert,
    /// Line is common to both texts
    Retain,
}

/// One line of an edit script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffEntry {
    /// The line content
    pub line: String,
    /// What happened to it
    pub op: DiffOp,
}

impl DiffEntry {
    fn new(line: &str, op: DiffOp) -> Self {
        Self {
            line: line.to_string(),
            op,
        }
    }
}

/// Number of inserted plus deleted lines in a script.
pub fn script_cost(script: &[DiffEntry]) -> usize {
    script
        .iter()
        .filter(|e| e.op != DiffOp::Retain)
        .count()
}

/// Edit distance between two line sequences (inserted + deleted lines of the
/// minimal script).
pub fn edit_distance(a: &[&str], b: &[&str]) -> usize {
    script_cost(&diff_lines(a, b))
}

/// Compute the minimal edit script transforming `a` into `b`.
pub fn diff_lines(a: &[&str], b: &[&str]) -> Vec<DiffEntry> {
    let n = a.len() as isize;
    let m = b.len() as isize;
    let max = n + m;

    if max == 0 {
        return Vec::new();
    }

    let offset = max;
    let width = (2 * max + 1) as usize;
    let idx = |k: isize| (k + offset) as usize;

    // Forward pass: furthest-reaching x per diagonal k, with one snapshot of
    // the frontier per edit depth for the backtracking pass.
    let mut frontier = vec![0isize; width];
    let mut trace: Vec<Vec<isize>> = Vec::new();
    let mut depth = 0isize;

    'outer: for d in 0..=max {
        trace.push(frontier.clone());

        let mut k = -d;
        while k <= d {
            // On ties, extend the deletion diagonal (k-1) so deletions come
            // before insertions at the same position.
            let mut x = if k == -d || (k != d && frontier[idx(k - 1)] < frontier[idx(k + 1)]) {
                frontier[idx(k + 1)]
            } else {
                frontier[idx(k - 1)] + 1
            };
            let mut y = x - k;

            while x < n && y < m && a[x as usize] == b[y as usize] {
                x += 1;
                y += 1;
            }

            frontier[idx(k)] = x;

            if x >= n && y >= m {
                depth = d;
                break 'outer;
            }

            k += 2;
        }
    }

    // Backtracking pass: walk from (n, m) to (0, 0), emitting in reverse.
    let mut script: Vec<DiffEntry> = Vec::new();
    let mut x = n;
    let mut y = m;

    for d in (0..=depth).rev() {
        let v = &trace[d as usize];
        let k = x - y;

        let prev_k = if k == -d || (k != d && v[idx(k - 1)] < v[idx(k + 1)]) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = v[idx(prev_k)];
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            script.push(DiffEntry::new(a[(x - 1) as usize], DiffOp::Retain));
            x -= 1;
            y -= 1;
        }

        if d > 0 {
            if x == prev_x {
                script.push(DiffEntry::new(b[(y - 1) as usize], DiffOp::Insert));
            } else {
                script.push(DiffEntry::new(a[(x - 1) as usize], DiffOp::Delete));
            }
            x = prev_x;
            y = prev_y;
        }
    }

    script.reverse();
    script
}
