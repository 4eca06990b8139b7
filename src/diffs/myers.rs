//! Linear-space Myers diff over interned symbols.
//!
//! Adapted from <https://github.com/mitsuhiko/similar/blob/7e15c44de11a1cd61e1149189929e189ef977fd8/src/algorithms/myers.rs>,
//! following [Myers' 1986 paper](http://www.xmailserver.org/diff2.pdf):
//! `O((N+M)D)` time and `O(N+M)` space.
//!
//! `N` and `M` count words, so even paragraph-sized inputs stay cheap.

use std::{
    fmt::Debug,
    ops::{Index, IndexMut, Range},
};

use crate::{
    diffs::raw_operation::RawOperation,
    utils::common_affix::{common_prefix_len, common_suffix_len},
};

/// Computes a minimal edit script turning `old` into `new`.
///
/// Every returned operation wraps exactly one element.
pub fn myers_diff<T>(old: &[T], new: &[T]) -> Vec<RawOperation<T>>
where
    T: PartialEq + Clone + Debug,
{
    let mut differ = Differ::new(old, new);
    differ.diff_range(0..old.len(), 0..new.len());

    debug_assert!(
        differ.output.iter().all(|operation| operation.elements().len() == 1),
        "Myers operations wrap single elements"
    );

    differ.output
}

/// Furthest x reached on each diagonal `k = x - y`, indexed by a signed
/// diagonal.
#[derive(Debug)]
struct Frontier {
    origin: isize,
    reach: Vec<usize>,
}

impl Frontier {
    fn with_max_cost(max_cost: usize) -> Self {
        Self {
            origin: signed(max_cost),
            reach: vec![0; 2 * max_cost],
        }
    }

    fn slot(&self, diagonal: isize) -> usize {
        usize::try_from(diagonal + self.origin)
            .unwrap_or(usize::MAX)
            .min(self.reach.len().saturating_sub(1))
    }
}

impl Index<isize> for Frontier {
    type Output = usize;

    fn index(&self, diagonal: isize) -> &Self::Output { &self.reach[self.slot(diagonal)] }
}

impl IndexMut<isize> for Frontier {
    fn index_mut(&mut self, diagonal: isize) -> &mut Self::Output {
        let slot = self.slot(diagonal);
        &mut self.reach[slot]
    }
}

fn signed(value: usize) -> isize { isize::try_from(value).unwrap_or(isize::MAX) }

fn unsigned(value: isize) -> usize { usize::try_from(value).unwrap_or(0) }

/// Picks the x a path on `diagonal` starts from at `cost`: extend the
/// neighbour that got further, preferring a deletion on ties.
fn step_from(frontier: &Frontier, diagonal: isize, cost: isize) -> usize {
    if diagonal == -cost || (diagonal != cost && frontier[diagonal - 1] < frontier[diagonal + 1]) {
        frontier[diagonal + 1]
    } else {
        frontier[diagonal - 1] + 1
    }
}

#[derive(Debug)]
struct Differ<'s, T>
where
    T: PartialEq + Clone + Debug,
{
    old: &'s [T],
    new: &'s [T],
    forward: Frontier,
    backward: Frontier,
    output: Vec<RawOperation<T>>,
}

impl<'s, T> Differ<'s, T>
where
    T: PartialEq + Clone + Debug,
{
    fn new(old: &'s [T], new: &'s [T]) -> Self {
        let max_cost = (old.len() + new.len()).div_ceil(2) + 1;

        Self {
            old,
            new,
            forward: Frontier::with_max_cost(max_cost),
            backward: Frontier::with_max_cost(max_cost),
            output: Vec::with_capacity(old.len().max(new.len())),
        }
    }

    fn equal(&mut self, range: Range<usize>) {
        let elements = &self.old[range];
        self.output
            .extend(elements.iter().map(|element| RawOperation::Equal(vec![element.clone()])));
    }

    fn delete(&mut self, range: Range<usize>) {
        let elements = &self.old[range];
        self.output
            .extend(elements.iter().map(|element| RawOperation::Delete(vec![element.clone()])));
    }

    fn insert(&mut self, range: Range<usize>) {
        let elements = &self.new[range];
        self.output
            .extend(elements.iter().map(|element| RawOperation::Insert(vec![element.clone()])));
    }

    /// Strips the shared prefix and suffix, then splits the rest at its
    /// middle snake and recurses on both halves.
    fn diff_range(&mut self, old_range: Range<usize>, new_range: Range<usize>) {
        let head = common_prefix_len(self.old, old_range.clone(), self.new, new_range.clone());
        let old_inner = old_range.start + head..old_range.end;
        let new_inner = new_range.start + head..new_range.end;

        let tail = common_suffix_len(self.old, old_inner.clone(), self.new, new_inner.clone());
        let old_inner = old_inner.start..old_inner.end - tail;
        let new_inner = new_inner.start..new_inner.end - tail;

        self.equal(old_range.start..old_inner.start);

        match (old_inner.is_empty(), new_inner.is_empty()) {
            (true, true) => {}
            (false, true) => self.delete(old_inner.clone()),
            (true, false) => self.insert(new_inner.clone()),
            (false, false) => match self.middle_snake(old_inner.clone(), new_inner.clone()) {
                Some((old_split, new_split)) => {
                    self.diff_range(old_inner.start..old_split, new_inner.start..new_split);
                    self.diff_range(old_split..old_inner.end, new_split..new_inner.end);
                }
                None => {
                    self.delete(old_inner.clone());
                    self.insert(new_inner.clone());
                }
            },
        }

        self.equal(old_inner.end..old_range.end);
    }

    /// Runs the forward and backward searches in lockstep until their paths
    /// overlap and returns where the overlapping snake starts.
    fn middle_snake(&mut self, old_range: Range<usize>, new_range: Range<usize>) -> Option<(usize, usize)> {
        let old_len = old_range.len();
        let new_len = new_range.len();

        // The parity of the edit distance follows the parity of `delta`.
        let delta = signed(old_len) - signed(new_len);
        let odd = delta & 1 == 1;

        self.forward[1] = 0;
        self.backward[1] = 0;

        let max_cost = (old_len + new_len).div_ceil(2) + 1;
        debug_assert!(self.forward.reach.len() >= max_cost);
        debug_assert!(self.backward.reach.len() >= max_cost);

        for cost in 0..signed(max_cost) {
            for diagonal in (-cost..=cost).rev().step_by(2) {
                let start_x = step_from(&self.forward, diagonal, cost);
                let start_y = unsigned(signed(start_x) - diagonal);

                let mut x = start_x;
                if start_x < old_len && start_y < new_len {
                    x += common_prefix_len(
                        self.old,
                        old_range.start + start_x..old_range.end,
                        self.new,
                        new_range.start + start_y..new_range.end,
                    );
                }
                self.forward[diagonal] = x;

                let mirrored = -(diagonal - delta);
                if odd && (diagonal - delta).abs() < cost && x + self.backward[mirrored] >= old_len {
                    return Some((old_range.start + start_x, new_range.start + start_y));
                }
            }

            for diagonal in (-cost..=cost).rev().step_by(2) {
                let mut x = step_from(&self.backward, diagonal, cost);
                let mut y = unsigned(signed(x) - diagonal);

                if x < old_len && y < new_len {
                    let run = common_suffix_len(
                        self.old,
                        old_range.start..old_range.start + old_len - x,
                        self.new,
                        new_range.start..new_range.start + new_len - y,
                    );
                    x += run;
                    y += run;
                }
                self.backward[diagonal] = x;

                let mirrored = -(diagonal - delta);
                if !odd && (diagonal - delta).abs() <= cost && x + self.forward[mirrored] >= old_len {
                    return Some((old_range.start + old_len - x, new_range.start + new_len - y));
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    fn render(old: &str, new: &str) -> String {
        let old = old.chars().collect::<Vec<_>>();
        let new = new.chars().collect::<Vec<_>>();

        myers_diff(&old, &new)
            .iter()
            .map(|operation| match operation {
                RawOperation::Equal(elements) => format!("={}", elements[0]),
                RawOperation::Insert(elements) => format!("+{}", elements[0]),
                RawOperation::Delete(elements) => format!("-{}", elements[0]),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test_case("", "", ""; "both empty")]
    #[test_case("abc", "abc", "=a =b =c"; "identical")]
    #[test_case("", "ab", "+a +b"; "insert only")]
    #[test_case("ab", "", "-a -b"; "delete only")]
    #[test_case("abcd", "axd", "=a -b -c +x =d"; "shared prefix and suffix")]
    fn test_edit_script(old: &str, new: &str, expected: &str) {
        assert_eq!(render(old, new), expected);
    }

    #[test]
    fn test_empty_symbol_sequences() {
        let empty: Vec<u32> = vec![];
        assert!(myers_diff(&empty, &empty).is_empty());
    }

    #[test]
    fn test_edit_count_is_minimal() {
        let old = "abcabba".chars().collect::<Vec<_>>();
        let new = "cbabac".chars().collect::<Vec<_>>();

        let edits = myers_diff(&old, &new)
            .iter()
            .filter(|operation| !matches!(operation, RawOperation::Equal(_)))
            .count();

        assert_eq!(edits, 5);
    }

    #[test]
    fn test_edit_script_reproduces_both_sides() {
        let old = "the quick brown fox".chars().collect::<Vec<_>>();
        let new = "a quick red fox jumps".chars().collect::<Vec<_>>();
        let operations = myers_diff(&old, &new);

        let rebuilt_old = operations
            .iter()
            .filter(|operation| !matches!(operation, RawOperation::Insert(_)))
            .map(|operation| operation.elements()[0])
            .collect::<Vec<_>>();
        let rebuilt_new = operations
            .iter()
            .filter(|operation| !matches!(operation, RawOperation::Delete(_)))
            .map(|operation| operation.elements()[0])
            .collect::<Vec<_>>();

        assert_eq!(rebuilt_old, old);
        assert_eq!(rebuilt_new, new);
    }
}
