use std::ops::Range;

/// Length of the common prefix of `old[old_range]` and `new[new_range]`.
/// Adapted from <https://github.com/mitsuhiko/similar/blob/7e15c44de11a1cd61e1149189929e189ef977fd8/src/algorithms/utils.rs>
pub fn common_prefix_len<T>(
    old: &[T],
    old_range: Range<usize>,
    new: &[T],
    new_range: Range<usize>,
) -> usize
where
    T: PartialEq,
{
    old[old_range]
        .iter()
        .zip(&new[new_range])
        .take_while(|(old, new)| old == new)
        .count()
}

/// Length of the common suffix of `old[old_range]` and `new[new_range]`.
pub fn common_suffix_len<T>(
    old: &[T],
    old_range: Range<usize>,
    new: &[T],
    new_range: Range<usize>,
) -> usize
where
    T: PartialEq,
{
    old[old_range]
        .iter()
        .rev()
        .zip(new[new_range].iter().rev())
        .take_while(|(old, new)| old == new)
        .count()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_common_prefix_len() {
        let empty: [u32; 0] = [];
        assert_eq!(common_prefix_len(&empty, 0..0, &empty, 0..0), 0);

        let old = [1, 2, 3, 4, 5];
        let new = [1, 2, 3, 9];
        assert_eq!(common_prefix_len(&old, 0..5, &new, 0..4), 3);
        assert_eq!(common_prefix_len(&old, 1..5, &new, 1..4), 2);
        assert_eq!(common_prefix_len(&old, 0..5, &new, 3..4), 0);
    }

    #[test]
    fn test_common_suffix_len() {
        let empty: [u32; 0] = [];
        assert_eq!(common_suffix_len(&empty, 0..0, &empty, 0..0), 0);

        let old = [7, 1, 2, 3];
        let new = [0, 0, 0, 1, 2, 3];
        assert_eq!(common_suffix_len(&old, 0..4, &new, 0..6), 3);
        assert_eq!(common_suffix_len(&old, 0..3, &new, 0..6), 0);
        assert_eq!(common_suffix_len(&old, 2..4, &new, 4..6), 2);
    }
}
