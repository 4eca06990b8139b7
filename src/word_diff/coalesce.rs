use crate::{
    policy::ReconcilePolicy,
    types::change_record::ChangeRecord,
    utils::whitespace::{char_len, char_slice},
};

fn has_short_side(record: &ChangeRecord, shortness: usize) -> bool {
    char_len(&record.old_text) < shortness || char_len(&record.new_text) < shortness
}

fn should_coalesce(previous: &ChangeRecord, next: &ChangeRecord, policy: &ReconcilePolicy) -> bool {
    let gap = next.offset.saturating_sub(previous.end());

    gap < policy.coalesce_proximity
        && (has_short_side(previous, policy.coalesce_shortness)
            || has_short_side(next, policy.coalesce_shortness))
}

/// Merges records that sit close to each other into a single `Replace`.
///
/// Two records are merged when fewer than `coalesce_proximity` original
/// characters separate them and at least one side of either record is shorter
/// than `coalesce_shortness` characters. The original text between them is
/// folded into both the deleted and the inserted side. Merging is greedy from
/// left to right, so a merged record can absorb further neighbours. The
/// result never has more records than the input.
#[must_use]
pub fn coalesce_records(
    records: Vec<ChangeRecord>,
    original: &str,
    policy: &ReconcilePolicy,
) -> Vec<ChangeRecord> {
    let mut result: Vec<ChangeRecord> = Vec::with_capacity(records.len());

    for record in records {
        match result.pop() {
            Some(previous) if should_coalesce(&previous, &record, policy) => {
                let gap_text = char_slice(original, previous.end(), record.offset);
                result.push(previous.coalesce(record, gap_text));
            }
            Some(previous) => {
                result.push(previous);
                result.push(record);
            }
            None => result.push(record),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::types::change_record::{ChangeKind, apply_records};

    #[test]
    fn test_short_neighbours_merge() {
        let original = "The NR OF R clause";
        let records = vec![
            ChangeRecord::replace(4, "NR", "R"),
            ChangeRecord::replace(10, "R", "N"),
        ];

        let coalesced = coalesce_records(records, original, &ReconcilePolicy::default());

        assert_eq!(coalesced, vec![ChangeRecord::replace(4, "NR OF R", "R OF N")]);
        assert_eq!(apply_records(original, &coalesced).unwrap(), "The R OF N clause");
    }

    #[test]
    fn test_insert_and_delete_merge_into_replace() {
        let original = "pay rent now";
        let records = vec![
            ChangeRecord::insert(0, "promptly "),
            ChangeRecord::delete(8, " now"),
        ];

        let coalesced = coalesce_records(records, original, &ReconcilePolicy::default());

        assert_eq!(coalesced.len(), 1);
        assert_eq!(coalesced[0].kind, ChangeKind::Replace);
        assert_eq!(apply_records(original, &coalesced).unwrap(), "promptly pay rent");
    }

    #[test]
    fn test_distant_records_stay_apart() {
        let original = "a".repeat(40);
        let records = vec![
            ChangeRecord::replace(0, "a", "b"),
            ChangeRecord::replace(20, "a", "b"),
        ];

        assert_eq!(
            coalesce_records(records.clone(), &original, &ReconcilePolicy::default()),
            records
        );
    }

    #[test]
    fn test_long_records_stay_apart() {
        let long_old = "x".repeat(25);
        let long_new = "y".repeat(25);
        let original = format!("{long_old} {long_old}");
        let records = vec![
            ChangeRecord::replace(0, long_old.clone(), long_new.clone()),
            ChangeRecord::replace(26, long_old, long_new),
        ];

        assert_eq!(
            coalesce_records(records.clone(), &original, &ReconcilePolicy::default()),
            records
        );
    }

    #[test]
    fn test_chained_merges() {
        let original = "a b c d";
        let records = vec![
            ChangeRecord::replace(0, "a", "1"),
            ChangeRecord::replace(2, "b", "2"),
            ChangeRecord::replace(6, "d", "4"),
        ];

        let coalesced = coalesce_records(records, original, &ReconcilePolicy::default());

        assert_eq!(coalesced, vec![ChangeRecord::replace(0, "a b c d", "1 2 c 4")]);
    }
}
