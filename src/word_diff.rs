mod coalesce;
mod cook;

pub use coalesce::coalesce_records;
use log::trace;

use crate::{
    diffs::{elongate::elongate_operations, myers::myers_diff},
    policy::ReconcilePolicy,
    tokenizer::{symbol_table::SymbolTable, word_tokenizer::word_tokenizer},
    types::change_record::ChangeRecord,
};

/// Computes the word-level edits that turn `original` into `proposed`.
///
/// Both texts are split into alternating word and whitespace tokens, every
/// distinct token is interned into a symbol, and the symbol sequences are
/// diffed with Myers' algorithm. A deletion directly followed by an insertion
/// becomes a single `Replace`, and records that are close to each other are
/// coalesced (see [`coalesce_records`]) so that the reviewer is not shown a
/// flurry of tiny edits.
///
/// ```
/// use redline_text::{ChangeRecord, ReconcilePolicy, diff};
///
/// let records = diff(
///     "The NROFR clause applies.",
///     "The ROFN clause applies.",
///     &ReconcilePolicy::default(),
/// );
/// assert_eq!(records, vec![ChangeRecord::replace(4, "NROFR", "ROFN")]);
/// ```
#[must_use]
pub fn diff(original: &str, proposed: &str, policy: &ReconcilePolicy) -> Vec<ChangeRecord> {
    if original == proposed {
        return Vec::new();
    }

    if proposed.trim().is_empty() {
        return if original.is_empty() {
            Vec::new()
        } else {
            vec![ChangeRecord::delete(0, original)]
        };
    }

    let mut symbols = SymbolTable::new();
    let original_symbols = symbols.intern_all(&word_tokenizer(original));
    let proposed_symbols = symbols.intern_all(&word_tokenizer(proposed));

    let operations = elongate_operations(myers_diff(&original_symbols, &proposed_symbols));
    let records = cook::cook_records(operations, &symbols);
    let record_count = records.len();
    let coalesced = coalesce_records(records, original, policy);

    trace!(
        "Word diff over {} distinct tokens produced {record_count} record(s), {} after coalescing",
        symbols.len(),
        coalesced.len()
    );

    coalesced
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;
    use crate::types::change_record::{ChangeKind, apply_records};

    fn default_diff(original: &str, proposed: &str) -> Vec<ChangeRecord> {
        diff(original, proposed, &ReconcilePolicy::default())
    }

    #[test]
    fn test_identical_texts() {
        assert!(default_diff("The clause applies.", "The clause applies.").is_empty());
        assert!(default_diff("", "").is_empty());
    }

    #[test]
    fn test_acronym_swap_is_a_single_replace() {
        assert_eq!(
            default_diff("The NROFR clause applies.", "The ROFN clause applies."),
            vec![ChangeRecord::replace(4, "NROFR", "ROFN")]
        );
    }

    #[test]
    fn test_empty_proposal_deletes_everything() {
        assert_eq!(
            default_diff("Tenant shall pay rent.", ""),
            vec![ChangeRecord::delete(0, "Tenant shall pay rent.")]
        );
        assert_eq!(
            default_diff("Tenant shall pay rent.", "  \n"),
            vec![ChangeRecord::delete(0, "Tenant shall pay rent.")]
        );
    }

    #[test]
    fn test_empty_original_inserts_everything() {
        assert_eq!(
            default_diff("", "New clause."),
            vec![ChangeRecord::insert(0, "New clause.")]
        );
    }

    #[test]
    fn test_lone_insert_anchors_at_cursor() {
        let original = "The clause applies.";
        let proposed = "The clause always applies.";

        let records = default_diff(original, proposed);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, ChangeKind::Insert);
        assert!((10..=11).contains(&records[0].offset));
        assert_eq!(apply_records(original, &records).unwrap(), proposed);
    }

    #[test]
    fn test_punctuation_makes_a_word_differ() {
        let records = default_diff(
            "The landlord may terminate this lease at the end of any calendar month.",
            "The landlord may terminate this lease at the end of any calendar month or quarter.",
        );

        assert_eq!(records, vec![ChangeRecord::replace(
            65,
            "month.",
            "month or quarter."
        )]);
    }

    #[test]
    fn test_distant_edits_stay_separate() {
        let original = "Alpha clause governs payment terms and the other clause governs delivery terms.";
        let proposed = "Beta clause governs payment terms and the other clause governs shipping terms.";

        let records = default_diff(original, proposed);

        assert_eq!(records, vec![
            ChangeRecord::replace(0, "Alpha", "Beta"),
            ChangeRecord::replace(64, "delivery", "shipping"),
        ]);
        assert!(records.iter().all(|record| record.kind == ChangeKind::Replace));
    }

    #[test]
    fn test_nearby_edits_coalesce() {
        let records = default_diff("The NR OF R clause", "The R OF N clause");

        assert_eq!(records, vec![ChangeRecord::replace(4, "NR OF R", "R OF N")]);
    }

    #[test]
    fn test_pure_deletion() {
        let original = "This lease, including all schedules and annexes attached hereto, is binding.";
        let proposed = "This lease is binding.";

        let records = default_diff(original, proposed);

        assert_eq!(records.len(), 1);
        assert_eq!(apply_records(original, &records).unwrap(), proposed);
    }

    #[test_case("Tenant shall pay rent.", "Tenant shall promptly pay the rent."; "insertions")]
    #[test_case("a b c d e f g h", "a x c d e f y h"; "replacements")]
    #[test_case("Straße über Brücke", "Straße unter Brücke"; "unicode")]
    #[test_case("one  two\nthree", "one two three"; "whitespace only")]
    #[test_case("", "fresh text"; "from empty")]
    #[test_case("short", "a completely different and much longer sentence"; "rewrite")]
    fn test_records_reproduce_proposal(original: &str, proposed: &str) {
        let records = default_diff(original, proposed);
        assert_eq!(apply_records(original, &records).unwrap(), proposed);
    }
}
