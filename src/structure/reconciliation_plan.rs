#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How many existing list items or table rows are rewritten, how many new
/// ones are appended, and how many are deleted when `existing` entries are
/// replaced by `proposed` ones.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconciliationPlan {
    pub rewrite: usize,
    pub append: usize,
    pub delete: usize,
}

/// A single step of a [`ReconciliationPlan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedStep {
    /// Rewrite existing entry `index` with proposed entry `index`.
    Rewrite(usize),
    /// Insert proposed entry `index` after the rewritten ones.
    Append(usize),
    /// Remove existing entry `index`.
    Delete(usize),
}

impl ReconciliationPlan {
    #[must_use]
    pub fn new(existing: usize, proposed: usize) -> Self {
        Self {
            rewrite: existing.min(proposed),
            append: proposed.saturating_sub(existing),
            delete: existing.saturating_sub(proposed),
        }
    }

    /// Every step in execution order: rewrites front to back, then appends,
    /// then deletions from the last entry towards the first. Each phase only
    /// relies on indices the previous phases left untouched.
    pub fn steps(&self) -> impl Iterator<Item = PlannedStep> + use<> {
        let Self {
            rewrite,
            append,
            delete,
        } = *self;

        (0..rewrite)
            .map(PlannedStep::Rewrite)
            .chain((rewrite..rewrite + append).map(PlannedStep::Append))
            .chain((rewrite..rewrite + delete).rev().map(PlannedStep::Delete))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    #[test_case(3, 3, (3, 0, 0) ; "same length")]
    #[test_case(2, 5, (2, 3, 0) ; "growing")]
    #[test_case(5, 2, (2, 0, 3) ; "shrinking")]
    #[test_case(0, 4, (0, 4, 0) ; "from nothing")]
    #[test_case(4, 0, (0, 0, 4) ; "to nothing")]
    fn test_counts(existing: usize, proposed: usize, expected: (usize, usize, usize)) {
        let plan = ReconciliationPlan::new(existing, proposed);

        assert_eq!((plan.rewrite, plan.append, plan.delete), expected);
        assert_eq!(plan.rewrite + plan.append, proposed);
        assert_eq!(plan.rewrite + plan.delete, existing);
    }

    #[test]
    fn test_step_order() {
        let steps = ReconciliationPlan::new(4, 2).steps().collect::<Vec<_>>();

        assert_eq!(steps, vec![
            PlannedStep::Rewrite(0),
            PlannedStep::Rewrite(1),
            PlannedStep::Delete(3),
            PlannedStep::Delete(2),
        ]);
    }

    #[test]
    fn test_appends_follow_rewrites() {
        let steps = ReconciliationPlan::new(1, 3).steps().collect::<Vec<_>>();

        assert_eq!(steps, vec![
            PlannedStep::Rewrite(0),
            PlannedStep::Append(1),
            PlannedStep::Append(2),
        ]);
    }
}
