use std::fmt::Debug;

/// A diff operation over a run of consecutive elements. Adjacent operations
/// of the same kind can be joined.
#[derive(Debug, Clone, PartialEq)]
pub enum RawOperation<T>
where
    T: PartialEq + Clone + Debug,
{
    Insert(Vec<T>),
    Delete(Vec<T>),
    Equal(Vec<T>),
}

impl<T> RawOperation<T>
where
    T: PartialEq + Clone + Debug,
{
    pub fn elements(&self) -> &Vec<T> {
        match self {
            RawOperation::Insert(elements)
            | RawOperation::Delete(elements)
            | RawOperation::Equal(elements) => elements,
        }
    }

    /// Extends the operation with another operation. Only operations of the
    /// same type as self can be used to extend self.
    pub fn join(self, other: RawOperation<T>) -> RawOperation<T> {
        debug_assert!(
            std::mem::discriminant(&self) == std::mem::discriminant(&other),
            "Cannot join operations of different types. This should have been handled before \
             calling this function."
        );

        match (self, other) {
            (RawOperation::Insert(left), RawOperation::Insert(right)) => {
                RawOperation::Insert(left.into_iter().chain(right).collect())
            }
            (RawOperation::Delete(left), RawOperation::Delete(right)) => {
                RawOperation::Delete(left.into_iter().chain(right).collect())
            }
            (RawOperation::Equal(left), RawOperation::Equal(right)) => {
                RawOperation::Equal(left.into_iter().chain(right).collect())
            }
            (operation, _) => operation,
        }
    }
}
