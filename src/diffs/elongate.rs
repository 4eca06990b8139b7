use std::fmt::Debug;

use crate::diffs::raw_operation::RawOperation;

/// Joins runs of single-element operations into the longest possible
/// operations. Between two `Equal` runs the inserts and deletes can be
/// interleaved, such as `IDIDID`; these are regrouped into one delete
/// followed by one insert, so that every edited stretch of the text reads as
/// "this was removed, this was added".
pub fn elongate_operations<I, T>(raw_operations: I) -> Vec<RawOperation<T>>
where
    I: IntoIterator<Item = RawOperation<T>>,
    T: PartialEq + Clone + Debug,
{
    let mut result: Vec<RawOperation<T>> = Vec::new();
    let mut pending_delete: Option<RawOperation<T>> = None;
    let mut pending_insert: Option<RawOperation<T>> = None;

    for next in raw_operations {
        match next {
            RawOperation::Delete(..) => {
                pending_delete = Some(match pending_delete.take() {
                    Some(previous) => previous.join(next),
                    None => next,
                });
            }
            RawOperation::Insert(..) => {
                pending_insert = Some(match pending_insert.take() {
                    Some(previous) => previous.join(next),
                    None => next,
                });
            }
            RawOperation::Equal(..) => {
                result.extend(pending_delete.take());
                result.extend(pending_insert.take());

                match result.pop() {
                    Some(previous @ RawOperation::Equal(..)) => result.push(previous.join(next)),
                    Some(previous) => {
                        result.push(previous);
                        result.push(next);
                    }
                    None => result.push(next),
                }
            }
        }
    }

    result.extend(pending_delete);
    result.extend(pending_insert);

    result
}
