use crate::{
    diffs::raw_operation::RawOperation,
    tokenizer::symbol_table::{Symbol, SymbolTable},
    types::change_record::ChangeRecord,
    utils::whitespace::char_len,
};

fn decode(symbols: &[Symbol], table: &SymbolTable) -> String {
    symbols.iter().map(|symbol| table.resolve(*symbol)).collect()
}

/// Turns elongated raw operations into change records while keeping track of
/// the character offset in the original text.
///
/// A delete immediately followed by an insert becomes one `Replace` so that
/// the host never renders a deletion and an insertion of the same stretch as
/// two separate redlines.
pub fn cook_records(operations: Vec<RawOperation<Symbol>>, table: &SymbolTable) -> Vec<ChangeRecord> {
    let mut records = Vec::new();
    let mut cursor = 0;
    let mut operations = operations.into_iter().peekable();

    while let Some(operation) = operations.next() {
        match operation {
            RawOperation::Equal(symbols) => cursor += char_len(&decode(&symbols, table)),
            RawOperation::Delete(symbols) => {
                let deleted = decode(&symbols, table);
                let deleted_length = char_len(&deleted);

                let record = match operations.next_if(|next| matches!(next, RawOperation::Insert(_))) {
                    Some(insert) => ChangeRecord::replace(cursor, deleted, decode(insert.elements(), table)),
                    None => ChangeRecord::delete(cursor, deleted),
                };

                records.push(record);
                cursor += deleted_length;
            }
            RawOperation::Insert(symbols) => {
                records.push(ChangeRecord::insert(cursor, decode(&symbols, table)));
            }
        }
    }

    records
}
