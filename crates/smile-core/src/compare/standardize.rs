use crate::value::Record;

use super::policy::RenameTable;

/// Returns a copy of `record` with legacy property names replaced by their
/// canonical names from `table`.
///
/// Each renamed value is moved under the canonical name; if the record
/// already carries the canonical name, the renamed legacy value wins. Fields
/// not in the table are copied unchanged, so a table sharing no names with
/// the record is a no-op.
pub fn standardize_record(record: &Record, table: &RenameTable) -> Record {
    if table.is_empty() {
        return record.clone();
    }
    let mut out = Record::new();
    let mut renamed = Vec::new();
    for (name, value) in record {
        match table.canonical_name(name) {
            Some(canonical) => renamed.push((canonical.to_owned(), value.clone())),
            None => {
                out.insert(name.clone(), value.clone());
            }
        }
    }
    out.extend(renamed);
    out
}
