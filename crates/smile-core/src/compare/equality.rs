use crate::value::{FieldValue, Record};

/// Strict structural equality of two normalized values.
///
/// Objects must hold the same property set with equal values; arrays must
/// hold equal elements in the same order; scalars must agree in type and
/// value. There is no case folding, trimming or numeric coercion.
pub fn structurally_equal(a: &FieldValue, b: &FieldValue) -> bool {
    a == b
}

/// [`structurally_equal`] for two records.
pub fn records_equal(a: &Record, b: &Record) -> bool {
    a == b
}

/// Returns `true` when two raw documents are byte-identical, in which case
/// they are equal without parsing.
pub fn raw_identical(a: &str, b: &str) -> bool {
    a == b
}

/// Finds the first place where two records differ.
///
/// Returns a dotted path such as `$.libraries[0].libraryVolume`, or `None`
/// when the records are equal. Only used to make mismatch log events
/// actionable; it plays no part in the verdict.
pub fn first_divergence(a: &Record, b: &Record) -> Option<String> {
    divergence_in_record("$", a, b)
}

fn divergence_in_record(path: &str, a: &Record, b: &Record) -> Option<String> {
    for (name, av) in a {
        let child = format!("{path}.{name}");
        match b.get(name) {
            None => return Some(child),
            Some(bv) => {
                if let Some(found) = divergence_in_value(&child, av, bv) {
                    return Some(found);
                }
            }
        }
    }
    b.keys()
        .find(|name| !a.contains_key(*name))
        .map(|name| format!("{path}.{name}"))
}

fn divergence_in_value(path: &str, a: &FieldValue, b: &FieldValue) -> Option<String> {
    match (a, b) {
        (FieldValue::Object(ao), FieldValue::Object(bo)) => divergence_in_record(path, ao, bo),
        (FieldValue::Array(aa), FieldValue::Array(ba)) => {
            for (i, (av, bv)) in aa.iter().zip(ba.iter()).enumerate() {
                if let Some(found) = divergence_in_value(&format!("{path}[{i}]"), av, bv) {
                    return Some(found);
                }
            }
            if aa.len() == ba.len() {
                None
            } else {
                Some(format!("{path}[{}]", aa.len().min(ba.len())))
            }
        }
        _ if a == b => None,
        _ => Some(path.to_owned()),
    }
}
