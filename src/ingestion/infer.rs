//! Column type inference and header normalization shared by the CSV and Excel readers.

use std::collections::{HashMap, HashSet};

use crate::types::{DataType, Value};

/// Normalize raw header cells into unique column names.
///
/// - blank (empty or whitespace-only) headers become `Unnamed: {index}`; others are kept verbatim
/// - repeated headers get a `.1`, `.2`, ... suffix in order of appearance
pub fn normalize_headers<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut suffixes: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<String> = Vec::with_capacity(raw.len());

    for (idx, h) in raw.iter().enumerate() {
        let raw_name = h.as_ref();
        let base = if raw_name.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            raw_name.to_string()
        };

        let mut name = base.clone();
        if taken.contains(&name) {
            let n = suffixes.entry(base.clone()).or_insert(0);
            loop {
                *n += 1;
                name = format!("{base}.{n}");
                if !taken.contains(&name) {
                    break;
                }
            }
        }
        taken.insert(name.clone());
        out.push(name);
    }

    out
}

/// Infer the narrowest [`DataType`] that every non-empty text cell parses into.
///
/// Order of preference: `Int64`, `Float64`, `Bool`, `Utf8`. A column with no non-empty cells
/// is `Utf8`.
pub fn infer_text_type<'a, I>(cells: I) -> DataType
where
    I: IntoIterator<Item = &'a str>,
{
    let mut any = false;
    let mut int = true;
    let mut float = true;
    let mut boolean = true;

    for raw in cells {
        let s = raw.trim();
        if s.is_empty() {
            continue;
        }
        any = true;
        int = int && s.parse::<i64>().is_ok();
        float = float && s.parse::<f64>().is_ok();
        boolean = boolean && parse_bool(s).is_some();
        if !int && !float && !boolean {
            return DataType::Utf8;
        }
    }

    match (any, int, float, boolean) {
        (false, ..) => DataType::Utf8,
        (true, true, _, _) => DataType::Int64,
        (true, _, true, _) => DataType::Float64,
        (true, _, _, true) => DataType::Bool,
        _ => DataType::Utf8,
    }
}

/// Strict boolean literal parsing used for inference (`true`/`false`, any ASCII case).
pub fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Pick one [`DataType`] for a column of already-typed values.
///
/// Integers widen to floats when mixed with them; any other mix falls back to `Utf8`.
pub fn unify_value_type<'a, I>(values: I) -> DataType
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut current: Option<DataType> = None;

    for v in values {
        let t = match v {
            Value::Null => continue,
            Value::Int64(_) => DataType::Int64,
            Value::Float64(_) => DataType::Float64,
            Value::Bool(_) => DataType::Bool,
            Value::Utf8(_) => return DataType::Utf8,
        };
        current = Some(match (current, t) {
            (None, t) => t,
            (Some(a), b) if a == b => a,
            (Some(DataType::Int64), DataType::Float64) | (Some(DataType::Float64), DataType::Int64) => {
                DataType::Float64
            }
            _ => return DataType::Utf8,
        });
    }

    current.unwrap_or(DataType::Utf8)
}

/// Convert a value into `target`, assuming `target` came from [`unify_value_type`] over the
/// same column.
pub fn coerce_value(value: Value, target: DataType) -> Value {
    match (value, target) {
        (Value::Null, _) => Value::Null,
        (Value::Int64(i), DataType::Float64) => Value::Float64(i as f64),
        (v @ Value::Utf8(_), DataType::Utf8) => v,
        (v, DataType::Utf8) => Value::Utf8(v.to_string()),
        (v, _) => v,
    }
}
