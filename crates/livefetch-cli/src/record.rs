//! JSON records as fetchable results.

use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

use livefetch_core::errors::FetchError;
use livefetch_core::Identifiable;
use serde::Serialize;
use serde_json::{Map, Number, Value};

/// One JSON object with a string `id`
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: String,
    fields: Map<String, Value>,
}

impl Record {
    /// Wrap a JSON value; `index` is its position in the input, for errors
    pub fn from_value(value: Value, index: usize) -> Result<Self, FetchError> {
        let Value::Object(fields) = value else {
            return Err(FetchError::InvalidInput {
                reason: format!("record #{index} is not a JSON object"),
            });
        };
        let id = match fields.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(_) => {
                return Err(FetchError::InvalidInput {
                    reason: format!("record #{index}: `id` must be a string"),
                })
            }
            None => {
                return Err(FetchError::InvalidInput {
                    reason: format!("record #{index} has no `id`"),
                })
            }
        };
        Ok(Self { id, fields })
    }

    /// Value of `name`, JSON null when absent
    pub fn field(&self, name: &str) -> FieldValue {
        FieldValue(self.fields.get(name).cloned().unwrap_or(Value::Null))
    }
}

impl Identifiable for Record {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Read a JSON array of records from `path`
pub fn load_records(path: &Path) -> Result<Vec<Record>, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let value: Value = serde_json::from_str(&text)
        .map_err(|e| format!("{} is not valid JSON: {}", path.display(), e))?;
    let Value::Array(items) = value else {
        return Err(FetchError::InvalidInput {
            reason: format!("{} must hold a JSON array of records", path.display()),
        }
        .into());
    };
    let records = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| Record::from_value(item, index))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// A JSON value with a total order, usable as sort and section key.
///
/// null < booleans < numbers < strings < arrays and objects; arrays and
/// objects compare by their JSON text.
#[derive(Clone, Serialize)]
#[serde(transparent)]
pub struct FieldValue(pub Value);

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) | Value::Object(_) => 4,
    }
}

enum Numeric {
    Int(i128),
    Float(f64),
}

impl From<&Number> for Numeric {
    fn from(n: &Number) -> Self {
        if let Some(i) = n.as_i64() {
            Numeric::Int(i128::from(i))
        } else if let Some(u) = n.as_u64() {
            Numeric::Int(i128::from(u))
        } else {
            Numeric::Float(n.as_f64().unwrap_or(0.0))
        }
    }
}

/// Compares by exact numeric value. JSON numbers are finite, so float
/// comparison never sees NaN; `-0.0` and `0.0` are equal.
fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    match (Numeric::from(a), Numeric::from(b)) {
        (Numeric::Int(x), Numeric::Int(y)) => x.cmp(&y),
        (Numeric::Float(x), Numeric::Float(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Numeric::Int(x), Numeric::Float(y)) => compare_int_float(x, y),
        (Numeric::Float(x), Numeric::Int(y)) => compare_int_float(y, x).reverse(),
    }
}

// Rounding an integer to f64 is monotonic, so a strict result is exact. A
// tie means `f` is integral and in range, so it is settled in i128.
fn compare_int_float(i: i128, f: f64) -> Ordering {
    match (i as f64).partial_cmp(&f) {
        Some(Ordering::Equal) | None => i.cmp(&(f as i128)),
        Some(ordering) => ordering,
    }
}

/// Total order over JSON values
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Null, Value::Null) => Ordering::Equal,
        _ if rank(a) != rank(b) => rank(a).cmp(&rank(b)),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FieldValue {}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_values(&self.0, &other.0)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_order_across_types() {
        let ordered = [
            json!(null),
            json!(false),
            json!(true),
            json!(-3),
            json!(2.5),
            json!(10),
            json!("a"),
            json!("b"),
            json!([1]),
        ];
        for pair in ordered.windows(2) {
            assert_eq!(
                compare_values(&pair[0], &pair[1]),
                Ordering::Less,
                "{} < {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_integer_and_float_compare_by_value() {
        assert_eq!(FieldValue(json!(1)), FieldValue(json!(1.0)));
        assert!(FieldValue(json!(2)) > FieldValue(json!(1.5)));
    }

    #[test]
    fn test_numbers_compare_exactly_near_two_pow_53() {
        let above = json!(9_007_199_254_740_993_i64);
        let exact = json!(9_007_199_254_740_992_i64);
        let float = json!(9_007_199_254_740_992.0_f64);

        assert_eq!(compare_values(&above, &exact), Ordering::Greater);
        assert_eq!(compare_values(&exact, &float), Ordering::Equal);
        assert_eq!(compare_values(&above, &float), Ordering::Greater);
        assert_eq!(compare_values(&float, &above), Ordering::Less);
    }

    #[test]
    fn test_number_order_is_transitive() {
        let values = [
            json!(9_007_199_254_740_993_i64),
            json!(9_007_199_254_740_992.0_f64),
            json!(9_007_199_254_740_992_i64),
            json!(u64::MAX),
            json!(1.8446744073709552e19_f64),
            json!(-0.0_f64),
            json!(0),
            json!(-1),
            json!(-0.5_f64),
        ];
        for a in &values {
            for b in &values {
                for c in &values {
                    let ab = compare_values(a, b);
                    let bc = compare_values(b, c);
                    if ab == bc {
                        assert_eq!(compare_values(a, c), ab, "{} {} {}", a, b, c);
                    }
                }
            }
        }

        let mut sorted: Vec<FieldValue> = values.iter().cloned().map(FieldValue).collect();
        sorted.sort();
        assert!(sorted.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_record_requires_string_id() {
        assert!(Record::from_value(json!({"id": "a", "x": 1}), 0).is_ok());
        assert!(Record::from_value(json!({"id": 1}), 1).is_err());
        assert!(Record::from_value(json!({"x": 1}), 2).is_err());
        assert!(Record::from_value(json!([1, 2]), 3).is_err());
    }

    #[test]
    fn test_missing_field_is_null() {
        let record = Record::from_value(json!({"id": "a"}), 0).unwrap();
        assert_eq!(record.field("folder"), FieldValue(Value::Null));
        assert_eq!(record.field("folder").to_string(), "null");
    }
}
