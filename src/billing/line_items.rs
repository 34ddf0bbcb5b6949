use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use thiserror::Error;
use utoipa::ToSchema;

/// Whether a billed part is new or second-hand. Drives the markup rate.
///
/// Stored as `nuevo` / `usado`; `new` / `used` are accepted on input and
/// anything else (a missing value, another string, a number) counts as new.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(from = "Value")]
pub enum PartCondition {
    #[default]
    #[serde(rename = "nuevo")]
    New,
    #[serde(rename = "usado")]
    Used,
}

impl From<Value> for PartCondition {
    fn from(value: Value) -> Self {
        match value.as_str().map(str::trim) {
            Some(kind) if kind.eq_ignore_ascii_case("usado") || kind.eq_ignore_ascii_case("used") => {
                PartCondition::Used
            }
            _ => PartCondition::New,
        }
    }
}

/// One part on an invoice. `markup` and `final_price` are filled in by the
/// calculator; unknown keys are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PartLine {
    #[serde(rename = "nombre", alias = "name", default)]
    pub name: String,
    #[serde(
        rename = "descripcion",
        alias = "description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(rename = "precio", alias = "base_price", default)]
    pub base_price: Decimal,
    #[serde(rename = "tipo", alias = "type", default)]
    pub condition: PartCondition,
    /// Markup percentage applied to `base_price`.
    #[serde(rename = "margen", alias = "markup", default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<Decimal>,
    #[serde(
        rename = "precio_final",
        alias = "final_price",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub final_price: Option<Decimal>,
    #[serde(flatten)]
    #[schema(ignore)]
    pub extra: Map<String, Value>,
}

impl PartLine {
    pub fn new(name: impl Into<String>, base_price: Decimal, condition: PartCondition) -> Self {
        Self {
            name: name.into(),
            base_price,
            condition,
            ..Default::default()
        }
    }
}

/// One labor entry on an invoice. Only `total` takes part in the arithmetic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LaborLine {
    #[serde(rename = "descripcion", alias = "description", default)]
    pub description: String,
    #[serde(default)]
    pub total: Decimal,
    #[serde(flatten)]
    #[schema(ignore)]
    pub extra: Map<String, Value>,
}

impl LaborLine {
    pub fn new(description: impl Into<String>, total: Decimal) -> Self {
        Self {
            description: description.into(),
            total,
            ..Default::default()
        }
    }
}

/// Stored line-item detail that exists but cannot be decoded.
#[derive(Debug, Error)]
pub enum DetailError {
    #[error("stored {field} is corrupt: {source}")]
    Corrupt {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub fn decode_parts(raw: Option<&Value>) -> Result<Vec<PartLine>, DetailError> {
    decode("parts_detail", raw)
}

pub fn decode_labor(raw: Option<&Value>) -> Result<Vec<LaborLine>, DetailError> {
    decode("labor_detail", raw)
}

/// Decodes a JSON list column. A missing or null column is an empty list;
/// anything else must be a well-formed list of `T`.
pub fn decode<T: DeserializeOwned>(
    field: &'static str,
    raw: Option<&Value>,
) -> Result<Vec<T>, DetailError> {
    match raw {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|source| DetailError::Corrupt { field, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn reads_wire_names_and_keeps_unknown_keys() {
        let raw = json!([
            { "nombre": "Pastillas", "precio": 45, "tipo": "usado", "referencia": "PF-22" }
        ]);
        let parts = decode_parts(Some(&raw)).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].name, "Pastillas");
        assert_eq!(parts[0].base_price, dec!(45));
        assert_eq!(parts[0].condition, PartCondition::Used);
        assert_eq!(parts[0].extra.get("referencia"), Some(&json!("PF-22")));

        let back = serde_json::to_value(&parts).unwrap();
        assert_eq!(back[0]["tipo"], json!("usado"));
        assert_eq!(back[0]["referencia"], json!("PF-22"));
    }

    #[test]
    fn accepts_english_aliases() {
        let raw = json!([{ "name": "Filter", "base_price": 12.5, "type": "used" }]);
        let parts = decode_parts(Some(&raw)).unwrap();
        assert_eq!(parts[0].base_price, dec!(12.5));
        assert_eq!(parts[0].condition, PartCondition::Used);
    }

    #[test]
    fn unknown_or_missing_condition_is_new() {
        let raw = json!([
            { "nombre": "A", "precio": 1, "tipo": "refurbished" },
            { "nombre": "B", "precio": 2 },
            { "nombre": "C", "precio": 3, "tipo": null }
        ]);
        let parts = decode_parts(Some(&raw)).unwrap();
        assert!(parts.iter().all(|p| p.condition == PartCondition::New));
    }

    #[test]
    fn non_string_condition_is_new() {
        let raw = json!([
            { "nombre": "A", "precio": 10, "tipo": 1 },
            { "nombre": "B", "precio": 20, "tipo": true },
            { "nombre": "C", "precio": 30, "tipo": { "estado": "usado" } },
            { "nombre": "D", "precio": 40, "tipo": ["usado"] }
        ]);
        let parts = decode_parts(Some(&raw)).unwrap();
        assert_eq!(parts.len(), 4);
        assert!(parts.iter().all(|p| p.condition == PartCondition::New));
    }

    #[test]
    fn absent_detail_is_empty() {
        assert!(decode_parts(None).unwrap().is_empty());
        assert!(decode_labor(Some(&Value::Null)).unwrap().is_empty());
    }

    #[test]
    fn corrupt_detail_is_reported() {
        let raw = json!({ "not": "a list" });
        let err = decode_labor(Some(&raw)).unwrap_err();
        assert!(err.to_string().contains("labor_detail"));

        let raw = json!("[{\"precio\": 10}");
        assert!(decode_parts(Some(&raw)).is_err());
    }
}
