//! Invoice documents and flattened line-item rows
//!
//! [`Invoice`] mirrors the document shape held by the store. Fields the
//! pipeline does not read are ignored on deserialization. Amounts arrive as
//! JSON numbers or as numeric strings, depending on which importer wrote the
//! document, so both are accepted. Descriptive fields that only flow through
//! to the dataset are kept as raw JSON values, so a document with an unusual
//! type code or a null name still yields its rows.

use super::direction::Directional;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Invoice-level accounting data for one direction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceAccounting {
    /// Classification state, `"verified"` once the accounting is final
    #[serde(
        default,
        deserialize_with = "deserialize_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub state: Option<String>,
}

/// Item-level accounting data for one direction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemAccounting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_description: Option<Value>,

    /// Accounting classification code; numeric or string depending on the chart
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounting_classification: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytic_classification: Option<Value>,
}

/// One line of an invoice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_description: Option<Value>,

    #[serde(
        default,
        deserialize_with = "deserialize_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity: Option<f64>,

    #[serde(
        default,
        deserialize_with = "deserialize_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub total: Option<f64>,

    #[serde(default)]
    pub accounting_specifications: Directional<ItemAccounting>,
}

/// An invoice document
///
/// `id` is the document key and is not part of the stored body; adapters fill
/// it in when they materialize the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(default)]
    pub id: String,

    /// Tax id of the issuer
    #[serde(
        default,
        deserialize_with = "deserialize_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub sender_id: Option<String>,

    /// Tax id of the receiver
    #[serde(
        default,
        deserialize_with = "deserialize_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub receptor_id: Option<String>,

    /// Document type code, usually numeric (`33`) but stored as text by some importers
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub invoice_type: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub establishment_id: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub establishment_name: Option<Value>,

    #[serde(default)]
    pub accounting_specifications: Directional<InvoiceAccounting>,

    #[serde(default)]
    pub items: Vec<InvoiceItem>,
}

/// One flattened output row
///
/// A pure derivation from an [`Invoice`] and one of its [`InvoiceItem`]s.
/// Serialized field names are the dataset column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemRow {
    pub initial_description: Option<Value>,
    pub final_description: Option<Value>,
    pub unit_total: f64,
    pub company_tid: Option<String>,
    pub invoice_type: Option<Value>,
    pub accounting_classification: Option<Value>,
    pub analytic_classification: Option<Value>,
    pub establishment_id: Option<Value>,
    pub establishment_name: Option<Value>,
}

/// Accepts a number, a numeric string, or null
///
/// Strings are trimmed and parsed as `f64`; anything unparseable becomes
/// `None` so the transform can reject the item instead of failing the whole
/// document.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Accepts a string or a number; null and anything else become `None`
fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
