//! Trigger body validation
//!
//! Errors are the first violated constraint, worded the way the upstream
//! trigger callers already parse them: `"company_id" is required`.

use crate::domain::{CompanyId, Direction};
use serde_json::{Map, Value};

/// A validated `POST /distribute` body
#[derive(Debug, Clone, PartialEq)]
pub struct DistributeRequest {
    pub company_id: CompanyId,
    pub position: Direction,
}

const ALLOWED_KEYS: [&str; 2] = ["company_id", "position"];

/// Validate a trigger body
///
/// Keys are checked in declaration order, then unknown keys are rejected.
pub fn validate_distribute_request(body: &Value) -> Result<DistributeRequest, String> {
    let Value::Object(fields) = body else {
        return Err("\"value\" must be of type object".to_string());
    };

    let company_id = required_string(fields, "company_id")?;
    if company_id.contains('/') {
        return Err("\"company_id\" must not contain '/'".to_string());
    }

    let position = required_string(fields, "position")?;
    let position: Direction = position.parse().map_err(|_| {
        let valid: Vec<&str> = Direction::ALL.iter().map(|d| d.as_str()).collect();
        format!("\"position\" must be one of [{}]", valid.join(", "))
    })?;

    if let Some(unknown) = fields.keys().find(|k| !ALLOWED_KEYS.contains(&k.as_str())) {
        return Err(format!("\"{unknown}\" is not allowed"));
    }

    let company_id = CompanyId::new(company_id).map_err(|e| format!("\"company_id\" {e}"))?;

    Ok(DistributeRequest {
        company_id,
        position,
    })
}

fn required_string<'a>(fields: &'a Map<String, Value>, key: &str) -> Result<&'a str, String> {
    match fields.get(key) {
        None | Some(Value::Null) => Err(format!("\"{key}\" is required")),
        Some(Value::String(s)) if s.is_empty() => {
            Err(format!("\"{key}\" is not allowed to be empty"))
        }
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(format!("\"{key}\" must be a string")),
    }
}
