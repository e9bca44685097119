use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ProfileError;
use crate::model::payroll::PayrollField;
use crate::model::profile::{
    EmployeeProfile, FieldKind, PersonalField, ProfileKey, ProfileUpdate, READ_ONLY_KEYS,
};
use crate::salary::reconcile::round2;
use crate::store::RecordStore;
use crate::utils::db_utils::SqlValue;

const MAX_WORKING_DAYS: u64 = 7;

pub async fn load_profile<S: RecordStore>(
    store: &S,
    employee_id: u64,
) -> Result<EmployeeProfile, ProfileError> {
    debug!(employee_id, "Loading employee profile");
    store.load_employee_record(employee_id).await
}

/// Save the keys present in `payload`; everything else keeps its stored value.
/// Returns how many fields were written.
pub async fn save_profile<S: RecordStore>(
    store: &S,
    employee_id: u64,
    payload: &Value,
    allow_restricted: bool,
) -> Result<usize, ProfileError> {
    let update = parse_profile_update(payload, allow_restricted)?;
    store.save_employee_record(employee_id, &update).await?;

    info!(employee_id, fields = update.len(), "Employee profile saved");
    Ok(update.len())
}

/// Turn a profile form payload into a partial update.
///
/// Blank text clears a field, a blank `name` is skipped, read-only keys are
/// ignored and unknown keys are rejected. Salary and work-schedule keys need
/// `allow_restricted`.
pub fn parse_profile_update(
    payload: &Value,
    allow_restricted: bool,
) -> Result<ProfileUpdate, ProfileError> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ProfileError::Validation("Payload must be a JSON object".into()))?;

    let mut update = ProfileUpdate::default();

    for (key, value) in obj {
        if READ_ONLY_KEYS.contains(&key.as_str()) {
            debug!(key = %key, "Ignoring read-only profile key");
            continue;
        }

        let profile_key = ProfileKey::parse(key)
            .ok_or_else(|| ProfileError::Validation(format!("Unknown profile field: {}", key)))?;

        if profile_key.is_restricted() && !allow_restricted {
            return Err(ProfileError::Forbidden("Only HR can change salary details"));
        }

        match profile_key {
            ProfileKey::Payroll(field) => {
                let amount = parse_decimal(key, value)?;
                if let Some(amount) = amount {
                    validate_payroll_value(field, amount)?;
                }
                update.set_payroll(field, amount.map(round2));
            }
            ProfileKey::Personal(field) => {
                if let Some(sql_value) = parse_personal(field, key, value)? {
                    update.set(profile_key, sql_value);
                }
            }
        }
    }

    Ok(update)
}

/// Pair percentages must sit in [0, 100] and amounts cannot go negative.
/// The fixed allowance is a residual and may be either sign.
pub fn validate_payroll_value(field: PayrollField, value: f64) -> Result<(), ProfileError> {
    if field.is_computed() {
        return Ok(());
    }
    if field.is_percent() {
        if !(0.0..=100.0).contains(&value) {
            return Err(ProfileError::Validation(format!(
                "{} must be between 0 and 100",
                field
            )));
        }
    } else if value < 0.0 {
        return Err(ProfileError::Validation(format!("{} cannot be negative", field)));
    }
    Ok(())
}

/// `None` means the key is left out of the update.
fn parse_personal(
    field: PersonalField,
    key: &str,
    value: &Value,
) -> Result<Option<SqlValue>, ProfileError> {
    let parsed = match field.kind() {
        // Keep the stored name unless a real one is sent
        FieldKind::Name => value
            .as_str()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| SqlValue::String(name.to_string())),
        FieldKind::Text => match value {
            Value::Null => Some(SqlValue::Null),
            Value::String(s) if s.is_empty() => Some(SqlValue::Null),
            Value::String(s) => Some(SqlValue::String(s.clone())),
            _ => return Err(ProfileError::Validation(format!("{} must be a string", key))),
        },
        FieldKind::Date => Some(parse_date(field, value)?),
        FieldKind::List => Some(parse_list(key, value)?),
        FieldKind::Integer => Some(match parse_decimal(key, value)? {
            None => SqlValue::Null,
            Some(days) if days.fract() == 0.0 && (0.0..=MAX_WORKING_DAYS as f64).contains(&days) => {
                SqlValue::I64(days as i64)
            }
            Some(_) => {
                return Err(ProfileError::Validation(format!(
                    "{} must be a whole number between 0 and {}",
                    key, MAX_WORKING_DAYS
                )));
            }
        }),
        FieldKind::Decimal => Some(match parse_decimal(key, value)? {
            None => SqlValue::Null,
            Some(hours) if hours >= 0.0 => SqlValue::F64(round2(hours)),
            Some(_) => {
                return Err(ProfileError::Validation(format!("{} cannot be negative", key)));
            }
        }),
    };

    Ok(parsed)
}

fn parse_date(field: PersonalField, value: &Value) -> Result<SqlValue, ProfileError> {
    let raw = match value {
        Value::Null => return Ok(SqlValue::Null),
        Value::String(s) if s.trim().is_empty() => return Ok(SqlValue::Null),
        Value::String(s) => s.trim(),
        _ => "",
    };

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(SqlValue::Date)
        .map_err(|_| {
            let label = match field {
                PersonalField::DateOfBirth => "date of birth",
                PersonalField::DateOfJoining => "date of joining",
                _ => field.as_ref(),
            };
            ProfileError::Validation(format!("Invalid {} format", label))
        })
}

/// Comma string or array of strings, trimmed, empties dropped, re-joined with ",".
fn parse_list(key: &str, value: &Value) -> Result<SqlValue, ProfileError> {
    let items: Vec<String> = match value {
        Value::Null => Vec::new(),
        Value::String(s) => s.split(',').map(|item| item.trim().to_string()).collect(),
        Value::Array(entries) => entries
            .iter()
            .map(|entry| {
                entry.as_str().map(|item| item.trim().to_string()).ok_or_else(|| {
                    ProfileError::Validation(format!("{} entries must be strings", key))
                })
            })
            .collect::<Result<_, _>>()?,
        _ => {
            return Err(ProfileError::Validation(format!(
                "{} must be a comma separated string or a list",
                key
            )));
        }
    };

    let joined = items
        .into_iter()
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(",");

    Ok(if joined.is_empty() {
        SqlValue::Null
    } else {
        SqlValue::String(joined)
    })
}

/// Numbers arrive either as JSON numbers or as the form's raw strings.
fn parse_decimal(key: &str, value: &Value) -> Result<Option<f64>, ProfileError> {
    let invalid = || ProfileError::Validation(format!("Invalid number for {}", key));

    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_f64().map(Some).ok_or_else(invalid),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(invalid),
        _ => Err(invalid()),
    }
}
