//! Validation of the homework API response and status extraction

use serde_json::Value;

use crate::verdict::HomeworkStatus;
use crate::HomeworkBotError;

/// Text produced when the API reports no homework activity
pub const STATUS_UNCHANGED: &str = "Homework status has not changed.";

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Check the response shape and return its `homeworks` list.
///
/// `current_date` is validated here as well so that a record which passes is
/// safe to read with [`current_date`].
pub fn check_response(response: &Value) -> crate::Result<&[Value]> {
    let object = response.as_object().ok_or_else(|| {
        tracing::error!("Response is a {}, expected an object", type_name(response));
        HomeworkBotError::Shape(type_name(response).to_string())
    })?;

    let homeworks = match object.get("homeworks") {
        None => {
            tracing::error!("Key 'homeworks' is missing from the response");
            return Err(HomeworkBotError::MissingHomeworks);
        }
        Some(Value::Array(list)) => list.as_slice(),
        Some(other) => {
            tracing::error!("'homeworks' is a {}, expected an array", type_name(other));
            return Err(HomeworkBotError::InvalidType(format!(
                "'homeworks' must be an array, got {}",
                type_name(other)
            )));
        }
    };

    current_date(response)?;
    Ok(homeworks)
}

/// Read the server-side cursor from a response
pub fn current_date(response: &Value) -> crate::Result<i64> {
    let object = response
        .as_object()
        .ok_or_else(|| HomeworkBotError::Shape(type_name(response).to_string()))?;

    match object.get("current_date") {
        None => {
            tracing::error!("Key 'current_date' is missing from the response");
            Err(HomeworkBotError::MissingCursor)
        }
        Some(value) => value.as_i64().ok_or_else(|| {
            tracing::error!("'current_date' is {}, expected an integer", value);
            HomeworkBotError::InvalidType(format!(
                "'current_date' must be an integer, got {}",
                value
            ))
        }),
    }
}

fn string_field<'a>(homework: &'a Value, field: &str) -> crate::Result<&'a str> {
    match homework.get(field) {
        None => {
            tracing::error!("Homework record has no '{}'", field);
            Err(HomeworkBotError::MissingFields(field.to_string()))
        }
        Some(Value::String(s)) => Ok(s),
        Some(other) => {
            tracing::error!("'{}' is a {}, expected a string", field, type_name(other));
            Err(HomeworkBotError::InvalidType(format!(
                "'{}' must be a string, got {}",
                field,
                type_name(other)
            )))
        }
    }
}

/// Build the notification text for a single homework record
pub fn parse_status(homework: &Value) -> crate::Result<String> {
    let homework_name = string_field(homework, "homework_name")?;
    let raw_status = string_field(homework, "status")?;
    let status: HomeworkStatus = raw_status.parse().inspect_err(|_| {
        tracing::error!("Homework status '{}' is not recognized", raw_status);
    })?;

    Ok(format!(
        "Changed status of check for \"{}\". {}",
        homework_name,
        status.verdict()
    ))
}

/// Text for the most recent homework, or [`STATUS_UNCHANGED`] if there is none
pub fn latest_status_message(homeworks: &[Value]) -> crate::Result<String> {
    match homeworks.first() {
        Some(latest) => parse_status(latest),
        None => Ok(STATUS_UNCHANGED.to_string()),
    }
}
