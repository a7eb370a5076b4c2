use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use service_core::error::{field_messages, AppError};
use std::collections::BTreeMap;
use validator::Validate;

/// JSON body that has been decoded and passed `Validate`.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        decode_and_validate(body).map(ValidatedJson)
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(e) => {
            AppError::invalid_field("body", "invalid_type", e.body_text())
        }
        JsonRejection::JsonSyntaxError(e) => {
            AppError::invalid_field("body", "invalid_json", e.body_text())
        }
        JsonRejection::MissingJsonContentType(e) => {
            AppError::invalid_field("body", "content_type", e.body_text())
        }
        other => AppError::BadRequest(anyhow::anyhow!(other.body_text())),
    }
}

/// Decodes a JSON object into `T` and validates it, reporting every bad field
/// in one error. A field of the wrong type is reported under its own name and
/// the remaining fields are still checked against their constraints.
fn decode_and_validate<T>(body: Value) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    let Value::Object(mut fields) = body else {
        return Err(AppError::invalid_field(
            "body",
            "invalid_type",
            "expected a JSON object".to_string(),
        ));
    };

    let decode_error = match serde_json::from_value::<T>(Value::Object(fields.clone())) {
        Ok(value) => {
            value.validate()?;
            return Ok(value);
        }
        Err(e) => e,
    };

    // Per-field isolation only works when every field of `T` has a default.
    if serde_json::from_value::<T>(Value::Object(Map::new())).is_err() {
        return Err(AppError::invalid_field(
            "body",
            "invalid_type",
            decode_error.to_string(),
        ));
    }

    let mut type_errors = BTreeMap::new();
    fields.retain(|key, value| {
        let mut single = Map::new();
        single.insert(key.clone(), value.clone());
        match serde_json::from_value::<T>(Value::Object(single)) {
            Ok(_) => true,
            Err(e) => {
                type_errors.insert(key.clone(), vec![e.to_string()]);
                false
            }
        }
    });

    let remainder = match serde_json::from_value::<T>(Value::Object(fields)) {
        Ok(value) => value,
        Err(_) => {
            return Err(AppError::invalid_field(
                "body",
                "invalid_type",
                decode_error.to_string(),
            ))
        }
    };

    let mut messages = match remainder.validate() {
        Ok(()) => BTreeMap::new(),
        Err(errors) => field_messages(&errors),
    };
    // A dropped field shows up again as a constraint failure on its default; the type error wins.
    messages.extend(type_errors);

    Err(AppError::InvalidFields(messages))
}

/// Query string that has been decoded and passed `Validate`.
pub struct ValidatedQuery<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(query_rejection)?;

        value.validate()?;

        Ok(ValidatedQuery(value))
    }
}

fn query_rejection(rejection: QueryRejection) -> AppError {
    AppError::invalid_field("query", "invalid_type", rejection.body_text())
}
