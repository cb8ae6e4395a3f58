//! Request validation on top of `validator` derives.

use validator::{Validate, ValidationErrors};

use taskhub_core::error::AppError;

/// Run the derived checks on `request` and report the first failure as a
/// `Validation` error carrying the field's message.
pub fn validate_request<T: Validate>(request: &T) -> Result<(), AppError> {
    request.validate().map_err(|errors| {
        AppError::validation(first_message(&errors).unwrap_or_else(|| "Invalid request".into()))
    })
}

/// The message of the first failing check, taking fields in name order so
/// the result does not depend on map iteration order.
fn first_message(errors: &ValidationErrors) -> Option<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields.into_iter().find_map(|(field, errs)| {
        errs.first().map(|e| match &e.message {
            Some(message) => message.to_string(),
            None => format!("Invalid {field}"),
        })
    })
}
