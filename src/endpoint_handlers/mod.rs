use axum::extract::FromRequestParts;
use log::warn;
use serde::{Deserialize, Deserializer};

use crate::auth_middleware::Principal;
use crate::errors::{ApiError, FieldMessages};
use crate::policies::admin_only;
use crate::AppState;

pub mod admin;
pub mod albums;
pub mod messages;
pub mod songs;
pub mod users;

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";
const MAX_LENGTH: usize = 255;

/// Path parameters, rejected with the same JSON error body as everything else.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub(crate) struct Path<T>(pub(crate) T);

/// `Full` for create and replace, `Partial` for patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    Full,
    Partial,
}

/// Collects per-field validation messages for a request body.
#[derive(Default, Debug)]
pub(crate) struct FieldErrors(FieldMessages);

impl FieldErrors {
    pub(crate) fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub(crate) fn required<T>(&mut self, field: &str, value: Option<T>, mode: Mode) -> Option<T> {
        if value.is_none() && mode == Mode::Full {
            self.add(field, REQUIRED);
        }
        value
    }

    /// Non-blank text of at most 255 characters.
    pub(crate) fn text(
        &mut self,
        field: &str,
        value: Option<String>,
        mode: Mode,
    ) -> Option<String> {
        let value = self.long_text(field, value, mode)?;
        if value.chars().count() > MAX_LENGTH {
            self.add(
                field,
                format!("Ensure this field has no more than {MAX_LENGTH} characters."),
            );
            return None;
        }
        Some(value)
    }

    /// Non-blank text of any length.
    pub(crate) fn long_text(
        &mut self,
        field: &str,
        value: Option<String>,
        mode: Mode,
    ) -> Option<String> {
        let value = self.required(field, value, mode)?;
        if value.trim().is_empty() {
            self.add(field, BLANK);
            return None;
        }
        Some(value)
    }

    pub(crate) fn missing_record(&mut self, field: &str, id: i32) {
        self.add(field, format!("Invalid pk \"{id}\" - object does not exist."));
    }

    pub(crate) fn finish(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.0))
        }
    }
}

pub(crate) fn require_admin(
    state: &AppState,
    principal: Option<&Principal>,
) -> Result<(), ApiError> {
    if admin_only(state.admin.as_ref(), principal) {
        return Ok(());
    }
    match principal {
        Some(p) => warn!("User {} is not allowed to administer the catalog", p.email),
        None => warn!("Anonymous caller tried an administrative action"),
    }
    Err(ApiError::Forbidden)
}

/// Tells an absent field (`None`) apart from an explicit `null` (`Some(None)`).
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
