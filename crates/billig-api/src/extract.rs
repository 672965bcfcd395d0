//! JSON body extraction that fails inside the error envelope.
//!
//! [`axum::Json`] rejects bad bodies with a plain-text 422, which the
//! front-end cannot switch on. [`ApiJson`] delegates to it and converts
//! every rejection into an [`ApiError`], so a missing field comes back as
//! a 400 `{error, message}` envelope like any other validation failure.

use axum::extract::{FromRequest, Request, rejection::JsonRejection};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// [`axum::Json`] with the uniform error envelope on rejection.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(
    req: Request,
    state: &S,
  ) -> Result<Self, Self::Rejection> {
    match axum::Json::<T>::from_request(req, state).await {
      Ok(axum::Json(value)) => Ok(Self(value)),
      // Deserialization failures are almost always an absent field.
      Err(JsonRejection::JsonDataError(_)) => Err(ApiError::MissingFields),
      Err(_) => Err(ApiError::InvalidBody),
    }
  }
}
