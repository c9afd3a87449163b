use axum::{
    extract::{FromRequest, Request},
    Json,
};

/// JSON body extractor that never rejects.
///
/// A missing, empty or malformed body is logged and replaced by `T::default()`,
/// so handlers always run and always answer 200.
pub struct LenientJson<T>(pub T);

impl<T, S> FromRequest<S> for LenientJson<T>
where
    T: serde::de::DeserializeOwned + Default + 'static,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(LenientJson(value)),
            Err(rejection) => {
                tracing::warn!(
                    "Ignoring unreadable JSON request body, using defaults: {}",
                    rejection
                );
                Ok(LenientJson(T::default()))
            }
        }
    }
}
