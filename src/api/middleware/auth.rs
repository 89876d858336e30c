//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;

/// Pull the token out of an `Authorization: Bearer <token>` header.
///
/// An absent header, another scheme or an empty token is `MissingToken`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::MissingToken)
}

/// JWT authentication middleware.
///
/// Validates the bearer token, then injects the caller's
/// [`Identity`](crate::services::Identity) into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = {
        let token = bearer_token(request.headers())?;
        state.auth_service.verify_token(token)?
    };

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(v) = value {
            map.insert(AUTHORIZATION, HeaderValue::from_str(v).unwrap());
        }
        map
    }

    #[test]
    fn test_bearer_token_extracted() {
        assert_eq!(bearer_token(&headers(Some("Bearer abc.def.ghi"))).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_or_malformed_header() {
        for value in [None, Some("Basic dXNlcjpwYXNz"), Some("Bearer "), Some("abc.def.ghi")] {
            assert!(matches!(
                bearer_token(&headers(value)),
                Err(AppError::MissingToken)
            ));
        }
    }
}
