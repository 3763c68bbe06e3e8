use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{HeaderName, HeaderValue, Request, StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use uuid::Uuid;

use approvals_core::Principal;

use crate::templates::render_error_page;

const REQUEST_ID_HEADER: &str = "x-request-id";

// =============================================================================
// Request ID
// =============================================================================

/// Tags every request with an `x-request-id`, keeping one supplied by the client.
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let header_name = HeaderName::from_static(REQUEST_ID_HEADER);

    let req_id_value = match req.headers().get(&header_name) {
        Some(v) => v.clone(),
        None => match HeaderValue::try_from(Uuid::new_v4().to_string()) {
            Ok(v) => v,
            Err(_) => return next.run(req).await,
        },
    };

    // Read by the trace layer when it opens the request span
    req.extensions_mut().insert(req_id_value.clone());

    let mut res = next.run(req).await;
    res.headers_mut().insert(header_name, req_id_value);
    res
}

// =============================================================================
// Principal Extraction
// =============================================================================

/// Extractor for the authenticated caller.
///
/// Authentication happens upstream; this only requires that the request
/// carries a bearer token and wraps it as a [`Principal`].
#[derive(Debug, Clone)]
pub struct BearerPrincipal(pub Principal);

/// Rejection returned when no bearer token is present.
#[derive(Debug, Clone)]
pub struct MissingBearer(&'static str);

impl IntoResponse for MissingBearer {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            [("www-authenticate", "Bearer")],
            Html(render_error_page("unauthorized", self.0)),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for BearerPrincipal
where
    S: Send + Sync,
{
    type Rejection = MissingBearer;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(MissingBearer("Authentication required"))?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(MissingBearer("A bearer token is required"))?;

        Ok(Self(Principal::bearer(token)))
    }
}
