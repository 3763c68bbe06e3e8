//! Approvals page handlers.
//!
//! ```text
//! GET  /approvals                         -> grouped approvals page
//! POST /approvals  checkedScopes=<key>*   -> apply selection, then same page
//! ```

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::Form;
use serde::Deserialize;
use serde_json::{Value, json};

use approvals_core::{ApprovalError, Selection};

use crate::middleware::BearerPrincipal;
use crate::server::AppState;
use crate::templates::{render_approvals_page, render_error_page};

/// Form posted by the approvals page.
#[derive(Debug, Default, Deserialize)]
pub struct ApprovalsForm {
    /// Selection keys of every checked grant. Absent when nothing is checked.
    #[serde(rename = "checkedScopes", default)]
    pub checked_scopes: Vec<String>,
}

impl ApprovalsForm {
    /// The submitted selection, `None` when no key was posted.
    pub fn selection(&self) -> Option<Selection> {
        if self.checked_scopes.is_empty() {
            None
        } else {
            Some(Selection::from_form_values(&self.checked_scopes))
        }
    }
}

/// HTML error response for a failed approvals request.
#[derive(Debug)]
pub struct PageError(pub ApprovalError);

impl From<ApprovalError> for PageError {
    fn from(e: ApprovalError) -> Self {
        Self(e)
    }
}

impl PageError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            ApprovalError::Unauthorized { .. } => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApprovalError::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
            ApprovalError::StoreUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable")
            }
            ApprovalError::StoreRejected { .. } | ApprovalError::InvalidStoreData { .. } => {
                (StatusCode::BAD_GATEWAY, "store_error")
            }
            ApprovalError::Configuration { .. } | ApprovalError::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "server_error")
            }
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let description = match &self.0 {
            ApprovalError::Conflict { .. } => {
                "Your approvals were changed elsewhere. Reload the page and try again."
            }
            ApprovalError::Unauthorized { .. } => "Your session is not valid. Sign in again.",
            ApprovalError::StoreUnavailable { .. } => {
                "Approvals are temporarily unavailable. Try again later."
            }
            _ => "Approvals could not be processed.",
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, category = %self.0.category(), "Approvals request failed");
        } else {
            tracing::info!(error = %self.0, category = %self.0.category(), "Approvals request refused");
        }

        (status, Html(render_error_page(code, description))).into_response()
    }
}

/// GET /approvals
pub async fn approvals_get(
    State(state): State<AppState>,
    BearerPrincipal(principal): BearerPrincipal,
) -> Result<Html<String>, PageError> {
    let view = state.workflow.show(&principal).await?;
    Ok(Html(render_approvals_page(&view, &state.links)))
}

/// POST /approvals
///
/// The posted keys are the complete set of approvals to keep; every other
/// grant is denied.
pub async fn approvals_post(
    State(state): State<AppState>,
    BearerPrincipal(principal): BearerPrincipal,
    Form(form): Form<ApprovalsForm>,
) -> Result<Html<String>, PageError> {
    let selection = form.selection();
    let view = state
        .workflow
        .submit(&principal, selection.as_ref())
        .await?;
    Ok(Html(render_approvals_page(&view, &state.links)))
}

pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
