//! Customer section-load endpoint.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// Query parameters for section loading.
#[derive(Debug, Default, Deserialize)]
pub struct SectionLoadQuery {
    /// Comma-separated section names; omitted or empty loads every section.
    pub sections: Option<String>,
}

impl SectionLoadQuery {
    fn names(&self) -> Option<Vec<String>> {
        let names: Vec<String> = self
            .sections
            .as_deref()?
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();
        (!names.is_empty()).then_some(names)
    }
}

/// Render the requested sections as a JSON object keyed by section name.
#[instrument(skip(state, session))]
pub async fn load(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SectionLoadQuery>,
) -> Result<Json<Map<String, Value>>> {
    let names = query.names();
    let sections = state.sections().load(names.as_deref(), &session).await?;
    Ok(Json(sections))
}
