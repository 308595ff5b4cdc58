//! Catalog listing endpoint.

use axum::extract::{Query, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, CatalogEntry, CatalogQuery};
use crate::pipeline::extraction::Catalog;

/// `GET /api/catalog?profile=`: parameters recognized under a profile,
/// in evaluation order.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<CatalogEntry>>, ApiError> {
    let profile = ctx.resolve_profile(query.profile.as_deref())?;

    let entries = Catalog::standard()
        .entries(profile)
        .map(|entry| CatalogEntry::from(entry.definition))
        .collect();

    Ok(Json(entries))
}
