use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};

use crate::{
    error::{AppError, AppResult},
    render,
    state::AppState,
    types::{ListingQuery, SortMode},
};

/// `GET /?path=<dir>&sort_by=<date|alphabetical>`
///
/// `sort_by` only affects this response; without it the configured default applies.
pub async fn index(State(state): State<AppState>, Query(q): Query<ListingQuery>) -> AppResult<Response> {
    let sort = q
        .sort_by
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(SortMode::from)
        .unwrap_or_else(|| state.library.default_sort());

    let listing = match state.library.listing(q.path.as_deref(), sort).await {
        Ok(l) => l,
        Err(e) => {
            if matches!(e, AppError::OutsideRoot(_)) {
                state.metrics.inc_requests_rejected();
            }
            return Err(e);
        }
    };

    state.metrics.inc_listings_served();
    let page = render::listing_page(&listing, &state.advertised_addr);
    Ok(Html(page.into_string()).into_response())
}
