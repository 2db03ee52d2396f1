//! The REST endpoints for managing credit cards.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::CurrentUser,
    card::{
        Card, CardId, CardUpdate, NewCard,
        db::{create_card, delete_card, get_card, get_cards, update_card},
    },
    db::lock_connection,
    pagination::{PageParams, PaginationConfig},
};

/// The state needed by the card endpoints.
#[derive(Debug, Clone)]
pub struct CardState {
    /// The database connection for managing cards.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The page size limits for listing cards.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for CardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// A route handler for creating a new card.
///
/// # Errors
/// Returns [Error::InvalidDay] if the closing or due day is not a day of the month.
pub async fn create_card_endpoint(
    State(state): State<CardState>,
    CurrentUser(user): CurrentUser,
    Json(new_card): Json<NewCard>,
) -> Result<(StatusCode, Json<Card>), Error> {
    let new_card = new_card.validate()?;
    let card = create_card(user.id, new_card, &*lock_connection(&state.db_connection)?)?;

    Ok((StatusCode::CREATED, Json(card)))
}

/// A route handler for listing the caller's cards.
pub async fn get_cards_endpoint(
    State(state): State<CardState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<Card>>, Error> {
    let page = params.resolve(&state.pagination_config);
    let cards = get_cards(user.id, page, &*lock_connection(&state.db_connection)?)?;

    Ok(Json(cards))
}

/// A route handler for getting one of the caller's cards.
pub async fn get_card_endpoint(
    State(state): State<CardState>,
    CurrentUser(user): CurrentUser,
    Path(card_id): Path<CardId>,
) -> Result<Json<Card>, Error> {
    let card = get_card(card_id, user.id, &*lock_connection(&state.db_connection)?)?;

    Ok(Json(card))
}

/// A route handler for partially updating one of the caller's cards.
pub async fn update_card_endpoint(
    State(state): State<CardState>,
    CurrentUser(user): CurrentUser,
    Path(card_id): Path<CardId>,
    Json(update): Json<CardUpdate>,
) -> Result<Json<Card>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let card = update.apply(get_card(card_id, user.id, &connection)?)?;
    update_card(&card, &connection)?;

    Ok(Json(card))
}

/// A route handler for deleting one of the caller's cards.
pub async fn delete_card_endpoint(
    State(state): State<CardState>,
    CurrentUser(user): CurrentUser,
    Path(card_id): Path<CardId>,
) -> Result<StatusCode, Error> {
    delete_card(card_id, user.id, &*lock_connection(&state.db_connection)?)?;

    Ok(StatusCode::NO_CONTENT)
}
