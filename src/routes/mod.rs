use axum::{
    Router,
    http::header,
    response::{IntoResponse, Response},
};

use crate::state::SharedState;

pub mod docs;
pub mod health;
pub mod leaderboard;
pub mod players;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(players::router())
        .merge(leaderboard::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}

/// Respond with an already serialized JSON body.
fn json_body(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}
