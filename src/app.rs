use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::{calculations, health};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    // The UI is served separately; its origin is not pinned
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::<AppState>::new()
        .nest("/health", health::router())
        .merge(calculations::router())
        .layer(cors)
        .with_state(state)
}
