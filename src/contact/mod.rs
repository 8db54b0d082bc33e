mod create;
pub mod store;

use axum::{routing::post, Router};

use crate::AppState;

pub use create::SUCCESS_MESSAGE;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/contact", post(create::create_contact))
}
