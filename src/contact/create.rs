use axum::{debug_handler, extract::{rejection::JsonRejection, State}, http::StatusCode, Json};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::{schema::{Ack, ContactInput}, AppError, AppResult, AppState};

use super::store;

pub const SUCCESS_MESSAGE: &str = "Thank you! We will contact you shortly to schedule your free inspection.";

#[debug_handler(state = AppState)]
pub(crate) async fn create_contact(
    State(db_pool): State<SqlitePool>,
    payload: Result<Json<ContactInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Ack>)> {
    let Json(input) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let contact = input.validate().inspect_err(|errors| {
        warn!("rejected contact submission: {errors}");
    })?;

    let record = store::insert(&db_pool, contact).await?;
    info!(id = %record.id, "contact submission received");

    Ok((
        StatusCode::CREATED,
        Json(Ack {
            message: SUCCESS_MESSAGE.to_owned(),
            id: Some(record.id),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request, Router};
    use http_body_util::BodyExt as _;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{app, db, schema::Field, INTERNAL_MESSAGE, INVALID_MESSAGE};

    use super::*;

    async fn test_app() -> (Router, SqlitePool) {
        let db_pool = db::connect("sqlite::memory:", 1).await.unwrap();
        (app(AppState { db_pool: db_pool.clone() }), db_pool)
    }

    async fn post(app: Router, body: String) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/api/contact")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn john() -> Value {
        json!({
            "name": "John Smith",
            "phone": "9818750889",
            "address": "C-220, Pandav Nagar, Delhi",
            "email": "",
            "description": "Cockroaches in kitchen area",
        })
    }

    #[tokio::test]
    async fn valid_submission_is_persisted() {
        let (app, db_pool) = test_app().await;

        let (status, body) = post(app, john().to_string()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], SUCCESS_MESSAGE);

        let id = body["id"].as_str().unwrap().parse().unwrap();
        let record = store::find(&db_pool, id).await.unwrap().unwrap();
        assert_eq!(record.name, "John Smith");
        assert_eq!(record.email, None);
    }

    #[tokio::test]
    async fn invalid_submission_lists_fields_and_persists_nothing() {
        let (app, db_pool) = test_app().await;

        let mut body = john();
        body["name"] = json!("J");
        body["phone"] = json!("123");
        let (status, body) = post(app, body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], INVALID_MESSAGE);
        let errors = body["errors"].as_object().unwrap();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains_key(Field::Name.as_str()));
        assert!(errors.contains_key(Field::Phone.as_str()));
        assert_eq!(store::count(&db_pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let (app, db_pool) = test_app().await;

        let (status, body) = post(app, "{\"name\":".to_owned()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().is_some());
        assert!(body.get("errors").is_none());
        assert_eq!(store::count(&db_pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn storage_failure_is_an_internal_error() {
        let (app, db_pool) = test_app().await;
        db_pool.close().await;

        let (status, body) = post(app, john().to_string()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], INTERNAL_MESSAGE);
    }
}
