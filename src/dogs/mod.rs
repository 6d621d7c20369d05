mod new;

use axum::{
    Json, Router, debug_handler,
    extract::{Path, State},
    routing::get,
};

use crate::{
    AppError, AppResult, AppState,
    db::{Dog, Store},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dogs", get(dogs).post(new::new_dog))
        .route("/dogs/{id}", get(dog))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn dogs(State(store): State<Store>) -> AppResult<Json<Vec<Dog>>> {
    Ok(Json(store.load().await?.dogs))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn dog(
    Path(id): Path<String>,
    State(store): State<Store>,
) -> AppResult<Json<Dog>> {
    let db = store.load().await?;
    let Some(dog) = db.dog(&id) else {
        return Err(AppError::NotFound("Dog not found"));
    };

    Ok(Json(dog.clone()))
}
