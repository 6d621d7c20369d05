use axum::{
    Json, debug_handler,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use tracing::info;

use crate::{
    AppError, AppResult,
    db::{DOG_ID_LEN, Dog, Store, new_id, now_ms},
};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NewDogQuery {
    name: Option<String>,
    breed: Option<String>,
    age: Option<Value>,
    gender: Option<String>,
    bio: Option<String>,
    photo: Option<String>,
}

impl NewDogQuery {
    fn into_dog(self) -> AppResult<Dog> {
        let (Some(name), Some(breed)) = (non_empty(self.name), non_empty(self.breed)) else {
            return Err(AppError::BadRequest("name and breed are required"));
        };

        Ok(Dog {
            id: new_id(DOG_ID_LEN),
            age: self.age.as_ref().and_then(age_of),
            gender: non_empty(self.gender).unwrap_or_else(|| "Unknown".to_owned()),
            bio: self.bio.unwrap_or_default(),
            photo: non_empty(self.photo).unwrap_or_else(|| placeholder_photo(&name)),
            name,
            breed,
            created_at: now_ms(),
            extra: Map::new(),
        })
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

/// Numbers and numeric strings; zero and anything unparsable become no age.
/// Whole numbers stay integers.
fn age_of(value: &Value) -> Option<Number> {
    let age = match value {
        Value::Number(n) if n.is_f64() => n.as_f64()?,
        Value::Number(n) => return (n.as_f64() != Some(0.0)).then(|| n.clone()),
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if !age.is_finite() || age == 0.0 {
        return None;
    }
    if age.fract() == 0.0 && age.abs() < i64::MAX as f64 {
        return Some(Number::from(age as i64));
    }
    Number::from_f64(age)
}

fn placeholder_photo(name: &str) -> String {
    format!("https://placehold.co/600x400?text={}", urlencoding::encode(name))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn new_dog(
    State(store): State<Store>,
    payload: Result<Json<NewDogQuery>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Dog>)> {
    let query = match payload {
        Ok(Json(query)) => query,
        Err(JsonRejection::MissingJsonContentType(_)) => NewDogQuery::default(),
        Err(rejection) => return Err(rejection.into()),
    };
    let dog = query.into_dog()?;

    store
        .update(|db| {
            db.dogs.push(dog.clone());
            Ok::<_, AppError>(())
        })
        .await?;

    info!(id = %dog.id, name = %dog.name, breed = %dog.breed, "created dog");
    Ok((StatusCode::CREATED, Json(dog)))
}
