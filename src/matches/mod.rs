use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use serde::Serialize;

use crate::{
    AppResult,
    db::{Db, Dog, Store},
};

/// A match as seen from one of its two dogs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with: Option<Dog>,
    pub created_at: i64,
}

pub fn matches_for(db: &Db, dog_id: &str) -> Vec<MatchView> {
    db.matches
        .iter()
        .filter(|m| m.involves(dog_id))
        .map(|m| MatchView {
            id: m.id.clone(),
            with: db.dog(m.other(dog_id)).cloned(),
            created_at: m.created_at,
        })
        .collect()
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn matches(
    Path(dog_id): Path<String>,
    State(store): State<Store>,
) -> AppResult<Json<Vec<MatchView>>> {
    let db = store.load().await?;
    Ok(Json(matches_for(&db, &dog_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::test_dog, likes::record_like};

    #[test]
    fn lists_the_other_dog_from_both_sides() {
        let mut db = Db {
            dogs: vec![test_dog("a"), test_dog("b"), test_dog("c")],
            ..Db::default()
        };
        record_like(&mut db, "a", "b").unwrap();
        record_like(&mut db, "b", "a").unwrap();
        record_like(&mut db, "c", "a").unwrap();

        let for_a = matches_for(&db, "a");
        assert_eq!(for_a.len(), 1);
        assert_eq!(for_a[0].with.as_ref().map(|d| d.id.as_str()), Some("b"));

        let for_b = matches_for(&db, "b");
        assert_eq!(for_b[0].id, for_a[0].id);
        assert_eq!(for_b[0].with.as_ref().map(|d| d.id.as_str()), Some("a"));

        assert!(matches_for(&db, "c").is_empty());
        assert!(matches_for(&db, "nobody").is_empty());
    }

    #[test]
    fn missing_partner_omits_with() {
        let mut db = Db {
            dogs: vec![test_dog("a"), test_dog("b")],
            ..Db::default()
        };
        record_like(&mut db, "a", "b").unwrap();
        record_like(&mut db, "b", "a").unwrap();
        db.dogs.retain(|d| d.id == "a");

        let view = serde_json::to_value(matches_for(&db, "a")).unwrap();
        assert!(view[0].get("with").is_none());
        assert!(view[0]["createdAt"].is_i64());
    }
}
