use axum::{
    Json, debug_handler,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::Map;
use tracing::{debug, info};

use crate::{
    AppError, AppResult,
    db::{Db, Like, Match, RECORD_ID_LEN, Store, new_id, now_ms},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LikeQuery {
    from_id: Option<String>,
    to_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LikeOutcome {
    pub ok: bool,
    pub matched: bool,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn like(
    State(store): State<Store>,
    payload: Result<Json<LikeQuery>, JsonRejection>,
) -> AppResult<Json<LikeOutcome>> {
    // no JSON content type reads as an empty body
    let LikeQuery { from_id, to_id } = match payload {
        Ok(Json(query)) => query,
        Err(JsonRejection::MissingJsonContentType(_)) => LikeQuery::default(),
        Err(rejection) => return Err(rejection.into()),
    };
    let from_id = from_id.unwrap_or_default();
    let to_id = to_id.unwrap_or_default();
    check_pair(&from_id, &to_id)?;

    let matched = store
        .update(|db| record_like(db, &from_id, &to_id))
        .await?;

    Ok(Json(LikeOutcome { ok: true, matched }))
}

fn check_pair(from_id: &str, to_id: &str) -> AppResult<()> {
    if from_id.is_empty() || to_id.is_empty() {
        return Err(AppError::BadRequest("fromId and toId are required"));
    }
    if from_id == to_id {
        return Err(AppError::BadRequest("Cannot like yourself"));
    }
    Ok(())
}

/// Records `from_id` liking `to_id` and returns whether the pair is now a match.
///
/// Repeated likes are no-ops. A match is created the first time both directions exist and
/// is reported on every later like between the two.
pub fn record_like(db: &mut Db, from_id: &str, to_id: &str) -> AppResult<bool> {
    check_pair(from_id, to_id)?;
    if db.dog(from_id).is_none() || db.dog(to_id).is_none() {
        return Err(AppError::NotFound("Dog(s) not found"));
    }

    if db.likes.iter().any(|l| l.from_id == from_id && l.to_id == to_id) {
        debug!(from_id, to_id, "like already recorded");
    } else {
        db.likes.push(Like {
            id: new_id(RECORD_ID_LEN),
            from_id: from_id.to_owned(),
            to_id: to_id.to_owned(),
            created_at: now_ms(),
            extra: Map::new(),
        });
    }

    let reciprocal = db.likes.iter().any(|l| l.from_id == to_id && l.to_id == from_id);
    if !reciprocal {
        return Ok(false);
    }

    if !db.matches.iter().any(|m| m.pairs(from_id, to_id)) {
        let m = Match {
            id: new_id(RECORD_ID_LEN),
            a_id: from_id.to_owned(),
            b_id: to_id.to_owned(),
            created_at: now_ms(),
            extra: Map::new(),
        };
        info!(id = %m.id, a_id = from_id, b_id = to_id, "new match");
        db.matches.push(m);
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_dog;

    fn db_with(ids: &[&str]) -> Db {
        Db {
            dogs: ids.iter().map(|id| test_dog(id)).collect(),
            ..Db::default()
        }
    }

    #[test]
    fn one_way_like_is_not_a_match() {
        let mut db = db_with(&["a", "b"]);
        assert!(!record_like(&mut db, "a", "b").unwrap());
        assert_eq!(db.likes.len(), 1);
        assert!(db.matches.is_empty());
    }

    #[test]
    fn duplicate_like_is_a_no_op() {
        let mut db = db_with(&["a", "b"]);
        record_like(&mut db, "a", "b").unwrap();
        let first = db.likes[0].clone();

        record_like(&mut db, "a", "b").unwrap();

        assert_eq!(db.likes, vec![first]);
    }

    #[test]
    fn reciprocal_like_creates_one_match() {
        let mut db = db_with(&["a", "b"]);
        assert!(!record_like(&mut db, "a", "b").unwrap());
        assert!(record_like(&mut db, "b", "a").unwrap());

        assert_eq!(db.matches.len(), 1);
        assert_eq!(db.matches[0].a_id, "b");
        assert_eq!(db.matches[0].b_id, "a");

        // liking again in either direction still reports the match without duplicating it
        assert!(record_like(&mut db, "a", "b").unwrap());
        assert!(record_like(&mut db, "b", "a").unwrap());
        assert_eq!(db.matches.len(), 1);
        assert_eq!(db.likes.len(), 2);
    }

    #[test]
    fn matches_are_per_pair() {
        let mut db = db_with(&["a", "b", "c"]);
        record_like(&mut db, "a", "b").unwrap();
        record_like(&mut db, "b", "a").unwrap();
        record_like(&mut db, "a", "c").unwrap();
        assert!(record_like(&mut db, "c", "a").unwrap());

        assert_eq!(db.matches.len(), 2);
        assert!(!db.matches.iter().any(|m| m.pairs("b", "c")));
    }

    #[test]
    fn rejects_bad_pairs() {
        let mut db = db_with(&["a", "b"]);
        assert!(matches!(
            record_like(&mut db, "a", "a"),
            Err(AppError::BadRequest("Cannot like yourself"))
        ));
        assert!(matches!(
            record_like(&mut db, "", "b"),
            Err(AppError::BadRequest("fromId and toId are required"))
        ));
        assert!(matches!(
            record_like(&mut db, "a", "zzz"),
            Err(AppError::NotFound(_))
        ));
        assert!(db.likes.is_empty());
    }
}
