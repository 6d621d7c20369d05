use axum::{Json, debug_handler, extract::State};
use serde::Serialize;
use serde_json::{Map, Number};
use tracing::info;

use crate::{
    AppError, AppResult,
    db::{DOG_ID_LEN, Db, Dog, Store, new_id, now_ms},
};

struct SeedDog {
    name: &'static str,
    breed: &'static str,
    age: u64,
    gender: &'static str,
    bio: &'static str,
    photo: &'static str,
}

const SEED_DOGS: [SeedDog; 4] = [
    SeedDog {
        name: "Buddy",
        breed: "Labrador",
        age: 3,
        gender: "Male",
        bio: "Ball chaser. Treat enthusiast.",
        photo: "https://images.unsplash.com/photo-1552053831-71594a27632d?q=80&w=1200&auto=format&fit=crop",
    },
    SeedDog {
        name: "Luna",
        breed: "Husky",
        age: 2,
        gender: "Female",
        bio: "Howls at the moon. Loves snow.",
        photo: "https://images.unsplash.com/photo-1530281700549-e82e7bf110d6?q=80&w=1200&auto=format&fit=crop",
    },
    SeedDog {
        name: "Max",
        breed: "Beagle",
        age: 4,
        gender: "Male",
        bio: "Sniffer-in-chief.",
        photo: "https://images.unsplash.com/photo-1543466835-00a7907e9de1?q=80&w=1200&auto=format&fit=crop",
    },
    SeedDog {
        name: "Daisy",
        breed: "Corgi",
        age: 1,
        gender: "Female",
        bio: "Short legs, big heart.",
        photo: "https://images.unsplash.com/photo-1548199973-03cce0bbc87b?q=80&w=1200&auto=format&fit=crop",
    },
];

#[derive(Debug, PartialEq, Serialize)]
pub struct SeedOutcome {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added: Option<usize>,
}

fn already_seeded() -> SeedOutcome {
    SeedOutcome {
        ok: true,
        note: Some("Already seeded or has data"),
        added: None,
    }
}

/// Adds the demo dogs, but only to a store that has none yet.
pub fn seed_db(db: &mut Db) -> SeedOutcome {
    if !db.dogs.is_empty() {
        return already_seeded();
    }

    db.dogs.extend(SEED_DOGS.iter().map(|s| Dog {
        id: new_id(DOG_ID_LEN),
        name: s.name.to_owned(),
        breed: s.breed.to_owned(),
        age: Some(Number::from(s.age)),
        gender: s.gender.to_owned(),
        bio: s.bio.to_owned(),
        photo: s.photo.to_owned(),
        created_at: now_ms(),
        extra: Map::new(),
    }));

    SeedOutcome {
        ok: true,
        note: None,
        added: Some(SEED_DOGS.len()),
    }
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn seed(State(store): State<Store>) -> AppResult<Json<SeedOutcome>> {
    // a store with dogs is left untouched on disk
    if !store.load().await?.dogs.is_empty() {
        return Ok(Json(already_seeded()));
    }

    let outcome = store.update(|db| Ok::<_, AppError>(seed_db(db))).await?;
    if let Some(added) = outcome.added {
        info!(added, "seeded demo dogs");
    }
    Ok(Json(outcome))
}
