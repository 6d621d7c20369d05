use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;
use time::OffsetDateTime;
use tokio::{fs, sync::Mutex};
use tracing::{debug, info};

pub const DOG_ID_LEN: usize = 8;
pub const RECORD_ID_LEN: usize = 10;

/// Random URL-safe identifier of `len` characters.
pub fn new_id(len: usize) -> String {
    nanoid!(len)
}

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dog {
    pub id: String,
    pub name: String,
    pub breed: String,
    pub age: Option<Number>,
    pub gender: String,
    pub bio: String,
    pub photo: String,
    pub created_at: i64,
    /// Fields written by other tools, kept as-is on save.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: String,
    pub from_id: String,
    pub to_id: String,
    pub created_at: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub a_id: String,
    pub b_id: String,
    pub created_at: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Match {
    /// True when this match joins `x` and `y`, in either order.
    pub fn pairs(&self, x: &str, y: &str) -> bool {
        (self.a_id == x && self.b_id == y) || (self.a_id == y && self.b_id == x)
    }

    pub fn involves(&self, id: &str) -> bool {
        self.a_id == id || self.b_id == id
    }

    /// The other side of the match as seen from `id`.
    pub fn other(&self, id: &str) -> &str {
        if self.a_id == id { &self.b_id } else { &self.a_id }
    }
}

/// The whole persisted dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Db {
    #[serde(default)]
    pub dogs: Vec<Dog>,
    #[serde(default)]
    pub likes: Vec<Like>,
    #[serde(default)]
    pub matches: Vec<Match>,
}

impl Db {
    pub fn dog(&self, id: &str) -> Option<&Dog> {
        self.dogs.iter().find(|d| d.id == id)
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("store is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Flat-file store. Every read loads the whole document and every write replaces it.
///
/// Clones share one lock, so load/mutate/save cycles from this process never interleave.
/// Other processes writing the same file are not coordinated.
#[derive(Debug, Clone)]
pub struct Store {
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
}

impl Store {
    /// Opens the store at `path`, creating its directory and an empty dataset if needed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await?;
        }

        let store = Self {
            path: Arc::new(path),
            lock: Arc::new(Mutex::new(())),
        };

        if !fs::try_exists(store.path()).await? {
            info!("initialising empty store at {}", store.path().display());
            store.write(&Db::default()).await?;
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Db, StoreError> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    pub async fn save(&self, db: &Db) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        self.write(db).await
    }

    /// Load, apply `f`, save. Nothing is written if `f` fails.
    pub async fn update<T, E>(&self, f: impl FnOnce(&mut Db) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let _guard = self.lock.lock().await;
        let mut db = self.read().await?;
        let out = f(&mut db)?;
        self.write(&db).await?;
        Ok(out)
    }

    async fn read(&self) -> Result<Db, StoreError> {
        let bytes = fs::read(self.path()).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write(&self, db: &Db) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(db)?;

        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, self.path()).await?;
        debug!(bytes = bytes.len(), "store saved");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_dog(id: &str) -> Dog {
    Dog {
        id: id.to_owned(),
        name: format!("dog {id}"),
        breed: "Mutt".to_owned(),
        age: None,
        gender: "Unknown".to_owned(),
        bio: String::new(),
        photo: String::new(),
        created_at: 0,
        extra: Map::new(),
    }
}
