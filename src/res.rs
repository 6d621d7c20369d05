use std::path::Path;

use tower_http::services::{ServeDir, ServeFile};

/// Serves the front end from `dir`. Paths with no matching file get `index.html`.
pub fn public(dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")))
}
