//! Inbound payload normalization for the import and add endpoints.
//!
//! Clients post a bare list, a wrapper object (`{"movies": [...]}` and friends),
//! or a single object, and spell identifiers as `tmdbId`, `tmdb_id`, or nest them
//! under `movie`/`series`. Both the accepted wrapper keys and the identifier paths
//! are plain tables on [`MediaShape`]; accepting a new spelling means adding an
//! entry there.

use serde_json::Value;

/// Per-variant lookup tables, tried in order.
#[derive(Debug, Clone, Copy)]
pub struct MediaShape {
    /// Wrapper keys whose value may hold the item list.
    pub wrapper_keys: &'static [&'static str],
    /// Identifier name used in failure messages and results.
    pub id_field: &'static str,
    /// Key paths to the identifier, highest precedence first.
    pub id_paths: &'static [&'static [&'static str]],
}

pub const MOVIE: MediaShape = MediaShape {
    wrapper_keys: &["movies", "movie", "importListMovies"],
    id_field: "tmdbId",
    id_paths: &[
        &["tmdbId"],
        &["tmdb_id"],
        &["movie", "tmdbId"],
        &["movie", "tmdb_id"],
    ],
};

pub const SERIES: MediaShape = MediaShape {
    wrapper_keys: &["series", "shows", "importListSeries", "importListItems"],
    id_field: "tvdbId",
    id_paths: &[
        &["tvdbId"],
        &["tvdb_id"],
        &["series", "tvdbId"],
        &["series", "tvdb_id"],
    ],
};

impl MediaShape {
    /// Split a raw payload into its items, preserving order.
    ///
    /// - a list is used as-is
    /// - an object yields the first wrapper key holding a non-empty list,
    ///   otherwise the object itself is the only item
    /// - anything else becomes a single item
    pub fn normalize(&self, raw: Value) -> Vec<Value> {
        match raw {
            Value::Array(items) => items,
            Value::Object(mut map) => {
                for key in self.wrapper_keys {
                    let non_empty_list =
                        matches!(map.get(*key), Some(Value::Array(items)) if !items.is_empty());
                    if non_empty_list {
                        if let Some(Value::Array(items)) = map.remove(*key) {
                            return items;
                        }
                    }
                }
                vec![Value::Object(map)]
            }
            other => vec![other],
        }
    }

    /// First usable identifier found along [`MediaShape::id_paths`].
    pub fn extract_id(&self, item: &Value) -> Option<i64> {
        self.id_paths
            .iter()
            .filter_map(|path| lookup_path(item, path))
            .find_map(as_identifier)
    }

    /// Failure message for items without an identifier.
    pub fn missing_message(&self) -> String {
        format!("missing {}", self.id_field)
    }
}

fn lookup_path<'a>(item: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(item, |current, key| current.as_object()?.get(*key))
        .filter(|v| !v.is_null())
}

/// Catalog ids are positive integers; numeric strings are accepted too.
fn as_identifier(value: &Value) -> Option<i64> {
    let id = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;
    (id > 0).then_some(id)
}
