use serde::{Serialize, Serializer};
use serde_with::skip_serializing_none;

/// Media kind understood by Overseerr's request endpoint.
///
/// Serialized as Overseerr spells it: "movie" | "tv".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MediaKind {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        }
    }
}

/// Season directive attached to series requests.
///
/// `All` serializes as the literal string `"all"`, `Numbers` as a JSON array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeasonSelection {
    All,
    Numbers(Vec<u32>),
}

impl Serialize for SeasonSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SeasonSelection::All => serializer.serialize_str("all"),
            SeasonSelection::Numbers(n) => n.serialize(serializer),
        }
    }
}

/// Body of `POST /api/v1/request`.
///
/// Example: {"mediaType":"tv","mediaId":1396,"userId":1,"seasons":"all"}
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRequest {
    pub media_type: MediaKind,
    /// Always a TMDb id; TVDB ids are bridged before reaching this point.
    pub media_id: i64,
    pub user_id: i64,
    pub seasons: Option<SeasonSelection>,
}
