/// Domain models for posts and users
use serde::{Deserialize, Serialize};

/// Geographic point (WGS84 degrees), mapped as `geo_point` in the post index.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Kind of media attached to a post, derived from the uploaded filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    #[serde(other)]
    Unknown,
}

/// Ordered extension table. The first image entry is the only extension
/// sent to the face classifier.
pub const MEDIA_TYPES: &[(&str, MediaKind)] = &[
    (".jpg", MediaKind::Image),
    (".jpeg", MediaKind::Image),
    (".gif", MediaKind::Image),
    (".png", MediaKind::Image),
    (".mov", MediaKind::Video),
    (".mp4", MediaKind::Video),
    (".avi", MediaKind::Video),
    (".flv", MediaKind::Video),
    (".wmv", MediaKind::Video),
];

impl MediaKind {
    /// Look up an extension (leading dot, case-sensitive).
    pub fn from_extension(extension: &str) -> Self {
        MEDIA_TYPES
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|(_, kind)| *kind)
            .unwrap_or(MediaKind::Unknown)
    }
}

/// The single extension whose media gets a face score.
pub fn annotated_extension() -> &'static str {
    MEDIA_TYPES
        .iter()
        .find(|(_, kind)| *kind == MediaKind::Image)
        .map(|(ext, _)| *ext)
        .unwrap_or_default()
}

/// Extension of the last path element including the dot, or `""`.
///
/// `"a/b.tar.gz"` yields `".gz"`; a name without a dot yields `""`.
pub fn file_extension(filename: &str) -> &str {
    let base = filename.rsplit('/').next().unwrap_or(filename);
    match base.rfind('.') {
        Some(idx) => &base[idx..],
        None => "",
    }
}

/// A post as stored in the post index and returned by search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub user: String,
    #[serde(default)]
    pub message: String,
    pub location: Location,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "type", default = "unknown_kind")]
    pub kind: MediaKind,
    #[serde(default)]
    pub face: f64,
}

fn unknown_kind() -> MediaKind {
    MediaKind::Unknown
}

/// Signup payload. Missing fields decode to empty values and are caught
/// by validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub age: i64,
    #[serde(default)]
    pub gender: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// User document in the user index. The password is only kept as an
/// Argon2id hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredUser {
    pub username: String,
    pub password_hash: String,
    #[serde(default)]
    pub age: i64,
    #[serde(default)]
    pub gender: String,
}
