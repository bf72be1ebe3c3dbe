use serde::{Deserialize, Serialize};

/// MyAnimeList identifier as exposed by the catalog API
pub type MalId = u32;

/// One anime record as returned by the external catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: MalId,
    pub title: String,
    pub title_english: Option<String>,
    pub episodes: Option<u32>,
    pub score: Option<f32>,
    /// TV, Movie, OVA, ONA, Special, ...
    pub kind: String,
    pub synopsis: Option<String>,
    pub status: Option<String>,
    pub year: Option<i32>,
    pub season: Option<String>,
    pub genres: Vec<String>,
    pub image_url: Option<String>,
}

impl CatalogEntry {
    pub fn new(id: MalId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            title_english: None,
            episodes: None,
            score: None,
            kind: "Unknown".to_string(),
            synopsis: None,
            status: None,
            year: None,
            season: None,
            genres: Vec::new(),
            image_url: None,
        }
    }

    pub fn with_english_title(mut self, title: impl Into<String>) -> Self {
        self.title_english = Some(title.into());
        self
    }

    pub fn with_episodes(mut self, episodes: u32) -> Self {
        self.episodes = Some(episodes);
        self
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Title shown to users: the English title when the catalog has one
    pub fn display_title(&self) -> &str {
        match self.title_english.as_deref() {
            Some(english) if !english.trim().is_empty() => english,
            _ => &self.title,
        }
    }
}
