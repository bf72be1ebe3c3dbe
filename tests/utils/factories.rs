/// Test data factories using builder pattern
///
/// Provides convenient methods to create catalog entries with sensible defaults
use anitier_lib::modules::catalog::domain::{CatalogEntry, MalId};

pub struct CatalogEntryFactory {
    id: MalId,
    title: String,
    title_english: Option<String>,
    episodes: Option<u32>,
    score: Option<f32>,
    kind: String,
    year: Option<i32>,
    genres: Vec<String>,
}

impl Default for CatalogEntryFactory {
    fn default() -> Self {
        Self {
            id: rand::random::<u32>() % 1_000_000 + 1000,
            title: "Test Anime".to_string(),
            title_english: None,
            episodes: None,
            score: None,
            kind: "TV".to_string(),
            year: None,
            genres: Vec::new(),
        }
    }
}

impl CatalogEntryFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn complete() -> Self {
        Self::default()
            .with_title("Complete Test Anime")
            .with_english_title("Complete Test Anime (EN)")
            .with_score(8.5)
            .with_episodes(24)
            .with_year(2020)
            .with_genres(vec!["Action", "Adventure", "Fantasy"])
    }

    pub fn with_id(mut self, id: MalId) -> Self {
        self.id = id;
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_english_title(mut self, title: &str) -> Self {
        self.title_english = Some(title.to_string());
        self
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_episodes(mut self, episodes: u32) -> Self {
        self.episodes = Some(episodes);
        self
    }

    pub fn with_kind(mut self, kind: &str) -> Self {
        self.kind = kind.to_string();
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_genres(mut self, genres: Vec<&str>) -> Self {
        self.genres = genres.into_iter().map(String::from).collect();
        self
    }

    pub fn build(self) -> CatalogEntry {
        let mut entry = CatalogEntry::new(self.id, self.title).with_kind(self.kind);
        entry.title_english = self.title_english;
        entry.episodes = self.episodes;
        entry.score = self.score;
        entry.year = self.year;
        entry.genres = self.genres;
        entry
    }
}

/// Shorthand for the common (id, title, score) fixture
pub fn entry(id: MalId, title: &str, score: Option<f32>) -> CatalogEntry {
    let factory = CatalogEntryFactory::new().with_id(id).with_title(title);
    match score {
        Some(score) => factory.with_score(score).build(),
        None => factory.build(),
    }
}
