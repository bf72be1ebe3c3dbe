// Jikan v4 API models
// Subset of https://docs.api.jikan.moe/ used by the catalog listings

use serde::{Deserialize, Serialize};

// Response envelopes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JikanItem<T> {
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JikanList<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub last_visible_page: u32,
    pub has_next_page: bool,
    #[serde(default)]
    pub items: Option<PaginationItems>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationItems {
    pub count: u32,
    pub total: u32,
    pub per_page: u32,
}

// Shared primitives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MalEntity {
    pub mal_id: u32,
    pub r#type: String,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Images {
    #[serde(default)]
    pub jpg: Option<ImageUrls>,
    #[serde(default)]
    pub webp: Option<ImageUrls>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrls {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub small_image_url: Option<String>,
    #[serde(default)]
    pub large_image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleEntry {
    pub r#type: String, // "Default", "English", "Japanese", "Synonym"
    pub title: String,
}

// Anime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anime {
    pub mal_id: u32,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub images: Option<Images>,
    #[serde(default)]
    pub titles: Option<Vec<TitleEntry>>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_english: Option<String>,
    #[serde(default)]
    pub title_japanese: Option<String>,
    #[serde(default)]
    pub r#type: Option<String>, // TV, Movie, OVA, etc.
    #[serde(default)]
    pub episodes: Option<i32>,
    #[serde(default)]
    pub status: Option<String>, // Finished Airing, Currently Airing
    #[serde(default)]
    pub airing: bool,
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub season: Option<String>, // winter, spring, summer, fall
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub genres: Option<Vec<MalEntity>>,
}
