use crate::modules::catalog::domain::CatalogEntry;

use super::models::{Anime, Images};

const UNTITLED: &str = "Untitled";

/// Maps Jikan wire records to catalog entries
#[derive(Debug, Default, Clone)]
pub struct JikanMapper;

impl JikanMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn to_catalog_entry(&self, anime: Anime) -> CatalogEntry {
        let title = Self::primary_title(&anime);
        let image_url = anime.images.as_ref().and_then(Self::best_image);

        CatalogEntry {
            id: anime.mal_id,
            title,
            title_english: non_blank(anime.title_english),
            episodes: anime.episodes.and_then(|e| u32::try_from(e).ok()),
            score: anime.score.filter(|s| s.is_finite()),
            kind: non_blank(anime.r#type).unwrap_or_else(|| "Unknown".to_string()),
            synopsis: non_blank(anime.synopsis),
            status: non_blank(anime.status),
            year: anime.year,
            season: non_blank(anime.season),
            genres: anime
                .genres
                .unwrap_or_default()
                .into_iter()
                .map(|genre| genre.name)
                .collect(),
            image_url,
        }
    }

    pub fn to_catalog_entries(&self, anime: Vec<Anime>) -> Vec<CatalogEntry> {
        anime
            .into_iter()
            .map(|a| self.to_catalog_entry(a))
            .collect()
    }

    /// `title`, then the "Default" entry of `titles`, then any title at all
    fn primary_title(anime: &Anime) -> String {
        if let Some(title) = anime.title.as_deref().filter(|t| !t.trim().is_empty()) {
            return title.to_string();
        }

        let titles = anime.titles.as_deref().unwrap_or_default();
        titles
            .iter()
            .find(|t| t.r#type.eq_ignore_ascii_case("default"))
            .or_else(|| titles.first())
            .map(|t| t.title.clone())
            .unwrap_or_else(|| UNTITLED.to_string())
    }

    /// webp large, then jpg large, then jpg regular
    fn best_image(images: &Images) -> Option<String> {
        let webp_large = images
            .webp
            .as_ref()
            .and_then(|urls| urls.large_image_url.clone());
        let jpg_large = images
            .jpg
            .as_ref()
            .and_then(|urls| urls.large_image_url.clone());
        let jpg = images.jpg.as_ref().and_then(|urls| urls.image_url.clone());

        webp_large.or(jpg_large).or(jpg)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::super::models::{ImageUrls, TitleEntry};
    use super::*;

    fn anime(mal_id: u32) -> Anime {
        Anime {
            mal_id,
            url: None,
            images: None,
            titles: None,
            title: Some("Sousou no Frieren".to_string()),
            title_english: Some("Frieren: Beyond Journey's End".to_string()),
            title_japanese: None,
            r#type: Some("TV".to_string()),
            episodes: Some(28),
            status: Some("Finished Airing".to_string()),
            airing: false,
            score: Some(9.3),
            synopsis: None,
            season: Some("fall".to_string()),
            year: Some(2023),
            genres: None,
        }
    }

    #[test]
    fn test_maps_core_fields() {
        let entry = JikanMapper::new().to_catalog_entry(anime(52991));
        assert_eq!(entry.id, 52991);
        assert_eq!(entry.title, "Sousou no Frieren");
        assert_eq!(
            entry.title_english.as_deref(),
            Some("Frieren: Beyond Journey's End")
        );
        assert_eq!(entry.episodes, Some(28));
        assert_eq!(entry.score, Some(9.3));
        assert_eq!(entry.kind, "TV");
        assert_eq!(entry.year, Some(2023));
    }

    #[test]
    fn test_title_falls_back_to_default_title_entry() {
        let mut raw = anime(1);
        raw.title = None;
        raw.titles = Some(vec![
            TitleEntry {
                r#type: "Japanese".to_string(),
                title: "葬送のフリーレン".to_string(),
            },
            TitleEntry {
                r#type: "Default".to_string(),
                title: "Sousou no Frieren".to_string(),
            },
        ]);
        assert_eq!(
            JikanMapper::new().to_catalog_entry(raw).title,
            "Sousou no Frieren"
        );
    }

    #[test]
    fn test_title_falls_back_to_untitled() {
        let mut raw = anime(1);
        raw.title = Some("   ".to_string());
        assert_eq!(JikanMapper::new().to_catalog_entry(raw).title, UNTITLED);
    }

    #[test]
    fn test_negative_episode_count_is_unknown() {
        let mut raw = anime(1);
        raw.episodes = Some(-1);
        assert_eq!(JikanMapper::new().to_catalog_entry(raw).episodes, None);
    }

    #[test]
    fn test_blank_english_title_and_type() {
        let mut raw = anime(1);
        raw.title_english = Some(String::new());
        raw.r#type = None;
        let entry = JikanMapper::new().to_catalog_entry(raw);
        assert!(entry.title_english.is_none());
        assert_eq!(entry.kind, "Unknown");
    }

    #[test]
    fn test_image_preference() {
        let mut raw = anime(1);
        raw.images = Some(Images {
            jpg: Some(ImageUrls {
                image_url: Some("https://cdn/jpg.jpg".to_string()),
                small_image_url: None,
                large_image_url: Some("https://cdn/jpg-large.jpg".to_string()),
            }),
            webp: Some(ImageUrls {
                image_url: None,
                small_image_url: None,
                large_image_url: None,
            }),
        });
        assert_eq!(
            JikanMapper::new().to_catalog_entry(raw).image_url.as_deref(),
            Some("https://cdn/jpg-large.jpg")
        );
    }
}
