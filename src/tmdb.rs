use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

use crate::config::Config;
use crate::fetch::fetch_json;
use crate::models::{CombinedCredits, Language, MediaKind, PersonDetails};

pub const TMDB_BASE: &str = "https://api.themoviedb.org/3";
pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
pub const POSTER_SIZE: &str = "w500";
pub const THUMB_SIZE: &str = "w185";

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base: String,
    api_key: String,
    language: String,
}

#[async_trait]
pub trait TmdbApi: Send + Sync {
    /// Full poster URL for a work, or an empty string when TMDB has none or
    /// the lookup fails.
    async fn poster_url(&self, kind: MediaKind, id: i64) -> String;
    /// Thumbnail-sized profile photo URL for a person; empty on any failure.
    async fn profile_url(&self, person_id: i64) -> String;
    async fn person_details(&self, person_id: i64) -> Result<PersonDetails>;
    async fn combined_credits(&self, person_id: i64) -> Result<CombinedCredits>;
    async fn languages(&self) -> Result<Vec<Language>>;
}

#[derive(Debug, Deserialize)]
struct ImagePaths {
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    profile_path: Option<String>,
}

impl TmdbClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self::with_base(
            client,
            TMDB_BASE,
            &config.tmdb_api_key,
            &config.tmdb_language,
        )
    }

    pub fn with_base(client: Client, base: &str, api_key: &str, language: &str) -> Self {
        Self {
            client,
            base: base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            language: language.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}{}?api_key={}&language={}",
            self.base,
            path,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.language)
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, label: &str) -> Result<T> {
        let url = self.url(path);
        let parsed = fetch_json(&self.client, &url, Some(label)).await?;
        Ok(parsed)
    }

    async fn image_paths(&self, path: &str) -> Option<ImagePaths> {
        match self
            .get_json::<ImagePaths>(path, "Falha ao buscar detalhes no TMDB.")
            .await
        {
            Ok(paths) => Some(paths),
            Err(e) => {
                warn!("TMDB image lookup for {} failed: {}", path, e);
                None
            }
        }
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn poster_url(&self, kind: MediaKind, id: i64) -> String {
        let path = format!("/{}/{}", kind.as_str(), id);
        self.image_paths(&path)
            .await
            .and_then(|p| p.poster_path)
            .map(|p| image_url(POSTER_SIZE, &p))
            .unwrap_or_default()
    }

    async fn profile_url(&self, person_id: i64) -> String {
        let path = format!("/person/{person_id}");
        self.image_paths(&path)
            .await
            .and_then(|p| p.profile_path)
            .map(|p| image_url(THUMB_SIZE, &p))
            .unwrap_or_default()
    }

    async fn person_details(&self, person_id: i64) -> Result<PersonDetails> {
        self.get_json(
            &format!("/person/{person_id}"),
            "Falha ao buscar detalhes da pessoa.",
        )
        .await
        .with_context(|| format!("TMDB person {person_id}"))
    }

    async fn combined_credits(&self, person_id: i64) -> Result<CombinedCredits> {
        self.get_json(
            &format!("/person/{person_id}/combined_credits"),
            "Falha ao buscar créditos da pessoa.",
        )
        .await
        .with_context(|| format!("TMDB credits for person {person_id}"))
    }

    async fn languages(&self) -> Result<Vec<Language>> {
        let mut languages: Vec<Language> = self
            .get_json("/configuration/languages", "Falha ao buscar linguagens.")
            .await
            .context("TMDB language list")?;
        sort_languages(&mut languages);
        Ok(languages)
    }
}

/// Absolute image URL for a TMDB relative path; empty paths give an empty URL.
pub fn image_url(size: &str, path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    format!("{IMAGE_BASE}/{size}{path}")
}

pub fn sort_languages(languages: &mut [Language]) {
    languages.sort_by(|a, b| {
        a.english_name
            .to_lowercase()
            .cmp(&b.english_name.to_lowercase())
            .then_with(|| a.english_name.cmp(&b.english_name))
    });
}
