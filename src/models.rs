use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Decodes each record on its own and drops the ones that do not fit `T`
/// (a record with no `id`, say), so one bad row never empties a list.
pub fn decode_each<T: DeserializeOwned>(records: Vec<Value>) -> Vec<T> {
    let total = records.len();
    let decoded: Vec<T> = records
        .into_iter()
        .filter_map(|record| serde_json::from_value(record).ok())
        .collect();
    if decoded.len() < total {
        warn!(
            total,
            skipped = total - decoded.len(),
            "Dropped undecodable backend records"
        );
    }
    decoded
}

fn skip_undecodable<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let records = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(decode_each(records.unwrap_or_default()))
}

/// Movie or show. The backend and TMDB disagree on field names between the
/// two kinds, so both spellings are kept and read through the accessors.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Work {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl Work {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    pub fn released_on(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .filter(|d| !d.is_empty())
    }

    pub fn language_code(&self) -> Option<&str> {
        self.original_language
            .as_deref()
            .or(self.language.as_deref())
            .filter(|l| !l.is_empty())
    }

    pub fn popularity(&self) -> f64 {
        self.popularity.unwrap_or_default()
    }

    pub fn vote_average(&self) -> f64 {
        self.vote_average.unwrap_or_default()
    }

    /// Rating on the 0-100 scale shown on cards.
    pub fn rating_percent(&self) -> i64 {
        (self.vote_average() * 10.0).round() as i64
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Person {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub gender: Option<i32>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub character: Option<String>,
}

impl Person {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn popularity(&self) -> f64 {
        self.popularity.unwrap_or_default()
    }

    pub fn gender_code(&self) -> i32 {
        self.gender.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Female, Gender::Male];

    pub fn code(self) -> i32 {
        match self {
            Gender::Female => 1,
            Gender::Male => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Gender::Female),
            2 => Some(Gender::Male),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Female => "Feminino",
            Gender::Male => "Masculino",
        }
    }

    /// Cards only distinguish female; every other code shows as male.
    pub fn label_for_code(code: i32) -> &'static str {
        if code == 1 {
            Gender::Female.label()
        } else {
            Gender::Male.label()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    /// Path segment on TMDB (`movie` / `tv`), also used in details links.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }

    pub fn backend_segment(self) -> &'static str {
        match self {
            MediaKind::Movie => "filmes",
            MediaKind::Tv => "series",
        }
    }

    pub fn cast_segment(self) -> &'static str {
        match self {
            MediaKind::Movie => "por-filme",
            MediaKind::Tv => "por-serie",
        }
    }

    /// Route of the list page for this kind.
    pub fn page_path(self) -> &'static str {
        match self {
            MediaKind::Movie => "/movies",
            MediaKind::Tv => "/shows",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "movie" => Ok(MediaKind::Movie),
            "tv" => Ok(MediaKind::Tv),
            _ => Err(anyhow::anyhow!("media kind must be 'movie' or 'tv'")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CastList {
    #[serde(default, deserialize_with = "skip_undecodable")]
    pub pessoas: Vec<Person>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PersonDetails {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CombinedCredits {
    #[serde(default)]
    pub cast: Vec<Credit>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Credit {
    pub id: i64,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl Credit {
    pub fn kind(&self) -> Option<MediaKind> {
        self.media_type.as_deref().and_then(|m| m.parse().ok())
    }

    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Language {
    pub iso_639_1: String,
    #[serde(default)]
    pub english_name: String,
}
