use serde::Deserialize;
use tracing::{info, warn};

use super::{Outcome, PageView};
use crate::filter;
use crate::models::{Credit, MediaKind};
use crate::render;
use crate::tmdb::{image_url, TmdbApi, POSTER_SIZE, THUMB_SIZE};

pub const CONTAINER_ID: &str = "main-details-pessoa";
pub const GALLERY_SIZE: usize = 4;

#[derive(Debug, Default, Deserialize)]
pub struct PersonParams {
    pub id: Option<String>,
}

fn view(title: &str, body: String) -> Outcome {
    Outcome::Page(PageView {
        title: title.to_string(),
        container_id: CONTAINER_ID,
        controls: String::new(),
        body,
    })
}

/// Credits for the "known for" gallery: movies with a poster first, topped
/// up with shows with a poster, at most [`GALLERY_SIZE`] in credit order.
pub fn known_for(credits: &[Credit]) -> Vec<(&Credit, MediaKind)> {
    let with_poster = |kind: MediaKind| {
        credits.iter().filter(move |c| {
            c.kind() == Some(kind) && c.poster_path.as_deref().is_some_and(|p| !p.is_empty())
        })
    };

    let mut picked: Vec<(&Credit, MediaKind)> = with_poster(MediaKind::Movie)
        .take(GALLERY_SIZE)
        .map(|c| (c, MediaKind::Movie))
        .collect();
    let missing = GALLERY_SIZE - picked.len();
    picked.extend(
        with_poster(MediaKind::Tv)
            .take(missing)
            .map(|c| (c, MediaKind::Tv)),
    );
    picked
}

pub async fn handle(tmdb: &dyn TmdbApi, params: &PersonParams) -> Outcome {
    let Some(id) = filter::parse_id(params.id.as_deref()) else {
        return view(
            "Pessoa",
            render::message("Nenhum ID de pessoa foi fornecido na URL."),
        );
    };
    info!(id, "Loading person page");

    let (details, credits) =
        match tokio::try_join!(tmdb.person_details(id), tmdb.combined_credits(id)) {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Failed to load person {}: {:#}", id, e);
                return view(
                    "Pessoa",
                    render::message("Não foi possível carregar os detalhes desta pessoa."),
                );
            }
        };

    let profile = details
        .profile_path
        .as_deref()
        .map(|p| image_url(POSTER_SIZE, p))
        .unwrap_or_default();
    let gallery: Vec<String> = known_for(&credits.cast)
        .into_iter()
        .map(|(credit, kind)| {
            let poster = credit
                .poster_path
                .as_deref()
                .map(|p| image_url(THUMB_SIZE, p))
                .unwrap_or_default();
            render::known_for_card(credit, kind, &poster)
        })
        .collect();

    view(
        &details.name,
        render::person_details(&details, &profile, &gallery),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credit(id: i64, media: &str, poster: Option<&str>) -> Credit {
        Credit {
            id,
            media_type: Some(media.to_string()),
            poster_path: poster.map(str::to_string),
            ..Credit::default()
        }
    }

    fn ids(picked: &[(&Credit, MediaKind)]) -> Vec<i64> {
        picked.iter().map(|(c, _)| c.id).collect()
    }

    #[test]
    fn movies_first_then_shows_fill_the_gallery() {
        let credits = vec![
            credit(1, "tv", Some("/t1.jpg")),
            credit(2, "movie", Some("/m2.jpg")),
            credit(3, "movie", None),
            credit(4, "tv", Some("/t4.jpg")),
            credit(5, "movie", Some("/m5.jpg")),
            credit(6, "tv", Some("/t6.jpg")),
        ];
        let picked = known_for(&credits);
        assert_eq!(ids(&picked), [2, 5, 1, 4]);
        assert_eq!(picked[2].1, MediaKind::Tv);
    }

    #[test]
    fn gallery_caps_at_four_movies() {
        let credits: Vec<Credit> = (1..=6)
            .map(|i| credit(i, "movie", Some("/p.jpg")))
            .chain(std::iter::once(credit(7, "tv", Some("/t.jpg"))))
            .collect();
        assert_eq!(ids(&known_for(&credits)), [1, 2, 3, 4]);
    }

    #[test]
    fn credits_without_posters_are_skipped() {
        let credits = vec![credit(1, "movie", Some("")), credit(2, "tv", None)];
        assert!(known_for(&credits).is_empty());
    }
}
