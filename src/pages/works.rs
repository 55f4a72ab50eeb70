//! Movies and shows list pages. Both kinds share one controller; only the
//! backend endpoints and the wording differ.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use super::{details_href, work_cards, Outcome, PageView};
use crate::backend::CatalogApi;
use crate::filter;
use crate::models::{MediaKind, Work};
use crate::render;
use crate::tmdb::TmdbApi;

pub const CONTAINER_ID: &str = "main-content";

/// Query string of a list page. At most one filter applies; the first one
/// present (in field order) wins.
#[derive(Debug, Default, Deserialize)]
pub struct WorkParams {
    pub id: Option<String>,
    pub name: Option<String>,
    pub keyword: Option<String>,
    pub popularity: Option<String>,
    pub released_until: Option<String>,
    pub language: Option<String>,
    pub rating: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkAction {
    Top,
    ById(i64),
    ByName(String),
    Keyword(String),
    PopularityAbove(f64),
    ReleasedUntil(NaiveDate),
    Language(String),
    RatingAbove(f64),
}

impl WorkAction {
    /// Malformed input falls back to [`WorkAction::Top`], the same page the
    /// user would see had they cancelled the filter.
    pub fn from_params(params: &WorkParams) -> Self {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());

        let parsed = if present(&params.id) {
            filter::parse_id(params.id.as_deref()).map(WorkAction::ById)
        } else if present(&params.name) {
            filter::parse_text(params.name.as_deref()).map(|s| WorkAction::ByName(s.to_string()))
        } else if present(&params.keyword) {
            filter::parse_text(params.keyword.as_deref())
                .map(|s| WorkAction::Keyword(s.to_string()))
        } else if present(&params.popularity) {
            filter::parse_number(params.popularity.as_deref()).map(WorkAction::PopularityAbove)
        } else if present(&params.released_until) {
            filter::parse_cutoff(params.released_until.as_deref()).map(WorkAction::ReleasedUntil)
        } else if present(&params.language) {
            filter::parse_language_code(params.language.as_deref()).map(WorkAction::Language)
        } else if present(&params.rating) {
            filter::parse_number(params.rating.as_deref()).map(WorkAction::RatingAbove)
        } else {
            None
        };
        parsed.unwrap_or(WorkAction::Top)
    }
}

fn list_title(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Movie => "Filmes",
        MediaKind::Tv => "Séries",
    }
}

/// "Nenhum filme encontrado {rest}" / "Nenhuma série encontrada {rest}".
fn none_found(kind: MediaKind, rest: &str) -> String {
    match kind {
        MediaKind::Movie => format!("Nenhum filme encontrado {rest}"),
        MediaKind::Tv => format!("Nenhuma série encontrada {rest}"),
    }
}

fn top_error(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Movie => "Não foi possível carregar os filmes populares.",
        MediaKind::Tv => "Não foi possível carregar as séries populares.",
    }
}

fn list_error(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Movie => "Não foi possível carregar a lista de filmes.",
        MediaKind::Tv => "Não foi possível carregar a lista de séries.",
    }
}

fn name_not_found(kind: MediaKind, name: &str) -> String {
    match kind {
        MediaKind::Movie => format!("Filme \"{name}\" não encontrado."),
        MediaKind::Tv => format!("Série \"{name}\" não encontrada."),
    }
}

pub fn controls(kind: MediaKind) -> String {
    let action = kind.page_path();
    let noun = match kind {
        MediaKind::Movie => "do filme",
        MediaKind::Tv => "da série",
    };
    [
        render::filter_form(action, &format!("ID {noun}"), "id", "number"),
        render::filter_form(action, &format!("Nome exato {noun}"), "name", "text"),
        render::filter_form(action, "Palavra-chave", "keyword", "text"),
        render::filter_form(action, "Popularidade maior que", "popularity", "number"),
        render::filter_form(action, "Lançados até", "released_until", "date"),
        render::filter_form(action, "Avaliação maior que (0 a 100)", "rating", "number"),
        format!(
            r#"<a class="filtro" href="{}/languages">Filtrar por linguagem</a>"#,
            action
        ),
    ]
    .concat()
}

fn view(kind: MediaKind, body: String) -> Outcome {
    Outcome::Page(PageView {
        title: list_title(kind).to_string(),
        container_id: CONTAINER_ID,
        controls: controls(kind),
        body,
    })
}

async fn render_works(
    tmdb: &dyn TmdbApi,
    kind: MediaKind,
    works: &[Work],
    not_found: &str,
) -> String {
    let cards = work_cards(tmdb, works, kind).await;
    render::card_list(&cards, not_found)
}

pub async fn handle(
    catalog: &dyn CatalogApi,
    tmdb: &dyn TmdbApi,
    kind: MediaKind,
    action: WorkAction,
) -> Outcome {
    info!(kind = %kind, action = ?action, "Loading list page");
    let default_not_found = none_found(kind, "para o critério informado.");

    let body = match action {
        WorkAction::Top => match catalog.top_works(kind).await {
            Ok(works) => render_works(tmdb, kind, &works, &default_not_found).await,
            Err(_) => render::message(top_error(kind)),
        },
        WorkAction::ById(id) => return Outcome::Redirect(details_href(kind, id)),
        WorkAction::ByName(name) => match catalog.work_by_name(kind, &name).await {
            Ok(work) => return Outcome::Redirect(details_href(kind, work.id)),
            Err(_) => render::message(&name_not_found(kind, &name)),
        },
        WorkAction::Keyword(keyword) => {
            let not_found = none_found(kind, &format!("com o termo \"{keyword}\"."));
            match catalog.works_by_keyword(kind, &keyword).await {
                Ok(works) => render_works(tmdb, kind, &works, &not_found).await,
                Err(_) => render::message(&not_found),
            }
        }
        WorkAction::PopularityAbove(min) => {
            let not_found = none_found(kind, &format!("com popularidade maior que {min}."));
            filtered(catalog, tmdb, kind, &not_found, |works| {
                filter::above_popularity(works, min)
            })
            .await
        }
        WorkAction::ReleasedUntil(cutoff) => {
            let not_found = none_found(
                kind,
                &format!("com data de lançamento até {}.", cutoff.format("%Y-%m-%d")),
            );
            filtered(catalog, tmdb, kind, &not_found, |works| {
                filter::released_until(works, cutoff)
            })
            .await
        }
        WorkAction::Language(code) => {
            let not_found = none_found(
                kind,
                &format!("para o idioma '{}'.", code.to_uppercase()),
            );
            filtered(catalog, tmdb, kind, &not_found, |works| {
                filter::in_language(works, &code)
            })
            .await
        }
        WorkAction::RatingAbove(min) => {
            let not_found = none_found(kind, &format!("com avaliação maior que {min}/100."));
            filtered(catalog, tmdb, kind, &not_found, |works| {
                filter::rated_above(works, min)
            })
            .await
        }
    };
    view(kind, body)
}

/// Fetches the full popularity-sorted list and keeps what `keep` returns.
async fn filtered<F>(
    catalog: &dyn CatalogApi,
    tmdb: &dyn TmdbApi,
    kind: MediaKind,
    not_found: &str,
    keep: F,
) -> String
where
    F: FnOnce(Vec<Work>) -> Vec<Work>,
{
    match catalog.works_by_popularity(kind).await {
        Ok(all) => {
            let total = all.len();
            let works = keep(all);
            debug!(kind = %kind, total, kept = works.len(), "Filtered works");
            render_works(tmdb, kind, &works, not_found).await
        }
        Err(_) => render::message(list_error(kind)),
    }
}

/// Language picker for a list page.
pub async fn languages(tmdb: &dyn TmdbApi, kind: MediaKind) -> Outcome {
    let body = match tmdb.languages().await {
        Ok(langs) => render::language_list(kind.page_path(), &langs),
        Err(_) => render::message("Não foi possível carregar as linguagens."),
    };
    view(kind, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> WorkParams {
        WorkParams::default()
    }

    #[test]
    fn no_params_is_top() {
        assert_eq!(WorkAction::from_params(&params()), WorkAction::Top);
    }

    #[test]
    fn first_present_filter_wins() {
        let p = WorkParams {
            keyword: Some("amor".into()),
            rating: Some("70".into()),
            ..params()
        };
        assert_eq!(
            WorkAction::from_params(&p),
            WorkAction::Keyword("amor".into())
        );
    }

    #[test]
    fn malformed_filter_aborts_to_top() {
        let p = WorkParams {
            popularity: Some("muito".into()),
            rating: Some("70".into()),
            ..params()
        };
        assert_eq!(WorkAction::from_params(&p), WorkAction::Top);

        let p = WorkParams {
            released_until: Some("31/12/2020".into()),
            ..params()
        };
        assert_eq!(WorkAction::from_params(&p), WorkAction::Top);
    }

    #[test]
    fn empty_values_are_ignored() {
        let p = WorkParams {
            id: Some(String::new()),
            rating: Some("50".into()),
            ..params()
        };
        assert_eq!(WorkAction::from_params(&p), WorkAction::RatingAbove(50.0));
    }

    #[test]
    fn wording_follows_kind() {
        assert_eq!(
            none_found(MediaKind::Tv, "com popularidade maior que 50."),
            "Nenhuma série encontrada com popularidade maior que 50."
        );
        assert_eq!(
            name_not_found(MediaKind::Movie, "Central do Brasil"),
            "Filme \"Central do Brasil\" não encontrado."
        );
    }
}
