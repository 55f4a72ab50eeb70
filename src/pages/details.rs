use serde::Deserialize;
use tracing::{info, warn};

use super::{cast_cards, Outcome, PageView};
use crate::backend::CatalogApi;
use crate::fetch;
use crate::filter;
use crate::models::MediaKind;
use crate::render;
use crate::tmdb::TmdbApi;

pub const CONTAINER_ID: &str = "details-main";

#[derive(Debug, Default, Deserialize)]
pub struct DetailsParams {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl DetailsParams {
    pub fn target(&self) -> Option<(MediaKind, i64)> {
        let id = filter::parse_id(self.id.as_deref())?;
        let kind = filter::parse_text(self.kind.as_deref())?.parse().ok()?;
        Some((kind, id))
    }
}

fn title(kind: Option<MediaKind>) -> &'static str {
    match kind {
        Some(MediaKind::Tv) => "Detalhes da Série",
        _ => "Detalhes do Filme",
    }
}

fn view(kind: Option<MediaKind>, body: String) -> Outcome {
    Outcome::Page(PageView {
        title: title(kind).to_string(),
        container_id: CONTAINER_ID,
        controls: String::new(),
        body,
    })
}

pub async fn handle(catalog: &dyn CatalogApi, tmdb: &dyn TmdbApi, params: &DetailsParams) -> Outcome {
    let Some((kind, id)) = params.target() else {
        return view(
            None,
            render::message("ID ou Tipo da obra não foi fornecido na URL."),
        );
    };
    info!(kind = %kind, id, "Loading details page");

    let work = match catalog.work_by_id(kind, id).await {
        Ok(work) => work,
        Err(e) => {
            warn!("Failed to load {} {}: {:#}", kind, id, e);
            return view(
                Some(kind),
                render::message(
                    "Erro ao carregar detalhes. Verifique se o ID e o Tipo são válidos e se a API está rodando.",
                ),
            );
        }
    };

    let poster = tmdb.poster_url(kind, work.id).await;
    let cast = cast_section(catalog, tmdb, kind, work.display_title()).await;
    view(Some(kind), render::work_details(&work, &poster, &cast))
}

/// Cast is looked up by title; a failure only affects this section.
async fn cast_section(
    catalog: &dyn CatalogApi,
    tmdb: &dyn TmdbApi,
    kind: MediaKind,
    title: &str,
) -> String {
    match catalog.cast_for(kind, title).await {
        Ok(list) if !list.pessoas.is_empty() => cast_cards(tmdb, &list.pessoas).await.concat(),
        Ok(_) => render::message("Nenhuma informação de elenco encontrada."),
        Err(e) => render::message(&fetch::page_message(&e)),
    }
}
