use serde::Deserialize;
use tracing::{debug, info};

use super::{person_cards, Outcome, PageView};
use crate::backend::CatalogApi;
use crate::filter;
use crate::models::{Gender, Person};
use crate::render;
use crate::tmdb::TmdbApi;

pub const CONTAINER_ID: &str = "actor-grid";
pub const PAGE_PATH: &str = "/actors";

const DEFAULT_NOT_FOUND: &str = "Nenhum resultado encontrado para este filtro.";

#[derive(Debug, Default, Deserialize)]
pub struct PeopleParams {
    pub id: Option<String>,
    pub name: Option<String>,
    pub keyword: Option<String>,
    pub character: Option<String>,
    pub department: Option<String>,
    pub popularity: Option<String>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PeopleAction {
    Top,
    ById(i64),
    ByName(String),
    NameContains(String),
    Character(String),
    Department(String),
    PopularityAbove(f64),
    Gender(Gender),
}

impl PeopleAction {
    pub fn from_params(params: &PeopleParams) -> Self {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        let text = |v: &Option<String>| filter::parse_text(v.as_deref()).map(str::to_string);

        let parsed = if present(&params.id) {
            filter::parse_id(params.id.as_deref()).map(PeopleAction::ById)
        } else if present(&params.name) {
            text(&params.name).map(PeopleAction::ByName)
        } else if present(&params.keyword) {
            text(&params.keyword).map(PeopleAction::NameContains)
        } else if present(&params.character) {
            text(&params.character).map(PeopleAction::Character)
        } else if present(&params.department) {
            text(&params.department).map(PeopleAction::Department)
        } else if present(&params.popularity) {
            filter::parse_number(params.popularity.as_deref()).map(PeopleAction::PopularityAbove)
        } else if present(&params.gender) {
            filter::parse_id(params.gender.as_deref())
                .and_then(|code| i32::try_from(code).ok())
                .and_then(Gender::from_code)
                .map(PeopleAction::Gender)
        } else {
            None
        };
        parsed.unwrap_or(PeopleAction::Top)
    }
}

pub fn controls() -> String {
    [
        render::filter_form(PAGE_PATH, "ID da pessoa", "id", "number"),
        render::filter_form(PAGE_PATH, "Nome exato", "name", "text"),
        render::filter_form(PAGE_PATH, "Parte do nome", "keyword", "text"),
        render::filter_form(PAGE_PATH, "Personagem", "character", "text"),
        render::filter_form(PAGE_PATH, "Departamento (ex: Acting)", "department", "text"),
        render::filter_form(PAGE_PATH, "Popularidade maior que", "popularity", "number"),
        format!(
            r#"<a class="filtro" href="{}/genders">Filtrar por gênero</a>"#,
            PAGE_PATH
        ),
    ]
    .concat()
}

fn view(body: String) -> Outcome {
    Outcome::Page(PageView {
        title: "Atores".to_string(),
        container_id: CONTAINER_ID,
        controls: controls(),
        body,
    })
}

async fn render_people(tmdb: &dyn TmdbApi, people: &[Person], not_found: &str) -> String {
    let cards = person_cards(tmdb, people).await;
    render::card_list(&cards, not_found)
}

pub async fn handle(catalog: &dyn CatalogApi, tmdb: &dyn TmdbApi, action: PeopleAction) -> Outcome {
    info!(action = ?action, "Loading people page");

    let body = match action {
        PeopleAction::Top => match catalog.top_people().await {
            Ok(people) => render_people(tmdb, &people, DEFAULT_NOT_FOUND).await,
            Err(_) => render::message("Não foi possível carregar as pessoas."),
        },
        PeopleAction::ById(id) => {
            let not_found = format!("Pessoa com ID {id} não encontrada.");
            single(tmdb, catalog.person_by_id(id).await.ok(), &not_found).await
        }
        PeopleAction::ByName(name) => {
            let not_found = format!("Pessoa com nome \"{name}\" não encontrada.");
            single(tmdb, catalog.person_by_name(&name).await.ok(), &not_found).await
        }
        PeopleAction::NameContains(part) => match catalog.people_by_name_part(&part).await {
            Ok(people) => {
                let not_found = format!("Ninguém encontrado com o nome contendo \"{part}\".");
                render_people(tmdb, &people, &not_found).await
            }
            Err(_) => render::message("Erro ao buscar por nome."),
        },
        PeopleAction::Character(character) => {
            match catalog.people_by_character(&character).await {
                Ok(people) => {
                    let not_found = format!("Ninguém encontrado que interpretou \"{character}\".");
                    render_people(tmdb, &people, &not_found).await
                }
                Err(_) => render::message("Erro ao buscar por personagem."),
            }
        }
        PeopleAction::Department(department) => {
            match catalog.people_by_department(&department).await {
                Ok(people) => {
                    let not_found = format!("Ninguém encontrado no departamento \"{department}\".");
                    render_people(tmdb, &people, &not_found).await
                }
                Err(_) => render::message("Erro ao buscar por departamento."),
            }
        }
        PeopleAction::PopularityAbove(min) => match catalog.people_by_popularity().await {
            Ok(all) => {
                let total = all.len();
                let people = filter::above_popularity(all, min);
                debug!(total, kept = people.len(), "Filtered people by popularity");
                let not_found = format!("Ninguém encontrado com popularidade maior que {min}.");
                render_people(tmdb, &people, &not_found).await
            }
            Err(_) => render::message("Erro ao carregar lista de pessoas."),
        },
        PeopleAction::Gender(gender) => match catalog.people_by_popularity().await {
            Ok(all) => {
                let total = all.len();
                let people = filter::with_gender(all, gender.code());
                debug!(total, kept = people.len(), "Filtered people by gender");
                let not_found =
                    format!("Nenhuma pessoa encontrada do gênero '{}'.", gender.label());
                render_people(tmdb, &people, &not_found).await
            }
            Err(_) => render::message("Erro ao buscar por gênero."),
        },
    };
    view(body)
}

/// Lookups by id or exact name render their one hit as a one-card list.
async fn single(tmdb: &dyn TmdbApi, person: Option<Person>, not_found: &str) -> String {
    let people: Vec<Person> = person.into_iter().collect();
    render_people(tmdb, &people, not_found).await
}

pub fn genders() -> Outcome {
    view(render::gender_list(PAGE_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_param_must_be_known_code() {
        let p = PeopleParams {
            gender: Some("1".into()),
            ..PeopleParams::default()
        };
        assert_eq!(
            PeopleAction::from_params(&p),
            PeopleAction::Gender(Gender::Female)
        );

        let p = PeopleParams {
            gender: Some("7".into()),
            ..PeopleParams::default()
        };
        assert_eq!(PeopleAction::from_params(&p), PeopleAction::Top);
    }

    #[test]
    fn text_filters_are_trimmed() {
        let p = PeopleParams {
            character: Some("  Tony Stark ".into()),
            ..PeopleParams::default()
        };
        assert_eq!(
            PeopleAction::from_params(&p),
            PeopleAction::Character("Tony Stark".into())
        );
    }

    #[test]
    fn blank_text_aborts() {
        let p = PeopleParams {
            department: Some("   ".into()),
            ..PeopleParams::default()
        };
        assert_eq!(PeopleAction::from_params(&p), PeopleAction::Top);
    }
}
