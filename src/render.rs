//! HTML fragment builders. Every builder is infallible: missing fields get
//! their placeholder text here, and askama escapes everything interpolated.

use askama::Template;
use tracing::warn;

use crate::models::{Credit, Gender, Language, MediaKind, Person, PersonDetails, Work};

const NOT_INFORMED: &str = "Não informado";
const NOT_AVAILABLE: &str = "N/A";

#[derive(Template)]
#[template(path = "layout.html")]
struct Layout<'a> {
    title: &'a str,
    controls: &'a str,
    container_id: &'a str,
    body: &'a str,
}

#[derive(Template)]
#[template(path = "filter_form.html")]
struct FilterForm<'a> {
    action: &'a str,
    label: &'a str,
    name: &'a str,
    input_type: &'a str,
}

#[derive(Template)]
#[template(path = "message.html")]
struct Message<'a> {
    message: &'a str,
}

#[derive(Template)]
#[template(path = "work_card.html")]
struct WorkCard<'a> {
    id: i64,
    kind: MediaKind,
    title: &'a str,
    poster_url: &'a str,
    rating: i64,
}

#[derive(Template)]
#[template(path = "person_card.html")]
struct PersonCard<'a> {
    id: i64,
    name: &'a str,
    profile_url: &'a str,
    character: &'a str,
    department: &'a str,
    popularity: String,
    gender: &'a str,
}

#[derive(Template)]
#[template(path = "cast_card.html")]
struct CastCard<'a> {
    id: i64,
    name: &'a str,
    profile_url: &'a str,
    character: &'a str,
    department: &'a str,
    popularity: String,
    gender: &'a str,
}

#[derive(Template)]
#[template(path = "known_for_card.html")]
struct KnownForCard<'a> {
    id: i64,
    kind: MediaKind,
    title: &'a str,
    poster_url: &'a str,
}

#[derive(Template)]
#[template(path = "work_details.html")]
struct WorkDetails<'a> {
    title: &'a str,
    poster_url: &'a str,
    overview: &'a str,
    release_date: &'a str,
    rating: i64,
    vote_count: i64,
    language: String,
    cast: &'a str,
}

#[derive(Template)]
#[template(path = "person_details.html")]
struct PersonDetailsView<'a> {
    name: &'a str,
    profile_url: &'a str,
    biography: &'a str,
    gallery: &'a [String],
}

pub struct OptionLink {
    pub href: String,
    pub label: String,
}

#[derive(Template)]
#[template(path = "option_list.html")]
struct OptionList<'a> {
    item_class: &'a str,
    options: &'a [OptionLink],
}

fn render<T: Template>(template: &T) -> String {
    template.render().unwrap_or_else(|e| {
        warn!("Template rendering failed: {}", e);
        String::new()
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Full HTML document wrapping `body` in the page's fixed container.
pub fn page(title: &str, controls: &str, container_id: &str, body: &str) -> String {
    render(&Layout {
        title,
        controls,
        container_id,
        body,
    })
}

pub fn filter_form(action: &str, label: &str, name: &str, input_type: &str) -> String {
    render(&FilterForm {
        action,
        label,
        name,
        input_type,
    })
}

pub fn message(message: &str) -> String {
    render(&Message { message })
}

pub fn work_card(work: &Work, poster_url: &str, kind: MediaKind) -> String {
    render(&WorkCard {
        id: work.id,
        kind,
        title: work.display_title(),
        poster_url,
        rating: work.rating_percent(),
    })
}

pub fn person_card(person: &Person, profile_url: &str) -> String {
    render(&PersonCard {
        id: person.id,
        name: person.display_name(),
        profile_url,
        character: non_blank(person.character.as_deref()).unwrap_or(NOT_INFORMED),
        department: person.department.as_deref().unwrap_or_default(),
        popularity: format!("{:.2}", person.popularity()),
        gender: Gender::label_for_code(person.gender_code()),
    })
}

/// Card for the cast section of a details page. Unlike [`person_card`], a
/// missing photo leaves the slot empty.
pub fn cast_card(person: &Person, profile_url: &str) -> String {
    render(&CastCard {
        id: person.id,
        name: person.display_name(),
        profile_url,
        character: non_blank(person.character.as_deref()).unwrap_or(NOT_INFORMED),
        department: person.department.as_deref().unwrap_or_default(),
        popularity: format!("{:.2}", person.popularity()),
        gender: Gender::label_for_code(person.gender_code()),
    })
}

pub fn known_for_card(credit: &Credit, kind: MediaKind, poster_url: &str) -> String {
    render(&KnownForCard {
        id: credit.id,
        kind,
        title: credit.display_title(),
        poster_url,
    })
}

pub fn work_details(work: &Work, poster_url: &str, cast_html: &str) -> String {
    render(&WorkDetails {
        title: work.display_title(),
        poster_url,
        overview: non_blank(work.overview.as_deref()).unwrap_or("Descrição não disponível."),
        release_date: work.released_on().unwrap_or(NOT_AVAILABLE),
        rating: work.rating_percent(),
        vote_count: work.vote_count.unwrap_or_default(),
        language: work
            .language_code()
            .map(str::to_uppercase)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        cast: cast_html,
    })
}

pub fn person_details(details: &PersonDetails, profile_url: &str, gallery: &[String]) -> String {
    render(&PersonDetailsView {
        name: &details.name,
        profile_url,
        biography: non_blank(details.biography.as_deref())
            .unwrap_or("Biografia não disponível em português."),
        gallery,
    })
}

/// Language picker; each entry links to `action` filtered by its code.
pub fn language_list(action: &str, languages: &[Language]) -> String {
    let options: Vec<OptionLink> = languages
        .iter()
        .map(|lang| OptionLink {
            href: format!(
                "{}?language={}",
                action,
                urlencoding::encode(&lang.iso_639_1)
            ),
            label: format!(
                "{} - {}",
                lang.iso_639_1.to_uppercase(),
                lang.english_name
            ),
        })
        .collect();
    render(&OptionList {
        item_class: "language-item",
        options: &options,
    })
}

pub fn gender_list(action: &str) -> String {
    let options: Vec<OptionLink> = Gender::ALL
        .iter()
        .map(|g| OptionLink {
            href: format!("{}?gender={}", action, g.code()),
            label: g.label().to_string(),
        })
        .collect();
    render(&OptionList {
        item_class: "gender-item",
        options: &options,
    })
}

/// Joins rendered cards, or the not-found message when there are none.
pub fn card_list(cards: &[String], not_found: &str) -> String {
    if cards.is_empty() {
        return message(not_found);
    }
    cards.concat()
}
