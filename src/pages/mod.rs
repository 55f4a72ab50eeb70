//! One controller per page. A controller turns one interaction (the initial
//! load or one filter) into the HTML of the page's container, or a redirect.

use futures::future::join_all;

use crate::models::{MediaKind, Person, Work};
use crate::render;
use crate::tmdb::TmdbApi;

pub mod details;
pub mod people;
pub mod person;
pub mod works;

/// Poster lookups for work lists run this many at a time.
pub const POSTER_BATCH: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Page(PageView),
    Redirect(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub title: String,
    pub container_id: &'static str,
    pub controls: String,
    pub body: String,
}

impl PageView {
    pub fn into_html(self) -> String {
        render::page(&self.title, &self.controls, self.container_id, &self.body)
    }
}

pub fn details_href(kind: MediaKind, id: i64) -> String {
    format!("/details?id={}&type={}", id, kind)
}

/// Renders work cards, resolving posters in batches of [`POSTER_BATCH`].
/// A batch is written only after all of its lookups finish; failed lookups
/// leave their card without an image.
pub async fn work_cards(tmdb: &dyn TmdbApi, works: &[Work], kind: MediaKind) -> Vec<String> {
    let mut cards = Vec::with_capacity(works.len());
    for chunk in works.chunks(POSTER_BATCH) {
        let batch = join_all(chunk.iter().map(|work| async move {
            let poster = tmdb.poster_url(kind, work.id).await;
            render::work_card(work, &poster, kind)
        }))
        .await;
        cards.extend(batch);
    }
    cards
}

pub async fn person_cards(tmdb: &dyn TmdbApi, people: &[Person]) -> Vec<String> {
    join_all(people.iter().map(|person| async move {
        let photo = tmdb.profile_url(person.id).await;
        render::person_card(person, &photo)
    }))
    .await
}

pub async fn cast_cards(tmdb: &dyn TmdbApi, cast: &[Person]) -> Vec<String> {
    join_all(cast.iter().map(|person| async move {
        let photo = tmdb.profile_url(person.id).await;
        render::cast_card(person, &photo)
    }))
    .await
}
