//! Client for the catalog's own REST backend.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::fetch::fetch_json;
use crate::models::{decode_each, CastList, MediaKind, Person, Work};

#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// The backend's top-5 most popular works of `kind`.
    async fn top_works(&self, kind: MediaKind) -> Result<Vec<Work>>;
    async fn work_by_id(&self, kind: MediaKind, id: i64) -> Result<Work>;
    async fn work_by_name(&self, kind: MediaKind, name: &str) -> Result<Work>;
    async fn works_by_keyword(&self, kind: MediaKind, keyword: &str) -> Result<Vec<Work>>;
    /// Every work of `kind`, sorted by popularity.
    async fn works_by_popularity(&self, kind: MediaKind) -> Result<Vec<Work>>;
    async fn cast_for(&self, kind: MediaKind, title: &str) -> Result<CastList>;

    async fn top_people(&self) -> Result<Vec<Person>>;
    async fn person_by_id(&self, id: i64) -> Result<Person>;
    async fn person_by_name(&self, name: &str) -> Result<Person>;
    async fn people_by_name_part(&self, part: &str) -> Result<Vec<Person>>;
    async fn people_by_character(&self, character: &str) -> Result<Vec<Person>>;
    async fn people_by_department(&self, department: &str) -> Result<Vec<Person>>;
    async fn people_by_popularity(&self) -> Result<Vec<Person>>;
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base: String,
}

impl BackendClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self::with_base(client, &config.backend_url)
    }

    pub fn with_base(client: Client, base: &str) -> Self {
        Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn url_with_query(&self, path: &str, param: &str, value: &str) -> String {
        format!(
            "{}{}?{}={}",
            self.base,
            path,
            param,
            urlencoding::encode(value)
        )
    }

    async fn get<T: DeserializeOwned>(&self, url: &str, label: Option<&str>) -> Result<T> {
        Ok(fetch_json(&self.client, url, label).await?)
    }

    async fn get_list<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let records: Vec<Value> = self.get(url, None).await?;
        Ok(decode_each(records))
    }
}

/// Query parameter the backend expects on each kind's exact-name endpoint.
fn name_param(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Movie => "titulo",
        MediaKind::Tv => "nome",
    }
}

fn keyword_param(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Movie => "nome",
        MediaKind::Tv => "keyword",
    }
}

fn top_path(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Movie => "/filmes/obterTop5FilmesPopulares",
        MediaKind::Tv => "/series/obterTop5SeriesPopulares",
    }
}

#[async_trait]
impl CatalogApi for BackendClient {
    async fn top_works(&self, kind: MediaKind) -> Result<Vec<Work>> {
        self.get_list(&self.url(top_path(kind))).await
    }

    async fn work_by_id(&self, kind: MediaKind, id: i64) -> Result<Work> {
        let path = format!("/{}/{}", kind.backend_segment(), id);
        self.get(&self.url(&path), None).await
    }

    async fn work_by_name(&self, kind: MediaKind, name: &str) -> Result<Work> {
        let path = format!("/{}/obterPorNome", kind.backend_segment());
        self.get(&self.url_with_query(&path, name_param(kind), name), None)
            .await
    }

    async fn works_by_keyword(&self, kind: MediaKind, keyword: &str) -> Result<Vec<Work>> {
        let path = format!("/{}/obterPorParte", kind.backend_segment());
        self.get_list(&self.url_with_query(&path, keyword_param(kind), keyword))
            .await
    }

    async fn works_by_popularity(&self, kind: MediaKind) -> Result<Vec<Work>> {
        let path = format!("/{}/obterPorPopularidade", kind.backend_segment());
        self.get_list(&self.url(&path)).await
    }

    async fn cast_for(&self, kind: MediaKind, title: &str) -> Result<CastList> {
        let path = format!("/elencos/{}", kind.cast_segment());
        self.get(
            &self.url_with_query(&path, "nome", title),
            Some("Elenco não encontrado para esta obra."),
        )
        .await
    }

    async fn top_people(&self) -> Result<Vec<Person>> {
        self.get_list(&self.url("/pessoas/obterTop10Populares"))
            .await
    }

    async fn person_by_id(&self, id: i64) -> Result<Person> {
        self.get(&self.url(&format!("/pessoas/{id}")), None).await
    }

    async fn person_by_name(&self, name: &str) -> Result<Person> {
        self.get(
            &self.url_with_query("/pessoas/obterPorNome", "nome", name),
            None,
        )
        .await
    }

    async fn people_by_name_part(&self, part: &str) -> Result<Vec<Person>> {
        self.get_list(&self.url_with_query("/pessoas/obterPorParteDoNome", "nome", part))
            .await
    }

    async fn people_by_character(&self, character: &str) -> Result<Vec<Person>> {
        self.get_list(&self.url_with_query("/pessoas/obterPorPersonagem", "personagem", character))
            .await
    }

    async fn people_by_department(&self, department: &str) -> Result<Vec<Person>> {
        self.get_list(&self.url_with_query(
            "/pessoas/obterPorDepartamento",
            "departamento",
            department,
        ))
        .await
    }

    async fn people_by_popularity(&self) -> Result<Vec<Person>> {
        self.get_list(&self.url("/pessoas/obterPorPopularidade"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_values_are_percent_encoded() {
        let client = BackendClient::with_base(Client::new(), "http://localhost:8080/");
        assert_eq!(
            client.url_with_query("/filmes/obterPorNome", name_param(MediaKind::Movie), "Amor & Ódio"),
            "http://localhost:8080/filmes/obterPorNome?titulo=Amor%20%26%20%C3%93dio"
        );
    }

    #[test]
    fn kinds_use_their_own_parameters() {
        assert_eq!(name_param(MediaKind::Tv), "nome");
        assert_eq!(keyword_param(MediaKind::Movie), "nome");
        assert_eq!(keyword_param(MediaKind::Tv), "keyword");
        assert_eq!(top_path(MediaKind::Tv), "/series/obterTop5SeriesPopulares");
    }
}
