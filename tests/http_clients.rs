use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use cinereview::backend::{BackendClient, CatalogApi};
use cinereview::fetch::{build_client, fetch_json, page_message, FetchError, DEFAULT_LABEL};
use cinereview::models::{MediaKind, Work};
use cinereview::tmdb::{TmdbApi, TmdbClient};
use serde_json::{json, Value};
use std::collections::HashMap;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

type Params = Query<HashMap<String, String>>;

fn require_key(params: &HashMap<String, String>) -> Result<(), StatusCode> {
    let key_ok = params.get("api_key").map(String::as_str) == Some("test-key");
    let lang_ok = params.get("language").map(String::as_str) == Some("pt-BR");
    if key_ok && lang_ok {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

fn tmdb_stub() -> Router {
    Router::new()
        .route(
            "/movie/:id",
            get(|Path(id): Path<i64>, Query(q): Params| async move {
                require_key(&q)?;
                match id {
                    550 => Ok(Json(json!({ "id": 550, "poster_path": "/fight.jpg" }))),
                    551 => Ok(Json(json!({ "id": 551, "poster_path": null }))),
                    _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
                }
            }),
        )
        .route(
            "/person/:id",
            get(|Path(id): Path<i64>, Query(q): Params| async move {
                require_key(&q)?;
                Ok::<_, StatusCode>(Json(json!({
                    "id": id,
                    "name": "Fernanda Montenegro",
                    "biography": "",
                    "profile_path": "/fernanda.jpg",
                })))
            }),
        )
        .route(
            "/configuration/languages",
            get(|Query(q): Params| async move {
                require_key(&q)?;
                Ok::<_, StatusCode>(Json(json!([
                    { "iso_639_1": "pt", "english_name": "Portuguese" },
                    { "iso_639_1": "en", "english_name": "English" },
                    { "iso_639_1": "ab", "english_name": "abkhazian" },
                ])))
            }),
        )
}

fn tmdb_client(base: &str, key: &str) -> TmdbClient {
    TmdbClient::with_base(build_client().unwrap(), base, key, "pt-BR")
}

#[tokio::test]
async fn fetch_json_parses_success() {
    let base = serve(Router::new().route("/ok", get(|| async { Json(json!({ "id": 7 })) }))).await;
    let client = build_client().unwrap();
    let value: Value = fetch_json(&client, &format!("{base}/ok"), None).await.unwrap();
    assert_eq!(value["id"], 7);
}

#[tokio::test]
async fn fetch_json_reports_status_with_label() {
    let base = serve(Router::new()).await;
    let client = build_client().unwrap();

    let err = fetch_json::<Value>(&client, &format!("{base}/missing"), Some("Sem dados."))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Status { .. }));
    assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
    assert_eq!(err.to_string(), "Sem dados. Status: 404");

    let err = fetch_json::<Value>(&client, &format!("{base}/missing"), None)
        .await
        .unwrap_err();
    assert_eq!(err.label(), DEFAULT_LABEL);
    assert_eq!(err.to_string(), format!("{DEFAULT_LABEL} Status: 404"));
}

#[tokio::test]
async fn fetch_json_reports_transport_and_decode_failures() {
    let closed = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = build_client().unwrap();
    let err = fetch_json::<Value>(&client, &format!("http://{closed}/x"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport { .. }));

    let base = serve(Router::new().route("/text", get(|| async { "not json" }))).await;
    let err = fetch_json::<Value>(&client, &format!("{base}/text"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn tmdb_poster_lookup_degrades_to_empty() {
    let base = serve(tmdb_stub()).await;
    let tmdb = tmdb_client(&base, "test-key");

    assert_eq!(
        tmdb.poster_url(MediaKind::Movie, 550).await,
        "https://image.tmdb.org/t/p/w500/fight.jpg"
    );
    assert_eq!(tmdb.poster_url(MediaKind::Movie, 551).await, "");
    assert_eq!(tmdb.poster_url(MediaKind::Movie, 1).await, "");
    assert_eq!(tmdb.poster_url(MediaKind::Tv, 550).await, "");

    let wrong_key = tmdb_client(&base, "other");
    assert_eq!(wrong_key.poster_url(MediaKind::Movie, 550).await, "");
}

#[tokio::test]
async fn tmdb_profile_and_person_details() {
    let base = serve(tmdb_stub()).await;
    let tmdb = tmdb_client(&base, "test-key");

    assert_eq!(
        tmdb.profile_url(1).await,
        "https://image.tmdb.org/t/p/w185/fernanda.jpg"
    );
    let details = tmdb.person_details(1).await.unwrap();
    assert_eq!(details.name, "Fernanda Montenegro");
    assert_eq!(details.biography.as_deref(), Some(""));
}

#[tokio::test]
async fn tmdb_languages_are_sorted_by_name() {
    let base = serve(tmdb_stub()).await;
    let tmdb = tmdb_client(&base, "test-key");

    let codes: Vec<String> = tmdb
        .languages()
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.iso_639_1)
        .collect();
    assert_eq!(codes, ["ab", "en", "pt"]);

    let err = tmdb_client(&base, "other").languages().await.unwrap_err();
    assert!(format!("{err:#}").contains("Falha ao buscar linguagens. Status: 401"));
}

#[tokio::test]
async fn backend_encodes_query_values() {
    let app = Router::new().route(
        "/series/obterPorParte",
        get(|Query(q): Params| async move {
            let keyword = q.get("keyword").cloned().unwrap_or_default();
            Json(vec![Work {
                id: 1,
                name: Some(keyword),
                ..Work::default()
            }])
        }),
    );
    let base = serve(app).await;
    let backend = BackendClient::with_base(build_client().unwrap(), &format!("{base}/"));

    let works = backend
        .works_by_keyword(MediaKind::Tv, "Casa & Papel")
        .await
        .unwrap();
    assert_eq!(works.len(), 1);
    assert_eq!(works[0].display_title(), "Casa & Papel");
}

#[tokio::test]
async fn backend_cast_failure_carries_cast_label() {
    let base = serve(Router::new()).await;
    let backend = BackendClient::with_base(build_client().unwrap(), &base);

    let err = backend
        .cast_for(MediaKind::Movie, "Cidade de Deus")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Elenco não encontrado para esta obra. Status: 404"
    );

    let err = backend.person_by_id(9).await.unwrap_err();
    assert_eq!(err.to_string(), format!("{DEFAULT_LABEL} Status: 404"));
}

#[tokio::test]
async fn backend_list_keeps_records_that_decode() {
    let app = Router::new().route(
        "/pessoas/obterPorPopularidade",
        get(|| async {
            Json(json!([
                { "id": 1, "name": "Fernanda Montenegro", "popularity": 20.0 },
                { "name": "Sem id", "popularity": 99.0 },
                { "id": 2, "name": "Wagner Moura", "gender": null },
            ]))
        }),
    );
    let base = serve(app).await;
    let backend = BackendClient::with_base(build_client().unwrap(), &base);

    let people = backend.people_by_popularity().await.unwrap();
    let names: Vec<&str> = people.iter().map(|p| p.display_name()).collect();
    assert_eq!(names, ["Fernanda Montenegro", "Wagner Moura"]);
}

#[tokio::test]
async fn backend_outage_message_omits_address() {
    let closed = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let base = format!("http://{closed}");
    let backend = BackendClient::with_base(build_client().unwrap(), &base);

    let err = backend
        .cast_for(MediaKind::Movie, "Cidade de Deus")
        .await
        .unwrap_err();
    assert!(err.to_string().contains(&base));
    assert_eq!(page_message(&err), "Elenco não encontrado para esta obra.");
}
