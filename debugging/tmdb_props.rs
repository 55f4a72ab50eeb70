//! Resolve TMDB images and languages the way the pages do, and print them.
//! Usage:
//!   cargo run --bin tmdb_props -- movie <tmdb_id>
//!   cargo run --bin tmdb_props -- tv <tmdb_id>
//!   cargo run --bin tmdb_props -- person <tmdb_id>
//!   cargo run --bin tmdb_props -- languages
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use cinereview::config::Config;
use cinereview::fetch::build_client;
use cinereview::models::MediaKind;
use cinereview::pages::person::known_for;
use cinereview::tmdb::{TmdbApi, TmdbClient};
use dotenvy::dotenv;
use serde_json::json;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let config = Config::from_env()?;
    let tmdb = TmdbClient::new(build_client()?, &config);

    let args: Vec<String> = env::args().skip(1).collect();
    let what = args.first().map(String::as_str).unwrap_or("");
    let id = || -> Result<i64> {
        args.get(1)
            .context("missing <tmdb_id>")?
            .parse()
            .context("tmdb_id must be a number")
    };

    let out = match what {
        "movie" | "tv" => {
            let kind: MediaKind = what.parse()?;
            let id = id()?;
            json!({
                "kind": kind.as_str(),
                "id": id,
                "poster_url": tmdb.poster_url(kind, id).await,
            })
        }
        "person" => {
            let id = id()?;
            let (details, credits) =
                tokio::try_join!(tmdb.person_details(id), tmdb.combined_credits(id))?;
            let gallery: Vec<_> = known_for(&credits.cast)
                .into_iter()
                .map(|(c, kind)| json!({ "id": c.id, "kind": kind.as_str(), "title": c.display_title() }))
                .collect();
            json!({
                "id": id,
                "name": details.name,
                "profile_url": tmdb.profile_url(id).await,
                "has_biography": details.biography.as_deref().is_some_and(|b| !b.is_empty()),
                "credits": credits.cast.len(),
                "known_for": gallery,
            })
        }
        "languages" => {
            let langs = tmdb.languages().await?;
            json!(langs
                .iter()
                .map(|l| format!("{} - {}", l.iso_639_1.to_uppercase(), l.english_name))
                .collect::<Vec<_>>())
        }
        _ => anyhow::bail!("usage: tmdb_props (movie|tv|person) <tmdb_id> | languages"),
    };

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
