use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";
pub const DEFAULT_TMDB_LANGUAGE: &str = "pt-BR";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3147";

#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub tmdb_api_key: String,
    pub tmdb_language: String,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let tmdb_api_key = get("TMDB_API_KEY").context("TMDB_API_KEY not set")?;
        let backend_url = get("BACKEND_URL")
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let tmdb_language =
            get("TMDB_LANGUAGE").unwrap_or_else(|| DEFAULT_TMDB_LANGUAGE.to_string());
        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse()
            .with_context(|| format!("BIND_ADDR is not a socket address: {}", bind_raw))?;

        Ok(Self {
            backend_url,
            tmdb_api_key,
            tmdb_language,
            bind_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let cfg = Config::from_lookup(lookup(&[("TMDB_API_KEY", "abc")])).unwrap();
        assert_eq!(cfg.tmdb_api_key, "abc");
        assert_eq!(cfg.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(cfg.tmdb_language, "pt-BR");
        assert_eq!(cfg.bind_addr.port(), 3147);
    }

    #[test]
    fn missing_api_key_is_an_error() {
        let err = Config::from_lookup(lookup(&[("TMDB_API_KEY", "  ")])).unwrap_err();
        assert!(err.to_string().contains("TMDB_API_KEY"));
    }

    #[test]
    fn backend_url_trailing_slash_is_dropped() {
        let cfg = Config::from_lookup(lookup(&[
            ("TMDB_API_KEY", "abc"),
            ("BACKEND_URL", "http://catalog:9000/"),
            ("BIND_ADDR", "127.0.0.1:8000"),
        ]))
        .unwrap();
        assert_eq!(cfg.backend_url, "http://catalog:9000");
        assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:8000");
    }

    #[test]
    fn bad_bind_addr_is_rejected() {
        let res = Config::from_lookup(lookup(&[("TMDB_API_KEY", "abc"), ("BIND_ADDR", "nope")]));
        assert!(res.is_err());
    }
}
