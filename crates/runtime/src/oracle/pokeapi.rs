//! PokéAPI HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use roster_core::{Entity, EntityId};
use serde::Deserialize;

use super::{EntityOracle, OracleError};

/// Upper bound used when the species count cannot be fetched.
pub const FALLBACK_UPPER_BOUND: u32 = 1025;

/// Connection settings for [`PokeApiOracle`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OracleConfig {
    /// API root, e.g. `https://pokeapi.co/api/v2/`.
    pub base_url: String,
    /// Per-request timeout. A timed-out request counts as a connection failure.
    pub timeout: Duration,
    pub fallback_upper_bound: u32,
}

impl OracleConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://pokeapi.co/api/v2/";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
            fallback_upper_bound: FALLBACK_UPPER_BOUND,
        }
    }
}

/// `GET pokemon/{id}/` body; only the first form's name is used.
#[derive(Debug, Deserialize)]
struct PokemonResponse {
    #[serde(default)]
    forms: Vec<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
}

/// `GET pokemon-species/?limit=1` body.
#[derive(Debug, Deserialize)]
struct SpeciesPage {
    count: u32,
}

/// [`EntityOracle`] backed by the public PokéAPI.
pub struct PokeApiOracle {
    /// API root, always ending in `/`
    base_url: String,

    /// HTTP client (carries the request timeout)
    http_client: reqwest::Client,

    fallback_upper_bound: u32,
}

impl PokeApiOracle {
    pub fn new(config: OracleConfig) -> Result<Self, OracleError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OracleError::Connection(format!("failed to build HTTP client: {e}")))?;

        let mut base_url = config.base_url;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            base_url,
            http_client,
            fallback_upper_bound: config.fallback_upper_bound,
        })
    }

    fn entity_url(&self, id: EntityId) -> String {
        format!("{}pokemon/{}/", self.base_url, id.get())
    }

    fn species_url(&self) -> String {
        format!("{}pokemon-species/?limit=1", self.base_url)
    }

    async fn get_text(&self, url: &str) -> Result<(reqwest::StatusCode, String), OracleError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| OracleError::Connection(describe(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OracleError::Connection(describe(&e)))?;

        Ok((status, body))
    }

    async fn species_count(&self) -> Result<u32, OracleError> {
        let (status, body) = self.get_text(&self.species_url()).await?;
        if !status.is_success() {
            return Err(OracleError::Connection(format!(
                "species count returned status {status}"
            )));
        }
        decode_species_count(&body)
    }
}

#[async_trait]
impl EntityOracle for PokeApiOracle {
    async fn fetch_entity(&self, id: EntityId, is_rare: bool) -> Result<Entity, OracleError> {
        tracing::debug!("Fetching entity {} from PokéAPI", id);

        let (status, body) = self.get_text(&self.entity_url(id)).await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(OracleError::NotFound(id));
        }
        if !status.is_success() {
            return Err(OracleError::Connection(format!(
                "lookup of entity {id} returned status {status}"
            )));
        }

        decode_entity(id, is_rare, &body)
    }

    async fn fetch_upper_bound(&self) -> u32 {
        match self.species_count().await {
            Ok(count) if count > 0 => count,
            Ok(_) => {
                tracing::warn!(
                    "PokéAPI reported zero species, using fallback bound {}",
                    self.fallback_upper_bound
                );
                self.fallback_upper_bound
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to fetch species count: {}. Using fallback bound {}",
                    e,
                    self.fallback_upper_bound
                );
                self.fallback_upper_bound
            }
        }
    }

    async fn probe(&self) -> bool {
        match self.get_text(&self.base_url).await {
            Ok((status, _)) => status.is_success(),
            Err(e) => {
                tracing::warn!("PokéAPI probe failed: {}", e);
                false
            }
        }
    }
}

fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {error}")
    } else {
        error.to_string()
    }
}

fn decode_entity(id: EntityId, is_rare: bool, body: &str) -> Result<Entity, OracleError> {
    let response: PokemonResponse = serde_json::from_str(body)
        .map_err(|e| OracleError::Connection(format!("malformed entity {id} response: {e}")))?;

    let name = response
        .forms
        .first()
        .map(|form| form.name.as_str())
        .unwrap_or_default();

    Ok(Entity::new(id, name, is_rare))
}

fn decode_species_count(body: &str) -> Result<u32, OracleError> {
    serde_json::from_str::<SpeciesPage>(body)
        .map(|page| page.count)
        .map_err(|e| OracleError::Connection(format!("malformed species count response: {e}")))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    const PIKACHU: &str = r#"{"id": 25, "forms": [{"name": "pikachu"}]}"#;

    /// Serve canned `(path, status, body)` replies on a local port, waiting
    /// `delay` before each reply. Unlisted paths get a 404.
    ///
    /// Returns the API root to hand to [`OracleConfig::base_url`].
    async fn stub_upstream(
        routes: Vec<(&'static str, u16, &'static str)>,
        delay: Duration,
    ) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let routes = routes.clone();
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&chunk[..n]),
                        }
                    }

                    let request = String::from_utf8_lossy(&request);
                    let path = request.split_whitespace().nth(1).unwrap_or("/");
                    let (status, body) = routes
                        .iter()
                        .find(|(route, _, _)| *route == path)
                        .map(|(_, status, body)| (*status, *body))
                        .unwrap_or((404, r#"{"detail": "Not found."}"#));
                    let reason = match status {
                        200 => "OK",
                        404 => "Not Found",
                        _ => "Internal Server Error",
                    };

                    tokio::time::sleep(delay).await;
                    let response = format!(
                        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{addr}/api/v2/")
    }

    fn oracle_at(base_url: String, timeout: Duration) -> PokeApiOracle {
        PokeApiOracle::new(OracleConfig {
            base_url,
            timeout,
            ..OracleConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn decodes_first_form_name() {
        let body = r#"{"id": 25, "forms": [{"name": "pikachu", "url": "x"}, {"name": "other"}]}"#;
        let entity = decode_entity(EntityId(25), true, body).unwrap();
        assert_eq!(entity, Entity::new(EntityId(25), "pikachu", true));
    }

    #[test]
    fn missing_forms_yield_unknown_name() {
        let entity = decode_entity(EntityId(3), false, r#"{"id": 3}"#).unwrap();
        assert_eq!(entity.name, Entity::UNKNOWN_NAME);
    }

    #[test]
    fn malformed_body_is_a_connection_failure() {
        assert!(matches!(
            decode_entity(EntityId(1), false, "<html>"),
            Err(OracleError::Connection(_))
        ));
        assert!(matches!(
            decode_species_count(r#"{"results": []}"#),
            Err(OracleError::Connection(_))
        ));
    }

    #[test]
    fn decodes_species_count() {
        let body = r#"{"count": 1025, "next": "...", "results": [{"name": "bulbasaur"}]}"#;
        assert_eq!(decode_species_count(body).unwrap(), 1025);
    }

    #[test]
    fn urls_are_built_from_normalized_base() {
        let oracle = PokeApiOracle::new(OracleConfig {
            base_url: "http://localhost:9000/api/v2".to_string(),
            ..OracleConfig::default()
        })
        .unwrap();

        assert_eq!(
            oracle.entity_url(EntityId(7)),
            "http://localhost:9000/api/v2/pokemon/7/"
        );
        assert_eq!(
            oracle.species_url(),
            "http://localhost:9000/api/v2/pokemon-species/?limit=1"
        );
    }

    #[tokio::test]
    async fn unreachable_upstream_degrades_gracefully() {
        // Port 9 (discard) on localhost is closed in test environments.
        let oracle = PokeApiOracle::new(OracleConfig {
            base_url: "http://127.0.0.1:9/".to_string(),
            timeout: Duration::from_millis(500),
            fallback_upper_bound: 151,
        })
        .unwrap();

        assert_eq!(oracle.fetch_upper_bound().await, 151);
        assert!(matches!(
            oracle.fetch_entity(EntityId(1), false).await,
            Err(OracleError::Connection(_))
        ));
        assert!(!oracle.probe().await);
    }

    #[tokio::test]
    async fn fetches_and_decodes_an_entity() {
        let base = stub_upstream(vec![("/api/v2/pokemon/25/", 200, PIKACHU)], Duration::ZERO).await;
        let oracle = oracle_at(base, Duration::from_secs(5));

        let entity = oracle.fetch_entity(EntityId(25), true).await.unwrap();
        assert_eq!(entity, Entity::new(EntityId(25), "pikachu", true));
    }

    #[tokio::test]
    async fn missing_entity_is_not_found() {
        let base = stub_upstream(vec![], Duration::ZERO).await;
        let oracle = oracle_at(base, Duration::from_secs(5));

        assert!(matches!(
            oracle.fetch_entity(EntityId(9999), false).await,
            Err(OracleError::NotFound(EntityId(9999)))
        ));
    }

    #[tokio::test]
    async fn server_error_is_a_connection_failure() {
        let base = stub_upstream(
            vec![("/api/v2/pokemon/25/", 500, "oops")],
            Duration::ZERO,
        )
        .await;
        let oracle = oracle_at(base, Duration::from_secs(5));

        assert!(matches!(
            oracle.fetch_entity(EntityId(25), false).await,
            Err(OracleError::Connection(_))
        ));
    }

    #[tokio::test]
    async fn slow_upstream_times_out_as_connection_failure() {
        let base = stub_upstream(
            vec![("/api/v2/pokemon/25/", 200, PIKACHU)],
            Duration::from_secs(2),
        )
        .await;
        let oracle = oracle_at(base, Duration::from_millis(200));

        match oracle.fetch_entity(EntityId(25), false).await {
            Err(OracleError::Connection(message)) => assert!(message.contains("timed out")),
            other => panic!("expected a timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn species_count_comes_from_upstream() {
        let base = stub_upstream(
            vec![
                ("/api/v2/pokemon-species/?limit=1", 200, r#"{"count": 1302}"#),
                ("/api/v2/", 200, "{}"),
            ],
            Duration::ZERO,
        )
        .await;
        let oracle = oracle_at(base, Duration::from_secs(5));

        assert_eq!(oracle.fetch_upper_bound().await, 1302);
        assert!(oracle.probe().await);
    }

    #[tokio::test]
    async fn failing_species_count_falls_back() {
        let base = stub_upstream(
            vec![("/api/v2/pokemon-species/?limit=1", 500, "oops")],
            Duration::ZERO,
        )
        .await;
        let oracle = oracle_at(base, Duration::from_secs(5));

        assert_eq!(oracle.fetch_upper_bound().await, FALLBACK_UPPER_BOUND);
        assert!(!oracle.probe().await);
    }
}
