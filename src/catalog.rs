// 📚 Entity Catalog - fetched once at startup, read-only afterwards

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::entities::Entity;
use crate::error::FetchError;

/// Default remote endpoint returning the full character list
pub const DEFAULT_API_URL: &str = "https://hp-api.onrender.com/api/characters";

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entities: Vec<Entity>,
    fetched_at: Option<DateTime<Utc>>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entities(entities: Vec<Entity>) -> Self {
        Self {
            entities,
            fetched_at: Some(Utc::now()),
        }
    }

    /// Issue the single GET and parse the body. No retry, no timeout of our own.
    pub async fn load(client: &reqwest::Client, url: &str) -> Result<Vec<Entity>, FetchError> {
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        Self::parse(&body)
    }

    /// Parse a response body as a JSON array of characters
    pub fn parse(body: &str) -> Result<Vec<Entity>, FetchError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Load the catalog, degrading to an empty one on any failure
    pub async fn load_or_empty(client: &reqwest::Client, url: &str) -> Catalog {
        match Self::load(client, url).await {
            Ok(entities) => {
                info!(count = entities.len(), url, "catalog loaded");
                Self::from_entities(entities)
            }
            Err(e) => {
                error!(error = %e, url, "error fetching characters");
                Self::empty()
            }
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// First `n` records (fewer if the catalog is smaller)
    pub fn top(&self, n: usize) -> &[Entity] {
        &self.entities[..n.min(self.entities.len())]
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }
}
