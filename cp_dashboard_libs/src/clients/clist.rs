use crate::{
    api::ToQuery,
    cache::ResponseCache,
    clients::get_json,
    contests::{ClistQuery, ContestCacheKey},
    error::{FetchError, Result},
    models::ContestMeta,
    query::ContestQuery,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::{env, time::Duration};

/// One page of the CLIST `contest` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ClistContestPage {
    pub meta: Option<ContestMeta>,
    pub objects: Vec<ClistContestJson>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClistContestJson {
    pub id: u64,
    pub event: String,
    pub href: String,
    pub resource: Option<ClistResource>,
    pub host: String,
    pub start: String,
    pub end: String,
    pub duration: i64,
}

/// CLIST sends the resource either as its name or as a nested object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClistResource {
    Name(String),
    Object { name: String },
}

impl ClistResource {
    pub fn name(&self) -> &str {
        match self {
            ClistResource::Name(name) => name,
            ClistResource::Object { name } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClistCredentials {
    pub username: String,
    pub api_key: String,
}

impl ClistCredentials {
    pub fn from_env() -> Result<Self> {
        let read = |key: &str| -> Result<String> {
            env::var(key)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .ok_or(FetchError::Configuration(format!("{} must be set", key)))
        };

        Ok(Self {
            username: read("CLIST_USERNAME")?,
            api_key: read("CLIST_API_KEY")?,
        })
    }
}

/// Supplies pages of the contest listing.
#[async_trait]
pub trait ContestSource {
    async fn fetch_contests(
        &self,
        query: &ContestQuery,
        now: DateTime<Utc>,
    ) -> Result<ClistContestPage>;
}

pub struct ClistClient {
    base_url: String,
    client: Client,
    credentials: Option<ClistCredentials>,
    cache: ResponseCache<ContestCacheKey, ClistContestPage>,
}

impl ClistClient {
    /// Without credentials every request fails with a configuration error.
    pub fn new(
        base_url: &str,
        client: Client,
        credentials: Option<ClistCredentials>,
        ttl: Duration,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            credentials,
            cache: ResponseCache::new(ttl),
        }
    }

    async fn request(
        &self,
        credentials: &ClistCredentials,
        query: &ContestQuery,
        now: DateTime<Utc>,
    ) -> Result<ClistContestPage> {
        let url = format!("{}/contest/", self.base_url);
        let mut params = ClistQuery { query, now }.to_query();
        params.push((String::from("username"), credentials.username.clone()));
        params.push((String::from("api_key"), credentials.api_key.clone()));

        tracing::info!("Attempting to get {} contests from CLIST...", query.window());
        let page: ClistContestPage = get_json(self.client.get(url).query(&params)).await?;
        tracing::info!("{} contests collected.", page.objects.len());

        Ok(page)
    }
}

#[async_trait]
impl ContestSource for ClistClient {
    async fn fetch_contests(
        &self,
        query: &ContestQuery,
        now: DateTime<Utc>,
    ) -> Result<ClistContestPage> {
        let credentials = self.credentials.as_ref().ok_or(FetchError::Configuration(
            String::from("CLIST API credentials are not configured"),
        ))?;

        self.cache
            .get_or_try_fetch(ContestCacheKey::from(query), || {
                self.request(credentials, query, now)
            })
            .await
    }
}
