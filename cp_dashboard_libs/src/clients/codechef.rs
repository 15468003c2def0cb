use crate::{
    clients::{endpoint, get_json, ProfileFetcher},
    error::{FetchError, Result},
    models::{profile::CodeChefProfile, UserProfile},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

#[derive(Debug, Deserialize)]
struct CodeChefStatusJson {
    success: bool,
    status: u16,
}

/// Decode and check a CodeChef profile body.
///
/// The API reports failures inside a 2xx body through `success` and `status`, and a failed body
/// carries none of the profile fields, so the flags are read first.
pub(crate) fn decode_profile(raw: Value, handle: &str) -> Result<CodeChefProfile> {
    let flags: CodeChefStatusJson = serde_json::from_value(raw.clone())?;
    if !flags.success {
        if flags.status == 404 {
            return Err(FetchError::NotFound(format!(
                "CodeChef user {} not found",
                handle
            )));
        }
        return Err(FetchError::UpstreamUnavailable {
            status: Some(flags.status),
            message: format!("CodeChef API reported an issue: Status {}", flags.status),
        });
    }

    let profile: CodeChefProfile = serde_json::from_value(raw)?;
    profile.validate()?;
    Ok(profile)
}

pub struct CodeChefClient {
    base_url: String,
    client: Client,
}

impl CodeChefClient {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl ProfileFetcher for CodeChefClient {
    async fn fetch_profile(&self, username: &str) -> Result<UserProfile> {
        let url = endpoint(&self.base_url, &[username])?;
        let raw: Value = get_json(self.client.get(url)).await?;

        Ok(UserProfile::CodeChef(decode_profile(raw, username)?))
    }
}
