//! Twitch Helix API client
//!
//! Thin blocking adapter over the listing endpoints the pipeline needs:
//! app-access-token grant, user lookup, live status, and the archive video
//! listing with cursor pagination.

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::Credentials;
use crate::discovery::{VodPage, VodSource};
use crate::vod::Vod;

const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
const HELIX_URL: &str = "https://api.twitch.tv/helix";

pub struct TwitchClient {
    http: Client,
    client_id: String,
    token: String,
    user_id: String,
    page_size: u32,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct UsersResponse {
    data: Vec<HelixUser>,
}

#[derive(Deserialize)]
struct HelixUser {
    id: String,
}

#[derive(Deserialize)]
struct StreamsResponse {
    data: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct VideosResponse {
    data: Vec<HelixVideo>,
    #[serde(default)]
    pagination: Pagination,
}

#[derive(Deserialize, Default)]
struct Pagination {
    cursor: Option<String>,
}

#[derive(Deserialize)]
struct HelixVideo {
    id: String,
    title: String,
    created_at: Option<String>,
    user_name: Option<String>,
}

impl From<HelixVideo> for Vod {
    fn from(video: HelixVideo) -> Self {
        Vod {
            id: video.id,
            title: video.title,
            created_at: video.created_at,
            owner: video.user_name,
        }
    }
}

impl TwitchClient {
    /// Authenticate with the client-credentials grant and resolve the
    /// channel login to a user id.
    pub fn connect(credentials: &Credentials, channel: &str, page_size: u32) -> Result<Self> {
        let http = Client::new();

        let token: TokenResponse = http
            .post(TOKEN_URL)
            .form(&[
                ("client_id", credentials.twitch_client_id.as_str()),
                ("client_secret", credentials.twitch_client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .context("Twitch token request failed")?
            .error_for_status()
            .context("Twitch rejected the token request")?
            .json()
            .context("Failed to parse Twitch token response")?;

        let mut client = Self {
            http,
            client_id: credentials.twitch_client_id.clone(),
            token: token.access_token,
            user_id: String::new(),
            page_size,
        };
        client.user_id = client.lookup_user_id(channel)?;
        Ok(client)
    }

    fn lookup_user_id(&self, channel: &str) -> Result<String> {
        let users: UsersResponse = self
            .get(&format!("{}/users?login={}", HELIX_URL, channel))
            .with_context(|| format!("Failed to look up channel '{}'", channel))?;
        match users.data.into_iter().next() {
            Some(user) => Ok(user.id),
            None => bail!("Channel '{}' does not exist", channel),
        }
    }

    fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.http
            .get(url)
            .header("Client-ID", &self.client_id)
            .bearer_auth(&self.token)
            .send()
            .with_context(|| format!("Request to {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Twitch API error for {}", url))?
            .json()
            .with_context(|| format!("Failed to parse response from {}", url))
    }

    /// Authoritative metadata for one VOD. An empty response is an error:
    /// the VOD either never existed or has expired.
    pub fn vod_by_id(&self, id: &str) -> Result<Vod> {
        let videos: VideosResponse = self.get(&format!("{}/videos?id={}", HELIX_URL, id))?;
        match videos.data.into_iter().next() {
            Some(video) => Ok(video.into()),
            None => bail!("Twitch returned no metadata for VOD {}", id),
        }
    }
}

impl VodSource for TwitchClient {
    fn list_vods(&self, cursor: Option<&str>) -> Result<VodPage> {
        let mut url = format!(
            "{}/videos?user_id={}&type=archive&first={}",
            HELIX_URL, self.user_id, self.page_size
        );
        if let Some(cursor) = cursor {
            url.push_str(&format!("&after={}", cursor));
        }

        let videos: VideosResponse = self.get(&url)?;
        Ok(VodPage {
            vods: videos.data.into_iter().map(Vod::from).collect(),
            cursor: videos.pagination.cursor,
        })
    }

    fn is_live(&self) -> Result<bool> {
        let streams: StreamsResponse =
            self.get(&format!("{}/streams?user_id={}", HELIX_URL, self.user_id))?;
        Ok(!streams.data.is_empty())
    }
}
