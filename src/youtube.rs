//! YouTube Data API client
//!
//! Exchanges the long-lived refresh token for an access token, then runs
//! the resumable upload protocol: one initiation request that yields an
//! upload URL, followed by sequential chunk PUTs with `Content-Range`
//! headers. HTTP 308 means "chunk accepted, send the next one".

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::config::Credentials;
use crate::publish::{Upload, VideoDestination};

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const UPLOAD_URL: &str = "https://www.googleapis.com/upload/youtube/v3/videos";

/// Upload chunk size. Google requires a multiple of 256 KiB.
const CHUNK_SIZE: usize = 8 * 1024 * 1024;

pub struct YouTubeClient {
    http: Client,
    client_id: String,
    client_secret: String,
    refresh_token: String,
    category_id: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct VideoResource {
    id: String,
}

impl YouTubeClient {
    pub fn new(credentials: &Credentials, category_id: String) -> Result<Self> {
        // Redirects stay unfollowed so 308 chunk acknowledgements reach the
        // upload loop instead of reqwest's redirect handling.
        let http = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            client_id: credentials.youtube_client_id.clone(),
            client_secret: credentials.youtube_client_secret.clone(),
            refresh_token: credentials.youtube_refresh_token.clone(),
            category_id,
        })
    }

    /// Trade the refresh token for a short-lived access token.
    fn access_token(&self) -> Result<String> {
        let token: TokenResponse = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", self.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .context("YouTube token refresh request failed")?
            .error_for_status()
            .context("YouTube rejected the refresh token")?
            .json()
            .context("Failed to parse YouTube token response")?;
        Ok(token.access_token)
    }

    /// Start a resumable upload session and return its upload URL.
    fn initiate_upload(&self, token: &str, upload: &Upload, file_len: u64) -> Result<String> {
        let body = json!({
            "snippet": {
                "title": upload.title,
                "description": upload.description,
                "tags": upload.tags,
                "categoryId": self.category_id,
            },
            "status": {
                "privacyStatus": upload.visibility,
            },
        });

        let response = self
            .http
            .post(format!(
                "{}?uploadType=resumable&part=snippet,status",
                UPLOAD_URL
            ))
            .bearer_auth(token)
            .header("X-Upload-Content-Length", file_len)
            .header("X-Upload-Content-Type", "video/mp4")
            .json(&body)
            .send()
            .context("Upload initiation request failed")?
            .error_for_status()
            .context("YouTube rejected the upload initiation")?;

        match response.headers().get("Location") {
            Some(location) => Ok(location
                .to_str()
                .context("Upload URL is not valid UTF-8")?
                .to_string()),
            None => bail!("Upload initiation response carried no upload URL"),
        }
    }
}

impl VideoDestination for YouTubeClient {
    fn upload(
        &self,
        path: &Path,
        upload: &Upload,
        progress: &mut dyn FnMut(f64),
    ) -> Result<String> {
        let total = path
            .metadata()
            .with_context(|| format!("Failed to stat upload file: {:?}", path))?
            .len();
        if total == 0 {
            bail!("Upload source file is empty: {:?}", path);
        }

        let token = self.access_token()?;
        let session_url = self.initiate_upload(&token, upload, total)?;

        let mut file =
            File::open(path).with_context(|| format!("Failed to open upload file: {:?}", path))?;
        let mut buffer = vec![0u8; CHUNK_SIZE];
        let mut offset: u64 = 0;

        loop {
            let read = file.read(&mut buffer).context("Failed to read upload chunk")?;
            if read == 0 {
                bail!("Upload file ended before YouTube confirmed completion");
            }

            let end = offset + read as u64 - 1;
            let response = self
                .http
                .put(&session_url)
                .bearer_auth(&token)
                .header("Content-Length", read)
                .header(
                    "Content-Range",
                    format!("bytes {}-{}/{}", offset, end, total),
                )
                .body(buffer[..read].to_vec())
                .send()
                .with_context(|| format!("Chunk upload failed at offset {}", offset))?;

            offset = end + 1;
            progress(offset as f64 / total as f64);

            match response.status() {
                // 308 Resume Incomplete: keep sending chunks.
                StatusCode::PERMANENT_REDIRECT => continue,
                status if status.is_success() => {
                    let video: VideoResource = response
                        .json()
                        .context("Failed to parse upload completion response")?;
                    return Ok(video.id);
                }
                status => bail!(
                    "YouTube upload failed at offset {} with status {}",
                    offset,
                    status
                ),
            }
        }
    }
}
