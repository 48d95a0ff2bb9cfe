use anyhow::Context;
use reqwest::{StatusCode, Url};
use tracing::{debug, info};

/// Client for the local synthesis service. The service answers a GET with the
/// whole utterance as one MP3 body.
pub struct TtsClient {
    client: reqwest::Client,
    endpoint: Url,
    thread: u32,
    shard_length: u32,
}

impl TtsClient {
    pub fn new(endpoint: &str, thread: u32, shard_length: u32) -> anyhow::Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("invalid TTS endpoint: {}", endpoint))?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            thread,
            shard_length,
        })
    }

    pub fn request_url(&self, text: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("thread", &self.thread.to_string())
            .append_pair("shardLength", &self.shard_length.to_string())
            .append_pair("text", text);
        url
    }

    pub async fn synthesize(&self, text: &str) -> anyhow::Result<Vec<u8>> {
        let url = self.request_url(text);
        info!("Requesting speech for {} chars from {}", text.chars().count(), self.endpoint);
        debug!("Request URL: {}", url);

        let res = self
            .client
            .get(url)
            .send()
            .await
            .context("error making GET request")?;

        let status = res.status();
        if status != StatusCode::OK {
            anyhow::bail!("received non-OK HTTP status: {}", status);
        }

        let body = res.bytes().await.context("error reading response body")?;
        info!("Received {} bytes of MP3 audio", body.len());
        Ok(body.to_vec())
    }
}
