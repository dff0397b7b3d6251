use super::TextModel;
use crate::error::{GenError, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Blocking client for a local llama.cpp-style server that has the model artifact loaded.
pub struct LlamaServer {
    client: Client,
    endpoint: String,
    temperature: f32,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    n_predict: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    content: String,
}

impl LlamaServer {
    pub fn new(endpoint: &str, temperature: f32, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| GenError::inference(format!("could not build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            temperature,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// True once the server answers its health probe with a success status.
    pub fn is_ready(&self) -> bool {
        let url = format!("{}/health", self.endpoint);
        matches!(self.client.get(url).send(), Ok(resp) if resp.status().is_success())
    }
}

impl TextModel for LlamaServer {
    fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let url = format!("{}/completion", self.endpoint);
        let request = CompletionRequest {
            prompt,
            n_predict: max_tokens,
            temperature: self.temperature,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| GenError::inference(format!("model server unreachable at {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenError::inference(format!("model server returned {status}: {body}")));
        }

        let parsed: CompletionResponse = response
            .json()
            .map_err(|e| GenError::inference(format!("malformed completion response: {e}")))?;
        Ok(parsed.content)
    }
}
