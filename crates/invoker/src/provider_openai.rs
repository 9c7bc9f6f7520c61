use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::provider::{ChatProvider, Completion, CompletionRequest, InvokeError, ProviderInfo, Usage};

/// Any endpoint speaking the OpenAI chat-completions dialect
/// (Fireworks, LM Studio, vLLM, ...).
pub struct OpenAiCompatProvider {
    url: String,
    api_key: Option<String>,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    pub fn new(
        url: String,
        api_key: Option<String>,
        model: String,
        timeout: Duration,
    ) -> Result<Self, InvokeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InvokeError::Transport(e.to_string()))?;
        Ok(Self { url, api_key, model, timeout, client })
    }

    fn map_send_error(&self, e: reqwest::Error) -> InvokeError {
        if e.is_timeout() {
            InvokeError::Timeout(self.timeout.as_secs())
        } else {
            InvokeError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatProvider {
    async fn complete(&self, req: &CompletionRequest) -> Result<Completion, InvokeError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": req.system_prompt},
                {"role": "user", "content": req.user_prompt}
            ],
            "max_tokens": req.max_tokens,
            "temperature": req.temperature
        });

        let mut call = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            call = call.bearer_auth(key);
        }

        debug!(model = %self.model, max_tokens = req.max_tokens, "calling model");
        let resp = call.send().await.map_err(|e| self.map_send_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "model call failed");
            return Err(InvokeError::Status { status: status.as_u16(), body });
        }

        let json: Value = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                InvokeError::Timeout(self.timeout.as_secs())
            } else {
                InvokeError::MalformedResponse(e.to_string())
            }
        })?;
        parse_completion(json)
    }

    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "openai-compatible".to_string(),
            base_url: self.url.clone(),
            model: self.model.clone(),
        }
    }
}

/// Pull `choices[0].message.content` and the usage counters out of a
/// chat-completions response. Missing counters stay `None`.
pub fn parse_completion(json: Value) -> Result<Completion, InvokeError> {
    let content = json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| InvokeError::MalformedResponse("missing choices[0].message.content".into()))?
        .to_string();

    let usage = &json["usage"];
    let usage = Usage {
        prompt_tokens: usage["prompt_tokens"].as_u64(),
        completion_tokens: usage["completion_tokens"].as_u64(),
        total_tokens: usage["total_tokens"].as_u64(),
    };

    Ok(Completion { content, usage, raw: json })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_content_and_usage() {
        let c = parse_completion(json!({
            "choices": [{"message": {"role": "assistant", "content": "1. Pack bags"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16}
        }))
        .unwrap();
        assert_eq!(c.content, "1. Pack bags");
        assert_eq!(c.usage.total_tokens, Some(16));
    }

    #[test]
    fn missing_usage_is_none_not_zero() {
        let c = parse_completion(json!({"choices": [{"message": {"content": ""}}]})).unwrap();
        assert_eq!(c.usage, Usage::default());
        assert_eq!(c.content, "");
    }

    #[test]
    fn missing_content_is_malformed() {
        let err = parse_completion(json!({"choices": []})).unwrap_err();
        assert!(matches!(err, InvokeError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let p = OpenAiCompatProvider::new(
            "http://127.0.0.1:9/v1/chat/completions".into(),
            None,
            "m".into(),
            Duration::from_secs(2),
        )
        .unwrap();
        let req = CompletionRequest {
            system_prompt: "s".into(),
            user_prompt: "u".into(),
            max_tokens: 1000,
            temperature: 0.5,
        };
        let err = p.complete(&req).await.unwrap_err();
        assert!(err.is_retryable());
    }
}
