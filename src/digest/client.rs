use crate::digest::config::{FetchVariant, NewsConfig};
use crate::error::NewsError;
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, TimeDelta};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSource {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchParameters {
    pub mode: String,
    pub sources: Vec<SearchSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_citations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_search_results: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub model: String,
    pub stream: bool,
    pub temperature: f64,
    pub max_tokens: u32,
    pub search_parameters: SearchParameters,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: String,
    pub citations: Vec<String>,
}

pub trait SummaryClient {
    fn complete(&self, request: &CompletionRequest) -> Result<Completion>;
}

pub fn build_request(cfg: &NewsConfig, now: DateTime<FixedOffset>) -> CompletionRequest {
    let mut search = SearchParameters {
        mode: cfg.search.mode.clone(),
        sources: cfg
            .search
            .sources
            .iter()
            .map(|kind| SearchSource { kind: kind.clone() })
            .collect(),
        from_date: None,
        to_date: None,
        return_citations: None,
        max_search_results: None,
    };

    if cfg.api.variant == FetchVariant::Rich {
        let lookback = TimeDelta::try_hours(cfg.search.lookback_hours as i64)
            .unwrap_or_else(|| TimeDelta::days(1));
        let from = now.checked_sub_signed(lookback).unwrap_or(now);
        search.from_date = Some(from.format("%Y-%m-%d").to_string());
        search.to_date = Some(now.format("%Y-%m-%d").to_string());
        search.return_citations = Some(true);
        search.max_search_results = Some(cfg.search.max_search_results);
    }

    CompletionRequest {
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: cfg.api.system_prompt.clone(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: cfg.api.user_prompt.clone(),
            },
        ],
        model: cfg.api.model.clone(),
        stream: false,
        temperature: cfg.api.temperature,
        max_tokens: cfg.api.max_tokens,
        search_parameters: search,
    }
}

fn citation_strings(value: Option<&Value>) -> Vec<String> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj.get("url").and_then(Value::as_str).map(str::to_string),
            _ => None,
        })
        .collect()
}

/// Pull the summary text and citations out of a chat-completions body.
pub fn parse_completion(json: &Value) -> Result<Completion> {
    let choices = json
        .get("choices")
        .and_then(Value::as_array)
        .ok_or_else(|| NewsError::MalformedResponse("missing `choices`".to_string()))?;
    let message = choices
        .first()
        .and_then(|c| c.get("message"))
        .ok_or_else(|| NewsError::MalformedResponse("missing `choices[0].message`".to_string()))?;

    let content = match message.get("content") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Array(parts)) => {
            let chunks = parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>();
            if chunks.is_empty() {
                None
            } else {
                Some(chunks.join("\n"))
            }
        }
        _ => None,
    }
    .ok_or_else(|| NewsError::MalformedResponse("missing message content".to_string()))?;

    let mut citations = citation_strings(json.get("citations"));
    if citations.is_empty() {
        citations = citation_strings(message.get("citations"));
    }

    Ok(Completion { content, citations })
}

fn truncate_chars(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        return input.to_string();
    }
    let mut out: String = input.chars().take(max_chars).collect();
    out.push('…');
    out
}

pub struct HttpSummaryClient {
    pub endpoint: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl HttpSummaryClient {
    pub fn from_config(cfg: &NewsConfig, api_key: String) -> Self {
        Self {
            endpoint: cfg.api.endpoint.clone(),
            api_key,
            timeout: Duration::from_secs(cfg.api.timeout_secs),
        }
    }
}

impl SummaryClient for HttpSummaryClient {
    fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        let client = Client::builder().timeout(self.timeout).build()?;
        let response = client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .with_context(|| format!("summary request to {} failed", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(NewsError::ApiStatus {
                status: status.as_u16(),
                body: truncate_chars(body.trim(), MAX_ERROR_BODY_CHARS),
            }
            .into());
        }

        let json: Value = response
            .json()
            .map_err(|err| NewsError::MalformedResponse(format!("body is not JSON: {err}")))?;
        parse_completion(&json)
    }
}
