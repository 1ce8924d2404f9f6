//! OpenAI-compatible chat-completions documenter.
//!
//! POST {base_url}/chat/completions with a fixed system prompt and the
//! excerpt as the user message. The same client writes function doc
//! comments.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::EndpointDocumenter;
use crate::config::DocumenterConfig;
use crate::docs::{FunctionDocRecord, FunctionDocumenter};
use crate::error::{Error, Result};
use crate::grammar::LanguageId;

const SYSTEM_PROMPT: &str = r#"You will be given a block of JavaScript or TypeScript code, delimited by three exclamation marks, containing definitions for API endpoints using the Express API framework.

Your task is to generate API documentation for the provided Express REST API endpoint.

If the provided code does not contain enough information to generate API documentation, respond with "none".

Otherwise, use the following template to format your response:

## {description of the API endpoint in 3 words or less}

```
{HTTP Method} {Path}
```

{high-level description of what the API endpoint does}

### Path Parameters

**{name}** ({type}) *{optional or required}* - {description}

### Example Request

```
{example request written in JavaScript}
```

### Example Response

```
{example response}
```

### Response Codes

**{response code}**: {explanation of when this response code will be returned}"#;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions client.
pub struct OpenAiDocumenter {
    http: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl OpenAiDocumenter {
    /// Build a client from config, reading the key from the configured
    /// environment variable.
    pub fn from_config(config: &DocumenterConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            Error::Documenter(format!(
                "environment variable {} is not set",
                config.api_key_env
            ))
        })?;
        Self::new(config, api_key)
    }

    pub fn new(config: &DocumenterConfig, api_key: String) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("docsmith/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
        })
    }

    fn request<'a>(&'a self, excerpt: &str) -> ChatRequest<'a> {
        self.chat(SYSTEM_PROMPT.to_string(), format!("!!!\n{excerpt}"))
    }

    fn function_request<'a>(
        &'a self,
        language: LanguageId,
        record: &FunctionDocRecord,
    ) -> ChatRequest<'a> {
        let language = language.name();
        let mut prompt = format!(
            "Write a {language} doc comment for the following function.\n\n===\n{}\n===",
            record.code
        );
        if let Some(existing) = &record.existing_comment {
            prompt.push_str(&format!(
                "\n\nMerge it with the existing doc comment below, keeping its important \
                 information. Where they conflict, prefer the new documentation.\n\n===\n{existing}\n==="
            ));
        }
        self.chat(
            format!("You must respond with only a valid {language} doc comment."),
            prompt,
        )
    }

    fn chat<'a>(&'a self, system: String, user: String) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            temperature: 0.0,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        }
    }

    async fn send(&self, request: &ChatRequest<'_>) -> Result<String> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Documenter(format!("HTTP {}: {}", status.as_u16(), body.trim())));
        }

        let reply: ChatResponse = response.json().await?;
        first_content(reply)
    }
}

impl EndpointDocumenter for OpenAiDocumenter {
    async fn document(&self, excerpt: &str) -> Result<String> {
        self.send(&self.request(excerpt)).await
    }
}

impl FunctionDocumenter for OpenAiDocumenter {
    async fn document_function(
        &self,
        language: LanguageId,
        record: &FunctionDocRecord,
    ) -> Result<String> {
        self.send(&self.function_request(language, record)).await
    }
}

fn first_content(reply: ChatResponse) -> Result<String> {
    reply
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| Error::Documenter("reply has no content".to_string()))
}
