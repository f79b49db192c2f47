//! Optional remote chat backend.
//!
//! When configured, the endpoint answers instead of the local knowledge
//! responder. The contract is a single JSON POST:
//!
//! ```text
//! -> {"message": "...", "context": {"currentChapterTitle", "bookTitle", "recentMessages"}}
//! <- {"response": "..."}
//! ```

use crate::domain::ChatMessage;
use crate::error::{BookError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Reader context forwarded with every remote question
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatContext {
    pub current_chapter_title: String,
    pub book_title: String,
    pub recent_messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    context: &'a ChatContext,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    response: String,
}

/// HTTP client for the remote chat endpoint
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteBackend {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| BookError::RemoteBackend(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, endpoint: endpoint.into() })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one question. Any transport error, non-success status or
    /// unexpected body is a [`BookError::RemoteBackend`].
    pub async fn ask(&self, message: &str, context: &ChatContext) -> Result<String> {
        debug!(endpoint = %self.endpoint, "sending question to remote backend");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest { message, context })
            .send()
            .await
            .map_err(|e| BookError::RemoteBackend(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BookError::RemoteBackend(format!("endpoint returned {status}")));
        }

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| BookError::RemoteBackend(format!("invalid response body: {e}")))?;
        Ok(reply.response)
    }
}
