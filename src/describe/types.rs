use serde::{Deserialize, Serialize};

/// Body of `POST /v1/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub messages: Vec<Message<'a>>,
}

/// A single conversation turn.
#[derive(Debug, Clone, Serialize)]
pub struct Message<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

/// The parts of a Messages API response this tool reads.
///
/// Every field is optional so that a malformed body deserializes and is
/// rejected by [`MessagesResponse::first_text`] instead of by serde.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Option<Vec<ContentBlock>>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type", default)]
    pub block_type: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl MessagesResponse {
    /// Trimmed text of the first content block, if it is a non-empty text block.
    pub fn first_text(&self) -> Option<&str> {
        let block = self.content.as_ref()?.first()?;
        if block.block_type.as_deref().is_some_and(|t| t != "text") {
            return None;
        }
        block
            .text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}
