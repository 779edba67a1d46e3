//! Wire types for the Gemini `generateContent` API (v1beta).
//!
//! Request parts are camelCase JSON; inline binary payloads travel
//! base64-encoded under `inlineData`. Responses carry candidates whose
//! content parts hold the generated text.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use helios_types::provider::{Content, Part};

#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiSystemInstruction>,
}

#[derive(Debug, Serialize)]
pub struct GeminiSystemInstruction {
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
pub struct GeminiContent {
    pub role: String,
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GeminiPart {
    Text {
        text: String,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
}

#[derive(Debug, Serialize)]
pub struct GeminiInlineData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Base64-encoded payload.
    pub data: String,
}

impl GeminiRequest {
    /// Build a request from assembled domain content blocks.
    pub fn from_contents(contents: &[Content], system_instruction: Option<&str>) -> Self {
        Self {
            contents: contents.iter().map(GeminiContent::from_content).collect(),
            system_instruction: system_instruction.map(|text| GeminiSystemInstruction {
                parts: vec![GeminiPart::Text {
                    text: text.to_string(),
                }],
            }),
        }
    }

    /// Build a single-prompt request (used for title synthesis).
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart::Text {
                    text: prompt.to_string(),
                }],
            }],
            system_instruction: None,
        }
    }
}

impl GeminiContent {
    fn from_content(content: &Content) -> Self {
        Self {
            role: content.role().to_string(),
            parts: content.parts().iter().map(GeminiPart::from_part).collect(),
        }
    }
}

impl GeminiPart {
    fn from_part(part: &Part) -> Self {
        match part {
            Part::Text(text) => GeminiPart::Text { text: text.clone() },
            Part::InlineData { mime_type, data } => GeminiPart::Inline {
                inline_data: GeminiInlineData {
                    mime_type: mime_type.clone(),
                    data: BASE64.encode(data),
                },
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case_inline_data() {
        let contents = vec![Content::User(vec![
            Part::Text("more".to_string()),
            Part::InlineData {
                mime_type: "image/png".to_string(),
                data: b"\x89PNG".to_vec(),
            },
        ])];
        let request = GeminiRequest::from_contents(&contents, Some("be helpful"));
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "more");
        assert_eq!(
            json["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/png"
        );
        assert_eq!(
            json["contents"][0]["parts"][1]["inlineData"]["data"],
            BASE64.encode(b"\x89PNG")
        );
        assert_eq!(
            json["systemInstruction"]["parts"][0]["text"],
            "be helpful"
        );
    }

    #[test]
    fn test_request_without_system_instruction_omits_field() {
        let request = GeminiRequest::from_prompt("title this");
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("systemInstruction").is_none());
        assert_eq!(json["contents"][0]["parts"][0]["text"], "title this");
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "Hi"}, {"text": " there!"}]
                }
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text(), "Hi there!");
    }

    #[test]
    fn test_response_without_candidates_is_empty() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.text(), "");
    }
}
