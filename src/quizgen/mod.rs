//! Quiz generation via an LLM provider.
//!
//! The generator is an explicitly constructed client injected through
//! application state. It owns the prompt, the chat-completions call, and
//! the validation of the reply shape; it never persists anything itself.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::AppError;
use crate::models::QuestionItem;

/// Maximum number of source-text characters embedded in the prompt,
/// to bound cost and latency.
const PROMPT_CONTENT_LIMIT: usize = 2000;

/// Client for the LLM provider's chat-completions API.
#[derive(Clone)]
pub struct QuizGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Expected shape of the model's reply. A missing `questions` key is
/// deliberately treated as an empty quiz rather than an error.
#[derive(Debug, Deserialize)]
struct GeneratedQuestions {
    #[serde(default)]
    questions: Vec<QuestionItem>,
}

impl QuizGenerator {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            model: config.openai_model.clone(),
        }
    }

    /// Generate multiple-choice questions from a block of study text.
    ///
    /// Returns the questions in the order the model produced them.
    /// Transport failures map to `GenerationUnavailable`, unparseable
    /// replies to `GenerationFormat`. No retries; recovery is left to
    /// the user re-requesting.
    pub async fn generate(&self, topic_text: &str) -> Result<Vec<QuestionItem>, AppError> {
        let excerpt: String = topic_text.chars().take(PROMPT_CONTENT_LIMIT).collect();
        let prompt = build_prompt(&excerpt);

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            response_format: ResponseFormat {
                kind: "json_object".to_string(),
            },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("LLM request failed: {}", e);
                AppError::GenerationUnavailable(format!("Quiz generation unavailable: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("LLM request rejected ({}): {}", status, body);
            return Err(AppError::GenerationUnavailable(format!(
                "Quiz generation unavailable (provider returned {})",
                status
            )));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to decode LLM response envelope: {}", e);
            AppError::GenerationUnavailable(format!("Quiz generation unavailable: {}", e))
        })?;

        let content = completion
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or("{}");

        parse_questions(content)
    }
}

fn build_prompt(excerpt: &str) -> String {
    format!(
        "Generate 3 multiple-choice questions based on the following text.\n\
         Return a JSON object with a key \"questions\" containing an array of objects.\n\
         Each object must have:\n\
         - \"question\": string\n\
         - \"options\": array of 4 strings\n\
         - \"correctAnswer\": string (must be one of the options)\n\
         - \"explanation\": string (brief explanation of why it is correct)\n\
         \n\
         Text:\n\
         {excerpt}"
    )
}

/// Parse and validate the model's reply into question items.
///
/// Strips any markdown code-fence wrapping first. Items that violate the
/// shape invariant (four options, answer among them) are dropped with a
/// warning; their order is otherwise preserved.
pub fn parse_questions(content: &str) -> Result<Vec<QuestionItem>, AppError> {
    let cleaned = strip_code_fences(content);

    let parsed: GeneratedQuestions = serde_json::from_str(cleaned).map_err(|e| {
        tracing::error!("Malformed LLM reply: {}", e);
        AppError::GenerationFormat("AI returned malformed data".to_string())
    })?;

    let questions: Vec<QuestionItem> = parsed
        .questions
        .into_iter()
        .filter(|q| {
            let ok = q.is_well_formed();
            if !ok {
                tracing::warn!("Dropping malformed question: {:?}", q.question);
            }
            ok
        })
        .collect();

    Ok(questions)
}

/// Strip a markdown code fence (``` or ```json) wrapping the payload.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag after the opening fence.
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"{"questions":[{"question":"Q1","options":["a","b","c","d"],"correctAnswer":"b","explanation":"because"}]}"#;

    #[test]
    fn parses_plain_reply() {
        let questions = parse_questions(REPLY).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_answer, "b");
        assert!(questions[0].options.contains(&questions[0].correct_answer));
    }

    #[test]
    fn fenced_reply_parses_identically() {
        let fenced = format!("```json\n{}\n```", REPLY);
        assert_eq!(parse_questions(&fenced).unwrap(), parse_questions(REPLY).unwrap());

        let bare_fence = format!("```\n{}\n```", REPLY);
        assert_eq!(parse_questions(&bare_fence).unwrap(), parse_questions(REPLY).unwrap());
    }

    #[test]
    fn malformed_json_is_a_format_error() {
        let err = parse_questions("not json at all").unwrap_err();
        assert!(matches!(err, AppError::GenerationFormat(_)));
    }

    #[test]
    fn missing_questions_key_is_empty_not_an_error() {
        let questions = parse_questions(r#"{"something":"else"}"#).unwrap();
        assert!(questions.is_empty());
    }

    #[test]
    fn invalid_items_are_dropped_order_preserved() {
        let reply = r#"{"questions":[
            {"question":"ok1","options":["a","b","c","d"],"correctAnswer":"a","explanation":""},
            {"question":"bad","options":["a","b"],"correctAnswer":"a","explanation":""},
            {"question":"ok2","options":["a","b","c","d"],"correctAnswer":"d","explanation":""}
        ]}"#;
        let questions = parse_questions(reply).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question, "ok1");
        assert_eq!(questions[1].question, "ok2");
    }

    #[test]
    fn strip_fences_leaves_plain_text_alone() {
        assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
    }
}
