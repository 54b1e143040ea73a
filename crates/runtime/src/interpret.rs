//! Query interpretation: choose a tool and its parameters for a query.

use gateway::Tool;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::InterpretError;
use crate::llm::{ChatRequest, LlmBackend, Message};
use crate::prompt;

/// Tool name reported when the catalog is empty in simulated mode.
pub const UNKNOWN_TOOL: &str = "unknown";

/// The model's decision for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub tool: String,
    pub parameters: Map<String, Value>,
    pub explanation: String,
}

impl Interpretation {
    /// Deterministic stand-in used when no LLM is configured.
    pub fn simulated(query: &str, tools: &[Tool]) -> Self {
        Self {
            tool: tools
                .first()
                .map_or_else(|| UNKNOWN_TOOL.to_string(), |t| t.name.clone()),
            parameters: Map::new(),
            explanation: format!("Simulated interpretation of query: {query}"),
        }
    }
}

/// Maps free-text queries onto catalog tools.
///
/// Without a backend every query gets [`Interpretation::simulated`].
#[derive(Debug)]
pub struct Interpreter<B> {
    backend: Option<B>,
}

impl<B: LlmBackend> Interpreter<B> {
    pub fn new(backend: Option<B>) -> Self {
        Self { backend }
    }

    /// Interpreter that never calls a model.
    pub fn simulated() -> Self {
        Self { backend: None }
    }

    pub fn is_simulated(&self) -> bool {
        self.backend.is_none()
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    /// Interpret `query` against `tools`.
    ///
    /// The chosen tool is not checked against `tools`.
    pub async fn interpret(
        &self,
        query: &str,
        tools: &[Tool],
    ) -> Result<Interpretation, InterpretError> {
        let Some(backend) = &self.backend else {
            warn!("LLM api key not configured, using simulated interpretation");
            return Ok(Interpretation::simulated(query, tools));
        };

        let system = prompt::render(tools);
        let messages = [Message::user(query)];
        let response = backend
            .chat(ChatRequest {
                messages: &messages,
                system: Some(&system),
            })
            .await?;

        debug!(reply = %response.content, "LLM reply");
        parse_reply(&response.content)
    }
}

/// Parse a model reply into an [`Interpretation`].
///
/// The reply may wrap the JSON object in prose or code fences; everything
/// between the first `{` and the last `}` is taken as the payload.
pub fn parse_reply(content: &str) -> Result<Interpretation, InterpretError> {
    let payload = extract_json(content)
        .ok_or_else(|| InterpretError::Parse("could not find valid JSON in the response".into()))?;

    serde_json::from_str(payload).map_err(|e| InterpretError::Parse(e.to_string()))
}

fn extract_json(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatResponse, LlmError, Usage};
    use gateway::ToolParameter;
    use serde_json::json;
    use std::sync::Mutex;

    /// Backend that replies with fixed text and records the last request.
    #[derive(Default)]
    struct Scripted {
        reply: String,
        seen: Mutex<Option<(String, Vec<Message>)>>,
    }

    impl Scripted {
        fn new(reply: impl Into<String>) -> Self {
            Self {
                reply: reply.into(),
                ..Default::default()
            }
        }
    }

    impl LlmBackend for Scripted {
        async fn chat(&self, request: ChatRequest<'_>) -> Result<ChatResponse, LlmError> {
            *self.seen.lock().unwrap() = Some((
                request.system.unwrap_or_default().to_string(),
                request.messages.to_vec(),
            ));
            Ok(ChatResponse {
                content: self.reply.clone(),
                usage: Usage::default(),
            })
        }
    }

    struct Down;

    impl LlmBackend for Down {
        async fn chat(&self, _request: ChatRequest<'_>) -> Result<ChatResponse, LlmError> {
            Err(LlmError::Api("503 Service Unavailable: overloaded".into()))
        }
    }

    fn catalog() -> Vec<Tool> {
        vec![
            Tool::new("calculator", "Basic arithmetic")
                .with_parameter(ToolParameter::new("operation", "string", "Operation").required())
                .with_parameter(ToolParameter::new("a", "number", "First operand").required())
                .with_parameter(ToolParameter::new("b", "number", "Second operand").required()),
            Tool::new("weather", "Current weather for a city"),
        ]
    }

    #[tokio::test]
    async fn simulated_picks_first_tool() {
        let interpreter = Interpreter::<Down>::simulated();
        assert!(interpreter.is_simulated());
        let tools = catalog();

        for query in ["add 2 and 3", "what's the weather", ""] {
            let first = interpreter.interpret(query, &tools).await.unwrap();
            let again = interpreter.interpret(query, &tools).await.unwrap();
            assert_eq!(first, again);
            assert_eq!(first.tool, "calculator");
            assert!(first.parameters.is_empty());
            assert!(first.explanation.contains(query));
            assert!(!first.explanation.is_empty());
        }
    }

    #[tokio::test]
    async fn simulated_with_empty_catalog_is_unknown() {
        let interpretation = Interpreter::<Down>::simulated()
            .interpret("anything", &[])
            .await
            .unwrap();
        assert_eq!(interpretation.tool, UNKNOWN_TOOL);
    }

    #[tokio::test]
    async fn backend_reply_in_code_fence_is_parsed() {
        let reply = "Sure! ```json\n{\"tool\":\"calculator\",\"parameters\":{\"a\":1,\"b\":2},\"explanation\":\"add\"}\n```";
        let interpreter = Interpreter::new(Some(Scripted::new(reply)));

        let interpretation = interpreter.interpret("add 1 and 2", &catalog()).await.unwrap();
        assert_eq!(interpretation.tool, "calculator");
        assert_eq!(Value::Object(interpretation.parameters), json!({"a": 1, "b": 2}));
        assert_eq!(interpretation.explanation, "add");
    }

    #[tokio::test]
    async fn backend_receives_prompt_and_raw_query() {
        let backend = Scripted::new(r#"{"tool":"weather","parameters":{},"explanation":"x"}"#);
        let interpreter = Interpreter::new(Some(backend));
        assert!(!interpreter.is_simulated());
        interpreter.interpret("weather in Lisbon", &catalog()).await.unwrap();

        let backend = interpreter.backend.as_ref().unwrap();
        let (system, messages) = backend.seen.lock().unwrap().clone().unwrap();
        assert_eq!(system, prompt::render(&catalog()));
        assert_eq!(messages, vec![Message::user("weather in Lisbon")]);
    }

    #[tokio::test]
    async fn reply_without_json_is_parse_error() {
        let interpreter = Interpreter::new(Some(Scripted::new("I cannot help with that.")));
        let err = interpreter.interpret("hi", &catalog()).await.unwrap_err();
        assert!(matches!(err, InterpretError::Parse(_)));
    }

    #[tokio::test]
    async fn provider_failure_is_upstream_error() {
        let interpreter = Interpreter::new(Some(Down));
        let err = interpreter.interpret("hi", &catalog()).await.unwrap_err();
        assert!(matches!(err, InterpretError::Upstream(LlmError::Api(_))));
    }

    #[test]
    fn reversed_braces_are_parse_error() {
        assert!(matches!(parse_reply("} oops {"), Err(InterpretError::Parse(_))));
    }

    #[test]
    fn invalid_json_between_braces_is_parse_error() {
        let err = parse_reply("here: {tool: calculator}").unwrap_err();
        assert!(matches!(err, InterpretError::Parse(_)));
    }

    #[test]
    fn missing_key_is_parse_error() {
        let err = parse_reply(r#"{"tool":"calculator","parameters":{}}"#).unwrap_err();
        match err {
            InterpretError::Parse(msg) => assert!(msg.contains("explanation"), "{msg}"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn non_object_parameters_is_parse_error() {
        let err = parse_reply(r#"{"tool":"calculator","parameters":[1,2],"explanation":"x"}"#)
            .unwrap_err();
        assert!(matches!(err, InterpretError::Parse(_)));
    }

    #[test]
    fn nested_objects_survive_extraction() {
        let reply = r#"Result: {"tool":"search","parameters":{"filter":{"lang":"en"}},"explanation":"nested"} done"#;
        let interpretation = parse_reply(reply).unwrap();
        assert_eq!(interpretation.parameters["filter"], json!({"lang": "en"}));
    }
}
