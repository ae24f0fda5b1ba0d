//! Unit tests for the chat relay, using a stub backend.

use super::*;
use async_trait::async_trait;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Backend that returns a canned result and records every request.
struct StubBackend {
    calls: AtomicUsize,
    last_request: Mutex<Option<GenerationRequest>>,
    result: Result<GenerationResponse, BackendError>,
}

impl StubBackend {
    fn answering(text: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            result: Ok(GenerationResponse {
                response: text.to_string(),
                model: None,
            }),
        })
    }

    fn failing(error: BackendError) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            result: Err(error),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> GenerationRequest {
        self.last_request.lock().unwrap().clone().unwrap()
    }
}

#[async_trait]
impl GenerationBackend for StubBackend {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        _timeout: Duration,
    ) -> Result<GenerationResponse, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.result.clone()
    }
}

fn relay_with(backend: Arc<StubBackend>) -> ChatRelay {
    ChatRelay::new(backend, RelayConfig::default())
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_empty_prompt_rejected_without_downstream_call() {
    let backend = StubBackend::answering("unused");
    let relay = relay_with(backend.clone());

    for prompt in ["", "   ", "\n\t "] {
        let result = relay.relay("req", prompt, &RelayOptions::default()).await;
        assert!(matches!(result, Err(RelayError::InvalidInput(_))));
    }
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_overlong_prompt_rejected() {
    let backend = StubBackend::answering("unused");
    let relay = relay_with(backend.clone());

    let prompt = "a".repeat(4001);
    let result = relay.relay("req", &prompt, &RelayOptions::default()).await;
    assert!(matches!(result, Err(RelayError::InvalidInput(ref m)) if m.contains("4000")));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_prompt_at_limit_accepted() {
    let backend = StubBackend::answering("ok");
    let relay = relay_with(backend.clone());

    let prompt = "a".repeat(4000);
    assert!(relay
        .relay("req", &prompt, &RelayOptions::default())
        .await
        .is_ok());
    assert_eq!(backend.calls(), 1);
}

#[test]
fn test_length_counts_characters_not_bytes() {
    let relay = relay_with(StubBackend::answering("ok"));
    // 4000 three-byte characters
    let prompt = "語".repeat(4000);
    assert!(relay.validate(&prompt).is_ok());
}

proptest! {
    #[test]
    fn prop_whitespace_only_prompts_are_invalid(prompt in "[ \\t\\n\\r]{0,64}") {
        let relay = relay_with(StubBackend::answering("ok"));
        prop_assert!(matches!(relay.validate(&prompt), Err(RelayError::InvalidInput(_))));
    }

    #[test]
    fn prop_valid_prompts_come_back_trimmed(body in "[a-zA-Z0-9?*]{1,40}", pad in 0usize..5) {
        let relay = relay_with(StubBackend::answering("ok"));
        let padded = format!("{}{}{}", " ".repeat(pad), body, "\n".repeat(pad));
        prop_assert_eq!(relay.validate(&padded).unwrap(), body.as_str());
    }
}

// ============================================================================
// Forwarding
// ============================================================================

#[tokio::test]
async fn test_answer_extracted_from_response() {
    let backend = StubBackend::answering("42");
    let relay = relay_with(backend.clone());

    let answer = relay
        .relay("req-42", "What is 6*7?", &RelayOptions::default())
        .await
        .unwrap();
    assert_eq!(answer.answer, "42");
    assert_eq!(answer.request_id, "req-42");
    assert_eq!(answer.model, "llama3.2");
}

#[tokio::test]
async fn test_request_uses_config_defaults_and_trims_prompt() {
    let backend = StubBackend::answering("hi");
    let relay = relay_with(backend.clone());

    relay
        .relay("req", "  hello  ", &RelayOptions::default())
        .await
        .unwrap();

    let request = backend.last_request();
    assert_eq!(request.prompt, "hello");
    assert_eq!(request.model, "llama3.2");
    assert!(!request.stream);
    assert!((request.options.temperature - 0.7).abs() < f32::EPSILON);
    assert_eq!(request.options.num_predict, 512);
}

#[tokio::test]
async fn test_request_options_override_defaults() {
    let backend = StubBackend::answering("hi");
    let relay = relay_with(backend.clone());

    let options = RelayOptions {
        model: Some("mistral".to_string()),
        temperature: Some(0.1),
    };
    let answer = relay.relay("req", "hello", &options).await.unwrap();

    let request = backend.last_request();
    assert_eq!(request.model, "mistral");
    assert!((request.options.temperature - 0.1).abs() < f32::EPSILON);
    assert_eq!(answer.model, "mistral");
}

#[test]
fn test_blank_model_override_falls_back_to_default() {
    let relay = relay_with(StubBackend::answering("hi"));
    let options = RelayOptions {
        model: Some("  ".to_string()),
        temperature: None,
    };
    assert_eq!(relay.build_request("hi", &options).model, "llama3.2");
}

#[tokio::test]
async fn test_backend_model_name_wins_when_reported() {
    let backend = Arc::new(StubBackend {
        calls: AtomicUsize::new(0),
        last_request: Mutex::new(None),
        result: Ok(GenerationResponse {
            response: "hi".to_string(),
            model: Some("llama3.2:latest".to_string()),
        }),
    });
    let relay = relay_with(backend);

    let answer = relay
        .relay("req", "hello", &RelayOptions::default())
        .await
        .unwrap();
    assert_eq!(answer.model, "llama3.2:latest");
}

// ============================================================================
// Error mapping
// ============================================================================

#[tokio::test]
async fn test_unreachable_backend_maps_to_backend_unavailable() {
    let backend = StubBackend::failing(BackendError::Unreachable("refused".to_string()));
    let relay = relay_with(backend.clone());

    let result = relay.relay("req", "hello", &RelayOptions::default()).await;
    assert!(matches!(result, Err(RelayError::BackendUnavailable(_))));
    // No retries
    assert_eq!(backend.calls(), 1);
}

/// Backend that sleeps past any deadline and ignores the one it is given.
struct HangingBackend;

#[async_trait]
impl GenerationBackend for HangingBackend {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn generate(
        &self,
        _request: &GenerationRequest,
        _timeout: Duration,
    ) -> Result<GenerationResponse, BackendError> {
        tokio::time::sleep(Duration::from_secs(2)).await;
        Ok(GenerationResponse {
            response: "late".to_string(),
            model: None,
        })
    }
}

#[tokio::test]
async fn test_relay_enforces_deadline_on_any_backend() {
    let relay = ChatRelay::new(Arc::new(HangingBackend), RelayConfig::default())
        .with_timeout(Duration::from_millis(100));

    let start = std::time::Instant::now();
    let result = relay.relay("req", "hello", &RelayOptions::default()).await;
    let elapsed = start.elapsed();

    assert_eq!(result, Err(RelayError::Timeout(100)));
    assert!(elapsed < Duration::from_millis(500), "took {:?}", elapsed);
}

#[test]
fn test_backend_error_mapping() {
    assert_eq!(
        RelayError::from(BackendError::ModelNotFound("ghost".to_string())),
        RelayError::InvalidModel("ghost".to_string())
    );
    assert_eq!(
        RelayError::from(BackendError::Timeout(60_000)),
        RelayError::Timeout(60_000)
    );
    assert!(matches!(
        RelayError::from(BackendError::Upstream {
            status: 500,
            message: "boom".to_string()
        }),
        RelayError::Internal(_)
    ));
    assert!(matches!(
        RelayError::from(BackendError::InvalidResponse("not json".to_string())),
        RelayError::Internal(_)
    ));
}

#[test]
fn test_public_message_hides_infrastructure_detail() {
    let error = RelayError::Internal("stack trace at backend.rs:42".to_string());
    assert_eq!(error.public_message(), "Internal server error");

    let error = RelayError::BackendUnavailable("tcp connect error 127.0.0.1:11434".to_string());
    assert!(!error.public_message().contains("11434"));
}

#[test]
fn test_error_codes() {
    assert_eq!(RelayError::InvalidInput(String::new()).code(), "invalid_input");
    assert_eq!(RelayError::InvalidModel(String::new()).code(), "invalid_model");
    assert_eq!(
        RelayError::BackendUnavailable(String::new()).code(),
        "backend_unavailable"
    );
    assert_eq!(RelayError::Timeout(1).code(), "timeout");
    assert_eq!(RelayError::Internal(String::new()).code(), "internal_error");
}

#[test]
fn test_relay_answer_serializes_request_id_camel_case() {
    let answer = RelayAnswer {
        answer: "42".to_string(),
        model: "llama3.2".to_string(),
        request_id: "abc".to_string(),
    };
    let json = serde_json::to_value(&answer).unwrap();
    assert_eq!(json["requestId"], "abc");
    assert_eq!(json["answer"], "42");
}

#[test]
fn test_timeout_from_config() {
    let relay = relay_with(StubBackend::answering("ok"));
    assert_eq!(relay.timeout(), Duration::from_secs(60));

    let relay = relay.with_timeout(Duration::from_millis(250));
    assert_eq!(relay.timeout(), Duration::from_millis(250));
}
