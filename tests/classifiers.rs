use aegis_risk_oracle::{
    ai::{OpenAiCompatibleClassifier, RiskClassifier, classify_all},
    config::ClassifierBackendConfig,
    errors::{OracleError, LLM_FAIL},
    network::build_http_client,
    types::ClassifierStatus,
};
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;

fn backend(name: &str, model: &str, endpoint: String, api_key: Option<&str>) -> ClassifierBackendConfig {
    ClassifierBackendConfig {
        name: name.to_string(),
        model: model.to_string(),
        endpoint,
        api_key: api_key.map(str::to_string),
    }
}

fn classifier(config: ClassifierBackendConfig) -> OpenAiCompatibleClassifier {
    OpenAiCompatibleClassifier::new(build_http_client(5).unwrap(), config)
}

fn completion(content: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

#[tokio::test]
async fn sends_deterministic_json_mode_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-4o-mini",
            "seed": 42,
            "response_format": { "type": "json_object" }
        })))
        .with_status(200)
        .with_body(completion(r#"{"flags":[4,8],"reasoning":"pause() and live owner"}"#))
        .create_async()
        .await;

    let openai = classifier(backend(
        "openai",
        "gpt-4o-mini",
        format!("{}/v1/chat/completions", server.url()),
        Some("sk-test"),
    ));
    let opinion = openai.classify(r#"{"token":{}}"#).await.unwrap();

    mock.assert_async().await;
    assert_eq!(opinion.flags, vec![4, 8]);
    assert_eq!(opinion.mask.bits(), 12);
    assert_eq!(opinion.reasoning, "pause() and live owner");
}

#[tokio::test]
async fn missing_api_key_never_calls_out() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let groq = classifier(backend("groq", "llama-3.3-70b-versatile", server.url(), None));
    let result = groq.classify("{}").await;

    mock.assert_async().await;
    match result {
        Err(e @ OracleError::ClassifierUnavailable { .. }) => assert_eq!(e.error_code(), LLM_FAIL),
        other => panic!("expected unavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_content_is_that_backends_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body(completion(r#"{"flags":"none","reasoning":"?"}"#))
        .create_async()
        .await;

    let openai = classifier(backend("openai", "gpt-4o-mini", server.url(), Some("sk-test")));
    assert!(matches!(
        openai.classify("{}").await,
        Err(OracleError::MalformedClassifierResponse { .. })
    ));
}

#[tokio::test]
async fn fan_out_keeps_order_and_tolerates_failures() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/ok")
        .with_status(200)
        .with_body(completion(r#"{"flags":[32],"reasoning":"mimics USDC"}"#))
        .create_async()
        .await;
    server
        .mock("POST", "/down")
        .with_status(503)
        .with_body("upstream overloaded")
        .create_async()
        .await;

    let classifiers: Vec<Arc<dyn RiskClassifier>> = vec![
        Arc::new(classifier(backend("groq", "llama-3.3-70b-versatile", format!("{}/down", server.url()), Some("gsk")))),
        Arc::new(classifier(backend("openai", "gpt-4o-mini", format!("{}/ok", server.url()), Some("sk")))),
        Arc::new(classifier(backend("spare", "unkeyed", format!("{}/ok", server.url()), None))),
    ];
    let results = classify_all(&classifiers, "{}").await;

    let statuses: Vec<_> = results.iter().map(|r| (r.model_name.as_str(), r.status)).collect();
    assert_eq!(
        statuses,
        vec![
            ("llama-3.3-70b-versatile", ClassifierStatus::Failed),
            ("gpt-4o-mini", ClassifierStatus::Success),
            ("unkeyed", ClassifierStatus::Failed),
        ]
    );
    assert_eq!(results[1].mask.bits(), 32);
    assert!(results[0].error.as_deref().unwrap_or_default().contains("503"));
}
