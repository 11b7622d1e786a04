//! Parallel dispatch to every configured classifier

use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use crate::{
    ai::{OpenAiCompatibleClassifier, RiskClassifier},
    config::Config,
    errors::OracleResult,
    types::ClassifierResult,
};

/// Builds one classifier per configured backend, keyed or not.
pub fn classifiers_from_config(config: &Config) -> OracleResult<Vec<Arc<dyn RiskClassifier>>> {
    config
        .classifiers
        .iter()
        .map(|backend| {
            OpenAiCompatibleClassifier::from_config(backend, config.classifier_timeout_secs)
                .map(|c| Arc::new(c) as Arc<dyn RiskClassifier>)
        })
        .collect()
}

/// Runs every backend on the same context and waits for all to settle.
/// The result keeps backend order and has one entry per backend.
pub async fn classify_all(
    classifiers: &[Arc<dyn RiskClassifier>],
    context_json: &str,
) -> Vec<ClassifierResult> {
    let start = Instant::now();

    let calls = classifiers.iter().map(|classifier| async move {
        let model = classifier.model_name().to_string();
        match classifier.classify(context_json).await {
            Ok(opinion) => {
                info!("🤖 {} flagged {}", model, opinion.mask);
                ClassifierResult::success(model, opinion)
            }
            Err(e) => {
                warn!("⚠️ Classifier {} failed: {}", model, e);
                ClassifierResult::failed(model, &e)
            }
        }
    });

    let results = join_all(calls).await;
    info!(
        "🧠 AI fan-out settled in {:?}: {}/{} succeeded",
        start.elapsed(),
        results.iter().filter(|r| r.is_success()).count(),
        results.len()
    );
    results
}
