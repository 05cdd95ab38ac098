use std::sync::Arc;

use symagent::{
    config::{self, CommonConfig, SecretConfig},
    enrich::lookup::{DomainRecord, StaticLookup},
    eval::evaluator::MockEvaluator,
    provider::{
        llm::{ChatMessage, LanguageModel},
        openai_chat::OpenAIChatModel,
        secret::SecretRegistry,
    },
    AgentBuilder, Term,
};
use tracing::debug;

use crate::{response, should_run_external_api_tests};

const TEST_SECRET_PATH: &str = "tests/provider_tests/test_secret.json";

const PROVIDER_NAME: &str = "openai";

fn setup_model() -> OpenAIChatModel {
    let secret_config: SecretConfig = config::from_file(TEST_SECRET_PATH).unwrap();
    let registry = SecretRegistry::new(secret_config);
    let secret = registry.get_secret(PROVIDER_NAME).unwrap();
    OpenAIChatModel::with_secret(PROVIDER_NAME, &secret)
}

#[tokio::test]
async fn test_openai_completion() {
    if !should_run_external_api_tests() {
        return;
    }
    let model = setup_model();

    let response = model
        .complete(
            &[
                ChatMessage::system("Answer with a single word."),
                ChatMessage::user("What is the capital of Japan?"),
            ],
            &CommonConfig::default(),
            &[],
        )
        .await
        .unwrap();
    debug!("{:?}", response);

    assert!(response.content.contains("Tokyo"));
    assert_eq!(response.metadata.model, CommonConfig::default().model);
}

#[tokio::test]
async fn test_openai_domain_formatter() {
    if !should_run_external_api_tests() {
        return;
    }

    let mut evaluator = MockEvaluator::new();
    evaluator.expect_run().returning(|_, _| {
        Ok(vec![vec![response(Term::tagged(
            "ontology_term",
            Term::string("GO:0006281"),
        ))]])
    });
    let lookup: StaticLookup = [DomainRecord::new("GO:0006281", "DNA repair")]
        .into_iter()
        .collect();

    let agent = AgentBuilder::new(Arc::new(evaluator))
        .code("!(Response (process-of BRCA2))")
        .domain_formatter(Arc::new(lookup), Arc::new(setup_model()))
        .build()
        .unwrap();
    let result = agent
        .invoke(Term::string("Which process is BRCA2 involved in?"), &[])
        .await
        .unwrap();
    debug!("{:?}", result);

    assert_eq!(result.content.len(), 1);
    assert!(result.auxiliary.is_some());
}
