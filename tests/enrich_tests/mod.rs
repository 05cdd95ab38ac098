use std::sync::Arc;

use pretty_assertions::assert_eq;
use symagent::{
    enrich::{
        lookup::{DomainRecord, MockDomainLookup, StaticLookup},
        EnrichmentError, MockPostProcessor,
    },
    eval::{context::MESSAGES_NAME, evaluator::MockEvaluator},
    history::Role,
    provider::{capability::Capability, keyword::KeywordModel},
    AgentBuilder, AgentError, Response, Term,
};

use crate::response;

fn ontology(id: &str) -> Term {
    Term::tagged("ontology_term", Term::string(id))
}

fn gene_evaluator() -> MockEvaluator {
    let mut evaluator = MockEvaluator::new();
    evaluator.expect_run().returning(|context, _| {
        let message = context.resolve(MESSAGES_NAME).cloned();
        assert!(message.is_some());
        Ok(vec![vec![
            response(ontology("GO:0006281")),
            response(Term::tagged("gene", Term::symbol("BRCA2"))),
        ]])
    });
    evaluator
}

fn go_lookup() -> StaticLookup {
    [DomainRecord::new("GO:0006281", "DNA repair")
        .with_description("Restoration of DNA after damage.")]
    .into_iter()
    .collect()
}

#[tokio::test]
async fn test_domain_formatter_rewrites_response() {
    let model = KeywordModel::from_pairs(
        "go-expert",
        [
            ("DNA repair", "BRCA2 takes part in DNA repair."),
            ("gene", "Unrelated gene answer."),
        ],
    );
    let agent = AgentBuilder::new(Arc::new(gene_evaluator()))
        .code("!(Response (genes (messages)))")
        .domain_formatter(Arc::new(go_lookup()), Arc::new(model))
        .build()
        .unwrap();

    let result = agent
        .invoke(Term::string("What does BRCA2 do?"), &[])
        .await
        .unwrap();

    assert_eq!(
        result.content,
        vec![Term::string("BRCA2 takes part in DNA repair.")]
    );
    assert_eq!(
        result.auxiliary,
        Some(Term::expr([
            ontology("GO:0006281"),
            Term::tagged("gene", Term::symbol("BRCA2")),
        ]))
    );
}

#[tokio::test]
async fn test_lookup_failure_is_enrichment_error() {
    let mut lookup = MockDomainLookup::new();
    lookup
        .expect_lookup()
        .returning(|_| Err(EnrichmentError::Lookup("ontology service unavailable".into())));

    let agent = AgentBuilder::new(Arc::new(gene_evaluator()))
        .code("!(Response (genes (messages)))")
        .domain_formatter(
            Arc::new(lookup),
            Arc::new(KeywordModel::from_pairs("k", [("a", "b")])),
        )
        .build()
        .unwrap();

    let result = agent.invoke(Term::string("q"), &[]).await;
    assert!(matches!(
        result,
        Err(AgentError::Enrichment(EnrichmentError::Lookup(_)))
    ));
}

#[tokio::test]
async fn test_post_processor_receives_message_and_capabilities() {
    let mut processor = MockPostProcessor::new();
    processor
        .expect_process()
        .times(1)
        .returning(|message, response, capabilities| {
            assert_eq!(message, &Term::string("q"));
            assert_eq!(capabilities.len(), 1);
            assert_eq!(capabilities[0].name, "search");
            Ok(Response::new(vec![Term::symbol("rewritten")]).with_auxiliary(response.to_term()))
        });

    let agent = AgentBuilder::new(Arc::new(gene_evaluator()))
        .code("!(Response (genes (messages)))")
        .post_processor(Arc::new(processor))
        .build()
        .unwrap();
    let result = agent
        .invoke(Term::string("q"), &[Capability::new("search")])
        .await
        .unwrap();
    assert_eq!(result.content, vec![Term::symbol("rewritten")]);
}

#[tokio::test]
async fn test_dialog_history_records_processed_response() {
    let model = KeywordModel::from_pairs("go-expert", [("DNA repair", "It repairs DNA.")]);
    let mut agent = AgentBuilder::new(Arc::new(gene_evaluator()))
        .code("!(Response (genes (messages)))")
        .domain_formatter(Arc::new(go_lookup()), Arc::new(model))
        .build_dialog()
        .unwrap();

    agent.invoke(Term::string("BRCA2?"), &[]).await.unwrap();

    let last = agent.history().entries().last().cloned().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert_eq!(last.content, Term::string("It repairs DNA."));
}
