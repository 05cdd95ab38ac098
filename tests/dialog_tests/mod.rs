use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use symagent::{
    eval::{
        context::{HISTORY_NAME, MESSAGES_NAME},
        evaluator::MockEvaluator,
    },
    history::{Role, Utterance, HISTORY_TAG},
    Agent, AgentBuilder, AgentError, DialogAgent, Message, Term,
};

use crate::{parsing_evaluator, reply_to_message, response};

fn history_of(entries: impl IntoIterator<Item = Term>) -> Term {
    let mut children = vec![Term::symbol(HISTORY_TAG)];
    children.extend(entries);
    Term::Expression(children)
}

fn reply(message: &str) -> Term {
    Term::tagged("reply", Term::symbol(message))
}

/// Dialog agent that records the history bound for each turn.
fn recording_agent(window: Option<usize>) -> (DialogAgent, Arc<Mutex<Vec<Term>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();

    let mut evaluator = parsing_evaluator();
    evaluator.expect_run().returning(move |context, program| {
        let history = context.resolve(HISTORY_NAME).cloned();
        recorder
            .lock()
            .unwrap()
            .push(history.unwrap_or_else(|| Term::expr([])));
        reply_to_message(context, program)
    });

    let mut builder = AgentBuilder::new(Arc::new(evaluator)).code("!(Response (reply (messages)))");
    if let Some(n) = window {
        builder = builder.history_window(n);
    }
    (builder.build_dialog().unwrap(), seen)
}

#[tokio::test]
async fn test_history_alternates_inputs_and_results() {
    let (mut agent, _) = recording_agent(None);

    agent.invoke("m1", &[]).await.unwrap();
    agent.invoke("m2", &[]).await.unwrap();

    let entries = agent.history().entries();
    assert_eq!(entries.len(), 4);
    let roles: Vec<Role> = entries.iter().map(|u| u.role).collect();
    assert_eq!(
        roles,
        vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
    );
    let terms: Vec<Term> = entries.iter().map(Utterance::to_term).collect();
    assert_eq!(
        terms,
        vec![
            Term::symbol("m1"),
            Term::tagged("assistant", reply("m1")),
            Term::symbol("m2"),
            Term::tagged("assistant", reply("m2")),
        ]
    );
}

#[tokio::test]
async fn test_history_binding_excludes_current_turn() {
    let (mut agent, seen) = recording_agent(None);

    agent.invoke("m1", &[]).await.unwrap();
    agent.invoke("m2", &[]).await.unwrap();

    let seen = seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            history_of([]),
            history_of([Term::symbol("m1"), Term::tagged("assistant", reply("m1"))]),
        ]
    );
}

#[tokio::test]
async fn test_history_window_limits_visible_entries() {
    let (mut agent, seen) = recording_agent(Some(2));

    for message in ["m1", "m2", "m3"] {
        agent.invoke(message, &[]).await.unwrap();
    }

    let third_turn = seen.lock().unwrap()[2].clone();
    assert_eq!(
        third_turn,
        history_of([Term::symbol("m2"), Term::tagged("assistant", reply("m2"))])
    );
    // The log itself keeps every entry.
    assert_eq!(agent.history().len(), 6);
}

#[tokio::test]
async fn test_failed_turn_keeps_input_entry() {
    let mut evaluator = MockEvaluator::new();
    evaluator.expect_run().times(2).returning(|context, _| {
        match context.resolve(MESSAGES_NAME) {
            Some(Term::Symbol(s)) if s == "bad" => Ok(vec![vec![Term::expr([
                Term::symbol("Response"),
                Term::symbol("a"),
                Term::symbol("b"),
            ])]]),
            _ => Ok(vec![vec![response(Term::symbol("ok"))]]),
        }
    });

    let mut agent = AgentBuilder::new(Arc::new(evaluator))
        .code("!(answer (messages))")
        .build_dialog()
        .unwrap();

    let failed = agent.invoke(Term::symbol("bad"), &[]).await;
    assert!(matches!(failed, Err(AgentError::MalformedResult(_))));
    assert_eq!(agent.history().len(), 1);

    agent.invoke(Term::symbol("good"), &[]).await.unwrap();
    let roles: Vec<Role> = agent.history().entries().iter().map(|u| u.role).collect();
    assert_eq!(roles, vec![Role::User, Role::User, Role::Assistant]);
}

#[tokio::test]
async fn test_result_entry_shapes() {
    let mut evaluator = MockEvaluator::new();
    evaluator.expect_run().returning(|context, _| {
        match context.resolve(MESSAGES_NAME) {
            Some(Term::Symbol(s)) if s == "none" => Ok(vec![vec![Term::symbol("quiet")]]),
            Some(Term::Symbol(s)) if s == "many" => Ok(vec![vec![
                response(Term::symbol("a")),
                response(Term::symbol("b")),
            ]]),
            _ => Ok(vec![vec![response(Term::symbol("one"))]]),
        }
    });

    let mut agent = AgentBuilder::new(Arc::new(evaluator))
        .code("!(answer (messages))")
        .build_dialog()
        .unwrap();
    for message in ["none", "single", "many"] {
        agent.invoke(Term::symbol(message), &[]).await.unwrap();
    }

    let results: Vec<Term> = agent
        .history()
        .entries()
        .iter()
        .filter(|u| u.role == Role::Assistant)
        .map(|u| u.content.clone())
        .collect();
    assert_eq!(
        results,
        vec![
            Term::expr([]),
            Term::symbol("one"),
            Term::expr([Term::symbol("a"), Term::symbol("b")]),
        ]
    );
}

#[tokio::test]
async fn test_utterance_messages_in_history() {
    let (mut agent, seen) = recording_agent(None);

    agent
        .invoke(Message::utterance(Role::User, "hello"), &[])
        .await
        .unwrap();
    agent.invoke("again", &[]).await.unwrap();

    let user_hello = Term::tagged("user", Term::string("hello"));
    assert_eq!(
        seen.lock().unwrap()[1],
        history_of([
            user_hello.clone(),
            Term::tagged(
                "assistant",
                Term::tagged("reply", user_hello)
            ),
        ])
    );
}

#[tokio::test]
async fn test_history_json_snapshot() {
    let (mut agent, _) = recording_agent(Some(1));
    agent.invoke("m1", &[]).await.unwrap();

    let json = agent.history().to_json().unwrap();
    let entries: Vec<Utterance> = serde_json::from_str(&json).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].role, Role::User);
    assert_eq!(entries[1].content, reply("m1"));
}

#[tokio::test]
async fn test_dialog_agent_as_trait_object() {
    let (agent, _) = recording_agent(None);
    let mut agent: Box<dyn Agent> = Box::new(agent);

    let result = agent
        .invoke(Message::Term(Term::symbol("m1")), &[])
        .await
        .unwrap();
    assert_eq!(result.content, vec![reply("m1")]);
}
