//! Language model providers
//!
//! Post-processing turns a terse symbolic [`Response`](crate::response::Response)
//! into prose through a [`llm::LanguageModel`]: an ordered list of role/content
//! messages plus a [`CommonConfig`](crate::config::CommonConfig) in, one
//! completion out.
//!
//! * [`openai_chat::OpenAIChatModel`]: OpenAI chat completions.
//! * [`keyword::KeywordModel`]: offline pattern table, for tests and demos.
//!
//! Credentials are read from a secret file into a [`secret::SecretRegistry`].

pub mod capability;
pub mod keyword;
pub mod llm;
pub mod openai_chat;
pub mod secret;
pub mod types;
