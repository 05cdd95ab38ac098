use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use super::{dialog::DialogAgent, symbolic::SymbolicAgent, ProgramSource};
use crate::{
    config::{AgentSettings, CommonConfig, EnrichmentSettings},
    enrich::{formatter::DomainFormatter, lookup::DomainLookup, PostProcessor},
    error::AgentResult,
    eval::{
        context::{Binding, ContextError},
        evaluator::{Evaluator, Program},
        prepare::Bindings,
    },
    history::{DialogHistory, LastEntries},
    provider::llm::LanguageModel,
    response::{ResultUnwrapper, UnrecognizedPolicy, DEFAULT_RESPONSE_TAG},
    term::Term,
};

/// Collects the construction parameters of an agent.
///
/// Binding errors are kept until [`AgentBuilder::build`] so calls can be
/// chained.
pub struct AgentBuilder {
    evaluator: Arc<dyn Evaluator>,
    path: Option<PathBuf>,
    code: Option<Program>,
    prelude: Option<Program>,
    bindings: Bindings,
    binding_error: Option<ContextError>,
    include_paths: Vec<PathBuf>,
    response_tag: String,
    unrecognized: UnrecognizedPolicy,
    history_window: Option<usize>,
    enrichment: EnrichmentSettings,
    llm: CommonConfig,
    post_processor: Option<Arc<dyn PostProcessor>>,
}

impl AgentBuilder {
    pub fn new(evaluator: Arc<dyn Evaluator>) -> Self {
        Self {
            evaluator,
            path: None,
            code: None,
            prelude: None,
            bindings: Bindings::new(),
            binding_error: None,
            include_paths: Vec::new(),
            response_tag: DEFAULT_RESPONSE_TAG.to_string(),
            unrecognized: UnrecognizedPolicy::default(),
            history_window: None,
            enrichment: EnrichmentSettings::default(),
            llm: CommonConfig::default(),
            post_processor: None,
        }
    }

    pub fn from_settings(evaluator: Arc<dyn Evaluator>, settings: AgentSettings) -> Self {
        Self {
            path: settings.path,
            code: settings.code.map(Program::Text),
            prelude: settings.prelude.map(Program::Text),
            include_paths: settings.include_paths,
            response_tag: settings.response_tag,
            unrecognized: settings.unrecognized,
            history_window: settings.history_window,
            enrichment: settings.enrichment.unwrap_or_default(),
            llm: settings.llm,
            ..Self::new(evaluator)
        }
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn code(mut self, code: impl Into<Program>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Inline code given as a wrapped term such as `(quote expr)`; the
    /// wrapped expression becomes the program.
    pub fn code_term(self, term: Term) -> Self {
        let program = match term.as_tagged() {
            Some((_, inner)) => inner.clone(),
            None => term,
        };
        self.code(Program::Term(program))
    }

    pub fn prelude(mut self, prelude: impl Into<Program>) -> Self {
        self.prelude = Some(prelude.into());
        self
    }

    pub fn binding(mut self, name: impl Into<String>, binding: impl Into<Binding>) -> Self {
        if let Err(e) = self.bindings.insert(name, binding.into()) {
            self.binding_error.get_or_insert(e);
        }
        self
    }

    pub fn include_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.include_paths.push(path.into());
        self
    }

    pub fn response_tag(mut self, tag: impl Into<String>) -> Self {
        self.response_tag = tag.into();
        self
    }

    pub fn unrecognized(mut self, policy: UnrecognizedPolicy) -> Self {
        self.unrecognized = policy;
        self
    }

    /// Number of most recent entries a dialog agent exposes to its program.
    pub fn history_window(mut self, entries: usize) -> Self {
        self.history_window = Some(entries);
        self
    }

    pub fn post_processor(mut self, processor: Arc<dyn PostProcessor>) -> Self {
        self.post_processor = Some(processor);
        self
    }

    /// Installs a [`DomainFormatter`] using the builder's enrichment and
    /// model settings.
    pub fn domain_formatter(
        self,
        lookup: Arc<dyn DomainLookup>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        let formatter = DomainFormatter::new(
            lookup,
            model,
            self.enrichment.clone(),
            self.llm.clone(),
        );
        self.post_processor(Arc::new(formatter))
    }

    pub fn build(self) -> AgentResult<SymbolicAgent> {
        if let Some(e) = self.binding_error {
            return Err(e.into());
        }
        let source = ProgramSource::from_parts(self.path, self.code)?;
        debug!(?source, bindings = self.bindings.len(), "agent built");
        Ok(SymbolicAgent {
            source,
            prelude: self.prelude,
            bindings: self.bindings,
            include_paths: self.include_paths,
            unwrapper: ResultUnwrapper::new(self.response_tag, self.unrecognized),
            evaluator: self.evaluator,
            post_processor: self.post_processor,
        })
    }

    pub fn build_dialog(self) -> AgentResult<DialogAgent> {
        let history = match self.history_window {
            Some(n) => DialogHistory::with_window(LastEntries(n)),
            None => DialogHistory::new(),
        };
        Ok(DialogAgent::new(self.build()?, history))
    }
}
