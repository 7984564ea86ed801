// SPDX-License-Identifier: MIT

//! The [`Factory`] turns a [`Config`] tree into live Actions, Processors,
//! Readers and finally a set of [`crate::Pipeline`]s.
//!
//! Grounded on the original's `config.go` dispatch (`NewReaderFromConfig`,
//! `NewProcessorsFromMap`, `NewActionFromConfig`) and, for the shape of
//! "pick a concrete implementation by a config-carried discriminant", on
//! the teacher's `oj-daemon::adapters::agent::RuntimeRouter`.

use crate::config::{ActionConfig, Config, LogActionConfig, ReaderConfig};
use crate::error::ConfigError;
use crate::pipeline::Pipeline;
use async_trait::async_trait;
use bollard::Docker;
use logtrap_actions::formatter::{Formatter, JsonFormatter, PlainFormatter, TemplateFormatter};
use logtrap_actions::{Action, DesktopNotifier, LogAction, NotifyAction, Notifier};
use logtrap_core::matcher::compile;
use logtrap_core::{ReaderID, State};
use logtrap_persist::{FilePersister, NoopPersister, Persister};
use logtrap_process::{AnyProcessor, MatcherConfig, MatcherProcessor, Processor, SerialProcessor};
use logtrap_readers::reader::ChildRunner;
use logtrap_readers::{ContainerEngineReader, JournalReader, Reader, ReaderError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Builds a fresh [`Processor`] on every call. A Pipeline owns exactly one
/// Processor instance; a restarted container-engine child gets its own
/// instance from the same factory rather than sharing grouping state.
pub type ProcessorFactory = Arc<dyn Fn() -> Result<Box<dyn Processor>, ConfigError> + Send + Sync>;

/// Materializes actions, processors, readers and pipelines from a
/// [`Config`].
pub struct Factory<'a> {
    config: &'a Config,
}

impl<'a> Factory<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// One shared [`Action`] instance per configured name.
    pub fn build_actions(&self) -> Result<HashMap<String, Arc<dyn Action>>, ConfigError> {
        self.config.actions.iter().map(|(name, cfg)| Ok((name.clone(), build_action(name, cfg)?))).collect()
    }

    /// A closure that builds a fresh [`Processor`] for the named entry in
    /// `processors`. The matcher tree and formatters are compiled once,
    /// here; only the `Processor` struct itself is rebuilt per call.
    pub fn build_processor_factory(&self, name: &str, actions: &HashMap<String, Arc<dyn Action>>) -> Result<ProcessorFactory, ConfigError> {
        let processor_cfg = self.config.processors.get(name).ok_or_else(|| ConfigError::UndefinedProcessor { processor: name.to_string() })?;

        let action = actions
            .get(&processor_cfg.action)
            .cloned()
            .ok_or_else(|| ConfigError::UndefinedAction { processor: name.to_string(), action: processor_cfg.action.clone() })?;

        match processor_cfg.kind.as_str() {
            "any" => {
                let factory: ProcessorFactory = Arc::new(move || Ok(Box::new(AnyProcessor::new(action.clone())) as Box<dyn Processor>));
                Ok(factory)
            }
            "matcher" => {
                let matcher_cfg = processor_cfg
                    .matcher
                    .as_ref()
                    .ok_or_else(|| ConfigError::MissingField { context: format!("processor {name:?}"), field: "matcher" })?;

                let start = compile(&matcher_cfg.start_line)?;
                let end = matcher_cfg.end_line.as_deref().map(compile).transpose()?;

                let matcher_config = MatcherConfig {
                    start,
                    end,
                    include_end: matcher_cfg.include_end,
                    max_lines: matcher_cfg.max_lines,
                    group_by: matcher_cfg.group_by.clone(),
                };

                let factory: ProcessorFactory =
                    Arc::new(move || Ok(Box::new(MatcherProcessor::new(matcher_config.clone(), action.clone())) as Box<dyn Processor>));
                Ok(factory)
            }
            other => Err(ConfigError::UnknownProcessorType { kind: other.to_string() }),
        }
    }

    /// Combines every processor name a reader lists into one factory: a
    /// single name is used as-is, more than one is chained through a
    /// [`SerialProcessor`] built fresh on every call.
    fn build_reader_processor_factory(&self, reader_cfg: &ReaderConfig, actions: &HashMap<String, Arc<dyn Action>>) -> Result<ProcessorFactory, ConfigError> {
        if reader_cfg.processors.is_empty() {
            return Err(ConfigError::MissingField { context: format!("reader {:?}", reader_cfg.effective_id()), field: "processors" });
        }

        let factories: Vec<ProcessorFactory> = reader_cfg.processors.iter().map(|name| self.build_processor_factory(name, actions)).collect::<Result<_, _>>()?;

        if let [single] = factories.as_slice() {
            return Ok(single.clone());
        }

        let factory: ProcessorFactory = Arc::new(move || {
            let processors = factories.iter().map(|f| f()).collect::<Result<Vec<_>, _>>()?;
            Ok(Box::new(SerialProcessor::new(processors)) as Box<dyn Processor>)
        });
        Ok(factory)
    }

    pub fn build_persister(&self) -> Result<Arc<dyn Persister>, ConfigError> {
        match self.config.persister.kind.as_deref() {
            None | Some("noop") => Ok(Arc::new(NoopPersister)),
            Some("file") => {
                let file_cfg = self.config.persister.file.as_ref().ok_or_else(|| ConfigError::MissingField { context: "persister".to_string(), field: "file" })?;
                Ok(Arc::new(FilePersister::new(file_cfg.dir.clone())))
            }
            Some(other) => Err(ConfigError::UnknownPersisterType { kind: other.to_string() }),
        }
    }

    pub fn build_reader(&self, reader_cfg: &ReaderConfig, persister: Arc<dyn Persister>, processor_factory: ProcessorFactory) -> Result<Box<dyn Reader>, ConfigError> {
        let id = ReaderID::new(reader_cfg.effective_id());

        match reader_cfg.kind.as_str() {
            "journal" => Ok(Box::new(JournalReader::new(id))),
            "container" => {
                let docker = connect_docker(reader_cfg.effective_id(), reader_cfg.docker_host.as_deref())?;
                let child_runner: Arc<dyn ChildRunner> = Arc::new(PipelineChildRunner { docker: docker.clone(), persister, processor_factory });
                Ok(Box::new(ContainerEngineReader::new(id, docker, child_runner)))
            }
            other => Err(ConfigError::UnknownReaderType { kind: other.to_string() }),
        }
    }

    /// One [`Pipeline`] per configured reader, per spec.md §2's data flow.
    pub fn build_pipelines(&self) -> Result<Vec<Pipeline>, ConfigError> {
        let actions = self.build_actions()?;
        let persister = self.build_persister()?;

        let mut seen_ids = std::collections::HashSet::new();
        let mut pipelines = Vec::with_capacity(self.config.readers.len());

        for reader_cfg in &self.config.readers {
            let id = reader_cfg.effective_id().to_string();
            if !seen_ids.insert(id.clone()) {
                return Err(ConfigError::DuplicateReaderId { id });
            }

            let processor_factory = self.build_reader_processor_factory(reader_cfg, &actions)?;
            let reader: Arc<dyn Reader> = self.build_reader(reader_cfg, persister.clone(), processor_factory.clone())?.into();
            let initial_state = reader_cfg.initial_state.clone().unwrap_or_default();

            pipelines.push(Pipeline::new(reader, persister.clone(), initial_state, processor_factory));
        }

        Ok(pipelines)
    }
}

fn build_action(name: &str, cfg: &ActionConfig) -> Result<Arc<dyn Action>, ConfigError> {
    match cfg.kind.as_str() {
        "log" => {
            let log_cfg = cfg.log.as_ref().ok_or_else(|| ConfigError::MissingField { context: format!("action {name:?}"), field: "log" })?;
            let formatter = build_formatter(name, log_cfg)?;
            Ok(Arc::new(LogAction::stdout(formatter)))
        }
        "notify" => {
            let notify_cfg = cfg.notify.as_ref().ok_or_else(|| ConfigError::MissingField { context: format!("action {name:?}"), field: "notify" })?;

            let title_formatter: Arc<dyn Formatter> = Arc::new(TemplateFormatter::with_defaults(&notify_cfg.title_format)?);
            let body_formatter: Arc<dyn Formatter> = Arc::new(TemplateFormatter::with_defaults(&notify_cfg.body_format)?);

            let services = notify_cfg.services.iter().map(|service| build_notifier(service)).collect::<Result<Vec<_>, _>>()?;

            Ok(Arc::new(NotifyAction::new(title_formatter, body_formatter, notify_cfg.max_title_size, notify_cfg.max_body_size, services)))
        }
        other => Err(ConfigError::UnknownActionType { kind: other.to_string() }),
    }
}

fn build_formatter(name: &str, log_cfg: &LogActionConfig) -> Result<Arc<dyn Formatter>, ConfigError> {
    match log_cfg.format.as_str() {
        "plain" => Ok(Arc::new(PlainFormatter)),
        "json" => Ok(Arc::new(JsonFormatter)),
        "template" => {
            let template = log_cfg.template.as_deref().ok_or_else(|| ConfigError::MissingField { context: format!("action {name:?}"), field: "template" })?;

            let formatter = match (log_cfg.open_tag, log_cfg.close_tag, log_cfg.quote_open.as_deref(), log_cfg.quote_close.as_deref()) {
                (Some(open), Some(close), Some(quote_open), Some(quote_close)) => TemplateFormatter::new(template, open, close, quote_open, quote_close)?,
                _ => TemplateFormatter::with_defaults(template)?,
            };

            Ok(Arc::new(formatter))
        }
        other => Err(ConfigError::UnknownFormat { format: other.to_string() }),
    }
}

fn build_notifier(service: &str) -> Result<Arc<dyn Notifier>, ConfigError> {
    match service {
        "desktop" => Ok(Arc::new(DesktopNotifier::new())),
        other => Err(ConfigError::UnknownNotifyService { service: other.to_string() }),
    }
}

fn connect_docker(reader_id: &str, docker_host: Option<&str>) -> Result<Docker, ConfigError> {
    let result = match docker_host {
        Some(host) => Docker::connect_with_http(host, 120, bollard::API_DEFAULT_VERSION),
        None => Docker::connect_with_local_defaults(),
    };
    result.map_err(|source| ConfigError::Docker { reader: reader_id.to_string(), source })
}

/// Assembles a fully wired Watcher+Pipeline per container, the
/// `ChildRunner` seam [`logtrap_readers::ContainerEngineReader`] needs to
/// spawn fan-out children without depending on this crate.
struct PipelineChildRunner {
    docker: Docker,
    persister: Arc<dyn Persister>,
    processor_factory: ProcessorFactory,
}

#[async_trait]
impl ChildRunner for PipelineChildRunner {
    async fn run_child(&self, child_id: ReaderID, cancel: CancellationToken) -> Result<(), ReaderError> {
        let container_id = child_id.as_str().rsplit(':').next().unwrap_or_default().to_string();
        let reader: Arc<dyn Reader> = Arc::new(logtrap_readers::PerContainerReader::new(child_id, container_id, self.docker.clone()));
        let pipeline = Pipeline::new(reader, self.persister.clone(), State::default(), self.processor_factory.clone());
        pipeline.run(cancel).await
    }
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
