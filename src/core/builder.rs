use crate::config::{Config, ConfigLoader};
use crate::core::context::Context;
use crate::core::dispatcher::Dispatcher;
use crate::core::error::Result;
use crate::discovery::{DEFAULT_COLLECTION, Discovery, Suite, SuiteDiscoverer};
use crate::engine::{CommandEngine, Engine};
use crate::filter::FilterPredicate;
use crate::harness::{LogParser, SuiteRunOutcome};
use crate::report::{Aggregator, NullObserver, RunObserver, RunReport};
use std::path::PathBuf;

/// Builder for configuring and running a suite run.
pub struct SuiteRunnerBuilder {
    config: Option<Config>,
    root: Option<PathBuf>,
    filter: Option<String>,
    suites: Vec<PathBuf>,
    engine: Option<Box<dyn Engine>>,
}

impl SuiteRunnerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: None,
            root: None,
            filter: None,
            suites: Vec::new(),
            engine: None,
        }
    }

    /// Set the configuration directly.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Load configuration from a standalone TOML file, plus profile and env overlays.
    pub fn from_config_file(mut self, path: impl Into<PathBuf>) -> Result<Self> {
        self.config = Some(ConfigLoader::new().config_file(path).load()?);
        Ok(self)
    }

    /// Set the directory walked for suites. Overrides `discovery.root`.
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Set the identifier prefix filter. Overrides `filter`.
    pub fn filter(mut self, prefix: impl Into<String>) -> Self {
        self.filter = Some(prefix.into());
        self
    }

    /// Add a single suite file, identified by its file stem.
    ///
    /// When suites are given and no root is set anywhere, no directory is walked.
    pub fn suite(mut self, path: impl Into<PathBuf>) -> Self {
        self.suites.push(path.into());
        self
    }

    /// Set a custom engine implementation.
    pub fn engine<E: Engine + 'static>(mut self, engine: E) -> Self {
        self.engine = Some(Box::new(engine));
        self
    }

    /// Build the suite runner.
    ///
    /// Without a custom engine, `engine.command` must be configured.
    pub fn build(self) -> Result<SuiteRunner> {
        let mut config = self.config.unwrap_or_default();

        if let Some(prefix) = self.filter {
            config.filter = Some(prefix);
        }

        let root = self.root.or_else(|| config.discovery.root.clone());
        let walk_root = match root {
            Some(root) => Some(root),
            None if self.suites.is_empty() => Some(PathBuf::from(".")),
            None => None,
        };

        // Create engine from config if not explicitly set
        let engine = match self.engine {
            Some(engine) => engine,
            None => Box::new(CommandEngine::new(&config)?),
        };

        let filter = FilterPredicate::new(config.filter_prefix());
        let discoverer = SuiteDiscoverer::new(&config.discovery);
        let dispatcher = Dispatcher::new(engine, LogParser::new(&config.log));

        let ctx_root = walk_root.clone().unwrap_or_else(|| PathBuf::from("."));
        let ctx = Context::new(config, ctx_root)?;

        Ok(SuiteRunner {
            ctx,
            walk_root,
            explicit_suites: self.suites,
            filter,
            discoverer,
            dispatcher,
        })
    }

    /// Build and immediately run.
    pub fn run(self) -> Result<RunReport> {
        self.build()?.run()
    }
}

impl Default for SuiteRunnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Suite runner that orchestrates discovery, filtering, execution and aggregation.
pub struct SuiteRunner {
    ctx: Context,
    walk_root: Option<PathBuf>,
    explicit_suites: Vec<PathBuf>,
    filter: FilterPredicate,
    discoverer: SuiteDiscoverer,
    dispatcher: Dispatcher,
}

impl SuiteRunner {
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn filter(&self) -> &FilterPredicate {
        &self.filter
    }

    /// Discover every suite, walked and explicit, sorted by id.
    ///
    /// A missing or unreadable root is the only error.
    pub fn discover(&self) -> Result<Discovery> {
        let mut discovery = match &self.walk_root {
            Some(root) => self.discoverer.discover(root)?,
            None => Discovery::new(),
        };
        for path in &self.explicit_suites {
            discovery.insert(DEFAULT_COLLECTION, Suite::from_file(path.clone())?);
        }
        Ok(discovery)
    }

    /// Discovered suites split into `(included, filtered_out)`.
    pub fn plan(&self) -> Result<(Vec<Suite>, Vec<Suite>)> {
        Ok(self.filter.partition(self.discover()?.suites()))
    }

    /// Run every included suite without incremental reporting.
    pub fn run(&self) -> Result<RunReport> {
        self.run_with(&mut NullObserver)
    }

    /// Run suites one at a time in discovery order, reporting to `observer`.
    pub fn run_with(&self, observer: &mut dyn RunObserver) -> Result<RunReport> {
        let suites = self.discover()?.suites();
        let (included, filtered_out) = self.filter.partition(suites.clone());
        observer.on_run_start(&included, &filtered_out);

        tracing::info!(
            engine = self.dispatcher.engine_name(),
            suites = included.len(),
            filtered = filtered_out.len(),
            "starting run"
        );

        let mut aggregator = Aggregator::new();
        let mut per_suite = Vec::with_capacity(included.len());
        let mut filtered_ids = Vec::with_capacity(filtered_out.len());

        for suite in &suites {
            if !self.filter.includes(&suite.id) {
                aggregator.record(&SuiteRunOutcome::not_run(suite.id.clone()), true);
                filtered_ids.push(suite.id.clone());
                observer.on_suite_filtered(suite);
                continue;
            }

            tracing::info!(suite = %suite.id, path = %suite.path.display(), "running suite");
            let outcome = self.dispatcher.dispatch(&self.ctx, suite);
            aggregator.record(&outcome, false);
            observer.on_suite_finished(&outcome, &aggregator.summary());
            per_suite.push(outcome.into());
        }

        let report = RunReport {
            summary: aggregator.summary(),
            per_suite,
            filtered_out: filtered_ids,
            filter: self.filter.prefix().map(String::from),
        };
        observer.on_run_end(&report);
        Ok(report)
    }
}
