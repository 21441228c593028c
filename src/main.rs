use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use suite_runner::config::{Config, ConfigLoader, OutputFormat, env};
use suite_runner::discovery::SuiteDiscoverer;
use suite_runner::filter::FilterPredicate;
use suite_runner::harness::ResultFormatter;
use suite_runner::{Error, Result, SuiteRunnerBuilder};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "suite-runner",
    version,
    about = "Discover, run and aggregate test suites through an external engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every discovered suite and report the results
    Run {
        /// Directory to walk for suites (default: discovery.root or the current directory)
        root: Option<PathBuf>,

        /// Only run suites whose identifier starts with this prefix
        #[arg(long)]
        filter: Option<String>,

        /// Run this suite file; it runs alone unless a root is given (ROOT or discovery.root)
        #[arg(long = "suite", value_name = "PATH")]
        suites: Vec<PathBuf>,

        /// Path to a config file (default: suite-runner.toml in the root)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Report format
        #[arg(long, value_enum)]
        format: Option<Format>,

        /// Enable debug logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// List discovered suites without running them
    List {
        /// Directory to walk for suites
        root: Option<PathBuf>,

        /// Mark suites whose identifier does not start with this prefix
        #[arg(long)]
        filter: Option<String>,

        /// Path to a config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the effective configuration and active env overrides
    Check {
        /// Path to a config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Console,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Console => OutputFormat::Console,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match dispatch(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether the run verdict passed.
fn dispatch(command: Commands) -> Result<bool> {
    match command {
        Commands::Run {
            root,
            filter,
            suites,
            config,
            format,
            verbose,
        } => {
            let mut config = load_config(root.as_ref(), config)?;
            if let Some(format) = format {
                config.output.format = format.into();
            }
            config.verbose |= verbose;
            init_tracing(config.verbose);
            run(config, root, filter, suites)
        }
        Commands::List {
            root,
            filter,
            config,
        } => {
            let config = load_config(root.as_ref(), config)?;
            init_tracing(config.verbose);
            list(&config, root, filter)?;
            Ok(true)
        }
        Commands::Check { config } => {
            let config = load_config(None, config)?;
            check(&config)?;
            Ok(true)
        }
    }
}

fn load_config(root: Option<&PathBuf>, config_file: Option<PathBuf>) -> Result<Config> {
    let mut loader = ConfigLoader::new().root(root.cloned().unwrap_or_else(|| PathBuf::from(".")));
    if let Some(path) = config_file {
        loader = loader.config_file(path);
    }
    loader.load()
}

/// Install the global subscriber. `RUST_LOG` wins over `verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(
    config: Config,
    root: Option<PathBuf>,
    filter: Option<String>,
    suites: Vec<PathBuf>,
) -> Result<bool> {
    let format = config.output.format;
    let show_output = config.output.show_output;

    let mut builder = SuiteRunnerBuilder::new().with_config(config);
    if let Some(root) = root {
        builder = builder.root(root);
    }
    if let Some(prefix) = filter {
        builder = builder.filter(prefix);
    }
    for suite in suites {
        builder = builder.suite(suite);
    }
    let runner = builder.build()?;

    let report = match format {
        OutputFormat::Console => {
            let mut formatter = ResultFormatter::new(show_output);
            runner.run_with(&mut formatter)?
        }
        OutputFormat::Json => {
            let report = runner.run()?;
            println!("{}", report.to_json()?);
            report
        }
    };

    Ok(report.is_passing())
}

fn list(config: &Config, root: Option<PathBuf>, filter: Option<String>) -> Result<()> {
    let root = root
        .or_else(|| config.discovery.root.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let prefix = filter.or_else(|| config.filter_prefix().map(String::from));
    let predicate = FilterPredicate::new(prefix);

    let discovery = SuiteDiscoverer::new(&config.discovery).discover(&root)?;
    let (included, filtered_out) = predicate.partition(discovery.suites());

    for suite in &included {
        println!("{}\t{}", suite.id, suite.path.display());
    }
    if !filtered_out.is_empty() {
        println!("\nfiltered out ({}):", filtered_out.len());
        for suite in &filtered_out {
            println!("  {}", suite.id);
        }
    }
    Ok(())
}

fn check(config: &Config) -> Result<()> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| Error::config(format!("failed to render config: {}", e)))?;
    println!("{rendered}");

    let overrides = env::detect_active_overrides();
    if overrides.is_empty() {
        println!("# no SUITE_RUNNER_* overrides active");
    } else {
        println!("# active env overrides:");
        for (key, value) in overrides {
            println!("#   {key}={value}");
        }
    }
    Ok(())
}
