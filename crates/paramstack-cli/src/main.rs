//! `paramstack`: resolve the parameters declared in a manifest
//!
//! ```text
//! paramstack [MANIFEST] [--format text|json] [--backend NAME] [--usage] [--NAME value ...]
//! ```
//!
//! MANIFEST defaults to `<config dir>/paramstack/paramstack.yaml` and must
//! come before any parameter flags.

mod usage;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Arg, ArgAction, Command};
use thiserror::Error;

use paramstack_core::config::{ConfigError, ParameterManifest};
use paramstack_core::sources::{command_for, ClapArguments, EnvironmentSource, ProcessEnvironment};
use paramstack_core::{list_secret_backends, ConsoleLogger, ParamError, ResolutionSession, Results, ValueSource};

use usage::render_usage;

const APP_NAME: &str = "paramstack";

/// Option ids that parameters may not reuse
// Ids of the tool's own arguments, including clap's generated help and version flags.
const RESERVED_NAMES: &[&str] = &[
    "manifest",
    "format",
    "backend",
    "usage",
    "verbose",
    "list-backends",
    "help",
    "version",
];

const MASK: &str = "********";

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Args(#[from] clap::Error),

    #[error("failed to load manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("parameter {0} clashes with a built-in option")]
    ReservedName(String),

    #[error(transparent)]
    Resolve(#[from] ParamError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn base_command() -> Command {
    Command::new(APP_NAME)
        .version(clap::crate_version!())
        .about("Resolve the parameters declared in a manifest")
        .arg(
            Arg::new("manifest")
                .value_name("MANIFEST")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Parameter manifest (YAML)"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_parser(["text", "json"])
                .default_value("text")
                .help("Output format"),
        )
        .arg(
            Arg::new("backend")
                .long("backend")
                .value_name("NAME")
                .help("Secret backend, overriding the manifest setting"),
        )
        .arg(
            Arg::new("usage")
                .long("usage")
                .action(ArgAction::SetTrue)
                .help("Print the application usage and exit"),
        )
        .arg(
            Arg::new("list-backends")
                .long("list-backends")
                .action(ArgAction::SetTrue)
                .help("List the available secret backends and exit"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log every resolved parameter"),
        )
}

fn main() {
    let argv: Vec<String> = std::env::args().collect();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match run(&argv, ProcessEnvironment::new(), &mut out) {
        Ok(()) => {}
        Err(CliError::Args(e)) => e.exit(),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run(argv: &[String], environment: impl EnvironmentSource + 'static, out: &mut dyn Write) -> Result<(), CliError> {
    // Parameter flags depend on the manifest, so find the manifest first
    let pre = base_command()
        .ignore_errors(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .try_get_matches_from(argv)?;

    // Partial matches carry no flag defaults
    if pre.get_one::<bool>("list-backends").copied().unwrap_or(false) {
        for (name, description) in list_secret_backends() {
            writeln!(out, "{:<10} {}", name, description)?;
        }
        return Ok(());
    }

    let path = pre
        .get_one::<PathBuf>("manifest")
        .cloned()
        .unwrap_or_else(|| ParameterManifest::default_path(APP_NAME));
    let manifest = ParameterManifest::load(&path).map_err(|source| CliError::Manifest {
        path: path.clone(),
        source,
    })?;

    let mut settings = manifest.resolver_settings();
    let mut registry = manifest.to_registry()?;
    if !registry.contains(&settings.region_parameter) {
        registry.register(settings.bootstrap_descriptor());
    }
    if let Some(name) = registry.names().into_iter().find(|n| RESERVED_NAMES.contains(&n.as_str())) {
        return Err(CliError::ReservedName(name));
    }

    let mut command = base_command();
    if !manifest.description.is_empty() {
        command = command.about(manifest.description.clone());
    }
    let matches = command_for(&registry, command).try_get_matches_from(argv)?;

    if matches.get_flag("usage") {
        write!(out, "{}", render_usage(&manifest, &registry.snapshot()))?;
        return Ok(());
    }

    if let Some(backend) = matches.get_one::<String>("backend") {
        settings.secret_backend = backend.clone();
    }
    let format = match matches.get_one::<String>("format").map(String::as_str) {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Text,
    };
    let logger = Arc::new(ConsoleLogger::new().verbose(matches.get_flag("verbose")));

    let results = ResolutionSession::new(registry)
        .with_settings(settings)
        .with_arguments(ClapArguments::new(matches))
        .with_environment(environment)
        .with_logger(logger)
        .resolve()?;

    write_results(&results, format, out)
}

fn write_results(results: &Results, format: OutputFormat, out: &mut dyn Write) -> Result<(), CliError> {
    match format {
        OutputFormat::Text => {
            for (name, resolved) in results.iter() {
                match resolved.source {
                    ValueSource::Secret { .. } => writeln!(out, "{}={}", name, MASK)?,
                    _ => writeln!(out, "{}={}", name, resolved.value)?,
                }
            }
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&results.to_json())?)?;
        }
    }
    Ok(())
}
