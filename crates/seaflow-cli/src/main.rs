use seaflow_core::{AuthoringGraph, DagRecord, GraphDescription, TaskRecord};
use seaflow_layout::{LayoutConfig, RankDir};
use serde::Serialize;
use std::io::{Read, Write};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Core(seaflow_core::Error),
    Layout(seaflow_layout::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Core(err) => write!(f, "{err}"),
            CliError::Layout(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<seaflow_core::Error> for CliError {
    fn from(value: seaflow_core::Error) -> Self {
        Self::Core(value)
    }
}

impl From<seaflow_layout::Error> for CliError {
    fn from(value: seaflow_layout::Error) -> Self {
        Self::Layout(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Layout,
    Validate,
    CheckAdapters,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum View {
    #[default]
    Dag,
    Task,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    view: View,
    config: Option<String>,
    rankdir: Option<RankDir>,
    match_types: bool,
}

fn usage() -> &'static str {
    "seaflow\n\
\n\
USAGE:\n\
  seaflow [layout] [--view dag|task] [--config <path>] [--rankdir LR|RL|TB|BT] [--pretty] [<path>|-]\n\
  seaflow validate [--match-types] [--pretty] [<path>|-]\n\
  seaflow check-adapters [--pretty] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - layout reads a DAG definition (--view dag) or a task execution (--view task).\n\
  - validate and check-adapters read an authoring document (nodes, edges, interfaces, adapters, actions).\n\
  - --config replaces the view's layout preset; --rankdir overrides its direction.\n\
  - Set RUST_LOG (e.g. RUST_LOG=seaflow_layout=debug) for diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();
    let mut command_seen = false;

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" | "validate" | "check-adapters" if !command_seen && args.input.is_none() => {
                args.command = match a.as_str() {
                    "validate" => Command::Validate,
                    "check-adapters" => Command::CheckAdapters,
                    _ => Command::Layout,
                };
                command_seen = true;
            }
            "--pretty" => args.pretty = true,
            "--match-types" => args.match_types = true,
            "--view" => {
                let Some(view) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.view = match view.trim().to_ascii_lowercase().as_str() {
                    "dag" => View::Dag,
                    "task" => View::Task,
                    _ => return Err(CliError::Usage(usage())),
                };
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--rankdir" => {
                let Some(dir) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.rankdir = Some(
                    dir.parse::<RankDir>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    // Flags that only make sense for one command are usage errors elsewhere.
    let layout_only = args.view != View::Dag || args.config.is_some() || args.rankdir.is_some();
    if layout_only && args.command != Command::Layout {
        return Err(CliError::Usage(usage()));
    }
    if args.match_types && args.command != Command::Validate {
        return Err(CliError::Usage(usage()));
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn layout_config(args: &Args) -> Result<LayoutConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => LayoutConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => match args.view {
            View::Dag => LayoutConfig::dag_viewer(),
            View::Task => LayoutConfig::task_viewer(),
        },
    };
    if let Some(rankdir) = args.rankdir {
        config.rankdir = rankdir;
    }
    Ok(config)
}

fn description(view: View, text: &str) -> Result<GraphDescription, CliError> {
    Ok(match view {
        View::Dag => DagRecord::from_json(text)?.to_view()?.description,
        View::Task => TaskRecord::from_json(text)?.to_view()?.description,
    })
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;

    match args.command {
        Command::Layout => {
            let config = layout_config(&args)?;
            let description = description(args.view, &text)?;
            let result = seaflow_layout::layout_description(&description, &config);
            write_json(&result, args.pretty)
        }
        Command::Validate => {
            let mut graph = AuthoringGraph::from_json(&text)?;
            if args.match_types {
                graph.options.match_types = true;
            }
            let statuses = graph.edge_statuses();
            tracing::info!(
                edges = statuses.len(),
                invalid = statuses.iter().filter(|s| !s.verdict.is_valid()).count(),
                "validated"
            );
            write_json(&statuses, args.pretty)
        }
        Command::CheckAdapters => {
            let graph = AuthoringGraph::from_json(&text)?;
            write_json(&graph.adapter_issues(), args.pretty)
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_tracing();

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
