use clap::{Parser, Subcommand};
use nodereason_core::{
    counts_from_json, is_yaml, load_counts, FailureSummary, HiddenTaints, ReasonError, Reasons,
    Taint,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "nodereason", about = "Rank scheduling failure reasons")]
struct Cli {
    /// Comma-separated taint keys hidden from tenant namespaces (defaults to CW_HIDDEN_TAINTS)
    #[arg(long, global = true)]
    hidden_taints: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print reason counts ordered by priority
    Rank {
        /// JSON or YAML mapping of reason text to count (stdin JSON if omitted)
        file: Option<PathBuf>,
    },
    /// Report whether a taint key is hidden from a namespace
    CheckTaint {
        /// Namespace of the pod
        #[arg(long)]
        namespace: String,
        /// Taint key
        #[arg(long)]
        key: String,
    },
    /// Aggregate per-node failures into an availability message
    Summarize {
        /// Namespace of the pod
        #[arg(long, default_value = "default")]
        namespace: String,
        /// Total number of nodes considered
        #[arg(long)]
        nodes: usize,
        /// JSON or YAML list of node failures (stdin JSON if omitted)
        file: Option<PathBuf>,
    },
}

/// One node's reason for rejecting the pod
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NodeFailure {
    Taint { taint: Taint },
    Message { message: String },
}

fn main() -> miette::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let hidden = resolve_hidden_taints(cli.hidden_taints.as_deref())?;
    info!(keys = hidden.len(), "Resolved hidden taint keys");

    match cli.command {
        Commands::Rank { file } => run_rank(file.as_deref()),
        Commands::CheckTaint { namespace, key } => {
            run_check_taint(&hidden, &namespace, &key);
            Ok(())
        }
        Commands::Summarize {
            namespace,
            nodes,
            file,
        } => run_summarize(&hidden, &namespace, nodes, file.as_deref()),
    }
}

/// Explicit flag wins; otherwise the environment, where unset behaves like an empty value
fn resolve_hidden_taints(flag: Option<&str>) -> nodereason_core::Result<HiddenTaints> {
    match flag {
        Some(value) => Ok(HiddenTaints::parse(value)),
        None => HiddenTaints::from_env(),
    }
}

/// Print ranked reasons, one per line
fn run_rank(file: Option<&Path>) -> miette::Result<()> {
    let counts: HashMap<String, u64> = match file {
        Some(path) => load_counts(path)?,
        None => counts_from_json(&read_stdin()?)?,
    };

    let mut reasons = Reasons::from_counts(&counts);
    for line in reasons.to_sorted_strings() {
        println!("{}", line);
    }

    Ok(())
}

fn run_check_taint(hidden: &HiddenTaints, namespace: &str, key: &str) {
    let visibility = if hidden.is_hidden_taint(namespace, key) {
        "hidden"
    } else {
        "visible"
    };
    debug!(namespace, key, visibility, "Checked taint visibility");
    println!("{}", visibility);
}

/// Print the aggregated availability message for a list of node failures
fn run_summarize(
    hidden: &HiddenTaints,
    namespace: &str,
    nodes: usize,
    file: Option<&Path>,
) -> miette::Result<()> {
    let failures = match file {
        Some(path) => load_failures(path)?,
        None => parse_failures(&read_stdin()?, false)?,
    };

    let mut summary = FailureSummary::new(namespace, hidden);
    for failure in &failures {
        match failure {
            NodeFailure::Taint { taint } => summary.record_untolerated_taint(taint),
            NodeFailure::Message { message } => summary.record(message.as_str()),
        }
    }

    info!(failures = failures.len(), nodes, "Summarized node failures");
    println!("{}", summary.message(nodes));

    Ok(())
}

fn load_failures(path: &Path) -> nodereason_core::Result<Vec<NodeFailure>> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| ReasonError::read_error(path.display().to_string(), e))?;
    parse_failures(&data, is_yaml(path))
}

fn parse_failures(data: &str, yaml: bool) -> nodereason_core::Result<Vec<NodeFailure>> {
    if yaml {
        serde_yaml::from_str(data).map_err(|e| ReasonError::parse_error("YAML", e.to_string()))
    } else {
        serde_json::from_str(data).map_err(|e| ReasonError::parse_error("JSON", e.to_string()))
    }
}

fn read_stdin() -> miette::Result<String> {
    let mut data = String::new();
    std::io::stdin()
        .read_to_string(&mut data)
        .map_err(|e| ReasonError::read_error("stdin", e))?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_failures_json() {
        let failures = parse_failures(
            r#"[
                {"message": "Insufficient cpu"},
                {"taint": {"key": "example.com/reserved", "value": "true", "effect": "NoSchedule"}}
            ]"#,
            false,
        )
        .unwrap();

        assert_eq!(failures.len(), 2);
        assert!(matches!(&failures[0], NodeFailure::Message { message } if message == "Insufficient cpu"));
        assert!(matches!(&failures[1], NodeFailure::Taint { taint } if taint.key == "example.com/reserved"));
    }

    #[test]
    fn test_parse_failures_yaml() {
        let failures = parse_failures(
            "- message: Insufficient memory\n- taint:\n    key: gpu\n    effect: NoSchedule\n",
            true,
        )
        .unwrap();

        assert_eq!(failures.len(), 2);
        assert!(matches!(&failures[1], NodeFailure::Taint { taint } if taint.value.is_none()));
    }

    #[test]
    fn test_parse_failures_reports_reason_error() {
        let err = parse_failures(r#"{"message": "not a list"}"#, false).unwrap_err();
        assert!(matches!(err, ReasonError::ParseError { ref format, .. } if format == "JSON"));

        let err = load_failures(Path::new("/nonexistent/failures.json")).unwrap_err();
        assert!(matches!(err, ReasonError::ReadError { .. }));
    }

    #[test]
    fn test_hidden_taints_flag_overrides_environment() {
        let hidden = resolve_hidden_taints(Some("a,b")).unwrap();
        assert_eq!(hidden, HiddenTaints::from_keys(["a", "b"]));
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "nodereason",
            "--hidden-taints",
            "a,b",
            "check-taint",
            "--namespace",
            "tenant-acme",
            "--key",
            "a",
        ])
        .unwrap();

        assert_eq!(cli.hidden_taints.as_deref(), Some("a,b"));
        assert!(matches!(cli.command, Commands::CheckTaint { .. }));
    }
}
