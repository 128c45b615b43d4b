#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use cmd::Session;
use kiln_core::config::resolve_config;
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "kiln: artifact dependency graphs and rebuild planning",
    long_about = None
)]
struct Cli {
    /// Path to the build manifest, relative to the current directory.
    /// Overrides `manifest.path` in .kiln/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Validate",
        about = "Check the dependency graph for cycles",
        long_about = "Load the manifest and fail if any artifact transitively depends on itself.",
        after_help = "EXAMPLES:\n    # Validate kiln.toml in the current directory\n    kiln check\n\n    # Validate another manifest\n    kiln check --manifest build/deps.toml\n\n    # Emit machine-readable output\n    kiln check --json"
    )]
    Check(cmd::check::CheckArgs),

    #[command(
        next_help_heading = "Query",
        about = "List transitive dependencies",
        long_about = "List everything the given artifacts are built from, directly or not.",
        after_help = "EXAMPLES:\n    # Everything index.html is built from\n    kiln deps site/index.html\n\n    # Emit machine-readable output\n    kiln deps site/index.html --json"
    )]
    Deps(cmd::deps::DepsArgs),

    #[command(
        next_help_heading = "Query",
        about = "List transitive dependents",
        long_about = "List every artifact that depends on the given artifacts, directly or not.",
        after_help = "EXAMPLES:\n    # Everything affected by the base template\n    kiln dependents templates/base.html\n\n    # Emit machine-readable output\n    kiln dependents templates/base.html --json"
    )]
    Dependents(cmd::dependents::DependentsArgs),

    #[command(
        next_help_heading = "Query",
        about = "Plan a rebuild after changes",
        long_about = "Compute the artifacts to rebuild: the changed ones plus all their dependents.",
        after_help = "EXAMPLES:\n    # What to rebuild after editing a template\n    kiln plan templates/page.html\n\n    # Several changes at once\n    kiln plan content/index.md content/about.md --json"
    )]
    Plan(cmd::plan::PlanArgs),

    #[command(
        next_help_heading = "Query",
        about = "Print the reversed graph",
        long_about = "Print each dependency followed by the artifacts that directly depend on it.",
        after_help = "EXAMPLES:\n    # Print dependency: dependents lines\n    kiln reverse\n\n    # Emit machine-readable output\n    kiln reverse --json"
    )]
    Reverse(cmd::reverse::ReverseArgs),

    #[command(
        next_help_heading = "Query",
        about = "Show one artifact",
        long_about = "Show an artifact's direct dependencies, direct dependents, and metadata.",
        after_help = "EXAMPLES:\n    # Show an artifact\n    kiln show site/index.html\n\n    # Emit machine-readable output\n    kiln show site/index.html --json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Export",
        about = "Export the graph as Graphviz DOT",
        long_about = "Render the dependency graph in Graphviz DOT format.",
        after_help = "EXAMPLES:\n    # Print DOT to stdout\n    kiln dot | dot -Tsvg > deps.svg\n\n    # Write to a file\n    kiln dot --output deps.dot"
    )]
    Dot(cmd::dot::DotArgs),

    #[command(
        next_help_heading = "Export",
        about = "Print the graph content hash",
        long_about = "Print a stable blake3 hash of the artifact names and edges.",
        after_help = "EXAMPLES:\n    # Detect graph changes between runs\n    kiln hash\n\n    # Emit machine-readable output\n    kiln hash --json"
    )]
    Hash(cmd::hash::HashArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    kiln completions bash\n\n    # Generate zsh completions\n    kiln completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("KILN_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "kiln=debug,info"
        } else {
            "kiln=info,warn"
        })
    });

    let format = env::var("KILN_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    if cli.verbose {
        info!("verbose mode enabled");
    }

    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let project_root = env::current_dir()?;
    let config = resolve_config(&project_root, cli.json)?;
    let session = Session {
        output: OutputMode::from_config(&config.resolved_output),
        project_root,
        manifest_override: cli.manifest.clone(),
        config,
        quiet: cli.quiet,
    };

    match &cli.command {
        Commands::Check(args) => cmd::check::run_check(args, &session),
        Commands::Deps(args) => cmd::deps::run_deps(args, &session),
        Commands::Dependents(args) => cmd::dependents::run_dependents(args, &session),
        Commands::Plan(args) => cmd::plan::run_plan(args, &session),
        Commands::Reverse(args) => cmd::reverse::run_reverse(args, &session),
        Commands::Show(args) => cmd::show::run_show(args, &session),
        Commands::Dot(args) => cmd::dot::run_dot(args, &session),
        Commands::Hash(args) => cmd::hash::run_hash(args, &session),
        // Handled above; needs no manifest.
        Commands::Completions(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn json_flag_before_subcommand() {
        let cli = Cli::parse_from(["kiln", "--json", "check"]);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Check(_)));
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["kiln", "hash", "--json"]);
        assert!(cli.json);
    }

    #[test]
    fn manifest_flag_is_global() {
        let cli = Cli::parse_from(["kiln", "check", "--manifest", "build/deps.toml"]);
        assert_eq!(cli.manifest, Some(PathBuf::from("build/deps.toml")));
    }

    #[test]
    fn quiet_and_verbose_flags_parse() {
        let cli = Cli::parse_from(["kiln", "-q", "-v", "check"]);
        assert!(cli.quiet);
        assert!(cli.verbose);
    }

    #[test]
    fn deps_takes_several_artifacts() {
        let cli = Cli::parse_from(["kiln", "deps", "a.html", "b.html"]);
        match cli.command {
            Commands::Deps(args) => assert_eq!(args.artifacts, ["a.html", "b.html"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn deps_requires_an_artifact() {
        assert!(Cli::try_parse_from(["kiln", "deps"]).is_err());
        assert!(Cli::try_parse_from(["kiln", "dependents"]).is_err());
        assert!(Cli::try_parse_from(["kiln", "plan"]).is_err());
    }

    #[test]
    fn dot_output_flag_parses() {
        let cli = Cli::parse_from(["kiln", "dot", "-o", "deps.dot"]);
        match cli.command {
            Commands::Dot(args) => assert_eq!(args.output, Some(PathBuf::from("deps.dot"))),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn completions_subcommand_parses() {
        let cli = Cli::parse_from(["kiln", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Commands::Completions(cmd::completions::CompletionsArgs {
                shell: clap_complete::Shell::Bash,
            })
        ));
    }

    #[test]
    fn all_subcommands_listed() {
        let subcommands = [
            vec!["kiln", "check"],
            vec!["kiln", "deps", "x"],
            vec!["kiln", "dependents", "x"],
            vec!["kiln", "plan", "x"],
            vec!["kiln", "reverse"],
            vec!["kiln", "show", "x"],
            vec!["kiln", "dot"],
            vec!["kiln", "hash"],
            vec!["kiln", "completions", "zsh"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(
                result.is_ok(),
                "Failed to parse: {:?} error: {:?}",
                args,
                result.err()
            );
        }
    }
}
