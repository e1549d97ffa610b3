use crate::build::{
    BuildError, BuildReport, CrossBuilder, DestinationPrompt, FixedDestination, Session, TargetArch,
    TargetOs, TargetRequest,
};
use crate::config::BuilderConfig;
use crate::generator::{resolve_endpoint, synthesize_project};
use crate::spec::{load_project, RouteTable};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Command-line interface for mocksmith
///
/// Compiles an endpoint project document into a standalone Go mock server
/// and cross-builds it with the bundled toolchain.
#[derive(Parser)]
#[command(name = "mocksmith", version)]
#[command(about = "Compile endpoint definitions into a standalone mock server", long_about = None)]
pub struct Cli {
    /// Builder config file (default: ./mocksmith.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Write main.go and go.mod for a project into a directory
    Compile {
        /// Project document (JSON or YAML)
        #[arg(short, long)]
        project: PathBuf,

        /// Output directory for the Go module
        #[arg(short, long)]
        out: PathBuf,

        /// Overwrite existing files
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },
    /// Print the route table a project compiles to
    Inspect {
        /// Project document (JSON or YAML)
        #[arg(short, long)]
        project: PathBuf,
    },
    /// Cross-build the mock server into a native executable
    Build {
        /// Project document (JSON or YAML)
        #[arg(short, long)]
        project: PathBuf,

        /// Executable path; prompts on stdin when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target OS (default: host)
        #[arg(long, value_enum)]
        os: Option<TargetOs>,

        /// Target architecture (default: host)
        #[arg(long, value_enum)]
        arch: Option<TargetArch>,

        /// Print the build report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

/// Asks for the executable path on the terminal.
///
/// An empty answer takes the suggested name in the working directory; end of
/// input cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinPrompt;

/// Turn a prompt answer into a destination. `None` input means end of input.
pub fn destination_from_answer(answer: Option<&str>, default_name: &str) -> Option<PathBuf> {
    let answer = answer?.trim();
    if answer.is_empty() {
        Some(PathBuf::from(default_name))
    } else {
        Some(PathBuf::from(answer))
    }
}

impl DestinationPrompt for StdinPrompt {
    fn choose_destination(&self, default_name: &str) -> Option<PathBuf> {
        eprint!("Save executable as [{default_name}]: ");
        if let Err(err) = io::stderr().flush() {
            tracing::debug!(error = %err, "Could not flush prompt");
        }
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => destination_from_answer(None, default_name),
            Ok(_) => destination_from_answer(Some(&line), default_name),
            Err(err) => {
                tracing::warn!(error = %err, "Could not read destination");
                None
            }
        }
    }
}

/// Render the route table the way `inspect` prints it.
pub fn describe_table(name: &str, table: &RouteTable) -> String {
    let mut text = format!(
        "📋 {name}: {} routes in {} paths\n",
        table.route_count(),
        table.groups.len()
    );
    for group in &table.groups {
        text.push_str(&group.path);
        text.push('\n');
        for (method, endpoint) in &group.methods {
            let resolved = resolve_endpoint(endpoint);
            text.push_str(&format!(
                "  {method:<7} {} {}",
                resolved.status, resolved.content_type
            ));
            if let Some(ms) = resolved.delay_ms {
                text.push_str(&format!(" (delay {ms}ms)"));
            }
            if !endpoint.description.is_empty() {
                text.push_str(&format!("  # {}", endpoint.description));
            }
            text.push('\n');
        }
    }
    for rejected in &table.rejected {
        text.push_str(&format!(
            "⚠️  refused {} {}: {}\n",
            rejected.method, rejected.path, rejected.reason
        ));
    }
    text
}

fn report_text(report: &BuildReport) -> String {
    match (&report.path, &report.err) {
        (Some(path), _) if report.ok => format!(
            "✅ Built {} (serves on port {} by default)",
            path.display(),
            report.port.unwrap_or_default()
        ),
        _ if report.is_cancelled() => "ℹ️  Build cancelled".to_string(),
        (_, Some(err)) => format!("❌ Build failed: {err}"),
        _ => "❌ Build failed".to_string(),
    }
}

fn compile(project: &Path, out_dir: &Path, force: bool, out: &mut dyn Write) -> anyhow::Result<()> {
    let project = load_project(project)?;
    let (table, program) = synthesize_project(&project)?;
    for rejected in &table.rejected {
        writeln!(
            out,
            "⚠️  Skipped {} {}: {}",
            rejected.method, rejected.path, rejected.reason
        )?;
    }
    for path in program.write_to(out_dir, force)? {
        writeln!(out, "✅ Wrote {}", path.display())?;
    }
    Ok(())
}

fn build(
    config: Option<&Path>,
    project: &Path,
    request: TargetRequest,
    output: Option<&Path>,
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<bool> {
    let loaded = BuilderConfig::load(config)
        .and_then(|config| Ok((config, load_project(project)?)));
    let (config, project) = match loaded {
        Ok(loaded) => loaded,
        // --json promises a report on stdout whatever goes wrong
        Err(err) if json => {
            let report = BuildReport::failed(BuildError::Setup {
                detail: format!("{err:#}"),
            });
            writeln!(out, "{}", serde_json::to_string(&report)?)?;
            return Ok(false);
        }
        Err(err) => return Err(err),
    };
    let builder = CrossBuilder::new(config);
    let mut session = Session::new(project);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let report = match output {
        Some(path) => {
            let prompt = FixedDestination(path.to_path_buf());
            runtime.block_on(builder.build(&mut session, request, &prompt))
        }
        None => runtime.block_on(builder.build(&mut session, request, &StdinPrompt)),
    };

    if json {
        writeln!(out, "{}", serde_json::to_string(&report)?)?;
    } else {
        writeln!(out, "{}", report_text(&report))?;
    }
    Ok(report.ok)
}

/// Execute a parsed command line, writing command output to `out`.
///
/// Returns `Ok(false)` when the command ran but did not succeed (a failed build).
pub fn execute(cli: Cli, out: &mut dyn Write) -> anyhow::Result<bool> {
    match cli.command {
        Commands::Compile {
            project,
            out: out_dir,
            force,
        } => {
            compile(&project, &out_dir, force, out)?;
            Ok(true)
        }
        Commands::Inspect { project } => {
            let document = load_project(&project)?;
            let table = crate::spec::compile_route_table(&document.endpoints);
            write!(out, "{}", describe_table(document.display_name(), &table))?;
            Ok(true)
        }
        Commands::Build {
            project,
            output,
            os,
            arch,
            json,
        } => build(
            cli.config.as_deref(),
            &project,
            TargetRequest { os, arch },
            output.as_deref(),
            json,
            out,
        ),
    }
}

/// Parse the process arguments and run the command against stdout.
pub fn run_cli() -> anyhow::Result<bool> {
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    execute(cli, &mut lock)
}
