//! fca-explore CLI: attribute exploration over formal contexts.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::Result;

use fca_explore::config::ExplorationConfig;
use fca_explore::context::Context;
use fca_explore::db::ExplorationDb;
use fca_explore::document::ContextDocument;
use fca_explore::error::{ExplorationError, ExpertError, FcaResult};
use fca_explore::expert::ConsoleExpert;
use fca_explore::exploration::{AttributeExploration, Step};

#[derive(Parser)]
#[command(name = "fca-explore", version, about = "Attribute exploration for formal contexts")]
struct Cli {
    /// Exploration config (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Treat the context as partial, keeping unknown entries undecided.
    #[arg(long, global = true)]
    partial: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the implications of a context not entailed by its background.
    Basis {
        /// Context document (JSON).
        #[arg(long)]
        context: PathBuf,
    },

    /// Explore a context interactively on stdin/stdout.
    Explore {
        /// Context document (JSON).
        #[arg(long)]
        context: PathBuf,

        /// Where to write the explored context document.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    // stdout carries the session; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ExplorationConfig::load(path)?,
        None => ExplorationConfig::default(),
    };

    match cli.command {
        Commands::Basis { context } => {
            let doc = ContextDocument::load(&context)?;
            if cli.partial {
                print_basis(doc.to_partial()?, &doc, &config)?;
            } else {
                print_basis(doc.to_formal()?, &doc, &config)?;
            }
        }

        Commands::Explore { context, output } => {
            let doc = ContextDocument::load(&context)?;
            if cli.partial {
                explore(doc.to_partial()?, &doc, config, output.as_deref())?;
            } else {
                explore(doc.to_formal()?, &doc, config, output.as_deref())?;
            }
        }
    }

    Ok(())
}

fn open_db<C: Context>(
    context: C,
    doc: &ContextDocument,
    config: &ExplorationConfig,
) -> FcaResult<ExplorationDb<C>> {
    Ok(ExplorationDb::new(
        context,
        doc.background.clone(),
        config.premise_filter(),
    )?)
}

fn print_basis<C: Context>(
    context: C,
    doc: &ContextDocument,
    config: &ExplorationConfig,
) -> FcaResult<()> {
    let db = open_db(context, doc, config)?;
    let open = db.open_implications();
    for implication in &open {
        println!("{implication}");
    }
    println!(
        "{} open implication(s) over {} object(s) and {} attribute(s)",
        open.len(),
        db.objects().len(),
        db.attributes().len()
    );
    Ok(())
}

/// Errors after which the session can go on with the next question.
fn is_recoverable(err: &ExplorationError) -> bool {
    matches!(
        err,
        ExplorationError::NotCounterexample { .. }
            | ExplorationError::NotUniqueObjectName { .. }
            | ExplorationError::IllegalContextModification { .. }
            | ExplorationError::Context(_)
            | ExplorationError::Expert(ExpertError::Malformed { .. })
    )
}

fn explore<C: Context>(
    context: C,
    doc: &ContextDocument,
    config: ExplorationConfig,
    output: Option<&Path>,
) -> FcaResult<()> {
    let db = open_db(context, doc, &config)?;
    let stdin = std::io::stdin();
    let expert = ConsoleExpert::new(stdin.lock(), std::io::stdout());
    let mut exploration = AttributeExploration::with_config(db, expert, config);

    loop {
        match exploration.step() {
            Ok(Some(Step::Confirmed(implication))) => println!("confirmed {implication}"),
            Ok(Some(Step::Rejected {
                implication,
                examples,
            })) => println!("refuted {implication} with {examples} example(s)"),
            Ok(None) => break,
            Err(err) if is_recoverable(&err) => {
                eprintln!("{:?}", miette::Report::new(err));
                continue;
            }
            Err(err) => return Err(err.into()),
        }
    }

    let steps = exploration.steps();
    let db = exploration.into_db();
    let base = db.base();
    println!("Exploration complete after {steps} step(s). Confirmed implications:");
    for implication in &base {
        println!("  {implication}");
    }

    if let Some(path) = output {
        ContextDocument::from_context(db.context(), &base).save(path)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}
