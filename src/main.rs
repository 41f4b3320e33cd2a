// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use finsight::knowledge::samples::{BABA_TRANSCRIPT_ID, DEMO_INSTRUCTION};
use finsight::utils::logging::{
    format_error, format_info, format_speaker, format_success, format_warning,
};
use finsight::{
    AnalysisSession, Config, CredentialStore, DocumentCollection, DocumentLoader,
    DocumentSelection, HealthCheck, HealthReport, JsonExporter, NarrationDisplay, PipelineError,
    PipelineMode, PipelineOrchestrator, ProviderKind, TranscriptStore, Validator,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "finsight")]
#[command(version = "0.1.0")]
#[command(about = "Two-stage financial research assistant over a local knowledge base", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Session override for the primary (Gemini) API key
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Session override for the reasoning (chat-completions) API key
    #[arg(long, value_name = "KEY")]
    secondary_api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask one question against selected documents
    Ask {
        instruction: String,

        /// Document id to include (repeatable)
        #[arg(short, long = "doc", value_name = "ID")]
        docs: Vec<String>,

        #[arg(long)]
        all_docs: bool,

        #[arg(short, long, default_value = "simple")]
        mode: PipelineMode,
    },

    /// Run the investment memo walkthrough on the sample BABA transcript
    Demo {
        #[arg(short, long, default_value = "deep")]
        mode: PipelineMode,
    },

    /// Interactive analysis session
    Chat {
        #[arg(short, long, default_value = "simple")]
        mode: PipelineMode,

        #[arg(short, long = "doc", value_name = "ID")]
        docs: Vec<String>,
    },

    /// List the knowledge base
    Docs,

    /// Show credential and knowledge base health
    Status,

    /// Export the saved transcript as JSON
    Export {
        #[arg(short, long, default_value = "./exports")]
        output: PathBuf,

        #[arg(short, long)]
        pretty: bool,
    },
}

struct App {
    config: Arc<Config>,
    orchestrator: Arc<PipelineOrchestrator>,
    colored: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    finsight::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    info!("FinSight research assistant");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    let app = build_app(&cli, config).context("Failed to initialise knowledge base")?;

    match cli.command {
        Commands::Ask {
            instruction,
            docs,
            all_docs,
            mode,
        } => {
            let selection = resolve_selection(&app, &docs, all_docs).await?;
            cmd_ask(&app, &instruction, &selection, mode).await?;
        }
        Commands::Demo { mode } => {
            let selection = DocumentSelection::from_ids([BABA_TRANSCRIPT_ID]);
            cmd_ask(&app, DEMO_INSTRUCTION, &selection, mode).await?;
        }
        Commands::Chat { mode, docs } => {
            let selection = resolve_selection(&app, &docs, false).await?;
            cmd_chat(&app, selection, mode).await?;
        }
        Commands::Docs => {
            cmd_docs(&app).await;
        }
        Commands::Status => {
            cmd_status(&app).await;
        }
        Commands::Export { output, pretty } => {
            cmd_export(&app, output, pretty).await?;
        }
    }

    Ok(())
}

fn build_app(cli: &Cli, config: Config) -> Result<App> {
    let config = Arc::new(config);

    let credentials = Arc::new(CredentialStore::from_config(&config));
    if let Some(key) = &cli.api_key {
        credentials.set_override(ProviderKind::Primary, key);
    }
    if let Some(key) = &cli.secondary_api_key {
        credentials.set_override(ProviderKind::Secondary, key);
    }

    let documents = DocumentLoader::new(config.knowledge.clone()).load_knowledge_base()?;
    info!("Knowledge base ready with {} documents", documents.len());

    let orchestrator = PipelineOrchestrator::from_config(
        Arc::clone(&config),
        credentials,
        Arc::new(RwLock::new(documents)),
    );

    Ok(App {
        config,
        orchestrator: Arc::new(orchestrator),
        colored: cli.color,
    })
}

async fn resolve_selection(app: &App, ids: &[String], all: bool) -> Result<DocumentSelection> {
    let documents = app.orchestrator.documents().read().await;
    if all {
        return Ok(DocumentSelection::from_ids(documents.ids()));
    }
    selection_from_ids(&documents, ids.iter().map(String::as_str))
}

fn selection_from_ids<'a>(
    documents: &DocumentCollection,
    ids: impl IntoIterator<Item = &'a str>,
) -> Result<DocumentSelection> {
    let mut selection = DocumentSelection::new();
    for id in ids {
        if documents.get(id).is_none() {
            return Err(PipelineError::UnknownDocument(id.to_string()))
                .context("Run `finsight docs` to list available ids");
        }
        selection.insert(id);
    }
    Ok(selection)
}

async fn cmd_ask(
    app: &App,
    instruction: &str,
    selection: &DocumentSelection,
    mode: PipelineMode,
) -> Result<()> {
    let store = TranscriptStore::new(&app.config.transcript.path);
    let transcript = store.load().await.context("Failed to load transcript")?;
    let mut session = AnalysisSession::with_transcript(Arc::clone(&app.orchestrator), transcript);

    exchange(app, &mut session, instruction, selection, mode).await?;

    store
        .save(session.transcript())
        .await
        .context("Failed to save transcript")?;
    Ok(())
}

async fn exchange(
    app: &App,
    session: &mut AnalysisSession,
    instruction: &str,
    selection: &DocumentSelection,
    mode: PipelineMode,
) -> Result<()> {
    println!("{} {}", format_speaker(true), instruction.trim());

    let display = (mode == PipelineMode::Deep).then(|| {
        NarrationDisplay::spawn(app.orchestrator.narrator().subscribe(), app.colored)
    });
    let sent = session.send(instruction, selection, mode).await;
    if let Some(display) = display {
        display.finish();
    }

    match sent {
        Ok(reply) => println!("{} {}\n", format_speaker(false), reply.text),
        Err(PipelineError::Validation(msg)) => {
            eprintln!("{}", format_warning(&msg));
        }
        Err(e) => return Err(e).context("Analysis request failed"),
    }
    Ok(())
}

async fn cmd_chat(app: &App, mut selection: DocumentSelection, mut mode: PipelineMode) -> Result<()> {
    let store = TranscriptStore::new(&app.config.transcript.path);
    let transcript = store.load().await.context("Failed to load transcript")?;
    let mut session = AnalysisSession::with_transcript(Arc::clone(&app.orchestrator), transcript);

    if let Some(last) = session.transcript().last() {
        println!("{} {}\n", format_speaker(false), last.text);
    }
    println!(
        "{}",
        format_info("Commands: /deep /simple /select id,.. /all /docs /key primary|secondary KEY /reload /stats /quit")
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix('/') {
            let (name, arg) = command.split_once(' ').unwrap_or((command, ""));
            match name {
                "quit" | "exit" => break,
                "deep" => {
                    mode = PipelineMode::Deep;
                    println!("{}", format_info("Deep analysis mode"));
                }
                "simple" => {
                    mode = PipelineMode::Simple;
                    println!("{}", format_info("Simple chat mode"));
                }
                "select" => {
                    let documents = app.orchestrator.documents().read().await;
                    let ids = Validator::parse_id_list(arg);
                    match selection_from_ids(&documents, ids.iter().map(String::as_str)) {
                        Ok(next) => {
                            selection = next;
                            println!(
                                "{}",
                                format_info(&format!("{} documents selected", selection.len()))
                            );
                        }
                        Err(e) => eprintln!("{}", format_error(&format!("{:#}", e))),
                    }
                }
                "all" => {
                    selection = DocumentSelection::from_ids(
                        app.orchestrator.documents().read().await.ids(),
                    );
                    println!(
                        "{}",
                        format_info(&format!("{} documents selected", selection.len()))
                    );
                }
                "docs" => print_documents(app, &selection).await,
                "key" => match arg.split_once(' ') {
                    Some(("primary", key)) => {
                        app.orchestrator
                            .credentials()
                            .set_override(ProviderKind::Primary, key);
                        println!("{}", format_success("Primary key updated for this session"));
                    }
                    Some(("secondary", key)) => {
                        app.orchestrator
                            .credentials()
                            .set_override(ProviderKind::Secondary, key);
                        println!(
                            "{}",
                            format_success("Reasoning key updated for this session")
                        );
                    }
                    _ => eprintln!("{}", format_warning("Usage: /key primary|secondary KEY")),
                },
                "reload" => {
                    app.orchestrator.credentials().reload(&app.config);
                    println!("{}", format_success("Credentials reloaded"));
                }
                "stats" => println!("{}", format_info(&app.orchestrator.stats().format())),
                other => eprintln!("{}", format_warning(&format!("Unknown command /{}", other))),
            }
            continue;
        }

        exchange(app, &mut session, line, &selection, mode).await?;
        store
            .save(session.transcript())
            .await
            .context("Failed to save transcript")?;
    }

    info!("Session stats: {}", app.orchestrator.stats().format());
    Ok(())
}

async fn cmd_docs(app: &App) {
    print_documents(app, &DocumentSelection::new()).await;
}

async fn print_documents(app: &App, selection: &DocumentSelection) {
    let documents = app.orchestrator.documents().read().await;
    if documents.is_empty() {
        println!("{}", format_warning("Knowledge base is empty"));
        return;
    }

    for doc in documents.iter() {
        let marker = if selection.contains(doc.id()) { "*" } else { " " };
        println!(
            "{} {:<22} {:<6} {}  {}",
            marker,
            doc.id(),
            doc.category(),
            doc.ingested_on(),
            doc.name()
        );
        if !doc.summary().is_empty() {
            println!("    {}", Validator::truncate_text(doc.summary(), 72));
        }
    }
}

async fn cmd_status(app: &App) {
    let snapshot = app.orchestrator.credentials().snapshot();
    let mut checks = HealthCheck::credentials(&snapshot, &app.config);
    checks.push(HealthCheck::knowledge_base(
        app.orchestrator.documents().read().await.len(),
    ));

    let report = HealthReport::new(checks, env!("CARGO_PKG_VERSION").to_string());
    println!("{}", report.format());
}

async fn cmd_export(app: &App, output: PathBuf, pretty: bool) -> Result<()> {
    let store = TranscriptStore::new(&app.config.transcript.path);
    let transcript = store.load().await.context("Failed to load transcript")?;

    let exporter = JsonExporter::new(output).context("Failed to prepare export directory")?;
    let manifest = exporter
        .export_transcript(&transcript, pretty)
        .await
        .context("Transcript export failed")?;

    println!(
        "{}",
        format_success(&format!(
            "Exported {} messages to {}",
            manifest.total_messages,
            exporter.output_dir().display()
        ))
    );
    Ok(())
}
