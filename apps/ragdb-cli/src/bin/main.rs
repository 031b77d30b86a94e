use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use ragdb_core::chunker;
use ragdb_core::config::{Backend, Config, Settings};
use ragdb_core::logging;
use ragdb_core::traits::Embedder;
use ragdb_pipeline::RagService;

const USAGE: &str = "Usage: ragdb <ask|sources|chunk> [args...]
  ragdb ask [dir] <question> [--selected <text>] [--user <id>] [--json]
  ragdb sources [dir]
  ragdb chunk <file>";

struct AskArgs {
    dir: Option<PathBuf>,
    question: String,
    selected: Option<String>,
    user: Option<String>,
    json: bool,
}

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("{USAGE}");
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn parse_ask(args: &[String]) -> anyhow::Result<AskArgs> {
    let mut positional = Vec::new();
    let mut selected = None;
    let mut user = None;
    let mut json = false;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--selected" | "-s" => {
                i += 1;
                selected = Some(args.get(i).cloned().context("--selected requires a value")?);
            }
            "--user" | "-u" => {
                i += 1;
                user = Some(args.get(i).cloned().context("--user requires a value")?);
            }
            "--json" => json = true,
            _ => positional.push(args[i].clone()),
        }
        i += 1;
    }
    let (dir, question) = match positional.as_slice() {
        [question] => (None, question.clone()),
        [dir, question] => (Some(PathBuf::from(dir)), question.clone()),
        _ => bail!("{USAGE}"),
    };
    Ok(AskArgs { dir, question, selected, user, json })
}

fn build<E: Embedder>(service: RagService<E>, config: &Config, dir: Option<PathBuf>) -> anyhow::Result<RagService<E>> {
    let dir = match dir {
        Some(dir) => dir,
        None => config.docs_dir()?,
    };
    let counts = service.index_directory(&dir).with_context(|| format!("indexing {}", dir.display()))?;
    if counts.is_empty() {
        eprintln!("No documents found in {}", dir.display());
    }
    Ok(service)
}

async fn run<E: Embedder>(service: RagService<E>, config: &Config, cmd: &str, args: &[String]) -> anyhow::Result<()> {
    match cmd {
        "ask" => {
            let ask = parse_ask(args)?;
            let service = build(service, config, ask.dir)?;
            let answer = service.query(&ask.question, ask.selected.as_deref(), ask.user.as_deref()).await;
            if ask.json {
                println!("{}", serde_json::to_string_pretty(&answer)?);
                return Ok(());
            }
            println!("{}", answer.response_text);
            if !answer.sources.is_empty() {
                println!("\nSources:");
                for source in &answer.sources {
                    println!("  - {source}");
                }
            }
        }
        "sources" => {
            let service = build(service, config, args.first().map(PathBuf::from))?;
            for source in service.list_sources() {
                println!("{source}");
            }
        }
        _ => bail!("Unknown command: {cmd}\n{USAGE}"),
    }
    Ok(())
}

fn print_chunks(settings: &Settings, args: &[String]) -> anyhow::Result<()> {
    let path = args.first().context("Usage: ragdb chunk <file>")?;
    let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let chars: Vec<char> = text.chars().collect();
    let spans = chunker::chunk_spans(&text, settings.chunking.chunk_size, settings.chunking.overlap)?;
    for (i, span) in spans.iter().enumerate() {
        let piece: String = chars[span.clone()].iter().collect();
        let marker = if piece.trim().is_empty() { " (blank, dropped)" } else { "" };
        println!("--- chunk {i} [{}..{}]{marker}", span.start, span.end);
        println!("{piece}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {e}");
        e
    })?;
    let settings = config.settings()?;
    logging::init(&settings.logging);
    let (cmd, args) = parse_args();

    if cmd == "chunk" {
        return print_chunks(&settings, &args);
    }
    match settings.retrieval.backend {
        Backend::Lexical => run(RagService::lexical(&settings)?, &config, &cmd, &args).await,
        Backend::Hashing => run(RagService::hashing(&settings)?, &config, &cmd, &args).await,
    }
}
