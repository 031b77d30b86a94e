use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use ragdb_core::config::{Backend, Config};
use ragdb_core::data_processor::DataProcessor;
use ragdb_core::logging;
use ragdb_core::traits::Embedder;
use ragdb_core::types::Chunk;
use ragdb_pipeline::RagService;

fn main() -> anyhow::Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {e}");
        e
    })?;
    let settings = config.settings()?;
    logging::init(&settings.logging);

    let args: Vec<String> = env::args().skip(1).collect();
    let data_dir = match args.iter().find(|a| !a.starts_with('-')) {
        Some(dir) => PathBuf::from(dir),
        None => config.docs_dir()?,
    };
    println!("ragdb indexer\n=============");
    println!("Data directory: {}", data_dir.display());
    println!("Backend: {:?}, chunk_size {}, overlap {}", settings.retrieval.backend, settings.chunking.chunk_size, settings.chunking.overlap);

    let processor = DataProcessor::with_config(settings.chunking.clone())?;
    let chunks = processor.process_directory(&data_dir, &settings.data.extensions)?;
    let mut by_source: BTreeMap<String, Vec<Chunk>> = BTreeMap::new();
    for chunk in chunks {
        by_source.entry(chunk.source.clone()).or_default().push(chunk);
    }
    if by_source.is_empty() {
        println!("No documents to index");
        return Ok(());
    }

    // The index lives in memory; this run reports what a query process would hold.
    let total = match settings.retrieval.backend {
        Backend::Lexical => index_with_progress(&RagService::lexical(&settings)?, &by_source)?,
        Backend::Hashing => index_with_progress(&RagService::hashing(&settings)?, &by_source)?,
    };

    println!("\nIndexed {} chunks from {} sources:", total, by_source.len());
    for (source, chunks) in &by_source {
        println!("  {source}: {} chunks", chunks.len());
    }
    Ok(())
}

fn index_with_progress<E: Embedder>(service: &RagService<E>, by_source: &BTreeMap<String, Vec<Chunk>>) -> anyhow::Result<usize> {
    let pb = ProgressBar::new(by_source.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} sources ({percent}%) {msg}")?
            .progress_chars("#>-"),
    );
    let mut total = 0usize;
    for (source, chunks) in by_source {
        pb.set_message(source.clone());
        total += service.index_chunks(source, chunks)?.len();
        pb.inc(1);
    }
    pb.finish_with_message("done");
    Ok(total)
}
