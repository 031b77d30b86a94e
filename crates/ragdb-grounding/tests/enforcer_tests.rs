use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ragdb_core::data_processor::{ChunkingConfig, DataProcessor};
use ragdb_core::error::{GenerationError, Result};
use ragdb_core::traits::{Generator, SearchEngine};
use ragdb_core::types::{Chunk, GroundingRequest, SearchResult};
use ragdb_grounding::generator::UnavailableGenerator;
use ragdb_grounding::prompt::{NO_RELEVANT_INFORMATION, SYSTEM_PROMPT};
use ragdb_grounding::GroundingEnforcer;
use ragdb_index::SimilarityIndex;

/// Delegates to a real index and counts searches.
struct CountingSearch {
    inner: SimilarityIndex<ragdb_embed::LexicalEmbedder>,
    searches: AtomicUsize,
}

impl CountingSearch {
    fn with_fox_and_dog() -> Arc<Self> {
        let inner = SimilarityIndex::lexical();
        let chunks = DataProcessor::with_config(ChunkingConfig { chunk_size: 20, overlap: 5 })
            .unwrap()
            .process_document("The quick fox jumps. The lazy dog sleeps.", "d1")
            .unwrap();
        inner.store(&chunks).unwrap();
        Arc::new(Self { inner, searches: AtomicUsize::new(0) })
    }

    fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

impl SearchEngine for CountingSearch {
    fn store(&self, chunks: &[Chunk]) -> Result<()> {
        self.inner.store(chunks)
    }

    fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.inner.search(query, limit)
    }

    fn all_sources(&self) -> BTreeSet<String> {
        self.inner.all_sources()
    }

    fn delete(&self, source: &str) -> Result<()> {
        self.inner.delete(source).map(|_| ())
    }
}

#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<(String, String)>>>,
}

enum Behaviour {
    Answer(&'static str),
    Fail,
    Hang,
}

struct ScriptedGenerator {
    recorder: Recorder,
    behaviour: Behaviour,
}

#[async_trait]
impl Generator for ScriptedGenerator {
    fn is_available(&self) -> bool {
        true
    }

    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> std::result::Result<String, GenerationError> {
        self.recorder.calls.fetch_add(1, Ordering::SeqCst);
        self.recorder.prompts.lock().unwrap().push((system_prompt.to_string(), user_prompt.to_string()));
        match self.behaviour {
            Behaviour::Answer(text) => Ok(text.to_string()),
            Behaviour::Fail => Err(GenerationError::Api { status: 503, message: "overloaded".to_string() }),
            Behaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok("too late".to_string())
            }
        }
    }
}

fn scripted(behaviour: Behaviour) -> (Box<dyn Generator>, Recorder) {
    let recorder = Recorder::default();
    (Box::new(ScriptedGenerator { recorder: recorder.clone(), behaviour }), recorder)
}

#[tokio::test]
async fn indexed_mode_grounds_answer_in_retrieved_chunks() {
    let search = CountingSearch::with_fox_and_dog();
    let (generator, recorder) = scripted(Behaviour::Answer("The fox jumps."));
    let enforcer = GroundingEnforcer::new(Arc::clone(&search), generator);

    let answer = enforcer.answer(&GroundingRequest::from_message("fox", None)).await;

    assert_eq!(answer.response_text, "The fox jumps.");
    assert_eq!(answer.sources, vec!["d1"]);
    assert_eq!(search.searches(), 1);
    let prompts = recorder.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].0, SYSTEM_PROMPT);
    assert!(prompts[0].1.contains("Source: d1\nContent: The quick fox jumps."));
    assert!(prompts[0].1.contains("Question: fox"));
}

#[tokio::test]
async fn empty_search_short_circuits_generation() {
    let search = CountingSearch::with_fox_and_dog();
    let (generator, recorder) = scripted(Behaviour::Answer("should not be used"));
    let enforcer = GroundingEnforcer::new(Arc::clone(&search), generator);

    let answer = enforcer.answer(&GroundingRequest::from_message("elephant", None)).await;

    assert_eq!(answer.response_text, NO_RELEVANT_INFORMATION);
    assert!(answer.sources.is_empty());
    assert_eq!(recorder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn restricted_mode_never_searches() {
    let search = CountingSearch::with_fox_and_dog();
    let (generator, recorder) = scripted(Behaviour::Answer("Only the passage."));
    let enforcer = GroundingEnforcer::new(Arc::clone(&search), generator);

    let request = GroundingRequest::from_message("what sleeps?", Some("The lazy dog sleeps."));
    let answer = enforcer.answer(&request).await;

    assert_eq!(search.searches(), 0);
    assert_eq!(answer.sources, vec!["selected_text"]);
    assert_eq!(answer.response_text, "Only the passage.");
    let prompts = recorder.prompts.lock().unwrap();
    assert!(prompts[0].1.contains("The lazy dog sleeps."));
    assert!(!prompts[0].1.contains("Source: d1"));
}

#[tokio::test]
async fn restricted_mode_with_empty_selection_still_generates() {
    let search = CountingSearch::with_fox_and_dog();
    let (generator, recorder) = scripted(Behaviour::Answer("Nothing was selected."));
    let enforcer = GroundingEnforcer::new(Arc::clone(&search), generator);

    let answer = enforcer.answer(&GroundingRequest::from_message("fox", Some(""))).await;

    assert_eq!(recorder.calls.load(Ordering::SeqCst), 1);
    assert_eq!(search.searches(), 0);
    assert_eq!(answer.sources, vec!["selected_text"]);
}

#[tokio::test]
async fn generation_failure_becomes_apology_without_sources() {
    let search = CountingSearch::with_fox_and_dog();
    let (generator, _) = scripted(Behaviour::Fail);
    let enforcer = GroundingEnforcer::new(search, generator);

    let answer = enforcer.answer(&GroundingRequest::from_message("fox", None)).await;

    assert!(answer.response_text.starts_with("Sorry, I encountered an error"));
    assert!(answer.response_text.contains("503"));
    assert!(answer.sources.is_empty());
}

#[tokio::test]
async fn generation_timeout_is_a_generation_failure() {
    let search = CountingSearch::with_fox_and_dog();
    let (generator, _) = scripted(Behaviour::Hang);
    let enforcer = GroundingEnforcer::new(search, generator).with_timeout(Duration::from_millis(50));

    let answer = enforcer.answer(&GroundingRequest::from_message("fox", None)).await;

    assert!(answer.response_text.contains("timed out"));
    assert!(answer.sources.is_empty());
}

#[tokio::test]
async fn unavailable_model_yields_labelled_placeholder_with_real_sources() {
    let search = CountingSearch::with_fox_and_dog();
    let enforcer = GroundingEnforcer::new(search, Box::new(UnavailableGenerator));

    let answer = enforcer.answer(&GroundingRequest::from_message("dog", None)).await;

    assert!(answer.response_text.starts_with("[placeholder"));
    assert_eq!(answer.sources, vec!["d1"]);
}

#[tokio::test]
async fn empty_query_is_reported_not_raised() {
    let search = CountingSearch::with_fox_and_dog();
    let (generator, recorder) = scripted(Behaviour::Answer("unused"));
    let enforcer = GroundingEnforcer::new(search, generator);

    let answer = enforcer.answer(&GroundingRequest::from_message("   ", None)).await;

    assert!(answer.response_text.contains("Search query cannot be empty"));
    assert!(answer.sources.is_empty());
    assert_eq!(recorder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn limit_bounds_the_context() {
    let search = CountingSearch::with_fox_and_dog();
    let extra: Vec<Chunk> = (0..10)
        .map(|i| {
            let content = format!("dog fact number {i}");
            Chunk {
                id: ragdb_core::data_processor::chunk_id("facts", i, &content),
                fingerprint: ragdb_core::data_processor::fingerprint(&content),
                content,
                source: "facts".to_string(),
                chunk_index: i,
                total_chunks: 10,
            }
        })
        .collect();
    search.store(&extra).unwrap();
    let (generator, recorder) = scripted(Behaviour::Answer("ok"));
    let enforcer = GroundingEnforcer::new(Arc::clone(&search), generator).with_limit(2);

    let answer = enforcer.answer(&GroundingRequest::from_message("dog", None)).await;

    assert_eq!(answer.sources, vec!["d1"]);
    let prompts = recorder.prompts.lock().unwrap();
    assert_eq!(prompts[0].1.matches("Source: ").count(), 2);
}
