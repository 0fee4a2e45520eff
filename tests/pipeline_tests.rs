//! End-to-end pipeline tests: build -> index -> retrieve -> answer, with
//! stub model backends.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use svar::builder;
use svar::chat::ChatModel;
use svar::corpus::{self, Category, DocumentChunk};
use svar::embedding::Embedder;
use svar::error::Result;
use svar::indexer::Indexer;
use svar::rag::{AnswerEngine, Question, QuestionSet, Retriever};
use svar::rerank::EmbeddingReranker;
use svar::vector_store::{MemoryVectorStore, SearchFilter, VectorStore};

/// Deterministic embedder: a small bag-of-bytes vector per text.
struct HashEmbedder;

impl HashEmbedder {
    fn vector(text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; 8];
        for (i, b) in text.bytes().enumerate() {
            v[i % 8] += f32::from(b) / 255.0;
        }
        v
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(Self::vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        8
    }
}

/// Chat stub that proves it saw the context without calling anything.
struct EchoChat;

#[async_trait]
impl ChatModel for EchoChat {
    async fn complete(&self, _system: &str, user: &str, _temperature: f32) -> Result<String> {
        Ok(format!("answered from {} chars of prompt", user.len()))
    }
}

const FINANCE_SAMPLE: &str = "Acme Corp Annual Report 2024[sep]\nOperating income rose to 42 million.\n\n| quarter | income |\n|---------|--------|\n| Q1 | 10 |\n";

fn build_engine(store: Arc<dyn VectorStore>, top_n: usize) -> AnswerEngine {
    let embedder: Arc<dyn Embedder> = Arc::new(HashEmbedder);
    let reranker = Arc::new(EmbeddingReranker::new(embedder.clone()));
    let retriever = Retriever::new(store, embedder, reranker)
        .with_candidates(30)
        .with_top_n(top_n);
    AnswerEngine::new(retriever, Arc::new(EchoChat))
}

async fn index_documents(documents_dir: &Path, store: Arc<dyn VectorStore>) {
    let indexer = Indexer::new(Arc::new(HashEmbedder), store);
    indexer.index_all(documents_dir).await.unwrap();
}

#[test]
fn finance_smoke_two_chunks_share_header() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("900_annual.md"), FINANCE_SAMPLE).unwrap();

    let chunks = builder::build_finance(dir.path()).unwrap();
    assert_eq!(chunks.len(), 2);
    for chunk in &chunks {
        assert!(chunk.text.starts_with("Acme Corp Annual Report 2024\n"));
        assert_eq!(chunk.metadata.category, Category::Finance);
        assert_eq!(chunk.metadata.source, "900");
        assert!(!chunk.text.is_empty());
    }
    // Prose first, table second
    assert!(chunks[0].text.contains("Operating income"));
    assert!(chunks[1].text.contains("| Q1 | 10 |"));
}

#[test]
fn all_builders_emit_valid_categories_and_nonempty_text() {
    let root = tempfile::tempdir().unwrap();

    let finance_dir = root.path().join("finance");
    std::fs::create_dir(&finance_dir).unwrap();
    std::fs::write(finance_dir.join("1.md"), FINANCE_SAMPLE).unwrap();

    let insurance_dir = root.path().join("insurance");
    std::fs::create_dir_all(insurance_dir.join("polA")).unwrap();
    std::fs::write(
        insurance_dir.join("polA/terms.md"),
        "# Terms\n\nCoverage begins immediately.\n",
    )
    .unwrap();

    let faq_path = root.path().join("faq.json");
    std::fs::write(
        &faq_path,
        r#"{"5": [{"question": "Is there a fee?", "answers": ["No."]}]}"#,
    )
    .unwrap();

    let all: Vec<(Category, Vec<DocumentChunk>)> = vec![
        (Category::Finance, builder::build_finance(&finance_dir).unwrap()),
        (Category::Insurance, builder::build_insurance(&insurance_dir).unwrap()),
        (Category::Faq, builder::build_faq(&faq_path).unwrap()),
    ];

    for (expected, chunks) in all {
        assert!(!chunks.is_empty());
        for chunk in chunks {
            assert_eq!(chunk.metadata.category, expected);
            assert!(!chunk.text.is_empty());
        }
    }
}

#[tokio::test]
async fn indexer_stores_one_record_per_chunk() {
    let documents_dir = tempfile::tempdir().unwrap();
    let chunks = vec![
        DocumentChunk::new("alpha text", "1", Category::Finance),
        DocumentChunk::new("beta text", "1", Category::Finance),
        DocumentChunk::new("gamma text", "2", Category::Finance),
    ];
    corpus::write_chunks(documents_dir.path(), Category::Finance, &chunks).unwrap();

    let store = Arc::new(MemoryVectorStore::new());
    index_documents(documents_dir.path(), store.clone()).await;

    assert_eq!(store.record_count().await.unwrap(), chunks.len());
}

#[tokio::test]
async fn answers_map_qids_and_draw_documents_from_filtered_candidates() {
    let documents_dir = tempfile::tempdir().unwrap();

    let finance_chunks = vec![
        DocumentChunk::new("Revenue rose in 2024.", "10", Category::Finance),
        DocumentChunk::new("Costs fell in 2024.", "10", Category::Finance),
        DocumentChunk::new("Unrelated source text.", "99", Category::Finance),
    ];
    corpus::write_chunks(documents_dir.path(), Category::Finance, &finance_chunks).unwrap();

    let faq_chunks = vec![DocumentChunk::new(
        "How do I file a claim?\nOnline.",
        "3",
        Category::Faq,
    )];
    corpus::write_chunks(documents_dir.path(), Category::Faq, &faq_chunks).unwrap();

    let store = Arc::new(MemoryVectorStore::new());
    index_documents(documents_dir.path(), store.clone()).await;

    let json = r#"{
        "questions": [
            {"qid": 1, "query": "What happened to revenue?", "source": [10], "category": "finance"},
            {"qid": 2, "query": "How do I file a claim?", "source": ["3"], "category": "faq"},
            {"qid": 3, "query": "Anything?", "source": [777], "category": "faq"}
        ]
    }"#;
    let set: QuestionSet = serde_json::from_str(json).unwrap();

    let engine = build_engine(store.clone(), 4);

    for question in &set.questions {
        let answer = engine.answer(question).await.unwrap();

        // qid maps back to exactly one input question
        assert_eq!(
            set.questions.iter().filter(|q| q.qid == answer.qid).count(),
            1
        );

        // every listed document came from this question's filtered candidates
        let filter = SearchFilter::for_question(question.category, question.source.clone());
        let query_embedding = HashEmbedder::vector(&question.query);
        let candidates: Vec<String> = store
            .search(&query_embedding, &filter, 30)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.record.text)
            .collect();

        for document in answer.documents() {
            assert!(
                candidates.iter().any(|c| c == document),
                "qid {} listed a document outside its candidate set",
                answer.qid
            );
        }

        if question.qid == 3 {
            // filter matched nothing: canned reply, no documents
            assert!(answer.documents().is_empty());
            assert_eq!(answer.generate, "I don't know");
        } else {
            assert!(!answer.documents().is_empty());
            assert!(answer.generate.starts_with("answered from"));
        }
    }
}

#[tokio::test]
async fn fewer_than_four_candidates_leaves_trailing_slots_empty() {
    let documents_dir = tempfile::tempdir().unwrap();
    corpus::write_chunks(
        documents_dir.path(),
        Category::Faq,
        &[
            DocumentChunk::new("Only entry one.", "s", Category::Faq),
            DocumentChunk::new("Only entry two.", "s", Category::Faq),
        ],
    )
    .unwrap();

    let store = Arc::new(MemoryVectorStore::new());
    index_documents(documents_dir.path(), store.clone()).await;

    let engine = build_engine(store, 4);
    let question = Question {
        qid: 42,
        query: "entries?".to_string(),
        source: vec!["s".to_string()],
        category: Category::Faq,
    };

    let answer = engine.answer(&question).await.unwrap();
    assert_eq!(answer.documents().len(), 2);
    assert!(answer.document3.is_empty());
    assert!(answer.document4.is_empty());
}
