//! Integration tests for the scrape and extract flows.
//!
//! These drive [`ExtractionService`] end to end with mock scrapers, a mock
//! model and a recording tracer:
//! 1. Backend selection and failure conversion
//! 2. Normalization of both backend shapes
//! 3. Prompt short-circuit and label validation
//! 4. Empty-answer remapping and safety refusals
//! 5. Span bookkeeping

use std::sync::Arc;

use extraction::{
    pipeline::{INFERENCE_SPAN, SCRAPE_SPAN},
    testing::{MockChatModel, MockScraper, RecordingTracer},
    ExtractionService, InferenceDispatcher, Outcome, ScrapeOrchestrator, ScraperBackend,
    SpanKind, SpanStatus, FAILURE_MARKER, NO_INFORMATION_EXTRACTED, NO_RELEVANT_INFORMATION,
    PROMPT_VERSION, SAFETY_REFUSAL,
};

const URL: &str = "https://shop.example.com/cat-food";
const GEMINI: &str = "gemini-2.5-flash-lite (google_genai)";

/// Helper to build a service from mocks, sharing one recording tracer.
fn service(
    scrapers: Vec<MockScraper>,
    model: MockChatModel,
) -> (ExtractionService, RecordingTracer) {
    let tracer = RecordingTracer::new();
    let mut orchestrator = ScrapeOrchestrator::new(Arc::new(tracer.clone()));
    for scraper in scrapers {
        orchestrator = orchestrator.with_scraper(Arc::new(scraper));
    }
    let dispatcher = InferenceDispatcher::new(Arc::new(model), Arc::new(tracer.clone()));
    (ExtractionService::new(orchestrator, dispatcher), tracer)
}

#[tokio::test]
async fn test_invalid_selector_never_reaches_a_backend() {
    let firecrawl = MockScraper::with_documents(["# Page"]);
    let crawl4ai = MockScraper::with_markdown(Some("# Page"));
    let (firecrawl_calls, crawl4ai_calls) = (firecrawl.call_log(), crawl4ai.call_log());
    let (service, tracer) = service(vec![firecrawl, crawl4ai], MockChatModel::canned("x"));

    for selector in ["Scrape with Selenium", "", "firecrawl2"] {
        let outcome = service.scrape(URL, selector).await;
        assert_eq!(outcome, Outcome::failure("Invalid scraper selected."));
    }

    assert!(firecrawl_calls.read().unwrap().is_empty());
    assert!(crawl4ai_calls.read().unwrap().is_empty());
    assert!(tracer.spans().is_empty());
}

#[tokio::test]
async fn test_backend_error_becomes_failure_with_marker() {
    let (service, tracer) = service(
        vec![MockScraper::failing(ScraperBackend::FireCrawl, "timeout")],
        MockChatModel::canned("x"),
    );

    let outcome = service.scrape(URL, "Scrape with FireCrawl").await;

    let message = outcome.message().expect("expected a failure");
    assert!(message.contains("timeout"), "{message}");
    assert!(message.starts_with("An error occurred while scraping with FireCrawl"));
    assert!(outcome.display().starts_with(FAILURE_MARKER));
    assert!(outcome.display().contains("timeout"));

    let spans = tracer.spans_named(SCRAPE_SPAN);
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].status, SpanStatus::Error);
    assert!(spans[0].output["error"].as_str().unwrap().contains("timeout"));
}

#[tokio::test]
async fn test_document_backend_concatenates_pages() {
    let (service, _) = service(
        vec![MockScraper::with_documents(["# One", "# Two"])],
        MockChatModel::canned("x"),
    );

    let outcome = service.scrape(URL, "Scrape with FireCrawl").await;

    assert_eq!(
        outcome.text(),
        Some("### Page 1\n# One\n\n--------------\n\n### Page 2\n# Two\n\n--------------\n\n")
    );
}

#[tokio::test]
async fn test_crawler_backend_returns_markdown_verbatim() {
    let (service, tracer) = service(
        vec![MockScraper::with_markdown(Some("# Cat food\n\n| Name | Price |"))],
        MockChatModel::canned("x"),
    );

    let outcome = service.scrape(URL, "crawl4ai").await;

    assert_eq!(outcome.text(), Some("# Cat food\n\n| Name | Price |"));
    let spans = tracer.spans_named(SCRAPE_SPAN);
    assert_eq!(spans[0].status, SpanStatus::Success);
    assert_eq!(spans[0].span.input["url"], URL);
    assert_eq!(spans[0].span.input["scraper"], "Scrape with Crawl4AI");
    assert_eq!(spans[0].output["markdown_char_count"], 28);
}

#[tokio::test]
async fn test_empty_scrapes_are_failures() {
    let (service, tracer) = service(
        vec![
            MockScraper::with_documents(Vec::<String>::new()),
            MockScraper::with_markdown(None),
        ],
        MockChatModel::canned("x"),
    );

    let firecrawl = service.scrape(URL, "Scrape with FireCrawl").await;
    assert_eq!(
        firecrawl.message(),
        Some("FireCrawl completed but returned no content. The page might be empty or inaccessible.")
    );

    let crawl4ai = service.scrape(URL, "Scrape with Crawl4AI").await;
    assert_eq!(
        crawl4ai.message(),
        Some("Crawl4AI completed but returned no content. The page might be empty or inaccessible.")
    );

    assert!(tracer
        .spans()
        .iter()
        .all(|s| s.status == SpanStatus::Empty));
}

#[tokio::test]
async fn test_repeated_scrapes_are_identical() {
    let (service, tracer) = service(
        vec![MockScraper::with_markdown(Some("# Stable"))],
        MockChatModel::canned("x"),
    );

    let first = service.scrape(URL, "Scrape with Crawl4AI").await;
    let second = service.scrape(URL, "Scrape with Crawl4AI").await;

    assert_eq!(first, second);
    assert_eq!(tracer.spans().len(), 2);
}

#[tokio::test]
async fn test_empty_source_text_skips_the_model() {
    let model = MockChatModel::canned("should not be used");
    let calls = model.call_log();
    let (service, tracer) = service(vec![], model);

    for query in ["find the price", "", "list every product"] {
        let outcome = service.extract(query, "", GEMINI).await;
        assert_eq!(outcome, Outcome::success(NO_RELEVANT_INFORMATION));
    }

    assert!(calls.read().unwrap().is_empty());
    assert!(tracer.spans().is_empty());
}

#[tokio::test]
async fn test_malformed_label_fails_before_the_model() {
    let model = MockChatModel::canned("x");
    let calls = model.call_log();
    let (service, _) = service(vec![], model);

    let outcome = service
        .extract("q", "context", "gemini-2.5-flash (google_genai")
        .await;

    assert_eq!(
        outcome.message(),
        Some("Invalid selection format: gemini-2.5-flash (google_genai")
    );
    assert!(calls.read().unwrap().is_empty());
}

#[tokio::test]
async fn test_label_is_routed_to_model_and_provider() {
    let model = MockChatModel::canned("| Name | Price |");
    let calls = model.call_log();
    let (service, tracer) = service(vec![], model);

    let outcome = service
        .extract("Find product name and price", "# Cat food $10", GEMINI)
        .await;

    assert_eq!(outcome.text(), Some("| Name | Price |"));

    let calls = calls.read().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model, "gemini-2.5-flash-lite");
    assert_eq!(calls[0].provider, "google_genai");
    assert!(calls[0].prompt.contains("# Cat food $10"));
    assert!(calls[0].prompt.contains("Find product name and price"));

    let spans = tracer.spans_named(INFERENCE_SPAN);
    assert_eq!(spans.len(), 1);
    assert_eq!(
        spans[0].span.kind,
        SpanKind::Generation {
            model: "gemini-2.5-flash-lite".into(),
            provider: "google_genai".into(),
        }
    );
    assert_eq!(spans[0].span.input["prompt_version"], PROMPT_VERSION);
    assert_eq!(spans[0].output["response_char_count"], 16);
}

#[tokio::test]
async fn test_empty_answer_is_remapped() {
    for reply in ["", "   \n"] {
        let (service, tracer) = service(vec![], MockChatModel::canned(reply));

        let outcome = service.extract("q", "some content", GEMINI).await;

        assert_eq!(outcome, Outcome::failure(NO_INFORMATION_EXTRACTED));
        // the model call itself succeeded
        assert_eq!(tracer.spans_named(INFERENCE_SPAN)[0].status, SpanStatus::Success);
    }
}

#[tokio::test]
async fn test_model_errors_become_failures() {
    let (service, tracer) = service(vec![], MockChatModel::failing("rate limited"));

    let outcome = service.extract("q", "content", GEMINI).await;

    assert_eq!(
        outcome.message(),
        Some("An error occurred during LLM extraction: rate limited")
    );
    assert_eq!(tracer.spans_named(INFERENCE_SPAN)[0].status, SpanStatus::Error);
}

#[tokio::test]
async fn test_unknown_provider_is_a_failure() {
    let (service, _) = service(vec![], MockChatModel::canned("x"));

    let outcome = service.extract("q", "content", "gpt-4o (openai)").await;

    assert_eq!(
        outcome.message(),
        Some("An error occurred during LLM extraction: Unknown model provider: openai")
    );
}

#[tokio::test]
async fn test_compliant_model_refuses_disallowed_queries() {
    let (service, _) = service(vec![], MockChatModel::prompt_compliant("| Name | Price |"));

    let refused = service
        .extract("find explicit adult content", "# Any page", GEMINI)
        .await;
    assert_eq!(refused.text(), Some(SAFETY_REFUSAL));

    let answered = service
        .extract("find the cheapest cat food", "# Any page", GEMINI)
        .await;
    assert_eq!(answered.text(), Some("| Name | Price |"));
}
