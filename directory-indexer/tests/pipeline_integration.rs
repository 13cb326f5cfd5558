//! Integration tests for the directory sync pipeline.
//!
//! These tests use the real Orchestrator but mock dependencies (directory
//! client, geocoder, and search provider) to ensure reliable testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use directory_api::MockDirectoryClient;
use directory_indexer::enricher::Enricher;
use directory_indexer::errors::SyncError;
use directory_indexer::fetcher::Fetcher;
use directory_indexer::orchestrator::Orchestrator;
use directory_indexer::writer::IndexWriter;
use directory_indexer_repository::{SearchIndexError, SearchIndexProvider};
use directory_indexer_shared::{EmployeeDocument, EmployeeRecord, GeoPoint};
use geocode::{Coordinates, MockGeocoder};

// Mock search provider for testing
struct MockSearchProvider {
    upserted_documents: Mutex<Vec<EmployeeDocument>>,
    recreate_calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl MockSearchProvider {
    fn new() -> Self {
        Self {
            upserted_documents: Mutex::new(Vec::new()),
            recreate_calls: AtomicUsize::new(0),
            unavailable: AtomicBool::new(false),
        }
    }

    fn with_unavailable() -> Self {
        let provider = Self::new();
        provider.unavailable.store(true, Ordering::SeqCst);
        provider
    }

    fn upserted(&self) -> Vec<EmployeeDocument> {
        self.upserted_documents.lock().unwrap().clone()
    }

    fn upserted_count(&self) -> usize {
        self.upserted_documents.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl SearchIndexProvider for MockSearchProvider {
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SearchIndexError::unavailable("mock engine unreachable"));
        }
        Ok(())
    }

    async fn recreate_index(&self) -> Result<(), SearchIndexError> {
        self.recreate_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn upsert_document(&self, document: &EmployeeDocument) -> Result<(), SearchIndexError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SearchIndexError::unavailable("mock engine unreachable"));
        }
        self.upserted_documents
            .lock()
            .unwrap()
            .push(document.clone());
        Ok(())
    }
}

fn record(id: &str, email: &str, office: Option<&str>) -> EmployeeRecord {
    let mut record = EmployeeRecord::new(id, "Test", "Person");
    record.email = Some(email.to_string());
    record.office_location = office.map(str::to_string);
    record
}

/// Helper to create a test orchestrator with mocked dependencies.
fn create_test_orchestrator(
    client: MockDirectoryClient,
    geocoder: Arc<MockGeocoder>,
) -> (Orchestrator, Arc<MockSearchProvider>) {
    let provider = Arc::new(MockSearchProvider::new());

    let fetcher = Fetcher::new(Arc::new(client));
    let enricher = Enricher::new(geocoder);
    let writer = IndexWriter::new(provider.clone());

    (Orchestrator::new(fetcher, enricher, writer), provider)
}

#[tokio::test]
async fn test_full_sync_resolves_coordinates() {
    let records = vec![record(
        "e42",
        "ada@example.com",
        Some("1600 Amphitheatre Pkwy, Mountain View, CA"),
    )];
    let geocoder = Arc::new(MockGeocoder::new());
    geocoder.register(
        "1600 Amphitheatre Pkwy, Mountain View, CA",
        Coordinates::new(37.422, -122.084),
    );

    let (mut orchestrator, provider) =
        create_test_orchestrator(MockDirectoryClient::with_records(records), geocoder);

    let summary = orchestrator.run().await.unwrap();

    assert_eq!(summary.records_fetched, 1);
    assert_eq!(summary.documents_written, 1);

    let documents = provider.upserted();
    assert_eq!(documents[0].document_id(), "e42");
    assert_eq!(
        documents[0].office_location.as_deref(),
        Some("1600 Amphitheatre Pkwy, Mountain View, CA")
    );
    assert_eq!(documents[0].location, Some(GeoPoint::new(37.422, -122.084)));
}

#[tokio::test]
async fn test_shared_address_is_geocoded_once() {
    let records = vec![
        record("e1", "a@example.com", Some("Rome, Italy")),
        record("e2", "b@example.com", Some("Rome, Italy")),
        record("e3", "c@example.com", Some("Rome, Italy")),
    ];
    let geocoder = Arc::new(MockGeocoder::new());
    geocoder.register("Rome, Italy", Coordinates::new(41.89, 12.49));

    let (mut orchestrator, provider) = create_test_orchestrator(
        MockDirectoryClient::with_records(records),
        geocoder.clone(),
    );

    let summary = orchestrator.run().await.unwrap();

    assert_eq!(geocoder.call_count(), 1);
    assert_eq!(summary.geocode_lookups, 1);
    assert_eq!(summary.geocode_cache_hits, 2);
    assert!(provider
        .upserted()
        .iter()
        .all(|doc| doc.location == Some(GeoPoint::new(41.89, 12.49))));
}

#[tokio::test]
async fn test_rerun_produces_identical_documents() {
    let records = vec![
        record("e1", "a@example.com", Some("Rome, Italy")),
        record("e2", "b@example.com", None),
    ];

    let mut serialized_runs = Vec::new();
    for _ in 0..2 {
        let geocoder = Arc::new(MockGeocoder::new());
        geocoder.register("Rome, Italy", Coordinates::new(41.89, 12.49));

        let (mut orchestrator, provider) = create_test_orchestrator(
            MockDirectoryClient::with_records(records.clone()),
            geocoder,
        );
        orchestrator.run().await.unwrap();

        let serialized: Vec<String> = provider
            .upserted()
            .iter()
            .map(|doc| serde_json::to_string(doc).unwrap())
            .collect();
        serialized_runs.push(serialized);
    }

    assert_eq!(serialized_runs[0], serialized_runs[1]);
}

#[tokio::test]
async fn test_unresolvable_address_is_not_fatal() {
    let records = vec![
        record("e1", "a@example.com", Some("Atlantis")),
        record("e2", "b@example.com", Some("Rome, Italy")),
    ];
    let geocoder = Arc::new(MockGeocoder::new());
    geocoder.register("Rome, Italy", Coordinates::new(41.89, 12.49));

    let (mut orchestrator, provider) =
        create_test_orchestrator(MockDirectoryClient::with_records(records), geocoder);

    let summary = orchestrator.run().await.unwrap();

    assert_eq!(summary.documents_written, 2);
    assert_eq!(summary.addresses_unresolved, 1);

    let documents = provider.upserted();
    assert!(documents[0].location.is_none());
    assert!(documents[1].location.is_some());
}

#[tokio::test]
async fn test_authentication_failure_aborts_before_any_write() {
    let records = vec![record("e1", "a@example.com", Some("Rome, Italy"))];
    let client = MockDirectoryClient::with_records(records).with_auth_failure();

    let (mut orchestrator, provider) =
        create_test_orchestrator(client, Arc::new(MockGeocoder::new()));

    let result = orchestrator.run().await;

    assert!(matches!(result, Err(SyncError::Directory(_))));
    assert_eq!(provider.upserted_count(), 0);
}

#[tokio::test]
async fn test_rate_limit_aborts_the_run() {
    let records = vec![
        record("e1", "a@example.com", Some("Rome, Italy")),
        record("e2", "b@example.com", Some("Paris, France")),
    ];
    let geocoder = Arc::new(MockGeocoder::new().with_rate_limit());

    let (mut orchestrator, provider) =
        create_test_orchestrator(MockDirectoryClient::with_records(records), geocoder);

    let result = orchestrator.run().await;

    assert!(matches!(result, Err(SyncError::Geocode(_))));
    assert_eq!(provider.upserted_count(), 0);
}

#[tokio::test]
async fn test_unavailable_index_aborts_the_run() {
    let records = vec![record("e1", "a@example.com", None)];
    let provider = Arc::new(MockSearchProvider::with_unavailable());

    let fetcher = Fetcher::new(Arc::new(MockDirectoryClient::with_records(records)));
    let enricher = Enricher::new(Arc::new(MockGeocoder::new()));
    let writer = IndexWriter::new(provider.clone());
    let mut orchestrator = Orchestrator::new(fetcher, enricher, writer);

    let result = orchestrator.run().await;

    assert!(matches!(result, Err(SyncError::SearchIndex(_))));
    assert_eq!(provider.upserted_count(), 0);
}

#[tokio::test]
async fn test_sync_walks_every_page() {
    let records: Vec<EmployeeRecord> = (1..=5)
        .map(|i| record(&format!("e{}", i), &format!("u{}@example.com", i), None))
        .collect();
    let client = MockDirectoryClient::with_records(records).with_page_size(2);

    let (mut orchestrator, provider) =
        create_test_orchestrator(client, Arc::new(MockGeocoder::new()));

    let summary = orchestrator.run().await.unwrap();

    assert_eq!(summary.records_fetched, 5);
    assert_eq!(summary.documents_written, 5);
    assert_eq!(provider.upserted_count(), 5);
}

#[tokio::test]
async fn test_email_filter_restricts_the_run() {
    let records = vec![
        record("e1", "a@example.com", None),
        record("e2", "b@example.com", None),
    ];
    let client = MockDirectoryClient::with_records(records)
        .with_email_filter(Some("b@example.com".to_string()));

    let (mut orchestrator, provider) =
        create_test_orchestrator(client, Arc::new(MockGeocoder::new()));

    let summary = orchestrator.run().await.unwrap();

    assert_eq!(summary.documents_written, 1);
    assert_eq!(provider.upserted()[0].document_id(), "e2");
}

#[tokio::test]
async fn test_recreate_index_flag_rebuilds_the_index() {
    let provider = Arc::new(MockSearchProvider::new());

    let fetcher = Fetcher::new(Arc::new(MockDirectoryClient::new()));
    let enricher = Enricher::new(Arc::new(MockGeocoder::new()));
    let writer = IndexWriter::new(provider.clone());
    let mut orchestrator =
        Orchestrator::new(fetcher, enricher, writer).with_recreate_index(true);

    orchestrator.run().await.unwrap();

    assert_eq!(provider.recreate_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_custom_fields_are_projected_into_documents() {
    let mut employee = record("e1", "a@example.com", None);
    employee
        .custom_fields
        .insert("team_name".to_string(), serde_json::json!("compilers"));

    let provider = Arc::new(MockSearchProvider::new());
    let fetcher = Fetcher::new(Arc::new(MockDirectoryClient::with_records(vec![employee])));
    let enricher = Enricher::new(Arc::new(MockGeocoder::new()));
    let writer = IndexWriter::new(provider.clone())
        .with_custom_fields(HashMap::from([("team_name".to_string(), "team".to_string())]));
    let mut orchestrator = Orchestrator::new(fetcher, enricher, writer);

    orchestrator.run().await.unwrap();

    assert_eq!(provider.upserted()[0].extra["team"], "compilers");
}
