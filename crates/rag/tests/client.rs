use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hub_rag::cleanup::{clean_temporary_documents, FileOutcome};
use hub_rag::store::{DeleteOutcome, DocumentStore};
use hub_rag::{RagClient, RagConfig, RagError};

fn config(server: &MockServer) -> RagConfig {
    RagConfig {
        base_url: server.uri(),
        timeout_secs: 5,
    }
}

async fn mount_stats(server: &MockServer, total_chunks: u64) {
    Mock::given(method("GET"))
        .and(path("/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_chunks": total_chunks,
            "unique_documents": 2,
            "file_types": { "pdf": 1, "csv": 1 }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn connect_probes_stats() {
    let server = MockServer::start().await;
    mount_stats(&server, 7).await;

    let client = RagClient::connect(&config(&server)).await.unwrap();
    let stats = client.get_stats().await.unwrap();
    assert_eq!(stats.total_chunks, 7);
    assert_eq!(stats.file_types["pdf"], 1);
    client.shutdown();
}

#[tokio::test]
async fn connect_fails_when_service_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats"))
        .respond_with(ResponseTemplate::new(503).set_body_string("warming up"))
        .mount(&server)
        .await;

    let err = RagClient::connect(&config(&server)).await.err().unwrap();
    assert_matches!(err, RagError::ApiError { status: 503, ref body } if body == "warming up");
}

#[tokio::test]
async fn documents_listing_accepts_wrapped_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [
                { "content": "Budget", "metadata": { "filename": "report.pdf" } },
                { "metadata": { "filename": "tmpABC.csv", "chunk": 0 } }
            ]
        })))
        .mount(&server)
        .await;

    let client = RagClient::new(&config(&server)).unwrap();
    let docs = client.get_all_documents().await.unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[1].metadata.filename, "tmpABC.csv");
    assert_eq!(docs[1].content, None);
}

#[tokio::test]
async fn delete_maps_404_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/documents/tmpGONE.csv"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = RagClient::new(&config(&server)).unwrap();
    let outcome = client.delete_document("tmpGONE.csv").await.unwrap();
    assert_eq!(outcome, DeleteOutcome::not_found());
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let client = RagClient::new(&config(&server)).unwrap();
    assert_matches!(client.get_stats().await, Err(RagError::Decode(_)));
}

#[tokio::test]
async fn cleanup_over_http() {
    let server = MockServer::start().await;
    mount_stats(&server, 9).await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "content": "a", "metadata": { "filename": "report.pdf" } },
            { "content": "b", "metadata": { "filename": "tmpABC.csv" } },
            { "content": "c", "metadata": { "filename": "tmpABC.csv" } }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/documents/tmpABC.csv"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "success", "chunks_deleted": 2 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = RagClient::new(&config(&server)).unwrap();
    let report = clean_temporary_documents(&client, false).await.unwrap();

    assert_eq!(report.files.len(), 1);
    assert_eq!(report.files[0].filename, "tmpABC.csv");
    assert_eq!(report.files[0].outcome, FileOutcome::Deleted { chunks: 2 });
}
