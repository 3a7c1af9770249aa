//! Neo4j store tests against a mocked transactional endpoint

use pmrag_config::Neo4jConnection;
use pmrag_core::{rank_candidates, QueryDialect, Record, RecordStore, StoreError, Value};
use pmrag_llm::MockEmbeddingProvider;
use pmrag_neo4j::{GraphIngestor, Neo4jClient, Neo4jStore};
use serde_json::json;
use wiremock::matchers::{basic_auth, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMMIT: &str = "/db/neo4j/tx/commit";

fn connection(server: &MockServer) -> Neo4jConnection {
    Neo4jConnection {
        url: server.uri(),
        username: "neo4j".to_string(),
        password: "secret".to_string(),
        database: "neo4j".to_string(),
        timeout_secs: 5,
    }
}

fn rows(columns: &[&str], data: Vec<serde_json::Value>) -> ResponseTemplate {
    let data: Vec<_> = data.into_iter().map(|row| json!({ "row": row })).collect();
    ResponseTemplate::new(200).set_body_json(json!({
        "results": [{ "columns": columns, "data": data }],
        "errors": []
    }))
}

async fn store(server: &MockServer) -> Neo4jStore {
    Neo4jStore::new(Neo4jClient::new(&connection(server)), "embedding").unwrap()
}

#[tokio::test]
async fn execute_posts_statement_with_basic_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMMIT))
        .and(basic_auth("neo4j", "secret"))
        .and(body_string_contains("MATCH (e:Epic) RETURN count(e) AS epics"))
        .respond_with(rows(&["epics"], vec![json!([7])]))
        .expect(1)
        .mount(&server)
        .await;

    let store = store(&server).await;
    let records = store
        .execute("MATCH (e:Epic) RETURN count(e) AS epics")
        .await
        .unwrap();

    assert_eq!(store.dialect(), QueryDialect::Cypher);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("epics"), Some(&Value::Int(7)));
}

#[tokio::test]
async fn cypher_errors_become_query_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMMIT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [],
            "errors": [{
                "code": "Neo.ClientError.Statement.SyntaxError",
                "message": "Invalid input 'X'"
            }]
        })))
        .mount(&server)
        .await;

    let err = store(&server).await.execute("X").await.unwrap_err();
    assert!(matches!(err, StoreError::Query(ref m) if m.contains("SyntaxError")));
}

#[tokio::test]
async fn unauthorized_is_connection_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMMIT))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let err = store(&server).await.execute("RETURN 1").await.unwrap_err();
    assert!(matches!(err, StoreError::Connection(_)));
}

#[tokio::test]
async fn candidates_feed_threshold_search() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMMIT))
        .and(body_string_contains("IS NOT NULL"))
        .respond_with(rows(
            &["pyid", "pylabel", "embedding"],
            vec![
                json!(["US-1", "Login", [1.0, 0.0]]),
                json!(["US-2", "Logout", [0.0, 1.0]]),
            ],
        ))
        .mount(&server)
        .await;

    let candidates = store(&server).await.embedded_candidates().await.unwrap();
    assert_eq!(candidates.len(), 2);

    let matches = rank_candidates(&[1.0, 0.0], candidates, 0.75);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, "US-1");
    assert_eq!(matches[0].label.as_deref(), Some("Login"));
}

#[tokio::test]
async fn schema_omits_embedding_property() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMMIT))
        .and(body_string_contains("UNWIND labels(n)"))
        .respond_with(rows(
            &["label", "key"],
            vec![
                json!(["Epic", "embedding"]),
                json!(["Epic", "pyid"]),
                json!(["Epic", "pylabel"]),
            ],
        ))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(COMMIT))
        .and(body_string_contains("UNWIND keys(r)"))
        .respond_with(rows(&["type", "key"], vec![]))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(COMMIT))
        .and(body_string_contains("labels(a)[0]"))
        .respond_with(rows(
            &["start", "type", "end"],
            vec![json!(["UserStory", "IS_STORY_OF_EPIC", "Epic"])],
        ))
        .mount(&server)
        .await;

    let schema = store(&server).await.schema().await.unwrap();
    assert!(schema.contains("Epic {pyid, pylabel}"));
    assert!(schema.contains("(:UserStory)-[:IS_STORY_OF_EPIC]->(:Epic)"));
    assert!(!schema.contains("embedding"));
}

#[tokio::test]
async fn load_records_groups_by_label_and_links() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMMIT))
        .and(body_string_contains("DETACH DELETE"))
        .respond_with(rows(&[], vec![]))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(COMMIT))
        .and(body_string_contains("CREATE (n:UserStory)"))
        .respond_with(rows(&["created"], vec![json!([2])]))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(COMMIT))
        .and(body_string_contains("CREATE (n:Epic)"))
        .respond_with(rows(&["created"], vec![json!([1])]))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(COMMIT))
        .and(body_string_contains("MERGE"))
        .respond_with(rows(&["linked"], vec![json!([2])]))
        .expect(3)
        .mount(&server)
        .await;

    let records = vec![
        Record::new()
            .with("pyid", "US-1")
            .with("pxobjclass", "PegaProjectMgmt-Work-UserStory")
            .with("epicid", "EPIC-1"),
        Record::new()
            .with("pyid", "US-2")
            .with("pxobjclass", "UserStory")
            .with("epicid", "EPIC-1"),
        Record::new().with("pyid", "EPIC-1").with("pxobjclass", "Epic"),
        Record::new().with("pyid", "X-1").with("pxobjclass", "Work-Bug"),
    ];

    let client = Neo4jClient::new(&connection(&server));
    let ingestor = GraphIngestor::new(&client, "embedding").unwrap();
    let report = ingestor.load_records(&records, true).await.unwrap();

    assert_eq!(report.nodes.get("UserStory"), Some(&2));
    assert_eq!(report.nodes.get("Epic"), Some(&1));
    assert_eq!(report.skipped, 1);
    assert_eq!(report.relationships.get("IS_STORY_OF_EPIC"), Some(&2));
}

#[tokio::test]
async fn embed_nodes_writes_vectors_for_unembedded_nodes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMMIT))
        .and(body_string_contains("MATCH (n:Epic) WHERE n.embedding IS NULL"))
        .respond_with(rows(
            &["pyid", "pylabel", "description"],
            vec![json!(["EPIC-1", "Accounts", "Account management"])],
        ))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(COMMIT))
        .and(body_string_contains("SET n.embedding = row.embedding"))
        .respond_with(rows(&["updated"], vec![json!([1])]))
        .expect(1)
        .mount(&server)
        .await;
    // every other label has nothing to embed
    Mock::given(method("POST"))
        .and(path(COMMIT))
        .respond_with(rows(&["pyid", "pylabel", "description"], vec![]))
        .mount(&server)
        .await;

    let client = Neo4jClient::new(&connection(&server));
    let ingestor = GraphIngestor::new(&client, "embedding").unwrap();
    let embedder = MockEmbeddingProvider::with_dimensions(8);
    let props = vec!["pylabel".to_string(), "description".to_string()];

    let report = ingestor.embed_nodes(&embedder, &props, 16).await.unwrap();
    assert_eq!(report.embedded.get("Epic"), Some(&1));
    assert_eq!(report.embedded.len(), 1);
    assert_eq!(embedder.call_count(), 1);
}
