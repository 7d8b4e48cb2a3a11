use mockito::Matcher;
use serde::Deserialize;
use serde_json::json;
use supabase_client::{Query, SupabaseClient, SupabaseError};

#[derive(Debug, Deserialize, PartialEq)]
struct Row {
    id: i64,
    keyword: String,
}

#[tokio::test]
async fn upsert_sends_auth_and_merge_headers() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/rest/v1/posts")
        .match_query(Matcher::UrlEncoded("on_conflict".into(), "post_id".into()))
        .match_header("apikey", "service-key")
        .match_header("authorization", "Bearer service-key")
        .match_header("prefer", "resolution=merge-duplicates")
        .match_body(Matcher::Json(json!({"post_id": "abc123"})))
        .with_status(201)
        .create_async()
        .await;

    let client = SupabaseClient::new(&server.url(), "service-key");
    client
        .upsert("posts", Some("post_id"), &json!({"post_id": "abc123"}))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn select_encodes_filters_and_decodes_rows() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v1/google_trends")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("keyword".into(), "eq.유튜브 쇼츠".into()),
            Matcher::UrlEncoded("select".into(), "id,keyword".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id": 7, "keyword": "유튜브 쇼츠"}]"#)
        .create_async()
        .await;

    let client = SupabaseClient::new(&format!("{}/", server.url()), "service-key");
    let rows: Vec<Row> = client
        .select(
            "google_trends",
            &Query::new().eq("keyword", "유튜브 쇼츠").select("id,keyword"),
        )
        .await
        .unwrap();

    assert_eq!(
        rows,
        vec![Row {
            id: 7,
            keyword: "유튜브 쇼츠".to_string()
        }]
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn api_failure_carries_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("PATCH", "/rest/v1/google_trends")
        .match_query(Matcher::UrlEncoded("id".into(), "eq.3".into()))
        .with_status(400)
        .with_body("bad column")
        .create_async()
        .await;

    let client = SupabaseClient::new(&server.url(), "service-key");
    let err = client
        .update("google_trends", &Query::new().eq("id", 3), &json!({"x": 1}))
        .await
        .unwrap_err();

    match err {
        SupabaseError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "bad column");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn delete_asks_for_minimal_return() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/rest/v1/posts")
        .match_query(Matcher::UrlEncoded("post_id".into(), "neq.dummy_val".into()))
        .match_header("prefer", "return=minimal")
        .with_status(204)
        .create_async()
        .await;

    let client = SupabaseClient::new(&server.url(), "service-key");
    client
        .delete("posts", &Query::new().neq("post_id", "dummy_val"))
        .await
        .unwrap();

    mock.assert_async().await;
}
