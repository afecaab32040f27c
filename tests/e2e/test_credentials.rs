use crate::helpers::{auto_voice, segment_statuses, TestContext, FREE_USAGE_LIMIT};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_start_on_the_shared_credential(ctx: &TestContext) {
    let response = ctx.client.get("/api/credentials").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["source"], json!("shared"));
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["shared_available"], json!(true));
    // the system key is never echoed
    assert_eq!(body["keys"], json!(["syst...0000"]));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_store_masked_and_deduplicated_keys(ctx: &TestContext) {
    let response = ctx
        .client
        .put(
            "/api/credentials",
            &json!({ "keys": [" user-key-aaaa-1111 ", "", "user-key-aaaa-1111", "short"] }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["source"], json!("user"));
    assert_eq!(body["count"], json!(2));
    assert_eq!(body["keys"], json!(["user...1111", "*****"]));

    let stored = ctx.client.get("/api/credentials").await.unwrap();
    assert_eq!(stored.body.as_ref().unwrap()["count"], json!(2));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_an_empty_key_list(ctx: &TestContext) {
    let response = ctx
        .client
        .put("/api/credentials", &json!({ "keys": ["  ", ""] }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error_message("At least one non-empty credential");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_switch_back_to_the_shared_credential(ctx: &TestContext) {
    ctx.use_keys(&["user-key-aaaa-1111"]).await;

    let response = ctx.client.post_empty("/api/credentials/shared").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.as_ref().unwrap()["source"], json!("shared"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_charge_shared_usage_per_successful_segment(ctx: &TestContext) {
    ctx.load_text("First bit. Second bit. Third bit.", Some(2)).await;
    ctx.provider.fail_on(
        "Third bit.",
        voice_studio_backend::infrastructure::providers::ProviderErrorKind::SafetyBlocked,
    );

    ctx.client
        .post("/api/batch", &auto_voice())
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let response = ctx.client.get("/api/usage").await.unwrap();
    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["source"], json!("shared"));
    assert_eq!(body["usage"]["generations"], json!(2));
    assert_eq!(body["usage"]["remaining"], json!(FREE_USAGE_LIMIT - 2));
    assert_eq!(body["limits"]["generations"], json!(FREE_USAGE_LIMIT));
    assert!(body["resets_at"].is_string());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_a_batch_larger_than_the_remaining_quota(ctx: &TestContext) {
    let text = (1..=FREE_USAGE_LIMIT + 1)
        .map(|n| format!("Line {}.", n))
        .collect::<Vec<_>>()
        .join(" ");
    let list = ctx.load_text(&text, Some(2)).await;
    assert_eq!(segment_statuses(&list).len(), FREE_USAGE_LIMIT as usize + 1);

    let response = ctx.client.post("/api/batch", &auto_voice()).await.unwrap();

    response
        .assert_status(StatusCode::TOO_MANY_REQUESTS)
        .assert_error_message("shared quota exhausted");
    assert!(ctx.provider.calls().is_empty());

    // nothing was touched
    let list = ctx.client.get("/api/segments").await.unwrap();
    assert!(segment_statuses(list.body.as_ref().unwrap())
        .iter()
        .all(|s| s == "idle"));
    let usage = ctx.client.get("/api/usage").await.unwrap();
    assert_eq!(usage.body.as_ref().unwrap()["usage"]["generations"], json!(0));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_charge_user_credentials(ctx: &TestContext) {
    ctx.use_keys(&["user-key-aaaa-1111"]).await;
    ctx.load_text("One thing.", None).await;

    ctx.client
        .post("/api/batch", &auto_voice())
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let usage = ctx.client.get("/api/usage").await.unwrap();
    let body = usage.body.as_ref().unwrap();
    assert_eq!(body["source"], json!("user"));
    assert_eq!(body["usage"]["generations"], json!(0));
}
