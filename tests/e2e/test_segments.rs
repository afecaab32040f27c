use crate::helpers::{auto_voice, segment_ids, segment_statuses, TestContext};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_segment_text_into_bounded_chunks(ctx: &TestContext) {
    let body = ctx
        .load_text("One two three. Four five. Six seven eight.", Some(5))
        .await;

    let texts: Vec<&str> = body["segments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["One two three. Four five.", "Six seven eight."]);
    assert_eq!(segment_statuses(&body), vec!["idle", "idle"]);
    assert_eq!(
        body["full_text"].as_str(),
        Some("One two three. Four five. Six seven eight.")
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_blank_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/segments", &json!({ "text": "   " }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Text cannot be empty");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_keep_segments_when_text_is_unchanged(ctx: &TestContext) {
    let first = ctx.load_text("Hello there. General Kenobi.", None).await;
    let second = ctx.load_text("Hello there. General Kenobi.", None).await;
    assert_eq!(segment_ids(&first), segment_ids(&second));

    let third = ctx.load_text("Something else entirely.", None).await;
    assert_ne!(segment_ids(&first), segment_ids(&third));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_edit_segment_text(ctx: &TestContext) {
    let body = ctx.load_text("Original text.", None).await;
    let id = &segment_ids(&body)[0];

    let response = ctx
        .client
        .patch(&format!("/api/segments/{}", id), &json!({ "text": "  Edited text. " }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body.as_ref().unwrap()["text"].as_str(),
        Some("Edited text.")
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_not_found_for_unknown_segment(ctx: &TestContext) {
    ctx.load_text("Some text.", None).await;

    let response = ctx
        .client
        .patch(
            &format!("/api/segments/{}", uuid::Uuid::new_v4()),
            &json!({ "text": "x" }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_only_select_completed_segments(ctx: &TestContext) {
    ctx.use_keys(&["user-key-aaaa-1111"]).await;
    let body = ctx.load_text("First part. Second part.", Some(2)).await;
    let ids = segment_ids(&body);

    let response = ctx
        .client
        .post_empty(&format!("/api/segments/{}/selection", ids[0]))
        .await
        .unwrap();
    response.assert_status(StatusCode::BAD_REQUEST);

    ctx.client
        .post(&format!("/api/segments/{}/generate", ids[0]), &auto_voice())
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let response = ctx
        .client
        .post_empty(&format!("/api/segments/{}/selection", ids[0]))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.as_ref().unwrap()["selected"], json!(true));

    // select-all with one completed and already selected segment clears it
    let response = ctx.client.post_empty("/api/segments/selection").await.unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.as_ref().unwrap()["selected"], json!(false));

    let list = ctx.client.get("/api/segments").await.unwrap();
    let selected: Vec<bool> = list.body.as_ref().unwrap()["segments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["selected"].as_bool().unwrap())
        .collect();
    assert_eq!(selected, vec![false, false]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_download_a_single_segment(ctx: &TestContext) {
    ctx.use_keys(&["user-key-aaaa-1111"]).await;
    let body = ctx.load_text("Just one.", None).await;
    let id = &segment_ids(&body)[0];

    let response = ctx
        .client
        .get(&format!("/api/segments/{}/audio", id))
        .await
        .unwrap();
    response.assert_status(StatusCode::BAD_REQUEST);

    ctx.client
        .post(&format!("/api/segments/{}/generate", id), &auto_voice())
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let response = ctx
        .client
        .get(&format!("/api/segments/{}/audio", id))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.wav_samples(),
        crate::helpers::mock_provider::samples_for("Just one.")
    );
    assert!(response
        .header("content-disposition")
        .unwrap()
        .starts_with("attachment; filename=\"voice-studio-segment-"));
}
