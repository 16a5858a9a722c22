// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete Parlo API.
//!
//! Each test creates an isolated TestHarness with temp SQLite, a temp audio
//! directory, and mock collaborators, then drives real HTTP requests against
//! a live server. Tests are independent and order-insensitive.

use parlo_test_utils::TestHarness;
use serde_json::json;

async fn harness() -> TestHarness {
    TestHarness::builder().build().await.unwrap()
}

// ---- Test 1: Session creation invariants ----

#[tokio::test]
async fn test_new_session_has_zero_count_and_equal_timestamps() {
    let h = harness().await;

    let response = h
        .client
        .post(h.url("/api/history/sessions"))
        .json(&json!({"user_id": "user-1", "title": "Practice"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let session: serde_json::Value = response.json().await.unwrap();
    assert_eq!(session["message_count"], 0);
    assert_eq!(session["created_at"], session["updated_at"]);
    assert_eq!(session["title"], "Practice");
    assert!(uuid::Uuid::parse_str(session["id"].as_str().unwrap()).is_ok());
}

// ---- Test 2: Turn creation against existing and absent sessions ----

#[tokio::test]
async fn test_turn_creation_persists_reference_and_404s_on_absent_session() {
    let h = harness().await;

    let session: serde_json::Value = h
        .client
        .post(h.url("/api/history/sessions"))
        .json(&json!({}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let session_id = session["id"].as_str().unwrap();

    let response = h
        .client
        .post(h.url("/api/history/conversations"))
        .json(&json!({
            "session_id": session_id,
            "user_message": "hola",
            "ai_response": "¡hola!"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let turn: serde_json::Value = response.json().await.unwrap();
    assert_eq!(turn["session_id"], session_id);

    // Appending bumped the session counters.
    let detail: serde_json::Value = h
        .client
        .get(h.url(&format!("/api/history/sessions/{session_id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["message_count"], 1);
    assert_eq!(detail["conversations"][0]["id"], turn["id"]);

    // A well-formed id that names no session is a 404.
    let absent = uuid::Uuid::new_v4();
    let response = h
        .client
        .post(h.url("/api/history/conversations"))
        .json(&json!({
            "session_id": absent.to_string(),
            "user_message": "hi",
            "ai_response": "hello"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

// ---- Test 3: Malformed identifiers are 400, never 500 ----

#[tokio::test]
async fn test_malformed_ids_are_rejected_with_400() {
    let h = harness().await;

    for path in [
        "/api/history/sessions/not-a-uuid",
        "/api/history/conversations/not-a-uuid",
    ] {
        let response = h.client.get(h.url(path)).send().await.unwrap();
        assert_eq!(response.status(), 400, "GET {path}");

        let response = h.client.delete(h.url(path)).send().await.unwrap();
        assert_eq!(response.status(), 400, "DELETE {path}");
    }

    let body: serde_json::Value = h
        .client
        .get(h.url("/api/history/sessions/not-a-uuid"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["error"], "Invalid session ID format");
}

// ---- Test 4: Session delete cascades ----

#[tokio::test]
async fn test_session_delete_cascades_to_turns() {
    let h = harness().await;

    let chat: serde_json::Value = h
        .client
        .post(h.url("/api/chat/message"))
        .json(&json!({"message": "delete me later"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let session_id = chat["session_id"].as_str().unwrap();
    let conversation_id = chat["conversation_id"].as_str().unwrap();

    let response = h
        .client
        .delete(h.url(&format!("/api/history/sessions/{session_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let response = h
        .client
        .get(h.url(&format!("/api/history/conversations/{conversation_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

// ---- Test 5: Vietnamese synthesis speed defaults ----

#[tokio::test]
async fn test_vietnamese_synthesis_defaults_to_slowed_speed() {
    let h = harness().await;

    let response = h
        .client
        .post(h.url("/api/audio/synthesize"))
        .json(&json!({"text": "Xin chào", "language": "vi"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    // An explicit non-default speed is honored.
    let response = h
        .client
        .post(h.url("/api/audio/synthesize"))
        .json(&json!({"text": "Xin chào", "language": "vi", "speed": 1.5}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let requests = h.synthesizer.requests().await;
    assert_eq!(requests.len(), 2);
    assert!((requests[0].speed - 0.9).abs() < f32::EPSILON);
    assert!((requests[1].speed - 1.5).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_configured_default_speed_applies_when_request_leaves_it_unset() {
    let h = TestHarness::builder()
        .with_default_speed(0.5)
        .build()
        .await
        .unwrap();

    h.client
        .post(h.url("/api/audio/synthesize"))
        .json(&json!({"text": "hello", "language": "en"}))
        .send()
        .await
        .unwrap();

    // Chat replies pick up the same configured default.
    h.client
        .post(h.url("/api/chat/message"))
        .json(&json!({"message": "hello"}))
        .send()
        .await
        .unwrap();

    let requests = h.synthesizer.requests().await;
    assert_eq!(requests.len(), 2);
    assert!((requests[0].speed - 0.5).abs() < f32::EPSILON);
    assert!((requests[1].speed - 0.5).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_synthesis_bounds_are_rejected() {
    let h = harness().await;

    let response = h
        .client
        .post(h.url("/api/audio/synthesize"))
        .json(&json!({"text": "", "language": "en"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = h
        .client
        .post(h.url("/api/audio/synthesize"))
        .json(&json!({"text": "hello", "speed": 3.0}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

// ---- Test 6: Missing audio files ----

#[tokio::test]
async fn test_deleting_missing_audio_is_404_not_500() {
    let h = harness().await;

    let response = h
        .client
        .delete(h.url("/api/audio/nonexistent.mp3"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let response = h
        .client
        .get(h.url("/audio/nonexistent.mp3"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

// ---- Test 7: Text chat happy path ----

#[tokio::test]
async fn test_chat_message_happy_path() {
    let h = TestHarness::builder()
        .with_mock_responses(vec!["Great question! Let's practice.".to_string()])
        .build()
        .await
        .unwrap();

    let response = h
        .client
        .post(h.url("/api/chat/message"))
        .json(&json!({"message": "How do I order coffee in Vietnamese?"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let chat: serde_json::Value = response.json().await.unwrap();

    assert_eq!(chat["ai_response"], "Great question! Let's practice.");
    let audio_url = chat["ai_audio_url"].as_str().unwrap();
    assert!(audio_url.starts_with("/audio/"));
    assert!(audio_url.ends_with(".mp3"));
    assert_eq!(chat["metadata"]["model"], "mock-model");

    // The session exists, is titled from the message, and lists the turn.
    let session_id = chat["session_id"].as_str().unwrap();
    let detail: serde_json::Value = h
        .client
        .get(h.url(&format!("/api/history/sessions/{session_id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["title"], "How do I order coffee in Vietnamese?");
    assert_eq!(detail["conversations"][0]["id"], chat["conversation_id"]);

    // The synthesized audio is served with the right media type.
    let response = h.client.get(h.url(audio_url)).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "audio/mpeg"
    );
}

#[tokio::test]
async fn test_chat_continues_existing_session_with_history() {
    let h = harness().await;

    let first: serde_json::Value = h
        .client
        .post(h.url("/api/chat/message"))
        .json(&json!({"message": "first"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let session_id = first["session_id"].as_str().unwrap();

    let second: serde_json::Value = h
        .client
        .post(h.url("/api/chat/message"))
        .json(&json!({"message": "second", "session_id": session_id}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["session_id"], session_id);

    // The second completion carried the first exchange as history:
    // system + user/assistant from turn one + the new user message.
    let requests = h.provider.requests().await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].messages.len(), 4);
    assert_eq!(requests[1].messages[1].content, "first");
    assert_eq!(requests[1].messages[2].role, "assistant");

    let detail: serde_json::Value = h
        .client
        .get(h.url(&format!("/api/history/sessions/{session_id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["message_count"], 2);
}

// ---- Test 8: Voice chat ----

#[tokio::test]
async fn test_voice_chat_stores_upload_and_uses_placeholder_transcript() {
    let h = harness().await;

    let form = reqwest::multipart::Form::new()
        .part(
            "audio",
            reqwest::multipart::Part::bytes(b"RIFF-fake-wav".to_vec())
                .file_name("recording.wav"),
        )
        .text("language", "vi");

    let response = h
        .client
        .post(h.url("/api/chat/voice"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let chat: serde_json::Value = response.json().await.unwrap();

    assert_eq!(chat["user_message"], "[Voice message - transcription pending]");
    let user_audio_url = chat["metadata"]["user_audio_url"].as_str().unwrap();
    assert!(user_audio_url.starts_with("/audio/user/"));
    assert!(user_audio_url.ends_with(".wav"));

    // The upload is served back.
    let response = h.client.get(h.url(user_audio_url)).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "audio/wav"
    );
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"RIFF-fake-wav");

    // The session got the voice title, and the spoken reply was slowed.
    let session_id = chat["session_id"].as_str().unwrap();
    let detail: serde_json::Value = h
        .client
        .get(h.url(&format!("/api/history/sessions/{session_id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["title"], "Voice conversation");

    let requests = h.synthesizer.requests().await;
    assert!((requests[0].speed - 0.9).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_voice_chat_without_file_is_400() {
    let h = harness().await;

    let form = reqwest::multipart::Form::new().text("language", "en");
    let response = h
        .client
        .post(h.url("/api/chat/voice"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "No audio file provided");
}

#[tokio::test]
async fn test_voice_chat_honors_voice_and_use_rag_fields() {
    let h = TestHarness::builder().with_memory().build().await.unwrap();

    // Seed retrieval memory with a text exchange.
    h.client
        .post(h.url("/api/chat/message"))
        .json(&json!({"message": "the weather is sunny today"}))
        .send()
        .await
        .unwrap();

    // use_rag=false skips retrieval even though the corpus is populated.
    let form = reqwest::multipart::Form::new()
        .part(
            "audio",
            reqwest::multipart::Part::bytes(b"RIFF-fake-wav".to_vec()).file_name("a.wav"),
        )
        .text("voice", "co.uk")
        .text("use_rag", "false");
    let chat: serde_json::Value = h
        .client
        .post(h.url("/api/chat/voice"))
        .multipart(form)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(chat["metadata"]["voice"], "co.uk");

    let turn: serde_json::Value = h
        .client
        .get(h.url(&format!(
            "/api/history/conversations/{}",
            chat["conversation_id"].as_str().unwrap()
        )))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let metadata: serde_json::Value =
        serde_json::from_str(turn["metadata"].as_str().unwrap()).unwrap();
    assert_eq!(metadata["voice"], "co.uk");
    assert_eq!(metadata["context_used"], false);

    // Without the fields, retrieval stays on and the default voice applies.
    let form = reqwest::multipart::Form::new().part(
        "audio",
        reqwest::multipart::Part::bytes(b"RIFF-fake-wav".to_vec()).file_name("b.wav"),
    );
    let chat: serde_json::Value = h
        .client
        .post(h.url("/api/chat/voice"))
        .multipart(form)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let turn: serde_json::Value = h
        .client
        .get(h.url(&format!(
            "/api/history/conversations/{}",
            chat["conversation_id"].as_str().unwrap()
        )))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let metadata: serde_json::Value =
        serde_json::from_str(turn["metadata"].as_str().unwrap()).unwrap();
    assert_eq!(metadata["context_used"], true);

    let requests = h.synthesizer.requests().await;
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].voice, "co.uk");
    assert_eq!(requests[2].voice, "com");
}

// ---- Test 9: Retrieval-augmented chat ----

#[tokio::test]
async fn test_rag_context_marked_after_prior_turns() {
    let h = TestHarness::builder()
        .with_mock_responses(vec![
            "It will be sunny.".to_string(),
            "Still sunny tomorrow.".to_string(),
        ])
        .with_memory()
        .build()
        .await
        .unwrap();

    let first: serde_json::Value = h
        .client
        .post(h.url("/api/chat/message"))
        .json(&json!({"message": "what is the weather today"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // First turn had an empty corpus, so no context was used.
    let first_turn: serde_json::Value = h
        .client
        .get(h.url(&format!(
            "/api/history/conversations/{}",
            first["conversation_id"].as_str().unwrap()
        )))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let metadata: serde_json::Value =
        serde_json::from_str(first_turn["metadata"].as_str().unwrap()).unwrap();
    assert_eq!(metadata["context_used"], false);

    // The second turn retrieves the stored exchange.
    let second: serde_json::Value = h
        .client
        .post(h.url("/api/chat/message"))
        .json(&json!({"message": "what about the weather tomorrow"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let second_turn: serde_json::Value = h
        .client
        .get(h.url(&format!(
            "/api/history/conversations/{}",
            second["conversation_id"].as_str().unwrap()
        )))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let metadata: serde_json::Value =
        serde_json::from_str(second_turn["metadata"].as_str().unwrap()).unwrap();
    assert_eq!(metadata["context_used"], true);

    let requests = h.provider.requests().await;
    let prompt = &requests[1].messages.last().unwrap().content;
    assert!(prompt.starts_with("Context: "), "got: {prompt}");
    assert!(prompt.contains("what is the weather today"));
}

// ---- Test 10: Session listing ----

#[tokio::test]
async fn test_session_listing_orders_and_previews() {
    let h = harness().await;

    let long_message = "a ".repeat(80);
    for message in ["short opener", long_message.trim()] {
        h.client
            .post(h.url("/api/chat/message"))
            .json(&json!({"message": message, "user_id": "learner-1"}))
            .send()
            .await
            .unwrap();
    }

    let list: serde_json::Value = h
        .client
        .get(h.url("/api/history/sessions?user_id=learner-1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["total"], 2);

    // Most recently updated first.
    let sessions = list["sessions"].as_array().unwrap();
    let preview = sessions[0]["preview_message"].as_str().unwrap();
    assert!(preview.chars().count() <= 100);
    assert_eq!(sessions[1]["preview_message"], "short opener");

    // Filtering by another user yields nothing.
    let list: serde_json::Value = h
        .client
        .get(h.url("/api/history/sessions?user_id=someone-else"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["total"], 0);
}
