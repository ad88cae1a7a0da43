//! Integration tests for the bot polling loop
//!
//! Telegram and the geocoder are both mocked with wiremock; the store and
//! map live in a temporary directory.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use app::dispatcher::Dispatcher;
use app::geocoder::Geocoder;
use app::map::MapRenderer;
use app::store::RecordStore;
use app::telegram::TelegramClient;
use serde_json::json;
use server_lib::bot::{ABORTED_REPLY, Bot};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "42:bot-token";

fn text_update(update_id: i64, chat_id: i64, text: &str) -> serde_json::Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id,
            "date": 1700000000,
            "chat": { "id": chat_id, "type": "private" },
            "text": text
        }
    })
}

fn sent_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "ok": true,
        "result": { "message_id": 1, "chat": { "id": 7, "type": "private" }, "date": 0 }
    }))
}

async fn mount_updates(telegram: &MockServer, updates: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/getUpdates")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": updates })),
        )
        .up_to_n_times(1)
        .mount(telegram)
        .await;
}

async fn setup(data_dir: &TempDir, data_file: std::path::PathBuf) -> (Bot, MockServer, MockServer) {
    let telegram = MockServer::start().await;
    let geocoder = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Lagos"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "lat": "6.45", "lon": "3.39" }])),
        )
        .mount(&geocoder)
        .await;

    let dispatcher = Dispatcher::new(
        RecordStore::load(data_file),
        Geocoder::new(geocoder.uri(), "health_risk_bot", Duration::from_secs(2)).unwrap(),
        MapRenderer::new(data_dir.path().join("map.html")),
    );
    let client = TelegramClient::new(telegram.uri(), TOKEN.to_string(), 1).unwrap();

    (Bot::new(client, dispatcher, 1), telegram, geocoder)
}

#[tokio::test]
async fn test_poll_once_handles_commands_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let (mut bot, telegram, _geocoder) = setup(&dir, dir.path().join("risk_data.json")).await;

    mount_updates(
        &telegram,
        json!([
            text_update(10, 7, "/add_city Lagos"),
            text_update(11, 7, "/update Lagos risk_level High Risk"),
            text_update(12, 7, "/show Lagos"),
        ]),
    )
    .await;

    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .and(body_string_contains("Lagos has been added with coordinates: [6.45, 3.39]."))
        .respond_with(sent_ok())
        .expect(1)
        .mount(&telegram)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .and(body_string_contains("risk_level for Lagos updated to 'High Risk'."))
        .respond_with(sent_ok())
        .expect(1)
        .mount(&telegram)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .and(body_string_contains("Risk Level: High Risk"))
        .respond_with(sent_ok())
        .expect(1)
        .mount(&telegram)
        .await;

    assert_eq!(bot.poll_once().await.unwrap(), 3);

    let record = bot.dispatcher().store().get("Lagos").unwrap();
    assert_eq!(record.risk_level.as_text(), Some("High Risk"));
    assert!(dir.path().join("map.html").exists());
}

#[tokio::test]
async fn test_offset_advances_past_handled_updates() {
    let dir = tempfile::tempdir().unwrap();
    let (mut bot, telegram, _geocoder) = setup(&dir, dir.path().join("risk_data.json")).await;

    mount_updates(&telegram, json!([text_update(100, 7, "/start")])).await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .respond_with(sent_ok())
        .mount(&telegram)
        .await;

    assert_eq!(bot.poll_once().await.unwrap(), 1);

    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/getUpdates")))
        .and(body_string_contains("\"offset\":101"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": [] })))
        .expect(1)
        .mount(&telegram)
        .await;

    assert_eq!(bot.poll_once().await.unwrap(), 0);
}

#[tokio::test]
async fn test_map_command_sends_document() {
    let dir = tempfile::tempdir().unwrap();
    let (mut bot, telegram, _geocoder) = setup(&dir, dir.path().join("risk_data.json")).await;

    mount_updates(
        &telegram,
        json!([text_update(1, 7, "/add_city Lagos"), text_update(2, 7, "/map")]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .respond_with(sent_ok())
        .expect(1)
        .mount(&telegram)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendDocument")))
        .and(body_string_contains("filename=\"map.html\""))
        .and(body_string_contains("\"name\":\"Lagos\""))
        .respond_with(sent_ok())
        .expect(1)
        .mount(&telegram)
        .await;

    assert_eq!(bot.poll_once().await.unwrap(), 2);
}

#[tokio::test]
async fn test_fatal_error_replies_and_keeps_store() {
    let dir = tempfile::tempdir().unwrap();
    let unwritable = dir.path().join("missing").join("risk_data.json");
    let (mut bot, telegram, _geocoder) = setup(&dir, unwritable).await;

    mount_updates(&telegram, json!([text_update(5, 7, "/add_city Lagos")])).await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .and(body_string_contains(ABORTED_REPLY))
        .respond_with(sent_ok())
        .expect(1)
        .mount(&telegram)
        .await;

    assert_eq!(bot.poll_once().await.unwrap(), 1);
    assert!(bot.dispatcher().store().is_empty());
}

#[tokio::test]
async fn test_updates_without_text_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let (mut bot, telegram, _geocoder) = setup(&dir, dir.path().join("risk_data.json")).await;

    mount_updates(
        &telegram,
        json!([
            { "update_id": 1, "edited_message": { "message_id": 1 } },
            {
                "update_id": 2,
                "message": { "message_id": 2, "date": 0, "chat": { "id": 7, "type": "private" } }
            }
        ]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .respond_with(sent_ok())
        .expect(0)
        .mount(&telegram)
        .await;

    assert_eq!(bot.poll_once().await.unwrap(), 2);
}

#[tokio::test]
async fn test_poll_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let (mut bot, telegram, _geocoder) = setup(&dir, dir.path().join("risk_data.json")).await;

    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/getUpdates")))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "ok": false,
            "description": "Conflict: terminated by other getUpdates request"
        })))
        .mount(&telegram)
        .await;

    let err = bot.poll_once().await.unwrap_err();
    assert!(err.to_string().contains("Conflict"));
}
