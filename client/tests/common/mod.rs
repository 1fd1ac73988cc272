//! Common test utilities for integration tests
//!
//! Builds report clients pointed at a wiremock server and the fixture
//! profile/report pair the mocks answer with.

#![allow(dead_code)]

use irontrack_client::config::AiConfig;
use irontrack_client::ReportClient;
use irontrack_shared::{ActivityLevel, Experience, Goal, Occupation, Profile, ProfileDraft};
use secrecy::SecretString;
use serde_json::{json, Value};
use wiremock::MockServer;

pub const API_KEY: &str = "test-api-key";
pub const MESSAGES_PATH: &str = "/v1/messages";

/// Report fixture matching [`alex_profile`]
pub fn report_json() -> Value {
    serde_json::from_str(include_str!("../fixtures/alex_report.json"))
        .expect("Fixture is valid JSON")
}

/// 28-year-old desk worker aiming for muscle gain
pub fn alex_profile() -> Profile {
    ProfileDraft {
        age: Some(28),
        height_cm: Some(178.0),
        weight_kg: Some(82.0),
        body_fat_pct: Some(20.0),
        occupation: Occupation::Desk,
        activity_level: ActivityLevel::Moderate,
        experience: Experience::Intermediate,
        goal: Goal::MuscleGain,
        workout_days_per_week: Some(4),
        daily_calories: Some(2200.0),
        protein_g: Some(140.0),
        carbs_g: Some(240.0),
        fats_g: Some(65.0),
        ..ProfileDraft::default()
    }
    .build()
    .expect("Fixture profile is valid")
}

/// Wrap report text in a messages envelope, split across fragments
pub fn envelope(text: &str) -> Value {
    let mid = text.len() / 2;
    let split = (mid..=text.len())
        .find(|i| text.is_char_boundary(*i))
        .unwrap_or(text.len());
    let (head, tail) = text.split_at(split);
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "content": [
            {"type": "text", "text": head},
            {"type": "text", "text": tail}
        ],
        "stop_reason": "end_turn"
    })
}

pub fn ai_config(server: &MockServer, timeout_secs: u64) -> AiConfig {
    AiConfig {
        endpoint: format!("{}{}", server.uri(), MESSAGES_PATH),
        api_key: Some(SecretString::new(API_KEY.to_string())),
        timeout_secs,
        ..AiConfig::default()
    }
}

/// Create a ReportClient that points to the mock server
pub fn test_client(server: &MockServer) -> ReportClient {
    ReportClient::new(&ai_config(server, 5)).expect("Client builds with an API key")
}
