// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the cloud HTTP client using wiremock.

use daichi_hvac::command::{Command, Encoder, EntityChangeRequest, FunctionInstruction};
use daichi_hvac::protocol::{CloudConfig, HttpClient, Protocol};
use daichi_hvac::state::{EntityState, decode};
use daichi_hvac::types::{FanMode, FunctionId, HvacMode, Preset};
use daichi_hvac::{Error, ProtocolError};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CTRL_PATH: &str = "/api/v4/devices/42/ctrl";

fn client_for(server: &MockServer) -> HttpClient {
    CloudConfig::new("test-token")
        .with_base_url(format!("{}/api/v4", server.uri()))
        .into_client()
        .unwrap()
}

fn device_document() -> Value {
    json!({
        "done": true,
        "errors": null,
        "data": {
            "id": 42,
            "title": "Living room",
            "serial": "DA-0042",
            "status": "connected",
            "state": {"isOn": true},
            "pult": [
                {
                    "title": "Mode",
                    "functions": [
                        {"id": 350, "title": "Power", "state": {"isOn": true}},
                        {"id": 352, "title": "Cool", "state": {"isOn": false}},
                        {"id": 353, "title": "Heat", "state": {"isOn": true}}
                    ]
                },
                {
                    "title": "Climate",
                    "functions": [
                        {"id": 351, "title": "Temperature", "state": {"value": 23}},
                        {"id": 357, "title": "Fan auto", "state": {"isOn": false}},
                        {"id": 358, "title": "Fan speed", "state": {"value": 4}},
                        {
                            "id": 362,
                            "title": "Comfortable sleep",
                            "state": {
                                "isOn": true,
                                "parameters": {"temp": 25, "sleepTime": 300}
                            }
                        }
                    ]
                }
            ]
        }
    })
}

async fn mount_ok_control(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(CTRL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": true})))
        .mount(server)
        .await;
}

async fn sent_values(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path() == CTRL_PATH)
        .map(|request| request.body_json::<Value>().unwrap()["value"].clone())
        .collect()
}

// ============================================================================
// Device documents
// ============================================================================

mod fetch {
    use super::*;

    #[tokio::test]
    async fn fetch_device_sends_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v4/devices/42"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(device_document()))
            .expect(1)
            .mount(&server)
            .await;

        let device = client_for(&server).fetch_device(42).await.unwrap();
        assert_eq!(device.id, Some(42));
        assert_eq!(device.title.as_deref(), Some("Living room"));
        assert!(device.is_connected());
    }

    #[tokio::test]
    async fn fetched_snapshot_decodes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v4/devices/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(device_document()))
            .mount(&server)
            .await;

        let snapshot = client_for(&server).fetch_snapshot(42).await.unwrap();
        let decoded = decode(&snapshot).unwrap();

        assert!(decoded.state.power);
        assert_eq!(decoded.state.mode, HvacMode::Heat);
        assert_eq!(decoded.state.target_temperature, Some(23.0));
        assert_eq!(decoded.state.fan_mode.map(|f| f.to_string()), Some("4".to_string()));
        assert!(decoded.state.is_preset_active(Preset::ComfortSleep));

        let params = decoded.state.comfort_sleep.unwrap();
        assert_eq!(params.temp.celsius(), 25);
        assert_eq!(params.sleep_time, 300);
    }

    #[tokio::test]
    async fn unauthorized_maps_to_authentication_failed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_device(42).await;
        assert!(matches!(result, Err(ProtocolError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn missing_device_maps_to_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_device(42).await;
        assert!(matches!(result, Err(ProtocolError::DeviceNotFound(42))));
    }

    #[tokio::test]
    async fn server_error_keeps_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        match client_for(&server).fetch_device(42).await {
            Err(ProtocolError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_document_is_a_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_device(42).await;
        assert!(matches!(result, Err(ProtocolError::Parse(_))));
    }
}

// ============================================================================
// Control requests
// ============================================================================

mod control {
    use super::*;

    #[tokio::test]
    async fn send_instruction_posts_control_payload() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(CTRL_PATH))
            .and(query_param("ignoreConflicts", "false"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_partial_json(json!({
                "value": {"functionId": 351, "value": 22, "parameters": null},
                "conflictResolveData": null
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"done": true, "updateRequired": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let instruction = FunctionInstruction::new(FunctionId::TEMPERATURE, Command::Int(22));
        let reply = client_for(&server)
            .send_instruction(42, &instruction)
            .await
            .unwrap();

        assert!(reply.done);
        assert!(reply.update_required);
    }

    #[tokio::test]
    async fn cmd_id_has_eight_digits() {
        let server = MockServer::start().await;
        mount_ok_control(&server).await;

        let instruction = FunctionInstruction::new(FunctionId::POWER, Command::Bool(true));
        client_for(&server)
            .send_instruction(42, &instruction)
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: Value = requests[0].body_json().unwrap();
        let cmd_id = body["cmdId"].as_u64().unwrap();
        assert!((10_000_000..=99_999_999).contains(&cmd_id));
    }

    #[tokio::test]
    async fn not_done_reply_is_returned() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"done": false, "errors": ["device offline"]})),
            )
            .mount(&server)
            .await;

        let instruction = FunctionInstruction::new(FunctionId::POWER, Command::Bool(false));
        let reply = client_for(&server)
            .send_instruction(42, &instruction)
            .await
            .unwrap();

        assert!(!reply.done);
        assert_eq!(reply.errors, Some(json!(["device offline"])));
    }

    #[tokio::test]
    async fn conflict_is_resolved_once() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(CTRL_PATH))
            .and(body_partial_json(json!({"conflictResolveData": {"token": "abc"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": true})))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path(CTRL_PATH))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "title": "Comfortable sleep is running",
                "actions": [
                    {"behaviour": "CANCEL"},
                    {"behaviour": "REQUEST", "conflictResolveData": {"token": "abc"}}
                ]
            })))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;

        let instruction =
            FunctionInstruction::new(FunctionId::TEMPERATURE, Command::Int(20));
        let reply = client_for(&server)
            .send_instruction(42, &instruction)
            .await
            .unwrap();
        assert!(reply.done);

        let values = sent_values(&server).await;
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], values[1]);
    }

    #[tokio::test]
    async fn unresolvable_conflict_fails() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "title": "Busy",
                "actions": [{"behaviour": "CANCEL"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let instruction = FunctionInstruction::new(FunctionId::POWER, Command::Bool(true));
        let result = client_for(&server).send_instruction(42, &instruction).await;

        match result {
            Err(ProtocolError::Conflict(title)) => assert_eq!(title, "Busy"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn repeated_conflict_is_not_retried_again() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "title": "Busy",
                "actions": [{"behaviour": "REQUEST", "conflictResolveData": "again"}]
            })))
            .expect(2)
            .mount(&server)
            .await;

        let instruction = FunctionInstruction::new(FunctionId::POWER, Command::Bool(true));
        let result = client_for(&server).send_instruction(42, &instruction).await;
        assert!(matches!(result, Err(ProtocolError::Conflict(_))));
    }
}

// ============================================================================
// Encoded changes
// ============================================================================

mod apply {
    use super::*;

    #[tokio::test]
    async fn send_instructions_keeps_order() {
        let server = MockServer::start().await;
        mount_ok_control(&server).await;

        let instructions = vec![
            FunctionInstruction::new(FunctionId::POWER, Command::Bool(true)),
            FunctionInstruction::new(FunctionId::HEAT, Command::Activate),
            FunctionInstruction::new(FunctionId::TEMPERATURE, Command::Int(24)),
        ];
        let replies = client_for(&server)
            .send_instructions(42, &instructions)
            .await
            .unwrap();
        assert_eq!(replies.len(), 3);

        let ids: Vec<u64> = sent_values(&server)
            .await
            .iter()
            .map(|value| value["functionId"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![350, 353, 351]);
    }

    #[tokio::test]
    async fn send_instructions_stops_at_first_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let instructions = vec![
            FunctionInstruction::new(FunctionId::POWER, Command::Bool(true)),
            FunctionInstruction::new(FunctionId::HEAT, Command::Activate),
        ];
        let result = client_for(&server).send_instructions(42, &instructions).await;
        assert!(matches!(
            result,
            Err(ProtocolError::Status { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn apply_change_powers_on_before_preset() {
        let server = MockServer::start().await;
        mount_ok_control(&server).await;

        let current = EntityState::default();
        let request = EntityChangeRequest::SetPreset(Preset::Eco, true, None);
        client_for(&server)
            .apply_change(42, &Encoder::builtin(), &current, &request)
            .await
            .unwrap();

        let values = sent_values(&server).await;
        assert_eq!(
            values,
            vec![
                json!({"functionId": 350, "isOn": true, "parameters": null}),
                json!({"functionId": 363, "isOn": true, "parameters": null}),
            ]
        );
    }

    #[tokio::test]
    async fn invalid_change_sends_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": true})))
            .expect(0)
            .mount(&server)
            .await;

        let current = EntityState::default().with_mode(HvacMode::Cool);
        let request = EntityChangeRequest::SetFanMode(FanMode::Unrecognized(9));
        let result = client_for(&server)
            .apply_change(42, &Encoder::builtin(), &current, &request)
            .await;

        assert!(matches!(result, Err(Error::Encode(_))));
    }
}
