// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde_json::json;
use serial_test::serial;

use super::*;
use crate::test_helpers::stub_gateway;

fn vendor(api_key: Option<&str>) -> VendorArgs {
    VendorArgs {
        provider: "openai".to_string(),
        api_key: api_key.map(str::to_string),
        model: Some("gpt-4o-mini".to_string()),
    }
}

#[tokio::test]
#[serial]
async fn chat_forwards_message_and_model() {
    let (url, seen) = stub_gateway(200, json!({ "response": "hi back" })).await;
    let args = ChatArgs { message: "hi".to_string(), vendor: vendor(Some("k")) };

    chat(args, GatewayClient::new(url, None), OutputFormat::Json).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(
        seen[0].body,
        json!({ "provider": "openai", "apiKey": "k", "message": "hi", "model": "gpt-4o-mini" })
    );
}

#[tokio::test]
#[serial]
async fn missing_key_exits_2() {
    std::env::remove_var("CODEXI_API_KEY");
    let (url, seen) = stub_gateway(200, json!({ "models": [] })).await;

    let args = ModelsArgs { vendor: vendor(None) };
    let err = models(args, GatewayClient::new(url, None), OutputFormat::Text).await.unwrap_err();

    assert_eq!(err.downcast_ref::<ExitError>().unwrap().code, 2);
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn key_falls_back_to_env() {
    std::env::set_var("CODEXI_API_KEY", "from-env");
    let (url, seen) = stub_gateway(200, json!({ "models": ["m"] })).await;

    let args = ModelsArgs { vendor: vendor(None) };
    models(args, GatewayClient::new(url, None), OutputFormat::Text).await.unwrap();

    assert_eq!(seen.lock().unwrap()[0].body["apiKey"], "from-env");
    std::env::remove_var("CODEXI_API_KEY");
}

#[tokio::test]
#[serial]
async fn gateway_error_message_is_surfaced() {
    let (url, _) = stub_gateway(400, json!({ "error": "Unsupported provider" })).await;

    let args = ModelsArgs { vendor: vendor(Some("k")) };
    let err = models(args, GatewayClient::new(url, None), OutputFormat::Text).await.unwrap_err();

    let exit = err.downcast_ref::<ExitError>().unwrap();
    assert_eq!(exit.code, 1);
    assert_eq!(exit.message, "Unsupported provider");
}
