//! Tool-continuation turns built backward into each vendor's shape

mod harness;

use harness::{MockTransport, client_with, payloads};
use http::StatusCode;
use switchboard_llm::{ContinuationContext, LlmError, Message, Role, ToolCall, ToolResult};

fn weather_result() -> Vec<ToolResult> {
    vec![ToolResult {
        tool_call_id: "call_w1".to_owned(),
        output: "18C and sunny".to_owned(),
    }]
}

fn tool_call_history(call_id: &str) -> Vec<Message> {
    vec![
        Message::user("What's the weather in Paris?"),
        Message {
            role: Role::Assistant,
            content: String::new(),
            tool_calls: Some(vec![ToolCall {
                id: call_id.to_owned(),
                name: "get_weather".to_owned(),
                arguments: serde_json::json!({"city": "Paris"}),
            }]),
            tool_call_id: None,
        },
    ]
}

#[tokio::test]
async fn openai_continuation_references_the_previous_response() {
    let transport = MockTransport::new().respond(StatusCode::OK, &payloads::openai::text_response());
    let requests = transport.requests();
    let client = client_with(transport);

    let context = ContinuationContext::response_id("gpt-4.1", "resp_tool");
    let resp = client
        .continue_with_tool_results("openai", &weather_result(), &context)
        .await
        .unwrap();
    assert!(resp.success);

    let recorded = requests.lock().unwrap();
    let body = &recorded[0].body;
    assert_eq!(body["previous_response_id"], "resp_tool");
    assert_eq!(body["model"], "gpt-4.1");
    assert_eq!(body["input"][0]["type"], "function_call_output");
    assert_eq!(body["input"][0]["call_id"], "call_w1");
    assert_eq!(body["input"][0]["output"], "18C and sunny");
}

#[tokio::test]
async fn anthropic_continuation_replays_the_full_history() {
    let transport = MockTransport::new().respond(StatusCode::OK, &payloads::anthropic::text_response());
    let requests = transport.requests();
    let client = client_with(transport);

    let mut results = weather_result();
    results[0].tool_call_id = "toolu_w1".to_owned();
    let context = ContinuationContext::history("claude-sonnet-4-0", tool_call_history("toolu_w1"));
    let resp = client
        .continue_with_tool_results("anthropic", &results, &context)
        .await
        .unwrap();
    assert!(resp.success);

    let recorded = requests.lock().unwrap();
    let messages = recorded[0].body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    // The assistant turn replays its tool_use block
    assert_eq!(messages[1]["content"][0]["type"], "tool_use");
    assert_eq!(messages[1]["content"][0]["id"], "toolu_w1");
    // The result rides on a trailing user message
    assert_eq!(messages[2]["role"], "user");
    assert_eq!(messages[2]["content"][0]["type"], "tool_result");
    assert_eq!(messages[2]["content"][0]["tool_use_id"], "toolu_w1");
}

#[tokio::test]
async fn google_continuation_round_trips_the_function_name() {
    let transport = MockTransport::new().respond(StatusCode::OK, &payloads::google::text_response());
    let requests = transport.requests();
    let client = client_with(transport);

    let mut results = weather_result();
    results[0].tool_call_id = "call_get_weather".to_owned();
    let context = ContinuationContext::history("gemini-2.5-flash", tool_call_history("call_get_weather"));
    let resp = client
        .continue_with_tool_results("google", &results, &context)
        .await
        .unwrap();
    assert!(resp.success);

    let recorded = requests.lock().unwrap();
    let contents = recorded[0].body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[2]["role"], "function");
    // The generated call id decodes back to the function name
    assert_eq!(contents[2]["parts"][0]["functionResponse"]["name"], "get_weather");
}

#[tokio::test]
async fn continuation_with_the_wrong_state_kind_is_rejected() {
    let transport = MockTransport::new();
    let requests = transport.requests();
    let client = client_with(transport);

    // OpenAI needs a response id, not history
    let history_context = ContinuationContext::history("gpt-4.1", tool_call_history("call_w1"));
    let err = client
        .continue_with_tool_results("openai", &weather_result(), &history_context)
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::MissingContinuationContext(_)));

    // Anthropic needs history, not a response id
    let id_context = ContinuationContext::response_id("claude-sonnet-4-0", "msg_tool");
    let err = client
        .continue_with_tool_results("anthropic", &weather_result(), &id_context)
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::MissingContinuationContext(_)));

    // Nothing reached the transport
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn empty_history_is_missing_context() {
    let client = client_with(MockTransport::new());
    let context = ContinuationContext::history("claude-sonnet-4-0", vec![]);
    let err = client
        .continue_with_tool_results("anthropic", &weather_result(), &context)
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::MissingContinuationContext(_)));
}
