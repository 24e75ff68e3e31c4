//! Streaming turns: SSE reassembly, chunk contract, accumulation

mod harness;

use harness::{MockTransport, client_with, payloads};
use http::StatusCode;
use switchboard_llm::{ChatRequest, FinishReason, LlmError, Message, StreamChunk};

fn question() -> ChatRequest {
    ChatRequest::new("any-model", vec![Message::user("What is the capital of France?")])
}

/// Re-split a wire stream into fixed-width fragments so line and event
/// boundaries land mid-fragment
fn resplit(fragments: &[Vec<u8>], width: usize) -> Vec<Vec<u8>> {
    let joined: Vec<u8> = fragments.concat();
    joined.chunks(width).map(<[u8]>::to_vec).collect()
}

async fn run_stream(client: &switchboard_llm::ChatClient, provider: &str) -> (Vec<StreamChunk>, switchboard_llm::ChatResponse) {
    let mut chunks = Vec::new();
    let resp = client
        .stream(provider, &question(), |chunk| chunks.push(chunk.clone()))
        .await
        .unwrap();
    (chunks, resp)
}

#[tokio::test]
async fn openai_stream_reassembles_across_fragment_boundaries() {
    let fragments = resplit(&payloads::openai::text_stream(), 7);
    let fragment_refs: Vec<&[u8]> = fragments.iter().map(Vec::as_slice).collect();
    let transport = MockTransport::new().respond_stream(StatusCode::OK, &fragment_refs);
    let requests = transport.requests();
    let client = client_with(transport);

    let (chunks, resp) = run_stream(&client, "openai").await;

    let text: String = chunks.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(text, "Paris");
    assert_eq!(chunks.iter().filter(|c| c.done).count(), 1);
    assert!(chunks.last().unwrap().done);
    assert!(chunks.iter().all(|c| c.provider == "openai"));

    assert_eq!(resp.content, "Paris");
    assert_eq!(resp.model, "gpt-4.1");
    assert_eq!(resp.response_id.as_deref(), Some("resp_s"));
    assert_eq!(resp.usage.total_tokens, 7);
    assert_eq!(resp.finish_reason, FinishReason::Stop);

    // The outgoing request asked for a stream
    let recorded = requests.lock().unwrap();
    assert_eq!(recorded[0].body["stream"], true);
}

#[tokio::test]
async fn anthropic_stream_completes_on_message_stop() {
    let fragments = resplit(&payloads::anthropic::text_stream(), 11);
    let fragment_refs: Vec<&[u8]> = fragments.iter().map(Vec::as_slice).collect();
    let transport = MockTransport::new().respond_stream(StatusCode::OK, &fragment_refs);
    let client = client_with(transport);

    let (chunks, resp) = run_stream(&client, "anthropic").await;

    assert_eq!(chunks.iter().filter(|c| c.done).count(), 1);
    assert_eq!(resp.content, "Paris");
    assert_eq!(resp.model, "claude-sonnet-4-0");
    assert_eq!(resp.usage.total_tokens, 7);
    assert_eq!(resp.finish_reason, FinishReason::Stop);
}

#[tokio::test]
async fn google_stream_completes_on_finish_reason() {
    let fragments = payloads::google::text_stream();
    let fragment_refs: Vec<&[u8]> = fragments.iter().map(Vec::as_slice).collect();
    let transport = MockTransport::new().respond_stream(StatusCode::OK, &fragment_refs);
    let client = client_with(transport);

    let (chunks, resp) = run_stream(&client, "google").await;

    assert_eq!(chunks.iter().filter(|c| c.done).count(), 1);
    assert_eq!(resp.content, "Paris");
    assert_eq!(resp.usage.total_tokens, 7);
    assert_eq!(resp.finish_reason, FinishReason::Stop);
}

#[tokio::test]
async fn stream_closing_before_completion_is_an_error() {
    // Everything but the terminal message_stop event
    let mut fragments = payloads::anthropic::text_stream();
    fragments.pop();
    let fragment_refs: Vec<&[u8]> = fragments.iter().map(Vec::as_slice).collect();
    let transport = MockTransport::new().respond_stream(StatusCode::OK, &fragment_refs);
    let client = client_with(transport);

    let err = client.stream("anthropic", &question(), |_| {}).await.unwrap_err();
    assert!(matches!(err, LlmError::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn stream_error_status_is_normalized() {
    let body = br#"{"error":{"message":"too many requests","type":"rate_limit_error"}}"#;
    let transport = MockTransport::new().respond_stream(StatusCode::TOO_MANY_REQUESTS, &[&body[..]]);
    let client = client_with(transport);

    let err = client.stream("openai", &question(), |_| {}).await.unwrap_err();
    assert_eq!(err, LlmError::RateLimited("too many requests".to_owned()));
}

#[tokio::test]
async fn failed_stream_surfaces_the_vendor_error() {
    let fragments: Vec<Vec<u8>> = vec![
        b"data: {\"type\":\"response.output_text.delta\",\"delta\":\"Par\"}\n\n".to_vec(),
        b"data: {\"type\":\"response.failed\",\"response\":{\"id\":\"resp_f\",\"model\":\"gpt-4.1\",\"status\":\"failed\",\"output\":[],\"error\":{\"message\":\"server overloaded\",\"code\":\"server_error\"}}}\n\n".to_vec(),
    ];
    let fragment_refs: Vec<&[u8]> = fragments.iter().map(Vec::as_slice).collect();
    let transport = MockTransport::new().respond_stream(StatusCode::OK, &fragment_refs);
    let client = client_with(transport);

    let (chunks, resp) = run_stream(&client, "openai").await;

    assert!(chunks.last().unwrap().done);
    assert!(!resp.success);
    assert_eq!(resp.finish_reason, FinishReason::Error);
    assert_eq!(resp.error, Some(LlmError::Unknown("server overloaded".to_owned())));
}

#[tokio::test]
async fn tool_call_stream_is_stitched_into_the_final_response() {
    let fragments: Vec<Vec<u8>> = vec![
        b"data: {\"type\":\"response.output_item.added\",\"item\":{\"type\":\"function_call\",\"id\":\"fc_1\",\"call_id\":\"call_w1\",\"name\":\"get_weather\",\"arguments\":\"\"}}\n\n".to_vec(),
        b"data: {\"type\":\"response.function_call_arguments.delta\",\"item_id\":\"fc_1\",\"delta\":\"{\\\"city\\\":\"}\n\n".to_vec(),
        b"data: {\"type\":\"response.function_call_arguments.delta\",\"item_id\":\"fc_1\",\"delta\":\"\\\"Paris\\\"}\"}\n\n".to_vec(),
        b"data: [DONE]\n\n".to_vec(),
    ];
    let fragment_refs: Vec<&[u8]> = fragments.iter().map(Vec::as_slice).collect();
    let transport = MockTransport::new().respond_stream(StatusCode::OK, &fragment_refs);
    let client = client_with(transport);

    let (_, resp) = run_stream(&client, "openai").await;
    assert_eq!(resp.finish_reason, FinishReason::ToolCalls);
    assert_eq!(resp.tool_calls.len(), 1);
    assert_eq!(resp.tool_calls[0].id, "call_w1");
    assert_eq!(resp.tool_calls[0].name, "get_weather");
    assert_eq!(resp.tool_calls[0].arguments, serde_json::json!({"city": "Paris"}));
}
