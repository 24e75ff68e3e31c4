//! Shared test harness: a scriptable transport and canned vendor payloads

pub mod payloads;
pub mod transport;

use std::collections::HashMap;

use switchboard_llm::{ChatClient, ProviderConfig, ProviderKind, ProviderRegistry};
use url::Url;

pub use transport::MockTransport;

/// Client over a registry with all five providers and a scripted transport
pub fn client_with(transport: MockTransport) -> ChatClient {
    let mut providers = HashMap::new();
    providers.insert(
        "openai".to_owned(),
        ProviderConfig::new(ProviderKind::OpenAi).with_api_key("sk-test"),
    );
    providers.insert(
        "anthropic".to_owned(),
        ProviderConfig::new(ProviderKind::Anthropic).with_api_key("sk-ant-test"),
    );
    providers.insert(
        "google".to_owned(),
        ProviderConfig::new(ProviderKind::Google).with_api_key("aiza-test"),
    );
    providers.insert(
        "xai".to_owned(),
        ProviderConfig::new(ProviderKind::OpenAiCompat)
            .with_base_url(Url::parse("https://api.x.ai/v1").unwrap())
            .with_api_key("xai-test"),
    );
    providers.insert(
        "deepseek".to_owned(),
        ProviderConfig::new(ProviderKind::OpenAiCompat)
            .with_base_url(Url::parse("https://api.deepseek.com/v1").unwrap())
            .with_api_key("ds-test"),
    );

    let registry = ProviderRegistry::from_config(&providers).unwrap();
    ChatClient::new(registry, Box::new(transport))
}
