//! Gateway facade: one shared client plus one adapter per provider family.

use adgen_models::{MediaInput, MediaKind, ProviderFamily};

use crate::chat::ChatMessage;
use crate::client::KieClient;
use crate::config::GatewayConfig;
use crate::direct_poll::DirectPollProvider;
use crate::error::GatewayResult;
use crate::provider::RenderProvider;
use crate::task_poll::TaskPollProvider;

#[derive(Debug, Clone)]
pub struct Gateway {
    client: KieClient,
    direct_poll: DirectPollProvider,
    task_poll: TaskPollProvider,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let client = KieClient::new(config)?;
        Ok(Self {
            direct_poll: DirectPollProvider::new(client.clone()),
            task_poll: TaskPollProvider::new(client.clone()),
            client,
        })
    }

    pub fn from_env() -> GatewayResult<Self> {
        Self::new(GatewayConfig::from_env()?)
    }

    /// Adapter for a provider family.
    pub fn family(&self, family: ProviderFamily) -> &dyn RenderProvider {
        match family {
            ProviderFamily::DirectPoll => &self.direct_poll,
            ProviderFamily::TaskPoll => &self.task_poll,
        }
    }

    /// Direct-poll adapter, for its high-resolution lookup.
    pub fn direct_poll(&self) -> &DirectPollProvider {
        &self.direct_poll
    }

    pub fn client(&self) -> &KieClient {
        &self.client
    }

    pub async fn upload_media(&self, api_key: &str, media: &MediaInput, kind: MediaKind) -> GatewayResult<String> {
        self.client.upload_media(api_key, media, kind).await
    }

    pub async fn resolve_download_url(&self, api_key: &str, raw_url: &str) -> GatewayResult<String> {
        self.client.resolve_download_url(api_key, raw_url).await
    }

    pub async fn fetch_bytes(&self, url: &str) -> GatewayResult<Vec<u8>> {
        self.client.fetch_bytes(url).await
    }

    pub async fn check_credit(&self, api_key: &str) -> GatewayResult<f64> {
        self.client.check_credit(api_key).await
    }

    pub async fn chat_completion(&self, api_key: &str, messages: &[ChatMessage]) -> GatewayResult<String> {
        self.client.chat_completion(api_key, messages).await
    }
}
