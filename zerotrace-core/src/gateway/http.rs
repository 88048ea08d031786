// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! HTTP gateway for the messaging service
//!
//! JSON over HTTP with:
//! - Request timeout
//! - Proxy support (for Tor)

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::{GatewayError, GatewayResult, RemoteGateway};
use crate::config::ClientConfig;
use crate::types::{CreatedIdentity, Message, RemoteThread, SendReceipt, SendRequest, StateRoot};

/// Talks to the messaging service over HTTP.
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a new gateway from config
    pub fn new(config: &ClientConfig) -> Result<Self, GatewayError> {
        let mut builder = Client::builder().timeout(config.request_timeout).user_agent(format!(
            "ZeroTrace/{}",
            option_env!("CARGO_PKG_VERSION").unwrap_or("0.1.0")
        ));

        if let Some(proxy_url) = &config.proxy_url {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| GatewayError::Configuration(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            client: builder
                .build()
                .map_err(|e| GatewayError::Configuration(e.to_string()))?,
            base_url: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let response = self.client.get(self.url(path)).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
    if !response.status().is_success() {
        return Err(GatewayError::Http(response.status().as_u16()));
    }
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| GatewayError::Malformed(e.to_string()))
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn create_identity(&self) -> GatewayResult<CreatedIdentity> {
        let response = self
            .client
            .post(self.url("identity/create"))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;
        decode(response).await
    }

    async fn list_threads(&self, identity_hash: &str) -> GatewayResult<Vec<RemoteThread>> {
        self.get_json(&format!("threads/{}", identity_hash)).await
    }

    async fn read_messages(&self, thread_id: &str) -> GatewayResult<Vec<Message>> {
        self.get_json(&format!("read/{}", thread_id)).await
    }

    async fn send_message(&self, request: &SendRequest) -> GatewayResult<SendReceipt> {
        let response = self
            .client
            .post(self.url("send"))
            .json(request)
            .send()
            .await?;
        decode(response).await
    }

    async fn get_state_root(&self, identity_hash: &str) -> GatewayResult<StateRoot> {
        self.get_json(&format!("cstate/{}", identity_hash)).await
    }
}
