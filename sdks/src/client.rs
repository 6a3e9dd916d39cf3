// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use pact_core::domain::agreement::{
    Agreement, AgreementId, ChatMessage, ChecklistItem, PublicAgreement,
};
use pact_core::presentation::dto::{
    AddChecklistItemBody, AddMessageBody, AgreeBody, AgreeResponse, AgreementResponse,
    CreateAgreementBody, CreateAgreementResponse, ErrorResponse, HealthResponse,
    JoinAgreementBody, NewItemResponse, NewMessageResponse, PublicAgreementResponse,
    UpdateAgreementBody,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// HTTP status of an API error, if the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Client for a running Pact server.
#[derive(Debug, Clone)]
pub struct PactClient {
    base_url: String,
    client: Client,
}

impl PactClient {
    /// Create a client for the server at `base_url`, e.g. `http://127.0.0.1:8000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Use a preconfigured `reqwest` client (timeouts, proxies).
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Create a draft agreement. The response carries the invite code to share.
    pub async fn create_agreement(
        &self,
        title: &str,
        description: Option<&str>,
        creator_name: &str,
    ) -> Result<CreateAgreementResponse> {
        let body = CreateAgreementBody {
            title: title.to_string(),
            description: description.map(str::to_string),
            creator_name: creator_name.to_string(),
        };
        self.send(self.client.post(self.url("/api/agreements")).json(&body))
            .await
    }

    pub async fn join_agreement(
        &self,
        invite_code: &str,
        participant_name: &str,
    ) -> Result<Agreement> {
        let body = JoinAgreementBody {
            invite_code: invite_code.to_string(),
            participant_name: participant_name.to_string(),
        };
        let response: AgreementResponse = self
            .send(self.client.post(self.url("/api/agreements/join")).json(&body))
            .await?;
        Ok(response.agreement)
    }

    /// Full agreement view, including chat and checklist. Participants only.
    pub async fn get_agreement(&self, id: AgreementId, participant_name: &str) -> Result<Agreement> {
        let request = self
            .client
            .get(self.url(&format!("/api/agreements/{}", id)))
            .query(&[("name", participant_name)]);
        let response: AgreementResponse = self.send(request).await?;
        Ok(response.agreement)
    }

    pub async fn get_public_agreement(&self, id: AgreementId) -> Result<PublicAgreement> {
        let response: PublicAgreementResponse = self
            .send(
                self.client
                    .get(self.url(&format!("/api/agreements/{}/public", id))),
            )
            .await?;
        Ok(response.agreement)
    }

    /// Replace title and description. Only the creator may do this.
    pub async fn update_agreement(
        &self,
        id: AgreementId,
        title: &str,
        description: Option<&str>,
        participant_name: &str,
    ) -> Result<Agreement> {
        let body = UpdateAgreementBody {
            title: title.to_string(),
            description: description.map(str::to_string),
            participant_name: participant_name.to_string(),
        };
        let response: AgreementResponse = self
            .send(
                self.client
                    .put(self.url(&format!("/api/agreements/{}", id)))
                    .json(&body),
            )
            .await?;
        Ok(response.agreement)
    }

    pub async fn add_message(
        &self,
        id: AgreementId,
        sender_name: &str,
        content: &str,
    ) -> Result<ChatMessage> {
        let body = AddMessageBody {
            content: content.to_string(),
            sender_name: sender_name.to_string(),
        };
        let response: NewMessageResponse = self
            .send(
                self.client
                    .post(self.url(&format!("/api/agreements/{}/chat", id)))
                    .json(&body),
            )
            .await?;
        Ok(response.new_message)
    }

    /// Add a checklist item. `deadline` is a `YYYY-MM-DD` date.
    pub async fn add_checklist_item(
        &self,
        id: AgreementId,
        text: &str,
        deadline: Option<&str>,
        participant_name: &str,
    ) -> Result<ChecklistItem> {
        let body = AddChecklistItemBody {
            text: text.to_string(),
            deadline: deadline.map(str::to_string),
            participant_name: participant_name.to_string(),
        };
        let response: NewItemResponse = self
            .send(
                self.client
                    .post(self.url(&format!("/api/agreements/{}/checklist", id)))
                    .json(&body),
            )
            .await?;
        Ok(response.new_item)
    }

    /// Record consent for `participant_name`. `all_agreed` is true on the call
    /// that completed the agreement.
    pub async fn agree(&self, id: AgreementId, participant_name: &str) -> Result<AgreeResponse> {
        let body = AgreeBody {
            participant_name: participant_name.to_string(),
        };
        self.send(
            self.client
                .post(self.url(&format!("/api/agreements/{}/agree", id)))
                .json(&body),
        )
        .await
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        self.send(self.client.get(self.url("/health"))).await
    }
}
