// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Agreement Use Cases
//!
//! [`AgreementService`] is the application boundary for everything a caller can
//! do with an agreement. [`StandardAgreementService`] implements it on top of
//! an [`AgreementRepository`].
//!
//! Every operation checks its inputs in the same order so callers see
//! consistent errors: missing fields (`Validation`), then unknown agreement
//! (`NotFound`), then authorization (`Forbidden`), then state (`Conflict`).

use async_trait::async_trait;
use chrono::NaiveDate;
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::agreement::{
    require_non_empty, Agreement, AgreementError, AgreementId, ChatMessage, ChecklistItem,
    PublicAgreement,
};
use crate::domain::invite_code::{InviteCode, InviteCodeGenerator};
use crate::domain::repository::{AgreementRepository, RepositoryError};

/// Default number of invite codes tried before `create_agreement` gives up.
pub const MAX_INVITE_CODE_ATTEMPTS: u32 = 32;

const NOT_FOUND: &str = "agreement not found";

/// Errors surfaced to callers of [`AgreementService`].
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<AgreementError> for ServiceError {
    fn from(err: AgreementError) -> Self {
        match err {
            AgreementError::Validation(msg) => Self::Validation(msg),
            AgreementError::Forbidden(msg) => Self::Forbidden(msg),
            AgreementError::Conflict(msg) => Self::Conflict(msg),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => Self::NotFound(NOT_FOUND.to_string()),
            RepositoryError::Rejected(e) => e.into(),
            RepositoryError::InviteCodeTaken(_) | RepositoryError::Unknown(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateAgreementRequest {
    pub title: String,
    pub description: Option<String>,
    pub creator_name: String,
}

#[derive(Debug, Clone)]
pub struct UpdateAgreementRequest {
    pub title: String,
    pub description: Option<String>,
    pub participant_name: String,
}

#[derive(Debug, Clone)]
pub struct AddChecklistItemRequest {
    pub text: String,
    pub deadline: Option<NaiveDate>,
    pub participant_name: String,
}

/// Result of recording one participant's consent.
#[derive(Debug, Clone)]
pub struct AgreementOutcome {
    pub agreement: Agreement,
    pub all_agreed: bool,
}

#[async_trait]
pub trait AgreementService: Send + Sync {
    async fn create_agreement(
        &self,
        request: CreateAgreementRequest,
    ) -> Result<Agreement, ServiceError>;

    async fn join_agreement(
        &self,
        invite_code: &str,
        participant_name: &str,
    ) -> Result<Agreement, ServiceError>;

    async fn get_agreement(
        &self,
        id: AgreementId,
        participant_name: &str,
    ) -> Result<Agreement, ServiceError>;

    async fn get_public_agreement(&self, id: AgreementId) -> Result<PublicAgreement, ServiceError>;

    async fn update_agreement(
        &self,
        id: AgreementId,
        request: UpdateAgreementRequest,
    ) -> Result<Agreement, ServiceError>;

    async fn add_message(
        &self,
        id: AgreementId,
        sender_name: &str,
        content: &str,
    ) -> Result<ChatMessage, ServiceError>;

    async fn add_checklist_item(
        &self,
        id: AgreementId,
        request: AddChecklistItemRequest,
    ) -> Result<ChecklistItem, ServiceError>;

    async fn record_agreement(
        &self,
        id: AgreementId,
        participant_name: &str,
    ) -> Result<AgreementOutcome, ServiceError>;

    async fn count_agreements(&self) -> Result<usize, ServiceError>;
}

pub struct StandardAgreementService {
    repository: Arc<dyn AgreementRepository>,
    invite_codes: Arc<dyn InviteCodeGenerator>,
    invite_code_attempts: u32,
}

impl StandardAgreementService {
    pub fn new(
        repository: Arc<dyn AgreementRepository>,
        invite_codes: Arc<dyn InviteCodeGenerator>,
    ) -> Self {
        Self {
            repository,
            invite_codes,
            invite_code_attempts: MAX_INVITE_CODE_ATTEMPTS,
        }
    }

    /// Override how many invite codes are tried per create. Clamped to at least 1.
    pub fn with_invite_code_attempts(mut self, attempts: u32) -> Self {
        self.invite_code_attempts = attempts.max(1);
        self
    }
}

#[async_trait]
impl AgreementService for StandardAgreementService {
    async fn create_agreement(
        &self,
        request: CreateAgreementRequest,
    ) -> Result<Agreement, ServiceError> {
        const REQUIRED: &str = "title and creator name are required";
        require_non_empty(&request.title, REQUIRED)?;
        require_non_empty(&request.creator_name, REQUIRED)?;
        let description = request.description.unwrap_or_default();

        for attempt in 1..=self.invite_code_attempts {
            let agreement = Agreement::new(
                request.title.clone(),
                description.clone(),
                request.creator_name.clone(),
                self.invite_codes.generate(),
            )?;

            match self.repository.insert(agreement.clone()).await {
                Ok(()) => {
                    info!(
                        agreement_id = %agreement.id,
                        creator = %request.creator_name,
                        "Agreement created"
                    );
                    counter!("pact_agreements_created_total").increment(1);
                    return Ok(agreement);
                }
                Err(RepositoryError::InviteCodeTaken(code)) => {
                    debug!(attempt, code = %code, "Invite code collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ServiceError::Internal(format!(
            "could not allocate a unique invite code after {} attempts",
            self.invite_code_attempts
        )))
    }

    async fn join_agreement(
        &self,
        invite_code: &str,
        participant_name: &str,
    ) -> Result<Agreement, ServiceError> {
        const REQUIRED: &str = "invite code and name are required";
        require_non_empty(invite_code, REQUIRED)?;
        require_non_empty(participant_name, REQUIRED)?;

        let code = InviteCode::normalize(invite_code);
        let target = self
            .repository
            .find_by_invite_code(&code)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound("no agreement found for this invite code".to_string())
            })?;

        let name = participant_name.to_string();
        let agreement = self
            .repository
            .modify(
                target.id,
                Box::new(move |agreement: &mut Agreement| agreement.join(name).map(|_| ())),
            )
            .await?;

        info!(
            agreement_id = %agreement.id,
            participant = %participant_name,
            status = %agreement.status,
            "Participant joined agreement"
        );
        counter!("pact_participants_joined_total").increment(1);
        Ok(agreement)
    }

    async fn get_agreement(
        &self,
        id: AgreementId,
        participant_name: &str,
    ) -> Result<Agreement, ServiceError> {
        require_non_empty(participant_name, "participant name is required")?;

        let agreement = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))?;
        agreement.ensure_participant(participant_name)?;

        debug!(agreement_id = %id, participant = %participant_name, "Agreement read");
        Ok(agreement)
    }

    async fn get_public_agreement(&self, id: AgreementId) -> Result<PublicAgreement, ServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .map(|agreement| agreement.public_view())
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))
    }

    async fn update_agreement(
        &self,
        id: AgreementId,
        request: UpdateAgreementRequest,
    ) -> Result<Agreement, ServiceError> {
        require_non_empty(&request.participant_name, "participant name is required")?;
        require_non_empty(&request.title, "title is required")?;

        let requested_by = request.participant_name.clone();
        let title = request.title;
        let description = request.description.unwrap_or_default();
        let agreement = self
            .repository
            .modify(
                id,
                Box::new(move |agreement: &mut Agreement| {
                    agreement.update_details(&requested_by, title, description)
                }),
            )
            .await?;

        info!(agreement_id = %id, "Agreement details updated");
        Ok(agreement)
    }

    async fn add_message(
        &self,
        id: AgreementId,
        sender_name: &str,
        content: &str,
    ) -> Result<ChatMessage, ServiceError> {
        const REQUIRED: &str = "message content and sender name are required";
        require_non_empty(content, REQUIRED)?;
        require_non_empty(sender_name, REQUIRED)?;

        let sender = sender_name.to_string();
        let body = content.to_string();
        let agreement = self
            .repository
            .modify(
                id,
                Box::new(move |agreement: &mut Agreement| {
                    agreement.post_message(sender, body).map(|_| ())
                }),
            )
            .await?;

        let message = agreement
            .chat
            .last()
            .cloned()
            .ok_or_else(|| ServiceError::Internal("chat message was not stored".to_string()))?;

        debug!(agreement_id = %id, message_id = ?message.id, "Chat message added");
        counter!("pact_chat_messages_total").increment(1);
        Ok(message)
    }

    async fn add_checklist_item(
        &self,
        id: AgreementId,
        request: AddChecklistItemRequest,
    ) -> Result<ChecklistItem, ServiceError> {
        const REQUIRED: &str = "item text and participant name are required";
        require_non_empty(&request.text, REQUIRED)?;
        require_non_empty(&request.participant_name, REQUIRED)?;

        let AddChecklistItemRequest {
            text,
            deadline,
            participant_name,
        } = request;
        let agreement = self
            .repository
            .modify(
                id,
                Box::new(move |agreement: &mut Agreement| {
                    agreement
                        .add_checklist_item(&participant_name, text, deadline)
                        .map(|_| ())
                }),
            )
            .await?;

        let item = agreement
            .checklist
            .last()
            .cloned()
            .ok_or_else(|| ServiceError::Internal("checklist item was not stored".to_string()))?;

        debug!(agreement_id = %id, item_id = ?item.id, "Checklist item added");
        counter!("pact_checklist_items_total").increment(1);
        Ok(item)
    }

    async fn record_agreement(
        &self,
        id: AgreementId,
        participant_name: &str,
    ) -> Result<AgreementOutcome, ServiceError> {
        require_non_empty(participant_name, "participant name is required")?;

        let name = participant_name.to_string();
        let agreement = self
            .repository
            .modify(
                id,
                Box::new(move |agreement: &mut Agreement| {
                    agreement.record_agreement(&name).map(|_| ())
                }),
            )
            .await?;

        let all_agreed = agreement.all_agreed();
        info!(
            agreement_id = %id,
            participant = %participant_name,
            all_agreed,
            "Participant agreed"
        );
        if all_agreed {
            info!(agreement_id = %id, "All participants agreed; agreement is now agreed");
            counter!("pact_agreements_agreed_total").increment(1);
        }

        Ok(AgreementOutcome {
            agreement,
            all_agreed,
        })
    }

    async fn count_agreements(&self) -> Result<usize, ServiceError> {
        Ok(self.repository.count().await?)
    }
}
