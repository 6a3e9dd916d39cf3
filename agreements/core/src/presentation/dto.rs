// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Wire bodies for the JSON API.
//!
//! Shared by the server handlers and by `pact-sdk`, so both sides agree on
//! field names. Request fields default to empty so that a missing field is
//! reported as a validation error rather than a decoding failure.

use serde::{Deserialize, Serialize};

use crate::domain::agreement::{Agreement, ChatMessage, ChecklistItem, PublicAgreement};
use crate::domain::invite_code::InviteCode;

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgreementBody {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub creator_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinAgreementBody {
    #[serde(default)]
    pub invite_code: String,
    #[serde(default)]
    pub participant_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAgreementBody {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub participant_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMessageBody {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub sender_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChecklistItemBody {
    #[serde(default)]
    pub text: String,
    /// Calendar date `YYYY-MM-DD`; empty means no deadline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default)]
    pub participant_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreeBody {
    #[serde(default)]
    pub participant_name: String,
}

/// Query string for the participant-gated read
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticipantQuery {
    #[serde(default, alias = "participantName")]
    pub name: String,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgreementResponse {
    pub message: String,
    pub agreement: Agreement,
    pub invite_code: InviteCode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub agreement: Agreement,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicAgreementResponse {
    pub agreement: PublicAgreement,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessageResponse {
    pub message: String,
    pub new_message: ChatMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItemResponse {
    pub message: String,
    pub new_item: ChecklistItem,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreeResponse {
    pub message: String,
    pub agreement: Agreement,
    pub all_agreed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
    pub agreements: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
