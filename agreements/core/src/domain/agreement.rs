// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Agreement Aggregate
//!
//! An [`Agreement`] is one negotiated arrangement among named participants.
//! All rule checks for joining, chatting, adding checklist items and
//! recording consent live on the aggregate; the application layer only loads
//! it, calls one method and stores it back.
//!
//! ## Status Lifecycle
//!
//! ```text
//! Draft ──(second participant joins)──▶ Pending ──(everyone agreed)──▶ Agreed
//! ```
//!
//! `Completed` and `Cancelled` exist on the wire but nothing transitions into
//! them yet, and nothing transitions out of `Agreed`.
//!
//! ## Invariants
//!
//! - `participants[0]` is the creator and is never removed.
//! - Participant names are unique within one agreement. The name is the only
//!   identity a participant has.
//! - Chat is append-only; messages are never edited or removed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::invite_code::InviteCode;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for an agreement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgreementId(pub Uuid);

impl AgreementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for AgreementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AgreementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub Uuid);

impl ParticipantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChecklistItemId(pub Uuid);

impl ChecklistItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ChecklistItemId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Entities & Value Objects
// ============================================================================

/// Lifecycle state of an [`Agreement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgreementStatus {
    /// Only the creator has joined.
    Draft,
    /// At least two participants, not everyone has agreed yet.
    Pending,
    /// Every participant has agreed.
    Agreed,
    Completed,
    Cancelled,
}

impl std::fmt::Display for AgreementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Agreed => "agreed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// A named party to an agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub has_agreed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreed_at: Option<DateTime<Utc>>,
}

impl Participant {
    fn new(name: String) -> Self {
        Self {
            id: ParticipantId::new(),
            name,
            has_agreed: false,
            agreed_at: None,
        }
    }
}

/// A discrete term attached to an agreement, optionally with a deadline.
///
/// `is_completed` is always `false` and `completed_at` always `None`: there is
/// no operation that completes an item yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: ChecklistItemId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// One entry in the agreement chat. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender_name: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Errors raised when an operation violates an agreement rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgreementError {
    /// A required field is missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// The caller is not allowed to perform this action on the agreement.
    #[error("{0}")]
    Forbidden(String),

    /// The action clashes with the current state (duplicate name, double agree).
    #[error("{0}")]
    Conflict(String),
}

/// Fail with [`AgreementError::Validation`] when `value` is empty or blank.
pub fn require_non_empty(value: &str, message: &str) -> Result<(), AgreementError> {
    if value.trim().is_empty() {
        return Err(AgreementError::Validation(message.to_string()));
    }
    Ok(())
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Aggregate root for one arrangement among participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agreement {
    pub id: AgreementId,
    pub title: String,
    pub description: String,
    /// Join order; the first entry is the creator.
    pub participants: Vec<Participant>,
    pub checklist: Vec<ChecklistItem>,
    pub chat: Vec<ChatMessage>,
    pub status: AgreementStatus,
    pub invite_code: InviteCode,
    pub created_at: DateTime<Utc>,
}

impl Agreement {
    /// Start a new draft agreement with the creator as its only participant.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        creator_name: impl Into<String>,
        invite_code: InviteCode,
    ) -> Result<Self, AgreementError> {
        let title = title.into();
        let creator_name = creator_name.into();
        require_non_empty(&title, "title and creator name are required")?;
        require_non_empty(&creator_name, "title and creator name are required")?;

        Ok(Self {
            id: AgreementId::new(),
            title,
            description: description.into(),
            participants: vec![Participant::new(creator_name)],
            checklist: Vec::new(),
            chat: Vec::new(),
            status: AgreementStatus::Draft,
            invite_code,
            created_at: Utc::now(),
        })
    }

    /// The participant who created the agreement.
    pub fn creator(&self) -> Option<&Participant> {
        self.participants.first()
    }

    pub fn participant(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name == name)
    }

    pub fn is_participant(&self, name: &str) -> bool {
        self.participant(name).is_some()
    }

    pub fn is_creator(&self, name: &str) -> bool {
        self.creator().is_some_and(|p| p.name == name)
    }

    /// Fail with [`AgreementError::Forbidden`] unless `name` has joined.
    pub fn ensure_participant(&self, name: &str) -> Result<(), AgreementError> {
        if !self.is_participant(name) {
            return Err(AgreementError::Forbidden(
                "access denied: you are not a participant of this agreement".to_string(),
            ));
        }
        Ok(())
    }

    /// True once every participant has agreed.
    pub fn all_agreed(&self) -> bool {
        self.participants.iter().all(|p| p.has_agreed)
    }

    /// Add a participant by name.
    ///
    /// A draft becomes pending; any other status is left as it is.
    pub fn join(&mut self, name: impl Into<String>) -> Result<&Participant, AgreementError> {
        let name = name.into();
        require_non_empty(&name, "invite code and name are required")?;
        if self.is_participant(&name) {
            return Err(AgreementError::Conflict(format!(
                "a participant named '{}' already exists in this agreement",
                name
            )));
        }

        self.participants.push(Participant::new(name));
        if self.status == AgreementStatus::Draft {
            self.status = AgreementStatus::Pending;
        }

        Ok(&self.participants[self.participants.len() - 1])
    }

    /// Overwrite title and description. Only the creator may do this.
    pub fn update_details(
        &mut self,
        requested_by: &str,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<(), AgreementError> {
        let title = title.into();
        require_non_empty(requested_by, "participant name is required")?;
        require_non_empty(&title, "title is required")?;
        if !self.is_creator(requested_by) {
            return Err(AgreementError::Forbidden(
                "only the creator can edit this agreement".to_string(),
            ));
        }

        self.title = title;
        self.description = description.into();
        Ok(())
    }

    /// Append a chat message from a participant.
    pub fn post_message(
        &mut self,
        sender_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<&ChatMessage, AgreementError> {
        let sender_name = sender_name.into();
        let content = content.into();
        require_non_empty(&content, "message content and sender name are required")?;
        require_non_empty(&sender_name, "message content and sender name are required")?;
        self.ensure_participant(&sender_name)?;

        self.chat.push(ChatMessage {
            id: MessageId::new(),
            sender_name,
            content,
            timestamp: Utc::now(),
        });

        Ok(&self.chat[self.chat.len() - 1])
    }

    /// Append a checklist item on behalf of a participant.
    pub fn add_checklist_item(
        &mut self,
        requested_by: &str,
        text: impl Into<String>,
        deadline: Option<NaiveDate>,
    ) -> Result<&ChecklistItem, AgreementError> {
        let text = text.into();
        require_non_empty(&text, "item text and participant name are required")?;
        require_non_empty(requested_by, "item text and participant name are required")?;
        self.ensure_participant(requested_by)?;

        self.checklist.push(ChecklistItem {
            id: ChecklistItemId::new(),
            text,
            deadline,
            is_completed: false,
            completed_at: None,
            created_at: Utc::now(),
        });

        Ok(&self.checklist[self.checklist.len() - 1])
    }

    /// Mark `name` as agreeing. Returns whether everyone has now agreed.
    ///
    /// The status moves to `Agreed` the moment the last participant agrees.
    pub fn record_agreement(&mut self, name: &str) -> Result<bool, AgreementError> {
        require_non_empty(name, "participant name is required")?;
        let participant = self
            .participants
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| {
                AgreementError::Forbidden(
                    "access denied: you are not a participant of this agreement".to_string(),
                )
            })?;

        if participant.has_agreed {
            return Err(AgreementError::Conflict(format!(
                "'{}' has already agreed to this agreement",
                name
            )));
        }

        participant.has_agreed = true;
        participant.agreed_at = Some(Utc::now());

        let all_agreed = self.all_agreed();
        if all_agreed {
            self.status = AgreementStatus::Agreed;
        }
        Ok(all_agreed)
    }

    /// Reduced view for visitors who have not joined yet.
    pub fn public_view(&self) -> PublicAgreement {
        PublicAgreement {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            invite_code: self.invite_code.clone(),
            status: self.status,
            participants: self
                .participants
                .iter()
                .map(|p| PublicParticipant {
                    id: p.id,
                    name: p.name.clone(),
                    has_agreed: p.has_agreed,
                })
                .collect(),
            created_at: self.created_at,
        }
    }
}

// ============================================================================
// Public Projection
// ============================================================================

/// What an unverified visitor may see: enough to decide whether to join.
/// Never carries chat or checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicAgreement {
    pub id: AgreementId,
    pub title: String,
    pub description: String,
    pub invite_code: InviteCode,
    pub status: AgreementStatus,
    pub participants: Vec<PublicParticipant>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicParticipant {
    pub id: ParticipantId,
    pub name: String,
    pub has_agreed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code() -> InviteCode {
        InviteCode::from_generated("ABC123".to_string()).unwrap()
    }

    fn draft() -> Agreement {
        Agreement::new("Split rent", "", "Alice", code()).unwrap()
    }

    #[test]
    fn test_new_agreement_is_draft_with_creator() {
        let agreement = draft();
        assert_eq!(agreement.status, AgreementStatus::Draft);
        assert_eq!(agreement.participants.len(), 1);
        assert_eq!(agreement.participants[0].name, "Alice");
        assert!(!agreement.participants[0].has_agreed);
        assert!(agreement.participants[0].agreed_at.is_none());
        assert!(agreement.chat.is_empty());
        assert!(agreement.checklist.is_empty());
    }

    #[test]
    fn test_new_agreement_requires_title_and_creator() {
        assert!(matches!(
            Agreement::new("", "desc", "Alice", code()),
            Err(AgreementError::Validation(_))
        ));
        assert!(matches!(
            Agreement::new("Title", "desc", "   ", code()),
            Err(AgreementError::Validation(_))
        ));
    }

    #[test]
    fn test_join_moves_draft_to_pending() {
        let mut agreement = draft();
        let joined = agreement.join("Bob").unwrap().name.clone();
        assert_eq!(joined, "Bob");
        assert_eq!(agreement.status, AgreementStatus::Pending);
        assert_eq!(agreement.participants.len(), 2);
        assert_eq!(agreement.participants[1].name, "Bob");

        agreement.join("Carol").unwrap();
        assert_eq!(agreement.status, AgreementStatus::Pending);
        assert_eq!(agreement.participants[0].name, "Alice");
    }

    #[test]
    fn test_join_rejects_duplicate_name() {
        let mut agreement = draft();
        agreement.join("Bob").unwrap();
        assert!(matches!(agreement.join("Bob"), Err(AgreementError::Conflict(_))));
        assert!(matches!(agreement.join("Alice"), Err(AgreementError::Conflict(_))));
        assert_eq!(agreement.participants.len(), 2);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut agreement = draft();
        agreement.join("alice").unwrap();
        assert_eq!(agreement.participants.len(), 2);
        assert!(!agreement.is_creator("alice"));
    }

    #[test]
    fn test_only_creator_updates_details() {
        let mut agreement = draft();
        agreement.join("Bob").unwrap();

        let err = agreement.update_details("Bob", "New", "x").unwrap_err();
        assert!(matches!(err, AgreementError::Forbidden(_)));
        assert_eq!(agreement.title, "Split rent");

        agreement.update_details("Alice", "New", "x").unwrap();
        assert_eq!(agreement.title, "New");
        assert_eq!(agreement.description, "x");
    }

    #[test]
    fn test_chat_requires_participant() {
        let mut agreement = draft();
        assert!(matches!(
            agreement.post_message("Mallory", "hi"),
            Err(AgreementError::Forbidden(_))
        ));
        assert!(matches!(
            agreement.post_message("Alice", ""),
            Err(AgreementError::Validation(_))
        ));

        agreement.post_message("Alice", "first").unwrap();
        agreement.post_message("Alice", "first").unwrap();
        assert_eq!(agreement.chat.len(), 2);
        assert_eq!(agreement.chat[0].content, "first");
        assert_ne!(agreement.chat[0].id, agreement.chat[1].id);
    }

    #[test]
    fn test_checklist_items_start_incomplete() {
        let mut agreement = draft();
        let deadline = NaiveDate::from_ymd_opt(2026, 12, 31);
        let item = agreement
            .add_checklist_item("Alice", "Pay deposit", deadline)
            .unwrap()
            .clone();
        assert!(!item.is_completed);
        assert!(item.completed_at.is_none());
        assert_eq!(item.deadline, deadline);

        assert!(matches!(
            agreement.add_checklist_item("Mallory", "x", None),
            Err(AgreementError::Forbidden(_))
        ));
    }

    #[test]
    fn test_record_agreement_flow() {
        let mut agreement = draft();
        agreement.join("Bob").unwrap();

        assert!(!agreement.record_agreement("Alice").unwrap());
        assert_eq!(agreement.status, AgreementStatus::Pending);
        assert!(agreement.participants[0].has_agreed);
        assert!(agreement.participants[0].agreed_at.is_some());

        assert!(agreement.record_agreement("Bob").unwrap());
        assert_eq!(agreement.status, AgreementStatus::Agreed);

        assert!(matches!(
            agreement.record_agreement("Bob"),
            Err(AgreementError::Conflict(_))
        ));
        assert_eq!(agreement.status, AgreementStatus::Agreed);
    }

    #[test]
    fn test_sole_creator_agreeing_marks_agreed() {
        let mut agreement = draft();
        assert!(agreement.record_agreement("Alice").unwrap());
        assert_eq!(agreement.status, AgreementStatus::Agreed);
    }

    #[test]
    fn test_record_agreement_rejects_outsider() {
        let mut agreement = draft();
        assert!(matches!(
            agreement.record_agreement("Mallory"),
            Err(AgreementError::Forbidden(_))
        ));
    }

    #[test]
    fn test_public_view_omits_chat_and_checklist() {
        let mut agreement = draft();
        agreement.post_message("Alice", "secret").unwrap();
        agreement.add_checklist_item("Alice", "hidden", None).unwrap();

        let view = agreement.public_view();
        assert_eq!(view.participants.len(), 1);
        assert_eq!(view.invite_code, agreement.invite_code);

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("chat").is_none());
        assert!(json.get("checklist").is_none());
        assert!(json["participants"][0].get("agreedAt").is_none());
        assert_eq!(json["status"], "draft");
        assert_eq!(json["inviteCode"], "ABC123");
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let agreement = draft();
        let json = serde_json::to_value(&agreement).unwrap();
        assert_eq!(json["participants"][0]["hasAgreed"], false);
        assert!(json.get("createdAt").is_some());
        assert!(json["chat"].as_array().unwrap().is_empty());
    }
}
