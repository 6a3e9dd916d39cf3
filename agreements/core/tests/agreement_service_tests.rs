// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use pact_core::application::agreement_service::{
    AddChecklistItemRequest, AgreementService, CreateAgreementRequest, ServiceError,
    StandardAgreementService, UpdateAgreementRequest,
};
use pact_core::domain::agreement::{AgreementId, AgreementStatus};
use pact_core::domain::invite_code::{InviteCode, InviteCodeGenerator};
use pact_core::infrastructure::invite_code::RandomInviteCodeGenerator;
use pact_core::infrastructure::repositories::InMemoryAgreementRepository;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Hands out a fixed sequence of codes, repeating the last one forever.
struct ScriptedInviteCodes {
    codes: Mutex<VecDeque<&'static str>>,
}

impl ScriptedInviteCodes {
    fn new(codes: &[&'static str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().copied().collect()),
        }
    }
}

impl InviteCodeGenerator for ScriptedInviteCodes {
    fn generate(&self) -> InviteCode {
        let mut codes = self.codes.lock().unwrap();
        let code = if codes.len() > 1 {
            codes.pop_front().unwrap()
        } else {
            codes[0]
        };
        InviteCode::from_generated(code.to_string()).unwrap()
    }
}

fn service() -> StandardAgreementService {
    StandardAgreementService::new(
        Arc::new(InMemoryAgreementRepository::new()),
        Arc::new(RandomInviteCodeGenerator::new()),
    )
}

fn create_request(title: &str, creator: &str) -> CreateAgreementRequest {
    CreateAgreementRequest {
        title: title.to_string(),
        description: None,
        creator_name: creator.to_string(),
    }
}

#[tokio::test]
async fn test_split_rent_walkthrough() {
    let service = service();

    let created = service
        .create_agreement(create_request("Split rent", "Alice"))
        .await
        .unwrap();
    assert_eq!(created.status, AgreementStatus::Draft);
    assert_eq!(created.description, "");
    assert_eq!(created.participants.len(), 1);
    assert_eq!(created.participants[0].name, "Alice");
    assert!(!created.participants[0].has_agreed);

    let code = created.invite_code.as_str().to_lowercase();
    let joined = service.join_agreement(&code, "Bob").await.unwrap();
    assert_eq!(joined.status, AgreementStatus::Pending);
    let names: Vec<_> = joined.participants.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bob"]);

    let outcome = service.record_agreement(created.id, "Alice").await.unwrap();
    assert!(!outcome.all_agreed);
    assert_eq!(outcome.agreement.status, AgreementStatus::Pending);
    assert!(outcome.agreement.participants[0].has_agreed);

    let outcome = service.record_agreement(created.id, "Bob").await.unwrap();
    assert!(outcome.all_agreed);
    assert_eq!(outcome.agreement.status, AgreementStatus::Agreed);

    let err = service.record_agreement(created.id, "Bob").await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let stored = service.get_agreement(created.id, "Alice").await.unwrap();
    assert_eq!(stored.status, AgreementStatus::Agreed);
}

#[tokio::test]
async fn test_create_requires_title_and_creator() {
    let service = service();
    assert!(matches!(
        service.create_agreement(create_request("", "Alice")).await,
        Err(ServiceError::Validation(_))
    ));
    assert!(matches!(
        service.create_agreement(create_request("Title", "")).await,
        Err(ServiceError::Validation(_))
    ));
    assert_eq!(service.count_agreements().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_regenerates_colliding_invite_codes() {
    let service = StandardAgreementService::new(
        Arc::new(InMemoryAgreementRepository::new()),
        Arc::new(ScriptedInviteCodes::new(&["AAAAAA", "AAAAAA", "AAAAAA", "BBBBBB"])),
    );

    let first = service
        .create_agreement(create_request("One", "Alice"))
        .await
        .unwrap();
    let second = service
        .create_agreement(create_request("Two", "Alice"))
        .await
        .unwrap();

    assert_eq!(first.invite_code.as_str(), "AAAAAA");
    assert_eq!(second.invite_code.as_str(), "BBBBBB");
}

#[tokio::test]
async fn test_create_gives_up_after_bounded_attempts() {
    let service = StandardAgreementService::new(
        Arc::new(InMemoryAgreementRepository::new()),
        Arc::new(ScriptedInviteCodes::new(&["AAAAAA"])),
    )
    .with_invite_code_attempts(3);

    service
        .create_agreement(create_request("One", "Alice"))
        .await
        .unwrap();
    let err = service
        .create_agreement(create_request("Two", "Alice"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Internal(_)));
    assert_eq!(service.count_agreements().await.unwrap(), 1);
}

#[tokio::test]
async fn test_join_errors() {
    let service = service();
    let created = service
        .create_agreement(create_request("Trip", "Alice"))
        .await
        .unwrap();
    let code = created.invite_code.to_string();

    assert!(matches!(
        service.join_agreement("", "Bob").await,
        Err(ServiceError::Validation(_))
    ));
    assert!(matches!(
        service.join_agreement(&code, " ").await,
        Err(ServiceError::Validation(_))
    ));
    assert!(matches!(
        service.join_agreement("NOPE00", "Bob").await,
        Err(ServiceError::NotFound(_))
    ));

    service.join_agreement(&code, "Bob").await.unwrap();
    assert!(matches!(
        service.join_agreement(&code, "Bob").await,
        Err(ServiceError::Conflict(_))
    ));

    let stored = service.get_agreement(created.id, "Bob").await.unwrap();
    assert_eq!(stored.participants.len(), 2);
}

#[tokio::test]
async fn test_joining_agreed_agreement_keeps_status() {
    let service = service();
    let created = service
        .create_agreement(create_request("Solo", "Alice"))
        .await
        .unwrap();
    let outcome = service.record_agreement(created.id, "Alice").await.unwrap();
    assert!(outcome.all_agreed);

    let joined = service
        .join_agreement(created.invite_code.as_str(), "Bob")
        .await
        .unwrap();
    assert_eq!(joined.status, AgreementStatus::Agreed);
    assert!(!joined.participants[1].has_agreed);
}

#[tokio::test]
async fn test_access_control_for_non_participants() {
    let service = service();
    let created = service
        .create_agreement(create_request("Band practice", "Alice"))
        .await
        .unwrap();
    let id = created.id;

    assert!(matches!(
        service.get_agreement(id, "Mallory").await,
        Err(ServiceError::Forbidden(_))
    ));
    assert!(matches!(
        service.add_message(id, "Mallory", "hi").await,
        Err(ServiceError::Forbidden(_))
    ));
    assert!(matches!(
        service
            .add_checklist_item(
                id,
                AddChecklistItemRequest {
                    text: "Bring drums".to_string(),
                    deadline: None,
                    participant_name: "Mallory".to_string(),
                },
            )
            .await,
        Err(ServiceError::Forbidden(_))
    ));
    assert!(matches!(
        service.record_agreement(id, "Mallory").await,
        Err(ServiceError::Forbidden(_))
    ));
    assert!(matches!(
        service.get_agreement(id, "").await,
        Err(ServiceError::Validation(_))
    ));
}

#[tokio::test]
async fn test_only_creator_may_update() {
    let service = service();
    let created = service
        .create_agreement(create_request("Chores", "Alice"))
        .await
        .unwrap();
    service
        .join_agreement(created.invite_code.as_str(), "Bob")
        .await
        .unwrap();

    let update = |name: &str| UpdateAgreementRequest {
        title: "Weekly chores".to_string(),
        description: Some("Rotating".to_string()),
        participant_name: name.to_string(),
    };

    assert!(matches!(
        service.update_agreement(created.id, update("Bob")).await,
        Err(ServiceError::Forbidden(_))
    ));
    assert!(matches!(
        service.update_agreement(created.id, update("alice")).await,
        Err(ServiceError::Forbidden(_))
    ));

    let updated = service
        .update_agreement(created.id, update("Alice"))
        .await
        .unwrap();
    assert_eq!(updated.title, "Weekly chores");
    assert_eq!(updated.description, "Rotating");
    assert_eq!(updated.status, AgreementStatus::Pending);
}

#[tokio::test]
async fn test_unknown_agreement_is_not_found() {
    let service = service();
    let id = AgreementId::new();

    assert!(matches!(
        service.get_agreement(id, "Alice").await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        service.get_public_agreement(id).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        service.add_message(id, "Alice", "hi").await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        service.record_agreement(id, "Alice").await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_validation_precedes_lookup() {
    let service = service();
    let id = AgreementId::new();

    assert!(matches!(
        service.add_message(id, "Alice", "").await,
        Err(ServiceError::Validation(_))
    ));
    assert!(matches!(
        service.record_agreement(id, "").await,
        Err(ServiceError::Validation(_))
    ));
}

#[tokio::test]
async fn test_chat_and_checklist_append_in_order() {
    let service = service();
    let created = service
        .create_agreement(create_request("Garden", "Alice"))
        .await
        .unwrap();
    let id = created.id;

    let first = service.add_message(id, "Alice", "hello").await.unwrap();
    let second = service.add_message(id, "Alice", "hello").await.unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(second.sender_name, "Alice");

    let item = service
        .add_checklist_item(
            id,
            AddChecklistItemRequest {
                text: "Buy seeds".to_string(),
                deadline: chrono::NaiveDate::from_ymd_opt(2026, 4, 1),
                participant_name: "Alice".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(!item.is_completed);
    assert!(item.completed_at.is_none());

    let stored = service.get_agreement(id, "Alice").await.unwrap();
    assert_eq!(stored.chat.len(), 2);
    assert_eq!(stored.chat[0].id, first.id);
    assert_eq!(stored.chat[1].id, second.id);
    assert_eq!(stored.checklist.len(), 1);
    assert_eq!(stored.checklist[0].id, item.id);

    let public = service.get_public_agreement(id).await.unwrap();
    let json = serde_json::to_value(&public).unwrap();
    assert!(json.get("chat").is_none());
    assert!(json.get("checklist").is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_agreement_recording() {
    let service = Arc::new(service());
    let created = service
        .create_agreement(create_request("Potluck", "p0"))
        .await
        .unwrap();
    for i in 1..20 {
        service
            .join_agreement(created.invite_code.as_str(), &format!("p{}", i))
            .await
            .unwrap();
    }

    let mut handles = Vec::new();
    for i in 0..20 {
        let service = service.clone();
        let id = created.id;
        handles.push(tokio::spawn(async move {
            let name = format!("p{}", i);
            service.record_agreement(id, &name).await
        }));
    }

    let mut completions = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().all_agreed {
            completions += 1;
        }
    }
    assert_eq!(completions, 1);

    let stored = service.get_agreement(created.id, "p0").await.unwrap();
    assert_eq!(stored.status, AgreementStatus::Agreed);
    assert!(stored.participants.iter().all(|p| p.has_agreed));
}
