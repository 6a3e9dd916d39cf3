// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod agreement_service;

// Re-export use cases for convenience
pub use agreement_service::{
    AddChecklistItemRequest, AgreementOutcome, AgreementService, CreateAgreementRequest,
    ServiceError, StandardAgreementService, UpdateAgreementRequest,
};
