// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Pact Rust SDK
//!
//! Typed async client for a running Pact server. Request and response bodies
//! are the same types the server encodes, re-exported from `pact-core`.

pub mod client;

pub use client::{ClientError, PactClient};
pub use pact_core::domain::agreement::{
    Agreement, AgreementId, AgreementStatus, ChatMessage, ChecklistItem, Participant,
    PublicAgreement,
};
pub use pact_core::presentation::dto::*;
