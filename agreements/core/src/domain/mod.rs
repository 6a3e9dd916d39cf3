// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Layer
//!
//! Pure domain types for the agreement context. No I/O dependencies.
//!
//! | Module | Key Types |
//! |--------|-----------|
//! | [`agreement`] | `Agreement`, `Participant`, `ChecklistItem`, `ChatMessage`, `PublicAgreement` |
//! | [`invite_code`] | `InviteCode`, `InviteCodeGenerator` |
//! | [`repository`] | `AgreementRepository`, `RepositoryError` |
//! | [`server_config`] | `ServerConfigManifest` |

pub mod agreement;
pub mod invite_code;
pub mod repository;
pub mod server_config;
