// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # `pact-core`
//!
//! Domain model, in-memory store, use cases and HTTP surface for the pact
//! agreement service.
//!
//! | Module | Layer | Contents |
//! |--------|-------|----------|
//! | [`domain`] | Domain | `Agreement` aggregate, invite codes, repository contract, server config |
//! | [`application`] | Application | `AgreementService` use cases |
//! | [`infrastructure`] | Infrastructure | In-memory store, random invite code generator |
//! | [`presentation`] | Presentation | Axum router and JSON handlers |

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
