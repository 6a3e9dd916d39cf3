// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Infrastructure Layer
//!
//! Concrete adapters for the domain contracts.
//!
//! | Module | Implements |
//! |--------|-----------|
//! | [`repositories`] | `AgreementRepository` (in-memory, process-local) |
//! | [`invite_code`] | `InviteCodeGenerator` (thread-local RNG) |

pub mod invite_code;
pub mod repositories;
