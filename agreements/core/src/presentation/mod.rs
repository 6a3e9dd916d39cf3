// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Presentation Layer
//!
//! HTTP surface that translates external requests into application service
//! calls. **No business logic lives here**; all real work is delegated to
//! `crate::application`.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Axum router and handlers |
//! | [`dto`] | JSON request and response bodies, shared with `pact-sdk` |

pub mod api;
pub mod dto;
