// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the Pact CLI

pub mod agreement;
pub mod config;

pub use self::agreement::AgreementCommand;
pub use self::config::ConfigCommand;
