// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Invite Codes
//!
//! An invite code is the short shared secret that lets a visitor join one
//! [`crate::domain::agreement::Agreement`]. Codes are exactly
//! [`INVITE_CODE_LENGTH`] characters drawn from `A-Z0-9`.
//!
//! Comparison is case-insensitive at join time only: [`InviteCode::normalize`]
//! trims and uppercases user input before it is looked up.

use serde::{Deserialize, Serialize};

/// Number of characters in a generated invite code.
pub const INVITE_CODE_LENGTH: usize = 6;

/// Alphabet invite codes are drawn from.
pub const INVITE_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Opaque join token for a single agreement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InviteCode(String);

impl InviteCode {
    /// Build a code from user input. Surrounding whitespace is dropped and
    /// letters are uppercased; the result is not checked against the alphabet
    /// because an unknown code simply fails lookup.
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    /// Build a code from freshly generated characters.
    ///
    /// Returns `None` unless `raw` is exactly [`INVITE_CODE_LENGTH`] characters
    /// from [`INVITE_CODE_ALPHABET`].
    pub fn from_generated(raw: String) -> Option<Self> {
        let well_formed = raw.len() == INVITE_CODE_LENGTH
            && raw.bytes().all(|b| INVITE_CODE_ALPHABET.contains(&b));
        well_formed.then_some(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for InviteCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of candidate invite codes.
///
/// Agreement creation calls this repeatedly until it gets a code no live agreement
/// uses, so implementations are free to return duplicates.
pub trait InviteCodeGenerator: Send + Sync {
    fn generate(&self) -> InviteCode;
}
