// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use rand::Rng;

use crate::domain::invite_code::{
    InviteCode, InviteCodeGenerator, INVITE_CODE_ALPHABET, INVITE_CODE_LENGTH,
};

/// Draws invite codes uniformly from `A-Z0-9` using the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomInviteCodeGenerator;

impl RandomInviteCodeGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl InviteCodeGenerator for RandomInviteCodeGenerator {
    fn generate(&self) -> InviteCode {
        let mut rng = rand::rng();
        let raw: String = (0..INVITE_CODE_LENGTH)
            .map(|_| INVITE_CODE_ALPHABET[rng.random_range(0..INVITE_CODE_ALPHABET.len())] as char)
            .collect();
        InviteCode::from_generated(raw)
            .expect("characters are drawn from the invite code alphabet")
    }
}
