// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Repository Interface
//!
//! Persistence contract for the [`Agreement`] aggregate root, following the
//! DDD Repository pattern: interface defined in the domain layer, implemented
//! in `crate::infrastructure::repositories`.
//!
//! | Trait | Aggregate | Implementations |
//! |-------|-----------|----------------|
//! | `AgreementRepository` | `Agreement` | `InMemoryAgreementRepository` |
//!
//! ## Mutation Model
//!
//! Updates go through [`AgreementRepository::modify`], which runs a closure
//! against the stored aggregate while holding that aggregate's lock. This
//! gives one mutation in flight per agreement without serializing unrelated
//! agreements behind a global lock. Implementations must return a snapshot
//! taken before the lock is released.

use async_trait::async_trait;

use crate::domain::agreement::{Agreement, AgreementError, AgreementId};
use crate::domain::invite_code::InviteCode;

/// Closure applied to an aggregate while its lock is held. Aggregate methods
/// validate before they write, so a rejected mutation leaves no trace.
pub type AgreementMutation<'a> =
    Box<dyn FnOnce(&mut Agreement) -> Result<(), AgreementError> + Send + 'a>;

/// Repository interface for Agreement aggregates
#[async_trait]
pub trait AgreementRepository: Send + Sync {
    /// Store a new agreement.
    ///
    /// Fails with [`RepositoryError::InviteCodeTaken`] when another agreement
    /// already holds the same invite code; the check and the insert are atomic.
    async fn insert(&self, agreement: Agreement) -> Result<(), RepositoryError>;

    /// Snapshot of the agreement with this ID
    async fn find_by_id(&self, id: AgreementId) -> Result<Option<Agreement>, RepositoryError>;

    /// Snapshot of the agreement holding this invite code
    async fn find_by_invite_code(
        &self,
        code: &InviteCode,
    ) -> Result<Option<Agreement>, RepositoryError>;

    /// Apply `mutation` to the stored agreement and return the result.
    ///
    /// Fails with [`RepositoryError::NotFound`] for an unknown ID and
    /// [`RepositoryError::Rejected`] when the closure returns an error.
    async fn modify(
        &self,
        id: AgreementId,
        mutation: AgreementMutation<'_>,
    ) -> Result<Agreement, RepositoryError>;

    /// Number of stored agreements
    async fn count(&self) -> Result<usize, RepositoryError>;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Invite code already in use: {0}")]
    InviteCodeTaken(String),

    #[error(transparent)]
    Rejected(#[from] AgreementError),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
