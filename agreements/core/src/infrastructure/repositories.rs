// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! Infrastructure implementation of the `AgreementRepository` abstraction
//! defined in the domain layer.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Hold agreement aggregates for the life of the process
//! - **Pattern:** Repository (DDD), Adapter (Hexagonal Architecture)
//!
//! # Locking
//!
//! The outer `RwLock` guards only the ID map and the invite-code index and is
//! never held across a mutation. Each aggregate sits behind its own `Mutex`,
//! so writes to one agreement are serialized while writes to different
//! agreements proceed independently. Contents are lost on restart.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::agreement::{Agreement, AgreementId};
use crate::domain::invite_code::InviteCode;
use crate::domain::repository::{AgreementMutation, AgreementRepository, RepositoryError};

#[derive(Default)]
struct StoreState {
    agreements: HashMap<AgreementId, Arc<Mutex<Agreement>>>,
    invite_codes: HashMap<InviteCode, AgreementId>,
}

#[derive(Clone, Default)]
pub struct InMemoryAgreementRepository {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryAgreementRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn entry(&self, id: AgreementId) -> Option<Arc<Mutex<Agreement>>> {
        let state = self.state.read().await;
        state.agreements.get(&id).cloned()
    }
}

#[async_trait]
impl AgreementRepository for InMemoryAgreementRepository {
    async fn insert(&self, agreement: Agreement) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        if state.invite_codes.contains_key(&agreement.invite_code) {
            return Err(RepositoryError::InviteCodeTaken(agreement.invite_code.to_string()));
        }
        state.invite_codes.insert(agreement.invite_code.clone(), agreement.id);
        state.agreements.insert(agreement.id, Arc::new(Mutex::new(agreement)));
        Ok(())
    }

    async fn find_by_id(&self, id: AgreementId) -> Result<Option<Agreement>, RepositoryError> {
        match self.entry(id).await {
            Some(entry) => Ok(Some(entry.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn find_by_invite_code(
        &self,
        code: &InviteCode,
    ) -> Result<Option<Agreement>, RepositoryError> {
        let entry = {
            let state = self.state.read().await;
            state
                .invite_codes
                .get(code)
                .and_then(|id| state.agreements.get(id))
                .cloned()
        };
        match entry {
            Some(entry) => Ok(Some(entry.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn modify(
        &self,
        id: AgreementId,
        mutation: AgreementMutation<'_>,
    ) -> Result<Agreement, RepositoryError> {
        let entry = self
            .entry(id)
            .await
            .ok_or_else(|| RepositoryError::NotFound(format!("agreement {}", id)))?;

        let mut agreement = entry.lock().await;
        mutation(&mut *agreement)?;
        Ok(agreement.clone())
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.agreements.len())
    }
}
