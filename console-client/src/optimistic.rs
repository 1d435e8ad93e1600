//! Optimistic local updates
//!
//! A view changes its local copy before the backend confirms, then either
//! keeps the change (reconciled with the server's answer) or restores the
//! last confirmed value.

use crate::error::ClientResult;
use std::future::Future;

/// A value with a confirmed snapshot and a possibly ahead-of-server copy
#[derive(Debug, Clone, PartialEq)]
pub struct Optimistic<T> {
    confirmed: T,
    current: T,
}

impl<T: Clone> Optimistic<T> {
    pub fn new(value: T) -> Self {
        Self {
            confirmed: value.clone(),
            current: value,
        }
    }

    /// Value shown to the user
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Last value the backend confirmed
    pub fn confirmed(&self) -> &T {
        &self.confirmed
    }

    /// Whether local changes are awaiting confirmation
    pub fn is_pending(&self) -> bool
    where
        T: PartialEq,
    {
        self.current != self.confirmed
    }

    /// Change the local copy ahead of the backend
    pub fn apply(&mut self, change: impl FnOnce(&mut T)) {
        change(&mut self.current);
    }

    /// Accept the local copy as confirmed
    pub fn commit(&mut self) {
        self.confirmed = self.current.clone();
    }

    /// Restore the last confirmed value
    pub fn rollback(&mut self) {
        self.current = self.confirmed.clone();
    }

    /// Apply `change`, await `request`, then reconcile or roll back
    ///
    /// On success `reconcile` folds the server's answer into the local copy
    /// before it is committed. On failure the local copy is restored and the
    /// error returned unchanged.
    pub async fn mutate<R, Fut>(
        &mut self,
        change: impl FnOnce(&mut T),
        request: Fut,
        reconcile: impl FnOnce(&mut T, &R),
    ) -> ClientResult<R>
    where
        Fut: Future<Output = ClientResult<R>>,
    {
        self.apply(change);
        match request.await {
            Ok(answer) => {
                reconcile(&mut self.current, &answer);
                self.commit();
                Ok(answer)
            }
            Err(e) => {
                tracing::debug!(code = %e.code, "Optimistic update rolled back");
                self.rollback();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use shared::error::{ApiError, ErrorCode};

    fn rows() -> Vec<Value> {
        vec![json!({ "id": "a", "active": true }), json!({ "id": "b", "active": true })]
    }

    #[test]
    fn test_apply_then_rollback() {
        let mut list = Optimistic::new(rows());
        list.apply(|items| items.retain(|i| i["id"] != "a"));
        assert_eq!(list.current().len(), 1);
        assert!(list.is_pending());

        list.rollback();
        assert_eq!(list.current(), &rows());
        assert!(!list.is_pending());
    }

    #[test]
    fn test_commit() {
        let mut list = Optimistic::new(rows());
        list.apply(|items| items.clear());
        list.commit();
        assert!(list.confirmed().is_empty());
        assert!(!list.is_pending());
    }

    #[tokio::test]
    async fn test_mutate_success_reconciles() {
        let mut list = Optimistic::new(rows());
        let answer = list
            .mutate(
                |items| items[1]["active"] = json!(false),
                async { Ok(json!({ "id": "b", "active": false, "updatedAt": "2026-10-18" })) },
                |items, server| items[1] = server.clone(),
            )
            .await
            .unwrap();

        assert_eq!(answer["updatedAt"], "2026-10-18");
        assert_eq!(list.confirmed()[1]["updatedAt"], "2026-10-18");
        assert!(!list.is_pending());
    }

    #[tokio::test]
    async fn test_mutate_failure_rolls_back() {
        let mut list = Optimistic::new(rows());
        let err = list
            .mutate(
                |items| {
                    items.remove(0);
                },
                async { Err::<Value, _>(ApiError::from_code(ErrorCode::Forbidden, 403)) },
                |_, _| {},
            )
            .await
            .unwrap_err();

        assert_eq!(err.code, "FORBIDDEN");
        assert_eq!(list.current(), &rows());
    }
}
