//! In-process store for tests. The email check and insert happen under one
//! lock, which gives the same guarantee as the unique index in Postgres.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::analyses::{
    repo::AnalysisRepo,
    repo_types::{Analysis, NewAnalysis},
};
use crate::auth::{repo::UserRepo, repo_types::User};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    analyses: Mutex<Vec<Analysis>>,
    down: AtomicBool,
}

impl MemoryStore {
    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    /// Makes every subsequent call fail as if the database were unreachable.
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email) {
            return Err(StoreError::AlreadyExists);
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.check()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.check()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl AnalysisRepo for MemoryStore {
    async fn insert_analysis(&self, new: NewAnalysis) -> Result<Analysis, StoreError> {
        self.check()?;
        let analysis = Analysis {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            name: new.name,
            form_data: new.form_data,
            accepted_suggestions: new.accepted_suggestions,
            created_at: OffsetDateTime::now_utc(),
        };
        self.analyses.lock().unwrap().push(analysis.clone());
        Ok(analysis)
    }

    async fn list_analyses_for(
        &self,
        owner: Uuid,
        limit: i64,
    ) -> Result<Vec<Analysis>, StoreError> {
        self.check()?;
        let analyses = self.analyses.lock().unwrap();
        // insertion order breaks timestamp ties
        let mut rows: Vec<Analysis> = analyses
            .iter()
            .rev()
            .filter(|a| a.user_id == owner)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

    async fn find_analysis(&self, id: Uuid) -> Result<Option<Analysis>, StoreError> {
        self.check()?;
        let analyses = self.analyses.lock().unwrap();
        Ok(analyses.iter().find(|a| a.id == id).cloned())
    }

    async fn delete_analysis(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        self.check()?;
        let mut analyses = self.analyses.lock().unwrap();
        let before = analyses.len();
        analyses.retain(|a| !(a.id == id && a.user_id == owner));
        Ok(analyses.len() < before)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn find_user_by_id_and_email() {
        let store = MemoryStore::default();
        let u = store.create_user("u", "u@x.com", "h").await.unwrap();
        assert_eq!(store.find_user_by_id(u.id).await.unwrap().unwrap().email, "u@x.com");
        assert_eq!(store.find_user_by_email("u@x.com").await.unwrap().unwrap().id, u.id);
        assert!(store.find_user_by_id(Uuid::new_v4()).await.unwrap().is_none());
        assert!(store.find_user_by_email("nobody@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_respects_limit() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        for i in 0..5 {
            store
                .insert_analysis(NewAnalysis {
                    user_id: owner,
                    name: format!("n{i}"),
                    form_data: Default::default(),
                    accepted_suggestions: vec![],
                })
                .await
                .unwrap();
        }
        assert_eq!(store.list_analyses_for(owner, 3).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn down_store_fails_every_call() {
        let store = MemoryStore::default();
        store.set_down(true);
        assert!(store.ping().await.is_err());
        assert!(store.find_user_by_email("a@x.com").await.is_err());
        store.set_down(false);
        assert!(store.ping().await.is_ok());
    }
}
