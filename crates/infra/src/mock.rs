//! # テスト用モック
//!
//! ユースケーステストやハンドラテストで使用するインメモリモック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! tbm-notify-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tbm_notify_domain::{
    notification::{EmailMessage, NotificationError},
    region::Region,
    tbm::{TbmId, TbmRecord},
    user::{UserId, UserProfile, UserRole},
};

use crate::{
    error::InfraError,
    notification::NotificationSender,
    repository::{TbmRepository, UserProfileRepository},
};

// ===== MockUserProfileRepository =====

#[derive(Clone, Default)]
pub struct MockUserProfileRepository {
    profiles: Arc<Mutex<Vec<UserProfile>>>,
    failure:  Arc<Mutex<Option<String>>>,
}

impl MockUserProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_profile(&self, profile: UserProfile) {
        self.profiles.lock().unwrap().push(profile);
    }

    /// 以降のすべての呼び出しを指定メッセージで失敗させる
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    fn check_failure(&self) -> Result<(), InfraError> {
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(InfraError::unexpected(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserProfileRepository for MockUserProfileRepository {
    async fn find_officials(
        &self,
        role: &UserRole,
        region: &Region,
    ) -> Result<Vec<UserProfile>, InfraError> {
        self.check_failure()?;
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.is_official_of(role, region))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, InfraError> {
        self.check_failure()?;
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id() == id)
            .cloned())
    }
}

// ===== MockTbmRepository =====

#[derive(Clone, Default)]
pub struct MockTbmRepository {
    records: Arc<Mutex<Vec<TbmRecord>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockTbmRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_record(&self, record: TbmRecord) {
        self.records.lock().unwrap().push(record);
    }

    /// 以降のすべての呼び出しを指定メッセージで失敗させる
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }
}

#[async_trait]
impl TbmRepository for MockTbmRepository {
    async fn find_by_id(&self, id: &TbmId) -> Result<Option<TbmRecord>, InfraError> {
        if let Some(message) = self.failure.lock().unwrap().as_ref() {
            return Err(InfraError::unexpected(message.clone()));
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| &r.id == id)
            .cloned())
    }
}

// ===== MockNotificationSender =====

/// 送信したメールを記録するモック
///
/// 送信の試行回数と、成功した送信の内容を別々に記録する。
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    attempts:    Arc<Mutex<usize>>,
    sent_emails: Arc<Mutex<Vec<EmailMessage>>>,
    failure:     Arc<Mutex<Option<String>>>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以降の送信を指定メッセージで失敗させる
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    /// 送信されたメールの一覧（失敗した送信は含まない）
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent_emails.lock().unwrap().clone()
    }

    /// `send_email` が呼ばれた回数（失敗した送信も含む）
    pub fn call_count(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        *self.attempts.lock().unwrap() += 1;
        if let Some(message) = self.failure.lock().unwrap().as_ref() {
            return Err(NotificationError::SendFailed(message.clone()));
        }
        self.sent_emails.lock().unwrap().push(email.clone());
        Ok(())
    }
}
