//! # TBM 通知ユースケース
//!
//! 審査フローの各段階で、宛先を検索してメールを 1 通送る。
//!
//! | 操作 | 宛先 | 検索条件 |
//! |------|------|----------|
//! | [`TbmNotificationUseCaseImpl::notify_district`] | PD 全員 | role = PD, wilayah ≈ kabupaten |
//! | [`TbmNotificationUseCaseImpl::notify_province`] | PW 全員 | role = PW, wilayah ≈ provinsi |
//! | [`TbmNotificationUseCaseImpl::notify_applicant`] | 登録者 + TBM 連絡先 | user_profiles.id, tbm.id |
//!
//! 役員が 0 人の場合は送信せず [`NotifyOutcome::Skipped`] を返す。

use std::sync::Arc;

use tbm_notify_domain::{
    notification::{NotificationEventType, Recipients, RegistrationSummary, TbmNotification},
    region::Region,
    tbm::{TbmId, TbmRecord, VerificationDecision},
    user::{UserId, UserProfile, UserRole},
};
use tbm_notify_infra::repository::{TbmRepository, UserProfileRepository};
use tbm_notify_shared::{
    event_log::{error as log_error, event},
    log_business_event,
};

use super::notification::NotificationService;
use crate::error::NotifyError;

/// 通知の実行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// 送信した
    Sent { recipients: Recipients },
    /// 宛先が 0 件のため送信しなかった
    Skipped,
}

/// 登録者への審査結果通知の入力
#[derive(Debug, Clone)]
pub struct ApplicantNotificationInput {
    pub tbm_id:   TbmId,
    pub user_id:  UserId,
    pub nama_tbm: String,
    pub decision: VerificationDecision,
    pub catatan:  Option<String>,
}

/// TBM 通知ユースケースの実装
pub struct TbmNotificationUseCaseImpl {
    user_profiles: Arc<dyn UserProfileRepository>,
    tbm_records:   Arc<dyn TbmRepository>,
    notifier:      NotificationService,
}

impl TbmNotificationUseCaseImpl {
    pub fn new(
        user_profiles: Arc<dyn UserProfileRepository>,
        tbm_records: Arc<dyn TbmRepository>,
        notifier: NotificationService,
    ) -> Self {
        Self {
            user_profiles,
            tbm_records,
            notifier,
        }
    }

    /// 新規登録を県・市の PD に通知する
    pub async fn notify_district(
        &self,
        registration: RegistrationSummary,
        kabupaten: Region,
    ) -> Result<NotifyOutcome, NotifyError> {
        let Some(recipients) = self
            .find_official_recipients(
                UserRole::Pd,
                &kabupaten,
                NotificationEventType::RegistrationSubmitted,
            )
            .await?
        else {
            return Ok(NotifyOutcome::Skipped);
        };

        let notification = TbmNotification::RegistrationSubmitted {
            registration,
            kabupaten,
            recipients,
        };
        let recipients = self.send(notification).await?;
        Ok(NotifyOutcome::Sent { recipients })
    }

    /// PD 検証完了を州の PW に通知する
    pub async fn notify_province(
        &self,
        registration: RegistrationSummary,
        provinsi: Region,
    ) -> Result<NotifyOutcome, NotifyError> {
        let Some(recipients) = self
            .find_official_recipients(
                UserRole::Pw,
                &provinsi,
                NotificationEventType::DistrictVerified,
            )
            .await?
        else {
            return Ok(NotifyOutcome::Skipped);
        };

        let notification = TbmNotification::DistrictVerified {
            registration,
            provinsi,
            recipients,
        };
        let recipients = self.send(notification).await?;
        Ok(NotifyOutcome::Sent { recipients })
    }

    /// PD の審査結果を登録者に通知する
    ///
    /// 登録者アカウントが取得できなければ失敗する。TBM レコードは取得できなくても
    /// 続行し、県・市名と TBM 連絡先なしで送る。
    ///
    /// 戻り値は実際に送った宛先。
    pub async fn notify_applicant(
        &self,
        input: ApplicantNotificationInput,
    ) -> Result<Recipients, NotifyError> {
        let applicant = self.find_applicant(&input.user_id).await?;
        let record = self.find_tbm_record(&input.tbm_id).await;

        let mut recipients = Recipients::new();
        recipients.push(applicant.email());
        if let Some(contact) = record.as_ref().and_then(TbmRecord::contact_email) {
            recipients.push(contact);
        }
        if recipients.is_empty() {
            tracing::error!(
                user_id = %input.user_id,
                "登録者アカウントにメールアドレスがない"
            );
            return Err(NotifyError::ApplicantNotFound);
        }

        let (nama_pendaftar, district) = match record {
            Some(record) => (record.nama_pendaftar, record.kabupaten_nama),
            None => (None, None),
        };

        let notification = TbmNotification::VerificationDecided {
            decision: input.decision,
            nama_tbm: input.nama_tbm,
            account_username: applicant.username().to_string(),
            nama_pendaftar,
            district,
            catatan: input.catatan,
            recipients,
        };
        self.send(notification).await
    }

    /// 役員の宛先リストを作る
    ///
    /// メールアドレスを持つ役員がいなければ `None`。
    async fn find_official_recipients(
        &self,
        role: UserRole,
        region: &Region,
        event_type: NotificationEventType,
    ) -> Result<Option<Recipients>, NotifyError> {
        let officials = self
            .user_profiles
            .find_officials(&role, region)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    error.category = log_error::category::INFRASTRUCTURE,
                    error.kind = log_error::kind::USER_LOOKUP,
                    role = %role,
                    region = %region,
                    "役員の検索に失敗: {}",
                    e
                );
            })?;

        let recipients: Recipients = officials.iter().map(UserProfile::email).collect();
        if recipients.is_empty() {
            let event_type: &str = event_type.into();
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_SKIPPED,
                event.entity_type = event::entity_type::USER_PROFILE,
                event.result = event::result::SKIPPED,
                notification.event_type = event_type,
                role = %role,
                region = %region,
                "通知対象の役員がいない"
            );
            return Ok(None);
        }

        Ok(Some(recipients))
    }

    async fn find_applicant(&self, user_id: &UserId) -> Result<UserProfile, NotifyError> {
        match self.user_profiles.find_by_id(user_id).await {
            Ok(Some(profile)) => Ok(profile),
            Ok(None) => {
                tracing::error!(user_id = %user_id, "登録者アカウントが存在しない");
                Err(NotifyError::ApplicantNotFound)
            }
            Err(e) => {
                tracing::error!(
                    error.category = log_error::category::INFRASTRUCTURE,
                    error.kind = log_error::kind::USER_LOOKUP,
                    user_id = %user_id,
                    "登録者アカウントの取得に失敗: {}",
                    e
                );
                Err(NotifyError::ApplicantNotFound)
            }
        }
    }

    async fn find_tbm_record(&self, tbm_id: &TbmId) -> Option<TbmRecord> {
        match self.tbm_records.find_by_id(tbm_id).await {
            Ok(Some(record)) => Some(record),
            Ok(None) => {
                tracing::warn!(tbm_id = %tbm_id, "TBM レコードが見つからないため県・市名なしで通知する");
                None
            }
            Err(e) => {
                tracing::warn!(
                    error.category = log_error::category::INFRASTRUCTURE,
                    error.kind = log_error::kind::TBM_LOOKUP,
                    tbm_id = %tbm_id,
                    "TBM レコードの取得に失敗: {}",
                    e
                );
                None
            }
        }
    }

    async fn send(&self, notification: TbmNotification) -> Result<Recipients, NotifyError> {
        self.notifier.notify(&notification).await?;

        let recipients = match notification {
            TbmNotification::RegistrationSubmitted { recipients, .. }
            | TbmNotification::DistrictVerified { recipients, .. }
            | TbmNotification::VerificationDecided { recipients, .. } => recipients,
        };
        Ok(recipients)
    }
}
