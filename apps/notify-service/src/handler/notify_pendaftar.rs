//! # 登録者通知ハンドラ
//!
//! PD の審査結果（承認・却下）を登録者アカウントと TBM 連絡先に通知する。
//!
//! ```text
//! POST /api/notify-pendaftar
//! { "tbm_id", "user_pendaftar_id", "nama_tbm", "status", "catatan" }
//! ```
//!
//! `status` は `3_DISETUJUI` / `4_DITOLAK` のみ受け付ける。
//! ID は文字列・数値どちらでもよい。

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use tbm_notify_domain::{
    tbm::{TbmId, VerificationDecision},
    user::UserId,
};
use tbm_notify_shared::{MessageResponse, RawId};

use super::{NotifyState, invalid_body, non_blank};
use crate::{error::NotifyError, usecase::ApplicantNotificationInput};

const INCOMPLETE: &str = "Data tidak lengkap (Butuh ID User & ID TBM).";

/// 審査結果の通知リクエスト
#[derive(Debug, Default, Deserialize)]
pub struct ApplicantStatusRequest {
    pub tbm_id:            Option<RawId>,
    pub user_pendaftar_id: Option<RawId>,
    pub nama_tbm:          Option<String>,
    pub status:            Option<String>,
    pub catatan:           Option<String>,
}

/// 審査結果を登録者に通知する
///
/// ## エンドポイント
/// POST /api/notify-pendaftar
pub async fn notify_pendaftar(
    State(state): State<Arc<NotifyState>>,
    payload: Result<Json<ApplicantStatusRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, NotifyError> {
    let Json(request) = payload.map_err(invalid_body)?;

    let (Some(user_id), Some(status), Some(tbm_id)) = (
        non_blank(request.user_pendaftar_id.map(RawId::into_string)),
        non_blank(request.status),
        non_blank(request.tbm_id.map(RawId::into_string)),
    ) else {
        return Err(NotifyError::Validation(INCOMPLETE.to_string()));
    };

    let input = ApplicantNotificationInput {
        tbm_id:   TbmId::new(tbm_id)?,
        user_id:  UserId::new(user_id)?,
        nama_tbm: request.nama_tbm.unwrap_or_default(),
        decision: VerificationDecision::parse(&status)?,
        catatan:  non_blank(request.catatan),
    };

    let recipients = state.usecase.notify_applicant(input).await?;

    Ok(Json(MessageResponse::sent(format!(
        "Notifikasi dikirim ke: {}",
        recipients.joined()
    ))))
}
