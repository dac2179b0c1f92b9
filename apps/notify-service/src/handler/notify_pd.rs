//! # PD 通知ハンドラ
//!
//! 新規登録を、登録先の県・市（kabupaten）の Pengurus Daerah 全員に通知する。
//!
//! ```text
//! POST /api/notify-pd
//! { "nama_tbm", "nama_pendaftar", "provinsi", "kabupaten", "email_tbm" }
//! ```

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tbm_notify_domain::region::Region;
use tbm_notify_shared::MessageResponse;

use super::{NotifyState, RegistrationRequest, invalid_body, non_blank};
use crate::{error::NotifyError, usecase::NotifyOutcome};

const INCOMPLETE: &str = "Data tidak lengkap. Nama TBM dan Kabupaten wajib ada.";
const NO_RECIPIENT: &str = "Data tersimpan, tapi tidak ada PD untuk dinotifikasi.";

/// 新規登録を PD に通知する
///
/// ## エンドポイント
/// POST /api/notify-pd
pub async fn notify_pd(
    State(state): State<Arc<NotifyState>>,
    payload: Result<Json<RegistrationRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, NotifyError> {
    let Json(request) = payload.map_err(invalid_body)?;

    let (Some(nama_tbm), Some(kabupaten)) = (
        non_blank(request.nama_tbm.clone()),
        non_blank(request.kabupaten.clone()),
    ) else {
        return Err(NotifyError::Validation(INCOMPLETE.to_string()));
    };

    let outcome = state
        .usecase
        .notify_district(request.into_summary(nama_tbm), Region::new(kabupaten))
        .await?;

    let response = match outcome {
        NotifyOutcome::Sent { recipients } => MessageResponse::sent(format!(
            "Notifikasi dikirim ke {} pengurus daerah.",
            recipients.len()
        )),
        NotifyOutcome::Skipped => MessageResponse::skipped(NO_RECIPIENT),
    };
    Ok(Json(response))
}
