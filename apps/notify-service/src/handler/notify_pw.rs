//! # PW 通知ハンドラ
//!
//! PD の検証を通過した登録を、州（provinsi）の Pengurus Wilayah 全員に通知する。
//!
//! ```text
//! POST /api/notify-pw
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

const INCOMPLETE: &str = "Data tidak lengkap. Nama TBM dan Provinsi wajib ada.";
const NO_RECIPIENT: &str = "Status diupdate, tapi tidak ada PW untuk dinotifikasi.";

/// PD 検証完了を PW に通知する
///
/// ## エンドポイント
/// POST /api/notify-pw
pub async fn notify_pw(
    State(state): State<Arc<NotifyState>>,
    payload: Result<Json<RegistrationRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, NotifyError> {
    let Json(request) = payload.map_err(invalid_body)?;

    let (Some(nama_tbm), Some(provinsi)) = (
        non_blank(request.nama_tbm.clone()),
        non_blank(request.provinsi.clone()),
    ) else {
        return Err(NotifyError::Validation(INCOMPLETE.to_string()));
    };

    let outcome = state
        .usecase
        .notify_province(request.into_summary(nama_tbm), Region::new(provinsi))
        .await?;

    let response = match outcome {
        NotifyOutcome::Sent { recipients } => MessageResponse::sent(format!(
            "Notifikasi dikirim ke {} pengurus wilayah.",
            recipients.len()
        )),
        NotifyOutcome::Skipped => MessageResponse::skipped(NO_RECIPIENT),
    };
    Ok(Json(response))
}
