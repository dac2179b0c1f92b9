//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで通知メールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **共通レイアウト**: ヘッダ・ボタン・フッタは `layout.html` に集約し、
//!   各通知は本文ブロックだけを持つ
//! - **配色は通知種別ごとに固定**: 検証待ちは黄、最終承認待ちは青、承認は緑、却下は赤
//! - **HTML は自動エスケープ**: 入力値はすべてエスケープされる。URL のみ `safe` で出力する

use serde::Serialize;
use tbm_notify_domain::{
    notification::{
        EmailMessage,
        NotificationError,
        RegistrationSummary,
        SenderIdentity,
        TbmNotification,
    },
    region::Region,
    tbm::VerificationDecision,
};
use tera::{Context, Tera};

/// 未入力項目の表示
const MISSING: &str = "-";

/// 登録者名が取得できない場合の挨拶
const DEFAULT_GREETING_NAME: &str = "Pengelola";

/// 通知種別ごとの配色
#[derive(Debug, Clone, Copy, Serialize)]
struct Theme {
    theme_color: &'static str,
    title_color: &'static str,
    box_color:   &'static str,
    label_color: &'static str,
}

const DISTRICT_THEME: Theme = Theme {
    theme_color: "#eab308",
    title_color: "#854d0e",
    box_color:   "#fefce8",
    label_color: "#854d0e",
};

const PROVINCE_THEME: Theme = Theme {
    theme_color: "#0284c7",
    title_color: "#0284c7",
    box_color:   "#f0f9ff",
    label_color: "#555",
};

const APPROVED_THEME: Theme = Theme {
    theme_color: "#10b981",
    title_color: "#10b981",
    box_color:   "#ecfdf5",
    label_color: "#555",
};

const REJECTED_THEME: Theme = Theme {
    theme_color: "#ef4444",
    title_color: "#ef4444",
    box_color:   "#fef2f2",
    label_color: "#555",
};

/// テンプレートレンダラー
///
/// tera テンプレートエンジンをラップし、`TbmNotification` から
/// `EmailMessage` を生成する。
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// `include_str!` で埋め込んだテンプレートを tera に登録する。
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "layout.html",
                    include_str!("../../../templates/notifications/layout.html"),
                ),
                (
                    "registration_table.html",
                    include_str!("../../../templates/notifications/registration_table.html"),
                ),
                (
                    "registration_submitted.html",
                    include_str!("../../../templates/notifications/registration_submitted.html"),
                ),
                (
                    "registration_submitted.txt",
                    include_str!("../../../templates/notifications/registration_submitted.txt"),
                ),
                (
                    "district_verified.html",
                    include_str!("../../../templates/notifications/district_verified.html"),
                ),
                (
                    "district_verified.txt",
                    include_str!("../../../templates/notifications/district_verified.txt"),
                ),
                (
                    "registration_approved.html",
                    include_str!("../../../templates/notifications/registration_approved.html"),
                ),
                (
                    "registration_approved.txt",
                    include_str!("../../../templates/notifications/registration_approved.txt"),
                ),
                (
                    "registration_rejected.html",
                    include_str!("../../../templates/notifications/registration_rejected.html"),
                ),
                (
                    "registration_rejected.txt",
                    include_str!("../../../templates/notifications/registration_rejected.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// 通知イベントからメールメッセージを生成する
    ///
    /// # 引数
    ///
    /// - `notification`: TBM 通知イベント
    /// - `from`: 送信元
    /// - `dashboard_base_url`: ダッシュボードのベース URL（例: `http://localhost:3000`）
    pub fn render(
        &self,
        notification: &TbmNotification,
        from: &SenderIdentity,
        dashboard_base_url: &str,
    ) -> Result<EmailMessage, NotificationError> {
        let (template_name, subject, context) =
            self.build_template_params(notification, dashboard_base_url)?;

        let html_body = self
            .engine
            .render(&format!("{template_name}.html"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render(&format!("{template_name}.txt"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage {
            to: notification.recipients().as_slice().to_vec(),
            from: from.clone(),
            subject,
            html_body,
            text_body,
        })
    }

    /// テンプレート名、件名、コンテキストを構築する
    fn build_template_params(
        &self,
        notification: &TbmNotification,
        dashboard_base_url: &str,
    ) -> Result<(&'static str, String, Context), NotificationError> {
        let base_url = dashboard_base_url.trim_end_matches('/');
        let nama_tbm = notification.tbm_name();

        let mut context = Context::new();
        context.insert("nama_tbm", nama_tbm);

        let (template_name, subject, theme) = match notification {
            TbmNotification::RegistrationSubmitted {
                registration,
                kabupaten,
                ..
            } => {
                insert_registration(&mut context, registration);
                context.insert("kabupaten", kabupaten.as_str());
                context.insert("title", "Verifikasi Pendaftaran Baru");
                context.insert("button_text", "Buka Dashboard PD");
                context.insert("dashboard_url", &format!("{base_url}/dashboard-pd.html"));
                (
                    "registration_submitted",
                    format!("[Verifikasi] Pendaftaran Baru: {nama_tbm}"),
                    DISTRICT_THEME,
                )
            }
            TbmNotification::DistrictVerified {
                registration,
                provinsi,
                ..
            } => {
                insert_registration(&mut context, registration);
                context.insert("provinsi", provinsi.as_str());
                context.insert("kabupaten", region_or_missing(registration.kabupaten.as_ref()));
                context.insert("title", "Validasi TBM Lolos Verifikasi");
                context.insert("button_text", "Buka Dashboard PW");
                context.insert("dashboard_url", &format!("{base_url}/dashboard-pw.html"));
                (
                    "district_verified",
                    format!("[Validasi] TBM Lolos Verifikasi: {nama_tbm}"),
                    PROVINCE_THEME,
                )
            }
            TbmNotification::VerificationDecided {
                decision,
                account_username,
                nama_pendaftar,
                district,
                catatan,
                ..
            } => {
                context.insert("account_username", account_username);
                context.insert(
                    "greeting_name",
                    nama_pendaftar
                        .as_deref()
                        .filter(|name| !name.is_empty())
                        .unwrap_or(DEFAULT_GREETING_NAME),
                );
                context.insert(
                    "signer",
                    &TbmNotification::signer_name(district.as_ref()),
                );
                context.insert("button_text", "Cek Status di Dashboard");
                context.insert(
                    "dashboard_url",
                    &format!("{base_url}/dashboard-pendaftar.html"),
                );
                match decision {
                    VerificationDecision::Approved => {
                        context.insert("title", "Pendaftaran Disetujui PD");
                        (
                            "registration_approved",
                            format!(
                                "[Disetujui] Status Pendaftaran TBM: {nama_tbm} Lolos Verifikasi Daerah"
                            ),
                            APPROVED_THEME,
                        )
                    }
                    VerificationDecision::Rejected => {
                        context.insert("title", "Pendaftaran Ditolak");
                        context.insert("catatan", &catatan.as_deref());
                        (
                            "registration_rejected",
                            format!("[Ditolak] Status Pendaftaran TBM: {nama_tbm}"),
                            REJECTED_THEME,
                        )
                    }
                }
            }
        };

        let theme_context = Context::from_serialize(theme)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;
        context.extend(theme_context);

        Ok((template_name, subject, context))
    }
}

/// 登録内容の表（Nama TBM / Pendaftar / Lokasi / Email TBM）の値を設定する
fn insert_registration(context: &mut Context, registration: &RegistrationSummary) {
    context.insert(
        "nama_pendaftar",
        text_or_missing(registration.nama_pendaftar.as_deref()),
    );
    context.insert(
        "lokasi",
        &format!(
            "{}, {}",
            region_or_missing(registration.kabupaten.as_ref()),
            region_or_missing(registration.provinsi.as_ref()),
        ),
    );
    context.insert("email_tbm", text_or_missing(registration.email_tbm.as_deref()));
}

fn text_or_missing(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(MISSING)
}

fn region_or_missing(region: Option<&Region>) -> &str {
    text_or_missing(region.map(Region::as_str))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tbm_notify_domain::notification::Recipients;

    use super::*;

    fn make_sender() -> SenderIdentity {
        SenderIdentity {
            name:  "Forum TBM".to_string(),
            email: "asisten@weathrly.web.id".to_string(),
        }
    }

    fn make_base_url() -> &'static str {
        "http://localhost:3000"
    }

    fn make_registration() -> RegistrationSummary {
        RegistrationSummary {
            nama_tbm:       "TBM Melati".to_string(),
            nama_pendaftar: Some("Siti Aminah".to_string()),
            kabupaten:      Some(Region::new("Bandung")),
            provinsi:       Some(Region::new("Jawa Barat")),
            email_tbm:      Some("melati@example.com".to_string()),
        }
    }

    fn make_decision(
        decision: VerificationDecision,
        catatan: Option<&str>,
        district: Option<&str>,
    ) -> TbmNotification {
        TbmNotification::VerificationDecided {
            decision,
            nama_tbm: "TBM Melati".to_string(),
            account_username: "siti".to_string(),
            nama_pendaftar: Some("Siti Aminah".to_string()),
            district: district.map(Region::new),
            catatan: catatan.map(String::from),
            recipients: ["siti@example.com", "melati@example.com"]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn newが正常に初期化される() {
        let renderer = TemplateRenderer::new();
        assert!(renderer.is_ok());
    }

    #[test]
    fn registration_submittedのレンダリングが正しい() {
        let renderer = TemplateRenderer::new().unwrap();
        let notification = TbmNotification::RegistrationSubmitted {
            registration: make_registration(),
            kabupaten:    Region::new("Bandung"),
            recipients:   ["pd1@example.com", "pd2@example.com"].into_iter().collect(),
        };

        let email = renderer
            .render(&notification, &make_sender(), make_base_url())
            .unwrap();

        assert_eq!(email.to, vec!["pd1@example.com", "pd2@example.com"]);
        assert_eq!(email.from, make_sender());
        assert_eq!(email.subject, "[Verifikasi] Pendaftaran Baru: TBM Melati");
        assert!(email.html_body.contains("Verifikasi Pendaftaran Baru"));
        assert!(
            email
                .html_body
                .contains("Halo Pengurus Daerah <strong>Bandung</strong>,")
        );
        assert!(email.html_body.contains("Siti Aminah"));
        assert!(email.html_body.contains("Bandung, Jawa Barat"));
        assert!(email.html_body.contains("#eab308"));
        assert!(email.html_body.contains("Buka Dashboard PD"));
        assert!(
            email
                .html_body
                .contains("href=\"http://localhost:3000/dashboard-pd.html\"")
        );
        assert!(
            email
                .html_body
                .contains("Email otomatis dari Sistem Forum TBM.")
        );
        assert!(email.text_body.contains("Nama TBM  : TBM Melati"));
        assert!(
            email
                .text_body
                .contains("http://localhost:3000/dashboard-pd.html")
        );
    }

    #[test]
    fn district_verifiedのレンダリングが正しい() {
        let renderer = TemplateRenderer::new().unwrap();
        let notification = TbmNotification::DistrictVerified {
            registration: make_registration(),
            provinsi:     Region::new("Jawa Barat"),
            recipients:   ["pw@example.com"].into_iter().collect(),
        };

        let email = renderer
            .render(&notification, &make_sender(), "http://localhost:3000/")
            .unwrap();

        assert_eq!(email.subject, "[Validasi] TBM Lolos Verifikasi: TBM Melati");
        assert!(
            email
                .html_body
                .contains("Halo Pengurus Wilayah <strong>Jawa Barat</strong>,")
        );
        assert!(
            email
                .html_body
                .contains("Pengurus Daerah (PD) <strong>Bandung</strong>")
        );
        assert!(email.html_body.contains("#0284c7"));
        assert!(email.html_body.contains("Buka Dashboard PW"));
        assert!(
            email
                .html_body
                .contains("http://localhost:3000/dashboard-pw.html")
        );
    }

    #[test]
    fn 未入力の項目はハイフンで表示する() {
        let renderer = TemplateRenderer::new().unwrap();
        let notification = TbmNotification::RegistrationSubmitted {
            registration: RegistrationSummary {
                nama_tbm:       "TBM Melati".to_string(),
                nama_pendaftar: None,
                kabupaten:      Some(Region::new("Bandung")),
                provinsi:       None,
                email_tbm:      None,
            },
            kabupaten:    Region::new("Bandung"),
            recipients:   ["pd@example.com"].into_iter().collect(),
        };

        let email = renderer
            .render(&notification, &make_sender(), make_base_url())
            .unwrap();

        assert!(email.text_body.contains("Pendaftar : -"));
        assert!(email.text_body.contains("Lokasi    : Bandung, -"));
        assert!(email.text_body.contains("Email TBM : -"));
    }

    #[test]
    fn registration_approvedのレンダリングが正しい() {
        let renderer = TemplateRenderer::new().unwrap();
        let notification = make_decision(VerificationDecision::Approved, None, Some("Bandung"));

        let email = renderer
            .render(&notification, &make_sender(), make_base_url())
            .unwrap();

        assert_eq!(
            email.subject,
            "[Disetujui] Status Pendaftaran TBM: TBM Melati Lolos Verifikasi Daerah"
        );
        assert!(email.html_body.contains("Pendaftaran Disetujui PD"));
        assert!(email.html_body.contains("DISETUJUI"));
        assert!(email.html_body.contains("oleh Pengurus Daerah Bandung."));
        assert!(email.html_body.contains("Pengurus Wilayah (Provinsi)"));
        assert!(email.html_body.contains("#10b981"));
        assert!(email.html_body.contains("Cek Status di Dashboard"));
        assert!(
            email
                .html_body
                .contains("http://localhost:3000/dashboard-pendaftar.html")
        );
        assert!(email.text_body.contains("Halo siti & Siti Aminah,"));
    }

    #[test]
    fn registration_rejectedのレンダリングでcatatanありの場合が正しい() {
        let renderer = TemplateRenderer::new().unwrap();
        let notification = make_decision(
            VerificationDecision::Rejected,
            Some("Foto papan nama belum diunggah"),
            Some("Bandung"),
        );

        let email = renderer
            .render(&notification, &make_sender(), make_base_url())
            .unwrap();

        assert_eq!(email.subject, "[Ditolak] Status Pendaftaran TBM: TBM Melati");
        assert!(email.html_body.contains("Pendaftaran Ditolak"));
        assert!(email.html_body.contains("Alasan Penolakan:"));
        assert!(email.html_body.contains("Foto papan nama belum diunggah"));
        assert!(email.html_body.contains("#ef4444"));
        assert!(email.text_body.contains("Foto papan nama belum diunggah"));
    }

    #[test]
    fn registration_rejectedのレンダリングでcatatanなしの場合が正しい() {
        let renderer = TemplateRenderer::new().unwrap();
        let notification = make_decision(VerificationDecision::Rejected, None, Some("Bandung"));

        let email = renderer
            .render(&notification, &make_sender(), make_base_url())
            .unwrap();

        assert!(!email.html_body.contains("Alasan Penolakan:"));
        assert!(!email.text_body.contains("Alasan Penolakan:"));
    }

    #[test]
    fn 審査した県市が不明でも署名の接頭辞は残る() {
        let renderer = TemplateRenderer::new().unwrap();
        let notification = make_decision(VerificationDecision::Approved, None, None);

        let email = renderer
            .render(&notification, &make_sender(), make_base_url())
            .unwrap();

        assert!(email.text_body.contains("DISETUJUI oleh Pengurus Daerah ."));
    }

    #[test]
    fn 登録者名がなければpengelolaで挨拶する() {
        let renderer = TemplateRenderer::new().unwrap();
        let notification = TbmNotification::VerificationDecided {
            decision:         VerificationDecision::Approved,
            nama_tbm:         "TBM Melati".to_string(),
            account_username: "siti".to_string(),
            nama_pendaftar:   None,
            district:         None,
            catatan:          None,
            recipients:       Recipients::from_iter(["siti@example.com"]),
        };

        let email = renderer
            .render(&notification, &make_sender(), make_base_url())
            .unwrap();

        assert!(email.text_body.contains("Halo siti & Pengelola,"));
    }

    #[test]
    fn html本文の入力値はエスケープされる() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut registration = make_registration();
        registration.nama_tbm = "<script>TBM</script>".to_string();
        let notification = TbmNotification::RegistrationSubmitted {
            registration,
            kabupaten: Region::new("Bandung"),
            recipients: ["pd@example.com"].into_iter().collect(),
        };

        let email = renderer
            .render(&notification, &make_sender(), make_base_url())
            .unwrap();

        assert!(!email.html_body.contains("<script>"));
        assert!(email.html_body.contains("&lt;script&gt;"));
    }

    #[test]
    fn 却下理由はtext本文にそのまま載りhtml本文ではエスケープされる() {
        let renderer = TemplateRenderer::new().unwrap();
        let notification = make_decision(
            VerificationDecision::Rejected,
            Some("Lihat https://forum/tbm dan 'foto'"),
            Some("Bandung"),
        );

        let email = renderer
            .render(&notification, &make_sender(), make_base_url())
            .unwrap();

        assert!(
            email
                .text_body
                .contains("Lihat https://forum/tbm dan 'foto'")
        );
        assert!(
            email
                .html_body
                .contains("Lihat https:&#x2F;&#x2F;forum&#x2F;tbm dan &#x27;foto&#x27;")
        );
        assert!(!email.html_body.contains("'foto'"));
    }
}
