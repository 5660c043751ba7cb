use std::fs;
use std::path::PathBuf;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{info, warn};

use crate::config::{MailSettings, Secrets, Seller};
use crate::error::{ReportError, Result};

const BODY: &str = "Segue relatório de circularização.";

/// Sends the finished report over implicit-TLS SMTP. One blocking
/// submission per run, no retry.
pub struct Mailer {
    server: String,
    port: u16,
    username: String,
    password: String,
}

impl Mailer {
    pub fn new(mail: &MailSettings, secrets: &Secrets) -> Self {
        Self {
            server: mail.server.clone(),
            port: mail.port,
            username: secrets.smtp_user.clone(),
            password: secrets.smtp_password.clone(),
        }
    }

    /// Email the report file to the seller's distribution list. Returns
    /// false without sending when the To list is empty; that is a data
    /// problem in the seller directory, not a run failure.
    pub fn send_report(
        &self,
        report_path: &PathBuf,
        seller: &Seller,
        date_label: &str,
    ) -> Result<bool> {
        if seller.email_to.is_empty() {
            warn!(
                "no valid emailTo recipients for {}; skipping delivery",
                seller.display_name
            );
            return Ok(false);
        }

        let message = self.compose(report_path, seller, date_label)?;

        let mailer = SmtpTransport::relay(&self.server)?
            .port(self.port)
            .credentials(Credentials::new(
                self.username.clone(),
                self.password.clone(),
            ))
            .build();
        mailer.send(&message)?;

        info!(
            "report emailed to {:?} (cc {:?})",
            seller.email_to, seller.email_cc
        );
        Ok(true)
    }

    fn compose(
        &self,
        report_path: &PathBuf,
        seller: &Seller,
        date_label: &str,
    ) -> Result<Message> {
        let mut builder = Message::builder()
            .from(parse_mailbox(&self.username)?)
            .subject(format!(
                "{} – Circularização – {}",
                seller.display_name, date_label
            ));
        for address in &seller.email_to {
            builder = builder.to(parse_mailbox(address)?);
        }
        for address in &seller.email_cc {
            builder = builder.cc(parse_mailbox(address)?);
        }

        let filename = report_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("report.csv")
            .to_string();
        let content = fs::read(report_path)?;
        let attachment = Attachment::new(filename)
            .body(content, ContentType::parse("application/octet-stream").unwrap());

        let message = builder.multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(BODY.to_string()))
                .singlepart(attachment),
        )?;
        Ok(message)
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse()
        .map_err(|_| ReportError::InvalidAddress(address.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn mailer() -> Mailer {
        Mailer {
            server: "smtp.example.com".to_string(),
            port: 465,
            username: "reports@example.com".to_string(),
            password: "secret".to_string(),
        }
    }

    fn seller(to: &[&str], cc: &[&str]) -> Seller {
        Seller {
            id: "acme".to_string(),
            display_name: "Acme Store".to_string(),
            email_to: to.iter().map(|s| s.to_string()).collect(),
            email_cc: cc.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn report_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Faturado em,Pedido\n28/06/2024,A-01\n")
            .unwrap();
        file
    }

    #[test]
    fn empty_to_list_skips_delivery_without_error() {
        let file = report_file();
        let sent = mailer()
            .send_report(&file.path().to_path_buf(), &seller(&[], &["cc@x.com"]), "28/06/2024")
            .unwrap();
        assert!(!sent);
    }

    #[test]
    fn composes_subject_and_recipients() {
        let file = report_file();
        let message = mailer()
            .compose(
                &file.path().to_path_buf(),
                &seller(&["a@x.com", "b@x.com"], &["c@x.com"]),
                "28/06/2024",
            )
            .unwrap();

        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(rendered.contains("To: a@x.com, b@x.com"));
        assert!(rendered.contains("Cc: c@x.com"));
        assert!(rendered.contains("application/octet-stream"));
    }

    #[test]
    fn invalid_recipient_is_reported() {
        let file = report_file();
        let err = mailer()
            .compose(
                &file.path().to_path_buf(),
                &seller(&["not an address"], &[]),
                "28/06/2024",
            )
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidAddress(_)));
    }
}
