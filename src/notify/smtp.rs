use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

use crate::error::DeliveryError;
use crate::notify::mail_config::MailConfig;
use crate::notify::notifier::{Notifier, OutgoingMessage};

/// Sends reports as HTML mail over SMTP with implicit TLS.
///
/// Each inline image becomes a `multipart/related` part whose `Content-ID`
/// is its placeholder, so `<img src="cid:loss">` in the body resolves to it.
pub struct SmtpNotifier {
    config: MailConfig,
    transport: SmtpTransport,
}

impl SmtpNotifier {
    pub fn new(config: MailConfig) -> Result<Self, DeliveryError> {
        let transport = SmtpTransport::relay(&config.server)
            .map_err(|e| DeliveryError::Transport(Box::new(e)))?
            .port(config.port)
            .credentials(Credentials::new(config.login().to_owned(), config.password.clone()))
            .build();
        Ok(SmtpNotifier { config, transport })
    }

    pub fn config(&self) -> &MailConfig {
        &self.config
    }
}

impl Notifier for SmtpNotifier {
    fn send(&mut self, message: &OutgoingMessage) -> Result<(), DeliveryError> {
        let email = build_message(&self.config, message)?;
        self.transport
            .send(&email)
            .map_err(|e| DeliveryError::Transport(Box::new(e)))?;
        info!(subject = %message.subject, to = %self.config.recipient, "report mailed");
        Ok(())
    }
}

/// Assembles the MIME message for `message` without touching the network.
pub fn build_message(config: &MailConfig, message: &OutgoingMessage) -> Result<Message, DeliveryError> {
    let html = SinglePart::html(message.html_body.clone());
    let builder = Message::builder()
        .from(mailbox(&config.sender)?)
        .to(mailbox(&config.recipient)?)
        .subject(message.subject.clone());

    let built = if message.inline_images.is_empty() {
        builder.singlepart(html)
    } else {
        let mut related = MultiPart::related().singlepart(html);
        for (id, image) in &message.inline_images {
            let content_type = ContentType::parse(&image.content_type)
                .map_err(|e| DeliveryError::Build(Box::new(e)))?;
            related = related.singlepart(
                Attachment::new_inline(id.clone()).body(image.bytes.clone(), content_type),
            );
        }
        builder.multipart(related)
    };
    built.map_err(|e| DeliveryError::Build(Box::new(e)))
}

fn mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address.parse().map_err(|e: lettre::address::AddressError| DeliveryError::Address {
        address: address.to_owned(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::notifier::InlineImage;
    use std::collections::BTreeMap;

    fn config() -> MailConfig {
        MailConfig {
            server: "smtp.example.com".into(),
            port: 465,
            username: None,
            password: "secret".into(),
            sender: "trainer@example.com".into(),
            recipient: "me@example.com".into(),
        }
    }

    fn message(with_images: bool) -> OutgoingMessage {
        let mut inline_images = BTreeMap::new();
        if with_images {
            for id in ["accuracy", "loss"] {
                inline_images.insert(
                    id.to_string(),
                    InlineImage { content_type: "image/png".into(), bytes: vec![0x89, b'P', b'N', b'G'] },
                );
            }
        }
        OutgoingMessage {
            subject: "mnist Training At 50%".into(),
            html_body: "<html><body><img src=\"cid:accuracy\"></body></html>".into(),
            inline_images,
        }
    }

    #[test]
    fn inline_images_get_content_ids() {
        let email = build_message(&config(), &message(true)).unwrap();
        let raw = String::from_utf8_lossy(&email.formatted()).to_string();
        assert!(raw.contains("multipart/related"));
        assert!(raw.contains("Content-ID: <accuracy>"));
        assert!(raw.contains("Content-ID: <loss>"));
        assert!(raw.contains("Subject: mnist Training At 50%"));
    }

    #[test]
    fn plain_report_is_single_html_part() {
        let email = build_message(&config(), &message(false)).unwrap();
        let raw = String::from_utf8_lossy(&email.formatted()).to_string();
        assert!(raw.contains("Content-Type: text/html"));
        assert!(!raw.contains("multipart"));
    }

    #[test]
    fn bad_recipient_is_address_error() {
        let mut cfg = config();
        cfg.recipient = "not an address".into();
        let err = build_message(&cfg, &message(false)).unwrap_err();
        assert!(matches!(err, DeliveryError::Address { .. }));
    }
}
