pub mod notifier;
pub mod mail_config;
pub mod outbox;
#[cfg(feature = "smtp")]
pub mod smtp;

pub use notifier::{InlineImage, Notifier, OutgoingMessage};
pub use mail_config::MailConfig;
pub use outbox::OutboxNotifier;
#[cfg(feature = "smtp")]
pub use smtp::SmtpNotifier;
