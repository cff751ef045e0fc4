use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_port() -> u16 {
    465
}

/// Connection and identity settings for the SMTP notifier.
///
/// Only the notifier reads this; the observer never sees it.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MailConfig {
    /// SMTP host, e.g. `smtp.gmail.com`.
    pub server: String,
    /// Implicit-TLS port; defaults to 465.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Login name; falls back to `sender` when absent.
    #[serde(default)]
    pub username: Option<String>,
    pub password: String,
    pub sender: String,
    pub recipient: String,
}

impl MailConfig {
    pub fn login(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.sender)
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a config from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<MailConfig, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> MailConfig {
        MailConfig {
            server: "smtp.example.com".into(),
            port: 465,
            username: None,
            password: "hunter2".into(),
            sender: "trainer@example.com".into(),
            recipient: "me@example.com".into(),
        }
    }

    #[test]
    fn json_round_trip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mail.json");
        sample().save_json(&path).unwrap();
        assert_eq!(MailConfig::load_json(&path).unwrap(), sample());
    }

    #[test]
    fn port_defaults_to_implicit_tls() {
        let cfg: MailConfig = serde_json::from_str(
            r#"{"server":"s","password":"p","sender":"a@b.c","recipient":"d@e.f"}"#,
        )
        .unwrap();
        assert_eq!(cfg.port, 465);
        assert_eq!(cfg.login(), "a@b.c");
    }

    #[test]
    fn debug_hides_password() {
        let shown = format!("{:?}", sample());
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("<redacted>"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = MailConfig::load_json(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(MailConfig::load_json(&path).unwrap_err(), ConfigError::Parse(_)));
    }
}
