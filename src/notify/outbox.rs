use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::chart::artifact::write_replacing;
use crate::error::DeliveryError;
use crate::notify::notifier::{Notifier, OutgoingMessage};

/// Writes each report into a directory instead of mailing it.
///
/// Message `n` becomes `NNN-<subject-slug>.html`; its inline images are
/// written next to it as `NNN-<subject-slug>-<placeholder>.<ext>` and the
/// `cid:` references in the body are rewritten to those file names so the
/// page opens directly in a browser.
pub struct OutboxNotifier {
    dir: PathBuf,
    sent: usize,
}

impl OutboxNotifier {
    /// Creates the outbox directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DeliveryError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(OutboxNotifier { dir, sent: 0 })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of messages written so far.
    pub fn sent(&self) -> usize {
        self.sent
    }
}

impl Notifier for OutboxNotifier {
    fn send(&mut self, message: &OutgoingMessage) -> Result<(), DeliveryError> {
        let stem = format!("{:03}-{}", self.sent + 1, slug(&message.subject));
        let mut html = message.html_body.clone();

        for (id, image) in &message.inline_images {
            let file_name = format!("{stem}-{id}.{}", extension_for(&image.content_type));
            write_replacing(&self.dir.join(&file_name), &image.bytes)?;
            html = html.replace(&format!("cid:{id}"), &file_name);
        }

        let page = self.dir.join(format!("{stem}.html"));
        write_replacing(&page, html.as_bytes())?;
        self.sent += 1;
        info!(subject = %message.subject, path = %page.display(), "report written to outbox");
        Ok(())
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png"     => "png",
        "image/svg+xml" => "svg",
        "image/jpeg"    => "jpg",
        _               => "bin",
    }
}

/// Lowercase ASCII alphanumerics with single dashes between runs.
fn slug(subject: &str) -> String {
    let mut out = String::new();
    for c in subject.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out.truncate(60);
    if out.is_empty() {
        out.push_str("report");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::notifier::InlineImage;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[test]
    fn slugs_subjects() {
        assert_eq!(slug("mnist Training At 50%"), "mnist-training-at-50");
        assert_eq!(slug("  %%% "), "report");
    }

    #[test]
    fn writes_page_and_images_with_rewritten_references() {
        let dir = tempdir().unwrap();
        let mut outbox = OutboxNotifier::new(dir.path().join("out")).unwrap();

        let mut images = BTreeMap::new();
        images.insert(
            "loss".to_string(),
            InlineImage { content_type: "image/png".into(), bytes: vec![1, 2, 3] },
        );
        let message = OutgoingMessage {
            subject: "run Training At 25%".into(),
            html_body: "<img src=\"cid:loss\"></img>".into(),
            inline_images: images,
        };
        outbox.send(&message).unwrap();

        let out = dir.path().join("out");
        let page = fs::read_to_string(out.join("001-run-training-at-25.html")).unwrap();
        assert_eq!(page, "<img src=\"001-run-training-at-25-loss.png\"></img>");
        assert_eq!(fs::read(out.join("001-run-training-at-25-loss.png")).unwrap(), vec![1, 2, 3]);
        assert_eq!(outbox.sent(), 1);
    }

    #[test]
    fn numbering_keeps_messages_apart() {
        let dir = tempdir().unwrap();
        let mut outbox = OutboxNotifier::new(dir.path()).unwrap();
        let message = OutgoingMessage {
            subject: "same".into(),
            html_body: "<p>x</p>".into(),
            inline_images: BTreeMap::new(),
        };
        outbox.send(&message).unwrap();
        outbox.send(&message).unwrap();
        assert!(dir.path().join("001-same.html").exists());
        assert!(dir.path().join("002-same.html").exists());
    }
}
