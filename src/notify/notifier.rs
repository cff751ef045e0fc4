use std::collections::BTreeMap;

use crate::error::DeliveryError;
use crate::report::Report;

/// Encoded image bound to a placeholder in the message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// What a notifier is asked to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub subject: String,
    /// Complete HTML document; images are referenced as `cid:<placeholder>`.
    pub html_body: String,
    /// Placeholder id → image. Empty for reports without charts.
    pub inline_images: BTreeMap<String, InlineImage>,
}

impl OutgoingMessage {
    /// Wraps a report for delivery together with its rendered charts.
    pub fn from_report(report: &Report, inline_images: BTreeMap<String, InlineImage>) -> Self {
        OutgoingMessage {
            subject: report.subject.clone(),
            html_body: report.html_document(),
            inline_images,
        }
    }
}

/// Delivers composed reports somewhere a human will read them.
///
/// `send` blocks until the transport has accepted or rejected the message;
/// failures come back as `DeliveryError` with the transport error attached.
pub trait Notifier {
    fn send(&mut self, message: &OutgoingMessage) -> Result<(), DeliveryError>;
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn send(&mut self, message: &OutgoingMessage) -> Result<(), DeliveryError> {
        (**self).send(message)
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn send(&mut self, message: &OutgoingMessage) -> Result<(), DeliveryError> {
        (**self).send(message)
    }
}
