use crate::report::html;

/// A composed report, ready to hand to a notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub subject: String,
    /// Body fragment; not yet wrapped in `<html>`/`<body>`.
    pub html_body: String,
    /// Whether the body references the `accuracy` and `loss` inline images.
    pub needs_charts: bool,
}

impl Report {
    /// The body as a complete HTML document.
    pub fn html_document(&self) -> String {
        html::document(&self.html_body)
    }
}
