//! HTML fragments shared by every report body.

use crate::history::{IterationSnapshot, MetricField};

/// Escapes text for inclusion in HTML element content or attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&'  => out.push_str("&amp;"),
            '<'  => out.push_str("&lt;"),
            '>'  => out.push_str("&gt;"),
            '"'  => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _    => out.push(c),
        }
    }
    out
}

/// Renders snapshots as a table: one header row with the field names, then
/// one row per snapshot with `index` followed by the metric columns.
pub fn snapshot_table(rows: &[IterationSnapshot]) -> String {
    let mut html = String::from("<table border=\"1\" class=\"history\">\n<thead>\n<tr><th>index</th>");
    for field in MetricField::ALL {
        html.push_str(&format!("<th>{}</th>", field.name()));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for snap in rows {
        html.push_str(&format!("<tr><td>{}</td>", snap.index));
        for field in MetricField::ALL {
            html.push_str(&format!("<td>{:.6}</td>", snap.value(field)));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>");
    html
}

/// Wraps a body fragment into a complete HTML document for a transport.
pub fn document(body: &str) -> String {
    format!("<html>\n<head></head>\n<body>\n{body}\n</body>\n</html>\n")
}

/// Number of data rows in a table produced by `snapshot_table`.
#[cfg(test)]
pub(crate) fn count_data_rows(html: &str) -> usize {
    html.matches("<tr>").count().saturating_sub(html.matches("<thead>").count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(index: usize) -> IterationSnapshot {
        IterationSnapshot {
            index,
            loss: 0.5,
            accuracy: 0.75,
            validation_loss: 0.625,
            validation_accuracy: 0.7,
        }
    }

    #[test]
    fn table_has_header_and_one_row_per_snapshot() {
        let html = snapshot_table(&[snap(4), snap(5)]);
        assert!(html.contains(
            "<tr><th>index</th><th>loss</th><th>accuracy</th><th>validation_loss</th><th>validation_accuracy</th></tr>"
        ));
        assert!(html.contains("<tr><td>4</td><td>0.500000</td><td>0.750000</td><td>0.625000</td><td>0.700000</td></tr>"));
        assert_eq!(count_data_rows(&html), 2);
    }

    #[test]
    fn empty_table_keeps_header() {
        let html = snapshot_table(&[]);
        assert!(html.contains("<th>index</th>"));
        assert_eq!(count_data_rows(&html), 0);
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
    }

    #[test]
    fn document_wraps_body() {
        let doc = document("<p>hi</p>");
        assert!(doc.starts_with("<html>"));
        assert!(doc.contains("<body>\n<p>hi</p>\n</body>"));
    }
}
