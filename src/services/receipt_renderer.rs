//! Receipt renderer - converts the receipt HTML fragment into a PDF.
//!
//! Rendering goes through Chromium's print-to-PDF on a dedicated scratch tab,
//! so only the receipt fragment ends up in the document, never the rest of the
//! order page.

use std::path::PathBuf;

use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::Page;
use tracing::debug;

use crate::error::Result;

/// Renders receipt markup fragments to preview PDFs.
pub struct ReceiptRenderer {
    page: Page,
    preview_dir: PathBuf,
}

impl ReceiptRenderer {
    /// `page` should be a blank tab owned exclusively by the renderer.
    pub fn new(page: Page, preview_dir: impl Into<PathBuf>) -> Self {
        Self {
            page,
            preview_dir: preview_dir.into(),
        }
    }

    /// Render the receipt fragment and write `receipt_<n>.pdf` to the preview
    /// directory. No partial output is retained on failure.
    pub async fn render(&self, receipt_html: &str, order_number: u32) -> Result<PathBuf> {
        let output = self.preview_dir.join(format!("receipt_{}.pdf", order_number));
        debug!("rendering receipt {} -> {}", order_number, output.display());

        self.page.set_content(wrap_fragment(receipt_html)).await?;

        let params = PrintToPdfParams::builder().print_background(true).build();
        let save_result = self.page.save_pdf(params, &output).await;
        if save_result.is_err() {
            // Drop whatever the failed print left behind
            let _ = std::fs::remove_file(&output);
        }
        save_result?;

        Ok(output)
    }
}

/// Wrap the receipt fragment in a minimal printable document.
fn wrap_fragment(fragment: &str) -> String {
    format!(
        "<!DOCTYPE html>\
         <html><head><meta charset=\"utf-8\"></head>\
         <body>{}</body></html>",
        fragment
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn wrapped_fragment_is_a_full_document() {
        let html = wrap_fragment("<div id=\"receipt\">Order 1</div>");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<div id=\"receipt\">Order 1</div>"));
        assert!(html.ends_with("</body></html>"));
    }

    #[test]
    fn preview_path_is_keyed_by_order_number() {
        let dir = Path::new("output/preview");
        assert_eq!(
            dir.join(format!("receipt_{}.pdf", 7)),
            PathBuf::from("output/preview/receipt_7.pdf")
        );
    }
}
