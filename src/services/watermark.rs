//! Watermark compositor - overlays the robot screenshot onto the receipt PDF.
//!
//! The screenshot is embedded as an image XObject and drawn over the existing
//! page content of every page, scaled to fit and centered. This is an overlay,
//! not an appended page; the preview copy is left untouched.

use std::fs;
use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{xobject, Document, Object, ObjectId, Stream};
use tracing::debug;

use crate::error::Result;

/// Fallback page size (US Letter, points) when a page carries no MediaBox
const FALLBACK_PAGE_SIZE: (f64, f64) = (612.0, 792.0);

/// Composes watermarked receipt PDFs into the final receipts directory.
pub struct WatermarkCompositor {
    receipts_dir: PathBuf,
}

impl WatermarkCompositor {
    pub fn new(receipts_dir: impl Into<PathBuf>) -> Self {
        Self {
            receipts_dir: receipts_dir.into(),
        }
    }

    /// Overlay `screenshot` onto `preview_pdf` and write
    /// `receipt_<n>.pdf` to the receipts directory.
    pub fn compose(
        &self,
        screenshot: &Path,
        preview_pdf: &Path,
        order_number: u32,
    ) -> Result<PathBuf> {
        let output = self
            .receipts_dir
            .join(format!("receipt_{}.pdf", order_number));
        debug!(
            "compositing {} onto {} -> {}",
            screenshot.display(),
            preview_pdf.display(),
            output.display()
        );

        let mut doc = Document::load(preview_pdf)?;
        let png = fs::read(screenshot)?;
        let image = xobject::image_from(png)?;
        let (img_w, img_h) = image_dimensions(&image);

        for (index, (_, page_id)) in doc.get_pages().into_iter().enumerate() {
            let (page_w, page_h) = media_box(&doc, page_id).unwrap_or(FALLBACK_PAGE_SIZE);
            let (w, h) = fit_within(img_w, img_h, page_w, page_h);
            let x = (page_w - w) / 2.0;
            let y = (page_h - h) / 2.0;

            let name = format!("WmImg{}", index);
            let xobject_id = doc.add_object(image.clone());
            doc.add_xobject(page_id, name.clone(), xobject_id)?;
            doc.add_to_page_content(page_id, overlay_ops(&name, w, h, x, y))?;
        }

        doc.save(&output)?;
        Ok(output)
    }
}

/// Content stream drawing the image XObject at the given placement.
fn overlay_ops(name: &str, w: f64, h: f64, x: f64, y: f64) -> Content {
    Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    real(w),
                    real(0.0),
                    real(0.0),
                    real(h),
                    real(x),
                    real(y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    }
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

/// Pixel dimensions recorded in the image XObject dictionary.
fn image_dimensions(image: &Stream) -> (f64, f64) {
    let width = dict_number(image, b"Width").unwrap_or(1.0);
    let height = dict_number(image, b"Height").unwrap_or(1.0);
    (width, height)
}

fn dict_number(stream: &Stream, key: &[u8]) -> Option<f64> {
    stream
        .dict
        .get(key)
        .ok()
        .and_then(|obj| object_to_f64(obj))
}

/// Width and height of a page's MediaBox, following one level of indirection.
fn media_box(doc: &Document, page_id: ObjectId) -> Option<(f64, f64)> {
    let dict = doc.get_object(page_id).ok()?.as_dict().ok()?;
    let raw = dict.get(b"MediaBox").ok()?;
    let raw = match raw {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let array = raw.as_array().ok()?;
    if array.len() != 4 {
        return None;
    }
    let x0 = object_to_f64(&array[0])?;
    let y0 = object_to_f64(&array[1])?;
    let x1 = object_to_f64(&array[2])?;
    let y1 = object_to_f64(&array[3])?;
    Some(((x1 - x0).abs(), (y1 - y0).abs()))
}

fn object_to_f64(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

/// Scale (w, h) to fit inside (max_w, max_h) preserving aspect ratio,
/// never scaling up.
fn fit_within(w: f64, h: f64, max_w: f64, max_h: f64) -> (f64, f64) {
    if w <= 0.0 || h <= 0.0 {
        return (0.0, 0.0);
    }
    let scale = (max_w / w).min(max_h / h).min(1.0);
    (w * scale, h * scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn fit_within_preserves_aspect_ratio() {
        let (w, h) = fit_within(1000.0, 500.0, 600.0, 600.0);
        assert!((w - 600.0).abs() < 1e-9);
        assert!((h - 300.0).abs() < 1e-9);
    }

    #[test]
    fn fit_within_never_scales_up() {
        let (w, h) = fit_within(100.0, 50.0, 600.0, 600.0);
        assert_eq!((w, h), (100.0, 50.0));
    }

    #[test]
    fn fit_within_handles_degenerate_input() {
        assert_eq!(fit_within(0.0, 100.0, 600.0, 600.0), (0.0, 0.0));
    }

    /// Minimal one-page PDF, written with lopdf directly.
    fn write_minimal_pdf(path: &Path) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![real(0.0), real(0.0), real(612.0), real(792.0)],
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    fn write_test_png(path: &Path) {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 40, 40]));
        img.save(path).unwrap();
    }

    #[test]
    fn compose_writes_watermarked_copy_to_receipts_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let preview_pdf = tmp.path().join("receipt_9.pdf");
        let screenshot = tmp.path().join("robot_preview_9.png");
        let receipts_dir = tmp.path().join("receipts");
        std::fs::create_dir_all(&receipts_dir).unwrap();

        write_minimal_pdf(&preview_pdf);
        write_test_png(&screenshot);

        let compositor = WatermarkCompositor::new(&receipts_dir);
        let output = compositor.compose(&screenshot, &preview_pdf, 9).unwrap();

        assert_eq!(output, receipts_dir.join("receipt_9.pdf"));
        assert!(output.metadata().unwrap().len() > 0);
        // The preview copy is left untouched
        assert!(preview_pdf.exists());

        // Reload and check the overlay actually landed on the page
        let doc = Document::load(&output).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);
        let page_id = *pages.values().next().unwrap();
        let content = doc.get_and_decode_page_content(page_id).unwrap();
        assert!(content.operations.iter().any(|op| op.operator == "Do"));
    }
}
