//! Page driver - infrastructure layer.
//!
//! Owns the single order page and exposes typed interaction capabilities.
//! Knows nothing about orders or receipts; the workflow layer decides what to
//! click and when.

use std::time::Duration;

use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{AppError, Result};

/// Pixel rectangle of an element, in page CSS coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Capability handle around the one shared order page.
///
/// Every workflow step receives this explicitly instead of reaching for
/// ambient browser state, so the flow can be exercised against a page the
/// caller controls.
pub struct PageDriver {
    page: Page,
}

impl PageDriver {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// The underlying page, for operations the driver does not wrap (CDP calls).
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Evaluate JS and return the raw JSON result.
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        Ok(result.into_value()?)
    }

    /// Evaluate JS and deserialize the result.
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let result = self.page.evaluate(js_code.into()).await?;
        Ok(result.into_value()?)
    }

    /// Click the first element matching a CSS selector.
    pub async fn click(&self, selector: &str) -> Result<()> {
        debug!("click: {}", selector);
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| AppError::ElementNotFound {
                selector: selector.to_string(),
            })?;
        element.click().await?;
        Ok(())
    }

    /// Click the button whose trimmed text equals `text`.
    ///
    /// CSS has no text matcher, so this goes through JS.
    pub async fn click_button_with_text(&self, text: &str) -> Result<()> {
        debug!("click button: '{}'", text);
        let js_code = format!(
            r#"
            (() => {{
                const wanted = {};
                const button = Array.from(document.querySelectorAll('button'))
                    .find(b => b.textContent.trim() === wanted);
                if (!button) return false;
                button.click();
                return true;
            }})()
            "#,
            serde_json::to_string(text)?
        );
        let clicked: bool = self.eval_as(js_code).await?;
        if !clicked {
            return Err(AppError::ElementNotFound {
                selector: format!("button:text('{}')", text),
            });
        }
        Ok(())
    }

    /// Set the value of a `<select>` element and fire a change event.
    pub async fn select_option(&self, selector: &str, value: &str) -> Result<()> {
        debug!("select {} = {}", selector, value);
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({sel});
                if (!el) return false;
                el.value = {val};
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()
            "#,
            sel = serde_json::to_string(selector)?,
            val = serde_json::to_string(value)?,
        );
        let found: bool = self.eval_as(js_code).await?;
        if !found {
            return Err(AppError::ElementNotFound {
                selector: selector.to_string(),
            });
        }
        Ok(())
    }

    /// Check the radio button in `name` whose value attribute equals `value`.
    pub async fn check_radio(&self, name: &str, value: &str) -> Result<()> {
        let selector = format!(r#"input[type="radio"][name="{}"][value="{}"]"#, name, value);
        self.click(&selector).await
    }

    /// Focus an input and type text into it with real key events.
    pub async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        debug!("fill {} ({} chars)", selector, value.len());
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| AppError::ElementNotFound {
                selector: selector.to_string(),
            })?;
        element.click().await?;
        element.type_str(value).await?;
        Ok(())
    }

    /// Whether an element matching the selector exists and takes up space.
    pub async fn is_visible(&self, selector: &str) -> Result<bool> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                return !!(el && el.offsetWidth > 0 && el.offsetHeight > 0);
            }})()
            "#,
            serde_json::to_string(selector)?
        );
        self.eval_as(js_code).await
    }

    /// Inner HTML of the first element matching the selector.
    pub async fn inner_html(&self, selector: &str) -> Result<String> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                return el ? el.innerHTML : null;
            }})()
            "#,
            serde_json::to_string(selector)?
        );
        let html: Option<String> = self.eval_as(js_code).await?;
        html.ok_or_else(|| AppError::ElementNotFound {
            selector: selector.to_string(),
        })
    }

    /// Bounding rectangle of the first element matching the selector, in
    /// page coordinates (scroll offsets included), the frame CDP screenshot
    /// clips are expressed in.
    pub async fn bounding_box(&self, selector: &str) -> Result<BoundingBox> {
        let rect: Option<BoundingBox> = self.eval_as(bounding_box_js(selector)?).await?;
        rect.ok_or_else(|| AppError::ElementNotFound {
            selector: selector.to_string(),
        })
    }

    /// Poll for a selector until it appears or the timeout elapses.
    pub async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()> {
        let poll_interval = Duration::from_millis(100);
        let start = std::time::Instant::now();

        loop {
            if self.page.find_element(selector).await.is_ok() {
                debug!(
                    "wait_for: {} found after {}ms",
                    selector,
                    start.elapsed().as_millis()
                );
                return Ok(());
            }
            if start.elapsed() >= timeout {
                return Err(AppError::ElementNotFound {
                    selector: selector.to_string(),
                });
            }
            tokio::time::sleep(poll_interval).await;
        }
    }
}

/// JS for [`PageDriver::bounding_box`].
///
/// `getBoundingClientRect` is viewport-relative; the scroll offsets are added
/// so the rectangle stays correct when the element sits below the fold.
fn bounding_box_js(selector: &str) -> Result<String> {
    Ok(format!(
        r#"
        (() => {{
            const el = document.querySelector({});
            if (!el) return null;
            const r = el.getBoundingClientRect();
            return {{
                x: r.x + window.scrollX,
                y: r.y + window.scrollY,
                width: r.width,
                height: r.height
            }};
        }})()
        "#,
        serde_json::to_string(selector)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_rect_is_in_page_coordinates() {
        let js = bounding_box_js("#robot-preview-image").unwrap();
        assert!(js.contains("r.x + window.scrollX"));
        assert!(js.contains("r.y + window.scrollY"));
    }

    #[test]
    fn bounding_box_selector_is_json_escaped() {
        let js = bounding_box_js(r#"img[alt="robot"]"#).unwrap();
        assert!(js.contains(r#"document.querySelector("img[alt=\"robot\"]")"#));
    }
}
