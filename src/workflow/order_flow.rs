//! Order processing flow - workflow layer.
//!
//! Defines the complete per-record sequence against the order page:
//!
//! 1. dismiss the modal
//! 2. fill the form (head / body / legs / address)
//! 3. preview, then submit with a bounded retry on the error banner
//! 4. store the receipt as a PDF
//! 5. screenshot the robot preview
//! 6. composite the screenshot onto the receipt
//! 7. reset the page for the next record
//!
//! The flow holds no page resource itself; the driver is passed in per call.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::infrastructure::PageDriver;
use crate::models::Order;
use crate::services::{ReceiptRenderer, ScreenshotCapturer, WatermarkCompositor};
use crate::workflow::order_ctx::OrderCtx;

/// Selectors of the order page, fixed by the site's DOM.
///
/// Each field is matched the way the site exposes it: the head dropdown and
/// address input by id, the body radios by group name and value, the legs
/// input only by its placeholder text.
const HEAD_SELECT: &str = "#head";
const BODY_RADIO_GROUP: &str = "body";
const LEGS_INPUT: &str = r#"input[placeholder="Enter the part number for the legs"]"#;
const ADDRESS_INPUT: &str = "#address";
const PREVIEW_BUTTON: &str = "#preview";
const ORDER_BUTTON: &str = "#order";
const ORDER_ANOTHER_BUTTON: &str = "#order-another";
const RECEIPT_FRAGMENT: &str = "#receipt";
const ERROR_BANNER: &str = ".alert.alert-danger[role='alert']";
const MODAL_OK_TEXT: &str = "OK";

/// What the submit step needs from the order page.
///
/// `PageDriver` is the production implementation; tests drive the retry loop
/// with a scripted page instead.
#[allow(async_fn_in_trait)]
pub trait SubmitSurface {
    async fn click_order(&self) -> Result<()>;
    async fn error_banner_visible(&self) -> Result<bool>;
}

impl SubmitSurface for PageDriver {
    async fn click_order(&self) -> Result<()> {
        self.click(ORDER_BUTTON).await
    }

    async fn error_banner_visible(&self) -> Result<bool> {
        self.is_visible(ERROR_BANNER).await
    }
}

/// Per-order workflow.
pub struct OrderFlow {
    renderer: ReceiptRenderer,
    capturer: ScreenshotCapturer,
    compositor: WatermarkCompositor,
    max_submit_attempts: usize,
}

impl OrderFlow {
    pub fn new(config: &Config, renderer: ReceiptRenderer) -> Self {
        Self {
            renderer,
            capturer: ScreenshotCapturer::new(&config.preview_dir),
            compositor: WatermarkCompositor::new(&config.receipts_dir),
            max_submit_attempts: config.max_submit_attempts.max(1),
        }
    }

    /// Process one order end to end; returns the final watermarked PDF path.
    pub async fn run(
        &self,
        driver: &PageDriver,
        order: &Order,
        ctx: &OrderCtx,
    ) -> Result<PathBuf> {
        info!("{} processing", ctx);

        self.dismiss_modal(driver).await?;
        self.fill_form(driver, order).await?;
        submit_with_retry(driver, ctx, self.max_submit_attempts).await?;

        let receipt_html = driver.inner_html(RECEIPT_FRAGMENT).await?;
        let preview_pdf = self.renderer.render(&receipt_html, order.order_number).await?;
        info!("{} ✓ receipt stored: {}", ctx, preview_pdf.display());

        let screenshot = self.capturer.capture(driver, order.order_number).await?;
        debug!("{} screenshot saved: {}", ctx, screenshot.display());

        let final_pdf = self
            .compositor
            .compose(&screenshot, &preview_pdf, order.order_number)?;
        info!("{} ✓ watermark applied: {}", ctx, final_pdf.display());

        self.start_new_order(driver).await?;
        Ok(final_pdf)
    }

    /// Click the "OK" button on the init popup.
    async fn dismiss_modal(&self, driver: &PageDriver) -> Result<()> {
        driver.click_button_with_text(MODAL_OK_TEXT).await
    }

    /// Bind the four form fields from the record, then open the preview.
    async fn fill_form(&self, driver: &PageDriver, order: &Order) -> Result<()> {
        driver.select_option(HEAD_SELECT, &order.head).await?;
        driver.check_radio(BODY_RADIO_GROUP, &order.body).await?;
        driver.fill(LEGS_INPUT, &order.legs).await?;
        driver.fill(ADDRESS_INPUT, &order.address).await?;
        driver.click(PREVIEW_BUTTON).await?;
        Ok(())
    }

    /// Reset the page so the next record starts from a blank order form.
    async fn start_new_order(&self, driver: &PageDriver) -> Result<()> {
        driver.click(ORDER_ANOTHER_BUTTON).await?;
        // The modal reappears on the fresh form; the next iteration dismisses it.
        driver
            .wait_for(HEAD_SELECT, Duration::from_secs(10))
            .await
    }
}

/// Click `#order`, re-clicking while the validation banner stays visible.
///
/// The site intermittently rejects valid submissions, so the same submit is
/// repeated, but never more than `max_attempts` times.
async fn submit_with_retry(
    page: &impl SubmitSurface,
    ctx: &OrderCtx,
    max_attempts: usize,
) -> Result<()> {
    for attempt in 1..=max_attempts {
        page.click_order().await?;

        if !page.error_banner_visible().await? {
            if attempt > 1 {
                info!("{} ✓ submit accepted on attempt {}", ctx, attempt);
            }
            return Ok(());
        }
        warn!(
            "{} ⚠️ error banner visible after submit (attempt {}/{})",
            ctx, attempt, max_attempts
        );
    }
    Err(AppError::OrderRejected {
        order_number: ctx.order_number,
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Order page stand-in whose error banner stays visible for a fixed
    /// number of post-submit checks.
    struct ScriptedPage {
        clicks: Cell<usize>,
        banner_checks: Cell<usize>,
        banner_visible_times: usize,
    }

    impl ScriptedPage {
        fn rejecting(times: usize) -> Self {
            Self {
                clicks: Cell::new(0),
                banner_checks: Cell::new(0),
                banner_visible_times: times,
            }
        }
    }

    impl SubmitSurface for ScriptedPage {
        async fn click_order(&self) -> Result<()> {
            self.clicks.set(self.clicks.get() + 1);
            Ok(())
        }

        async fn error_banner_visible(&self) -> Result<bool> {
            let seen = self.banner_checks.get();
            self.banner_checks.set(seen + 1);
            Ok(seen < self.banner_visible_times)
        }
    }

    #[tokio::test]
    async fn clean_submit_clicks_exactly_once() {
        let page = ScriptedPage::rejecting(0);
        let ctx = OrderCtx::new(1, 1, 1);

        submit_with_retry(&page, &ctx, 5).await.unwrap();
        assert_eq!(page.clicks.get(), 1);
    }

    #[tokio::test]
    async fn single_rejection_is_submitted_exactly_twice() {
        let page = ScriptedPage::rejecting(1);
        let ctx = OrderCtx::new(3, 1, 2);

        submit_with_retry(&page, &ctx, 5).await.unwrap();
        assert_eq!(page.clicks.get(), 2);
    }

    #[tokio::test]
    async fn persistent_banner_fails_after_max_attempts() {
        let page = ScriptedPage::rejecting(usize::MAX);
        let ctx = OrderCtx::new(7, 2, 2);

        let err = submit_with_retry(&page, &ctx, 3).await.unwrap_err();
        assert_eq!(page.clicks.get(), 3);
        match err {
            AppError::OrderRejected {
                order_number,
                attempts,
            } => {
                assert_eq!(order_number, 7);
                assert_eq!(attempts, 3);
            }
            other => panic!("expected OrderRejected, got {other:?}"),
        }
    }
}
