//! Run controller - orchestration layer.
//!
//! Executes the five phases in fixed order: workspace setup, order download,
//! per-order browser workflow, archival, teardown. The browser is launched
//! lazily, only once a non-empty batch has been read; teardown runs on failure
//! paths as well.

use anyhow::Result;
use chromiumoxide::Browser;
use tracing::{error, info, warn};

use crate::browser::launch_headless_browser;
use crate::config::Config;
use crate::infrastructure::PageDriver;
use crate::models::Order;
use crate::orchestrator::workspace::Workspace;
use crate::services::{Archiver, OrderSource, ReceiptRenderer};
use crate::workflow::{OrderCtx, OrderFlow};

/// Application entry object. `new` is cheap; all side effects happen in `run`.
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Execute one full run, producing `receipts.zip` on success.
    pub async fn run(&self) -> Result<()> {
        log_startup(&self.config);

        let mut workspace = Workspace::setup(&self.config)?;

        // Archival happens inside process() so the ZIP exists before the
        // working directories are torn down.
        let outcome = self.process(&workspace).await;

        // Teardown runs regardless of the processing outcome; a cleanup
        // failure must not mask a processing error.
        if let Err(e) = workspace.cleanup() {
            warn!("workspace cleanup failed: {}", e);
        }
        let archived = outcome?;

        log_run_complete(archived, &self.config);
        Ok(())
    }

    /// Phases 2-4: download, per-order workflow, archival.
    ///
    /// Returns the number of archived receipts.
    async fn process(&self, workspace: &Workspace) -> Result<usize> {
        let source = OrderSource::new(
            self.config.orders_csv_url.as_str(),
            self.config.csv_download_path.as_str(),
        );
        let orders = source.fetch_orders().await?;

        if orders.is_empty() {
            // No browser session for an empty batch; the archive step still
            // runs and produces a zero-entry archive.
            warn!("⚠️ Order batch is empty, nothing to submit");
        } else {
            self.process_orders(&orders, workspace).await?;
        }

        let archiver = Archiver::new(&self.config.zip_path);
        let archived = archiver.archive_receipts(workspace.receipts_dir())?;
        Ok(archived)
    }

    /// Phase 3: drive the browser through every order, in file order.
    async fn process_orders(&self, orders: &[Order], workspace: &Workspace) -> Result<()> {
        info!("Opening browser");
        let (browser, page) =
            launch_headless_browser(&self.config.order_site_url, self.config.headless).await?;
        let driver = PageDriver::new(page);

        // Dedicated scratch tab for receipt rendering, so printing never
        // touches the live order page.
        let renderer_page = browser.new_page("about:blank").await?;
        let renderer = ReceiptRenderer::new(renderer_page, &self.config.preview_dir);
        let flow = OrderFlow::new(&self.config, renderer);

        let total = orders.len();
        let result = self.run_flow(&flow, &driver, orders, total).await;

        shutdown_browser(browser).await;
        result
    }

    async fn run_flow(
        &self,
        flow: &OrderFlow,
        driver: &PageDriver,
        orders: &[Order],
        total: usize,
    ) -> Result<()> {
        for (index, order) in orders.iter().enumerate() {
            let ctx = OrderCtx::new(order.order_number, index + 1, total);
            if let Err(e) = flow.run(driver, order, &ctx).await {
                error!("{} ❌ failed: {}", ctx, e);
                return Err(e.into());
            }
        }
        Ok(())
    }
}

/// Close the browser, falling back to killing the process if CDP is gone.
async fn shutdown_browser(mut browser: Browser) {
    if let Err(e) = browser.close().await {
        warn!("failed to close browser cleanly: {}", e);
    }
    if let Err(e) = browser.wait().await {
        warn!("browser did not exit cleanly: {}", e);
    }
}

// ========== log helpers ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🤖 RobotSpareBin order run - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📄 orders: {}", config.orders_csv_url);
    info!("🌐 site:   {}", config.order_site_url);
    info!("{}", "=".repeat(60));
}

fn log_run_complete(archived: usize, config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "✅ Run complete - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📦 {} receipt(s) in {}", archived, config.zip_path);
    info!("{}", "=".repeat(60));
}
