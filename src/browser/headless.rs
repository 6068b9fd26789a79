use crate::error::{AppError, Result};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// Launch a (headless) browser and navigate to the given URL.
///
/// The returned `Browser` must be kept alive for as long as the page is used;
/// its CDP event handler is driven by a background task.
pub async fn launch_headless_browser(url: &str, headless: bool) -> Result<(Browser, Page)> {
    info!("🚀 Launching browser...");
    debug!("target URL: {}", url);

    let mut builder = BrowserConfig::builder().args(vec![
        "--disable-gpu",
        "--no-sandbox",            // avoids crashes in containerized environments
        "--disable-dev-shm-usage", // avoids shared-memory exhaustion
        "--remote-debugging-port=0",
    ]);
    if headless {
        builder = builder.new_headless_mode();
    } else {
        builder = builder.with_head();
    }
    let config = builder.build().map_err(|e| {
        error!("browser configuration failed: {}", e);
        AppError::BrowserConfig(e)
    })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("failed to launch browser: {}", e);
        e
    })?;
    debug!("browser process started");

    // Drive CDP events in the background
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // Short pause to let the browser state settle
    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser.new_page(url).await.map_err(|e| {
        error!("failed to open order page: {}", e);
        e
    })?;
    page.wait_for_navigation().await?;

    info!("✅ Browser navigated to: {}", url);

    Ok((browser, page))
}
