/// Runtime configuration.
///
/// All values have fixed defaults matching the RobotSpareBin site; each can be
/// overridden from the environment so tests can point the bot at doubles
/// without touching orchestration code.
#[derive(Clone, Debug)]
pub struct Config {
    /// URL of the orders CSV file
    pub orders_csv_url: String,
    /// URL of the robot order page
    pub order_site_url: String,
    /// Where the downloaded CSV is written (overwritten each run)
    pub csv_download_path: String,
    /// Scratch directory for pre-watermark PDFs and screenshots
    pub preview_dir: String,
    /// Directory for final watermarked receipt PDFs
    pub receipts_dir: String,
    /// Path of the final ZIP deliverable
    pub zip_path: String,
    /// Maximum number of times `#order` is clicked per record before giving up
    pub max_submit_attempts: usize,
    /// Run the browser headless
    pub headless: bool,
    /// Show per-step detail logs
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            orders_csv_url: "https://robotsparebinindustries.com/orders.csv".to_string(),
            order_site_url: "https://robotsparebinindustries.com/#/robot-order".to_string(),
            csv_download_path: "output/orders.csv".to_string(),
            preview_dir: "output/preview".to_string(),
            receipts_dir: "output/receipts".to_string(),
            zip_path: "output/receipts.zip".to_string(),
            max_submit_attempts: 5,
            headless: true,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            orders_csv_url: std::env::var("ORDERS_CSV_URL").unwrap_or(default.orders_csv_url),
            order_site_url: std::env::var("ORDER_SITE_URL").unwrap_or(default.order_site_url),
            csv_download_path: std::env::var("CSV_DOWNLOAD_PATH").unwrap_or(default.csv_download_path),
            preview_dir: std::env::var("PREVIEW_DIR").unwrap_or(default.preview_dir),
            receipts_dir: std::env::var("RECEIPTS_DIR").unwrap_or(default.receipts_dir),
            zip_path: std::env::var("ZIP_PATH").unwrap_or(default.zip_path),
            max_submit_attempts: std::env::var("MAX_SUBMIT_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_submit_attempts),
            headless: std::env::var("HEADLESS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.headless),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_sparebin() {
        let config = Config::default();
        assert!(config.orders_csv_url.ends_with("orders.csv"));
        assert!(config.order_site_url.contains("robot-order"));
        assert_eq!(config.zip_path, "output/receipts.zip");
        assert!(config.max_submit_attempts >= 1);
    }
}
