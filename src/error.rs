//! Application error taxonomy.
//!
//! Services return `crate::error::Result`; the orchestration layer and the
//! binary work with `anyhow::Result` and pick these up through `?`.

use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Filesystem failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Downloading the orders file failed
    #[error("failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The orders file could not be parsed
    #[error("failed to parse orders csv: {0}")]
    Csv(#[from] csv::Error),

    /// Browser / CDP failure
    #[error("browser error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    /// Encoding a value for JS evaluation failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Headless browser configuration was rejected
    #[error("browser configuration failed: {0}")]
    BrowserConfig(String),

    /// A selector matched nothing on the page
    #[error("element not found: {selector}")]
    ElementNotFound { selector: String },

    /// The site kept showing the validation error banner
    #[error("order {order_number} still rejected after {attempts} submit attempts")]
    OrderRejected { order_number: u32, attempts: usize },

    /// Screenshot capture failed
    #[error("screenshot failed: {0}")]
    Screenshot(String),

    /// PDF load / compose / save failure
    #[error("pdf error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// ZIP archive failure
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, AppError>;
