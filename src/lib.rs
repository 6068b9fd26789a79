//! # Robot Order Bot
//!
//! Orders robots from RobotSpareBin Industries Inc.: downloads the orders CSV,
//! submits each order through a headless browser, stores every HTML receipt as
//! a PDF, composites a screenshot of the ordered robot onto it as a watermark,
//! and zips the final receipts.
//!
//! ## Architecture
//!
//! Strict layering, top to bottom:
//!
//! - `orchestrator/` - phase sequencing (setup → orders → workflow → archive →
//!   teardown), browser lifetime, guaranteed workspace cleanup
//! - `workflow/` - the complete per-order flow against the order page
//! - `services/` - single capabilities: order download/parse, receipt
//!   rendering, screenshot capture, watermark compositing, ZIP archiving
//! - `infrastructure/` - `PageDriver`, the only owner of the order page,
//!   exposing typed interaction capabilities
//! - `browser/` - headless Chromium launch and event pumping

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

pub use browser::launch_headless_browser;
pub use config::Config;
pub use error::{AppError, Result};
pub use infrastructure::PageDriver;
pub use models::Order;
pub use orchestrator::App;
pub use workflow::{OrderCtx, OrderFlow};
