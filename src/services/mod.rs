pub mod archiver;
pub mod order_source;
pub mod receipt_renderer;
pub mod screenshot;
pub mod watermark;

pub use archiver::Archiver;
pub use order_source::OrderSource;
pub use receipt_renderer::ReceiptRenderer;
pub use screenshot::ScreenshotCapturer;
pub use watermark::WatermarkCompositor;
