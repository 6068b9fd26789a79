//! Order record as read from the orders CSV.

use serde::Deserialize;

/// One row of the orders file: a single robot configuration to submit.
///
/// Rows are immutable once read and consumed exactly once, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Order {
    /// Order identifier, keys all output filenames
    #[serde(rename = "Order number")]
    pub order_number: u32,
    /// Value for the `#head` dropdown
    #[serde(rename = "Head")]
    pub head: String,
    /// Value for the `name="body"` radio group
    #[serde(rename = "Body")]
    pub body: String,
    /// Free-text part number for the legs input
    #[serde(rename = "Legs")]
    pub legs: String,
    /// Free-text shipping address
    #[serde(rename = "Address")]
    pub address: String,
}

impl Order {
    /// Receipt PDF filename for this order, shared by the preview and final copies
    pub fn receipt_filename(&self) -> String {
        format!("receipt_{}.pdf", self.order_number)
    }

    /// Screenshot PNG filename for this order
    pub fn screenshot_filename(&self) -> String {
        format!("robot_preview_{}.png", self.order_number)
    }
}
