//! Order processing context.

use std::fmt::Display;

/// Which order of the batch is being processed, for logging.
#[derive(Debug, Clone, Copy)]
pub struct OrderCtx {
    /// Order number from the CSV row
    pub order_number: u32,
    /// Position in the batch (1-based)
    pub order_index: usize,
    /// Batch size
    pub total: usize,
}

impl OrderCtx {
    pub fn new(order_number: u32, order_index: usize, total: usize) -> Self {
        Self {
            order_number,
            order_index,
            total,
        }
    }
}

impl Display for OrderCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[order {}/{} #{}]",
            self.order_index, self.total, self.order_number
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shows_position_and_number() {
        let ctx = OrderCtx::new(42, 3, 17);
        assert_eq!(ctx.to_string(), "[order 3/17 #42]");
    }
}
