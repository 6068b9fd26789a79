//! Order source - downloads and parses the orders CSV.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::models::Order;

/// Fetches the order batch from the fixed remote CSV.
///
/// The download overwrites any previous local copy. Network and parse failures
/// propagate; there is no retry or fallback at this layer.
pub struct OrderSource {
    client: reqwest::Client,
    url: String,
    download_path: String,
}

impl OrderSource {
    pub fn new(url: impl Into<String>, download_path: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            download_path: download_path.into(),
        }
    }

    /// Download the orders file and parse it into an ordered batch.
    pub async fn fetch_orders(&self) -> Result<Vec<Order>> {
        info!("⬇️ Downloading orders file: {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::Download {
                url: self.url.clone(),
                source: e,
            })?;
        let data = response.bytes().await.map_err(|e| AppError::Download {
            url: self.url.clone(),
            source: e,
        })?;

        if let Some(parent) = Path::new(&self.download_path).parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.download_path, &data)?;
        debug!("orders file written to {}", self.download_path);

        let orders = parse_orders(&data)?;
        info!("✓ Read {} order(s) from csv", orders.len());
        Ok(orders)
    }
}

/// Parse CSV bytes (header row expected) into orders, preserving row order.
pub fn parse_orders(data: &[u8]) -> Result<Vec<Order>> {
    let mut reader = csv::Reader::from_reader(data);
    let mut orders = Vec::new();
    for row in reader.deserialize() {
        let order: Order = row?;
        orders.push(order);
    }
    Ok(orders)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_batch_in_row_order() {
        let data = b"Order number,Head,Body,Legs,Address\n3,4,4,5,c\n1,1,2,3,a\n2,2,1,4,b\n";
        let orders = parse_orders(data).unwrap();
        let numbers: Vec<u32> = orders.iter().map(|o| o.order_number).collect();
        assert_eq!(numbers, vec![3, 1, 2]);
    }

    #[test]
    fn header_only_file_yields_empty_batch() {
        let data = b"Order number,Head,Body,Legs,Address\n";
        assert!(parse_orders(data).unwrap().is_empty());
    }

    #[test]
    fn malformed_row_is_an_error() {
        let data = b"Order number,Head,Body,Legs,Address\nnot-a-number,1,2,3,a\n";
        assert!(parse_orders(data).is_err());
    }
}
