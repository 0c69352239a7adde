//! Integration tests for the CSV candle feed

use micro_signal::feed::{CandleFeed, CsvCandleFeed, FeedError};
use std::io::Write;

fn write_csv(rows: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(rows.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_csv_feed_recent_candles() {
    let mut content = String::from("timestamp,open,high,low,close,volume\n");
    for i in 0..50 {
        let close = 100.0 + i as f64;
        content.push_str(&format!(
            "{},{},{},{},{},10\n",
            1_700_000_000 + i * 60,
            close,
            close + 1.0,
            close - 1.0,
            close
        ));
    }
    let file = write_csv(&content);

    let feed = CsvCandleFeed::new(file.path());
    let candles = feed.recent_candles(20).await.unwrap();

    assert_eq!(candles.len(), 20);
    assert_eq!(candles.last().unwrap().close, 149.0);
    assert!(candles.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

#[tokio::test]
async fn test_csv_feed_missing_file() {
    let feed = CsvCandleFeed::new("/nonexistent/candles.csv");
    let result = feed.recent_candles(10).await;
    assert!(matches!(result, Err(FeedError::Io(_))));
}

#[tokio::test]
async fn test_csv_feed_header_only() {
    let file = write_csv("timestamp,open,high,low,close,volume\n");
    let feed = CsvCandleFeed::new(file.path());
    assert!(matches!(feed.recent_candles(10).await, Err(FeedError::Empty)));
}
