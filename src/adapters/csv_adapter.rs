//! CSV kline archive adapter.
//!
//! One file per symbol and timeframe, named `{SYMBOL}_{timeframe}.csv`,
//! with columns `timestamp,open,high,low,close,volume` where `timestamp`
//! is epoch milliseconds (the exchange kline convention).

use crate::domain::bar::Bar;
use crate::domain::error::ScalplabError;
use crate::ports::data_port::DataPort;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;

pub struct CsvBarAdapter {
    base_path: PathBuf,
    timeframe: String,
}

impl CsvBarAdapter {
    pub fn new(base_path: PathBuf, timeframe: impl Into<String>) -> Self {
        Self {
            base_path,
            timeframe: timeframe.into(),
        }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.csv", symbol, self.timeframe))
    }

    fn read_all(&self, symbol: &str) -> Result<Vec<Bar>, ScalplabError> {
        let path = self.csv_path(symbol);
        let mut rdr = csv::Reader::from_path(&path).map_err(|e| ScalplabError::Data {
            reason: format!("failed to open {}: {}", path.display(), e),
        })?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| ScalplabError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let millis: i64 = get_field(&record, 0, "timestamp")?
                .parse()
                .map_err(|e| ScalplabError::Data {
                    reason: format!("invalid timestamp: {}", e),
                })?;
            let timestamp =
                DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
                    ScalplabError::Data {
                        reason: format!("timestamp out of range: {}", millis),
                    }
                })?;

            bars.push(Bar {
                timestamp,
                open: parse_price(&record, 1, "open")?,
                high: parse_price(&record, 2, "high")?,
                low: parse_price(&record, 3, "low")?,
                close: parse_price(&record, 4, "close")?,
                volume: parse_price(&record, 5, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        for pair in bars.windows(2) {
            if pair[0].timestamp == pair[1].timestamp {
                return Err(ScalplabError::Data {
                    reason: format!(
                        "duplicate timestamp {} in {}",
                        pair[0].timestamp,
                        path.display()
                    ),
                });
            }
        }

        Ok(bars)
    }
}

fn get_field<'a>(
    record: &'a csv::StringRecord,
    idx: usize,
    name: &str,
) -> Result<&'a str, ScalplabError> {
    record.get(idx).ok_or_else(|| ScalplabError::Data {
        reason: format!("missing {} column", name),
    })
}

fn parse_price(
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
) -> Result<f64, ScalplabError> {
    get_field(record, idx, name)?
        .parse()
        .map_err(|e| ScalplabError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl DataPort for CsvBarAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bar>, ScalplabError> {
        let bars = self.read_all(symbol)?;
        Ok(bars
            .into_iter()
            .filter(|b| b.timestamp >= start && b.timestamp <= end)
            .collect())
    }

    fn list_symbols(&self) -> Result<Vec<String>, ScalplabError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| ScalplabError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let suffix = format!("_{}.csv", self.timeframe);
        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ScalplabError::Data {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(&suffix) {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>, usize)>, ScalplabError> {
        let bars = self.read_all(symbol)?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => {
                Ok(Some((first.timestamp, last.timestamp, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        // 2024-01-15 00:00, 00:05, 00:10 UTC in epoch millis.
        let csv_content = "timestamp,open,high,low,close,volume\n\
            1705276800000,100.0,110.0,90.0,105.0,50000\n\
            1705277100000,105.0,115.0,100.0,110.0,60000\n\
            1705277400000,110.0,120.0,105.0,115.0,55000\n";

        fs::write(path.join("BTCUSDT_5m.csv"), csv_content).unwrap();
        fs::write(
            path.join("ETHUSDT_5m.csv"),
            "timestamp,open,high,low,close,volume\n",
        )
        .unwrap();
        fs::write(
            path.join("BTCUSDT_1h.csv"),
            "timestamp,open,high,low,close,volume\n",
        )
        .unwrap();

        (dir, path)
    }

    fn wide_range() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn fetch_bars_parses_klines() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvBarAdapter::new(path, "5m");
        let (start, end) = wide_range();

        let bars = adapter.fetch_bars("BTCUSDT", start, end).unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(
            bars[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
        );
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50_000.0);
    }

    #[test]
    fn fetch_bars_filters_by_time() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvBarAdapter::new(path, "5m");

        let start = Utc.with_ymd_and_hms(2024, 1, 15, 0, 5, 0).unwrap();
        let end = start;
        let bars = adapter.fetch_bars("BTCUSDT", start, end).unwrap();

        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 110.0);
    }

    #[test]
    fn fetch_bars_missing_file_is_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvBarAdapter::new(path, "5m");
        let (start, end) = wide_range();

        assert!(adapter.fetch_bars("XRPUSDT", start, end).is_err());
    }

    #[test]
    fn fetch_bars_rejects_duplicate_timestamps() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();
        fs::write(
            path.join("BTCUSDT_5m.csv"),
            "timestamp,open,high,low,close,volume\n\
             1705276800000,100.0,110.0,90.0,105.0,50000\n\
             1705276800000,105.0,115.0,100.0,110.0,60000\n",
        )
        .unwrap();

        let adapter = CsvBarAdapter::new(path, "5m");
        let (start, end) = wide_range();
        let err = adapter.fetch_bars("BTCUSDT", start, end).unwrap_err();
        assert!(err.to_string().contains("duplicate timestamp"));
    }

    #[test]
    fn fetch_bars_sorts_out_of_order_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();
        fs::write(
            path.join("BTCUSDT_5m.csv"),
            "timestamp,open,high,low,close,volume\n\
             1705277100000,105.0,115.0,100.0,110.0,60000\n\
             1705276800000,100.0,110.0,90.0,105.0,50000\n",
        )
        .unwrap();

        let adapter = CsvBarAdapter::new(path, "5m");
        let (start, end) = wide_range();
        let bars = adapter.fetch_bars("BTCUSDT", start, end).unwrap();

        assert_eq!(bars.len(), 2);
        assert!(bars[0].timestamp < bars[1].timestamp);
    }

    #[test]
    fn list_symbols_matches_timeframe() {
        let (_dir, path) = setup_test_data();

        let adapter = CsvBarAdapter::new(path.clone(), "5m");
        assert_eq!(adapter.list_symbols().unwrap(), vec!["BTCUSDT", "ETHUSDT"]);

        let adapter = CsvBarAdapter::new(path, "1h");
        assert_eq!(adapter.list_symbols().unwrap(), vec!["BTCUSDT"]);
    }

    #[test]
    fn data_range_reports_bounds() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvBarAdapter::new(path, "5m");

        let (first, last, count) = adapter.data_range("BTCUSDT").unwrap().unwrap();
        assert_eq!(first, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
        assert_eq!(last, Utc.with_ymd_and_hms(2024, 1, 15, 0, 10, 0).unwrap());
        assert_eq!(count, 3);

        assert!(adapter.data_range("ETHUSDT").unwrap().is_none());
    }
}
