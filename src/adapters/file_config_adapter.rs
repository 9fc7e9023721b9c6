//! INI file configuration adapter.

use crate::domain::error::BacktestError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BacktestError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| BacktestError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, BacktestError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| BacktestError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Some(true),
            "false" | "no" | "0" | "off" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_deref()
            .and_then(Self::parse_bool)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[backtest]
symbol = TSLA
initial_capital = 100000.0
start_date = 2024-01-01

[data]
directory = /var/lib/prices

[signals]
source = regression
train_fraction = 0.75
skip_last_day = yes

[report]
output = tsla_report.txt
"#;

    #[test]
    fn from_string_reads_every_section() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_string("backtest", "symbol"), Some("TSLA".into()));
        assert_eq!(
            adapter.get_string("data", "directory"),
            Some("/var/lib/prices".into())
        );
        assert_eq!(adapter.get_double("backtest", "initial_capital", 0.0), 100_000.0);
        assert_eq!(adapter.get_double("signals", "train_fraction", 0.0), 0.75);
        assert!(adapter.get_bool("signals", "skip_last_day", false));
    }

    #[test]
    fn missing_keys_fall_back() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_string("backtest", "end_date"), None);
        assert_eq!(adapter.get_string("nowhere", "key"), None);
        assert_eq!(adapter.get_int("backtest", "missing", 7), 7);
        assert_eq!(adapter.get_double("metrics", "missing", 1.5), 1.5);
        assert!(!adapter.get_bool("signals", "missing", false));
    }

    #[test]
    fn non_numeric_values_fall_back() {
        let adapter =
            FileConfigAdapter::from_string("[backtest]\ninitial_capital = lots\nwindow = ten\n")
                .unwrap();
        assert_eq!(adapter.get_double("backtest", "initial_capital", 42.0), 42.0);
        assert_eq!(adapter.get_int("backtest", "window", 3), 3);
    }

    #[test]
    fn bool_spellings() {
        let adapter = FileConfigAdapter::from_string(
            "[s]\na = true\nb = On\nc = 0\nd = no\ne = maybe\n",
        )
        .unwrap();
        assert!(adapter.get_bool("s", "a", false));
        assert!(adapter.get_bool("s", "b", false));
        assert!(!adapter.get_bool("s", "c", true));
        assert!(!adapter.get_bool("s", "d", true));
        assert!(adapter.get_bool("s", "e", true));
    }

    #[test]
    fn get_string_or_skips_blank() {
        let adapter = FileConfigAdapter::from_string("[report]\noutput =   \n").unwrap();
        assert_eq!(
            adapter.get_string_or("report", "output", "report.txt"),
            "report.txt"
        );
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_string_or("report", "output", "report.txt"),
            "tsla_report.txt"
        );
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_string("signals", "source"), Some("regression".into()));
    }

    #[test]
    fn from_file_missing_is_config_parse_error() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/config.ini").unwrap_err();
        assert!(matches!(err, BacktestError::ConfigParse { file, .. } if file.contains("config.ini")));
    }
}
