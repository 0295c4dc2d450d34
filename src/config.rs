use std::path::PathBuf;
use anyhow::{anyhow, Context, Result};
use simplelog::LevelFilter;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/academic_tools/";
pub const DEFAULT_DATA_DIR: &str = ".gradeledger";

// Remote endpoints, all resolved against the configured base URL.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub courses: Url,
    pub calculate_gpa: Url,
    pub calculate_cgpa: Url,
}

impl Endpoints {
    pub fn from_base(base: &Url) -> Result<Self> {
        // Url::join drops the last path segment unless the base ends with a slash.
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Endpoints {
            courses: base.join("api/courses/").context("Failed to build the courses URL")?,
            calculate_gpa: base.join("api/calculate-gpa/").context("Failed to build the GPA URL")?,
            calculate_cgpa: base.join("api/calculate-cgpa/").context("Failed to build the CGPA URL")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    pub data_dir: PathBuf,
    pub log_level: LevelFilter,
}

impl Config {
    pub fn new(base_url: Url, data_dir: impl Into<PathBuf>) -> Self {
        Config {
            base_url,
            data_dir: data_dir.into(),
            log_level: LevelFilter::Info,
        }
    }

    /// Reads the configuration from the environment.
    ///
    /// - `GRADELEDGER_BASE_URL` (default: `http://localhost:8000/academic_tools/`)
    /// - `GRADELEDGER_DATA_DIR` (default: `.gradeledger`)
    /// - `GRADELEDGER_LOG` (default: `info`)
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("GRADELEDGER_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url).with_context(|| format!("GRADELEDGER_BASE_URL is not a valid URL: {}", base_url))?;
        let data_dir = std::env::var("GRADELEDGER_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        let log_level = match std::env::var("GRADELEDGER_LOG") {
            Ok(level) => level.parse::<LevelFilter>().map_err(|_| anyhow!("GRADELEDGER_LOG is not a log level: {}", level))?,
            Err(_) => LevelFilter::Info,
        };

        Ok(Config {
            base_url,
            data_dir: PathBuf::from(data_dir),
            log_level,
        })
    }

    pub fn endpoints(&self) -> Result<Endpoints> {
        Endpoints::from_base(&self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_under_the_base_path() {
        let base = Url::parse("http://example.com/academic_tools").unwrap();
        let endpoints = Endpoints::from_base(&base).unwrap();
        assert_eq!(endpoints.courses.as_str(), "http://example.com/academic_tools/api/courses/");
        assert_eq!(endpoints.calculate_gpa.as_str(), "http://example.com/academic_tools/api/calculate-gpa/");
        assert_eq!(endpoints.calculate_cgpa.as_str(), "http://example.com/academic_tools/api/calculate-cgpa/");
    }

    #[test]
    fn endpoints_keep_a_trailing_slash_base() {
        let base = Url::parse(DEFAULT_BASE_URL).unwrap();
        let endpoints = Endpoints::from_base(&base).unwrap();
        assert_eq!(endpoints.courses.as_str(), "http://localhost:8000/academic_tools/api/courses/");
    }
}
