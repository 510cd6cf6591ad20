//! Curiosity clinical dashboard
//!
//! Renders a single patient's clinical summary (biochemical panel,
//! pharmacogenomics, polygenic risk, family history, imaging findings) as an
//! HTML dashboard with a generated pedigree chart and selectable themes.
//!
//! # Pipeline
//!
//! - [`record`]: the immutable [`ClinicalRecord`] built from literals
//! - [`highlight`]: abnormality classifier and category tinting
//! - [`pedigree`]: parent/child graph derived from the family history
//! - [`view`]: styled tables and the [`TableRenderer`] seam
//! - [`page`]: the complete HTML document
//! - `server` (feature `server`): blocking HTTP front end
//!
//! # Example
//!
//! ```
//! use curiosity::{render_page, ClinicalRecord, DashboardConfig, PageOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let record = ClinicalRecord::sample();
//! let html = render_page(&record, &PageOptions::default(), &DashboardConfig::default())?;
//! assert!(html.contains("Pedigree Chart"));
//! # Ok(())
//! # }
//! ```

use std::net::ToSocketAddrs;

pub mod error;
pub use error::{Error, Result};

pub mod highlight;
pub mod page;
pub mod pedigree;
pub mod record;
pub mod rendering;
pub mod theme;
pub mod view;

// HTTP front end
#[cfg(feature = "server")]
pub mod server;

pub use highlight::{is_abnormal, TableCategory};
pub use page::{render_page, PageOptions};
pub use pedigree::Pedigree;
pub use record::ClinicalRecord;
pub use theme::Theme;
pub use view::{HtmlRenderer, StyledTable, TableRenderer, TextRenderer};

/// Configuration for the dashboard
///
/// The defaults bind to localhost only and use inline placeholder images so
/// the page renders without network access.
///
/// # Examples
///
/// ```
/// let cfg = curiosity::DashboardConfig::default();
/// assert_eq!(cfg.addr, "127.0.0.1:8501");
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Address the HTTP server binds to
    pub addr: String,
    /// Number of request worker threads
    pub workers: usize,
    /// Theme used when the viewer has not picked one
    pub default_theme: Theme,
    /// Whether reference ranges are shown when the viewer has not chosen
    pub show_reference_ranges: bool,
    /// Browser tab title
    pub page_title: String,
    /// Logo image URL; `None` uses an inline placeholder
    pub logo_url: Option<String>,
    /// Patient photo URL; `None` uses an inline placeholder
    pub photo_url: Option<String>,
}

#[cfg(feature = "server")]
fn default_workers() -> usize {
    num_cpus::get()
}

#[cfg(not(feature = "server"))]
fn default_workers() -> usize {
    1
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8501".to_string(),
            workers: default_workers(),
            default_theme: Theme::Default,
            show_reference_ranges: false,
            page_title: "Curiosity Dashboard".to_string(),
            logo_url: None,
            photo_url: None,
        }
    }
}

impl DashboardConfig {
    /// Check the configuration before starting a server.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::Config("workers must be at least 1".into()));
        }
        let mut addrs = self
            .addr
            .to_socket_addrs()
            .map_err(|e| Error::Config(format!("invalid address '{}': {}", self.addr, e)))?;
        if addrs.next().is_none() {
            return Err(Error::Config(format!(
                "address '{}' did not resolve",
                self.addr
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.default_theme, Theme::Default);
        assert!(!config.show_reference_ranges);
        assert!(config.workers >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let zero = DashboardConfig { workers: 0, ..Default::default() };
        assert!(matches!(zero.validate(), Err(Error::Config(_))));

        let bad_addr = DashboardConfig { addr: "not an address".into(), ..Default::default() };
        assert!(matches!(bad_addr.validate(), Err(Error::Config(_))));
    }
}
