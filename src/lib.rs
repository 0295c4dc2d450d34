pub mod calculator;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

pub use calculator::{CgpaReport, FinalizeReport, GradeLedger};
pub use config::Config;
pub use error::LedgerError;
