pub mod dto;
pub mod service;
pub mod tracker;

pub use service::QuotaService;
pub use tracker::{
    QuotaExceeded, QuotaTracker, UsageWindow, DEFAULT_MAX_USAGE, DEFAULT_WINDOW_MINUTES,
};
