pub mod analyzer;
pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod picker;
pub mod report_view;
