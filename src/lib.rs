pub mod analyzers;
pub mod categories;
pub mod config;
pub mod error;
pub mod filter;
pub mod output;
pub mod parser;
pub mod records;
pub mod report;
