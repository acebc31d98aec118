pub mod analyzers;
pub mod config;
pub mod dataset;
pub mod explore;
pub mod fetch;
pub mod filter;
pub mod output;
pub mod parser;
pub mod session;
pub mod stats;
