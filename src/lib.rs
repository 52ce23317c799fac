pub mod analyzers;
pub mod fetch;
pub mod infra;
pub mod output;
pub mod search;
pub mod services;
pub mod stats;
