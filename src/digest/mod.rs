pub mod audit;
pub mod client;
pub mod config;
pub mod dates;
pub mod entry;
pub mod fetch;
pub mod fsutil;
pub mod manifest;
pub mod paths;
pub mod render;
pub mod retention;
pub mod scan;
pub mod warn;
