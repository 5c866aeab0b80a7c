pub mod cli;
pub mod configuration;
pub mod echo;
pub mod filter;
pub mod logger;
