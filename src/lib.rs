pub mod apply;
pub mod cli;
pub mod config;
pub mod error;
pub mod help;
pub mod inbox;
pub mod ledger;
pub mod plan;
pub mod pull;
pub mod queue;
pub mod remote;
pub mod resolve;
pub mod store;
pub mod util;
