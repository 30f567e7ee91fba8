pub mod bootstrap;
pub mod config;
pub mod coordinator;
pub mod identity;
pub mod jwt;
pub mod metrics;
pub mod payload;
pub mod report;
pub mod session;
pub mod worker;
