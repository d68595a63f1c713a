pub mod config;
pub mod logging;

pub mod control;
pub mod error;
pub mod fetch;
pub mod job_store;
pub mod locator;
pub mod orchestrator;
pub mod playlist;
pub mod retry;
pub mod storage;
