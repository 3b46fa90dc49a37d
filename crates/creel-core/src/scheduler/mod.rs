mod service;
mod worker;

pub use service::Scheduler;
pub use worker::{CycleOutcome, IngestWorker};
