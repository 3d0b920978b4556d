pub mod client;
pub mod queue;
pub mod schedule;
pub mod scheduler;
pub mod tasks;
pub mod worker;

pub use client::{ClientConfig, ReqwestUpstreamClient, UpstreamClient, UpstreamEmployee, UpstreamEvent};
pub use worker::{RetryPolicy, Worker};
