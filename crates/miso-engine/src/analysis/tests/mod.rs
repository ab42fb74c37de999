mod common;

mod aggregator;
mod completeness;
mod service;
