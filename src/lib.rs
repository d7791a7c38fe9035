pub mod args;
pub mod dataset;
pub mod engine;
pub mod model;
pub mod scoring;
pub mod shuffle;
pub mod storage;
