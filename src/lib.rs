pub mod baseline;
pub mod config;
pub mod config_processors;
pub mod dataframeutils;
pub mod error;
pub mod evaluation;
pub mod io;
pub mod metrics;
pub mod predictor;
pub mod ratings;
pub mod slopeone;
pub mod stopwatch;
