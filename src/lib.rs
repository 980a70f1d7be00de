pub mod chart;
pub mod cli;
pub mod core;
pub mod report;
