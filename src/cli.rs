mod runner;
mod types;


pub use runner::run_cli;
