pub mod cli;
pub mod config;
pub mod formats;
pub mod model;
pub mod movement;
pub mod sim;

pub fn run_cli() -> Result<(), String> {
    cli::run_cli()
}
