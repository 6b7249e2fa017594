pub mod app;
pub mod cli;
pub mod logging;
pub mod utils;

pub use cli::{Cli, Command, GarageCommand, OutputFormat};
