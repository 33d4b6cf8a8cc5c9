//! CLI domain: parse, route, output, and presentation only.
//! No sequencing logic; the route table dispatches to the library.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, OutputFormat};
pub use presentation::{format_plan, format_structure};
pub use route::RunContext;
