#![warn(clippy::pedantic)]
// Noisy doc/signature lints — would require annotating every pub function
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
// Style preference — keeping format!("{}", x) over format!("{x}") for readability with complex exprs
#![allow(clippy::uninlined_format_args)]
// Module structure — tools::ToolRegistry etc. by design
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod cli;
pub mod config;
pub(crate) mod errors;
pub mod gateway;
pub mod tools;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
