//! Command handlers -- one module per subcommand

pub mod config;
pub mod dockerfile;
pub mod preview;
pub mod run;
