pub mod cli_args;
pub mod startup;
