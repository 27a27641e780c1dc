pub mod cli;
pub mod stdio;
