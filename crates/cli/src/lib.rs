//! `csvrecon` command-line driver: exit code registry and output rendering.

pub mod exit_codes;
pub mod render;
