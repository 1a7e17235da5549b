//! CLI command implementations for the chatgpt-archive binary.

pub mod archive_cmd;
