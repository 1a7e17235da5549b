// Copyright 2026 chatgpt-archive Contributors
// SPDX-License-Identifier: Apache-2.0

//! chatgpt-archive library: snapshot a shared ChatGPT conversation.
//!
//! The pipeline is validate → acquire → sanitize → serialize, one module
//! per stage. Each stage can be driven on its own with fixtures.

pub mod acquisition;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod renderer;
pub mod sanitize;
pub mod serializer;
pub mod share_url;
