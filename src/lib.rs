//! Install a pinned Hugo release into a project folder.
//!
//! Release file names changed many times upstream; [`metadata`] carries the
//! naming history as version thresholds and [`resolver`] turns a request into
//! the exact asset names. [`pipeline`] drives download, verification and
//! unpacking through the capability traits in [`download`], [`extract`] and
//! [`health`].

pub mod cli;
pub mod command_handlers;
pub mod config;
pub mod download;
pub mod error;
pub mod extract;
pub mod health;
pub mod history;
pub mod metadata;
pub mod pipeline;
pub mod platform;
pub mod platforms;
pub mod releases;
pub mod resolver;
pub mod state;
pub mod template;
pub mod threshold;
pub mod version;
