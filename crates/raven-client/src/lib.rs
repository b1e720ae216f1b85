//! Raven client library
//!
//! This crate provides the desktop client for Raven chat: configuration,
//! the HTTP backend client, application state and the message and channel
//! UI components.

pub mod config;
pub mod network;
pub mod state;
pub mod tasks;
pub mod ui;
