//! Shared test harness: config builder, test server, mock upstreams

#![allow(dead_code)]

pub mod config;
pub mod mock_cloud;
pub mod mock_tts;
pub mod server;
