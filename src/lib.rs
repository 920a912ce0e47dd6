#![allow(dead_code)]

//! CQL native-protocol request/response stitching core: decodes CQL
//! opcodes into normalized request and response records, and correlates
//! them across stream-keyed request/response queues into matched
//! `Record`s suitable for downstream telemetry.

pub mod buf_ext;
pub mod composite;
mod config;
pub mod error;
pub mod frame;
pub mod opcode;
mod queue;
mod record;
mod render;
mod request;
mod response;
mod stitcher;

pub use config::StitcherConfig;
pub use error::CqlError;
pub use frame::Frame;
pub use queue::FrameQueue;
pub use record::{Record, Request, Response};
pub use stitcher::Stitcher;
