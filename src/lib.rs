#![doc = include_str!("../README.md")]

/// Concurrent message-id existence checking
pub mod checker;
mod client;
/// NNTP command builders and response-line parsing
pub mod commands;
mod config;
mod error;
/// Response framing over the raw socket byte stream
pub mod framing;
/// NZB segment extraction
pub mod nzb;
mod response;
/// Spooling decoded payloads to disk
pub mod storage;
/// yEnc payload codec
pub mod yenc;

pub use checker::{ExistenceReport, check_existence};
pub use client::{CompressionScheme, Delivery, NntpClient};
pub use commands::GroupInfo;
pub use config::{ClientConfig, ServerEntry};
pub use error::{NntpError, Result};
pub use response::{ResponseEnvelope, codes};
