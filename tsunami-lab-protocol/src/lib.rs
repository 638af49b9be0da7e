//! # tsunami-lab-protocol
//!
//! The remote control plane shared by the tsunami-lab server and its
//! clients: the line-delimited JSON message format, the catalog of
//! message keys both sides dispatch on, and a blocking [`Communicator`]
//! for driving a server over TCP.

pub mod client;
pub mod message;

pub use client::{Communicator, CommunicatorError, DEFAULT_READ_BUFFER_SIZE};
pub use message::{keys, Message, MessageType};
