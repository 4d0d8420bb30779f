//! Protocol module containing the IPC wire format.

pub mod ipc;

pub use ipc::{decode_message, encode_message, IpcMessage, WireError, MAX_MESSAGE_BYTES};
