// Network adapter for viewer sockets.

pub mod client;

pub use client::{frame_update_serializer, ws_handler};
