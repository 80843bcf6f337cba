//! Adapter - trainer access to the engine over a TCP socket with JSON lines
//!
//! Each connection owns one game session. A trainer asks for every reachable
//! placement, scores them itself, and commits the one it likes.
//!
//! # Protocol Overview
//!
//! 1. **Connection**: Client connects (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Enumerate**: `moves` returns every placement plus the session generation
//! 4. **Commit**: `commit` picks an index from the latest list, echoing the generation
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Handshake, optionally choosing the seed
//! - **moves**: Enumerate placements for the current and hold piece
//! - **commit**: Apply one enumerated placement
//! - **garbage**: Queue incoming garbage lines
//! - **reset**: Start a new episode, optionally with a new seed
//! - **observe**: Full session snapshot
//!
//! ## Server → Client
//!
//! - **welcome**, **moves**, **observation**, **ack**
//! - **error**: Error response with code and message
//!
//! # Environment Variables
//!
//! - `OBSERIS_HOST`: Bind address (default: "127.0.0.1")
//! - `OBSERIS_PORT`: Port number (default: 7878)
//! - `OBSERIS_SEED`: Base seed for new sessions (default: entropy)
//! - `OBSERIS_DISABLED`: Set to "1" or "true" to skip the server
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"client":{"name":"my-ai","version":"1.0.0"},"seed":7}
//! Server -> Client: {"type":"welcome","seq":1,"protocol_version":"1.0.0","session_id":1,"seed":7}
//! Client -> Server: {"type":"moves","seq":2}
//! Server -> Client: {"type":"moves","seq":2,"generation":0,"moves":[{"index":0,...},...]}
//! Client -> Server: {"type":"commit","seq":3,"index":12,"generation":0}
//! Server -> Client: {"type":"ack","seq":3,"status":"ok","generation":1}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7878
//! {"type":"hello","seq":1,"client":{"name":"test","version":"1.0.0"}}
//! ```

pub mod protocol;
pub mod server;
pub mod session;

pub use obseris_core as core;
pub use obseris_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use server::*;
pub use session::Session;
