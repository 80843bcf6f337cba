//! Trainer server (default binary).
//!
//! Serves one game session per TCP connection; see `obseris::adapter` for the
//! protocol and environment variables.

use anyhow::Result;

use obseris::adapter::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    if ServerConfig::is_disabled() {
        println!("[obseris] server disabled via OBSERIS_DISABLED");
        return Ok(());
    }

    let config = ServerConfig::from_env();
    match config.seed {
        Some(seed) => println!("[obseris] base seed {}", seed),
        None => println!("[obseris] no base seed, sessions seed from entropy"),
    }

    tokio::select! {
        res = run_server(config, None) => {
            if let Err(e) = &res {
                eprintln!("[obseris] server stopped: {:#}", e);
            }
            res
        }
        _ = tokio::signal::ctrl_c() => {
            println!("[obseris] shutting down");
            Ok(())
        }
    }
}
