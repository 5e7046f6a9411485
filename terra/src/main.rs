//! The server binary (§10.1): loads configuration, installs the tracing
//! subscriber, builds the top-level [`Server`], and runs its simulation
//! thread while reading console commands from stdin until `/stop`.

mod config;
mod logging;
mod server;

use std::io::BufRead;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use config::TerraConfig;
use server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let config = TerraConfig::load_or_create(Path::new("config.json5"))?;
    tracing::info!(seed = config.resolve_seed(), level_name = %config.level_name, "starting server");

    let server = Arc::new(Server::new(&config));
    let sim_thread = server.spawn_simulation_thread();

    console_loop(&server).await;

    server.stop_requested.store(true, Ordering::Relaxed);
    sim_thread.join().expect("simulation thread panicked");
    Ok(())
}

/// Reads lines from stdin and dispatches them as console commands (§6),
/// blocking on a dedicated thread since `Stdin::lock` is synchronous.
async fn console_loop(server: &Arc<Server>) {
    let server = server.clone();
    tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let feedback = server.run_console_command(line);
            tracing::info!(target: "terra::console", "{feedback}");
            if server.stop_requested.load(Ordering::Relaxed) {
                break;
            }
        }
    })
    .await
    .expect("console task panicked");
}
