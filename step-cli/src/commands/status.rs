//! Show the saved session's state and history.

use anyhow::Result;
use twostep_client::RemoteStateStore;

use super::{finish, start};
use crate::config::CliContext;

/// Run the status command.
pub async fn run<S: RemoteStateStore + 'static>(store: S, ctx: &CliContext) -> Result<()> {
    let mut controller = start(store, ctx).await;

    println!("=== twostep status ===");
    println!();
    println!("Server: {}", ctx.config.server.base_url);
    match controller.username() {
        Some(username) => println!("User:   {}", username),
        None => {
            println!("User:   NOT SIGNED IN");
            println!();
            println!("Run 'twostep play --user <name>' to sign in.");
            return finish(&mut controller, ctx).await;
        }
    }
    println!("Piece:  {}", controller.state());
    println!();

    let history = controller.history();
    println!("History ({} of {}):", history.len(), history.limit());
    for (i, state) in history.entries().enumerate() {
        let marker = if i == history.cursor() { ">" } else { " " };
        println!("  {} [{}] {}", marker, i, state);
    }

    finish(&mut controller, ctx).await
}
