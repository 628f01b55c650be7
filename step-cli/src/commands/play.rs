//! Move the piece interactively.
//!
//! Reads one command per line, applies it through the controller and prints
//! the resulting piece. Writes to the server happen in the background.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use twostep_client::{ControllerError, RemoteStateStore, SyncController};
use twostep_core::AuthNotice;
use twostep_types::{Color, State};

use super::{finish, start};
use crate::config::CliContext;

/// Default step for the arrow-style commands.
const STEP: i64 = 10;

/// One line of input.
#[derive(Parser, Debug, PartialEq)]
#[command(no_binary_name = true, name = "twostep", disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: PlayCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
enum PlayCommand {
    /// Sign in as a user
    Signin {
        /// Username
        username: String,
    },
    /// Sign out and reset the piece
    Signout,
    /// Move by a relative offset
    #[command(allow_negative_numbers = true)]
    Move {
        /// Horizontal offset
        dx: i64,
        /// Vertical offset
        dy: i64,
    },
    /// Move up
    Up {
        /// Distance
        #[arg(default_value_t = STEP)]
        step: i64,
    },
    /// Move down
    Down {
        /// Distance
        #[arg(default_value_t = STEP)]
        step: i64,
    },
    /// Move left
    Left {
        /// Distance
        #[arg(default_value_t = STEP)]
        step: i64,
    },
    /// Move right
    Right {
        /// Distance
        #[arg(default_value_t = STEP)]
        step: i64,
    },
    /// Move back to the origin
    Reset,
    /// Move to a random position
    Random,
    /// Change the color (white, blue, green, yellow, red)
    Color {
        /// New color
        color: Color,
    },
    /// Step back in history
    Undo,
    /// Step forward in history
    Redo,
    /// Print the piece
    Show,
    /// Print the history
    History,
    /// Leave
    #[command(alias = "exit")]
    Quit,
}

/// Run the play command.
pub async fn run<S: RemoteStateStore + 'static>(
    store: S,
    ctx: &CliContext,
    user: Option<&str>,
) -> Result<()> {
    let mut controller = start(store, ctx).await;
    let mut out = std::io::stdout();

    if let Some(user) = user {
        if controller.username() != Some(user) {
            if let Err(e) = controller.sign_in(user).await {
                writeln!(out, "error: {}", e)?;
            }
        }
    }
    print_notices(&mut controller, &mut out)?;

    writeln!(out, "twostep - type 'help' for commands")?;
    print_piece(&controller, &mut out)?;

    let stdin = BufReader::new(tokio::io::stdin());
    run_loop(&mut controller, stdin, &mut out).await?;

    finish(&mut controller, ctx).await
}

/// Read and execute commands until `quit` or end of input.
async fn run_loop<S, R, W>(controller: &mut SyncController<S>, input: R, out: &mut W) -> Result<()>
where
    S: RemoteStateStore + 'static,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }
        let command = match Line::try_parse_from(words) {
            Ok(line) => line.command,
            Err(e) => {
                write!(out, "{}", e.render())?;
                continue;
            }
        };
        if command == PlayCommand::Quit {
            break;
        }
        execute(controller, command, out).await?;
        print_notices(controller, out)?;
    }
    Ok(())
}

async fn execute<S, W>(
    controller: &mut SyncController<S>,
    command: PlayCommand,
    out: &mut W,
) -> Result<()>
where
    S: RemoteStateStore + 'static,
    W: Write,
{
    let result = match command {
        PlayCommand::Signin { username } => controller.sign_in(&username).await,
        PlayCommand::Signout => {
            controller.sign_out().await;
            Ok(controller.state())
        }
        PlayCommand::Move { dx, dy } => controller.move_by(dx, dy),
        PlayCommand::Up { step } => controller.move_by(0, step.saturating_neg()),
        PlayCommand::Down { step } => controller.move_by(0, step),
        PlayCommand::Left { step } => controller.move_by(step.saturating_neg(), 0),
        PlayCommand::Right { step } => controller.move_by(step, 0),
        PlayCommand::Reset => controller.reset(),
        PlayCommand::Random => controller.randomize(),
        PlayCommand::Color { color } => controller.set_color(color),
        PlayCommand::Undo => controller.undo(),
        PlayCommand::Redo => controller.redo(),
        PlayCommand::Show => Ok(controller.state()),
        PlayCommand::History => {
            print_history(controller, out)?;
            return Ok(());
        }
        PlayCommand::Quit => return Ok(()),
    };

    match result {
        Ok(_) => print_piece(controller, out)?,
        Err(ControllerError::AuthRequired) => {
            writeln!(out, "must sign in first (try: signin <name>)")?
        }
        Err(ControllerError::Rejected(e)) => writeln!(out, "ignored: {}", e)?,
        // Reported through the session notice.
        Err(ControllerError::SignInRejected { .. }) => {}
        Err(e) => writeln!(out, "error: {}", e)?,
    }
    Ok(())
}

fn print_piece<S, W>(controller: &SyncController<S>, out: &mut W) -> Result<()>
where
    S: RemoteStateStore + 'static,
    W: Write,
{
    let state: State = controller.state();
    let who = controller.username().unwrap_or("signed out");
    let undo = if controller.can_undo() { "undo" } else { "-" };
    let redo = if controller.can_redo() { "redo" } else { "-" };
    writeln!(out, "piece {}  [{}] [{}|{}]", state, who, undo, redo)?;
    Ok(())
}

fn print_history<S, W>(controller: &SyncController<S>, out: &mut W) -> Result<()>
where
    S: RemoteStateStore + 'static,
    W: Write,
{
    let history = controller.history();
    for (i, state) in history.entries().enumerate() {
        let marker = if i == history.cursor() { ">" } else { " " };
        writeln!(out, "{} [{}] {}", marker, i, state)?;
    }
    Ok(())
}

fn print_notices<S, W>(controller: &mut SyncController<S>, out: &mut W) -> Result<()>
where
    S: RemoteStateStore + 'static,
    W: Write,
{
    for notice in controller.take_notices() {
        match notice {
            AuthNotice::SignedIn { username } => writeln!(out, "signed in as {}", username)?,
            AuthNotice::SignInFailed { reason } => writeln!(out, "sign-in failed: {}", reason)?,
            AuthNotice::SignedOut => writeln!(out, "signed out")?,
            AuthNotice::SessionLost { reason } => {
                writeln!(out, "session lost ({}); sign in again", reason)?
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use twostep_client::MockStateStore;

    fn parse(line: &str) -> Result<PlayCommand, clap::Error> {
        Line::try_parse_from(line.split_whitespace()).map(|l| l.command)
    }

    async fn play(store: &MockStateStore, script: &str) -> (SyncController<MockStateStore>, String) {
        let mut controller = SyncController::new(store.clone());
        let mut out = Vec::new();
        run_loop(&mut controller, script.as_bytes(), &mut out)
            .await
            .unwrap();
        controller.flush().await;
        (controller, String::from_utf8(out).unwrap())
    }

    // ===========================================
    // Parsing Tests
    // ===========================================

    #[test]
    fn parses_negative_move() {
        assert_eq!(
            parse("move -5 20").unwrap(),
            PlayCommand::Move { dx: -5, dy: 20 }
        );
    }

    #[test]
    fn arrow_commands_default_step() {
        assert_eq!(parse("left").unwrap(), PlayCommand::Left { step: STEP });
        assert_eq!(parse("down 3").unwrap(), PlayCommand::Down { step: 3 });
    }

    #[test]
    fn parses_color_names() {
        assert_eq!(
            parse("color Yellow").unwrap(),
            PlayCommand::Color {
                color: Color::Yellow
            }
        );
        assert!(parse("color purple").is_err());
    }

    #[test]
    fn exit_is_quit() {
        assert_eq!(parse("exit").unwrap(), PlayCommand::Quit);
    }

    #[test]
    fn unknown_command_is_error() {
        assert!(parse("jump").is_err());
    }

    // ===========================================
    // Session Loop Tests
    // ===========================================

    #[tokio::test]
    async fn scripted_session_moves_and_undoes() {
        let store = MockStateStore::new();
        let (controller, out) = play(
            &store,
            "signin alice\nmove 10 0\nundo\nredo\nhistory\nquit\nmove 1 1\n",
        )
        .await;

        assert_eq!(controller.state(), State::new(110, 50, Color::White));
        assert_eq!(controller.history().cursor(), 1);
        assert!(out.contains("signed in as alice"));
        assert!(out.contains("> [1] (110, 50) white"));
        // Nothing after quit runs.
        assert_eq!(store.puts().len(), 3);
    }

    #[tokio::test]
    async fn anonymous_commands_prompt_for_sign_in() {
        let store = MockStateStore::new();
        let (controller, out) = play(&store, "right\nrandom\n").await;

        assert_eq!(controller.state(), State::default());
        assert_eq!(out.matches("must sign in first").count(), 2);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn rejected_move_is_reported() {
        let store = MockStateStore::new();
        let (controller, out) = play(&store, "signin bob\nleft 500\n").await;

        assert!(out.contains("ignored: move rejected"));
        assert_eq!(controller.history().len(), 1);
    }

    #[tokio::test]
    async fn extreme_steps_are_rejected() {
        let store = MockStateStore::new();
        let (controller, out) = play(
            &store,
            "signin erin\nup -- -9223372036854775808\nleft -- -9223372036854775808\nmove 1 9223372036854775807\n",
        )
        .await;

        assert_eq!(out.matches("coordinate out of range").count(), 3);
        assert_eq!(controller.state(), State::default());
        assert_eq!(controller.history().len(), 1);
        assert!(store.puts().is_empty());
    }

    #[tokio::test]
    async fn bad_input_keeps_going() {
        let store = MockStateStore::new();
        let (controller, out) = play(&store, "signin carol\nfly\ncolor red\n").await;

        assert!(out.contains("error"));
        assert_eq!(controller.state().color, Color::Red);
    }

    #[tokio::test]
    async fn sign_out_resets_piece() {
        let store = MockStateStore::new();
        let (controller, out) = play(&store, "signin dave\ndown 100\nsignout\n").await;

        assert!(out.contains("signed out"));
        assert!(!controller.is_signed_in());
        assert_eq!(controller.state(), State::default());
    }
}
