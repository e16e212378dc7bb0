//! Line-based control panel.
//!
//! Reads one command per line (normally from stdin) on its own thread and
//! forwards creation requests to the scene through its channel. The scene
//! drains the channel once per frame, so the panel never touches scene state.
//!
//! ```text
//! cube | sphere | cone | cylinder | halfsphere | pyramid | light
//! mesh <path> [--swap-yz]
//! help
//! ```

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use crate::error::{EditorError, Result};
use crate::gfx::scene::{ObjectKind, ObjectRequest};

const SWAP_YZ_FLAG: &str = "--swap-yz";

const HELP: &str = "\
commands:
  cube | sphere | cone | cylinder | halfsphere | pyramid | light
  mesh <path> [--swap-yz]
  help";

#[derive(Debug, Clone, PartialEq)]
pub enum PanelCommand {
    Create(ObjectRequest),
    Help,
}

/// Parses one panel line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<PanelCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let word = word.to_ascii_lowercase();

    let command = match word.as_str() {
        "help" | "?" => PanelCommand::Help,
        "light" => PanelCommand::Create(ObjectRequest::Primitive(ObjectKind::Light)),
        "mesh" => {
            let (path, swap_yz) = match rest.strip_suffix(SWAP_YZ_FLAG) {
                Some(path) => (path.trim(), true),
                None => (rest, false),
            };
            if path.is_empty() {
                return Err(EditorError::MissingSource(ObjectKind::Mesh));
            }
            PanelCommand::Create(ObjectRequest::Mesh {
                path: PathBuf::from(path),
                swap_yz,
            })
        }
        tag => match ObjectKind::from_tag(tag) {
            Some(kind) if kind != ObjectKind::Mesh => {
                PanelCommand::Create(ObjectRequest::Primitive(kind))
            }
            _ => return Err(EditorError::UnknownCommand(line.to_string())),
        },
    };
    Ok(Some(command))
}

/// Forwards commands from `reader` until it ends or the scene hangs up.
/// Returns the number of requests sent.
pub fn run<R: BufRead>(reader: R, sender: Sender<ObjectRequest>) -> usize {
    let mut sent = 0;
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("Control panel input failed: {e}");
                break;
            }
        };

        match parse_command(&line) {
            Ok(Some(PanelCommand::Create(request))) => {
                log::debug!("Panel request: {request:?}");
                if sender.send(request).is_err() {
                    log::info!("Scene closed, stopping control panel");
                    break;
                }
                sent += 1;
            }
            Ok(Some(PanelCommand::Help)) => println!("{HELP}"),
            Ok(None) => {}
            Err(e) => log::warn!("{e}, type `help` for the command list"),
        }
    }
    sent
}

/// Runs the panel on stdin in a background thread.
pub fn spawn(sender: Sender<ObjectRequest>) -> std::io::Result<JoinHandle<usize>> {
    std::thread::Builder::new()
        .name("control-panel".into())
        .spawn(move || {
            log::info!("Control panel ready, type `help` for commands");
            run(std::io::stdin().lock(), sender)
        })
}
