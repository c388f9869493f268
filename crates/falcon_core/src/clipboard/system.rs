use crate::clipboard::Clipboard;
use crate::error::AppError;
use std::io::Write;
use std::process::{Command, Stdio};

type Tool = (&'static str, &'static [&'static str]);

const MACOS_TOOLS: &[Tool] = &[("pbcopy", &[])];
const WINDOWS_TOOLS: &[Tool] = &[("clip", &[])];
const UNIX_TOOLS: &[Tool] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

/// Pipes text into the first platform clipboard tool that accepts it.
pub struct SystemClipboard {
    tools: &'static [Tool],
}

impl SystemClipboard {
    pub fn for_platform() -> Self {
        let tools = if cfg!(target_os = "macos") {
            MACOS_TOOLS
        } else if cfg!(windows) {
            WINDOWS_TOOLS
        } else {
            UNIX_TOOLS
        };
        Self { tools }
    }

    fn pipe_into(program: &str, args: &[&str], text: &str) -> Result<(), AppError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| AppError::clipboard(format!("{program}: {err}")))?;

        // stdin is dropped before waiting so the tool sees end of input.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };

        let status = child
            .wait()
            .map_err(|err| AppError::clipboard(format!("{program}: {err}")))?;
        written.map_err(|err| AppError::clipboard(format!("{program}: {err}")))?;
        if status.success() {
            Ok(())
        } else {
            Err(AppError::clipboard(format!("{program} exited with {status}")))
        }
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<(), AppError> {
        let mut last_error = AppError::clipboard("no clipboard tool available");
        for (program, args) in self.tools {
            match Self::pipe_into(program, args, text) {
                Ok(()) => {
                    log::debug!("copied {} bytes via {program}", text.len());
                    return Ok(());
                }
                Err(err) => last_error = err,
            }
        }
        Err(last_error)
    }
}
