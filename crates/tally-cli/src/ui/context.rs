//! What the current terminal can display.

use std::io::IsTerminal;

use super::mode::OutputMode;

const DEFAULT_WIDTH: usize = 80;

/// Display capabilities resolved once per command.
#[derive(Debug, Clone)]
pub struct UiContext {
    pub color: bool,
    pub unicode: bool,
    /// Columns available for tables
    pub width: usize,
    pub mode: OutputMode,
    /// Both stdin and stdout are terminals, so prompts can be answered
    pub interactive: bool,
}

impl UiContext {
    /// Detect the terminal and combine it with `--json`, `--format`,
    /// `--no-color` and `--ascii`.
    pub fn from_env(
        json_flag: bool,
        format_flag: Option<&str>,
        no_color_flag: bool,
        ascii_flag: bool,
    ) -> Self {
        let stdout_tty = std::io::stdout().is_terminal();
        let dumb = std::env::var("TERM").is_ok_and(|term| term == "dumb");
        let no_color = no_color_flag || std::env::var_os("NO_COLOR").is_some();

        Self {
            color: stdout_tty && !dumb && !no_color,
            unicode: !ascii_flag,
            width: columns_env().or_else(tty_columns).unwrap_or(DEFAULT_WIDTH),
            mode: OutputMode::resolve(json_flag, format_flag, stdout_tty, dumb),
            interactive: stdout_tty && std::io::stdin().is_terminal(),
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }
}

fn columns_env() -> Option<usize> {
    std::env::var("COLUMNS")
        .ok()?
        .parse::<usize>()
        .ok()
        .filter(|width| *width > 0)
}

#[cfg(unix)]
fn tty_columns() -> Option<usize> {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    // SAFETY: TIOCGWINSZ writes only into `size`
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut size) };
    (rc == 0 && size.ws_col > 0).then_some(usize::from(size.ws_col))
}

#[cfg(not(unix))]
fn tty_columns() -> Option<usize> {
    None
}
