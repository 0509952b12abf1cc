//! Outbound command formatting (GUI to engine direction)

use std::fmt;

/// Search limits for a `go` command.
///
/// At least one of the two should be set per search request; that rule
/// belongs to the session issuing the command, not to the formatter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoParams {
    /// Search depth in plies.
    pub depth: Option<u32>,
    /// Wall-clock limit, passed through to the engine unmodified.
    pub movetime_ms: Option<u64>,
}

impl fmt::Display for GoParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec!["go".to_string()];
        if let Some(depth) = self.depth {
            parts.push(format!("depth {depth}"));
        }
        if let Some(ms) = self.movetime_ms {
            parts.push(format!("movetime {ms}"));
        }
        write!(f, "{}", parts.join(" "))
    }
}

/// Commands this client sends to the engine process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuiCommand {
    /// Protocol handshake
    Uci,
    /// Readiness probe, answered by an exact `readyok` line
    IsReady,
    /// `setoption name <name> value <value>`
    SetOption { name: String, value: String },
    /// `position fen <fen>`
    Position { fen: String },
    /// Start searching with the given limits
    Go(GoParams),
    /// Ask the engine to cut the current search short
    Stop,
    /// Shut the engine down
    Quit,
}

impl fmt::Display for GuiCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuiCommand::Uci => write!(f, "uci"),
            GuiCommand::IsReady => write!(f, "isready"),
            GuiCommand::SetOption { name, value } => {
                write!(f, "setoption name {name} value {value}")
            }
            GuiCommand::Position { fen } => write!(f, "position fen {fen}"),
            GuiCommand::Go(params) => write!(f, "{params}"),
            GuiCommand::Stop => write!(f, "stop"),
            GuiCommand::Quit => write!(f, "quit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_handshake_commands() {
        assert_eq!(GuiCommand::Uci.to_string(), "uci");
        assert_eq!(GuiCommand::IsReady.to_string(), "isready");
        assert_eq!(GuiCommand::Stop.to_string(), "stop");
        assert_eq!(GuiCommand::Quit.to_string(), "quit");
    }

    #[test]
    fn test_format_setoption() {
        let cmd = GuiCommand::SetOption {
            name: "MultiPV".to_string(),
            value: "5".to_string(),
        };
        assert_eq!(cmd.to_string(), "setoption name MultiPV value 5");
    }

    #[test]
    fn test_format_position() {
        let cmd = GuiCommand::Position {
            fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".to_string(),
        };
        assert_eq!(
            cmd.to_string(),
            "position fen rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
    }

    #[test]
    fn test_format_go_depth_only() {
        let cmd = GuiCommand::Go(GoParams {
            depth: Some(10),
            movetime_ms: None,
        });
        assert_eq!(cmd.to_string(), "go depth 10");
    }

    #[test]
    fn test_format_go_movetime_only() {
        let cmd = GuiCommand::Go(GoParams {
            depth: None,
            movetime_ms: Some(1500),
        });
        assert_eq!(cmd.to_string(), "go movetime 1500");
    }

    #[test]
    fn test_format_go_with_both_limits() {
        let cmd = GuiCommand::Go(GoParams {
            depth: Some(24),
            movetime_ms: Some(3000),
        });
        assert_eq!(cmd.to_string(), "go depth 24 movetime 3000");
    }
}
