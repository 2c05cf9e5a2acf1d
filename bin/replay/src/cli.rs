//! CLI argument parsing using clap derive

use clap::Parser;
use std::path::PathBuf;

/// Replay a captured conversation against the model under test.
///
/// Exits 0 only when the replay completes; a malformed conversation file or
/// an aborted replay exits non-zero.
#[derive(Parser, Debug)]
#[command(name = "parley-replay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the conversation file (native turn list or findings capture)
    pub conversation: PathBuf,

    /// Print the parsed turns and exit without contacting the chat client
    #[arg(long)]
    pub show: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_conversation_path() {
        let cli = Cli::parse_from(["parley-replay", "capture.json"]);
        assert_eq!(cli.conversation, PathBuf::from("capture.json"));
        assert!(!cli.show);
        assert!(!cli.verbose);
    }

    #[test]
    fn parses_show_flag() {
        let cli = Cli::parse_from(["parley-replay", "--show", "capture.json"]);
        assert!(cli.show);
    }

    #[test]
    fn missing_path_is_an_error() {
        assert!(Cli::try_parse_from(["parley-replay"]).is_err());
    }
}
