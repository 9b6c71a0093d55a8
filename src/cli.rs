use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bullterm")]
#[command(about = "Bulls & Cows in the terminal: play a friend or practice alone")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Mode>,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Realtime game server (e.g. "ws://127.0.0.1:5000/ws" or "127.0.0.1:5000")
    #[arg(long, env = "BULLTERM_SERVER", default_value = "ws://127.0.0.1:5000/ws", global = true)]
    pub server: String,

    /// Base URL of the practice HTTP API
    #[arg(long, env = "BULLTERM_API", default_value = "http://127.0.0.1:5000/api", global = true)]
    pub api: String,

    /// Where log output goes (the terminal belongs to the UI)
    #[arg(long, env = "BULLTERM_LOG", default_value = "bullterm.log", global = true)]
    pub log_file: String,

    #[arg(long, env = "BULLTERM_LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// HTTP request timeout
    #[arg(long, default_value_t = 10, global = true)]
    pub timeout_secs: u64,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Two-player match over the realtime server (default)
    Play,
    /// Single-player practice against the HTTP API
    Practice,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        self.command.unwrap_or(Mode::Play)
    }
}
