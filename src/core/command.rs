//! Typed terminal lines -> user intents

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `create [secret]`; no secret means "pick one for me".
    Create(Option<String>),
    Join { game_id: String, secret: String },
    Guess(String),
    /// Start over with a fresh session.
    New,
    Reconnect,
    Help,
    Quit,
}

pub const REALTIME_HELP: &str =
    "Commands: create [secret] | join <game-id> <secret> | guess <digits> | new | reconnect | quit";
pub const PRACTICE_HELP: &str = "Commands: new | guess <digits> | quit";

/// Parses one line. Bare digits are a guess. `Err` carries a message for
/// the message region.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err("Type a command, or 'help'.".into());
    };
    let rest: Vec<&str> = words.collect();

    match (head.to_ascii_lowercase().as_str(), rest.as_slice()) {
        ("create", []) => Ok(Command::Create(None)),
        ("create", [secret]) => Ok(Command::Create(Some(secret.to_string()))),
        ("join", [game_id, secret]) => Ok(Command::Join {
            game_id: game_id.to_string(),
            secret: secret.to_string(),
        }),
        ("join", [_]) => Err("Usage: join <game-id> <secret>".into()),
        ("join", []) => Err("Please enter a game ID to join.".into()),
        ("guess" | "g", [guess]) => Ok(Command::Guess(guess.to_string())),
        ("new" | "start", []) => Ok(Command::New),
        ("reconnect", []) => Ok(Command::Reconnect),
        ("help" | "?", _) => Ok(Command::Help),
        ("quit" | "exit" | "q", []) => Ok(Command::Quit),
        (word, []) if word.chars().all(|c| c.is_ascii_digit()) => Ok(Command::Guess(word.to_string())),
        _ => Err(format!("Unknown command '{}'. Type 'help'.", line.trim())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_setup_commands() {
        assert_eq!(parse_command("create"), Ok(Command::Create(None)));
        assert_eq!(parse_command("create 123"), Ok(Command::Create(Some("123".into()))));
        assert_eq!(
            parse_command("  JOIN G1 123 "),
            Ok(Command::Join { game_id: "G1".into(), secret: "123".into() })
        );
    }

    #[test]
    fn bare_digits_are_a_guess() {
        assert_eq!(parse_command("456"), Ok(Command::Guess("456".into())));
        // shape is checked later by the dispatcher
        assert_eq!(parse_command("4567"), Ok(Command::Guess("4567".into())));
        assert_eq!(parse_command("guess 12a"), Ok(Command::Guess("12a".into())));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_command("").is_err());
        assert!(parse_command("dance").is_err());
        assert!(parse_command("join G1").is_err());
        assert!(parse_command("create 1 2").is_err());
    }

    #[test]
    fn session_commands() {
        assert_eq!(parse_command("new"), Ok(Command::New));
        assert_eq!(parse_command("start"), Ok(Command::New));
        assert_eq!(parse_command("reconnect"), Ok(Command::Reconnect));
        assert_eq!(parse_command("q"), Ok(Command::Quit));
        assert_eq!(parse_command("help me"), Ok(Command::Help));
    }
}
