use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Exit,
    Clear,
    New,
    Message(String),
}

impl FromStr for Command {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.to_lowercase().as_str() {
            "exit" => Command::Exit,
            "clear" => Command::Clear,
            "new" => Command::New,
            _ => Command::Message(s.to_string()),
        })
    }
}

pub const COMMAND_BOX: &str = "\
┌──────────────────────────────────────┐\n\
│          Available Commands          │\n\
├──────────────────────────────────────┤\n\
│    `exit`  - Quit the application    │\n\
├──────────────────────────────────────┤\n\
│    `clear` - Repaint the screen      │\n\
├──────────────────────────────────────┤\n\
│    `new`   - Reset the conversation  │\n\
└──────────────────────────────────────┘";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_parse_case_insensitively() {
        assert_eq!("exit".parse(), Ok(Command::Exit));
        assert_eq!("  CLEAR ".parse(), Ok(Command::Clear));
        assert_eq!("New".parse(), Ok(Command::New));
    }

    #[test]
    fn anything_else_is_a_message() {
        assert_eq!(
            "hello there".parse(),
            Ok(Command::Message("hello there".to_string()))
        );
    }
}
