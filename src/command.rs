use crate::model::Range;
use std::error;
use std::fmt;
use std::str::FromStr;

pub const HELP: &str = "\
Commands:
  search <term>   filter coins by name or symbol (also: / <term>)
  clear           clear the search box
  pick <n>        open the n-th suggestion, or the n-th card when not searching
  range <r>       chart range: 90d 60d 30d 7d 24h 1h
  table           show or hide the historical table
  back            return to the coin cards
  reload          discard everything and load again
  help            show this help
  quit            exit";

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Search(String),
    ClearSearch,
    Pick(usize),
    Range(Range),
    ToggleTable,
    Back,
    Reload,
    Help,
    Quit,
}

#[derive(Debug, PartialEq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    MissingArgument(&'static str),
    InvalidPosition(String),
    InvalidRange(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CommandError::Empty => write!(f, "Type a command, or 'help' to list them"),
            CommandError::Unknown(ref cmd) => write!(f, "Unknown command '{}', try 'help'", cmd),
            CommandError::MissingArgument(cmd) => write!(f, "'{}' needs an argument", cmd),
            CommandError::InvalidPosition(ref arg) => write!(f, "'{}' is not a card number", arg),
            CommandError::InvalidRange(ref err) => write!(f, "{}", err),
        }
    }
}

impl error::Error for CommandError {}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();
        if line.trim().is_empty() {
            return Err(CommandError::Empty);
        }
        if let Some(term) = line.strip_prefix('/') {
            return Ok(Command::Search(term.trim_start().to_string()));
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            // trailing spaces are kept, only matching decides what blank means
            "search" | "s" => Ok(Command::Search(rest.trim_start().to_string())),
            "clear" => Ok(Command::ClearSearch),
            "pick" | "p" => {
                let arg = rest.trim();
                if arg.is_empty() {
                    return Err(CommandError::MissingArgument("pick"));
                }
                arg.parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .map(Command::Pick)
                    .ok_or_else(|| CommandError::InvalidPosition(arg.to_string()))
            }
            "range" | "r" => {
                let arg = rest.trim();
                if arg.is_empty() {
                    return Err(CommandError::MissingArgument("range"));
                }
                arg.parse::<Range>()
                    .map(Command::Range)
                    .map_err(CommandError::InvalidRange)
            }
            "table" | "t" => Ok(Command::ToggleTable),
            "back" | "b" => Ok(Command::Back),
            "reload" => Ok(Command::Reload),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        assert_eq!(Ok(Command::Search("eth".to_string())), "search eth".parse());
        assert_eq!(Ok(Command::Search("eth".to_string())), "/eth".parse());
        assert_eq!(Ok(Command::Search("usd coin".to_string())), "/ usd coin".parse());
        assert_eq!(Ok(Command::Search(String::new())), "search".parse());
        assert_eq!(Ok(Command::Search("eth".to_string())), "search  eth".parse());
        assert_eq!(Ok(Command::Search("eth ".to_string())), "s \t eth ".parse());
    }

    #[test]
    fn test_search_with_extra_spaces_still_matches() {
        use crate::model::coin::coin;
        use crate::shell::suggestions;

        let term = match "search   eth".parse::<Command>() {
            Ok(Command::Search(term)) => term,
            other => panic!("unexpected {:?}", other),
        };
        let found = suggestions(&term, &[coin(1, "Bitcoin", "BTC"), coin(2, "Ethereum", "ETH")]);
        assert_eq!(1, found.len());
        assert_eq!("Ethereum", found[0].name);
    }

    #[test]
    fn test_parse_pick() {
        assert_eq!(Ok(Command::Pick(3)), "pick 3".parse());
        assert_eq!(Ok(Command::Pick(1)), "P 1".parse());
        assert_eq!(Err(CommandError::InvalidPosition("0".to_string())), "pick 0".parse::<Command>());
        assert_eq!(Err(CommandError::InvalidPosition("x".to_string())), "pick x".parse::<Command>());
        assert_eq!(Err(CommandError::MissingArgument("pick")), "pick".parse::<Command>());
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(Ok(Command::Range(Range::Hours24)), "range 24h".parse());
        assert!(matches!("range 2w".parse::<Command>(), Err(CommandError::InvalidRange(_))));
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Ok(Command::ToggleTable), "table".parse());
        assert_eq!(Ok(Command::Back), "back".parse());
        assert_eq!(Ok(Command::Reload), "reload".parse());
        assert_eq!(Ok(Command::Quit), "  quit  ".parse());
        assert_eq!(Ok(Command::ClearSearch), "clear".parse());
        assert_eq!(Ok(Command::Help), "?".parse());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Err(CommandError::Empty), "   ".parse::<Command>());
        assert_eq!(Err(CommandError::Unknown("buy".to_string())), "buy 1".parse::<Command>());
        assert_eq!(
            "Unknown command 'buy', try 'help'",
            CommandError::Unknown("buy".to_string()).to_string()
        );
    }
}
