use std::str::FromStr;

use minefield_core::{Coord, Coord2};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  d <row> <col>   dig a cell
  f <row> <col>   toggle a flag
  <row> <col>     dig or flag, depending on the current mode
  m               switch between dig and flag mode
  r               restart with a new board
  h               show this help
  q               quit";

/// One line of player input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Dig(Coord2),
    Flag(Coord2),
    /// Bare coordinates, resolved by the current mode.
    Pick(Coord2),
    SwitchMode,
    Restart,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("not a coordinate: {0:?}")]
    InvalidNumber(String),
    #[error("unknown command {0:?}, type h for help")]
    Unknown(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();

        Ok(match words.as_slice() {
            [] => return Err(CommandError::Empty),
            ["d" | "dig", row, col] => Command::Dig(parse_coords(row, col)?),
            ["f" | "flag", row, col] => Command::Flag(parse_coords(row, col)?),
            ["m" | "mode"] => Command::SwitchMode,
            ["r" | "restart"] => Command::Restart,
            ["h" | "help" | "?"] => Command::Help,
            ["q" | "quit"] => Command::Quit,
            [row, col] if row.starts_with(|c: char| c.is_ascii_digit()) => {
                Command::Pick(parse_coords(row, col)?)
            }
            _ => return Err(CommandError::Unknown(line.trim().to_owned())),
        })
    }
}

fn parse_coords(row: &str, col: &str) -> Result<Coord2, CommandError> {
    Ok((parse_coord(row)?, parse_coord(col)?))
}

fn parse_coord(word: &str) -> Result<Coord, CommandError> {
    word.parse()
        .map_err(|_| CommandError::InvalidNumber(word.to_owned()))
}
