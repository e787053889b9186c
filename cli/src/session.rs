use std::collections::BTreeSet;
use std::io::{self, Write};

use minefield_core::*;

use crate::command::Command;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Dig,
    Flag,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Won,
    Lost,
}

/// What the front-end should show after a command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Updated,
    Ignored(&'static str),
    Won,
    Lost,
    Help,
    Quit,
}

/// A round of play: the core board plus the display-only flag overlay.
#[derive(Debug)]
pub struct Session<R> {
    config: GameConfig,
    rng: R,
    board: Board,
    flags: BTreeSet<Coord2>,
    mode: Mode,
    phase: Phase,
}

impl<R: RandomSource> Session<R> {
    pub fn new(config: GameConfig, mut rng: R) -> Self {
        let board = Board::new(config, &mut rng);
        Self::with_board(config, rng, board)
    }

    pub fn with_board(config: GameConfig, rng: R, board: Board) -> Self {
        Self {
            config,
            rng,
            board,
            flags: BTreeSet::new(),
            mode: Mode::Dig,
            phase: Phase::Playing,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_flagged(&self, coords: Coord2) -> bool {
        self.flags.contains(&coords)
    }

    pub fn apply(&mut self, command: Command) -> Result<Reply> {
        Ok(match command {
            Command::Dig(coords) => self.dig(coords)?,
            Command::Flag(coords) => self.toggle_flag(coords)?,
            Command::Pick(coords) => match self.mode {
                Mode::Dig => self.dig(coords)?,
                Mode::Flag => self.toggle_flag(coords)?,
            },
            Command::SwitchMode => self.switch_mode(),
            Command::Restart => self.restart(),
            Command::Help => Reply::Help,
            Command::Quit => Reply::Quit,
        })
    }

    fn dig(&mut self, coords: Coord2) -> Result<Reply> {
        let coords = self.board.validate_coords(coords)?;
        if self.phase != Phase::Playing {
            return Ok(Reply::Ignored("round is over, r to restart or q to quit"));
        }
        if self.is_flagged(coords) {
            return Ok(Reply::Ignored("cell is flagged, remove the flag first"));
        }

        let dig = self.board.dig(coords);
        for pos in &dig.revealed {
            self.flags.remove(pos);
        }

        Ok(if dig.is_loss() {
            log::info!("mine hit at {coords:?}");
            self.phase = Phase::Lost;
            Reply::Lost
        } else if self.board.is_end_game() {
            log::info!("board cleared");
            self.phase = Phase::Won;
            Reply::Won
        } else {
            Reply::Updated
        })
    }

    fn toggle_flag(&mut self, coords: Coord2) -> Result<Reply> {
        let coords = self.board.validate_coords(coords)?;
        if self.phase != Phase::Playing {
            return Ok(Reply::Ignored("round is over, r to restart or q to quit"));
        }
        if self.board.is_revealed(coords) {
            return Ok(Reply::Ignored("cell is already revealed"));
        }

        if !self.flags.remove(&coords) {
            self.flags.insert(coords);
        }
        Ok(Reply::Updated)
    }

    fn switch_mode(&mut self) -> Reply {
        if self.phase != Phase::Playing {
            return Reply::Ignored("round is over, r to restart or q to quit");
        }
        self.mode = match self.mode {
            Mode::Dig => Mode::Flag,
            Mode::Flag => Mode::Dig,
        };
        Reply::Updated
    }

    fn restart(&mut self) -> Reply {
        self.board = Board::new(self.config, &mut self.rng);
        self.flags.clear();
        self.mode = Mode::Dig;
        self.phase = Phase::Playing;
        Reply::Updated
    }

    /// Draws the board, hiding mines until the round is over.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        let (rows, cols) = self.board.size();
        let width = cols.saturating_sub(1).max(rows.saturating_sub(1)).to_string().len() + 1;

        write!(out, "{:width$}", "")?;
        for col in 0..cols {
            write!(out, "{col:>width$}")?;
        }
        writeln!(out)?;

        for row in 0..rows {
            write!(out, "{row:>width$}")?;
            for col in 0..cols {
                let coords = (row, col);
                let glyph = match self.board.view(coords) {
                    CellView::Revealed(value) => value.to_string(),
                    CellView::Hidden if self.is_flagged(coords) => "#".to_owned(),
                    CellView::Hidden
                        if self.phase != Phase::Playing && self.board.cell(coords).is_mine() =>
                    {
                        CellValue::Mine.to_string()
                    }
                    CellView::Hidden => ".".to_owned(),
                };
                write!(out, "{glyph:>width$}")?;
            }
            writeln!(out)?;
        }

        let mode = match self.mode {
            Mode::Dig => "dig",
            Mode::Flag => "flag",
        };
        writeln!(
            out,
            "mode: {mode} | mines: {} | flags: {}",
            self.board.mine_count(),
            self.flags.len()
        )
    }
}
