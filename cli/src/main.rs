use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use minefield_core::{CellCount, Coord, GameConfig, RandomSource};
use rand::prelude::*;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use command::{Command, CommandError, HELP};
use session::{Reply, Session};

mod command;
mod session;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// TOML file with `rows`, `cols` and `mines`
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    rows: Option<Coord>,

    #[arg(long)]
    cols: Option<Coord>,

    #[arg(long)]
    mines: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    TermLogger::init(
        args.verbose.log_level_filter(),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Error initializing logger")?;

    let config = load_config(&args)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {seed}, config: {config:?}");

    let mut session = Session::new(config, SmallRng::seed_from_u64(seed));
    run(&mut session, io::stdin().lock(), io::stdout().lock())
}

/// Config file first, then command line overrides on top.
fn load_config(args: &Args) -> anyhow::Result<GameConfig> {
    let base = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Could not read {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => GameConfig::CLASSIC,
    };

    let size = (
        args.rows.unwrap_or(base.rows()),
        args.cols.unwrap_or(base.cols()),
    );
    let config = GameConfig::new(size, args.mines.unwrap_or(base.mines()))
        .with_context(|| format!("Unplayable board {size:?}"))?;
    Ok(config)
}

fn run<R: RandomSource>(
    session: &mut Session<R>,
    input: impl BufRead,
    mut out: impl Write,
) -> anyhow::Result<()> {
    session.render(&mut out)?;
    writeln!(out, "{HELP}")?;
    out.flush()?;

    for line in input.lines() {
        let command = match line?.parse::<Command>() {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };

        match session.apply(command) {
            Ok(Reply::Updated) => session.render(&mut out)?,
            Ok(Reply::Won) => {
                session.render(&mut out)?;
                writeln!(out, "All safe cells cleared, you win! (r to restart, q to quit)")?;
            }
            Ok(Reply::Lost) => {
                session.render(&mut out)?;
                writeln!(out, "Boom, that was a mine. (r to restart, q to quit)")?;
            }
            Ok(Reply::Ignored(reason)) => writeln!(out, "{reason}")?,
            Ok(Reply::Help) => writeln!(out, "{HELP}")?,
            Ok(Reply::Quit) => break,
            Err(err) => writeln!(out, "{err}")?,
        }
        out.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use minefield_core::{Board, MineLayout};

    use super::*;

    fn play(script: &str) -> String {
        let layout = MineLayout::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        let mut session = Session::with_board(
            layout.game_config(),
            SmallRng::seed_from_u64(0),
            Board::with_layout(layout),
        );
        let mut out = Vec::new();
        run(&mut session, script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn losing_round_reports_the_mine() {
        let text = play("d 0 0\nd 1 1\nq\n");

        assert!(text.contains("Boom"));
        assert!(text.contains("round is over"));
    }

    #[test]
    fn bad_input_keeps_playing() {
        let text = play("\njump\nd 7 7\nd 0 1\nd 1 0\nd 1 1\n");

        assert!(text.contains("unknown command \"jump\""));
        assert!(text.contains("Invalid coordinates"));
        assert!(text.contains("you win"));
    }

    #[test]
    fn config_overrides_apply_on_top_of_defaults() {
        let args = Args::parse_from(["minefield", "--rows", "4", "--mines", "5"]);
        let config = load_config(&args).unwrap();

        assert_eq!(config, GameConfig::new((4, 10), 5).unwrap());

        let args = Args::parse_from(["minefield", "--rows", "2", "--cols", "2"]);
        assert!(load_config(&args).is_err());
    }
}
