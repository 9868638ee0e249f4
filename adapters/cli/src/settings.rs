//! Match file loading and command-line overrides.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use bomber_core::GameConfig;
use serde::Deserialize;

use crate::Cli;

const DEFAULT_TICKS: u64 = 300;
const DEFAULT_ROUNDS: u64 = 1;

/// Contents of a TOML match file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct MatchFile {
    pub(crate) game: GameConfig,
    pub(crate) run: RunSettings,
}

/// How long the driver plays and how many seats it fills.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub(crate) struct RunSettings {
    pub(crate) ticks: u64,
    pub(crate) rounds: u64,
    pub(crate) players: Option<usize>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            ticks: DEFAULT_TICKS,
            rounds: DEFAULT_ROUNDS,
            players: None,
        }
    }
}

impl MatchFile {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read match file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse match file at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let file: Self = toml::from_str(contents).context("invalid match toml")?;
        file.game.validate().context("invalid game table")?;
        Ok(file)
    }

    pub(crate) fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(seed) = cli.seed {
            self.game.seed = seed;
        }
        if let Some(ticks) = cli.ticks {
            self.run.ticks = ticks;
        }
        if let Some(rounds) = cli.rounds {
            self.run.rounds = rounds;
        }
        if cli.players.is_some() {
            self.run.players = cli.players;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomber_core::{Point, WallLayout};

    #[test]
    fn empty_file_uses_defaults() {
        let file = MatchFile::parse("").expect("empty file is valid");

        assert_eq!(file.game, GameConfig::default());
        assert_eq!(file.run.ticks, DEFAULT_TICKS);
        assert_eq!(file.run.players, None);
    }

    #[test]
    fn tables_override_individual_fields() {
        let file = MatchFile::parse(
            r#"
            [game]
            width = 7
            height = 5
            walls = "border"
            player_spawns = [{ x = 1, y = 1 }, { x = 5, y = 3 }]
            seed = 9

            [game.bomb]
            countdown = 3

            [game.hostiles]
            count = 1

            [run]
            ticks = 40
            players = 1
            "#,
        )
        .expect("valid match file");

        assert_eq!(file.game.walls, WallLayout::Border);
        assert_eq!(file.game.player_spawns[1], Point::new(5, 3));
        assert_eq!(file.game.bomb.countdown, 3);
        assert_eq!(file.game.bomb.power, 1);
        assert_eq!(file.game.hostiles.count, 1);
        assert_eq!(file.run.ticks, 40);
        assert_eq!(file.run.rounds, DEFAULT_ROUNDS);
        assert_eq!(file.run.players, Some(1));
    }

    #[test]
    fn custom_walls_use_a_nested_table() {
        let file = MatchFile::parse(
            r#"
            [game]
            width = 3
            height = 3
            player_spawns = [{ x = 0, y = 0 }]

            [game.walls.custom]
            cells = [{ x = 1, y = 1 }]

            [game.hostiles]
            count = 0
            "#,
        )
        .expect("valid match file");

        assert_eq!(
            file.game.walls,
            WallLayout::Custom {
                cells: vec![Point::new(1, 1)]
            }
        );
    }

    #[test]
    fn invalid_games_are_rejected() {
        let result = MatchFile::parse(
            r#"
            [game]
            width = 3
            height = 3
            player_spawns = [{ x = 5, y = 0 }]
            "#,
        );

        assert!(result.is_err());
    }
}
