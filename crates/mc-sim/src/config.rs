//! Simulation configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use mc_core::{FaceLabel, McError, McResult};

use crate::die::{SharedDie, WeightedDie};
use crate::game::{PlayRecorder, ResultForm};

/// Weight applied to one face after the die is built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightOverride {
    pub face: FaceLabel,
    pub weight: f64,
}

/// Description of one die
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DieSpec {
    /// Face labels in order
    pub faces: Vec<FaceLabel>,

    /// Non-default weights
    #[serde(default)]
    pub weights: Vec<WeightOverride>,
}

impl DieSpec {
    /// Die with numeric faces `1..=sides`
    pub fn standard(sides: u32) -> Self {
        Self {
            faces: (1..=sides).map(FaceLabel::from).collect(),
            weights: Vec::new(),
        }
    }

    /// Builder: add a weight override
    pub fn with_weight(mut self, face: impl Into<FaceLabel>, weight: f64) -> Self {
        self.weights.push(WeightOverride {
            face: face.into(),
            weight,
        });
        self
    }

    /// Build the die, applying overrides in order
    pub fn build(&self) -> McResult<WeightedDie> {
        let mut die = WeightedDie::new(self.faces.iter())?;
        for w in &self.weights {
            die.set_weight(&w.face, w.weight)?;
        }
        Ok(die)
    }
}

/// Configuration for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Rolls per play
    pub rolls: usize,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Form used when presenting the play table
    pub form: ResultForm,

    /// Dice in column order
    pub dice: Vec<DieSpec>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl SimConfig {
    /// Three six-sided dice, the last one loaded 10x on faces 3 and 4, 8 rolls
    pub fn classic() -> Self {
        Self {
            rolls: 8,
            seed: None,
            form: ResultForm::Wide,
            dice: vec![
                DieSpec::standard(6),
                DieSpec::standard(6),
                DieSpec::standard(6).with_weight(3, 10.0).with_weight(4, 10.0),
            ],
        }
    }

    /// `dice` fair dice with `sides` faces each
    pub fn uniform(dice: usize, sides: u32) -> Self {
        Self {
            dice: vec![DieSpec::standard(sides); dice],
            ..Self::classic()
        }
    }

    /// Builder: set rolls per play
    pub fn with_rolls(mut self, rolls: usize) -> Self {
        self.rolls = rolls;
        self
    }

    /// Builder: set seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder: set result form
    pub fn with_form(mut self, form: ResultForm) -> Self {
        self.form = form;
        self
    }

    /// Builder: replace the dice
    pub fn with_dice(mut self, dice: Vec<DieSpec>) -> Self {
        self.dice = dice;
        self
    }

    pub fn from_json_str(json: &str) -> McResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> McResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::debug!("Loaded config from {}", path.display());
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> McResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build every die as a shared handle
    pub fn build_dice(&self) -> McResult<Vec<SharedDie>> {
        if self.dice.is_empty() {
            return Err(McError::Config("no dice configured".into()));
        }
        self.dice
            .iter()
            .map(|spec| spec.build().map(SharedDie::new))
            .collect()
    }

    /// Build a game from the configured dice, seeded if a seed is set
    pub fn build_recorder(&self) -> McResult<PlayRecorder> {
        let recorder = PlayRecorder::new(self.build_dice()?)?;
        Ok(match self.seed {
            Some(seed) => recorder.with_seed(seed),
            None => recorder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_core::ErrorKind;

    #[test]
    fn test_classic_config() {
        let config = SimConfig::classic();
        assert_eq!(config.rolls, 8);
        assert_eq!(config.dice.len(), 3);

        let dice = config.build_dice().unwrap();
        let loaded = dice[2].current_state();
        assert_eq!(loaded.weight(&FaceLabel::from(3)), Some(10.0));
        assert_eq!(loaded.weight(&FaceLabel::from(1)), Some(1.0));
    }

    #[test]
    fn test_builder() {
        let config = SimConfig::uniform(4, 20)
            .with_rolls(100)
            .with_seed(42)
            .with_form(ResultForm::Narrow);

        assert_eq!(config.dice.len(), 4);
        assert_eq!(config.dice[0].faces.len(), 20);
        assert_eq!(config.rolls, 100);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.form, ResultForm::Narrow);
    }

    #[test]
    fn test_json_defaults() {
        let config = SimConfig::from_json_str(r#"{ "rolls": 3 }"#).unwrap();
        assert_eq!(config.rolls, 3);
        assert_eq!(config.dice.len(), 3);
        assert_eq!(config.form, ResultForm::Wide);
    }

    #[test]
    fn test_json_dice() {
        let json = r#"{
            "rolls": 5,
            "seed": 7,
            "form": "narrow",
            "dice": [
                { "faces": ["j", "o", "s"], "weights": [{ "face": "o", "weight": 3 }] },
                { "faces": ["s", "o", "j"] }
            ]
        }"#;
        let config = SimConfig::from_json_str(json).unwrap();
        let mut game = config.build_recorder().unwrap();
        game.play(config.rolls).unwrap();
        assert_eq!(game.play_table().num_rolls(), 5);
        assert_eq!(
            game.dice()[0].current_state().weight(&FaceLabel::from("o")),
            Some(3.0)
        );
    }

    #[test]
    fn test_bad_override_fails() {
        let config =
            SimConfig::classic().with_dice(vec![DieSpec::standard(6).with_weight(9, 1.0)]);
        assert_eq!(config.build_dice().unwrap_err().kind(), ErrorKind::Lookup);
    }

    #[test]
    fn test_no_dice_fails() {
        let config = SimConfig::classic().with_dice(Vec::new());
        assert!(matches!(config.build_recorder(), Err(McError::Config(_))));
    }

    #[test]
    fn test_invalid_json() {
        let err = SimConfig::from_json_str("{ rolls: }").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_json_round_trip() {
        let config = SimConfig::classic().with_seed(1);
        let parsed = SimConfig::from_json_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
