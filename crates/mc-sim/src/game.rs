//! Game — rolls a group of dice and records the most recent play

use std::fmt;
use std::str::FromStr;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use mc_core::{FaceLabel, FaceSet, McError, McResult};

use crate::analyzer::PlayHistory;
use crate::die::SharedDie;

/// Wide play table: one row per roll, one column per die
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPlayTable")]
pub struct PlayTable {
    num_dice: usize,
    rows: Vec<Vec<FaceLabel>>,
}

/// Unchecked serde form of [`PlayTable`]
#[derive(Deserialize)]
struct RawPlayTable {
    num_dice: usize,
    rows: Vec<Vec<FaceLabel>>,
}

impl TryFrom<RawPlayTable> for PlayTable {
    type Error = McError;

    fn try_from(raw: RawPlayTable) -> McResult<Self> {
        Self::from_rows(raw.num_dice, raw.rows)
    }
}

impl PlayTable {
    /// Table with no rolls yet
    pub fn empty(num_dice: usize) -> Self {
        Self {
            num_dice,
            rows: Vec::new(),
        }
    }

    /// Build from rows; every row must have `num_dice` cells
    pub fn from_rows(num_dice: usize, rows: Vec<Vec<FaceLabel>>) -> McResult<Self> {
        if let Some((roll, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != num_dice) {
            return Err(McError::InconsistentHistory(format!(
                "roll {} has {} cells, expected {}",
                roll,
                row.len(),
                num_dice
            )));
        }
        Ok(Self { num_dice, rows })
    }

    /// Build from per-die columns of equal length
    pub fn from_columns(columns: Vec<Vec<FaceLabel>>) -> McResult<Self> {
        let num_dice = columns.len();
        let num_rolls = columns.first().map_or(0, Vec::len);
        if let Some(die) = columns.iter().position(|c| c.len() != num_rolls) {
            return Err(McError::InconsistentHistory(format!(
                "die {} has {} rolls, expected {}",
                die,
                columns[die].len(),
                num_rolls
            )));
        }

        let mut iters: Vec<_> = columns.into_iter().map(Vec::into_iter).collect();
        let rows = (0..num_rolls)
            .map(|_| iters.iter_mut().filter_map(Iterator::next).collect())
            .collect();
        Ok(Self { num_dice, rows })
    }

    /// Rebuild a wide table from narrow records
    ///
    /// Every (roll, die) cell must appear exactly once.
    pub fn from_narrow(num_dice: usize, records: &[NarrowRecord]) -> McResult<Self> {
        if num_dice == 0 {
            return match records.first() {
                Some(record) => Err(McError::InconsistentHistory(format!(
                    "record for die {} but table has no dice",
                    record.die
                ))),
                None => Ok(Self::empty(0)),
            };
        }
        if records.len() % num_dice != 0 {
            return Err(McError::InconsistentHistory(format!(
                "{} records do not fill rows of {} dice",
                records.len(),
                num_dice
            )));
        }

        // Bounded by the record count, so indices are checked before allocating
        let num_rolls = records.len() / num_dice;
        let mut grid: Vec<Vec<Option<FaceLabel>>> = vec![vec![None; num_dice]; num_rolls];

        for record in records {
            let row = grid.get_mut(record.roll).ok_or_else(|| {
                McError::InconsistentHistory(format!(
                    "record for roll {} but {} records hold {} rolls",
                    record.roll,
                    records.len(),
                    num_rolls
                ))
            })?;
            let cell = row.get_mut(record.die).ok_or_else(|| {
                McError::InconsistentHistory(format!(
                    "record for die {} but table has {} dice",
                    record.die, num_dice
                ))
            })?;
            if cell.replace(record.face.clone()).is_some() {
                return Err(McError::InconsistentHistory(format!(
                    "duplicate record for roll {}, die {}",
                    record.roll, record.die
                )));
            }
        }

        let rows = grid
            .into_iter()
            .enumerate()
            .map(|(roll, row)| {
                row.into_iter()
                    .enumerate()
                    .map(|(die, cell)| {
                        cell.ok_or_else(|| {
                            McError::InconsistentHistory(format!(
                                "missing record for roll {}, die {}",
                                roll, die
                            ))
                        })
                    })
                    .collect::<McResult<Vec<_>>>()
            })
            .collect::<McResult<Vec<_>>>()?;

        Ok(Self { num_dice, rows })
    }

    pub fn num_rolls(&self) -> usize {
        self.rows.len()
    }

    pub fn num_dice(&self) -> usize {
        self.num_dice
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<FaceLabel>] {
        &self.rows
    }

    pub fn row(&self, roll: usize) -> Option<&[FaceLabel]> {
        self.rows.get(roll).map(Vec::as_slice)
    }

    pub fn cell(&self, roll: usize, die: usize) -> Option<&FaceLabel> {
        self.rows.get(roll).and_then(|r| r.get(die))
    }

    /// All draws of one die, in roll order
    pub fn column(&self, die: usize) -> Option<Vec<FaceLabel>> {
        if die >= self.num_dice {
            return None;
        }
        self.rows.iter().map(|r| r.get(die).cloned()).collect()
    }

    /// Unpivot into (roll, die, face) records, ordered by roll then die
    pub fn to_narrow(&self) -> Vec<NarrowRecord> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(roll, row)| {
                row.iter().enumerate().map(move |(die, face)| NarrowRecord {
                    roll,
                    die,
                    face: face.clone(),
                })
            })
            .collect()
    }
}

impl fmt::Display for PlayTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6}", "roll")?;
        for die in 0..self.num_dice {
            write!(f, " {:>6}", die)?;
        }
        writeln!(f)?;
        for (roll, row) in self.rows.iter().enumerate() {
            write!(f, "{:>6}", roll)?;
            for face in row {
                write!(f, " {:>6}", face.to_string())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// One cell of the play table in long form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrowRecord {
    pub roll: usize,
    pub die: usize,
    pub face: FaceLabel,
}

/// Shape of the table returned by [`PlayRecorder::results`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultForm {
    /// Rows = rolls, columns = dice
    #[default]
    Wide,
    /// One record per (roll, die)
    Narrow,
}

impl ResultForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultForm::Wide => "wide",
            ResultForm::Narrow => "narrow",
        }
    }
}

impl FromStr for ResultForm {
    type Err = McError;

    fn from_str(s: &str) -> McResult<Self> {
        match s {
            "wide" => Ok(ResultForm::Wide),
            "narrow" => Ok(ResultForm::Narrow),
            other => Err(McError::UnknownResultForm(other.to_string())),
        }
    }
}

impl fmt::Display for ResultForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Copy of the most recent play in the requested form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "form", content = "data", rename_all = "lowercase")]
pub enum PlayResults {
    Wide(PlayTable),
    Narrow(Vec<NarrowRecord>),
}

impl PlayResults {
    pub fn form(&self) -> ResultForm {
        match self {
            PlayResults::Wide(_) => ResultForm::Wide,
            PlayResults::Narrow(_) => ResultForm::Narrow,
        }
    }

    pub fn as_wide(&self) -> Option<&PlayTable> {
        match self {
            PlayResults::Wide(table) => Some(table),
            PlayResults::Narrow(_) => None,
        }
    }

    pub fn as_narrow(&self) -> Option<&[NarrowRecord]> {
        match self {
            PlayResults::Wide(_) => None,
            PlayResults::Narrow(records) => Some(records),
        }
    }
}

impl fmt::Display for PlayResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayResults::Wide(table) => write!(f, "{}", table),
            PlayResults::Narrow(records) => {
                writeln!(f, "{:>6} {:>6} {:>6}", "roll", "die", "face")?;
                for r in records {
                    writeln!(f, "{:>6} {:>6} {:>6}", r.roll, r.die, r.face.to_string())?;
                }
                Ok(())
            }
        }
    }
}

/// Rolls a fixed group of dice and keeps the most recent play
///
/// Dice are held through [`SharedDie`] handles, so weight changes made by the
/// caller between plays are picked up by the next [`play`](Self::play).
#[derive(Debug)]
pub struct PlayRecorder {
    /// Dice in column order
    dice: Vec<SharedDie>,
    /// Face set shared by every die (order of die 0)
    faces: FaceSet,
    /// Random number generator
    rng: ChaCha8Rng,
    /// Most recent play
    table: PlayTable,
    /// Number of completed plays
    plays: u64,
}

impl PlayRecorder {
    /// Create a game from dice that all share one face set
    pub fn new(dice: Vec<SharedDie>) -> McResult<Self> {
        let first = dice.first().ok_or(McError::EmptyDiceList)?;
        let faces = first.faces();

        for (idx, die) in dice.iter().enumerate().skip(1) {
            if !faces.same_faces(die.read().faces()) {
                return Err(McError::MismatchedFaceSets { die: idx });
            }
        }

        log::debug!(
            "Creating game with {} dice of {} faces",
            dice.len(),
            faces.len()
        );

        Ok(Self {
            table: PlayTable::empty(dice.len()),
            dice,
            faces,
            rng: ChaCha8Rng::from_os_rng(),
            plays: 0,
        })
    }

    /// Builder: seed the RNG for reproducible plays
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed(seed);
        self
    }

    /// Seed RNG for reproducible results
    pub fn seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Roll every die `count` times and replace the stored table
    ///
    /// Weights are snapshotted for all dice before the first draw. The old
    /// table is kept if any die can no longer be sampled or no longer shows
    /// the game's faces.
    pub fn play(&mut self, count: usize) -> McResult<()> {
        let samplers = self
            .dice
            .iter()
            .map(SharedDie::sampler)
            .collect::<McResult<Vec<_>>>()?;

        // A die replaced through `SharedDie::write` may carry other faces
        for (idx, sampler) in samplers.iter().enumerate() {
            let labels = sampler.labels();
            if labels.len() != self.faces.len()
                || !labels.iter().all(|l| self.faces.contains(l))
            {
                return Err(McError::MismatchedFaceSets { die: idx });
            }
        }

        let columns = samplers
            .iter()
            .map(|sampler| sampler.draw(count, &mut self.rng))
            .collect();

        self.table = PlayTable::from_columns(columns)?;
        self.plays += 1;
        log::debug!(
            "Play {}: {} rolls of {} dice",
            self.plays,
            count,
            self.dice.len()
        );
        Ok(())
    }

    /// Copy of the most recent play
    pub fn results(&self, form: ResultForm) -> PlayResults {
        match form {
            ResultForm::Wide => PlayResults::Wide(self.table.clone()),
            ResultForm::Narrow => PlayResults::Narrow(self.table.to_narrow()),
        }
    }

    /// Like [`results`](Self::results) with the form given by name
    pub fn results_by_name(&self, form: &str) -> McResult<PlayResults> {
        Ok(self.results(form.parse()?))
    }

    pub fn play_table(&self) -> &PlayTable {
        &self.table
    }

    pub fn dice(&self) -> &[SharedDie] {
        &self.dice
    }

    pub fn num_dice(&self) -> usize {
        self.dice.len()
    }

    pub fn face_set(&self) -> &FaceSet {
        &self.faces
    }

    /// Number of completed plays
    pub fn plays(&self) -> u64 {
        self.plays
    }
}

impl PlayHistory for PlayRecorder {
    fn face_set(&self) -> &FaceSet {
        &self.faces
    }

    fn play_table(&self) -> &PlayTable {
        &self.table
    }
}
