//! Outcome analyzer — statistics over the most recent play

use mc_core::{FaceLabel, FaceSet, McError, McResult};

use crate::game::{PlayRecorder, PlayTable};
use crate::stats::{AnalysisReport, FaceCountTable, OutcomeCounts};

/// Anything that exposes a play table and the face set its cells come from
pub trait PlayHistory {
    fn face_set(&self) -> &FaceSet;
    fn play_table(&self) -> &PlayTable;
}

/// Computes statistics over one play history
///
/// Nothing is cached: every call reads the history's current table.
pub struct OutcomeAnalyzer<'a, H: PlayHistory + ?Sized = PlayRecorder> {
    history: &'a H,
}

impl<'a, H: PlayHistory + ?Sized> OutcomeAnalyzer<'a, H> {
    /// Attach to a history whose cells all belong to its face set
    pub fn new(history: &'a H) -> McResult<Self> {
        let faces = history.face_set();
        let table = history.play_table();

        for (roll, row) in table.rows().iter().enumerate() {
            if let Some(face) = row.iter().find(|f| !faces.contains(f)) {
                return Err(McError::InconsistentHistory(format!(
                    "roll {} shows face {} which is not in the face set",
                    roll, face
                )));
            }
        }

        Ok(Self { history })
    }

    fn table(&self) -> &PlayTable {
        self.history.play_table()
    }

    /// Rolls on which every die shows the same face
    pub fn jackpot_count(&self) -> usize {
        self.table()
            .rows()
            .iter()
            .filter(|row| is_jackpot(row))
            .count()
    }

    /// Share of rolls that were jackpots (0.0 with no rolls)
    pub fn jackpot_rate(&self) -> f64 {
        let rolls = self.table().num_rolls();
        if rolls == 0 {
            0.0
        } else {
            self.jackpot_count() as f64 / rolls as f64
        }
    }

    /// How many dice landed on each face, per roll
    pub fn face_count_per_roll(&self) -> FaceCountTable {
        let faces = self.history.face_set();
        let rows = self
            .table()
            .rows()
            .iter()
            .map(|row| {
                let mut counts = vec![0usize; faces.len()];
                for face in row {
                    if let Some(idx) = faces.position(face) {
                        counts[idx] += 1;
                    }
                }
                counts
            })
            .collect();

        FaceCountTable {
            faces: faces.labels().to_vec(),
            rows,
        }
    }

    /// Order-independent outcomes (each roll sorted before grouping)
    pub fn combo_count(&self) -> OutcomeCounts {
        OutcomeCounts::from_outcomes(self.table().rows().iter().map(|row| {
            let mut sorted = row.clone();
            sorted.sort();
            sorted
        }))
    }

    /// Order-dependent outcomes (rolls grouped exactly as drawn)
    pub fn permutation_count(&self) -> OutcomeCounts {
        OutcomeCounts::from_outcomes(self.table().rows().iter().cloned())
    }

    /// All statistics at once
    pub fn report(&self) -> AnalysisReport {
        let table = self.table();
        AnalysisReport {
            num_rolls: table.num_rolls(),
            num_dice: table.num_dice(),
            faces: self.history.face_set().labels().to_vec(),
            jackpots: self.jackpot_count(),
            jackpot_rate: self.jackpot_rate(),
            face_counts: self.face_count_per_roll(),
            combinations: self.combo_count(),
            permutations: self.permutation_count(),
        }
    }
}

fn is_jackpot(row: &[FaceLabel]) -> bool {
    match row.split_first() {
        Some((first, rest)) => rest.iter().all(|f| f == first),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed table standing in for a game
    struct FixedHistory {
        faces: FaceSet,
        table: PlayTable,
    }

    impl PlayHistory for FixedHistory {
        fn face_set(&self) -> &FaceSet {
            &self.faces
        }

        fn play_table(&self) -> &PlayTable {
            &self.table
        }
    }

    fn fixed(rows: &[[i32; 3]]) -> FixedHistory {
        let rows = rows
            .iter()
            .map(|r| r.iter().copied().map(FaceLabel::from).collect())
            .collect();
        FixedHistory {
            faces: FaceSet::standard(6).unwrap(),
            table: PlayTable::from_rows(3, rows).unwrap(),
        }
    }

    fn labels(values: &[i32]) -> Vec<FaceLabel> {
        values.iter().copied().map(FaceLabel::from).collect()
    }

    #[test]
    fn test_jackpot_count() {
        let history = fixed(&[[1, 1, 1], [1, 2, 1], [6, 6, 6], [3, 3, 4]]);
        let analyzer = OutcomeAnalyzer::new(&history).unwrap();
        assert_eq!(analyzer.jackpot_count(), 2);
        assert_eq!(analyzer.jackpot_rate(), 0.5);
    }

    #[test]
    fn test_empty_history() {
        let history = fixed(&[]);
        let analyzer = OutcomeAnalyzer::new(&history).unwrap();
        assert_eq!(analyzer.jackpot_count(), 0);
        assert_eq!(analyzer.jackpot_rate(), 0.0);
        assert!(analyzer.combo_count().is_empty());
        assert_eq!(analyzer.face_count_per_roll().num_rolls(), 0);
    }

    #[test]
    fn test_face_count_per_roll() {
        let history = fixed(&[[2, 5, 2], [6, 6, 6]]);
        let analyzer = OutcomeAnalyzer::new(&history).unwrap();
        let counts = analyzer.face_count_per_roll();

        assert_eq!(counts.faces(), labels(&[1, 2, 3, 4, 5, 6]).as_slice());
        assert_eq!(counts.rows()[0], vec![0, 2, 0, 0, 1, 0]);
        assert_eq!(counts.rows()[1], vec![0, 0, 0, 0, 0, 3]);
        assert!(counts.rows().iter().all(|r| r.iter().sum::<usize>() == 3));
    }

    #[test]
    fn test_combo_vs_permutation() {
        let history = fixed(&[[1, 2, 3], [3, 2, 1], [2, 1, 3], [4, 4, 4]]);
        let analyzer = OutcomeAnalyzer::new(&history).unwrap();

        let combos = analyzer.combo_count();
        assert_eq!(combos.len(), 2);
        assert_eq!(combos.entries()[0].outcome, labels(&[1, 2, 3]));
        assert_eq!(combos.entries()[0].count, 3);
        assert_eq!(combos.get(&labels(&[4, 4, 4])), 1);

        let perms = analyzer.permutation_count();
        assert_eq!(perms.len(), 4);
        assert!(perms.iter().all(|e| e.count == 1));
        assert_eq!(perms.total(), 4);
        assert_eq!(perms.entries()[0].outcome, labels(&[1, 2, 3]));
    }

    #[test]
    fn test_foreign_face_rejected() {
        let mut history = fixed(&[[1, 2, 3]]);
        history.table =
            PlayTable::from_rows(3, vec![labels(&[1, 2, 9])]).unwrap();
        assert!(matches!(
            OutcomeAnalyzer::new(&history),
            Err(McError::InconsistentHistory(_))
        ));
    }

    #[test]
    fn test_single_die_always_jackpot() {
        let history = FixedHistory {
            faces: FaceSet::new(["h", "t"]).unwrap(),
            table: PlayTable::from_rows(
                1,
                vec![vec!["h".into()], vec!["t".into()], vec!["h".into()]],
            )
            .unwrap(),
        };
        let analyzer = OutcomeAnalyzer::new(&history).unwrap();
        assert_eq!(analyzer.jackpot_count(), 3);
    }

    #[test]
    fn test_report() {
        let history = fixed(&[[5, 5, 5], [1, 2, 2]]);
        let report = OutcomeAnalyzer::new(&history).unwrap().report();
        assert_eq!(report.num_rolls, 2);
        assert_eq!(report.num_dice, 3);
        assert_eq!(report.jackpots, 1);
        assert_eq!(report.combinations.total(), 2);
        assert_eq!(report.permutations.total(), 2);
        assert_eq!(report.face_counts.rows.len(), 2);
    }
}
