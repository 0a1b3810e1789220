//! Statistic tables produced by the analyzer

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use mc_core::FaceLabel;

// ═══════════════════════════════════════════════════════════════════════════
// FACE COUNTS
// ═══════════════════════════════════════════════════════════════════════════

/// Per-roll face frequencies: one row per roll, one column per face
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceCountTable {
    /// Column labels, in face set order
    pub faces: Vec<FaceLabel>,
    /// `rows[roll][face_idx]` = dice showing that face on that roll
    pub rows: Vec<Vec<usize>>,
}

impl FaceCountTable {
    pub fn num_rolls(&self) -> usize {
        self.rows.len()
    }

    pub fn faces(&self) -> &[FaceLabel] {
        &self.faces
    }

    pub fn rows(&self) -> &[Vec<usize>] {
        &self.rows
    }

    /// Count of `face` on `roll`
    pub fn count(&self, roll: usize, face: &FaceLabel) -> Option<usize> {
        let idx = self.faces.iter().position(|f| f == face)?;
        self.rows.get(roll).and_then(|row| row.get(idx).copied())
    }

    /// Per-face totals over the whole play
    pub fn totals(&self) -> Vec<(FaceLabel, usize)> {
        self.faces
            .iter()
            .enumerate()
            .map(|(idx, face)| {
                let total: usize = self.rows.iter().filter_map(|r| r.get(idx)).sum();
                (face.clone(), total)
            })
            .collect()
    }
}

impl fmt::Display for FaceCountTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6}", "roll")?;
        for face in &self.faces {
            write!(f, " {:>6}", face.to_string())?;
        }
        writeln!(f)?;
        for (roll, row) in self.rows.iter().enumerate() {
            write!(f, "{:>6}", roll)?;
            for count in row {
                write!(f, " {:>6}", count)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// OUTCOME COUNTS
// ═══════════════════════════════════════════════════════════════════════════

/// A distinct outcome and how many rolls produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCount {
    pub outcome: Vec<FaceLabel>,
    pub count: usize,
}

/// Distinct outcomes ordered by count (descending), ties by outcome (ascending)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutcomeCounts {
    entries: Vec<OutcomeCount>,
}

impl OutcomeCounts {
    /// Group outcomes and count them
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = Vec<FaceLabel>>,
    {
        let mut grouped: BTreeMap<Vec<FaceLabel>, usize> = BTreeMap::new();
        for outcome in outcomes {
            *grouped.entry(outcome).or_insert(0) += 1;
        }

        let mut entries: Vec<OutcomeCount> = grouped
            .into_iter()
            .map(|(outcome, count)| OutcomeCount { outcome, count })
            .collect();
        // BTreeMap order is already ascending by outcome; a stable sort keeps it for ties
        entries.sort_by(|a, b| b.count.cmp(&a.count));

        Self { entries }
    }

    pub fn entries(&self) -> &[OutcomeCount] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OutcomeCount> {
        self.entries.iter()
    }

    /// Number of distinct outcomes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts (equals the number of rolls)
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Count of one outcome, 0 if it never occurred
    pub fn get(&self, outcome: &[FaceLabel]) -> usize {
        self.entries
            .iter()
            .find(|e| e.outcome == outcome)
            .map_or(0, |e| e.count)
    }

    pub fn most_common(&self) -> Option<&OutcomeCount> {
        self.entries.first()
    }
}

impl fmt::Display for OutcomeCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            let outcome: Vec<String> = entry.outcome.iter().map(ToString::to_string).collect();
            writeln!(f, "({})  {}", outcome.join(", "), entry.count)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// REPORT
// ═══════════════════════════════════════════════════════════════════════════

/// Every statistic for one play, in one serializable value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub num_rolls: usize,
    pub num_dice: usize,
    pub faces: Vec<FaceLabel>,
    pub jackpots: usize,
    pub jackpot_rate: f64,
    pub face_counts: FaceCountTable,
    pub combinations: OutcomeCounts,
    pub permutations: OutcomeCounts,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(values: &[i32]) -> Vec<FaceLabel> {
        values.iter().copied().map(FaceLabel::from).collect()
    }

    #[test]
    fn test_outcome_ordering() {
        let counts = OutcomeCounts::from_outcomes(vec![
            labels(&[2, 2]),
            labels(&[1, 3]),
            labels(&[2, 2]),
            labels(&[1, 2]),
        ]);
        assert_eq!(counts.len(), 3);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.entries()[0].outcome, labels(&[2, 2]));
        assert_eq!(counts.entries()[0].count, 2);
        // Ties ordered by outcome
        assert_eq!(counts.entries()[1].outcome, labels(&[1, 2]));
        assert_eq!(counts.entries()[2].outcome, labels(&[1, 3]));
    }

    #[test]
    fn test_outcome_lookup() {
        let counts = OutcomeCounts::from_outcomes(vec![labels(&[4, 4, 4])]);
        assert_eq!(counts.get(&labels(&[4, 4, 4])), 1);
        assert_eq!(counts.get(&labels(&[1, 1, 1])), 0);
        assert_eq!(counts.most_common().unwrap().count, 1);
        assert!(OutcomeCounts::default().most_common().is_none());
    }

    #[test]
    fn test_face_count_totals() {
        let table = FaceCountTable {
            faces: labels(&[1, 2]),
            rows: vec![vec![2, 0], vec![1, 1]],
        };
        assert_eq!(table.count(1, &FaceLabel::from(2)), Some(1));
        assert_eq!(table.count(0, &FaceLabel::from(3)), None);
        assert_eq!(
            table.totals(),
            vec![(FaceLabel::from(1), 3), (FaceLabel::from(2), 1)]
        );
    }

    #[test]
    fn test_face_count_short_rows() {
        let table: FaceCountTable =
            serde_json::from_str(r#"{"faces":[1,2,3],"rows":[[1],[0,2]]}"#).unwrap();
        assert_eq!(table.count(0, &FaceLabel::from(3)), None);
        assert_eq!(table.count(1, &FaceLabel::from(2)), Some(2));
        assert_eq!(
            table.totals(),
            vec![
                (FaceLabel::from(1), 1),
                (FaceLabel::from(2), 2),
                (FaceLabel::from(3), 0)
            ]
        );
    }

    #[test]
    fn test_outcome_display() {
        let counts = OutcomeCounts::from_outcomes(vec![vec![
            FaceLabel::from(1),
            FaceLabel::from("a"),
        ]]);
        assert_eq!(counts.to_string(), "(1, a)  1\n");
    }
}
