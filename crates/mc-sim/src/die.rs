//! Weighted dice and shared die handles

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};

use mc_core::{
    DEFAULT_WEIGHT, FaceLabel, FaceSet, McError, McResult, parse_weight, validate_weight,
};

/// A die with a fixed set of faces and a mutable weight per face
///
/// Rolling draws faces with replacement, each face with probability
/// `weight / total_weight`. When every weight is zero the die falls back to
/// a uniform draw.
#[derive(Debug, Clone)]
pub struct WeightedDie {
    /// Faces in construction order
    faces: FaceSet,
    /// One weight per face, same order as `faces`
    weights: Vec<f64>,
}

impl WeightedDie {
    /// Create a die from face labels, all weights 1.0
    pub fn new<I, L>(faces: I) -> McResult<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<FaceLabel>,
    {
        Ok(Self::from_face_set(FaceSet::new(faces)?))
    }

    /// Create a die from an already validated face set
    pub fn from_face_set(faces: FaceSet) -> Self {
        log::debug!("Creating die with {} faces", faces.len());
        let weights = vec![DEFAULT_WEIGHT; faces.len()];
        Self { faces, weights }
    }

    /// Standard numeric die with faces `1..=sides`
    pub fn standard(sides: u32) -> McResult<Self> {
        Ok(Self::from_face_set(FaceSet::standard(sides)?))
    }

    /// Wrap this die for sharing between the caller and a game
    pub fn into_shared(self) -> SharedDie {
        SharedDie::new(self)
    }

    pub fn faces(&self) -> &FaceSet {
        &self.faces
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Current weight of a face
    pub fn weight(&self, face: &FaceLabel) -> McResult<f64> {
        self.faces
            .position(face)
            .map(|idx| self.weights[idx])
            .ok_or_else(|| McError::UnknownFace(face.clone()))
    }

    /// Sum of all face weights
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Replace the weight of one face
    ///
    /// The face is looked up and the weight validated before anything is
    /// written, so a failed call leaves the die untouched.
    pub fn set_weight(&mut self, face: impl Into<FaceLabel>, weight: f64) -> McResult<()> {
        let face = face.into();
        let idx = self
            .faces
            .position(&face)
            .ok_or_else(|| McError::UnknownFace(face.clone()))?;
        let weight = validate_weight(weight)?;
        self.weights[idx] = weight;
        log::debug!("Set weight of face {} to {}", face, weight);
        Ok(())
    }

    /// Replace the weight of one face from its text form (e.g. `"2.5"`)
    pub fn set_weight_str(&mut self, face: impl Into<FaceLabel>, weight: &str) -> McResult<()> {
        let face = face.into();
        if !self.faces.contains(&face) {
            return Err(McError::UnknownFace(face));
        }
        self.set_weight(face, parse_weight(weight)?)
    }

    /// Reset every weight to 1.0
    pub fn reset_weights(&mut self) {
        self.weights.fill(DEFAULT_WEIGHT);
    }

    /// Single roll using the thread-local RNG
    pub fn roll_one(&self) -> McResult<FaceLabel> {
        let mut rng = rand::rng();
        let sampler = self.sampler()?;
        Ok(sampler.draw(1, &mut rng).remove(0))
    }

    /// Roll `count` times using the thread-local RNG
    pub fn roll(&self, count: usize) -> McResult<Vec<FaceLabel>> {
        self.roll_with(count, &mut rand::rng())
    }

    /// Roll `count` times using the given RNG
    ///
    /// All draws of one call use the same weight snapshot.
    pub fn roll_with<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> McResult<Vec<FaceLabel>> {
        Ok(self.sampler()?.draw(count, rng))
    }

    /// Snapshot of faces and weights
    pub fn current_state(&self) -> DieState {
        DieState {
            entries: self
                .faces
                .iter()
                .zip(&self.weights)
                .map(|(face, &weight)| FaceWeight {
                    face: face.clone(),
                    weight,
                })
                .collect(),
        }
    }

    /// Freeze the current weights into a sampler
    pub(crate) fn sampler(&self) -> McResult<DieSampler> {
        let weights = scaled_weights(&self.weights).unwrap_or_else(|| {
            log::warn!(
                "All {} face weights are zero, rolling uniformly",
                self.weights.len()
            );
            vec![DEFAULT_WEIGHT; self.weights.len()]
        });
        let index = WeightedIndex::new(&weights).map_err(|e| McError::Sampling(e.to_string()))?;

        Ok(DieSampler {
            labels: self.faces.labels().to_vec(),
            index,
        })
    }
}

/// Weights divided by the largest one, `None` when every weight is zero
///
/// Keeps the sum finite for any finite non-negative weights.
fn scaled_weights(weights: &[f64]) -> Option<Vec<f64>> {
    let max = weights.iter().copied().fold(0.0, f64::max);
    if max > 0.0 {
        Some(weights.iter().map(|w| w / max).collect())
    } else {
        None
    }
}

/// Frozen weights of one die, ready to draw from
pub(crate) struct DieSampler {
    labels: Vec<FaceLabel>,
    index: WeightedIndex<f64>,
}

impl DieSampler {
    pub(crate) fn labels(&self) -> &[FaceLabel] {
        &self.labels
    }

    pub(crate) fn draw<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<FaceLabel> {
        (0..count)
            .map(|_| self.labels[self.index.sample(rng)].clone())
            .collect()
    }
}

/// One face and its weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceWeight {
    pub face: FaceLabel,
    pub weight: f64,
}

/// Owned snapshot of a die's faces and weights
///
/// Later changes to the die are not reflected here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DieState {
    entries: Vec<FaceWeight>,
}

impl DieState {
    pub fn entries(&self) -> &[FaceWeight] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FaceWeight> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Faces in die order
    pub fn faces(&self) -> Vec<FaceLabel> {
        self.entries.iter().map(|e| e.face.clone()).collect()
    }

    pub fn weight(&self, face: &FaceLabel) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.face == *face)
            .map(|e| e.weight)
    }

    /// Draw probability of each face, uniform when all weights are zero
    pub fn probabilities(&self) -> Vec<(FaceLabel, f64)> {
        let weights: Vec<f64> = self.entries.iter().map(|e| e.weight).collect();
        let n = self.entries.len() as f64;
        let scaled = scaled_weights(&weights);
        let total: f64 = scaled.iter().flatten().sum();
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, e)| {
                let p = match &scaled {
                    Some(scaled) => scaled[idx] / total,
                    None => 1.0 / n,
                };
                (e.face.clone(), p)
            })
            .collect()
    }
}

impl fmt::Display for DieState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>8}  {:>8}", "face", "weight")?;
        for entry in &self.entries {
            writeln!(f, "{:>8}  {:>8}", entry.face.to_string(), entry.weight)?;
        }
        Ok(())
    }
}

// ============ Shared Die ============

/// Thread-safe shared die handle
///
/// Clones point at the same die, so a caller can keep one clone and adjust
/// weights while a [`PlayRecorder`](crate::PlayRecorder) holds another.
#[derive(Debug)]
pub struct SharedDie {
    inner: Arc<RwLock<WeightedDie>>,
}

impl SharedDie {
    pub fn new(die: WeightedDie) -> Self {
        Self {
            inner: Arc::new(RwLock::new(die)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, WeightedDie> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, WeightedDie> {
        self.inner.write()
    }

    pub fn set_weight(&self, face: impl Into<FaceLabel>, weight: f64) -> McResult<()> {
        self.inner.write().set_weight(face, weight)
    }

    pub fn current_state(&self) -> DieState {
        self.inner.read().current_state()
    }

    /// Copy of the die's face set
    pub fn faces(&self) -> FaceSet {
        self.inner.read().faces().clone()
    }

    pub fn roll(&self, count: usize) -> McResult<Vec<FaceLabel>> {
        self.inner.read().roll(count)
    }

    /// True if both handles refer to the same die
    pub fn ptr_eq(&self, other: &SharedDie) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn sampler(&self) -> McResult<DieSampler> {
        self.inner.read().sampler()
    }
}

impl Clone for SharedDie {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl From<WeightedDie> for SharedDie {
    fn from(die: WeightedDie) -> Self {
        Self::new(die)
    }
}
