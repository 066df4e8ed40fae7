//! Capabilities of the externally trained models.
//!
//! Training happens elsewhere. This module only defines what each model
//! answers and how its parameters are read back from a JSON artifact.

use crate::error::{AnalyzerError, Result};
use crate::transaction::FeatureVector;
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Given a month index, produce a predicted total spend.
pub trait MonthlyForecaster {
    fn predict(&self, month: u32) -> Result<f64>;
}

/// Given an amount, decide whether it is typical.
pub trait AnomalyDetector {
    fn detect(&self, amount: f64) -> Verdict;
}

/// Given a feature vector, produce a category code.
pub trait CategoryModel {
    fn predict(&self, features: &FeatureVector) -> i64;

    /// Maps a payment label to the integer code the model was trained with.
    fn encode_payment_mode(&self, payment_mode: &str) -> Result<usize>;
}

/// Outcome of an anomaly check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Normal,
    Anomaly,
}

impl Verdict {
    /// `1` for normal, `-1` for anomalous.
    pub fn code(&self) -> i8 {
        match self {
            Verdict::Normal => 1,
            Verdict::Anomaly => -1,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Normal => f.write_str("Normal"),
            Verdict::Anomaly => f.write_str("Anomaly"),
        }
    }
}

fn check_month(month: u32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(AnalyzerError::InvalidMonth(month));
    }
    Ok(())
}

/// Monthly spend regressor artifact.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Regressor {
    /// `intercept + coefficient * month`
    Linear { intercept: f64, coefficient: f64 },

    /// One stored prediction per month.
    Table { months: BTreeMap<u32, f64> },
}

impl MonthlyForecaster for Regressor {
    fn predict(&self, month: u32) -> Result<f64> {
        check_month(month)?;
        match self {
            Regressor::Linear {
                intercept,
                coefficient,
            } => Ok(intercept + coefficient * f64::from(month)),
            Regressor::Table { months } => months
                .get(&month)
                .copied()
                .ok_or(AnalyzerError::InvalidMonth(month)),
        }
    }
}

/// Amount anomaly detector artifact.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Detector {
    /// Anything outside `lower..=upper` is anomalous.
    Range { lower: f64, upper: f64 },

    /// Anomalous when the standard score exceeds `threshold`.
    Zscore {
        mean: f64,
        std_dev: f64,
        threshold: f64,
    },
}

impl Detector {
    fn check(&self) -> std::result::Result<(), String> {
        match self {
            Detector::Range { lower, upper } if lower > upper => {
                Err(format!("lower bound {} exceeds upper bound {}", lower, upper))
            }
            Detector::Zscore { std_dev, .. } if *std_dev <= 0.0 => {
                Err(format!("std_dev must be positive, got {}", std_dev))
            }
            _ => Ok(()),
        }
    }
}

impl AnomalyDetector for Detector {
    fn detect(&self, amount: f64) -> Verdict {
        let anomalous = !amount.is_finite()
            || match self {
                Detector::Range { lower, upper } => amount < *lower || amount > *upper,
                Detector::Zscore {
                    mean,
                    std_dev,
                    threshold,
                } => ((amount - mean) / std_dev).abs() > *threshold,
            };
        if anomalous {
            Verdict::Anomaly
        } else {
            Verdict::Normal
        }
    }
}

/// Per-feature standardization applied before classification.
#[derive(Debug, Clone, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Scaler {
    fn transform(&self, features: &[f64; 6]) -> [f64; 6] {
        let mut out = [0.0; 6];
        for (i, value) in features.iter().enumerate() {
            let scale = if self.scale[i] == 0.0 { 1.0 } else { self.scale[i] };
            out[i] = (value - self.mean[i]) / scale;
        }
        out
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Centroid {
    pub label: i64,
    pub center: Vec<f64>,
}

/// Category classifier artifact.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    /// Label of the nearest centroid in scaled feature space.
    NearestCentroid {
        scaler: Scaler,
        payment_modes: Vec<String>,
        centroids: Vec<Centroid>,
        #[serde(default)]
        feature_importances: Option<Vec<f64>>,
    },
}

impl Classifier {
    fn check(&self) -> std::result::Result<(), String> {
        let width = FeatureVector::NAMES.len();
        let Classifier::NearestCentroid {
            scaler,
            payment_modes,
            centroids,
            feature_importances,
        } = self;

        if scaler.mean.len() != width || scaler.scale.len() != width {
            return Err(format!("scaler must have {} entries", width));
        }
        if payment_modes.is_empty() {
            return Err("payment_modes must not be empty".to_string());
        }
        if centroids.is_empty() {
            return Err("at least one centroid is required".to_string());
        }
        if let Some(bad) = centroids.iter().find(|c| c.center.len() != width) {
            return Err(format!("centroid {} must have {} entries", bad.label, width));
        }
        if feature_importances.as_ref().is_some_and(|f| f.len() != width) {
            return Err(format!("feature_importances must have {} entries", width));
        }
        Ok(())
    }

    /// Feature names paired with importances, when the artifact has them.
    pub fn feature_importances(&self) -> Option<Vec<(&'static str, f64)>> {
        let Classifier::NearestCentroid {
            feature_importances,
            ..
        } = self;
        feature_importances
            .as_ref()
            .map(|values| FeatureVector::NAMES.iter().copied().zip(values.iter().copied()).collect())
    }
}

impl CategoryModel for Classifier {
    fn predict(&self, features: &FeatureVector) -> i64 {
        let Classifier::NearestCentroid {
            scaler, centroids, ..
        } = self;
        let scaled = scaler.transform(&features.to_array());

        let mut best = &centroids[0];
        let mut best_distance = f64::INFINITY;
        for centroid in centroids {
            let distance: f64 = scaled
                .iter()
                .zip(&centroid.center)
                .map(|(x, c)| (x - c).powi(2))
                .sum();
            if distance < best_distance {
                best = centroid;
                best_distance = distance;
            }
        }
        best.label
    }

    fn encode_payment_mode(&self, payment_mode: &str) -> Result<usize> {
        let Classifier::NearestCentroid { payment_modes, .. } = self;
        let wanted = payment_mode.trim();
        payment_modes
            .iter()
            .position(|m| m.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AnalyzerError::UnknownPaymentMode(wanted.to_string()))
    }
}

/// Reads a regressor artifact.
pub fn load_regressor<P: AsRef<Path>>(path: P) -> Result<Regressor> {
    let path = path.as_ref();
    let regressor: Regressor = read_artifact(path)?;
    debug!("Loaded regressor from {}", path.display());
    Ok(regressor)
}

/// Reads an anomaly detector artifact.
pub fn load_detector<P: AsRef<Path>>(path: P) -> Result<Detector> {
    let path = path.as_ref();
    let detector: Detector = read_artifact(path)?;
    detector.check().map_err(|message| model_error(path, message))?;
    debug!("Loaded anomaly detector from {}", path.display());
    Ok(detector)
}

/// Reads a classifier artifact.
pub fn load_classifier<P: AsRef<Path>>(path: P) -> Result<Classifier> {
    let path = path.as_ref();
    let classifier: Classifier = read_artifact(path)?;
    classifier
        .check()
        .map_err(|message| model_error(path, message))?;
    debug!("Loaded classifier from {}", path.display());
    Ok(classifier)
}

fn read_artifact<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    from_reader(BufReader::new(file)).map_err(|e| match e {
        AnalyzerError::Json(inner) => model_error(path, inner.to_string()),
        other => other,
    })
}

fn from_reader<T: for<'de> Deserialize<'de>, R: Read>(reader: R) -> Result<T> {
    Ok(serde_json::from_reader(reader)?)
}

fn model_error(path: &Path, message: String) -> AnalyzerError {
    AnalyzerError::Model {
        path: path.display().to_string(),
        message,
    }
}
