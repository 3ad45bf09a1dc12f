//! Core domain types for the Mapfit workout tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Geographic coordinates
//! - Workout kinds and their type-specific metrics
//! - The workout record itself, with derived metrics computed at creation

use crate::{Error, Result};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Month names indexed 0-11, used when deriving a workout description
/// from its creation timestamp.
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// ============================================================================
// Coordinates
// ============================================================================

/// A geographic position (latitude, longitude) in degrees.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether the pair lies within the valid geographic range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && self.lat.abs() <= 90.0
            && self.lng.abs() <= 180.0
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

// ============================================================================
// Workout kinds and details
// ============================================================================

/// The closed set of workout variants.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    /// Human-readable label, e.g. for descriptions and list entries.
    pub fn label(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::Cycling => "Cycling",
        }
    }

    /// Emoji glyph shown in marker popups.
    pub fn glyph(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "\u{1F3C3}",
            WorkoutKind::Cycling => "\u{1F6B4}",
        }
    }

    /// Style class applied to the marker popup for this kind.
    pub fn popup_class(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "running-popup",
            WorkoutKind::Cycling => "cycling-popup",
        }
    }
}

/// Type-specific metrics, tagged by kind so serialized records retain
/// their discriminant and reconstruct the right variant.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkoutDetails {
    Running {
        cadence_spm: f64,
        pace_min_per_km: f64,
    },
    Cycling {
        elevation_gain_m: f64,
        speed_km_per_h: f64,
    },
}

impl WorkoutDetails {
    pub fn kind(&self) -> WorkoutKind {
        match self {
            WorkoutDetails::Running { .. } => WorkoutKind::Running,
            WorkoutDetails::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

// ============================================================================
// Workout record
// ============================================================================

/// A recorded workout session pinned to a map location.
///
/// Derived metrics (pace/speed) and the display description are computed
/// once at construction and never change afterwards.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub distance_km: f64,
    pub duration_min: f64,
    pub coordinates: Coordinates,
    pub description: String,
    #[serde(flatten)]
    pub details: WorkoutDetails,
}

impl Workout {
    /// Create a running workout. Pace is derived as round(duration / distance).
    pub fn running(
        distance_km: f64,
        duration_min: f64,
        coordinates: Coordinates,
        cadence_spm: f64,
    ) -> Result<Self> {
        validate_base_metrics(distance_km, duration_min, coordinates)?;
        if !cadence_spm.is_finite() {
            return Err(Error::InvalidMetric("cadence must be a finite number".into()));
        }

        // Positivity was just checked, so the division is well-defined.
        let pace_min_per_km = (duration_min / distance_km).round();

        Ok(Self::assemble(
            distance_km,
            duration_min,
            coordinates,
            WorkoutDetails::Running {
                cadence_spm,
                pace_min_per_km,
            },
        ))
    }

    /// Create a cycling workout. Speed is derived as round(distance / hours).
    ///
    /// Elevation gain may be zero or negative (descents are real rides).
    pub fn cycling(
        distance_km: f64,
        duration_min: f64,
        coordinates: Coordinates,
        elevation_gain_m: f64,
    ) -> Result<Self> {
        validate_base_metrics(distance_km, duration_min, coordinates)?;
        if !elevation_gain_m.is_finite() {
            return Err(Error::InvalidMetric(
                "elevation gain must be a finite number".into(),
            ));
        }

        let speed_km_per_h = (distance_km / (duration_min / 60.0)).round();

        Ok(Self::assemble(
            distance_km,
            duration_min,
            coordinates,
            WorkoutDetails::Cycling {
                elevation_gain_m,
                speed_km_per_h,
            },
        ))
    }

    fn assemble(
        distance_km: f64,
        duration_min: f64,
        coordinates: Coordinates,
        details: WorkoutDetails,
    ) -> Self {
        let created_at = Utc::now();
        let description = describe(details.kind(), created_at);

        Self {
            id: Uuid::new_v4(),
            created_at,
            distance_km,
            duration_min,
            coordinates,
            description,
            details,
        }
    }

    pub fn kind(&self) -> WorkoutKind {
        self.details.kind()
    }

    /// Text bound to this workout's map popup, e.g. "🏃 Running on April 14".
    pub fn popup_text(&self) -> String {
        format!("{} {}", self.kind().glyph(), self.description)
    }

    /// One-line metric summary for list rendering.
    pub fn metric_summary(&self) -> String {
        match self.details {
            WorkoutDetails::Running {
                cadence_spm,
                pace_min_per_km,
            } => format!(
                "{} km in {} min — {} min/km at {} spm",
                self.distance_km, self.duration_min, pace_min_per_km, cadence_spm
            ),
            WorkoutDetails::Cycling {
                elevation_gain_m,
                speed_km_per_h,
            } => format!(
                "{} km in {} min — {} km/h, {} m elevation gain",
                self.distance_km, self.duration_min, speed_km_per_h, elevation_gain_m
            ),
        }
    }
}

/// "<Kind> on <Month> <Day>" from the creation timestamp.
fn describe(kind: WorkoutKind, created_at: DateTime<Utc>) -> String {
    format!(
        "{} on {} {}",
        kind.label(),
        MONTHS[created_at.month0() as usize],
        created_at.day()
    )
}

fn validate_base_metrics(
    distance_km: f64,
    duration_min: f64,
    coordinates: Coordinates,
) -> Result<()> {
    if !distance_km.is_finite() || distance_km <= 0.0 {
        return Err(Error::InvalidMetric(format!(
            "distance must be a positive number, got {}",
            distance_km
        )));
    }
    if !duration_min.is_finite() || duration_min <= 0.0 {
        return Err(Error::InvalidMetric(format!(
            "duration must be a positive number, got {}",
            duration_min
        )));
    }
    if !coordinates.is_valid() {
        return Err(Error::InvalidMetric(format!(
            "coordinates out of range: {}",
            coordinates
        )));
    }
    Ok(())
}
