//! The workout input form, modeled as a small state machine.
//!
//! The form opens when a map click arrives (capturing the click's
//! coordinates as pending context), stays open while the user edits, and
//! closes on a valid submission or an explicit cancel. Switching the workout
//! type swaps which field subset applies without losing shared values.

use crate::{Coordinates, Error, Result, WorkoutKind};

/// Form visibility states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormState {
    Hidden,
    Visible,
}

/// Raw field values as the user typed them. Parsing happens at submit.
#[derive(Clone, Debug, Default)]
pub struct FormFields {
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

/// A validated workout-creation request emitted by a successful submit.
#[derive(Clone, Debug, PartialEq)]
pub enum WorkoutRequest {
    Running {
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
    },
    Cycling {
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    },
}

/// Drives the input form: hidden → visible → validated submit or cancel.
pub struct WorkoutFormController {
    state: FormState,
    pending_coords: Option<Coordinates>,
    kind: WorkoutKind,
    fields: FormFields,
    clear_inputs_on_cancel: bool,
}

impl WorkoutFormController {
    /// `clear_inputs_on_cancel` controls whether an explicit cancel wipes
    /// the typed values; the historical behavior keeps them.
    pub fn new(clear_inputs_on_cancel: bool) -> Self {
        Self {
            state: FormState::Hidden,
            pending_coords: None,
            kind: WorkoutKind::Running,
            fields: FormFields::default(),
            clear_inputs_on_cancel,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state == FormState::Visible
    }

    pub fn kind(&self) -> WorkoutKind {
        self.kind
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Show the form for a map click at `coords`.
    pub fn open(&mut self, coords: Coordinates) {
        self.pending_coords = Some(coords);
        self.state = FormState::Visible;
        tracing::debug!("Form opened for click at {}", coords);
    }

    /// Toggle the workout type. Shared field values (distance, duration)
    /// survive the switch; so do the hidden subset's values.
    pub fn set_kind(&mut self, kind: WorkoutKind) {
        self.kind = kind;
    }

    pub fn set_distance(&mut self, raw: &str) {
        self.fields.distance = raw.to_string();
    }

    pub fn set_duration(&mut self, raw: &str) {
        self.fields.duration = raw.to_string();
    }

    pub fn set_cadence(&mut self, raw: &str) {
        self.fields.cadence = raw.to_string();
    }

    pub fn set_elevation(&mut self, raw: &str) {
        self.fields.elevation = raw.to_string();
    }

    /// Validate the inputs relevant to the selected type and emit a
    /// creation request.
    ///
    /// On success the form hides and its inputs reset. On failure the form
    /// stays visible with the inputs untouched so the user can correct them.
    pub fn submit(&mut self) -> Result<WorkoutRequest> {
        if self.state != FormState::Visible {
            return Err(Error::FormHidden);
        }
        let coordinates = self.pending_coords.ok_or(Error::FormHidden)?;

        let distance_km = parse_positive("distance", &self.fields.distance)?;
        let duration_min = parse_positive("duration", &self.fields.duration)?;

        let request = match self.kind {
            WorkoutKind::Running => {
                let cadence_spm = parse_finite("cadence", &self.fields.cadence)?;
                WorkoutRequest::Running {
                    coordinates,
                    distance_km,
                    duration_min,
                    cadence_spm,
                }
            }
            // Elevation may be zero or negative; only finiteness is required.
            WorkoutKind::Cycling => {
                let elevation_gain_m = parse_finite("elevation", &self.fields.elevation)?;
                WorkoutRequest::Cycling {
                    coordinates,
                    distance_km,
                    duration_min,
                    elevation_gain_m,
                }
            }
        };

        self.state = FormState::Hidden;
        self.pending_coords = None;
        self.fields = FormFields::default();

        Ok(request)
    }

    /// Close the form without emitting a record. Typed values are kept or
    /// cleared per the controller's configuration.
    pub fn cancel(&mut self) {
        if self.state != FormState::Visible {
            return;
        }

        self.state = FormState::Hidden;
        self.pending_coords = None;
        if self.clear_inputs_on_cancel {
            self.fields = FormFields::default();
        }
    }
}

fn parse_finite(name: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::InvalidMetric(format!("{} must be a number, got {:?}", name, raw)))?;
    if !value.is_finite() {
        return Err(Error::InvalidMetric(format!(
            "{} must be a finite number, got {}",
            name, value
        )));
    }
    Ok(value)
}

fn parse_positive(name: &str, raw: &str) -> Result<f64> {
    let value = parse_finite(name, raw)?;
    if value <= 0.0 {
        return Err(Error::InvalidMetric(format!(
            "{} must be positive, got {}",
            name, value
        )));
    }
    Ok(value)
}
