//! Map and geolocation capability surfaces, plus the controller that
//! tracks view readiness.
//!
//! The mapping library itself is an external collaborator; this module only
//! defines the seam (`MapSurface`) and the readiness bookkeeping around it.
//! Marker placement and re-centering are refused until the view has actually
//! finished initializing, so replaying restored workouts can never race the
//! view setup.

use crate::{Coordinates, Error, Result, Workout};

/// Default zoom level for the initial view and list-to-map navigation.
pub const DEFAULT_ZOOM: u8 = 13;

/// One-shot position lookup. Attempted exactly once per startup; failure
/// surfaces to the user and the map is simply never initialized.
pub trait GeolocationProvider {
    fn current_position(&self) -> Result<Coordinates>;
}

/// The external mapping capability: view control, marker + popup placement,
/// re-centering. Tile-layer registration and attribution rendering belong to
/// the surface implementation.
pub trait MapSurface {
    fn init_view(&mut self, center: Coordinates, zoom: u8) -> Result<()>;

    fn place_marker(&mut self, coords: Coordinates, popup_text: &str, style_class: &str)
        -> Result<()>;

    fn center_on(&mut self, coords: Coordinates, zoom: u8) -> Result<()>;
}

/// Wraps a [`MapSurface`] with an explicit readiness signal.
pub struct MapController<S: MapSurface> {
    surface: S,
    zoom: u8,
    ready: bool,
}

impl<S: MapSurface> MapController<S> {
    pub fn new(surface: S, zoom: u8) -> Self {
        Self {
            surface,
            zoom,
            ready: false,
        }
    }

    /// Initialize the view around `center`. The controller is ready only
    /// after the surface reports success.
    pub fn init_view(&mut self, center: Coordinates) -> Result<()> {
        self.surface.init_view(center, self.zoom)?;
        self.ready = true;
        tracing::info!("Map view initialized at {} (zoom {})", center, self.zoom);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Place a marker with the workout's popup text and kind-specific style.
    pub fn place_marker(&mut self, workout: &Workout) -> Result<()> {
        if !self.ready {
            return Err(Error::MapNotReady);
        }
        self.surface.place_marker(
            workout.coordinates,
            &workout.popup_text(),
            workout.kind().popup_class(),
        )
    }

    /// Re-center the view, used for list-to-map navigation.
    pub fn center_on(&mut self, coords: Coordinates) -> Result<()> {
        if !self.ready {
            return Err(Error::MapNotReady);
        }
        self.surface.center_on(coords, self.zoom)
    }
}
