//! Application orchestration: wires geolocation, map, form, list and store
//! together. Holds no domain state of its own beyond the wiring.
//!
//! All capability handles are injected through the constructor; nothing in
//! here reaches for globals.

use crate::blob::BlobStore;
use crate::form::{WorkoutFormController, WorkoutRequest};
use crate::map::{GeolocationProvider, MapController, MapSurface};
use crate::store::WorkoutStore;
use crate::{Config, Coordinates, Error, Result, Workout};
use uuid::Uuid;

/// Rendering surface for the workout list. Entries are rendering references
/// only; the store stays the single owner of the records.
pub trait WorkoutListView {
    fn append_entry(&mut self, workout: &Workout) -> Result<()>;
}

/// Orchestrates the click → form → record → render → persist workflow.
pub struct AppController<S: MapSurface, L: WorkoutListView, B: BlobStore> {
    map: MapController<S>,
    list: L,
    blob: B,
    form: WorkoutFormController,
    store: WorkoutStore,
}

impl<S: MapSurface, L: WorkoutListView, B: BlobStore> AppController<S, L, B> {
    pub fn new(surface: S, list: L, blob: B, config: &Config) -> Self {
        Self {
            map: MapController::new(surface, config.map.default_zoom),
            list,
            blob,
            form: WorkoutFormController::new(config.form.clear_inputs_on_cancel),
            store: WorkoutStore::new(),
        }
    }

    /// Start the application: resolve the current position once, initialize
    /// the map view around it, then restore prior workouts and replay their
    /// marker and list rendering in store order.
    ///
    /// Replay runs strictly after the map reports ready, never on a timer.
    /// A failed position lookup propagates; the map stays uninitialized and
    /// the rest of the app remains usable.
    pub fn startup(&mut self, geolocation: &dyn GeolocationProvider) -> Result<()> {
        let position = geolocation.current_position()?;
        self.map.init_view(position)?;

        self.store = WorkoutStore::restore(&self.blob);
        for workout in self.store.all() {
            self.map.place_marker(workout)?;
            self.list.append_entry(workout)?;
        }

        tracing::info!("Started with {} restored workouts", self.store.len());
        Ok(())
    }

    /// A map click opens the form with the click's coordinates pending.
    pub fn handle_map_click(&mut self, coords: Coordinates) {
        self.form.open(coords);
    }

    /// Mutable access to the form for field editing.
    pub fn form_mut(&mut self) -> &mut WorkoutFormController {
        &mut self.form
    }

    pub fn form(&self) -> &WorkoutFormController {
        &self.form
    }

    /// Submit the form: construct the workout variant, render its marker and
    /// list entry, commit it to the store, and persist the whole history.
    pub fn submit_form(&mut self) -> Result<Uuid> {
        let workout = match self.form.submit()? {
            WorkoutRequest::Running {
                coordinates,
                distance_km,
                duration_min,
                cadence_spm,
            } => Workout::running(distance_km, duration_min, coordinates, cadence_spm)?,
            WorkoutRequest::Cycling {
                coordinates,
                distance_km,
                duration_min,
                elevation_gain_m,
            } => Workout::cycling(distance_km, duration_min, coordinates, elevation_gain_m)?,
        };

        self.map.place_marker(&workout)?;
        self.list.append_entry(&workout)?;

        let id = workout.id;
        self.store.add(workout)?;
        self.store.persist(&mut self.blob)?;

        tracing::info!("Logged workout {}", id);
        Ok(id)
    }

    /// Close the form without creating a record.
    pub fn cancel_form(&mut self) {
        self.form.cancel();
    }

    /// A list-entry click navigates the map to that workout's location.
    pub fn handle_list_click(&mut self, id: Uuid) -> Result<()> {
        let coords = self
            .store
            .find_by_id(id)
            .map(|w| w.coordinates)
            .ok_or(Error::NotFound(id))?;
        self.map.center_on(coords)
    }

    pub fn workouts(&self) -> &[Workout] {
        self.store.all()
    }

    pub fn blob(&self) -> &B {
        &self.blob
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::MemoryBlobStore;
    use crate::store::STORAGE_KEY;
    use crate::{WorkoutDetails, WorkoutKind};

    #[derive(Debug, PartialEq)]
    enum MapAction {
        View(Coordinates),
        Marker(Coordinates, String, String),
        Center(Coordinates),
    }

    #[derive(Default)]
    struct RecordingSurface {
        actions: std::rc::Rc<std::cell::RefCell<Vec<MapAction>>>,
    }

    impl MapSurface for RecordingSurface {
        fn init_view(&mut self, center: Coordinates, _zoom: u8) -> Result<()> {
            self.actions.borrow_mut().push(MapAction::View(center));
            Ok(())
        }

        fn place_marker(
            &mut self,
            coords: Coordinates,
            popup_text: &str,
            style_class: &str,
        ) -> Result<()> {
            self.actions.borrow_mut().push(MapAction::Marker(
                coords,
                popup_text.to_string(),
                style_class.to_string(),
            ));
            Ok(())
        }

        fn center_on(&mut self, coords: Coordinates, _zoom: u8) -> Result<()> {
            self.actions.borrow_mut().push(MapAction::Center(coords));
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingList {
        entries: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
    }

    impl WorkoutListView for RecordingList {
        fn append_entry(&mut self, workout: &Workout) -> Result<()> {
            self.entries.borrow_mut().push(workout.description.clone());
            Ok(())
        }
    }

    struct FixedPosition(Coordinates);

    impl GeolocationProvider for FixedPosition {
        fn current_position(&self) -> Result<Coordinates> {
            Ok(self.0)
        }
    }

    struct DeniedPosition;

    impl GeolocationProvider for DeniedPosition {
        fn current_position(&self) -> Result<Coordinates> {
            Err(Error::PositionUnavailable("permission denied".into()))
        }
    }

    type TestApp = AppController<RecordingSurface, RecordingList, MemoryBlobStore>;

    fn build_app() -> (
        TestApp,
        std::rc::Rc<std::cell::RefCell<Vec<MapAction>>>,
        std::rc::Rc<std::cell::RefCell<Vec<String>>>,
    ) {
        let surface = RecordingSurface::default();
        let list = RecordingList::default();
        let actions = surface.actions.clone();
        let entries = list.entries.clone();
        let app = AppController::new(surface, list, MemoryBlobStore::new(), &Config::default());
        (app, actions, entries)
    }

    fn started_app() -> (
        TestApp,
        std::rc::Rc<std::cell::RefCell<Vec<MapAction>>>,
        std::rc::Rc<std::cell::RefCell<Vec<String>>>,
    ) {
        let (mut app, actions, entries) = build_app();
        app.startup(&FixedPosition(Coordinates::new(51.0, 16.0)))
            .unwrap();
        (app, actions, entries)
    }

    #[test]
    fn test_startup_initializes_view_at_current_position() {
        let (_, actions, _) = started_app();
        assert_eq!(
            actions.borrow().first(),
            Some(&MapAction::View(Coordinates::new(51.0, 16.0)))
        );
    }

    #[test]
    fn test_startup_propagates_position_failure() {
        let (mut app, actions, _) = build_app();
        let result = app.startup(&DeniedPosition);
        assert!(matches!(result, Err(Error::PositionUnavailable(_))));
        assert!(actions.borrow().is_empty());
    }

    #[test]
    fn test_click_submit_renders_and_persists() {
        let (mut app, actions, entries) = started_app();

        app.handle_map_click(Coordinates::new(51.0, 16.0));
        assert!(app.form().is_visible());

        app.form_mut().set_distance("5.2");
        app.form_mut().set_duration("30");
        app.form_mut().set_cadence("180");
        let id = app.submit_form().unwrap();

        let workout = app.workouts().iter().find(|w| w.id == id).unwrap();
        assert_eq!(workout.coordinates, Coordinates::new(51.0, 16.0));
        assert!(workout.description.starts_with("Running on"));
        assert!(matches!(
            workout.details,
            WorkoutDetails::Running {
                pace_min_per_km, ..
            } if pace_min_per_km == 6.0
        ));

        // Marker carries the popup text and the kind's style class.
        let recorded = actions.borrow();
        assert!(recorded.iter().any(|a| matches!(
            a,
            MapAction::Marker(coords, text, class)
                if *coords == Coordinates::new(51.0, 16.0)
                    && text.contains("Running on")
                    && class == "running-popup"
        )));
        assert_eq!(entries.borrow().len(), 1);

        // The history reached the blob store.
        assert!(app.blob().read(STORAGE_KEY).unwrap().is_some());
    }

    #[test]
    fn test_persisted_history_restores_equivalent_records() {
        let (mut app, _, _) = started_app();

        app.handle_map_click(Coordinates::new(51.0, 16.0));
        app.form_mut().set_distance("5.2");
        app.form_mut().set_duration("30");
        app.form_mut().set_cadence("180");
        app.submit_form().unwrap();

        let restored = WorkoutStore::restore(app.blob());
        assert_eq!(restored.all(), app.workouts());
    }

    #[test]
    fn test_startup_replays_restored_workouts_in_order() {
        let mut blob = MemoryBlobStore::new();
        let mut history = WorkoutStore::new();
        history
            .add(Workout::running(5.0, 30.0, Coordinates::new(51.0, 16.0), 180.0).unwrap())
            .unwrap();
        history
            .add(Workout::cycling(20.0, 60.0, Coordinates::new(50.0, 19.9), 120.0).unwrap())
            .unwrap();
        history.persist(&mut blob).unwrap();

        let surface = RecordingSurface::default();
        let list = RecordingList::default();
        let actions = surface.actions.clone();
        let entries = list.entries.clone();
        let mut app = AppController::new(surface, list, blob, &Config::default());
        app.startup(&FixedPosition(Coordinates::new(51.0, 16.0)))
            .unwrap();

        assert_eq!(app.workouts().len(), 2);
        assert_eq!(entries.borrow().len(), 2);
        assert!(entries.borrow()[0].starts_with("Running on"));
        assert!(entries.borrow()[1].starts_with("Cycling on"));

        // View first, then the two markers in store order.
        let recorded = actions.borrow();
        assert!(matches!(recorded[0], MapAction::View(_)));
        assert!(
            matches!(&recorded[1], MapAction::Marker(coords, _, _) if *coords == Coordinates::new(51.0, 16.0))
        );
        assert!(
            matches!(&recorded[2], MapAction::Marker(coords, _, _) if *coords == Coordinates::new(50.0, 19.9))
        );
    }

    #[test]
    fn test_corrupt_history_starts_empty() {
        let mut blob = MemoryBlobStore::new();
        blob.write(STORAGE_KEY, "not even close to json").unwrap();

        let surface = RecordingSurface::default();
        let list = RecordingList::default();
        let mut app = AppController::new(surface, list, blob, &Config::default());
        app.startup(&FixedPosition(Coordinates::new(0.0, 0.0)))
            .unwrap();

        assert!(app.workouts().is_empty());
    }

    #[test]
    fn test_list_click_centers_map_on_workout() {
        let (mut app, actions, _) = started_app();

        app.handle_map_click(Coordinates::new(50.0, 19.9));
        app.form_mut().set_kind(WorkoutKind::Cycling);
        app.form_mut().set_distance("20");
        app.form_mut().set_duration("60");
        app.form_mut().set_elevation("350");
        let id = app.submit_form().unwrap();

        app.handle_list_click(id).unwrap();
        assert_eq!(
            actions.borrow().last(),
            Some(&MapAction::Center(Coordinates::new(50.0, 19.9)))
        );
    }

    #[test]
    fn test_list_click_unknown_id_is_not_found() {
        let (mut app, _, _) = started_app();
        let result = app.handle_list_click(Uuid::new_v4());
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_failed_submit_keeps_form_open_and_store_untouched() {
        let (mut app, _, entries) = started_app();

        app.handle_map_click(Coordinates::new(51.0, 16.0));
        app.form_mut().set_distance("0");
        app.form_mut().set_duration("30");
        app.form_mut().set_cadence("180");

        assert!(matches!(
            app.submit_form(),
            Err(Error::InvalidMetric(_))
        ));
        assert!(app.form().is_visible());
        assert!(app.workouts().is_empty());
        assert!(entries.borrow().is_empty());
    }

    #[test]
    fn test_cancel_creates_no_record() {
        let (mut app, _, _) = started_app();

        app.handle_map_click(Coordinates::new(51.0, 16.0));
        app.form_mut().set_distance("5");
        app.cancel_form();

        assert!(!app.form().is_visible());
        assert!(app.workouts().is_empty());
        // Historical behavior: a cancel leaves typed values in place.
        assert_eq!(app.form().fields().distance, "5");
    }
}
