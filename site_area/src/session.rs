//! A single area-calculator editing session.
//!
//! The session owns the one shape being edited and the area derived from
//! it. Every geometry change goes through a method here, which recomputes
//! the area immediately; the area itself cannot be set.

use crate::area::shape_area;
use crate::config::CalculatorConfig;
use crate::error::{GeometryError, SaveError, ShapeError, ValidationError};
use crate::geometry::{Bounds, LatLng, Shape};
use crate::io::shape_data;
use crate::record::{AreaRecord, AreasApi, JobTarget, NewArea};
use crate::units::Unit;

/// Where a session is in the draw/name/save cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing drawn.
    Empty,
    /// A shape and its area are known.
    Drawn,
    /// A shape is drawn and the save form has been started.
    NamingForSave,
    /// The current shape has been persisted.
    Saved,
}

#[derive(Debug, Clone)]
pub struct AreaSession {
    config: CalculatorConfig,
    state: SessionState,
    shape: Option<Shape>,
    area_m2: f64,
    unit: Unit,
    area_name: String,
    job: Option<JobTarget>,
    stored_area_hint: Option<f64>,
}

impl AreaSession {
    pub fn new(config: CalculatorConfig) -> Self {
        Self {
            config,
            state: SessionState::Empty,
            shape: None,
            area_m2: 0.0,
            unit: config.default_unit,
            area_name: String::new(),
            job: None,
            stored_area_hint: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    /// Area of the current shape in square meters, 0 when nothing is drawn.
    pub fn area_m2(&self) -> f64 {
        self.area_m2
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Changes the display unit; the canonical area is unaffected.
    pub fn set_unit(&mut self, unit: Unit) {
        self.unit = unit;
    }

    /// Area in the display unit at display precision, e.g. `"338157.89"`.
    pub fn display_area(&self) -> String {
        self.unit.format(self.area_m2)
    }

    /// Area with its unit label, e.g. `"338157.89 sq ft"`.
    pub fn display_label(&self) -> String {
        format!("{} {}", self.display_area(), self.unit.label())
    }

    /// The `area_value` of the last loaded record converted to square
    /// meters. Only a hint: it carries the rounding applied when it was
    /// saved, whereas [`area_m2`](Self::area_m2) is recomputed from geometry.
    pub fn stored_area_hint(&self) -> Option<f64> {
        self.stored_area_hint
    }

    pub fn area_name(&self) -> &str {
        &self.area_name
    }

    pub fn job(&self) -> Option<JobTarget> {
        self.job
    }

    /// Replaces any current shape with `shape`.
    pub fn draw(&mut self, shape: Shape) {
        self.shape = Some(shape);
        self.stored_area_hint = None;
        self.recompute();
        self.state = SessionState::Drawn;
    }

    pub fn push_vertex(&mut self, p: LatLng) -> Result<(), GeometryError> {
        self.edit(|s| s.push_vertex(p))
    }

    pub fn move_vertex(&mut self, index: usize, to: LatLng) -> Result<(), GeometryError> {
        self.edit(|s| s.move_vertex(index, to))
    }

    pub fn set_bounds(&mut self, bounds: Bounds) -> Result<(), GeometryError> {
        self.edit(|s| s.set_bounds(bounds))
    }

    pub fn set_radius(&mut self, radius_m: f64) -> Result<(), GeometryError> {
        self.edit(|s| s.set_radius(radius_m))
    }

    pub fn set_center(&mut self, center: LatLng) -> Result<(), GeometryError> {
        self.edit(|s| s.set_center(center))
    }

    fn edit<F>(&mut self, f: F) -> Result<(), GeometryError>
    where
        F: FnOnce(&mut Shape) -> Result<(), GeometryError>,
    {
        let shape = self.shape.as_mut().ok_or(GeometryError::NoShape)?;
        f(shape)?;
        self.recompute();
        if self.state == SessionState::Saved {
            self.state = SessionState::Drawn;
        }
        Ok(())
    }

    fn recompute(&mut self) {
        self.area_m2 = self
            .shape
            .as_ref()
            .map_or(0.0, |s| shape_area(s, self.config.method));
    }

    pub fn set_area_name(&mut self, name: impl Into<String>) {
        self.area_name = name.into();
        self.enter_naming();
    }

    pub fn select_job(&mut self, job: JobTarget) {
        self.job = Some(job);
        self.enter_naming();
    }

    fn enter_naming(&mut self) {
        if self.shape.is_some() {
            self.state = SessionState::NamingForSave;
        }
    }

    /// Discards the shape and its area. The name and job selection stay so
    /// the next shape can be saved under them.
    pub fn clear(&mut self) {
        self.shape = None;
        self.area_m2 = 0.0;
        self.stored_area_hint = None;
        self.state = SessionState::Empty;
    }

    /// Checks the save preconditions without contacting the API.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.shape.is_none() || self.area_m2.is_nan() || self.area_m2 <= 0.0 {
            return Err(ValidationError::EmptyShape);
        }
        if self.unit.round(self.unit.from_m2(self.area_m2)) == 0.0 {
            return Err(ValidationError::RoundsToZero(self.unit));
        }
        if self.area_name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.job.is_none() {
            return Err(ValidationError::NoJobSelected);
        }
        Ok(())
    }

    /// Builds the `POST /areas` body for the current shape.
    pub fn new_area(&self, user_id: i64) -> Result<NewArea, SaveError> {
        self.validate()?;
        let (Some(shape), Some(job)) = (self.shape.as_ref(), self.job) else {
            return Err(ValidationError::EmptyShape.into());
        };
        Ok(NewArea {
            user_id,
            job_id: job.job_id,
            customer_id: job.customer_id,
            area_name: self.area_name.trim().to_string(),
            area_value: self.display_area(),
            unit: self.unit.code().to_string(),
            shape_data: shape_data::to_json(shape)?,
        })
    }

    /// Saves the current shape through `api`.
    ///
    /// Nothing is sent when a precondition fails. When the API call fails
    /// the session returns to [`SessionState::Drawn`] so the save can be
    /// retried.
    pub fn save<A: AreasApi>(&mut self, api: &mut A, user_id: i64) -> Result<AreaRecord, SaveError> {
        let request = self.new_area(user_id)?;
        match api.create_area(&request) {
            Ok(record) => {
                log::info!(
                    "saved `{}` as {} {}",
                    record.area_name,
                    request.area_value,
                    request.unit
                );
                self.state = SessionState::Saved;
                Ok(record)
            }
            Err(e) => {
                log::warn!("save of `{}` failed: {}", request.area_name, e);
                self.state = SessionState::Drawn;
                Err(SaveError::Api(e.to_string()))
            }
        }
    }

    /// Loads a saved area for re-editing.
    ///
    /// The area is recomputed from the stored geometry; the stored value is
    /// kept only as [`stored_area_hint`](Self::stored_area_hint). A record
    /// whose shape cannot be decoded leaves the session untouched.
    pub fn load(&mut self, record: &AreaRecord) -> Result<(), ShapeError> {
        let shape = record.shape().map_err(|e| {
            log::warn!("could not load area {}: {}", record.id, e);
            e
        })?;
        self.draw(shape);
        self.unit = record.unit();
        self.stored_area_hint = Some(record.stored_area_m2());
        self.area_name = record.area_name.clone();
        self.job = Some(JobTarget::new(record.job_id, record.customer_id));
        Ok(())
    }
}

impl Default for AreaSession {
    fn default() -> Self {
        Self::new(CalculatorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::AreaMethod;

    #[derive(Default)]
    struct RecordingApi {
        calls: Vec<NewArea>,
        fail: bool,
    }

    impl AreasApi for RecordingApi {
        type Error = String;

        fn create_area(&mut self, area: &NewArea) -> Result<AreaRecord, String> {
            self.calls.push(area.clone());
            if self.fail {
                return Err("503 Service Unavailable".into());
            }
            Ok(AreaRecord {
                id: self.calls.len() as i64,
                user_id: area.user_id,
                job_id: area.job_id,
                customer_id: area.customer_id,
                area_name: area.area_name.clone(),
                area_value: area.area_value.parse().map_err(|_| "bad value".to_string())?,
                unit: area.unit.clone(),
                shape_data: area.shape_data.clone().into(),
                created_at: None,
            })
        }

        fn areas_for_job(&self, _job_id: i64, _user_id: i64) -> Result<Vec<AreaRecord>, String> {
            Ok(Vec::new())
        }

        fn areas_for_user(&self, _user_id: i64) -> Result<Vec<AreaRecord>, String> {
            Ok(Vec::new())
        }

        fn delete_area(&mut self, _id: i64, _user_id: i64) -> Result<bool, String> {
            Ok(false)
        }
    }

    fn circle(radius: f64) -> Shape {
        Shape::circle(LatLng::new(45.0, -93.0), radius).unwrap()
    }

    #[test]
    fn save_without_shape_never_calls_api() {
        let mut session = AreaSession::default();
        session.set_area_name("Patio");
        session.select_job(JobTarget::new(3, Some(2)));
        let mut api = RecordingApi::default();
        let err = session.save(&mut api, 1).unwrap_err();
        assert!(matches!(err, SaveError::Invalid(ValidationError::EmptyShape)));
        assert!(api.calls.is_empty());
        assert_eq!(session.state(), SessionState::Empty);
    }

    #[test]
    fn save_preconditions_in_order() {
        let mut session = AreaSession::default();
        session.draw(circle(0.0));
        assert_eq!(session.validate(), Err(ValidationError::EmptyShape));
        session.set_radius(10.0).unwrap();
        assert_eq!(session.validate(), Err(ValidationError::MissingName));
        session.set_area_name("   ");
        assert_eq!(session.validate(), Err(ValidationError::MissingName));
        session.set_area_name("Pool");
        assert_eq!(session.validate(), Err(ValidationError::NoJobSelected));
        session.select_job(JobTarget::new(3, None));
        assert_eq!(session.validate(), Ok(()));
    }

    #[test]
    fn area_below_display_precision_is_not_saved() {
        let mut session = AreaSession::new(CalculatorConfig::new(Unit::Acres, AreaMethod::Spherical));
        session.draw(circle(0.1));
        session.set_area_name("Survey pin");
        session.select_job(JobTarget::new(3, None));
        assert!(session.area_m2() > 0.0);
        assert_eq!(session.display_area(), "0.0000");

        let mut api = RecordingApi::default();
        let err = session.save(&mut api, 1).unwrap_err();
        assert!(matches!(
            err,
            SaveError::Invalid(ValidationError::RoundsToZero(Unit::Acres))
        ));
        assert!(api.calls.is_empty());

        session.set_unit(Unit::SquareFeet);
        assert_eq!(session.validate(), Ok(()));
    }

    #[test]
    fn successful_save_sends_display_value() {
        let mut session = AreaSession::default();
        session.draw(circle(100.0));
        assert_eq!(session.state(), SessionState::Drawn);
        session.set_area_name("Back lot");
        session.select_job(JobTarget::new(3, Some(2)));
        assert_eq!(session.state(), SessionState::NamingForSave);

        let mut api = RecordingApi::default();
        let rec = session.save(&mut api, 1).unwrap();
        assert_eq!(session.state(), SessionState::Saved);
        assert_eq!(rec.id, 1);

        let sent = &api.calls[0];
        assert_eq!(sent.area_value, "338157.89");
        assert_eq!(sent.unit, "sqft");
        assert_eq!(sent.customer_id, Some(2));
        assert_eq!(
            sent.shape_data,
            r#"{"type":"circle","center":{"lat":45.0,"lng":-93.0},"radius":100.0}"#
        );
    }

    #[test]
    fn failed_save_returns_to_drawn() {
        let mut session = AreaSession::default();
        session.draw(circle(5.0));
        session.set_area_name("Shed");
        session.select_job(JobTarget::new(4, None));
        let mut api = RecordingApi {
            fail: true,
            ..Default::default()
        };
        assert!(matches!(session.save(&mut api, 1), Err(SaveError::Api(_))));
        assert_eq!(session.state(), SessionState::Drawn);
        assert!(session.shape().is_some());

        api.fail = false;
        assert!(session.save(&mut api, 1).is_ok());
        assert_eq!(api.calls.len(), 2);
    }

    #[test]
    fn edits_recompute_area() {
        let mut session = AreaSession::new(CalculatorConfig::new(Unit::SquareMeters, AreaMethod::Spherical));
        session.draw(Shape::polygon(vec![LatLng::new(0.0, 0.0), LatLng::new(0.0, 0.001)]).unwrap());
        assert_eq!(session.area_m2(), 0.0);
        session.push_vertex(LatLng::new(0.001, 0.001)).unwrap();
        let triangle = session.area_m2();
        assert!(triangle > 0.0);
        session.push_vertex(LatLng::new(0.001, 0.0)).unwrap();
        assert!((session.area_m2() - 2.0 * triangle).abs() < 0.1);
        session.move_vertex(3, LatLng::new(0.002, 0.0)).unwrap();
        assert!(session.area_m2() > 2.0 * triangle);
        assert!(session.set_radius(3.0).is_err());
    }

    #[test]
    fn editing_after_save_marks_drawn() {
        let mut session = AreaSession::default();
        session.draw(circle(5.0));
        session.set_area_name("Shed");
        session.select_job(JobTarget::new(4, None));
        session.save(&mut RecordingApi::default(), 1).unwrap();
        session.set_center(LatLng::new(45.1, -93.0)).unwrap();
        assert_eq!(session.state(), SessionState::Drawn);
    }

    #[test]
    fn clear_discards_geometry_only() {
        let mut session = AreaSession::default();
        session.draw(circle(5.0));
        session.set_area_name("Shed");
        session.clear();
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.shape().is_none());
        assert_eq!(session.area_m2(), 0.0);
        assert_eq!(session.area_name(), "Shed");
        assert_eq!(session.set_radius(1.0), Err(GeometryError::NoShape));
    }

    #[test]
    fn load_recomputes_from_geometry() {
        let record = AreaRecord {
            id: 9,
            user_id: 1,
            job_id: 3,
            customer_id: Some(2),
            area_name: "Back lot".into(),
            area_value: 7.76,
            unit: "acres".into(),
            shape_data: r#"{"type":"circle","center":{"lat":45,"lng":-93},"radius":100}"#.into(),
            created_at: None,
        };
        let mut session = AreaSession::default();
        session.load(&record).unwrap();
        assert_eq!(session.state(), SessionState::Drawn);
        assert_eq!(session.unit(), Unit::Acres);
        assert!((session.area_m2() - 31_415.926_535).abs() < 1e-5);
        let hint = session.stored_area_hint().unwrap();
        assert!((hint - 7.76 / 0.000247105).abs() < 1e-6);
        assert!((hint - session.area_m2()).abs() > 1.0);
        assert_eq!(session.display_label(), "7.7630 acres");
        assert_eq!(session.job(), Some(JobTarget::new(3, Some(2))));
    }

    #[test]
    fn malformed_record_leaves_session_untouched() {
        let mut session = AreaSession::default();
        session.draw(circle(5.0));
        let record = AreaRecord {
            id: 10,
            user_id: 1,
            job_id: 3,
            customer_id: None,
            area_name: "Broken".into(),
            area_value: 1.0,
            unit: "sqm".into(),
            shape_data: r#"{"radius":3}"#.into(),
            created_at: None,
        };
        assert!(matches!(session.load(&record), Err(ShapeError::Malformed(_))));
        assert_eq!(session.shape(), Some(&circle(5.0)));
        assert_eq!(session.area_name(), "");
    }
}
