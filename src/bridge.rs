use serde::Serialize;
use std::cell::RefCell;
use tracing::{debug, warn};

/// A GPS fix as forwarded to the host platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// A three-axis sample (accelerometer and gyroscope share this shape)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Handler invoked when the host platform sends text back
pub type TextHandler = Box<dyn Fn(&str)>;

/// Push channel to the host-platform counterpart.
///
/// All pushes are fire-and-forget; the one inbound path is the text handler
/// registered via `set_text_handler`. Exactly one handler is active at a
/// time, registering again replaces it.
pub trait Bridge {
    fn push_coordinate(&self, coord: Coordinate);
    fn push_accel(&self, sample: AxisSample);
    fn push_gyro(&self, sample: AxisSample);
    fn push_brightness(&self, value: f64);
    /// Push the serialized settings document
    fn push_settings(&self, json: &str);
    /// Register the handler for inbound host text
    fn set_text_handler(&self, handler: TextHandler);
}

/// Bridge implementation that logs pushes and caches the last value seen on
/// each channel. Stands in for the host-platform counterpart when none is
/// attached (development, tests, headless runs).
#[derive(Default)]
pub struct LogBridge {
    last_coordinate: RefCell<Option<Coordinate>>,
    last_accel: RefCell<Option<AxisSample>>,
    last_gyro: RefCell<Option<AxisSample>>,
    last_brightness: RefCell<Option<f64>>,
    last_settings: RefCell<Option<String>>,
    text_handler: RefCell<Option<TextHandler>>,
}

impl LogBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_coordinate(&self) -> Option<Coordinate> {
        *self.last_coordinate.borrow()
    }

    pub fn last_accel(&self) -> Option<AxisSample> {
        *self.last_accel.borrow()
    }

    pub fn last_gyro(&self) -> Option<AxisSample> {
        *self.last_gyro.borrow()
    }

    pub fn last_brightness(&self) -> Option<f64> {
        *self.last_brightness.borrow()
    }

    pub fn last_settings(&self) -> Option<String> {
        self.last_settings.borrow().clone()
    }

    /// Entry point for text arriving from the host side
    pub fn receive_text(&self, text: &str) {
        match &*self.text_handler.borrow() {
            Some(handler) => handler(text),
            None => warn!(text, "host text received but no handler is registered"),
        }
    }
}

impl Bridge for LogBridge {
    fn push_coordinate(&self, coord: Coordinate) {
        debug!(lat = coord.lat, lon = coord.lon, "push coordinate");
        *self.last_coordinate.borrow_mut() = Some(coord);
    }

    fn push_accel(&self, sample: AxisSample) {
        debug!(x = sample.x, y = sample.y, z = sample.z, "push accel");
        *self.last_accel.borrow_mut() = Some(sample);
    }

    fn push_gyro(&self, sample: AxisSample) {
        debug!(x = sample.x, y = sample.y, z = sample.z, "push gyro");
        *self.last_gyro.borrow_mut() = Some(sample);
    }

    fn push_brightness(&self, value: f64) {
        debug!(value, "push brightness");
        *self.last_brightness.borrow_mut() = Some(value);
    }

    fn push_settings(&self, json: &str) {
        debug!(json, "push settings");
        *self.last_settings.borrow_mut() = Some(json.to_string());
    }

    fn set_text_handler(&self, handler: TextHandler) {
        *self.text_handler.borrow_mut() = Some(handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_push_settings_caches_last_blob() {
        let bridge = LogBridge::new();
        bridge.push_settings("{\"avgAccel\":true}");
        bridge.push_settings("{\"avgAccel\":false}");
        assert_eq!(
            bridge.last_settings().as_deref(),
            Some("{\"avgAccel\":false}")
        );
    }

    #[test]
    fn test_sensor_pushes_cache_last_sample() {
        let bridge = LogBridge::new();
        bridge.push_coordinate(Coordinate { lat: 52.5, lon: 13.4 });
        bridge.push_accel(AxisSample { x: 0.1, y: 0.2, z: 9.8 });
        bridge.push_brightness(340.0);
        assert_eq!(
            bridge.last_coordinate(),
            Some(Coordinate { lat: 52.5, lon: 13.4 })
        );
        assert_eq!(bridge.last_accel().map(|s| s.z), Some(9.8));
        assert_eq!(bridge.last_brightness(), Some(340.0));
        assert_eq!(bridge.last_gyro(), None);
    }

    #[test]
    fn test_receive_text_reaches_registered_handler() {
        let bridge = LogBridge::new();
        let seen = Rc::new(RefCell::new(String::new()));
        let seen_clone = Rc::clone(&seen);
        bridge.set_text_handler(Box::new(move |text| {
            *seen_clone.borrow_mut() = text.to_string();
        }));
        bridge.receive_text("feedback from host");
        assert_eq!(*seen.borrow(), "feedback from host");
    }

    #[test]
    fn test_receive_text_without_handler_is_ignored() {
        let bridge = LogBridge::new();
        // must not panic, only log
        bridge.receive_text("nobody listening");
    }

    #[test]
    fn test_handler_can_be_replaced() {
        let bridge = LogBridge::new();
        let count = Rc::new(Cell::new(0));
        let first = Rc::clone(&count);
        bridge.set_text_handler(Box::new(move |_| first.set(first.get() + 1)));
        bridge.receive_text("one");

        let second = Rc::clone(&count);
        bridge.set_text_handler(Box::new(move |_| second.set(second.get() + 10)));
        bridge.receive_text("two");
        assert_eq!(count.get(), 11);
    }
}
