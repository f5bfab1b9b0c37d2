//! Turning raw touches into taps and long presses.

use crate::settings::Settings;
use std::time::Duration;
use vek::*;


/// Stage of a touch sample.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TouchPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

/// One touch sample from the host.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Touch {
    pub phase: TouchPhase,
    /// Number of fingers on the screen after this sample.
    pub fingers: u32,
    /// Screen point, the centroid if several fingers are down.
    pub point: Vec2<f32>,
    /// Timestamp relative to any fixed epoch, as long as it's the same for every sample.
    pub time: Duration,
}

/// A recognized gesture.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Gesture {
    /// Place a cube.
    Tap(Vec2<f32>),
    /// Set off an explosion.
    LongPress(Vec2<f32>),
    /// Hide planes and stop detecting new ones.
    TwoFingerLongPress(Vec2<f32>),
}

/// Recognizes `Gesture`s from a stream of `Touch`es.
///
/// Long presses fire once, as soon as the hold threshold is reached, which requires either another
/// touch sample or a `poll` after that point. Moving further than the slop distance from where
/// the fingers went down abandons the touch.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    long_press: Duration,
    two_finger_long_press: Duration,
    slop: f32,
    active: Option<ActiveTouch>,
}

// state of the touch in progress
#[derive(Debug, Clone)]
struct ActiveTouch {
    fingers: u32,
    max_fingers: u32,
    start_point: Vec2<f32>,
    start_time: Duration,
    // a long press already fired for this touch
    fired: bool,
    // moved too far, nothing more to recognize
    abandoned: bool,
}

impl GestureRecognizer {
    pub fn new(long_press: Duration, two_finger_long_press: Duration, slop: f32) -> Self {
        GestureRecognizer {
            long_press,
            two_finger_long_press,
            slop,
            active: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.long_press(),
            settings.two_finger_long_press(),
            settings.touch_slop,
        )
    }

    /// Feed a touch sample.
    pub fn on_touch(&mut self, touch: Touch) -> Option<Gesture> {
        match touch.phase {
            TouchPhase::Began => {
                match self.active.as_mut() {
                    Some(active) if !active.fired => {
                        // another finger joined, restart the hold from here
                        active.fingers = touch.fingers;
                        active.max_fingers = active.max_fingers.max(touch.fingers);
                        active.start_point = touch.point;
                        active.start_time = touch.time;
                    }
                    Some(active) => {
                        active.fingers = touch.fingers;
                        active.max_fingers = active.max_fingers.max(touch.fingers);
                    }
                    None => {
                        self.active = Some(ActiveTouch {
                            fingers: touch.fingers,
                            max_fingers: touch.fingers,
                            start_point: touch.point,
                            start_time: touch.time,
                            fired: false,
                            abandoned: false,
                        });
                    }
                }
                None
            }
            TouchPhase::Moved => {
                if let Some(active) = self.active.as_mut() {
                    if active.start_point.distance(touch.point) > self.slop {
                        active.abandoned = true;
                    }
                }
                self.poll(touch.time)
            }
            TouchPhase::Ended => {
                let held = self.poll(touch.time);
                if touch.fingers > 0 {
                    // a finger lifted early, don't let the rest turn into another gesture
                    if let Some(active) = self.active.as_mut() {
                        active.fingers = touch.fingers;
                        active.abandoned = true;
                    }
                    return held;
                }
                let active = self.active.take()?;
                if held.is_some() {
                    return held;
                }
                let is_tap = !active.fired
                    && !active.abandoned
                    && active.max_fingers == 1
                    && touch.time.saturating_sub(active.start_time) < self.long_press;
                if is_tap {
                    Some(Gesture::Tap(active.start_point))
                } else {
                    None
                }
            }
            TouchPhase::Cancelled => {
                self.active = None;
                None
            }
        }
    }

    /// Check whether the touch in progress has been held long enough to count as a long press.
    pub fn poll(&mut self, now: Duration) -> Option<Gesture> {
        let active = self.active.as_mut()?;
        if active.fired || active.abandoned {
            return None;
        }
        let (threshold, gesture) = match active.fingers {
            1 => (self.long_press, Gesture::LongPress(active.start_point)),
            2 => (self.two_finger_long_press, Gesture::TwoFingerLongPress(active.start_point)),
            _ => return None,
        };
        if now.saturating_sub(active.start_time) >= threshold {
            active.fired = true;
            Some(gesture)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognizer() -> GestureRecognizer {
        GestureRecognizer::from_settings(&Settings::default())
    }

    fn touch(phase: TouchPhase, fingers: u32, x: f32, ms: u64) -> Touch {
        Touch {
            phase,
            fingers,
            point: Vec2::new(x, 0.0),
            time: Duration::from_millis(ms),
        }
    }

    #[test]
    fn quick_release_is_tap() {
        let mut r = recognizer();
        assert_eq!(r.on_touch(touch(TouchPhase::Began, 1, 5.0, 0)), None);
        assert_eq!(r.poll(Duration::from_millis(100)), None);
        assert_eq!(
            r.on_touch(touch(TouchPhase::Ended, 0, 5.0, 150)),
            Some(Gesture::Tap(Vec2::new(5.0, 0.0))),
        );
    }

    #[test]
    fn long_press_fires_once_on_recognition() {
        let mut r = recognizer();
        r.on_touch(touch(TouchPhase::Began, 1, 5.0, 0));
        assert_eq!(r.poll(Duration::from_millis(499)), None);
        assert_eq!(
            r.poll(Duration::from_millis(500)),
            Some(Gesture::LongPress(Vec2::new(5.0, 0.0))),
        );
        assert_eq!(r.poll(Duration::from_millis(900)), None);
        assert_eq!(r.on_touch(touch(TouchPhase::Ended, 0, 5.0, 1000)), None);
    }

    #[test]
    fn long_press_recognized_on_release_if_not_polled() {
        let mut r = recognizer();
        r.on_touch(touch(TouchPhase::Began, 1, 5.0, 0));
        assert_eq!(
            r.on_touch(touch(TouchPhase::Ended, 0, 5.0, 700)),
            Some(Gesture::LongPress(Vec2::new(5.0, 0.0))),
        );
    }

    #[test]
    fn two_finger_long_press_needs_longer_hold() {
        let mut r = recognizer();
        r.on_touch(touch(TouchPhase::Began, 1, 5.0, 0));
        r.on_touch(touch(TouchPhase::Began, 2, 6.0, 20));
        assert_eq!(r.poll(Duration::from_millis(600)), None);
        assert_eq!(
            r.poll(Duration::from_millis(1020)),
            Some(Gesture::TwoFingerLongPress(Vec2::new(6.0, 0.0))),
        );
        assert_eq!(r.on_touch(touch(TouchPhase::Ended, 1, 6.0, 1100)), None);
        assert_eq!(r.on_touch(touch(TouchPhase::Ended, 0, 6.0, 1200)), None);
    }

    #[test]
    fn two_finger_quick_release_is_not_tap() {
        let mut r = recognizer();
        r.on_touch(touch(TouchPhase::Began, 2, 5.0, 0));
        assert_eq!(r.on_touch(touch(TouchPhase::Ended, 0, 5.0, 100)), None);
    }

    #[test]
    fn moving_abandons_touch() {
        let mut r = recognizer();
        r.on_touch(touch(TouchPhase::Began, 1, 0.0, 0));
        assert_eq!(r.on_touch(touch(TouchPhase::Moved, 1, 50.0, 50)), None);
        assert_eq!(r.poll(Duration::from_millis(800)), None);
        assert_eq!(r.on_touch(touch(TouchPhase::Ended, 0, 50.0, 900)), None);
    }

    #[test]
    fn small_wobble_still_taps() {
        let mut r = recognizer();
        r.on_touch(touch(TouchPhase::Began, 1, 0.0, 0));
        r.on_touch(touch(TouchPhase::Moved, 1, 3.0, 30));
        assert_eq!(
            r.on_touch(touch(TouchPhase::Ended, 0, 3.0, 60)),
            Some(Gesture::Tap(Vec2::new(0.0, 0.0))),
        );
    }

    #[test]
    fn lifting_one_of_two_fingers_abandons() {
        let mut r = recognizer();
        r.on_touch(touch(TouchPhase::Began, 2, 0.0, 0));
        assert_eq!(r.on_touch(touch(TouchPhase::Ended, 1, 0.0, 300)), None);
        assert_eq!(r.poll(Duration::from_millis(900)), None);
        assert_eq!(r.on_touch(touch(TouchPhase::Ended, 0, 0.0, 1500)), None);
    }

    #[test]
    fn oversized_hold_setting_uses_default() {
        let settings = Settings {
            long_press_secs: 1e30,
            ..Settings::default()
        };
        let mut r = GestureRecognizer::from_settings(&settings);
        r.on_touch(touch(TouchPhase::Began, 1, 5.0, 0));
        assert_eq!(
            r.poll(Duration::from_millis(500)),
            Some(Gesture::LongPress(Vec2::new(5.0, 0.0))),
        );
    }

    #[test]
    fn cancel_resets() {
        let mut r = recognizer();
        r.on_touch(touch(TouchPhase::Began, 1, 0.0, 0));
        r.on_touch(touch(TouchPhase::Cancelled, 0, 0.0, 10));
        assert_eq!(r.poll(Duration::from_millis(1000)), None);
        assert_eq!(r.on_touch(touch(TouchPhase::Ended, 0, 0.0, 1000)), None);
    }
}
