//! Scalar tweens and sequential tween queues driven by the frame clock

use std::collections::VecDeque;

use bevy::math::curve::Curve;
use bevy::math::curve::easing::EaseFunction;
use bevy::prelude::*;

/// A single eased interpolation from a captured start value to an end value.
///
/// The start value is captured at construction, so retargeting mid-flight
/// (building a new tween from the current animated value) never snaps.
#[derive(Clone, Reflect, Debug)]
pub struct Tween {
    start:    f32,
    end:      f32,
    duration: f32,
    elapsed:  f32,
    easing:   EaseFunction,
}

impl Tween {
    pub const fn new(start: f32, end: f32, duration: f32, easing: EaseFunction) -> Self {
        Self {
            start,
            end,
            duration,
            elapsed: 0.0,
            easing,
        }
    }

    pub const fn end(&self) -> f32 {
        self.end
    }

    /// Current eased value for the accumulated elapsed time
    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.end;
        }
        let t = (self.elapsed / self.duration).min(1.0);
        let t_interp = self.easing.sample_unchecked(t);
        (self.end - self.start).mul_add(t_interp, self.start)
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advances elapsed time and returns the new value
    pub fn advance(&mut self, delta: f32) -> f32 {
        self.elapsed = (self.elapsed + delta).min(self.duration);
        self.value()
    }
}

/// Tweens played back to back, each one starting when the previous finishes
#[derive(Clone, Reflect, Debug, Default)]
pub struct TweenQueue {
    moves: VecDeque<Tween>,
}

impl TweenQueue {
    pub fn new(moves: impl IntoIterator<Item = Tween>) -> Self {
        Self {
            moves: moves.into_iter().collect(),
        }
    }

    pub fn finished(&self) -> bool {
        self.moves.is_empty()
    }

    /// Advances the front tween; pops it once complete so the next
    /// tween starts on the following frame.
    pub fn advance(&mut self, delta: f32) -> Option<f32> {
        let front = self.moves.front_mut()?;
        let value = front.advance(delta);
        if front.finished() {
            self.moves.pop_front();
        }
        Some(value)
    }
}

/// Drives an optional tween slot, writing into `value` and clearing the
/// slot once the tween settles on its end value.
pub(crate) fn drive(slot: &mut Option<Tween>, value: &mut f32, delta: f32) {
    let Some(tween) = slot.as_mut() else {
        return;
    };
    *value = tween.advance(delta);
    if tween.finished() {
        *slot = None;
    }
}

/// Queue variant of [`drive`]
pub(crate) fn drive_queue(slot: &mut Option<TweenQueue>, value: &mut f32, delta: f32) {
    let Some(queue) = slot.as_mut() else {
        return;
    };
    if let Some(sampled) = queue.advance(delta) {
        *value = sampled;
    }
    if queue.finished() {
        *slot = None;
    }
}
