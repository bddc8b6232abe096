use std::sync::Arc;

use psxrender_shared::{FixedPoint, StringHash};

use super::clip::{AnimationSet, SkeletalAnimation};
use super::sampler::animate_armature;
use crate::armature::Armature;

/// Fraction of a clip advanced per tick by default (0.04).
pub const DEFAULT_PLAYBACK_SPEED: FixedPoint = FixedPoint::from_f64(0.04);

/// Playback state for one animated object.
///
/// Time is normalized: 0 is the first frame of the clip and 1 the last.
/// Negative speeds play backwards.
#[derive(Clone, Debug)]
pub struct SkeletonAnimator {
    animations: Arc<AnimationSet>,
    current: Option<usize>,
    normalized_time: FixedPoint,
    prev_normalized_time: FixedPoint,
    playback_speed: FixedPoint,
    ended: bool,
    just_ended: bool,
}

impl Default for SkeletonAnimator {
    fn default() -> Self {
        Self::new(Arc::default())
    }
}

impl SkeletonAnimator {
    pub fn new(animations: Arc<AnimationSet>) -> Self {
        Self {
            animations,
            current: None,
            normalized_time: FixedPoint::ZERO,
            prev_normalized_time: FixedPoint::ZERO,
            playback_speed: DEFAULT_PLAYBACK_SPEED,
            ended: false,
            just_ended: false,
        }
    }

    pub fn animations(&self) -> &Arc<AnimationSet> {
        &self.animations
    }

    /// Swap the clip set. Stops playback.
    pub fn set_animations(&mut self, animations: Arc<AnimationSet>) {
        self.animations = animations;
        self.clear();
    }

    /// Start playing `name`.
    ///
    /// Does nothing if `name` is already playing at `speed`. A `start` of
    /// zero means the natural start: 0 going forward, 1 going backward.
    pub fn set_animation(&mut self, name: StringHash, speed: FixedPoint, start: FixedPoint) {
        if self.current_animation_name() == Some(name) && self.playback_speed == speed {
            return;
        }

        let Some(index) = self.animations.index_of(name) else {
            tracing::warn!(animation = %name, hash = name.value(), "animation not found");
            return;
        };

        self.current = Some(index);
        self.playback_speed = speed;
        self.normalized_time = if start != FixedPoint::ZERO {
            start
        } else if speed < FixedPoint::ZERO {
            FixedPoint::ONE
        } else {
            FixedPoint::ZERO
        };
        self.prev_normalized_time = self.normalized_time;
        self.ended = false;
        self.just_ended = false;
        tracing::trace!(animation = %name, speed = %speed, "animation started");
    }

    /// Advance one tick.
    pub fn update(&mut self) {
        self.just_ended = false;
        let Some(looped) = self.current_animation().map(SkeletalAnimation::is_looped) else {
            return;
        };
        if self.ended {
            self.prev_normalized_time = self.normalized_time;
            return;
        }

        self.prev_normalized_time = self.normalized_time;
        let mut t = self.normalized_time + self.playback_speed;

        if !looped {
            if t > FixedPoint::ONE {
                t = FixedPoint::ONE;
                self.ended = true;
            } else if t < FixedPoint::ZERO {
                t = FixedPoint::ZERO;
                self.ended = true;
            }
            self.just_ended = self.ended;
        } else if t > FixedPoint::ONE {
            t -= FixedPoint::ONE;
            self.just_ended = true;
        } else if t < FixedPoint::ZERO {
            t = FixedPoint::ONE;
            self.just_ended = true;
        }

        self.normalized_time = t;
    }

    /// True on the tick a loop wrapped or a one-shot clip reached its end.
    pub fn animation_just_ended(&self) -> bool {
        self.just_ended
    }

    pub fn current_animation_frame(&self) -> i32 {
        self.frame_at(self.normalized_time)
    }

    pub fn frame_just_changed(&self) -> bool {
        self.frame_at(self.prev_normalized_time) != self.current_animation_frame()
    }

    fn frame_at(&self, t: FixedPoint) -> i32 {
        self.animation_length()
            .map_or(0, |length| (t * FixedPoint::from_int(length as i32)).integer())
    }

    /// Pose `armature` at the current time and refresh its global transforms.
    pub fn animate(&self, armature: &mut Armature) {
        if armature.is_empty() {
            return;
        }
        let Some(animation) = self.current_animation() else {
            return;
        };
        animate_armature(armature, animation, self.normalized_time);
        armature.calculate_transforms();
    }

    pub fn current_animation(&self) -> Option<&SkeletalAnimation> {
        self.current.and_then(|i| self.animations.get(i))
    }

    pub fn current_animation_name(&self) -> Option<StringHash> {
        self.current_animation().map(|a| a.name)
    }

    /// Current clip length in frames.
    pub fn animation_length(&self) -> Option<u16> {
        self.current_animation().map(|a| a.length)
    }

    pub fn normalized_time(&self) -> FixedPoint {
        self.normalized_time
    }

    pub fn playback_speed(&self) -> FixedPoint {
        self.playback_speed
    }

    /// A clip is selected and has not run out.
    pub fn is_playing(&self) -> bool {
        self.current.is_some() && !self.ended
    }

    /// Stop playback and forget the current clip.
    pub fn clear(&mut self) {
        self.current = None;
        self.normalized_time = FixedPoint::ZERO;
        self.prev_normalized_time = FixedPoint::ZERO;
        self.ended = false;
        self.just_ended = false;
    }
}
