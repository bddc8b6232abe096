//! Skeletal animation clips and playback.
//!
//! Clips are keyframed per joint and per channel. [`animate_armature`]
//! samples a clip at a normalized time into an armature's local transforms,
//! and [`SkeletonAnimator`] advances that time tick by tick.

mod animator;
mod clip;
mod sampler;


pub use animator::{DEFAULT_PLAYBACK_SPEED, SkeletonAnimator};
pub use clip::{
    AnimationKey, AnimationSet, AnimationTrack, KeyData, LOOPED, SkeletalAnimation, TrackType,
};
pub use sampler::animate_armature;
