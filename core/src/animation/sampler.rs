use psxrender_shared::{FixedPoint, Quaternion, Vec3};

use super::clip::{AnimationKey, KeyData, SkeletalAnimation};
use crate::armature::Armature;

/// Write the pose of `animation` at `normalized_time` (0..=1 over the clip)
/// into the local transforms of `armature`.
///
/// Joints without a track keep whatever they had. Global transforms are not
/// touched; follow with [`Armature::calculate_transforms`].
///
/// # Panics
///
/// If a track targets a joint past the end of the armature.
pub fn animate_armature(armature: &mut Armature, animation: &SkeletalAnimation, normalized_time: FixedPoint) {
    let current_frame = normalized_time * FixedPoint::from_int(animation.length as i32);
    let count = armature.len();

    for track in &animation.tracks {
        let Some(joint) = armature.joint_mut(track.joint) else {
            panic!("animation track targets joint {}, but the armature only has {count} joints", track.joint);
        };
        let local = &mut joint.local_transform;

        let (prev, next, factor) = match track.keys.as_slice() {
            [] => continue,
            [only] => {
                apply(&mut local.rotation, &mut local.translation, only.data);
                continue;
            }
            keys => bracket(keys, current_frame),
        };

        match (prev.data, next.data) {
            (KeyData::Rotation(p), KeyData::Rotation(n)) => {
                local.rotation = Quaternion::slerp(&n, &p, factor);
            }
            (KeyData::Translation(p), KeyData::Translation(n)) => {
                local.translation = Vec3::lerp(n, p, factor);
            }
            _ => {}
        }
    }
}

fn apply(rotation: &mut Quaternion, translation: &mut Vec3, data: KeyData) {
    match data {
        KeyData::Rotation(q) => *rotation = q,
        KeyData::Translation(t) => *translation = t,
    }
}

/// Keys around `frame` and the weight of the earlier one.
///
/// Searches from the last key down for the first `k` with
/// `frame >= keys[k - 1].frame`, falling back to `k = 1`. The weight is
/// clamped so frames outside the keyed range hold the end key.
fn bracket(keys: &[AnimationKey], frame: FixedPoint) -> (&AnimationKey, &AnimationKey, FixedPoint) {
    let k = (1..keys.len())
        .rev()
        .find(|&k| frame >= keys[k - 1].frame)
        .unwrap_or(1);
    let prev = &keys[k - 1];
    let next = &keys[k];

    let span = next.frame - prev.frame;
    let factor = if span > FixedPoint::ZERO {
        ((next.frame - frame) / span).clamp(FixedPoint::ZERO, FixedPoint::ONE)
    } else {
        FixedPoint::ZERO
    };
    (prev, next, factor)
}
