//! Animation blob format.
//!
//! # Layout
//! ```text
//! u32 animation_count
//! animation_count × animation:
//!   u32 name hash, u32 flags, u16 length, u16 track_count
//!   track_count × track:
//!     u8 type (0 rotation, 1 translation), u8 joint, u16 key_count
//!     key_count × key:
//!       i32 frame (20.12)
//!       rotation:    i16 w, x, y, z
//!       translation: i16 x, y, z, pad
//! ```

use psxrender_shared::{FixedPoint, PackedVec3, Quaternion, StringHash};

use super::model::write_short_vec;
use super::reader::{ByteReader, ByteWriter};
use crate::animation::{
    AnimationKey, AnimationSet, AnimationTrack, KeyData, SkeletalAnimation, TrackType,
};
use crate::armature::{Armature, MAX_JOINTS};
use crate::error::AssetError;

/// Parse animations.
///
/// Tracks are checked for known types, sorted keys and joints within the
/// largest possible armature. Use [`load_animations_for`] to check joints
/// against a specific armature.
pub fn load_animations(bytes: &[u8]) -> Result<Vec<SkeletalAnimation>, AssetError> {
    let mut r = ByteReader::new(bytes);

    let count = r.u32()? as usize;
    let mut animations = Vec::with_capacity(count.min(r.remaining() / 12));
    for _ in 0..count {
        let animation = read_animation(&mut r)?;
        animation.validate(MAX_JOINTS)?;
        animations.push(animation);
    }
    r.finish()?;

    tracing::debug!(animations = animations.len(), "loaded animations");
    Ok(animations)
}

/// Parse animations and check every track against `armature`.
pub fn load_animations_for(bytes: &[u8], armature: &Armature) -> Result<AnimationSet, AssetError> {
    let set = AnimationSet::new(load_animations(bytes)?);
    set.validate(armature.len())?;
    Ok(set)
}

fn read_animation(r: &mut ByteReader<'_>) -> Result<SkeletalAnimation, AssetError> {
    let name = StringHash::from_raw(r.u32()?);
    let flags = r.u32()?;
    let length = r.u16()?;
    let track_count = r.u16()? as usize;

    let mut tracks = Vec::with_capacity(track_count);
    for _ in 0..track_count {
        let kind = TrackType::from_tag(r.u8()?)?;
        let joint = r.u8()?;
        let key_count = r.u16()? as usize;

        let mut keys = Vec::with_capacity(key_count.min(r.remaining() / 12));
        for _ in 0..key_count {
            let frame = FixedPoint::from_raw(r.i32()?);
            let data = match kind {
                TrackType::Rotation => {
                    KeyData::Rotation(Quaternion::from_raw(r.i16()?, r.i16()?, r.i16()?, r.i16()?))
                }
                TrackType::Translation => {
                    let t = PackedVec3::from_raw(r.i16()?, r.i16()?, r.i16()?);
                    r.skip(2)?;
                    KeyData::Translation(t.to_vec3())
                }
            };
            keys.push(AnimationKey { frame, data });
        }
        tracks.push(AnimationTrack::new(kind, joint, keys));
    }

    Ok(SkeletalAnimation {
        name,
        flags,
        length,
        tracks,
    })
}

/// Serialize animations. Translations are truncated to 4.12 shorts.
pub fn write_animations(animations: &[SkeletalAnimation]) -> Vec<u8> {
    let mut w = ByteWriter::default();

    w.u32(animations.len() as u32);
    for animation in animations {
        w.u32(animation.name.value())
            .u32(animation.flags)
            .u16(animation.length)
            .u16(animation.tracks.len() as u16);
        for track in &animation.tracks {
            w.u8(track.kind.tag()).u8(track.joint).u16(track.keys.len() as u16);
            for key in &track.keys {
                w.i32(key.frame.raw());
                match key.data {
                    KeyData::Rotation(q) => {
                        w.i16(q.w.raw()).i16(q.x.raw()).i16(q.y.raw()).i16(q.z.raw());
                    }
                    KeyData::Translation(t) => write_short_vec(&mut w, t),
                }
            }
        }
    }

    w.into_bytes()
}
