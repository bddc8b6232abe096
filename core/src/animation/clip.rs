//! Animation clip data.

use hashbrown::HashMap;
use psxrender_shared::{FixedPoint, Quaternion, StringHash, Vec3};

use crate::armature::JointId;
use crate::error::AssetError;

/// Clip flag: playback wraps around instead of stopping at the end.
pub const LOOPED: u32 = 1;

/// Channel a track drives. Stored as a tag byte in asset files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TrackType {
    Rotation = 0,
    Translation = 1,
}

impl TrackType {
    /// Tag 2 (scale) is reserved and rejected like any other unknown tag.
    pub fn from_tag(tag: u8) -> Result<Self, AssetError> {
        match tag {
            0 => Ok(Self::Rotation),
            1 => Ok(Self::Translation),
            other => Err(AssetError::UnknownTrackType(other)),
        }
    }

    pub const fn tag(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyData {
    Rotation(Quaternion),
    Translation(Vec3),
}

impl KeyData {
    pub fn track_type(&self) -> TrackType {
        match self {
            Self::Rotation(_) => TrackType::Rotation,
            Self::Translation(_) => TrackType::Translation,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationKey {
    /// Clip frame, fractional
    pub frame: FixedPoint,
    pub data: KeyData,
}

impl AnimationKey {
    pub fn rotation(frame: FixedPoint, q: Quaternion) -> Self {
        Self {
            frame,
            data: KeyData::Rotation(q),
        }
    }

    pub fn translation(frame: FixedPoint, t: Vec3) -> Self {
        Self {
            frame,
            data: KeyData::Translation(t),
        }
    }
}

/// Keys for one channel of one joint, sorted by frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationTrack {
    pub kind: TrackType,
    pub joint: JointId,
    pub keys: Vec<AnimationKey>,
}

impl AnimationTrack {
    pub fn new(kind: TrackType, joint: JointId, keys: Vec<AnimationKey>) -> Self {
        Self { kind, joint, keys }
    }

    /// Check key order and channel, and that `joint` exists in an armature of
    /// `joint_count` joints.
    pub fn validate(&self, joint_count: usize) -> Result<(), AssetError> {
        if self.joint as usize >= joint_count {
            return Err(AssetError::TrackJointOutOfRange {
                joint: self.joint,
                count: joint_count,
            });
        }
        if self.keys.is_empty() {
            return Err(AssetError::EmptyTrack(self.joint));
        }
        for (index, key) in self.keys.iter().enumerate() {
            if key.data.track_type() != self.kind {
                return Err(AssetError::UnknownTrackType(key.data.track_type().tag()));
            }
            if index > 0 && key.frame < self.keys[index - 1].frame {
                return Err(AssetError::KeysOutOfOrder {
                    joint: self.joint,
                    index,
                });
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkeletalAnimation {
    pub name: StringHash,
    pub flags: u32,
    /// Length in frames
    pub length: u16,
    pub tracks: Vec<AnimationTrack>,
}

impl SkeletalAnimation {
    pub fn is_looped(&self) -> bool {
        self.flags & LOOPED != 0
    }

    pub fn validate(&self, joint_count: usize) -> Result<(), AssetError> {
        self.tracks.iter().try_for_each(|t| t.validate(joint_count))
    }
}

/// Clips addressable by name hash.
///
/// Shared between animators with an `Arc`. Duplicate names resolve to the
/// first clip.
#[derive(Clone, Debug, Default)]
pub struct AnimationSet {
    animations: Vec<SkeletalAnimation>,
    by_name: HashMap<StringHash, usize>,
}

impl AnimationSet {
    pub fn new(animations: Vec<SkeletalAnimation>) -> Self {
        let mut by_name = HashMap::with_capacity(animations.len());
        for (index, animation) in animations.iter().enumerate() {
            by_name.entry(animation.name).or_insert(index);
        }
        Self {
            animations,
            by_name,
        }
    }

    pub fn index_of(&self, name: StringHash) -> Option<usize> {
        self.by_name.get(&name).copied()
    }

    pub fn find(&self, name: StringHash) -> Option<&SkeletalAnimation> {
        self.index_of(name).map(|i| &self.animations[i])
    }

    pub fn get(&self, index: usize) -> Option<&SkeletalAnimation> {
        self.animations.get(index)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkeletalAnimation> {
        self.animations.iter()
    }

    /// Validate every clip against an armature of `joint_count` joints.
    pub fn validate(&self, joint_count: usize) -> Result<(), AssetError> {
        self.animations.iter().try_for_each(|a| a.validate(joint_count))
    }
}

impl From<Vec<SkeletalAnimation>> for AnimationSet {
    fn from(animations: Vec<SkeletalAnimation>) -> Self {
        Self::new(animations)
    }
}
