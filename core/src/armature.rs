//! Joint hierarchies.
//!
//! Joints live in a flat array. Links are indices into that array with
//! [`NULL_JOINT_ID`] as the terminator, and joint 0 is the root.

use psxrender_shared::{Quaternion, Vec3};
use smallvec::SmallVec;

use crate::error::AssetError;
use crate::transform::{Transform, TransformMatrix, combine_transforms};

/// Joint index in an [`Armature`].
pub type JointId = u8;

/// Link terminator. Caps an armature at 254 joints.
pub const NULL_JOINT_ID: JointId = 0xFF;

/// Largest addressable joint count.
pub const MAX_JOINTS: usize = NULL_JOINT_ID as usize - 1;

/// Length of the stub drawn for joints without children.
const LEAF_BONE_LENGTH: Vec3 = Vec3::from_f64(0.0, 0.1 / 8.0, 0.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Joint {
    pub local_transform: Transform,
    /// Armature-space transform, written by [`Armature::calculate_transforms`]
    pub global_transform: TransformMatrix,
    pub id: JointId,
    pub first_child: JointId,
    pub next_sibling: JointId,
}

impl Joint {
    pub fn new(id: JointId, local_transform: Transform) -> Self {
        Self {
            local_transform,
            global_transform: TransformMatrix::IDENTITY,
            id,
            first_child: NULL_JOINT_ID,
            next_sibling: NULL_JOINT_ID,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.first_child == NULL_JOINT_ID
    }
}

/// Bone from a joint to a child (or a leaf stub), in armature space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoneSegment {
    pub joint: JointId,
    pub start: Vec3,
    pub end: Vec3,
}

/// Pending `(joint, parent)` pairs of the transform walk.
type JointStack = SmallVec<[(JointId, JointId); 32]>;

fn push_first_child(stack: &mut JointStack, joints: &[Joint], parent: JointId) {
    let count = joints.len();
    let first = joints[parent as usize].first_child;
    if first != NULL_JOINT_ID {
        assert!(
            (first as usize) < count,
            "joint {parent} has first child {first}, but the armature only has {count} joints"
        );
        stack.push((first, parent));
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Armature {
    pub joints: Vec<Joint>,
}

impl Armature {
    pub fn new(joints: Vec<Joint>) -> Self {
        Self { joints }
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn root(&self) -> Option<&Joint> {
        self.joints.first()
    }

    pub fn joint(&self, id: JointId) -> Option<&Joint> {
        self.joints.get(id as usize)
    }

    pub fn joint_mut(&mut self, id: JointId) -> Option<&mut Joint> {
        self.joints.get_mut(id as usize)
    }

    /// Armature-space transform of joint `id`.
    pub fn global_transform(&self, id: JointId) -> Option<&TransformMatrix> {
        self.joint(id).map(|j| &j.global_transform)
    }

    /// Children of `id` in sibling order.
    pub fn children(&self, id: JointId) -> impl Iterator<Item = JointId> + '_ {
        let mut next = self.joint(id).map_or(NULL_JOINT_ID, |j| j.first_child);
        std::iter::from_fn(move || {
            if next == NULL_JOINT_ID {
                return None;
            }
            let current = next;
            next = self.joint(current).map_or(NULL_JOINT_ID, |j| j.next_sibling);
            Some(current)
        })
    }

    /// Recompute every joint's global transform from the local transforms.
    ///
    /// Parents are visited before children. The walk uses an explicit stack.
    ///
    /// # Panics
    ///
    /// If a link points past the joint array or the walk visits more joints
    /// than exist. Loaded armatures are checked by [`validate`](Self::validate)
    /// so this only fires on hand-built data.
    pub fn calculate_transforms(&mut self) {
        let count = self.joints.len();
        if count == 0 {
            return;
        }

        let root = &mut self.joints[0];
        root.global_transform = root.local_transform.to_matrix();

        let mut stack: JointStack = SmallVec::new();
        push_first_child(&mut stack, &self.joints, 0);
        let mut visited = 1usize;
        while let Some((id, parent)) = stack.pop() {
            visited += 1;
            assert!(visited <= count, "joint hierarchy visits more than {count} joints");

            let parent_global = self.joints[parent as usize].global_transform;
            let joint = &mut self.joints[id as usize];
            joint.global_transform = combine_transforms(&parent_global, &joint.local_transform);

            let sibling = joint.next_sibling;
            if sibling != NULL_JOINT_ID {
                assert!(
                    (sibling as usize) < count,
                    "joint {id} has next sibling {sibling}, but the armature only has {count} joints"
                );
                stack.push((sibling, parent));
            }
            push_first_child(&mut stack, &self.joints, id);
        }
    }

    /// Check that the joint links form a tree rooted at joint 0.
    pub fn validate(&self) -> Result<(), AssetError> {
        let count = self.joints.len();
        if count > MAX_JOINTS {
            return Err(AssetError::TooManyJoints(count));
        }
        if count == 0 {
            return Ok(());
        }

        for (i, joint) in self.joints.iter().enumerate() {
            for link in [joint.first_child, joint.next_sibling] {
                if link != NULL_JOINT_ID && link as usize >= count {
                    return Err(AssetError::InvalidJointLink {
                        joint: i as JointId,
                        link,
                        count,
                    });
                }
            }
        }

        let mut seen = vec![false; count];
        seen[0] = true;
        let mut stack: SmallVec<[JointId; 32]> = SmallVec::new();
        if self.joints[0].first_child != NULL_JOINT_ID {
            stack.push(self.joints[0].first_child);
        }
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut seen[id as usize], true) {
                return Err(AssetError::CyclicHierarchy(id));
            }
            let joint = &self.joints[id as usize];
            for link in [joint.next_sibling, joint.first_child] {
                if link != NULL_JOINT_ID {
                    stack.push(link);
                }
            }
        }
        Ok(())
    }

    /// Bone segments in armature space, in joint order.
    ///
    /// Uses the global transforms from the last
    /// [`calculate_transforms`](Self::calculate_transforms). Every joint gets
    /// one segment per child; joints without children get a short stub along
    /// their local Y axis.
    pub fn bone_segments(&self) -> Vec<BoneSegment> {
        let mut segments = Vec::with_capacity(self.joints.len() + 1);
        for joint in &self.joints {
            let global = &joint.global_transform;
            let start = global.translation;
            if joint.is_leaf() {
                segments.push(BoneSegment {
                    joint: joint.id,
                    start,
                    end: global.transform_point(LEAF_BONE_LENGTH),
                });
                continue;
            }
            for child in self.children(joint.id) {
                let offset = self.joints[child as usize].local_transform.translation;
                segments.push(BoneSegment {
                    joint: joint.id,
                    start,
                    end: global.transform_point(offset),
                });
            }
        }
        segments
    }

    /// Four-joint skeleton for tests and demos.
    ///
    /// ```text
    /// root (0, 0, 0)
    /// ├── spine (0, 0.25, 0)
    /// │   └── head (0, 0.125, 0)
    /// └── tail (0, 0, -0.25)
    /// ```
    pub fn test_skeleton() -> Self {
        let joint = |id, t: Vec3| Joint::new(id, Transform::new(t, Quaternion::IDENTITY));

        let mut root = joint(0, Vec3::ZERO);
        let mut spine = joint(1, Vec3::from_f64(0.0, 0.25, 0.0));
        let head = joint(2, Vec3::from_f64(0.0, 0.125, 0.0));
        let tail = joint(3, Vec3::from_f64(0.0, 0.0, -0.25));

        root.first_child = 1;
        spine.first_child = 2;
        spine.next_sibling = 3;

        Self::new(vec![root, spine, head, tail])
    }
}
