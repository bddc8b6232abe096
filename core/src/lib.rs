//! PSX Render Core - fixed-point renderer and skeletal animation
//!
//! This crate provides a PS1-style geometry pipeline built on 20.12 fixed
//! point math, together with the joint hierarchies and keyframe animation
//! that drive skinned models.
//!
//! # Architecture
//!
//! - [`GeometryKernel`] - Geometry coprocessor interface, with [`SoftGte`] as
//!   the software implementation
//! - [`Renderer`] - Projects meshes and links primitives into double-buffered
//!   ordering tables
//! - [`Armature`] - Flat joint hierarchy with global transform propagation
//! - [`SkeletonAnimator`] - Clip playback and pose sampling
//! - [`assets`] - Binary model and animation loaders

pub mod animation;
pub mod armature;
pub mod assets;
pub mod camera;
pub mod config;
pub mod error;
pub mod gte;
pub mod model;
pub mod object;
pub mod render;
pub mod transform;

// Re-export the main entry points
pub use animation::{AnimationSet, SkeletalAnimation, SkeletonAnimator};
pub use armature::{Armature, Joint, JointId, MAX_JOINTS, NULL_JOINT_ID};
pub use camera::Camera;
pub use config::RendererConfig;
pub use error::{AssetError, ConfigError, RenderError};
pub use gte::{GeometryKernel, SoftGte};
pub use model::{Mesh, Model, Vertex};
pub use object::{AnimatedModelObject, MeshObject, ModelObject, Object};
pub use render::{DisplaySink, FrameBuffer, FrameStats, Renderer};
pub use transform::{Transform, TransformMatrix};
