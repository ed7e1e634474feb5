//! Region attachment geometry for Spine-style 2D skeletal animation (unofficial).
//!
//! A region attachment is a textured quad bound to a single bone. This crate precomputes the
//! quad's bone-local corners and texture coordinates, and projects the corners through a bone's
//! world transform every frame. Bone hierarchies, skeleton loading and GPU backends live elsewhere;
//! bones are consumed through [`BoneTransform`].

#![forbid(unsafe_code)]

mod atlas;
mod bone;
mod error;
mod loader;
mod region;
mod render;

pub use atlas::*;
pub use bone::*;
pub use error::*;
pub use loader::*;
pub use region::*;
pub use render::*;


#[cfg(test)]
mod render_tests;
