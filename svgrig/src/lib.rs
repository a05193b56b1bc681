//! Skeleton-driven rigging for 2D vector characters.
//!
//! A document is fed in as element events ([`DocumentHandler`]) and built
//! into a flat [`Scene`]. The reserved skeleton path supplies joint positions
//! for a [`SkeletonTree`], and [`build_rig`] re-homes each keyed group under
//! its joint so the character can be posed bone by bone while drawing in
//! the original document order.
//!
//! This crate does no XML tokenizing or file I/O (see `svgrig-xml`).

#![forbid(unsafe_code)]

mod builder;
mod error;
mod math;
mod path;
mod rig;
mod scene;
mod skeleton;
mod style;
mod transform;

#[cfg(feature = "json")]
pub mod json;

pub use builder::*;
pub use error::*;
pub use math::*;
pub use path::*;
pub use rig::*;
pub use scene::*;
pub use skeleton::*;
pub use style::*;
pub use transform::*;







#[cfg(test)]
mod skeleton_tests;

#[cfg(test)]
mod rig_tests;
