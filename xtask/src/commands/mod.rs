//! Top-level command families.

pub mod dist;
pub mod verify;
