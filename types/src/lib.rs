//!
//! Core types shared between `gmm` and its collaborators.
//!

#![cfg_attr(not(feature = "std"), no_std)]

mod format;
mod heap;
mod resource;
mod usage;

pub use self::{format::*, heap::*, resource::*, usage::*};
