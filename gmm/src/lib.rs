//!
//! Surface layout and cache policy calculator for Intel-like GPUs.
//!
//! Given a logical description of a resource this crate computes
//! the physical layout hardware expects: pitch, alignment, size,
//! mip level and plane offsets, packed mip-tails and compression aux surfaces.
//! It also resolves MOCS and PAT indices for resource usages.
//!

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod alignment;
mod cache_policy;
mod config;
mod context;
mod error;
#[cfg(feature = "std")]
mod global;
mod mip_tail;
mod platform;
mod resource;
mod texture;
mod tile;

#[cfg(feature = "std")]
pub use self::global::*;

pub use {
    self::{
        alignment::AlignmentUnit,
        cache_policy::*,
        config::*,
        context::*,
        error::*,
        mip_tail::Offset3,
        platform::{Align2, Generation, Platform, TexAlign},
        resource::*,
        texture::{AuxKind, AuxLayout, MipOffset, Plane, PlaneLayout, SliceLayout, TextureLayout},
        tile::{TileDim, TileGeometry},
    },
    gmm_types::*,
};

/// Aligns `value` up to `align_mask`
/// Returns smallest integer not lesser than `value` aligned by `align_mask`.
/// Returns `None` on overflow.
pub(crate) fn align_up(value: u64, align_mask: u64) -> Option<u64> {
    Some(value.checked_add(align_mask)? & !align_mask)
}

/// Align `value` down to `align_mask`
/// Returns largest integer not bigger than `value` aligned by `align_mask`.
pub(crate) fn align_down(value: u64, align_mask: u64) -> u64 {
    value & !align_mask
}

/// Aligns `value` up to a multiple of `alignment`.
/// Unlike `align_up` works with alignments that are not powers of two.
pub(crate) fn align_to(value: u64, alignment: u64) -> u64 {
    debug_assert_ne!(alignment, 0);
    div_ceil(value, alignment) * alignment
}

pub(crate) fn div_ceil(value: u64, divisor: u64) -> u64 {
    (value + divisor - 1) / divisor
}

pub(crate) fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}
