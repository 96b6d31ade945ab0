//! Auxiliary surfaces: MCS for multisampled render targets, HiZ for depth
//! and CCS for compressed surfaces.

use {
    super::{planar::Plane, Surface, TextureLayout},
    crate::{
        align_to, align_up,
        config::SkuFeatures,
        div_ceil,
        error::LayoutError,
        platform::PAGE_SIZE,
    },
    gmm_types::{ResourceFlags, SamplePattern, Tiling},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AuxKind {
    /// Compression control surface.
    Ccs,

    /// Multisample control surface.
    Mcs,

    /// Hierarchical depth.
    HiZ,
}

/// Layout of an auxiliary surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuxLayout {
    pub kind: AuxKind,
    pub tiling: Tiling,

    /// Pitch in bytes. Zero for linear CCS which is a flat byte array.
    pub pitch: u64,
    pub height: u64,
    pub qpitch: u64,
    pub h_align: u32,
    pub v_align: u32,
    pub size: u64,

    /// Offset from the start of allocation when `unified`.
    pub offset: u64,

    /// Aux surface is placed in the same allocation after the main surface.
    pub unified: bool,

    /// Offsets of luma and chroma CCS of planar surfaces, relative to aux surface.
    pub plane_offsets: [u64; 2],
}

fn tiled_aux(
    kind: AuxKind,
    tiling: Tiling,
    pitch: u64,
    height: u64,
    qpitch: u64,
    (h_align, v_align): (u32, u32),
) -> Result<AuxLayout, LayoutError> {
    let size = pitch
        .checked_mul(height)
        .and_then(|size| align_up(size, PAGE_SIZE - 1))
        .ok_or(LayoutError::SizeOverflow)?;

    Ok(AuxLayout {
        kind,
        tiling,
        pitch,
        height,
        qpitch,
        h_align,
        v_align,
        size,
        offset: 0,
        unified: false,
        plane_offsets: [0; 2],
    })
}

/// Places aux surface after the main surface and the aux surface attached
/// before it, if unified layout is requested.
/// First attached surface becomes primary, second one secondary.
fn attach(surface: &Surface<'_>, layout: &mut TextureLayout, mut aux: AuxLayout) {
    if surface.desc.flags.contains(ResourceFlags::UNIFIED_AUX_SURFACE) {
        aux.offset = align_to(layout.size_allocation(), PAGE_SIZE);
        aux.unified = true;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "{:?} aux: pitch {} height {} size {} offset {}",
        aux.kind,
        aux.pitch,
        aux.height,
        aux.size,
        aux.offset
    );

    if layout.aux.is_none() {
        layout.aux = Some(aux);
    } else {
        layout.secondary_aux = Some(aux);
    }
}

/// Multisample control surface of arrayed multisampled render targets.
fn mcs(surface: &Surface<'_>) -> Result<Option<AuxLayout>, LayoutError> {
    let desc = &surface.desc;
    if !desc.msaa.is_multisampled()
        || desc.msaa.pattern != SamplePattern::Arrayed
        || !desc.flags.contains(ResourceFlags::RENDER_TARGET)
    {
        return Ok(None);
    }

    let bits_per_element = match desc.msaa.samples {
        2 | 4 => 8,
        8 => 32,
        _ => 64,
    };

    let tiling = surface.platform.preferred_tiling();
    let align = surface.platform.tex_align.all_other;
    let pitch = align_to(surface.width * bits_per_element / 8, 128);
    let qpitch = align_to(surface.height, u64::from(align.height));
    let height = align_to(qpitch * u64::from(desc.array_size), 32);

    tiled_aux(
        AuxKind::Mcs,
        tiling,
        pitch,
        height,
        qpitch,
        (align.width, align.height),
    )
    .map(Some)
}

/// Hierarchical depth. One 16 byte HiZ element covers 8x4 depth pixels.
fn hiz(surface: &Surface<'_>, layout: &TextureLayout) -> Result<Option<AuxLayout>, LayoutError> {
    if !surface.desc.flags.contains(ResourceFlags::HIZ) {
        return Ok(None);
    }
    if !surface.desc.format.is_depth() {
        return Err(LayoutError::UnsupportedFormat(surface.desc.format));
    }

    let align = surface.platform.tex_align.hiz;
    let width_px = layout.pitch * 8 / u64::from(surface.info.bits_per_element);
    let pitch = align_to(div_ceil(width_px, 8) * 16, 128);
    let qpitch = align_to(layout.qpitch, u64::from(align.height)) / 4;
    let height = align_to(qpitch * u64::from(layout.slices.max(1)), 32);

    tiled_aux(
        AuxKind::HiZ,
        surface.platform.preferred_tiling(),
        pitch,
        height,
        qpitch,
        (align.width, align.height),
    )
    .map(Some)
}

fn check_compression(surface: &Surface<'_>) -> Result<bool, LayoutError> {
    let flags = surface.desc.flags;
    if !flags.is_compressed() {
        return Ok(false);
    }

    if flags.contains(ResourceFlags::RENDER_COMPRESSED)
        && !surface.platform.has(SkuFeatures::E2E_COMPRESSION)
    {
        return Err(LayoutError::InvalidDescriptor(
            "render compression is not supported",
        ));
    }

    if flags.contains(ResourceFlags::MEDIA_COMPRESSED)
        && !surface.platform.has(SkuFeatures::MEDIA_COMPRESSION)
    {
        return Err(LayoutError::InvalidDescriptor(
            "media compression is not supported",
        ));
    }

    if !surface.is_tiled() {
        return Err(LayoutError::InvalidDescriptor(
            "compressed resource must be tiled",
        ));
    }

    Ok(true)
}

/// Attaches HiZ or MCS, rejects compression requests.
/// Used by generations without CCS.
pub(crate) fn mcs_hiz_aux(
    surface: &Surface<'_>,
    layout: &mut TextureLayout,
) -> Result<(), LayoutError> {
    if check_compression(surface)? {
        return Err(LayoutError::InvalidDescriptor(
            "compression is not supported",
        ));
    }

    attach_mcs_hiz(surface, layout)
}

fn attach_mcs_hiz(surface: &Surface<'_>, layout: &mut TextureLayout) -> Result<(), LayoutError> {
    if let Some(aux) = hiz(surface, layout)? {
        attach(surface, layout, aux);
    } else if let Some(aux) = mcs(surface)? {
        attach(surface, layout, aux);
    }
    Ok(())
}

/// Gen9 to Gen11 compress with a TileY 2D CCS.
/// One CCS byte covers 8 bytes horizontally and 32 rows of the main surface.
/// HiZ or MCS of a compressed surface stays primary and CCS is secondary.
pub(crate) fn ccs_2d_aux(
    surface: &Surface<'_>,
    layout: &mut TextureLayout,
) -> Result<(), LayoutError> {
    if !check_compression(surface)? {
        return attach_mcs_hiz(surface, layout);
    }

    let rows = layout.size / layout.pitch;
    let pitch = align_to(div_ceil(layout.pitch, 8), 128);
    let height = align_to(div_ceil(rows, 32), 32);
    let qpitch = div_ceil(layout.qpitch, 32);

    let ccs = tiled_aux(
        AuxKind::Ccs,
        Tiling::TileY,
        pitch,
        height,
        qpitch,
        (layout.align.h_align, layout.align.v_align),
    )?;
    attach_mcs_hiz(surface, layout)?;
    attach(surface, layout, ccs);
    Ok(())
}

/// Gen12 and XeLpg address CCS through the aux translation table
/// as a flat byte array, one byte per `ccs_ratio` bytes of main surface.
/// Main surface is mapped by the table in 64KiB granules.
pub(crate) fn linear_ccs_aux(
    surface: &Surface<'_>,
    layout: &mut TextureLayout,
) -> Result<(), LayoutError> {
    if !check_compression(surface)? {
        return attach_mcs_hiz(surface, layout);
    }

    let platform = surface.platform;
    let granularity = platform.aux_table_granularity;
    layout.alignment = layout.alignment.max(granularity);
    layout.size = align_up(layout.size, granularity - 1).ok_or(LayoutError::SizeOverflow)?;

    let ccs_size = |bytes: u64| align_to(div_ceil(bytes, platform.ccs_ratio), PAGE_SIZE);

    let (size, plane_offsets) = match &layout.planes {
        Some(planes) if planes.count > 1 => {
            let (_, u_rows) = planes.offset(Plane::U);
            let (_, v_rows) = planes.offset(Plane::V);
            let luma = u_rows.min(v_rows) * layout.pitch;
            let luma_ccs = ccs_size(luma);
            let chroma_ccs = ccs_size(layout.size - luma);
            (luma_ccs + chroma_ccs, [0, luma_ccs])
        }
        _ => (ccs_size(layout.size), [0, 0]),
    };

    let ccs = AuxLayout {
        kind: AuxKind::Ccs,
        tiling: Tiling::Linear,
        pitch: 0,
        height: 0,
        qpitch: 0,
        h_align: layout.align.h_align,
        v_align: layout.align.v_align,
        size,
        offset: 0,
        unified: false,
        plane_offsets,
    };
    attach_mcs_hiz(surface, layout)?;
    attach(surface, layout, ccs);
    Ok(())
}

/// Xe2 keeps compression state in reserved physical memory,
/// no aux surface is allocated for CCS.
pub(crate) fn flat_ccs_aux(
    surface: &Surface<'_>,
    layout: &mut TextureLayout,
) -> Result<(), LayoutError> {
    check_compression(surface)?;
    attach_mcs_hiz(surface, layout)
}

#[cfg(test)]
mod tests {
    use {
        crate::{
            align_to,
            config::Config,
            platform::{Generation, Platform},
            texture::{compute_layout, AuxKind, TextureLayout},
        },
        gmm_types::{Format, ResourceDescriptor, ResourceFlags, SamplePattern, Tiling},
    };

    fn platform(generation: Generation) -> Platform {
        Platform::new(&Config::for_generation(generation))
    }

    fn compressed_ys_pixel() -> ResourceDescriptor {
        ResourceDescriptor::texture_2d(Format::R8G8B8A8Unorm, 1, 1)
            .with_tiling(Tiling::TileYs)
            .with_flags(
                ResourceFlags::RENDER_TARGET
                    | ResourceFlags::RENDER_COMPRESSED
                    | ResourceFlags::UNIFIED_AUX_SURFACE,
            )
    }

    fn compressed_depth(width: u64, height: u32) -> ResourceDescriptor {
        ResourceDescriptor::texture_2d(Format::D32Float, width, height)
            .with_tiling(Tiling::TileY)
            .with_flags(
                ResourceFlags::DEPTH
                    | ResourceFlags::HIZ
                    | ResourceFlags::RENDER_COMPRESSED
                    | ResourceFlags::UNIFIED_AUX_SURFACE,
            )
    }

    fn msaa_target(flags: ResourceFlags) -> ResourceDescriptor {
        ResourceDescriptor::texture_2d(Format::R8G8B8A8Unorm, 64, 64)
            .with_tiling(Tiling::TileY)
            .with_msaa(4, SamplePattern::Arrayed)
            .with_flags(ResourceFlags::RENDER_TARGET | flags)
    }

    fn compressed_msaa_target() -> ResourceDescriptor {
        msaa_target(ResourceFlags::RENDER_COMPRESSED | ResourceFlags::UNIFIED_AUX_SURFACE)
    }

    /// Primary aux right after the main surface, CCS right after the primary.
    fn assert_unified_after_primary(layout: &TextureLayout, primary: AuxKind) {
        let aux = layout.aux.unwrap();
        let ccs = layout.secondary_aux.unwrap();

        assert_eq!(aux.kind, primary);
        assert_eq!(ccs.kind, AuxKind::Ccs);
        assert!(aux.unified && ccs.unified);
        assert_eq!(aux.offset, align_to(layout.size, 4096));
        assert_eq!(ccs.offset, aux.offset + aux.size);
        assert_eq!(layout.size_allocation(), ccs.offset + ccs.size);
        assert_eq!(layout.aux_surface(primary), Some(&aux));
        assert_eq!(layout.aux_surface(AuxKind::Ccs), Some(&ccs));
    }

    #[test]
    fn gen9_2d_ccs_of_single_ys_tile() {
        let layout = compute_layout(&platform(Generation::Gen9), &compressed_ys_pixel()).unwrap();
        let aux = layout.aux.unwrap();

        assert_eq!(layout.size, 64 * 1024);
        assert_eq!(aux.kind, AuxKind::Ccs);
        assert_eq!((aux.pitch, aux.height), (128, 32));
        assert_eq!(aux.size, 4096);
        assert_eq!(aux.offset, 64 * 1024);
        assert!(aux.unified);
        assert_eq!(layout.secondary_aux, None);
        assert_eq!(layout.size_allocation(), 68 * 1024);
    }

    #[test]
    fn gen12_linear_ccs_has_no_pitch() {
        let layout = compute_layout(&platform(Generation::Gen12), &compressed_ys_pixel()).unwrap();
        let aux = layout.aux.unwrap();

        assert_eq!(aux.pitch, 0);
        assert_eq!(aux.tiling, Tiling::Linear);
        assert_eq!(aux.size, 4096);
        assert_eq!(aux.offset, 64 * 1024);
    }

    #[test]
    fn gen12_main_surface_is_64kb_aligned() {
        let desc = ResourceDescriptor::texture_2d(Format::R8G8B8A8Unorm, 64, 64)
            .with_tiling(Tiling::TileY)
            .with_flags(ResourceFlags::RENDER_COMPRESSED);
        let layout = compute_layout(&platform(Generation::Gen12), &desc).unwrap();

        assert_eq!(layout.alignment, 64 * 1024);
        assert_eq!(layout.size, 64 * 1024);
        assert!(!layout.aux.unwrap().unified);
        assert_eq!(layout.size_allocation(), 64 * 1024);
    }

    #[test]
    fn gen9_compressed_depth_keeps_hiz() {
        let layout = compute_layout(&platform(Generation::Gen9), &compressed_depth(64, 64)).unwrap();
        assert_unified_after_primary(&layout, AuxKind::HiZ);

        let hiz = layout.aux.unwrap();
        assert_eq!((hiz.pitch, hiz.qpitch, hiz.height), (128, 16, 32));

        let ccs = layout.secondary_aux.unwrap();
        assert_eq!(ccs.tiling, Tiling::TileY);
        assert_eq!((ccs.pitch, ccs.height, ccs.size), (128, 32, 4096));
    }

    #[test]
    fn gen12_compressed_depth_keeps_hiz() {
        let layout =
            compute_layout(&platform(Generation::Gen12), &compressed_depth(256, 256)).unwrap();
        assert_eq!(layout.size, 256 * 1024);
        assert_unified_after_primary(&layout, AuxKind::HiZ);
        assert_eq!(layout.aux.unwrap().offset, 256 * 1024);

        let ccs = layout.secondary_aux.unwrap();
        assert_eq!(ccs.tiling, Tiling::Linear);
        assert_eq!(ccs.size, 4096);
    }

    #[test]
    fn gen9_compressed_msaa_keeps_mcs() {
        let layout =
            compute_layout(&platform(Generation::Gen9), &compressed_msaa_target()).unwrap();
        assert_unified_after_primary(&layout, AuxKind::Mcs);

        let mcs = layout.aux.unwrap();
        assert_eq!((mcs.pitch, mcs.height, mcs.size), (128, 64, 8192));
        assert_eq!(layout.secondary_aux.unwrap().pitch, 128);
    }

    #[test]
    fn gen12_compressed_msaa_keeps_mcs() {
        let layout =
            compute_layout(&platform(Generation::Gen12), &compressed_msaa_target()).unwrap();
        assert_eq!(layout.size % (64 * 1024), 0);
        assert_unified_after_primary(&layout, AuxKind::Mcs);
        assert_eq!(layout.aux.unwrap().size, 8192);
        assert_eq!(layout.secondary_aux.unwrap().size, 4096);
    }

    #[test]
    fn separate_aux_surfaces_stay_outside_allocation() {
        let desc = msaa_target(ResourceFlags::RENDER_COMPRESSED);
        let layout = compute_layout(&platform(Generation::Gen11), &desc).unwrap();
        let mcs = layout.aux.unwrap();
        let ccs = layout.secondary_aux.unwrap();

        assert_eq!((mcs.kind, ccs.kind), (AuxKind::Mcs, AuxKind::Ccs));
        assert!(!mcs.unified && !ccs.unified);
        assert_eq!(layout.size_allocation(), layout.size);
    }

    #[test]
    fn hiz_needs_depth_format() {
        let desc = ResourceDescriptor::texture_2d(Format::R8G8B8A8Unorm, 64, 64)
            .with_tiling(Tiling::TileY)
            .with_flags(ResourceFlags::HIZ | ResourceFlags::RENDER_COMPRESSED);
        assert!(compute_layout(&platform(Generation::Gen9), &desc).is_err());
        assert!(compute_layout(&platform(Generation::Gen12), &desc).is_err());
    }

    #[test]
    fn xe2_flat_ccs_allocates_nothing() {
        let desc = ResourceDescriptor::texture_2d(Format::R8G8B8A8Unorm, 64, 64)
            .with_flags(ResourceFlags::RENDER_COMPRESSED | ResourceFlags::UNIFIED_AUX_SURFACE);
        let layout = compute_layout(&platform(Generation::Xe2Lpg), &desc).unwrap();
        assert_eq!(layout.aux, None);
        assert_eq!(layout.size_allocation(), layout.size);
    }

    #[test]
    fn xe2_compressed_msaa_keeps_only_mcs() {
        let desc = compressed_msaa_target().with_tiling(Tiling::Tile4);
        let layout = compute_layout(&platform(Generation::Xe2Lpg), &desc).unwrap();
        assert_eq!(layout.aux.unwrap().kind, AuxKind::Mcs);
        assert_eq!(layout.secondary_aux, None);
    }

    #[test]
    fn compression_needs_tiling_and_support() {
        let linear = ResourceDescriptor::texture_2d(Format::R8G8B8A8Unorm, 64, 64)
            .with_tiling(Tiling::Linear)
            .with_flags(ResourceFlags::RENDER_COMPRESSED);
        assert!(compute_layout(&platform(Generation::Gen9), &linear).is_err());

        let tiled = linear.with_tiling(Tiling::TileY);
        assert!(compute_layout(&platform(Generation::Gen8), &tiled).is_err());
        assert!(compute_layout(&platform(Generation::Gen9), &tiled).is_ok());
    }

    #[test]
    fn mcs_element_size_follows_samples() {
        let desc = msaa_target(ResourceFlags::empty());
        let mcs = compute_layout(&platform(Generation::Gen9), &desc)
            .unwrap()
            .aux
            .unwrap();
        assert_eq!(mcs.kind, AuxKind::Mcs);
        assert_eq!((mcs.pitch, mcs.height, mcs.size), (128, 64, 8192));

        let x8 = desc.with_msaa(8, SamplePattern::Arrayed);
        let mcs = compute_layout(&platform(Generation::Gen9), &x8)
            .unwrap()
            .aux
            .unwrap();
        assert_eq!(mcs.pitch, 256);
    }

    #[test]
    fn hiz_covers_8x4_pixels_with_16_bytes() {
        let desc = ResourceDescriptor::texture_2d(Format::D32Float, 64, 64)
            .with_tiling(Tiling::TileY)
            .with_flags(ResourceFlags::DEPTH | ResourceFlags::HIZ);
        let layout = compute_layout(&platform(Generation::Gen9), &desc).unwrap();
        let hiz = layout.aux.unwrap();

        assert_eq!(layout.pitch, 256);
        assert_eq!(hiz.kind, AuxKind::HiZ);
        assert_eq!((hiz.pitch, hiz.qpitch, hiz.height), (128, 16, 32));
        assert_eq!(hiz.size, 4096);
        assert_eq!(layout.secondary_aux, None);
    }
}
