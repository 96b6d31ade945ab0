use gmm::{
    AuxKind, Config, Context, Format, Generation, Plane, ResourceDescriptor,
    ResourceFlags, ResourceInfo, ResourceUsage, SamplePattern, Tiling,
};

const TILINGS: [Tiling; 7] = [
    Tiling::Linear,
    Tiling::TileX,
    Tiling::TileY,
    Tiling::TileYf,
    Tiling::TileYs,
    Tiling::Tile4,
    Tiling::Tile64,
];

const FORMATS: [Format; 4] = [
    Format::R8Unorm,
    Format::R16Float,
    Format::R8G8B8A8Unorm,
    Format::R32G32B32A32Float,
];

fn contexts() -> impl Iterator<Item = Context> {
    Generation::ALL
        .iter()
        .map(|&generation| Context::new(Config::for_generation(generation)).unwrap())
}

#[test]
fn layout_is_deterministic() {
    for generation in Generation::ALL.iter().copied() {
        let first = Context::new(Config::for_generation(generation)).unwrap();
        let second = Context::new(Config::for_generation(generation)).unwrap();
        assert_eq!(
            first.cache_policy().elements(),
            second.cache_policy().elements()
        );

        let desc = ResourceDescriptor::texture_2d(Format::R8G8B8A8Unorm, 300, 200).with_mips(8);
        assert_eq!(
            first.create_resource(&desc).unwrap(),
            second.create_resource(&desc).unwrap()
        );
    }
}

fn extent(resource: &ResourceInfo) -> (u64, u64, u64) {
    (
        resource.pitch(),
        resource.height(),
        resource.size_main_surface(),
    )
}

fn assert_grows(context: &Context, desc: impl Fn(u64) -> ResourceDescriptor) -> usize {
    let mut checked = 0;

    for &tiling in &TILINGS {
        let mut last = (0, 0, 0);
        for step in (1..600).step_by(7) {
            let resource = match context.create_resource(&desc(step).with_tiling(tiling)) {
                Ok(resource) => resource,
                Err(_) => continue,
            };

            let current = extent(&resource);
            assert!(
                current.0 >= last.0 && current.1 >= last.1 && current.2 >= last.2,
                "{:?} {:?} at {}: {:?} < {:?}",
                context.platform().generation,
                tiling,
                step,
                current,
                last
            );
            last = current;
            checked += 1;
        }
    }

    checked
}

#[test]
fn layout_grows_with_extent() {
    let mut checked = 0;

    for context in contexts() {
        checked += assert_grows(&context, |width| {
            ResourceDescriptor::texture_2d(Format::R8G8B8A8Unorm, width, 64)
        });
        checked += assert_grows(&context, |height| {
            ResourceDescriptor::texture_2d(Format::R8G8B8A8Unorm, 64, height as u32)
        });
    }

    assert!(checked > 0);
}

#[test]
fn tiled_surfaces_are_whole_tiles() {
    let mut checked = 0;

    for context in contexts() {
        for &tiling in &TILINGS[1..] {
            for &format in &FORMATS {
                for &(width, height) in &[(1, 1), (17, 3), (100, 100), (333, 129), (1024, 768)] {
                    let desc = ResourceDescriptor::texture_2d(format, width, height)
                        .with_tiling(tiling)
                        .with_mips(3);
                    let resource = match context.create_resource(&desc) {
                        Ok(resource) => resource,
                        Err(_) => continue,
                    };

                    let tile = resource.layout().tile;
                    assert_eq!(resource.pitch() % u64::from(tile.width_bytes), 0);
                    assert_eq!(resource.height() % u64::from(tile.height_rows), 0);
                    assert_eq!(resource.size_main_surface() % resource.alignment(), 0);
                    checked += 1;
                }
            }
        }
    }

    assert!(checked > 0);
}

fn assert_tail_inside_one_tile(resource: &ResourceInfo) {
    let start = match resource.mip_tail_start_lod() {
        Some(start) => start,
        None => return,
    };

    let tile = resource.layout().tile;
    let tile_width = u64::from(tile.width_bytes);
    let tile_height = u64::from(tile.height_rows);
    let first = resource.mip_offset(start).unwrap();
    let tail_tile = (first.x_bytes / tile_width, first.y_rows / tile_height);

    for lod in start..=resource.descriptor().max_lod {
        let mip = resource.mip_offset(lod).unwrap();
        assert!(mip.tail_byte_offset.unwrap() < tile.size());
        assert_eq!((mip.x_bytes / tile_width, mip.y_rows / tile_height), tail_tile);
        assert!(mip.x_bytes % tile_width + mip.width_bytes <= tile_width);
        assert!(mip.y_rows % tile_height + mip.height_rows <= tile_height);
    }
}

#[test]
fn mip_tail_fits_in_one_tile() {
    let mut tails = 0;

    for context in contexts() {
        for &tiling in &[Tiling::TileYf, Tiling::TileYs, Tiling::Tile64] {
            for &format in &FORMATS {
                let desc = ResourceDescriptor::texture_2d(format, 256, 256)
                    .with_tiling(tiling)
                    .with_mips(8);
                let resource = match context.create_resource(&desc) {
                    Ok(resource) => resource,
                    Err(_) => continue,
                };

                if resource.mip_tail_start_lod().is_some() {
                    tails += 1;
                }
                assert_tail_inside_one_tile(&resource);
            }
        }
    }

    assert!(tails > 0);
}

fn align_to(value: u64, alignment: u64) -> u64 {
    (value + alignment - 1) / alignment * alignment
}

/// Bytes of one chroma plane packed right after luma.
fn linear_chroma_size(format: Format, width: u64, height: u32) -> u64 {
    let (align, shift) = if format == Format::Yvu9 { (4, 4) } else { (2, 2) };
    (align_to(width, align) * align_to(u64::from(height), align)) >> shift
}

#[test]
fn planes_are_inside_surface() {
    let formats = [
        Format::Nv12,
        Format::Nv21,
        Format::P010,
        Format::Imc1,
        Format::Imc2,
        Format::Imc3,
        Format::Imc4,
        Format::Rgbp,
        Format::Bgrp,
        Format::I420,
        Format::Iyuv,
        Format::Yv12,
        Format::Yvu9,
    ];
    let mut checked = 0;

    for context in contexts() {
        for &tiling in &[Tiling::Linear, Tiling::TileY, Tiling::Tile4] {
            for &format in &formats {
                for &(width, height) in &[(64, 64), (100, 50), (256, 80), (1920, 1080)] {
                    let desc = ResourceDescriptor::texture_2d(format, width, height)
                        .with_tiling(tiling);
                    let resource = match context.create_resource(&desc) {
                        Ok(resource) => resource,
                        Err(_) => continue,
                    };

                    let planes = *resource.plane_layout().unwrap();
                    for &plane in &[Plane::U, Plane::V] {
                        let (x, y) = planes.offset(plane);
                        assert!(x < resource.pitch());

                        let offset = resource.plane_offset(plane).unwrap();
                        assert!(offset < resource.size_main_surface());

                        if format.is_linear_chroma_planar() {
                            let chroma = linear_chroma_size(format, width, height);
                            assert!(
                                offset + chroma <= resource.size_main_surface(),
                                "{:?} {}x{} {:?}",
                                format,
                                width,
                                height,
                                plane
                            );
                        } else {
                            let rows = planes.unaligned_heights[plane as usize];
                            assert!(
                                y + rows <= resource.height(),
                                "{:?} {}x{} {:?}",
                                format,
                                width,
                                height,
                                plane
                            );
                        }
                    }
                    checked += 1;
                }
            }
        }
    }

    assert!(checked > 0);
}

fn aux_requests(tiling: Tiling) -> [(AuxKind, ResourceDescriptor); 2] {
    [
        (
            AuxKind::HiZ,
            ResourceDescriptor::texture_2d(Format::D32Float, 256, 256)
                .with_tiling(tiling)
                .with_flags(ResourceFlags::DEPTH | ResourceFlags::HIZ),
        ),
        (
            AuxKind::Mcs,
            ResourceDescriptor::texture_2d(Format::R8G8B8A8Unorm, 64, 64)
                .with_tiling(tiling)
                .with_msaa(4, SamplePattern::Arrayed)
                .with_flags(ResourceFlags::RENDER_TARGET),
        ),
    ]
}

#[test]
fn requested_aux_surfaces_are_present() {
    let compressions = [
        ResourceFlags::empty(),
        ResourceFlags::RENDER_COMPRESSED,
        ResourceFlags::RENDER_COMPRESSED | ResourceFlags::UNIFIED_AUX_SURFACE,
    ];
    let mut checked = 0;

    for context in contexts() {
        let generation = context.platform().generation;
        let has_ccs_surface = generation >= Generation::Gen9 && generation <= Generation::XeLpg;
        let tiling = context.platform().preferred_tiling();

        for (kind, desc) in aux_requests(tiling).iter() {
            for &compression in &compressions {
                let desc = desc.with_flags(compression);
                let resource = match context.create_resource(&desc) {
                    Ok(resource) => resource,
                    Err(_) => {
                        assert!(generation == Generation::Gen8 && !compression.is_empty());
                        continue;
                    }
                };

                let aux = resource.aux_surface(*kind).unwrap_or_else(|| {
                    panic!("{:?} {:?} {:?} lost", generation, compression, kind)
                });
                assert_eq!(resource.size_aux_surface(), aux.size);

                let compressed = !compression.is_empty();
                let ccs = resource.aux_surface(AuxKind::Ccs);
                assert_eq!(
                    ccs.is_some(),
                    compressed && has_ccs_surface,
                    "{:?} {:?} {:?}",
                    generation,
                    compression,
                    kind
                );

                if let Some(ccs) = ccs {
                    assert_eq!(resource.size_secondary_aux_surface(), ccs.size);
                }
                if compression.contains(ResourceFlags::UNIFIED_AUX_SURFACE) {
                    let end = resource
                        .aux_offset()
                        .into_iter()
                        .chain(resource.secondary_aux_offset())
                        .max()
                        .unwrap();
                    assert!(end < resource.size_allocation());
                    assert_eq!(
                        resource.aux_offset(),
                        Some(align_to(resource.size_main_surface(), 4096))
                    );
                }
                checked += 1;
            }
        }
    }

    assert!(checked > 0);
}

#[test]
fn every_usage_resolves_to_table_entries() {
    for context in contexts() {
        let policy = context.cache_policy();

        for &usage in ResourceUsage::ALL.iter() {
            let element = policy.policy(usage).unwrap();

            if !policy.mocs_table().is_empty() {
                assert!(
                    policy
                        .mocs_table()
                        .iter()
                        .any(|entry| entry.index == element.mocs),
                    "{:?} {:?} MOCS {}",
                    policy.generation(),
                    usage,
                    element.mocs
                );
            }

            if !policy.pat_table().is_empty() {
                let pats = element.pat_compressed.into_iter().chain(Some(element.pat));
                for pat in pats {
                    assert!(policy.pat_table().iter().any(|entry| entry.index == pat));
                }
            }
        }
    }
}
