use {
    gmm::{
        Config, Context, Format, GfxHeap, Generation, OffsetRequest, ResourceDescriptor,
        ResourceFlags, ResourceUsage, Tiling,
    },
    gmm_mock::MockGfxHeap,
    tracing_subscriber::layer::SubscriberExt as _,
};

fn parse_generation(name: &str) -> eyre::Result<Generation> {
    let generation = match name {
        "gen8" => Generation::Gen8,
        "gen9" => Generation::Gen9,
        "gen10" => Generation::Gen10,
        "gen11" => Generation::Gen11,
        "gen12" => Generation::Gen12,
        "xe-lpg" => Generation::XeLpg,
        "xe2-lpg" => Generation::Xe2Lpg,
        "xe3p-xpc" => Generation::Xe3pXpc,
        _ => eyre::bail!("Unknown generation '{}'", name),
    };
    Ok(generation)
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .pretty()
            .finish()
            .with(tracing_error::ErrorLayer::default()),
    )?;

    let generation = match std::env::args().nth(1) {
        Some(name) => parse_generation(&name)?,
        None => Generation::Gen12,
    };

    let context = Context::new(Config::for_generation(generation))?;
    let mut heap = MockGfxHeap::new(0x1_0000, 1 << 32);

    let descriptors = [
        ResourceDescriptor::texture_2d(Format::R8G8B8A8Unorm, 1920, 1080)
            .with_mips(4)
            .with_flags(ResourceFlags::RENDER_TARGET),
        ResourceDescriptor::texture_2d(Format::Nv12, 1920, 1080)
            .with_usage(ResourceUsage::MfxDecodeOutput),
        ResourceDescriptor::cube(Format::Bc1, 256).with_mips(8),
        ResourceDescriptor::texture_3d(Format::R16Float, 64, 64, 32).with_mips(6),
        ResourceDescriptor::buffer(100_000).with_usage(ResourceUsage::Buffer),
        ResourceDescriptor::texture_2d(Format::R8G8B8A8Unorm, 1920, 1080)
            .with_tiling(Tiling::Linear)
            .with_usage(ResourceUsage::PrimarySurface),
    ];

    let mut addresses = Vec::new();
    for desc in &descriptors {
        let resource = context.create_resource(desc)?;
        let address = resource.reserve_gfx_address(&mut heap)?;

        println!(
            "{:?} {:?} {}x{}: {:?} pitch {} height {} qpitch {} size {} alignment {} at {:#x}",
            desc.resource_type,
            desc.format,
            desc.base_width,
            desc.base_height,
            resource.tile_mode(),
            resource.pitch(),
            resource.height(),
            resource.qpitch(),
            resource.size_allocation(),
            resource.alignment(),
            address,
        );

        if let Some(start) = resource.mip_tail_start_lod() {
            println!("    mip-tail starts at lod {}", start);
        }

        for lod in 0..=desc.max_lod {
            let offset = resource.offset(OffsetRequest::lod(lod))?;
            println!(
                "    lod {}: offset {:#x} x {} y {} z {}",
                lod, offset.render.offset, offset.render.x, offset.render.y, offset.render.z,
            );
        }

        let memory = resource.memory_object();
        println!("    mocs {} pat {}", memory.mocs, memory.pat);

        addresses.push(address);
    }

    for address in addresses {
        heap.release(address);
    }

    tracing::info!(
        "{} reservations released, {} bytes free",
        heap.total_releases(),
        heap.free_bytes()
    );

    Ok(())
}
