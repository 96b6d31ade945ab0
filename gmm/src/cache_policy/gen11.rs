use {
    super::{gen8, gen9::GEN9_CACHE_OPS, CacheFlags, CachePolicyElement, CachePolicyOps},
    crate::platform::Platform,
    gmm_types::ResourceUsage,
};

/// Gen11 media engines read decoded pictures through L3.
pub(crate) const GEN11_CACHE_OPS: CachePolicyOps = CachePolicyOps {
    usage,
    ..GEN9_CACHE_OPS
};

fn usage(platform: &Platform, usage: ResourceUsage) -> CachePolicyElement {
    let mut element = gen8::usage(platform, usage);

    match usage {
        ResourceUsage::MfxDecodeOutput
        | ResourceUsage::MfxEncodeReference
        | ResourceUsage::VpInputPicture
        | ResourceUsage::VpOutputPicture => element.flags.insert(CacheFlags::L3),
        _ => {}
    }

    element
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{cache_policy::CachePolicy, config::Config, platform::Generation},
    };

    #[test]
    fn media_pictures_share_texture_entry() {
        let gen9 = CachePolicy::new(&Platform::new(&Config::for_generation(Generation::Gen9)), &[])
            .unwrap();
        let gen11 =
            CachePolicy::new(&Platform::new(&Config::for_generation(Generation::Gen11)), &[])
                .unwrap();

        let mocs = |policy: &CachePolicy, usage| policy.policy(usage).unwrap().mocs;

        assert_ne!(
            mocs(&gen9, ResourceUsage::MfxDecodeOutput),
            mocs(&gen9, ResourceUsage::Texture)
        );
        assert_eq!(
            mocs(&gen11, ResourceUsage::MfxDecodeOutput),
            mocs(&gen11, ResourceUsage::Texture)
        );
        assert_eq!(
            mocs(&gen11, ResourceUsage::MfxBitstream),
            mocs(&gen11, ResourceUsage::Staging)
        );
    }
}
