use {
    crate::{
        cache_policy::{CachePolicy, MemoryObject},
        config::{Config, SkuFeatures},
        error::{ContextError, LayoutError, ResourceError},
        platform::{Generation, Platform},
        resource::ResourceInfo,
        texture::{compute_layout, TextureLayout},
    },
    gmm_types::{ResourceDescriptor, ResourceUsage},
};

/// Layout and cache policy calculator for one device.
///
/// Created once from device [`Config`] and shared by all resource creations.
/// Immutable after creation, so it is `Send + Sync`.
#[derive(Debug)]
pub struct Context {
    config: Config,
    platform: Platform,
    cache_policy: CachePolicy,
}

impl Context {
    /// Creates context for the configuration.
    #[cfg_attr(feature = "tracing", tracing::instrument)]
    pub fn new(config: Config) -> Result<Self, ContextError> {
        validate(&config)?;

        let platform = Platform::new(&config);
        let cache_policy = CachePolicy::new(&platform, &config.cache_overrides)?;

        #[cfg(feature = "tracing")]
        tracing::debug!("Created context for {:?}", config.generation);

        Ok(Context {
            config,
            platform,
            cache_policy,
        })
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    #[inline]
    pub fn cache_policy(&self) -> &CachePolicy {
        &self.cache_policy
    }

    /// Computes layout without resolving cache policy.
    pub fn compute_layout(&self, desc: &ResourceDescriptor) -> Result<TextureLayout, LayoutError> {
        compute_layout(&self.platform, desc)
    }

    /// Computes layout and cache policy of the resource.
    /// Nothing is created if either fails.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn create_resource(&self, desc: &ResourceDescriptor) -> Result<ResourceInfo, ResourceError> {
        let layout = compute_layout(&self.platform, desc)?;
        let memory_object = self.memory_object(desc)?;
        Ok(ResourceInfo::new(*desc, layout, memory_object))
    }

    fn memory_object(&self, desc: &ResourceDescriptor) -> Result<MemoryObject, ResourceError> {
        let usage = if desc.cacheable {
            desc.usage
        } else {
            ResourceUsage::Uncached
        };

        let element = self.cache_policy.policy(usage)?;
        let pat = match element.pat_compressed {
            Some(pat) if desc.flags.is_compressed() => pat,
            _ => element.pat,
        };

        Ok(MemoryObject {
            mocs: element.mocs,
            pat,
        })
    }
}

fn validate(config: &Config) -> Result<(), ContextError> {
    let sku = config.sku;

    if sku.contains(SkuFeatures::AUX_TABLE | SkuFeatures::FLAT_PHYS_CCS) {
        return Err(ContextError::InvalidConfig(
            "CCS can't be both mapped by aux table and flat",
        ));
    }

    if sku.contains(SkuFeatures::STANDARD_MIP_TAIL_3D)
        && !sku.contains(SkuFeatures::STANDARD_MIP_TAIL_FORMAT)
    {
        return Err(ContextError::InvalidConfig(
            "standard 3D mip-tail requires standard mip-tail format",
        ));
    }

    if sku.contains(SkuFeatures::FLAT_PHYS_CCS) && config.generation < Generation::Xe2Lpg {
        return Err(ContextError::InvalidConfig(
            "flat CCS is not available before Xe2",
        ));
    }

    Ok(())
}
