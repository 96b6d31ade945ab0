/// Resource usage that selects cache policy of a resource.
///
/// Every generation defines cacheability for each of these values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum ResourceUsage {
    Unknown,

    // Kernel mode driver usages.
    BatchBuffer,
    ContextSwitchBuffer,
    HwContext,
    GfxRing,
    StatusPage,
    DummyPage,
    Cursor,
    PrimarySurface,
    ShadowSurface,
    KmdStagingSurface,
    AuxTable,

    // 3D usages.
    Buffer,
    VertexBuffer,
    IndexBuffer,
    ConstantBuffer,
    StreamOutputBuffer,
    RenderTarget,
    DepthBuffer,
    StencilBuffer,
    HiZ,
    Mcs,
    Ccs,
    Texture,
    ShaderResource,
    ShaderResourceLlcBypass,
    SurfaceState,
    DynamicState,
    InstructionHeap,
    ScratchSpace,
    Staging,
    Uncached,

    // Compute usages.
    OclBuffer,
    OclImage,
    OclSystemMemoryBuffer,

    // Media usages.
    MfxBitstream,
    MfxDecodeOutput,
    MfxEncodeReference,
    MfxStreamOut,
    VpInputPicture,
    VpOutputPicture,
    MediaCompressionState,
}

impl ResourceUsage {
    /// All usages in declaration order.
    pub const ALL: [ResourceUsage; 42] = [
        ResourceUsage::Unknown,
        ResourceUsage::BatchBuffer,
        ResourceUsage::ContextSwitchBuffer,
        ResourceUsage::HwContext,
        ResourceUsage::GfxRing,
        ResourceUsage::StatusPage,
        ResourceUsage::DummyPage,
        ResourceUsage::Cursor,
        ResourceUsage::PrimarySurface,
        ResourceUsage::ShadowSurface,
        ResourceUsage::KmdStagingSurface,
        ResourceUsage::AuxTable,
        ResourceUsage::Buffer,
        ResourceUsage::VertexBuffer,
        ResourceUsage::IndexBuffer,
        ResourceUsage::ConstantBuffer,
        ResourceUsage::StreamOutputBuffer,
        ResourceUsage::RenderTarget,
        ResourceUsage::DepthBuffer,
        ResourceUsage::StencilBuffer,
        ResourceUsage::HiZ,
        ResourceUsage::Mcs,
        ResourceUsage::Ccs,
        ResourceUsage::Texture,
        ResourceUsage::ShaderResource,
        ResourceUsage::ShaderResourceLlcBypass,
        ResourceUsage::SurfaceState,
        ResourceUsage::DynamicState,
        ResourceUsage::InstructionHeap,
        ResourceUsage::ScratchSpace,
        ResourceUsage::Staging,
        ResourceUsage::Uncached,
        ResourceUsage::OclBuffer,
        ResourceUsage::OclImage,
        ResourceUsage::OclSystemMemoryBuffer,
        ResourceUsage::MfxBitstream,
        ResourceUsage::MfxDecodeOutput,
        ResourceUsage::MfxEncodeReference,
        ResourceUsage::MfxStreamOut,
        ResourceUsage::VpInputPicture,
        ResourceUsage::VpOutputPicture,
        ResourceUsage::MediaCompressionState,
    ];

    /// Number of usage values.
    pub const COUNT: usize = ResourceUsage::ALL.len();

    /// Returns index of the usage in cache policy tables.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns `true` for usages of surfaces read by display engine.
    #[inline]
    pub fn is_displayable(self) -> bool {
        matches!(
            self,
            ResourceUsage::Cursor | ResourceUsage::PrimarySurface | ResourceUsage::ShadowSurface
        )
    }
}

impl Default for ResourceUsage {
    fn default() -> Self {
        ResourceUsage::Unknown
    }
}
