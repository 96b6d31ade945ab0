/// Pixel formats understood by the layout calculator.
///
/// Only the properties relevant for memory layout are modeled:
/// element size, compression block extent and the format family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum Format {
    R8Unorm,
    R8G8Unorm,
    R16Float,
    B5G6R5Unorm,
    R8G8B8A8Unorm,
    B8G8R8A8Unorm,
    R10G10B10A2Unorm,
    R32Float,
    R16G16B16A16Float,
    R32G32Float,
    R32G32B32A32Float,

    D16Unorm,
    D24UnormS8Uint,
    D32Float,
    D32FloatS8X24Uint,
    S8Uint,

    Bc1,
    Bc2,
    Bc3,
    Bc4,
    Bc5,
    Bc6h,
    Bc7,
    Etc2Rgb8,
    Etc2EacRgba8,
    Astc4x4,
    Astc8x8,

    Yuy2,
    Uyvy,
    Ayuv,
    Y210,
    Y216,
    Y410,
    Y416,

    Nv12,
    Nv21,
    Nv11,
    P010,
    P012,
    P016,
    P208,
    P216,
    Imc1,
    Imc2,
    Imc3,
    Imc4,
    I420,
    Iyuv,
    Yv12,
    Yvu9,
    Rgbp,
    Bgrp,
    MfxJpegYuv420,
    MfxJpegYuv422H,
    MfxJpegYuv422V,
    MfxJpegYuv411,
    MfxJpegYuv411R,
    MfxJpegYuv444,
}

/// Family of a format, which selects alignment and fill rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormatKind {
    Color,
    Depth,
    DepthStencil,
    Stencil,
    Compressed,
    PackedYuv,
    Planar,
}

/// Layout-relevant description of a format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FormatInfo {
    /// Size of one element in bits.
    /// For compressed formats the element is one block,
    /// for planar formats it is one sample of the luma plane.
    pub bits_per_element: u32,

    /// Compression block extent in pixels, `(1, 1, 1)` for uncompressed formats.
    pub block_width: u32,
    pub block_height: u32,
    pub block_depth: u32,

    pub kind: FormatKind,
}

const fn color(bits_per_element: u32, kind: FormatKind) -> FormatInfo {
    FormatInfo {
        bits_per_element,
        block_width: 1,
        block_height: 1,
        block_depth: 1,
        kind,
    }
}

const fn block(bits_per_element: u32, block_width: u32, block_height: u32) -> FormatInfo {
    FormatInfo {
        bits_per_element,
        block_width,
        block_height,
        block_depth: 1,
        kind: FormatKind::Compressed,
    }
}

impl Format {
    /// Returns layout-relevant properties of the format.
    pub const fn info(self) -> FormatInfo {
        use {Format::*, FormatKind::*};

        match self {
            R8Unorm => color(8, Color),
            R8G8Unorm | R16Float | B5G6R5Unorm => color(16, Color),
            R8G8B8A8Unorm | B8G8R8A8Unorm | R10G10B10A2Unorm | R32Float => color(32, Color),
            R16G16B16A16Float | R32G32Float => color(64, Color),
            R32G32B32A32Float => color(128, Color),

            D16Unorm => color(16, Depth),
            D32Float => color(32, Depth),
            D24UnormS8Uint => color(32, DepthStencil),
            D32FloatS8X24Uint => color(64, DepthStencil),
            S8Uint => color(8, Stencil),

            Bc1 | Bc4 | Etc2Rgb8 => block(64, 4, 4),
            Bc2 | Bc3 | Bc5 | Bc6h | Bc7 | Etc2EacRgba8 | Astc4x4 => block(128, 4, 4),
            Astc8x8 => block(128, 8, 8),

            Yuy2 | Uyvy => color(16, PackedYuv),
            Ayuv | Y210 | Y216 | Y410 => color(32, PackedYuv),
            Y416 => color(64, PackedYuv),

            Nv12 | Nv21 | Nv11 | P208 | Imc1 | Imc2 | Imc3 | Imc4 | I420 | Iyuv | Yv12 | Yvu9
            | Rgbp | Bgrp | MfxJpegYuv420 | MfxJpegYuv422H | MfxJpegYuv422V | MfxJpegYuv411
            | MfxJpegYuv411R | MfxJpegYuv444 => color(8, Planar),
            P010 | P012 | P016 | P216 => color(16, Planar),
        }
    }

    #[inline]
    pub const fn bits_per_element(self) -> u32 {
        self.info().bits_per_element
    }

    #[inline]
    pub fn is_planar(self) -> bool {
        self.info().kind == FormatKind::Planar
    }

    #[inline]
    pub fn is_compressed(self) -> bool {
        self.info().kind == FormatKind::Compressed
    }

    #[inline]
    pub fn is_depth(self) -> bool {
        matches!(
            self.info().kind,
            FormatKind::Depth | FormatKind::DepthStencil
        )
    }

    /// Returns `true` for the planar formats whose chroma planes are
    /// stored as linear arrays after the luma plane, ignoring pitch.
    /// Those cannot be tiled.
    #[inline]
    pub fn is_linear_chroma_planar(self) -> bool {
        matches!(
            self,
            Format::I420 | Format::Iyuv | Format::Yv12 | Format::Yvu9
        )
    }
}
