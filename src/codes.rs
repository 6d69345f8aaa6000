//! Symbolic codes carried by graph dumps.
//!
//! Format, usage and aspect values are copied verbatim from the engine's
//! Vulkan-shaped enums. They are classification data only; nothing here talks
//! to a driver.

use bitflags::bitflags;

bitflags! {
    /// Image usage bitmask (VkImageUsageFlags numbering).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ImageUsage: u32 {
        const TRANSFER_SRC = 0x1;
        const TRANSFER_DST = 0x2;
        const SAMPLED = 0x4;
        const STORAGE = 0x8;
        const COLOR_ATTACHMENT = 0x10;
        const DEPTH_STENCIL_ATTACHMENT = 0x20;
        const TRANSIENT_ATTACHMENT = 0x40;
        const INPUT_ATTACHMENT = 0x80;
    }
}

bitflags! {
    /// Image aspect bitmask (VkImageAspectFlags numbering).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ImageAspect: u32 {
        const COLOR = 0x1;
        const DEPTH = 0x2;
        const STENCIL = 0x4;
    }
}

/// The depth/stencil block of VkFormat (D16_UNORM..D32_SFLOAT_S8_UINT).
pub fn is_depth_format(code: u32) -> bool {
    (124..=130).contains(&code)
}

pub fn is_color_format(code: u32) -> bool {
    code != 0 && !is_depth_format(code)
}

/// Graph-execution unit kinds. Unknown codes are carried through untouched so
/// hand-edited dumps with engine-specific node types still analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Draw,
    Compute,
    ComputeDispatch,
    Blit,
    Clear,
    Viewport,
    MipmapGen,
    Copy,
    Present,
    Other(u32),
}

impl NodeKind {
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Self::Draw,
            1 => Self::Compute,
            2 => Self::ComputeDispatch,
            3 => Self::Blit,
            4 => Self::Clear,
            5 => Self::Viewport,
            6 => Self::MipmapGen,
            7 => Self::Copy,
            8 => Self::Present,
            other => Self::Other(other),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Self::Draw => 0,
            Self::Compute => 1,
            Self::ComputeDispatch => 2,
            Self::Blit => 3,
            Self::Clear => 4,
            Self::Viewport => 5,
            Self::MipmapGen => 6,
            Self::Copy => 7,
            Self::Present => 8,
            Self::Other(code) => code,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Draw => "draw",
            Self::Compute => "compute",
            Self::ComputeDispatch => "compute_dispatch",
            Self::Blit => "blit",
            Self::Clear => "clear",
            Self::Viewport => "viewport",
            Self::MipmapGen => "mipmap_generation",
            Self::Copy => "copy",
            Self::Present => "present",
            Self::Other(_) => "other",
        }
    }

    pub fn is_compute(self) -> bool {
        matches!(self, Self::Compute | Self::ComputeDispatch)
    }
}

/// Render-target indices above this set refer to engine-internal resources
/// (backbuffer and friends). They are legal in node input/output lists and are
/// never reported as missing render targets.
pub const BACKBUFFER_INDEX: u32 = 0xFFFF_FFFF;
pub const SWAPCHAIN_DEPTH_INDEX: u32 = 0xFFFF_FFFE;
pub const IMPORTED_EXTERNAL_INDEX: u32 = 0xFFFF_FFFD;

pub fn is_external_resource_index(index: u32) -> bool {
    external_resource_name(index).is_some()
}

pub fn external_resource_name(index: u32) -> Option<&'static str> {
    match index {
        BACKBUFFER_INDEX => Some("backbuffer"),
        SWAPCHAIN_DEPTH_INDEX => Some("swapchain_depth"),
        IMPORTED_EXTERNAL_INDEX => Some("imported_external"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_format_block_matches_vulkan_numbering() {
        assert!(is_depth_format(126)); // D32_SFLOAT
        assert!(is_depth_format(129)); // D24_UNORM_S8_UINT
        assert!(!is_depth_format(37)); // R8G8B8A8_UNORM
        assert!(is_color_format(37));
        assert!(!is_color_format(0));
    }

    #[test]
    fn node_kind_round_trips_unknown_codes() {
        assert_eq!(NodeKind::from_code(3), NodeKind::Blit);
        assert_eq!(NodeKind::from_code(42), NodeKind::Other(42));
        assert_eq!(NodeKind::Other(42).code(), 42);
    }

    #[test]
    fn external_sentinels_are_recognized() {
        assert!(is_external_resource_index(BACKBUFFER_INDEX));
        assert_eq!(external_resource_name(BACKBUFFER_INDEX), Some("backbuffer"));
        assert!(!is_external_resource_index(1000));
    }
}
