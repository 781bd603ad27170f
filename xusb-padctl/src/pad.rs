//! Pad：共享时钟、供电和 tracking 电路的一组 lane

use alloc::{string::String, vec::Vec};

use id_arena::Id;

use crate::lane::LaneId;

pub type PadId = Id<Pad>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadKind {
    Usb2,
    Hsic,
    /// PCIe lane 组，USB3 lane 也在其中
    Pcie,
    /// SATA lane 组
    Sata,
}

impl PadKind {
    pub const fn name(self) -> &'static str {
        match self {
            PadKind::Usb2 => "usb2",
            PadKind::Hsic => "hsic",
            PadKind::Pcie => "pcie",
            PadKind::Sata => "sata",
        }
    }
}

#[derive(Debug)]
pub struct Pad {
    pub(crate) kind: PadKind,
    pub(crate) lanes: Vec<LaneId>,
    pub(crate) supply: Option<String>,
    /// 已上电的 lane 数；只有 0→1 / 1→0 时才动 bias/tracking 电路
    pub(crate) enable: u32,
}

impl Pad {
    pub(crate) fn new(kind: PadKind) -> Self {
        Self {
            kind,
            lanes: Vec::new(),
            supply: None,
            enable: 0,
        }
    }

    pub fn kind(&self) -> PadKind {
        self.kind
    }

    pub fn lanes(&self) -> &[LaneId] {
        &self.lanes
    }

    pub fn enable_count(&self) -> u32 {
        self.enable
    }
}
