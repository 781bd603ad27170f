//! 各 SoC 版本的静态描述表：lane 复用字段、USB3 端口映射、电源名称

use crate::{lane::LaneFunction, pad::PadKind};

/// SoC 版本
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SocRevision {
    #[default]
    T210,
    T210B01,
}

/// 一条 lane 的复用字段位置以及允许的功能列表
#[derive(Debug, Clone, Copy)]
pub struct LaneSoc {
    pub name: &'static str,
    pub offset: usize,
    pub shift: u32,
    pub mask: u32,
    pub funcs: &'static [LaneFunction],
}

impl LaneSoc {
    /// 功能在本 lane 复用字段中的编码
    pub fn mux_value(&self, function: LaneFunction) -> Option<u32> {
        self.funcs
            .iter()
            .position(|&f| f == function)
            .map(|v| v as u32)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PadSoc {
    pub kind: PadKind,
    pub lanes: &'static [LaneSoc],
}

/// USB3 端口到 lane 的映射项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usb3LaneMap {
    pub port: u8,
    pub pad: PadKind,
    pub lane: u8,
}

#[derive(Debug)]
pub struct SocConfig {
    pub revision: SocRevision,
    pub pads: &'static [PadSoc],
    pub usb2_ports: u8,
    pub hsic_ports: u8,
    pub usb3_ports: u8,
    pub usb3_map: &'static [Usb3LaneMap],
    pub supplies: &'static [&'static str],
}

impl SocConfig {
    pub fn pad(&self, kind: PadKind) -> Option<&'static PadSoc> {
        self.pads.iter().find(|p| p.kind == kind)
    }

    pub fn has_pad(&self, kind: PadKind) -> bool {
        self.pad(kind).is_some()
    }

    pub fn port_count(&self, kind: crate::port::PortKind) -> u8 {
        use crate::port::PortKind;
        match kind {
            PortKind::Usb2 => self.usb2_ports,
            PortKind::Hsic => self.hsic_ports,
            PortKind::Usb3 => self.usb3_ports,
        }
    }

    pub fn is_b01(&self) -> bool {
        self.revision == SocRevision::T210B01
    }
}

impl SocRevision {
    pub fn config(self) -> &'static SocConfig {
        match self {
            SocRevision::T210 => &T210,
            SocRevision::T210B01 => &T210B01,
        }
    }
}

// =============================================================================
// Lane 表
// =============================================================================

use LaneFunction::*;

const USB2_FUNCTIONS: &[LaneFunction] = &[Snps, Xusb, Uart];
const HSIC_FUNCTIONS: &[LaneFunction] = &[Snps, Xusb];
const PCIE_FUNCTIONS: &[LaneFunction] = &[PcieX1, Xusb, Sata, PcieX4];

const fn lane(
    name: &'static str,
    offset: usize,
    shift: u32,
    mask: u32,
    funcs: &'static [LaneFunction],
) -> LaneSoc {
    LaneSoc {
        name,
        offset,
        shift,
        mask,
        funcs,
    }
}

const USB2_LANES: &[LaneSoc] = &[
    lane("usb2-0", 0x004, 0, 0x3, USB2_FUNCTIONS),
    lane("usb2-1", 0x004, 2, 0x3, USB2_FUNCTIONS),
    lane("usb2-2", 0x004, 4, 0x3, USB2_FUNCTIONS),
    lane("usb2-3", 0x004, 6, 0x3, USB2_FUNCTIONS),
];

const HSIC_LANES: &[LaneSoc] = &[lane("hsic-0", 0x004, 14, 0x1, HSIC_FUNCTIONS)];

const PCIE_LANES: &[LaneSoc] = &[
    lane("pcie-0", 0x028, 12, 0x3, PCIE_FUNCTIONS),
    lane("pcie-1", 0x028, 14, 0x3, PCIE_FUNCTIONS),
    lane("pcie-2", 0x028, 16, 0x3, PCIE_FUNCTIONS),
    lane("pcie-3", 0x028, 18, 0x3, PCIE_FUNCTIONS),
    lane("pcie-4", 0x028, 20, 0x3, PCIE_FUNCTIONS),
    lane("pcie-5", 0x028, 22, 0x3, PCIE_FUNCTIONS),
    lane("pcie-6", 0x028, 24, 0x3, PCIE_FUNCTIONS),
];

const PCIE_LANES_B01: &[LaneSoc] = PCIE_LANES.split_at(6).0;

const SATA_LANES: &[LaneSoc] = &[lane("sata-0", 0x028, 30, 0x3, PCIE_FUNCTIONS)];

// =============================================================================
// USB3 端口映射
// =============================================================================

const fn map(port: u8, pad: PadKind, lane: u8) -> Usb3LaneMap {
    Usb3LaneMap { port, pad, lane }
}

const T210_USB3_MAP: &[Usb3LaneMap] = &[
    map(0, PadKind::Pcie, 6),
    map(1, PadKind::Pcie, 5),
    map(2, PadKind::Pcie, 0),
    map(2, PadKind::Pcie, 3),
    map(3, PadKind::Pcie, 4),
    map(3, PadKind::Sata, 0),
];

const T210B01_USB3_MAP: &[Usb3LaneMap] = &[
    map(0, PadKind::Pcie, 5),
    map(1, PadKind::Pcie, 4),
    map(2, PadKind::Pcie, 1),
];

// =============================================================================
// SoC 描述
// =============================================================================

static T210: SocConfig = SocConfig {
    revision: SocRevision::T210,
    pads: &[
        PadSoc {
            kind: PadKind::Usb2,
            lanes: USB2_LANES,
        },
        PadSoc {
            kind: PadKind::Hsic,
            lanes: HSIC_LANES,
        },
        PadSoc {
            kind: PadKind::Pcie,
            lanes: PCIE_LANES,
        },
        PadSoc {
            kind: PadKind::Sata,
            lanes: SATA_LANES,
        },
    ],
    usb2_ports: 4,
    hsic_ports: 1,
    usb3_ports: 4,
    usb3_map: T210_USB3_MAP,
    supplies: &[
        "avdd_pll_uerefe",
        "hvdd_pex_pll_e",
        "dvdd_pex_pll",
        "hvddio_pex",
        "dvddio_pex",
        "hvdd_sata",
        "dvdd_sata_pll",
        "hvddio_sata",
        "dvddio_sata",
    ],
};

static T210B01: SocConfig = SocConfig {
    revision: SocRevision::T210B01,
    pads: &[
        PadSoc {
            kind: PadKind::Usb2,
            lanes: USB2_LANES,
        },
        PadSoc {
            kind: PadKind::Pcie,
            lanes: PCIE_LANES_B01,
        },
    ],
    usb2_ports: 4,
    hsic_ports: 0,
    usb3_ports: 4,
    usb3_map: T210B01_USB3_MAP,
    supplies: &[
        "avdd_pll_uerefe",
        "hvdd_pex_pll_e",
        "dvdd_pex_pll",
        "hvddio_pex",
        "dvddio_pex",
    ],
};
