#![no_std]

extern crate alloc;

pub mod err;
pub mod ops;

use num_enum::{FromPrimitive, IntoPrimitive, TryFromPrimitive};

pub use err::PadctlError;

/// 端口能力，与 `USB2_PORT_CAP` 中每个端口的 2 位编码一致
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Capability {
    #[default]
    Disabled = 0,
    Host = 1,
    Device = 2,
    Otg = 3,
}

/// USB 设备速度
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum DeviceSpeed {
    Low = 0,
    #[num_enum(default)]
    Full = 1,
    High = 2,
    SuperSpeed = 4,
    SuperSpeedPlus = 5,
}

/// UPHY PLL 实例
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PllKind {
    /// PCIe 类 PLL (P0)，同时服务 USB3 lane
    Pcie,
    /// SATA 类 PLL (S0)
    Sata,
}

impl PllKind {
    pub const fn name(self) -> &'static str {
        match self {
            PllKind::Pcie => "pcie",
            PllKind::Sata => "sata",
        }
    }
}

/// Pad 控制器依赖的时钟
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClockId {
    /// PLLE 参考时钟
    Plle,
    /// UPHY 管理时钟 (仅 B01)
    UphyMgmt,
    /// USB2 bias pad tracking 时钟
    Usb2Trk,
    /// HSIC tracking 时钟
    HsicTrk,
}

/// Pad 控制器依赖的复位线
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResetId {
    PexPll,
    SataPll,
}

impl From<PllKind> for ResetId {
    fn from(kind: PllKind) -> Self {
        match kind {
            PllKind::Pcie => ResetId::PexPll,
            PllKind::Sata => ResetId::SataPll,
        }
    }
}

/// 交给 PMC 的 UTMI pad 电气快照
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UtmiPadConfig {
    pub tctrl: u32,
    pub pctrl: u32,
    pub rpd_ctrl: u32,
}
