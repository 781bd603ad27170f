//! Tegra210 XUSB pad 控制器
//!
//! 负责把少量物理 lane（USB3/PCIe/SATA 高速差分 lane 以及 USB2/HSIC pad）
//! 复用到更多的逻辑端口上，并驱动它们共同依赖的 UPHY PLL 的上电校准。
//!
//! ```text
//! PadController ── Phy(lane) ── init/exit ──── 共享使能 ── PLL 校准 + 钳位
//!               │             └ power_on/off ─ 按 pad 类型分派
//!               ├─ port_power_on/off ───────── SuperSpeed 端口映射与钳位
//!               ├─ vbus/id override ────────── OTG 仲裁
//!               └─ sleepwalk / wake ────────── PMC 交接
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
mod elpg;
pub mod err;
pub mod fuse;
pub mod lane;
pub mod osal;
mod otg;
pub mod pad;
pub mod padctl;
pub mod phy;
pub mod pll;
pub mod port;
pub mod regmap;
pub mod regs;
pub mod sim;
mod sleepwalk;
pub mod soc;

/// MMIO 寄存器块基地址
pub type Mmio = core::ptr::NonNull<u8>;

pub use config::{BoardConfig, LaneConfig, PortConfig};
pub use err::Result;
pub use lane::{HsicTrims, LaneFunction, LaneId};
pub use pad::PadKind;
pub use padctl::{PadController, PadctlOps, PadctlStats};
pub use phy::Phy;
pub use pll::{CalState, CalTimeoutPolicy, CalibrationReport};
pub use port::{PortId, PortKind};
pub use regmap::{MmioIo, RegisterIo};
pub use soc::SocRevision;
pub use xusb_if::{
    Capability, ClockId, DeviceSpeed, PadctlError, PllKind, ResetId, UtmiPadConfig, ops,
};
