//! Lane：最小可寻址的物理单元

use id_arena::Id;

use crate::{pad::PadId, port::PortId, soc::LaneSoc};

pub type LaneId = Id<Lane>;

/// Lane 复用功能
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneFunction {
    Snps,
    Xusb,
    Uart,
    PcieX1,
    Sata,
    PcieX4,
}

impl LaneFunction {
    pub const fn name(self) -> &'static str {
        match self {
            LaneFunction::Snps => "snps",
            LaneFunction::Xusb => "xusb",
            LaneFunction::Uart => "uart",
            LaneFunction::PcieX1 => "pcie-x1",
            LaneFunction::Sata => "sata",
            LaneFunction::PcieX4 => "pcie-x4",
        }
    }
}

/// HSIC lane 的 trim 参数
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HsicTrims {
    pub strobe_trim: u32,
    pub tx_rtune_p: u32,
    pub rx_strobe_trim: u32,
    pub rx_data_trim: u32,
}

#[derive(Debug)]
pub struct Lane {
    pub(crate) soc: &'static LaneSoc,
    pub(crate) index: u8,
    pub(crate) pad: PadId,
    pub(crate) function: LaneFunction,
    pub(crate) owning_port: Option<PortId>,
    /// USB2：叠加在熔丝 HS 电流档位上的偏移
    pub(crate) hs_curr_level_offset: i32,
    pub(crate) hsic: HsicTrims,
    /// USB2：UTMI pad 是否已上电
    pub(crate) powered_on: bool,
}

impl Lane {
    pub fn name(&self) -> &'static str {
        self.soc.name
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn pad(&self) -> PadId {
        self.pad
    }

    pub fn function(&self) -> LaneFunction {
        self.function
    }

    pub fn owning_port(&self) -> Option<PortId> {
        self.owning_port
    }

    pub fn is_xusb(&self) -> bool {
        self.function == LaneFunction::Xusb
    }
}
