//! 板级配置：哪些 lane 启用了什么功能、端口能力、过流引脚和供电
//!
//! 由系统组装者填好后交给 [`crate::PadController::new`]，只消费一次。

use alloc::{string::String, vec::Vec};

use xusb_if::Capability;

use crate::{
    lane::{HsicTrims, LaneFunction},
    pad::PadKind,
    pll::CalTimeoutPolicy,
    port::PortKind,
    soc::SocRevision,
};

#[derive(Debug, Clone)]
pub struct LaneConfig {
    pub pad: PadKind,
    pub index: u8,
    pub function: LaneFunction,
    pub hs_curr_level_offset: i32,
    pub hsic: HsicTrims,
}

impl LaneConfig {
    pub fn new(pad: PadKind, index: u8, function: LaneFunction) -> Self {
        Self {
            pad,
            index,
            function,
            hs_curr_level_offset: 0,
            hsic: HsicTrims::default(),
        }
    }

    pub fn with_hs_curr_level_offset(mut self, offset: i32) -> Self {
        self.hs_curr_level_offset = offset;
        self
    }

    pub fn with_hsic_trims(mut self, trims: HsicTrims) -> Self {
        self.hsic = trims;
        self
    }
}

#[derive(Debug, Clone)]
pub struct PortConfig {
    pub kind: PortKind,
    pub index: u8,
    pub capability: Capability,
    pub internal: bool,
    /// 过流检测引脚，`None` 表示未启用过流
    pub oc_pin: Option<i32>,
    /// VBUS 稳压器名称
    pub supply: Option<String>,
}

impl PortConfig {
    pub fn new(kind: PortKind, index: u8, capability: Capability) -> Self {
        Self {
            kind,
            index,
            capability,
            internal: false,
            oc_pin: None,
            supply: None,
        }
    }

    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    pub fn with_oc_pin(mut self, pin: i32) -> Self {
        self.oc_pin = Some(pin);
        self
    }

    pub fn with_supply(mut self, name: impl Into<String>) -> Self {
        self.supply = Some(name.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub soc: SocRevision,
    pub lanes: Vec<LaneConfig>,
    pub ports: Vec<PortConfig>,
    /// HSIC pad 供电
    pub hsic_supply: Option<String>,
    /// OTG 端口的 VBUS 常开，拒绝关闭
    pub otg_vbus_alwayson: bool,
    /// A02 之前的芯片需要额外设置 HS squelch 档位
    pub pre_a02_silicon: bool,
    pub cal_timeout_policy: CalTimeoutPolicy,
}

impl BoardConfig {
    pub fn new(soc: SocRevision) -> Self {
        Self {
            soc,
            lanes: Vec::new(),
            ports: Vec::new(),
            hsic_supply: None,
            otg_vbus_alwayson: false,
            pre_a02_silicon: false,
            cal_timeout_policy: CalTimeoutPolicy::default(),
        }
    }

    pub fn with_lane(mut self, lane: LaneConfig) -> Self {
        self.lanes.push(lane);
        self
    }

    pub fn with_port(mut self, port: PortConfig) -> Self {
        self.ports.push(port);
        self
    }

    pub fn with_hsic_supply(mut self, name: impl Into<String>) -> Self {
        self.hsic_supply = Some(name.into());
        self
    }

    pub fn with_otg_vbus_alwayson(mut self, on: bool) -> Self {
        self.otg_vbus_alwayson = on;
        self
    }

    pub fn with_pre_a02_silicon(mut self, pre_a02: bool) -> Self {
        self.pre_a02_silicon = pre_a02;
        self
    }

    pub fn with_cal_timeout_policy(mut self, policy: CalTimeoutPolicy) -> Self {
        self.cal_timeout_policy = policy;
        self
    }
}
