//! 端口：面向总线控制器的逻辑端点
//!
//! USB2/HSIC 端口与同号 lane 一一对应；USB3 端口通过各 SoC 的静态表映射到
//! PCIe 或 SATA lane 上，第一次使用时解析并缓存。

use alloc::{format, string::String};

use id_arena::Id;
use xusb_if::Capability;

use crate::{
    err::{PadctlError, Result},
    lane::LaneId,
    padctl::{PadController, PadctlGuard, PadctlInner},
    regs::*,
};

pub type PortId = Id<Port>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PortKind {
    Usb2,
    Hsic,
    Usb3,
}

impl PortKind {
    pub const fn name(self) -> &'static str {
        match self {
            PortKind::Usb2 => "usb2",
            PortKind::Hsic => "hsic",
            PortKind::Usb3 => "usb3",
        }
    }
}

#[derive(Debug)]
pub struct Port {
    pub(crate) kind: PortKind,
    pub(crate) index: u8,
    pub(crate) capability: Capability,
    pub(crate) lane: Option<LaneId>,
    pub(crate) internal: bool,
    pub(crate) oc_pin: Option<i32>,
    pub(crate) supply: Option<String>,
    pub(crate) enable: u32,
}

impl Port {
    pub fn kind(&self) -> PortKind {
        self.kind
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }
}

// =============================================================================
// 映射
// =============================================================================

impl PadctlInner {
    pub fn find_port(&self, kind: PortKind, index: u8) -> Option<PortId> {
        self.ports
            .iter()
            .find(|(_, p)| p.kind == kind && p.index == index)
            .map(|(id, _)| id)
    }

    /// USB3 端口到 lane：取映射表中第一个功能为 `xusb` 的 lane
    fn usb3_lane_lookup(&self, index: u8) -> Option<LaneId> {
        self.soc
            .usb3_map
            .iter()
            .filter(|m| m.port == index)
            .filter_map(|m| self.find_lane(m.pad, m.lane))
            .find(|&id| self.lanes.get(id).is_some_and(|l| l.is_xusb()))
    }

    /// 解析端口所在的 lane，结果缓存在端口上
    pub fn resolve_port(&mut self, port: PortId) -> Result<LaneId> {
        let p = self.port_ref(port)?;
        if let Some(lane) = p.lane {
            return Ok(lane);
        }

        let index = p.index;
        let lane = self.usb3_lane_lookup(index).ok_or_else(|| {
            PadctlError::config(format!("usb3-{index}: no lane with xusb function"))
        })?;

        if let Some(p) = self.ports.get_mut(port) {
            p.lane = Some(lane);
        }
        if let Some(l) = self.lanes.get_mut(lane) {
            l.owning_port = Some(port);
        }
        log::debug!(
            "usb3-{index} mapped to {}",
            self.lane_ref(lane).map_or("?", |l| l.name())
        );
        Ok(lane)
    }

    /// lane 到 USB3 端口号的反查
    pub fn usb3_port_of_lane(&self, lane: LaneId) -> Option<u8> {
        let l = self.lanes.get(lane)?;
        let kind = self.pads.get(l.pad)?.kind;
        self.soc
            .usb3_map
            .iter()
            .find(|m| m.pad == kind && m.lane == l.index)
            .map(|m| m.port)
    }
}

// =============================================================================
// SuperSpeed 端口上下电
// =============================================================================

impl PadctlGuard<'_> {
    pub(crate) fn port_power_on(&mut self, port: PortId) -> Result {
        let (kind, index, internal, enable) = {
            let p = self.port_ref(port)?;
            (p.kind, p.index, p.internal, p.enable)
        };
        if kind != PortKind::Usb3 || enable > 0 {
            self.bump_port(port, 1);
            return Ok(());
        }

        let lane = self.resolve_port(port)?;
        let lane_index = self.lane_ref(lane)?.index;
        log::info!("usb3-{index}: power on (lane {lane_index})");

        // 步骤 1: 解除端口钳位
        self.ssp_unclamp(index);

        // 步骤 2: 均衡与终端参数
        self.regs.modify(
            uphy_usb3_pad_ectl1(index),
            UPHY_USB3_PAD_ECTL1::TX_TERM_CTRL.val(2),
        );
        self.regs.modify(
            uphy_usb3_pad_ectl2(index),
            UPHY_USB3_PAD_ECTL2::RX_CTLE.val(0x00fc),
        );
        self.regs
            .writel(uphy_usb3_pad_ectl3(index), USB3_PAD_ECTL3_RX_DFE_VAL);
        self.regs.modify(
            uphy_usb3_pad_ectl4(index),
            UPHY_USB3_PAD_ECTL4::RX_CDR_CTRL.val(0x01c7),
        );
        self.regs
            .writel(uphy_usb3_pad_ectl6(index), USB3_PAD_ECTL6_RX_EQ_CTRL_H_VAL);

        // 步骤 3: 写入端口映射
        let i = index as usize;
        self.regs.modify(
            SS_PORT_MAP,
            SS_PORT_INTERNAL_FIELDS[i].val(internal as u32)
                + SS_PORT_MAP_FIELDS[i].val(lane_index as u32),
        );

        self.bump_port(port, 1);
        Ok(())
    }

    pub(crate) fn port_power_off(&mut self, port: PortId) -> Result {
        let (kind, index, enable) = {
            let p = self.port_ref(port)?;
            (p.kind, p.index, p.enable)
        };
        if enable == 0 {
            log::warn!("{}-{index}: unbalanced power off", kind.name());
            return Err(PadctlError::config("port power off with zero count"));
        }

        self.bump_port(port, -1);
        if kind != PortKind::Usb3 || enable > 1 {
            return Ok(());
        }

        log::info!("usb3-{index}: power off");
        self.ssp_clamp(index);
        self.regs.modify(
            SS_PORT_MAP,
            SS_PORT_MAP_FIELDS[index as usize].val(SS_PORT_MAP_DISABLED),
        );
        Ok(())
    }

    fn bump_port(&mut self, port: PortId, delta: i32) {
        if let Some(p) = self.ports.get_mut(port) {
            p.enable = p.enable.saturating_add_signed(delta);
        }
    }
}

impl PadController {
    /// USB3 端口对应的 lane
    pub fn resolve(&self, port: PortId) -> Result<LaneId> {
        self.lock().resolve_port(port)
    }

    pub fn lane_to_usb3_port(&self, lane: LaneId) -> Option<u8> {
        self.lock().usb3_port_of_lane(lane)
    }

    pub fn port_power_on(&self, port: PortId) -> Result {
        self.lock().port_power_on(port)
    }

    pub fn port_power_off(&self, port: PortId) -> Result {
        self.lock().port_power_off(port)
    }

    pub fn port_enable_count(&self, port: PortId) -> u32 {
        self.lock().ports.get(port).map_or(0, |p| p.enable)
    }

    pub fn port_capability(&self, port: PortId) -> Option<Capability> {
        self.lock().ports.get(port).map(|p| p.capability)
    }
}
