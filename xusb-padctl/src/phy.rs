//! 面向总线控制器的 phy 操作
//!
//! 每个 lane 对外表现为一个 [`Phy`]，init/exit/power_on/power_off 按 lane
//! 所在 pad 的类型分派：
//!
//! | pad  | init/exit          | power_on/power_off              |
//! |------|--------------------|---------------------------------|
//! | usb2 | bias 复用 + VBUS   | 端口能力、熔丝参数、bias tracking |
//! | hsic | tracking 复用      | trim、上下拉、tracking           |
//! | pcie | 共享使能           | IDDQ                            |
//! | sata | 共享使能           | IDDQ                            |

use xusb_if::{Capability, ClockId, DeviceSpeed};

use crate::{
    err::{PadctlError, Result},
    lane::{LaneFunction, LaneId},
    osal::udelay,
    pad::PadKind,
    padctl::{PadController, PadctlGuard},
    port::{PortId, PortKind},
    regs::*,
};

/// 以 lane 为键的 phy 句柄
#[derive(Clone, Copy)]
pub struct Phy<'a> {
    ctl: &'a PadController,
    lane: LaneId,
}

impl<'a> Phy<'a> {
    pub(crate) fn new(ctl: &'a PadController, lane: LaneId) -> Self {
        Self { ctl, lane }
    }

    pub fn lane(&self) -> LaneId {
        self.lane
    }

    pub fn init(&self) -> Result {
        let mut g = self.ctl.lock();
        let kind = g.lane_kind(self.lane)?;
        log::debug!("phy init {}", g.lane_ref(self.lane)?.name());
        match kind {
            PadKind::Usb2 => g.usb2_phy_init(self.lane),
            PadKind::Hsic => g.hsic_phy_init(),
            PadKind::Pcie | PadKind::Sata => g.shared_enable(),
        }
    }

    pub fn exit(&self) -> Result {
        let mut g = self.ctl.lock();
        let kind = g.lane_kind(self.lane)?;
        log::debug!("phy exit {}", g.lane_ref(self.lane)?.name());
        match kind {
            PadKind::Usb2 => g.usb2_phy_exit(self.lane),
            PadKind::Hsic | PadKind::Pcie | PadKind::Sata => g.shared_disable(),
        }
    }

    pub fn power_on(&self) -> Result {
        let mut g = self.ctl.lock();
        let kind = g.lane_kind(self.lane)?;
        log::debug!("phy power on {}", g.lane_ref(self.lane)?.name());
        match kind {
            PadKind::Usb2 => g.usb2_phy_power_on(self.lane),
            PadKind::Hsic => g.hsic_phy_power_on(self.lane),
            PadKind::Pcie | PadKind::Sata => g.uphy_lane_power_on(self.lane, kind),
        }
    }

    pub fn power_off(&self) -> Result {
        let mut g = self.ctl.lock();
        let kind = g.lane_kind(self.lane)?;
        log::debug!("phy power off {}", g.lane_ref(self.lane)?.name());
        match kind {
            PadKind::Usb2 => g.usb2_phy_power_off(self.lane),
            PadKind::Hsic => g.hsic_phy_power_off(self.lane),
            PadKind::Pcie | PadKind::Sata => g.uphy_lane_power_off(self.lane, kind),
        }
    }

    pub fn enable_wake(&self) -> Result {
        self.ctl.lock().set_wake(self.lane, true)
    }

    pub fn disable_wake(&self) -> Result {
        self.ctl.lock().set_wake(self.lane, false)
    }

    pub fn remote_wake_detected(&self) -> Result<bool> {
        self.ctl.lock().remote_wake_detected(self.lane)
    }

    pub fn enable_sleepwalk(&self, speed: DeviceSpeed) -> Result {
        self.ctl.lock().enable_sleepwalk(self.lane, speed)
    }

    pub fn disable_sleepwalk(&self) -> Result {
        self.ctl.lock().disable_sleepwalk(self.lane)
    }

    /// 该 USB2 lane 对应的端口是否为 OTG
    pub fn has_otg_cap(&self) -> bool {
        let g = self.ctl.lock();
        matches!(g.lane_kind(self.lane), Ok(PadKind::Usb2))
            && g
                .usb2_port_of_lane(self.lane)
                .ok()
                .and_then(|p| g.ports.get(p))
                .is_some_and(|p| p.capability == Capability::Otg)
    }
}

impl PadctlGuard<'_> {
    pub(crate) fn usb2_port_of_lane(&self, lane: LaneId) -> Result<PortId> {
        let index = self.lane_ref(lane)?.index;
        self.find_port(PortKind::Usb2, index).ok_or_else(|| {
            PadctlError::config(alloc::format!("no port found for USB2 lane {index}"))
        })
    }

    /// 主机端口在未启用过流检测时由本驱动直接管理 VBUS 稳压器
    fn usb2_vbus_supply(&self, port: PortId) -> Option<alloc::string::String> {
        let p = self.ports.get(port)?;
        let oc_enabled = p.oc_pin.is_some() && self.ops.vbus_pin.is_some();
        if p.capability == Capability::Host && !oc_enabled {
            p.supply.clone()
        } else {
            None
        }
    }

    fn pad_enable_inc(&mut self, kind: PadKind) -> u32 {
        let Some(pad) = self.pad_of_kind(kind).and_then(|id| self.pads.get_mut(id)) else {
            return 0;
        };
        pad.enable += 1;
        pad.enable
    }

    fn pad_enable_dec(&mut self, kind: PadKind) -> Result<u32> {
        let pad = self
            .pad_of_kind(kind)
            .and_then(|id| self.pads.get_mut(id))
            .ok_or_else(|| PadctlError::config("pad not present"))?;
        if pad.enable == 0 {
            log::warn!("{} pad: unbalanced power off", kind.name());
            return Err(PadctlError::config("pad power off with zero count"));
        }
        pad.enable -= 1;
        Ok(pad.enable)
    }

    fn pad_enable_count(&self, kind: PadKind) -> u32 {
        self.pad_of_kind(kind)
            .and_then(|id| self.pads.get(id))
            .map_or(0, |p| p.enable)
    }

    // =========================================================================
    // USB2
    // =========================================================================

    fn usb2_phy_init(&mut self, lane: LaneId) -> Result {
        let port = self.usb2_port_of_lane(lane)?;
        let (index, capability) = {
            let p = self.port_ref(port)?;
            (p.index, p.capability)
        };

        self.regs
            .modify(USB2_PAD_MUX, USB2_PAD_MUX::USB2_BIAS_PAD::Xusb);

        let supply = self.usb2_vbus_supply(port);
        if let Some(name) = &supply {
            self.ops.regulator.enable(name)?;
        }

        if capability == Capability::Otg {
            if let Some(other) = self.usb2_otg_port.filter(|&o| o != index) {
                log::warn!("usb2-{index}: usb2-{other} is already the OTG port, replacing");
            }
            self.usb2_otg_port = Some(index);
        }

        let res = self.shared_enable();
        if res.is_err() {
            if let Some(name) = &supply {
                if let Err(e) = self.ops.regulator.disable(name) {
                    log::warn!("{name}: rollback disable failed: {e}");
                }
            }
        }
        res
    }

    fn usb2_phy_exit(&mut self, lane: LaneId) -> Result {
        let port = self.usb2_port_of_lane(lane)?;
        let (index, capability) = {
            let p = self.port_ref(port)?;
            (p.index, p.capability)
        };

        if let Some(name) = self.usb2_vbus_supply(port) {
            if let Err(e) = self.ops.regulator.disable(&name) {
                log::error!("usb2-{index}: failed to disable VBUS {name}: {e}");
            }
        }

        if capability == Capability::Otg && self.usb2_otg_port == Some(index) {
            self.usb2_otg_port = None;
        }

        self.shared_disable()
    }

    fn usb2_phy_power_on(&mut self, lane: LaneId) -> Result {
        let port = self.usb2_port_of_lane(lane)?;
        let capability = self.port_ref(port)?.capability;
        let (index, offset) = {
            let l = self.lane_ref(lane)?;
            (l.index, l.hs_curr_level_offset)
        };
        let i = index as usize;

        // bias pad 阈值
        let squelch = if self.policy.pre_a02_silicon { 2 } else { 0 };
        self.regs.modify(
            USB2_BIAS_PAD_CTL0,
            USB2_BIAS_PAD_CTL0::HS_DISCON_LEVEL.val(7)
                + USB2_BIAS_PAD_CTL0::HS_SQUELCH_LEVEL.val(squelch),
        );

        self.regs.modify(
            USB2_PORT_CAP,
            USB2_PORT_CAP_FIELDS[i].val(u8::from(capability) as u32),
        );

        // 熔丝校准值
        let level = (self.fuse.hs_curr_level[i] as i32 + offset).clamp(0, 0x3f) as u32;
        self.regs.modify(
            usb2_otg_pad_ctl0(index),
            USB2_OTG_PAD_CTL0::HS_CURR_LEVEL.val(level)
                + USB2_OTG_PAD_CTL0::PD::CLEAR
                + USB2_OTG_PAD_CTL0::PD2::CLEAR
                + USB2_OTG_PAD_CTL0::PD_ZI::CLEAR,
        );
        self.regs.modify(
            usb2_otg_pad_ctl1(index),
            USB2_OTG_PAD_CTL1::TERM_RANGE_ADJ.val(self.fuse.hs_term_range_adj)
                + USB2_OTG_PAD_CTL1::RPD_CTRL.val(self.fuse.rpd_ctrl),
        );
        self.regs.modify(
            battery_chrg_otgpad_ctl1(index),
            BATTERY_CHRG_OTGPAD_CTL1::VREG_LEV.val(0) + BATTERY_CHRG_OTGPAD_CTL1::VREG_FIX18::SET,
        );

        if self.pad_enable_count(PadKind::Usb2) > 0 {
            self.pad_enable_inc(PadKind::Usb2);
            return Ok(());
        }

        // 第一个 lane 上电：启动 bias tracking
        self.ops.car.clk_enable(ClockId::Usb2Trk)?;
        self.regs.modify(
            USB2_BIAS_PAD_CTL1,
            USB2_BIAS_PAD_CTL1::TRK_START_TIMER.val(0x1e)
                + USB2_BIAS_PAD_CTL1::TRK_DONE_RESET_TIMER.val(0x0a),
        );
        self.regs
            .modify(USB2_BIAS_PAD_CTL0, USB2_BIAS_PAD_CTL0::PD::CLEAR);
        udelay(self.kernel(), 1);
        self.regs
            .modify(USB2_BIAS_PAD_CTL1, USB2_BIAS_PAD_CTL1::PD_TRK::CLEAR);
        udelay(self.kernel(), 50);
        self.ops.car.clk_disable(ClockId::Usb2Trk);

        self.pad_enable_inc(PadKind::Usb2);
        log::info!("usb2 pad: bias tracking armed");
        Ok(())
    }

    fn usb2_phy_power_off(&mut self, lane: LaneId) -> Result {
        self.usb2_port_of_lane(lane)?;
        if self.pad_enable_dec(PadKind::Usb2)? > 0 {
            return Ok(());
        }
        self.regs
            .modify(USB2_BIAS_PAD_CTL0, USB2_BIAS_PAD_CTL0::PD::SET);
        log::info!("usb2 pad: bias powered down");
        Ok(())
    }

    // =========================================================================
    // HSIC
    // =========================================================================

    fn hsic_phy_init(&mut self) -> Result {
        self.regs
            .modify(USB2_PAD_MUX, USB2_PAD_MUX::HSIC_PAD_TRK::Xusb);
        self.shared_enable()
    }

    fn hsic_supply(&self) -> Option<alloc::string::String> {
        self.pad_of_kind(PadKind::Hsic)
            .and_then(|id| self.pads.get(id))
            .and_then(|p| p.supply.clone())
    }

    fn hsic_phy_power_on(&mut self, lane: LaneId) -> Result {
        let (index, trims) = {
            let l = self.lane_ref(lane)?;
            (l.index, l.hsic)
        };
        let supply = self.hsic_supply();
        if let Some(name) = &supply {
            self.ops.regulator.enable(name)?;
        }

        self.regs.writel(HSIC_STRB_TRIM_CONTROL, trims.strobe_trim);
        self.regs.modify(
            hsic_pad_ctl1(index),
            HSIC_PAD_CTL1::TX_RTUNEP.val(trims.tx_rtune_p),
        );
        self.regs.modify(
            hsic_pad_ctl2(index),
            HSIC_PAD_CTL2::RX_STROBE_TRIM.val(trims.rx_strobe_trim)
                + HSIC_PAD_CTL2::RX_DATA_TRIM.val(trims.rx_data_trim),
        );
        self.regs.modify(
            hsic_pad_ctl0(index),
            HSIC_PAD_CTL0::RPU_DATA0::CLEAR
                + HSIC_PAD_CTL0::RPU_DATA1::CLEAR
                + HSIC_PAD_CTL0::RPU_STROBE::CLEAR
                + HSIC_PAD_CTL0::PD_RX_DATA0::CLEAR
                + HSIC_PAD_CTL0::PD_RX_DATA1::CLEAR
                + HSIC_PAD_CTL0::PD_RX_STROBE::CLEAR
                + HSIC_PAD_CTL0::PD_ZI_DATA0::CLEAR
                + HSIC_PAD_CTL0::PD_ZI_DATA1::CLEAR
                + HSIC_PAD_CTL0::PD_ZI_STROBE::CLEAR
                + HSIC_PAD_CTL0::PD_TX_DATA0::CLEAR
                + HSIC_PAD_CTL0::PD_TX_DATA1::CLEAR
                + HSIC_PAD_CTL0::PD_TX_STROBE::CLEAR
                + HSIC_PAD_CTL0::RPD_DATA0::SET
                + HSIC_PAD_CTL0::RPD_DATA1::SET
                + HSIC_PAD_CTL0::RPD_STROBE::SET,
        );

        if self.pad_enable_count(PadKind::Hsic) > 0 {
            self.pad_enable_inc(PadKind::Hsic);
            return Ok(());
        }

        if let Err(e) = self.ops.car.clk_enable(ClockId::HsicTrk) {
            if let Some(name) = &supply {
                if let Err(err) = self.ops.regulator.disable(name) {
                    log::warn!("{name}: rollback disable failed: {err}");
                }
            }
            return Err(e);
        }
        self.regs.modify(
            HSIC_PAD_TRK_CTL,
            HSIC_PAD_TRK_CTL::TRK_START_TIMER.val(0x1e)
                + HSIC_PAD_TRK_CTL::TRK_DONE_RESET_TIMER.val(0x0a),
        );
        udelay(self.kernel(), 1);
        self.regs
            .modify(HSIC_PAD_TRK_CTL, HSIC_PAD_TRK_CTL::PD_TRK::CLEAR);
        udelay(self.kernel(), 50);
        self.ops.car.clk_disable(ClockId::HsicTrk);

        self.pad_enable_inc(PadKind::Hsic);
        Ok(())
    }

    fn hsic_phy_power_off(&mut self, lane: LaneId) -> Result {
        let index = self.lane_ref(lane)?.index;
        self.pad_enable_dec(PadKind::Hsic)?;

        self.regs.modify(
            hsic_pad_ctl0(index),
            HSIC_PAD_CTL0::PD_RX_DATA0::SET
                + HSIC_PAD_CTL0::PD_RX_DATA1::SET
                + HSIC_PAD_CTL0::PD_RX_STROBE::SET
                + HSIC_PAD_CTL0::PD_ZI_DATA0::SET
                + HSIC_PAD_CTL0::PD_ZI_DATA1::SET
                + HSIC_PAD_CTL0::PD_ZI_STROBE::SET
                + HSIC_PAD_CTL0::PD_TX_DATA0::SET
                + HSIC_PAD_CTL0::PD_TX_DATA1::SET
                + HSIC_PAD_CTL0::PD_TX_STROBE::SET,
        );

        if let Some(name) = self.hsic_supply() {
            if let Err(e) = self.ops.regulator.disable(&name) {
                log::error!("hsic-{index}: failed to disable {name}: {e}");
            }
        }
        Ok(())
    }

    pub(crate) fn hsic_set_idle(&mut self, index: u8, idle: bool) {
        let pulls = if idle {
            HSIC_PAD_CTL0::RPD_DATA0::SET
                + HSIC_PAD_CTL0::RPD_DATA1::SET
                + HSIC_PAD_CTL0::RPU_STROBE::SET
        } else {
            HSIC_PAD_CTL0::RPD_DATA0::CLEAR
                + HSIC_PAD_CTL0::RPD_DATA1::CLEAR
                + HSIC_PAD_CTL0::RPU_STROBE::CLEAR
        };
        self.regs.modify(
            hsic_pad_ctl0(index),
            HSIC_PAD_CTL0::RPU_DATA0::CLEAR
                + HSIC_PAD_CTL0::RPU_DATA1::CLEAR
                + HSIC_PAD_CTL0::RPD_STROBE::CLEAR
                + pulls,
        );
    }

    // =========================================================================
    // PCIe / SATA lane
    // =========================================================================

    fn uphy_lane_power_on(&mut self, lane: LaneId, kind: PadKind) -> Result {
        let (index, function) = {
            let l = self.lane_ref(lane)?;
            (l.index, l.function)
        };
        let i = index as usize;

        if kind == PadKind::Pcie {
            if self.soc.is_b01() {
                let defaults = match function {
                    LaneFunction::Xusb => Some(USB3_LANE_DEFAULTS),
                    LaneFunction::PcieX1 | LaneFunction::PcieX4 => Some(PCIE_LANE_DEFAULTS),
                    _ => None,
                };
                if let Some(seq) = defaults {
                    self.regs.uphy_cfg_write(uphy_misc_pad_px_ctl8(index), seq);
                }
            }
            self.regs
                .modify(USB3_PAD_MUX, PCIE_IDDQ_DISABLE_FIELDS[i].val(1));
        } else {
            self.regs
                .modify(USB3_PAD_MUX, SATA_IDDQ_DISABLE_FIELDS[i].val(1));
        }

        self.pad_enable_inc(kind);
        Ok(())
    }

    fn uphy_lane_power_off(&mut self, lane: LaneId, kind: PadKind) -> Result {
        let i = self.lane_ref(lane)?.index as usize;
        self.pad_enable_dec(kind)?;

        let field = if kind == PadKind::Pcie {
            PCIE_IDDQ_DISABLE_FIELDS[i]
        } else {
            SATA_IDDQ_DISABLE_FIELDS[i]
        };
        self.regs.modify(USB3_PAD_MUX, field.val(0));
        Ok(())
    }

    // =========================================================================
    // USB3 LFPS
    // =========================================================================

    pub(crate) fn usb3_set_lfps_detect(&mut self, port: u8, enable: bool) -> Result {
        let port_id = self
            .find_port(PortKind::Usb3, port)
            .ok_or_else(|| PadctlError::config(alloc::format!("usb3-{port} not found")))?;
        let lane = self.resolve_port(port_id)?;
        let index = self.lane_ref(lane)?.index;
        let offset = match self.lane_kind(lane)? {
            PadKind::Pcie => uphy_misc_pad_px_ctl1(index),
            _ => UPHY_MISC_PAD_S0_CTL1,
        };
        log::debug!(
            "usb3-{port}: lfps detect {}",
            if enable { "enable" } else { "disable" }
        );

        let val = if enable {
            UPHY_MISC_PAD_CTL1::AUX_RX_IDLE_MODE.val(0)
                + UPHY_MISC_PAD_CTL1::AUX_RX_TERM_EN::CLEAR
                + UPHY_MISC_PAD_CTL1::AUX_RX_MODE_OVRD::CLEAR
        } else {
            UPHY_MISC_PAD_CTL1::AUX_RX_IDLE_MODE.val(1)
                + UPHY_MISC_PAD_CTL1::AUX_RX_TERM_EN::SET
                + UPHY_MISC_PAD_CTL1::AUX_RX_MODE_OVRD::SET
        };
        self.regs.modify(offset, val);
        Ok(())
    }

    // =========================================================================
    // UTMI pad 电源
    // =========================================================================

    pub(crate) fn utmi_pad_power(&mut self, lane: LaneId, on: bool) -> Result {
        let (index, powered_on) = {
            let l = self.lane_ref(lane)?;
            (l.index, l.powered_on)
        };
        if self.lane_kind(lane)? != PadKind::Usb2 {
            return Err(PadctlError::NotSupported);
        }
        if powered_on == on {
            return Ok(());
        }
        log::info!("usb2-{index}: UTMI pad power {}", if on { "on" } else { "down" });

        if on {
            udelay(self.kernel(), 2);
            self.regs
                .modify(usb2_otg_pad_ctl0(index), USB2_OTG_PAD_CTL0::PD::CLEAR);
            self.regs
                .modify(usb2_otg_pad_ctl1(index), USB2_OTG_PAD_CTL1::PD_DR::CLEAR);
        } else {
            self.regs
                .modify(usb2_otg_pad_ctl0(index), USB2_OTG_PAD_CTL0::PD::SET);
            self.regs
                .modify(usb2_otg_pad_ctl1(index), USB2_OTG_PAD_CTL1::PD_DR::SET);
            udelay(self.kernel(), 2);
        }

        if let Some(l) = self.lanes.get_mut(lane) {
            l.powered_on = on;
        }
        Ok(())
    }
}

impl PadController {
    /// HSIC 总线空闲态上下拉
    pub fn hsic_set_idle(&self, index: u8, idle: bool) -> Result {
        let mut g = self.lock();
        if g.find_lane(PadKind::Hsic, index).is_none() {
            return Err(PadctlError::config(alloc::format!("hsic-{index} not found")));
        }
        g.hsic_set_idle(index, idle);
        Ok(())
    }

    /// USB3 端口 LFPS 检测；关闭时把 AUX 接收器置于空闲并接上终端
    pub fn usb3_set_lfps_detect(&self, port: u8, enable: bool) -> Result {
        self.lock().usb3_set_lfps_detect(port, enable)
    }

    pub fn utmi_pad_power_on(&self, lane: LaneId) -> Result {
        self.lock().utmi_pad_power(lane, true)
    }

    pub fn utmi_pad_power_down(&self, lane: LaneId) -> Result {
        self.lock().utmi_pad_power(lane, false)
    }
}
