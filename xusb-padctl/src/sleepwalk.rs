//! Sleepwalk 交接与唤醒事件
//!
//! 进入低功耗前，USB2/HSIC lane 把当前 pad 电气参数交给 PMC，由 PMC 在
//! 控制器断电期间代为驱动总线；SuperSpeed lane 则只需在 pad 侧钳住端口。
//! 唤醒事件位在 `ELPG_PROGRAM_0` 中，写 1 清除。

use alloc::format;

use tock_registers::{RegisterLongName, fields::Field};
use xusb_if::{DeviceSpeed, UtmiPadConfig, ops::PmcOp};

use crate::{
    err::{PadctlError, Result},
    lane::LaneId,
    osal::usleep_range,
    pad::PadKind,
    padctl::PadctlGuard,
    regs::*,
};

fn bit<R: RegisterLongName>(field: Field<u32, R>) -> u32 {
    field.mask << field.shift
}

impl PadctlGuard<'_> {
    fn pmc(&self) -> Result<&dyn PmcOp> {
        self.ops
            .pmc
            .as_deref()
            .ok_or_else(|| PadctlError::unavailable("PMC"))
    }

    fn usb3_port_for_lane(&self, lane: LaneId) -> Result<u8> {
        self.usb3_port_of_lane(lane)
            .ok_or_else(|| PadctlError::config("lane is not mapped to a USB3 port"))
    }

    fn utmi_pad_config(&self, index: u8) -> UtmiPadConfig {
        let bias = self
            .regs
            .read::<USB2_BIAS_PAD_CTL1::Register>(USB2_BIAS_PAD_CTL1);
        UtmiPadConfig {
            tctrl: bias.read(USB2_BIAS_PAD_CTL1::TCTRL),
            pctrl: bias.read(USB2_BIAS_PAD_CTL1::PCTRL),
            rpd_ctrl: self
                .regs
                .read_field(usb2_otg_pad_ctl1(index), USB2_OTG_PAD_CTL1::RPD_CTRL),
        }
    }

    pub(crate) fn enable_sleepwalk(&mut self, lane: LaneId, speed: DeviceSpeed) -> Result {
        let index = self.lane_ref(lane)?.index;
        match self.lane_kind(lane)? {
            PadKind::Usb2 => {
                let cfg = self.utmi_pad_config(index);
                log::debug!("usb2-{index}: enable sleepwalk, {speed:?} {cfg:?}");
                self.pmc()?.utmi_replay_sleepwalk(index, speed, &cfg)
            }
            PadKind::Hsic => {
                log::debug!("hsic-{index}: enable sleepwalk");
                self.pmc()?.hsic_replay_sleepwalk(index)
            }
            PadKind::Pcie | PadKind::Sata => {
                let port = self.usb3_port_for_lane(lane)?;
                log::debug!("usb3-{port}: enable sleepwalk");
                self.ssp_sleepwalk_clamp(port, true);
                Ok(())
            }
        }
    }

    pub(crate) fn disable_sleepwalk(&mut self, lane: LaneId) -> Result {
        let index = self.lane_ref(lane)?.index;
        match self.lane_kind(lane)? {
            PadKind::Usb2 => {
                log::debug!("usb2-{index}: disable sleepwalk");
                self.pmc()?.utmi_clear_sleepwalk(index)
            }
            PadKind::Hsic => {
                log::debug!("hsic-{index}: disable sleepwalk");
                self.pmc()?.hsic_clear_sleepwalk(index)
            }
            PadKind::Pcie | PadKind::Sata => {
                let port = self.usb3_port_for_lane(lane)?;
                log::debug!("usb3-{port}: disable sleepwalk");
                self.ssp_sleepwalk_clamp(port, false);
                Ok(())
            }
        }
    }

    fn wake_bits(&self, lane: LaneId) -> Result<(&'static str, u8, WakeBits)> {
        let index = self.lane_ref(lane)?.index;
        let (name, port, bits) = match self.lane_kind(lane)? {
            PadKind::Usb2 => ("usb2", index, USB2_WAKE.get(index as usize).copied()),
            PadKind::Hsic => ("hsic", index, HSIC_WAKE.get(index as usize).copied()),
            PadKind::Pcie | PadKind::Sata => {
                let port = self.usb3_port_for_lane(lane)?;
                ("usb3", port, SS_WAKE.get(port as usize).copied())
            }
        };
        let bits =
            bits.ok_or_else(|| PadctlError::config(format!("{name}-{port} has no wake bits")))?;
        Ok((name, port, bits))
    }

    /// 事件位写 1 清除，两次写都要先屏蔽全部事件位
    pub(crate) fn set_wake(&mut self, lane: LaneId, enable: bool) -> Result {
        let (name, port, bits) = self.wake_bits(lane)?;
        let all = WakeEvents::all().bits();
        let ie = bit(bits.interrupt_enable);
        let event = bit(bits.event);
        log::debug!(
            "{name}-{port}: {} wake",
            if enable { "enable" } else { "disable" }
        );

        let mut reg = self.regs.readl(ELPG_PROGRAM_0) & !all;
        if enable {
            reg |= event;
        } else {
            reg &= !ie;
        }
        self.regs.writel(ELPG_PROGRAM_0, reg);

        usleep_range(self.kernel(), 10, 20);

        let mut reg = self.regs.readl(ELPG_PROGRAM_0) & !all;
        reg |= if enable { ie } else { event };
        self.regs.writel(ELPG_PROGRAM_0, reg);
        Ok(())
    }

    pub(crate) fn remote_wake_detected(&self, lane: LaneId) -> Result<bool> {
        let (name, port, bits) = self.wake_bits(lane)?;
        let reg = self
            .regs
            .read::<ELPG_PROGRAM_0::Register>(ELPG_PROGRAM_0);
        let detected = reg.is_set(bits.interrupt_enable) && reg.is_set(bits.event);
        if detected {
            log::debug!("{name}-{port}: remote wake detected");
        }
        Ok(detected)
    }
}
