//! OTG VBUS/ID 仲裁
//!
//! `USB2_VBUS_ID` 上的两个 override 由 USB 控制器驱动写入；写完后通过
//! [`OtgWork`](xusb_if::ops::OtgWork) 调度延迟工作，宿主在工作上下文里调用
//! [`PadController::otg_vbus_work`]，再根据 ID 状态开关 OTG 端口的 VBUS。

use alloc::format;

use crate::{
    err::{PadctlError, Result},
    osal::usleep_range,
    padctl::{PadController, PadctlGuard},
    port::PortKind,
    regs::*,
};

impl PadctlGuard<'_> {
    fn vbus_override(&mut self, set: bool) {
        log::debug!("{} vbus override", if set { "set" } else { "clear" });
        if set {
            self.regs.modify(
                USB2_VBUS_ID,
                USB2_VBUS_ID::VBUS_OVERRIDE::SET + USB2_VBUS_ID::ID_OVERRIDE::Floating,
            );
        } else {
            self.regs
                .modify(USB2_VBUS_ID, USB2_VBUS_ID::VBUS_OVERRIDE::CLEAR);
        }
    }

    fn id_override(&mut self, set: bool) {
        log::debug!("{} id override", if set { "set" } else { "clear" });
        if !set {
            self.regs
                .modify(USB2_VBUS_ID, USB2_VBUS_ID::ID_OVERRIDE::Floating);
            return;
        }

        // 先撤掉 VBUS override，再把 ID 接地
        if self.regs.is_set(USB2_VBUS_ID, USB2_VBUS_ID::VBUS_OVERRIDE) {
            self.regs
                .modify(USB2_VBUS_ID, USB2_VBUS_ID::VBUS_OVERRIDE::CLEAR);
            usleep_range(self.kernel(), 1000, 2000);
        }
        self.regs
            .modify(USB2_VBUS_ID, USB2_VBUS_ID::ID_OVERRIDE::Grounded);
    }

    fn vbus_power(&mut self, index: u8, on: bool) -> Result {
        let port = self
            .find_port(PortKind::Usb2, index)
            .ok_or_else(|| PadctlError::config(format!("no port found for USB2 lane {index}")))?;
        if !on && self.policy.otg_vbus_alwayson {
            log::info!("usb2-{index}: VBUS cannot be turned off, always-on");
            return Err(PadctlError::Rejected(format!(
                "usb2-{index} VBUS is always-on"
            )));
        }

        let (supply, oc_pin) = {
            let p = self.port_ref(port)?;
            (p.supply.clone(), p.oc_pin)
        };
        let supply = supply.ok_or_else(|| {
            PadctlError::unavailable(format!("no vbus-supply found for usb2-{index}"))
        })?;
        log::debug!("usb2-{index}: VBUS power {}", if on { "on" } else { "off" });

        if let (Some(pin), Some(vbus_pin)) = (oc_pin, self.ops.vbus_pin.as_ref()) {
            return vbus_pin.select_vbus_en_state(pin, on);
        }

        let regulator = self.ops.regulator.clone();
        if regulator.is_enabled(&supply) == on {
            return Ok(());
        }
        let res = if on {
            regulator.enable(&supply)
        } else {
            regulator.disable(&supply)
        };
        if let Err(e) = &res {
            log::error!(
                "{} usb2-{index} vbus failed: {e}",
                if on { "enable" } else { "disable" }
            );
        }
        res
    }

    fn otg_vbus_handle(&mut self) {
        let Some(index) = self.usb2_otg_port else {
            log::debug!("otg vbus work: no OTG port");
            return;
        };

        let reg = self.regs.read::<USB2_VBUS_ID::Register>(USB2_VBUS_ID);
        log::debug!(
            "USB2_VBUS_ID {:#x} otg_vbus_on was {}",
            reg.get(),
            self.otg_vbus_on
        );

        match reg.read_as_enum(USB2_VBUS_ID::ID_OVERRIDE) {
            Some(USB2_VBUS_ID::ID_OVERRIDE::Value::Grounded) if !self.otg_vbus_on => {
                if self.vbus_power(index, true).is_ok() {
                    self.otg_vbus_on = true;
                }
            }
            Some(USB2_VBUS_ID::ID_OVERRIDE::Value::Floating) if self.otg_vbus_on => {
                match self.vbus_power(index, false) {
                    Ok(()) => self.otg_vbus_on = false,
                    Err(PadctlError::Rejected(msg)) => {
                        log::warn!("usb2-{index}: VBUS off rejected: {msg}");
                    }
                    Err(e) => log::error!("usb2-{index}: VBUS off failed: {e}"),
                }
            }
            _ => {}
        }
    }
}

impl PadController {
    /// 写 VBUS override 并调度 OTG 工作
    pub fn vbus_override(&self, set: bool) -> Result {
        self.lock().vbus_override(set);
        self.ops().otg_work.schedule();
        Ok(())
    }

    /// 写 ID override 并调度 OTG 工作
    pub fn id_override(&self, set: bool) -> Result {
        self.lock().id_override(set);
        self.ops().otg_work.schedule();
        Ok(())
    }

    /// 延迟工作体：按 ID 状态开关 OTG 端口的 VBUS
    pub fn otg_vbus_work(&self) {
        self.lock().otg_vbus_handle();
    }

    pub fn vbus_power_on(&self, index: u8) -> Result {
        self.lock().vbus_power(index, true)
    }

    pub fn vbus_power_off(&self, index: u8) -> Result {
        self.lock().vbus_power(index, false)
    }

    pub fn otg_vbus_on(&self) -> bool {
        self.lock().otg_vbus_on
    }

    pub fn usb2_otg_port(&self) -> Option<u8> {
        self.lock().usb2_otg_port
    }

    /// 端口复位时 pad 0 的 ZIP/ZIN 置位说明 VBUS 检测卡住，翻转一次
    /// VBUS override；返回是否翻转过
    pub fn utmi_port_reset_quirk(&self) -> Result<bool> {
        let toggled = {
            let mut g = self.lock();
            let reg = g
                .regs
                .read::<BATTERY_CHRG_OTGPAD_CTL0::Register>(battery_chrg_otgpad_ctl0(0));
            log::debug!("BATTERY_CHRG_OTGPAD_CTL0(0): {:#x}", reg.get());
            if reg.is_set(BATTERY_CHRG_OTGPAD_CTL0::ZIP)
                || reg.is_set(BATTERY_CHRG_OTGPAD_CTL0::ZIN)
            {
                log::debug!("toggle vbus");
                g.vbus_override(false);
                g.vbus_override(true);
                true
            } else {
                false
            }
        };
        if toggled {
            self.ops().otg_work.schedule();
        }
        Ok(toggled)
    }
}
