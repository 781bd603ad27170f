//! 钳位序列与共享使能
//!
//! `ELPG_PROGRAM_1` 里有两类钳位：
//!
//! - 控制器级 `AUX_MUX_LP0_*`，由共享使能计数的 0↔1 跳变控制
//! - 每个 SuperSpeed 端口的 `SSPx_ELPG_*`，由端口上下电和 sleepwalk 控制
//!
//! 三个位的释放顺序固定为 clamp → early → vcore（控制器级）或
//! vcore → early → clamp（端口级），每步之间留 100–200 µs。

use xusb_if::{ClockId, PllKind};

use crate::{
    err::{PadctlError, Result},
    osal::usleep_range,
    padctl::PadctlGuard,
    regs::*,
};

impl PadctlGuard<'_> {
    /// 控制器级钳位：解除
    fn release_top_clamps(&mut self) {
        let k = self.ops.kernel.clone();

        self.regs
            .modify(ELPG_PROGRAM_1, ELPG_PROGRAM_1::AUX_MUX_LP0_CLAMP_EN::CLEAR);
        usleep_range(k.as_ref(), 100, 200);

        self.regs.modify(
            ELPG_PROGRAM_1,
            ELPG_PROGRAM_1::AUX_MUX_LP0_CLAMP_EN_EARLY::CLEAR,
        );
        usleep_range(k.as_ref(), 100, 200);

        self.regs
            .modify(ELPG_PROGRAM_1, ELPG_PROGRAM_1::AUX_MUX_LP0_VCORE_DOWN::CLEAR);
        usleep_range(k.as_ref(), 100, 200);

        self.stats.clamp_releases += 1;
    }

    /// 控制器级钳位：施加
    fn apply_top_clamps(&mut self) {
        let k = self.ops.kernel.clone();

        self.regs
            .modify(ELPG_PROGRAM_1, ELPG_PROGRAM_1::AUX_MUX_LP0_VCORE_DOWN::SET);
        usleep_range(k.as_ref(), 100, 200);

        self.regs.modify(
            ELPG_PROGRAM_1,
            ELPG_PROGRAM_1::AUX_MUX_LP0_CLAMP_EN_EARLY::SET,
        );
        usleep_range(k.as_ref(), 100, 200);

        self.regs
            .modify(ELPG_PROGRAM_1, ELPG_PROGRAM_1::AUX_MUX_LP0_CLAMP_EN::SET);
        usleep_range(k.as_ref(), 100, 200);

        self.stats.clamp_applies += 1;
    }

    /// 打开 PLLE 以及 B01 的 UPHY 管理时钟；失败时回滚已打开的时钟
    fn enable_ref_clocks(&mut self) -> Result {
        let car = self.ops.car.clone();
        car.clk_enable(ClockId::Plle)
            .map_err(|e| PadctlError::hw(alloc::format!("PLLE clock: {e}")))?;

        if self.soc.is_b01() {
            if let Err(e) = car.clk_enable(ClockId::UphyMgmt) {
                car.clk_disable(ClockId::Plle);
                return Err(PadctlError::hw(alloc::format!("UPHY mgmt clock: {e}")));
            }
        }
        Ok(())
    }

    fn disable_ref_clocks(&mut self) {
        if self.soc.is_b01() {
            self.ops.car.clk_disable(ClockId::UphyMgmt);
        }
        self.ops.car.clk_disable(ClockId::Plle);
    }

    /// 首次使能：校准 PLL、启动 PLLE 硬件序列、释放钳位
    fn uphy_bringup(&mut self) -> Result {
        if self.ops.car.plle_hw_sequence_is_enabled() {
            log::warn!("PLLE is already under hardware sequencer control");
        }

        self.enable_ref_clocks()?;

        self.reports.clear();
        let mut plls = alloc::vec![PllKind::Pcie];
        if self.soc.has_pad(crate::pad::PadKind::Sata) {
            plls.push(PllKind::Sata);
        }
        for pll in plls {
            match self.enable_pll(pll) {
                Ok(report) => self.reports.push(report),
                Err(e) => {
                    log::error!("{} PLL bring-up failed: {e}", pll.name());
                    self.disable_ref_clocks();
                    return Err(e);
                }
            }
        }
        self.stats.calibration_runs += 1;

        self.ops.car.plle_hw_sequence_start();
        self.release_top_clamps();
        Ok(())
    }

    pub(crate) fn shared_enable(&mut self) -> Result {
        if self.enable == 0 {
            log::info!("XUSB padctl: first user, bringing up UPHY");
            self.uphy_bringup()?;
        }
        self.enable += 1;
        log::debug!("XUSB padctl: enable count {}", self.enable);
        Ok(())
    }

    pub(crate) fn shared_disable(&mut self) -> Result {
        if self.enable == 0 {
            log::warn!("XUSB padctl: unbalanced disable");
            return Err(PadctlError::config("shared disable with zero enable count"));
        }

        self.enable -= 1;
        if self.enable == 0 {
            log::info!("XUSB padctl: last user gone, clamping pads");
            self.apply_top_clamps();
        }
        log::debug!("XUSB padctl: enable count {}", self.enable);
        Ok(())
    }

    // =========================================================================
    // SuperSpeed 端口钳位
    // =========================================================================

    pub(crate) fn ssp_unclamp(&mut self, port: u8) {
        let c = SSP_CLAMP[port as usize];
        let k = self.ops.kernel.clone();

        self.regs.modify(ELPG_PROGRAM_1, c.vcore_down.val(0));
        usleep_range(k.as_ref(), 100, 200);
        self.regs.modify(ELPG_PROGRAM_1, c.clamp_en_early.val(0));
        usleep_range(k.as_ref(), 100, 200);
        self.regs.modify(ELPG_PROGRAM_1, c.clamp_en.val(0));
    }

    pub(crate) fn ssp_clamp(&mut self, port: u8) {
        let c = SSP_CLAMP[port as usize];
        let k = self.ops.kernel.clone();

        self.regs.modify(ELPG_PROGRAM_1, c.clamp_en.val(1));
        usleep_range(k.as_ref(), 100, 200);
        self.regs.modify(ELPG_PROGRAM_1, c.clamp_en_early.val(1));
        usleep_range(k.as_ref(), 100, 200);
        self.regs.modify(ELPG_PROGRAM_1, c.vcore_down.val(1));
        usleep_range(k.as_ref(), 250, 350);
    }

    /// sleepwalk 期间只动 early 和 clamp 两位，vcore 保持
    pub(crate) fn ssp_sleepwalk_clamp(&mut self, port: u8, enable: bool) {
        let c = SSP_CLAMP[port as usize];
        let k = self.ops.kernel.clone();

        if enable {
            self.regs.modify(ELPG_PROGRAM_1, c.clamp_en_early.val(1));
            usleep_range(k.as_ref(), 100, 200);
            self.regs.modify(ELPG_PROGRAM_1, c.clamp_en.val(1));
            usleep_range(k.as_ref(), 250, 350);
        } else {
            self.regs.modify(ELPG_PROGRAM_1, c.clamp_en_early.val(0));
            usleep_range(k.as_ref(), 100, 200);
            self.regs.modify(ELPG_PROGRAM_1, c.clamp_en.val(0));
        }
    }
}
