//! UPHY PLL 校准序列
//!
//! PCIe (P0) 与 SATA (S0) 两个 PLL 走同一套九步序列，只是寄存器组和分频
//! 参数不同。每一步都推进 [`CalState`]，任何状态都不会被跳过；轮询超时只
//! 记录在 [`CalibrationReport`] 中，是否中止由 [`CalTimeoutPolicy`] 决定。
//!
//! ```text
//! Idle → PowerOverrideSet → CalEnabled → CalDone → CalCleared → Locked
//!      → RcalEnabled → RcalDone → RcalCleared → HwHandoff
//! ```

use alloc::{format, vec::Vec};

use tock_registers::fields::Field;
use xusb_if::{PllKind, ResetId};

use crate::{
    err::{PadctlError, Result},
    osal::{POLL_INTERVAL, POLL_TIMEOUT, poll_timeout, usleep_range},
    padctl::PadctlGuard,
    regs::*,
};

/// 校准状态
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CalState {
    #[default]
    Idle,
    PowerOverrideSet,
    CalEnabled,
    CalDone,
    CalCleared,
    Locked,
    RcalEnabled,
    RcalDone,
    RcalCleared,
    HwHandoff,
}

impl CalState {
    pub const fn next(self) -> Option<CalState> {
        use CalState::*;
        match self {
            Idle => Some(PowerOverrideSet),
            PowerOverrideSet => Some(CalEnabled),
            CalEnabled => Some(CalDone),
            CalDone => Some(CalCleared),
            CalCleared => Some(Locked),
            Locked => Some(RcalEnabled),
            RcalEnabled => Some(RcalDone),
            RcalDone => Some(RcalCleared),
            RcalCleared => Some(HwHandoff),
            HwHandoff => None,
        }
    }
}

/// 轮询超时的处理方式
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CalTimeoutPolicy {
    /// 记录并继续，与硬件厂商参考流程一致
    #[default]
    Continue,
    /// 立即以 `Timeout` 中止
    Abort,
}

/// 一次校准的状态轨迹
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalibrationReport {
    pub pll: PllKind,
    pub transitions: Vec<CalState>,
    /// 轮询超时时所等待进入的状态
    pub timeouts: Vec<CalState>,
}

impl CalibrationReport {
    fn new(pll: PllKind) -> Self {
        Self {
            pll,
            transitions: alloc::vec![CalState::Idle],
            timeouts: Vec::new(),
        }
    }

    pub fn state(&self) -> CalState {
        self.transitions.last().copied().unwrap_or_default()
    }

    pub fn is_clean(&self) -> bool {
        self.timeouts.is_empty()
    }

    fn advance(&mut self, to: CalState) {
        debug_assert_eq!(self.state().next(), Some(to));
        self.transitions.push(to);
    }
}

fn pll_regs(kind: PllKind) -> UphyPllRegs {
    match kind {
        PllKind::Pcie => UPHY_PLL_P0,
        PllKind::Sata => UPHY_PLL_S0,
    }
}

impl PadctlGuard<'_> {
    /// 轮询状态位到期望值；超时按策略记录或中止
    fn cal_poll<R: tock_registers::RegisterLongName>(
        &mut self,
        report: &mut CalibrationReport,
        waiting_for: CalState,
        offset: usize,
        field: Field<u32, R>,
        want_set: bool,
    ) -> Result {
        let regs = self.regs.clone();
        let res = poll_timeout(self.kernel(), POLL_TIMEOUT, POLL_INTERVAL, || {
            regs.is_set(offset, field) == want_set
        });
        if res.is_ok() {
            return Ok(());
        }

        log::error!(
            "{} PLL: timeout waiting for {:?} ({:#05x})",
            report.pll.name(),
            waiting_for,
            offset
        );
        report.timeouts.push(waiting_for);
        self.stats.calibration_timeouts += 1;
        match self.policy.cal_timeout_policy {
            CalTimeoutPolicy::Continue => Ok(()),
            CalTimeoutPolicy::Abort => Err(PadctlError::Timeout),
        }
    }

    /// 对一个 UPHY PLL 执行完整的上电校准
    pub(crate) fn enable_pll(&mut self, kind: PllKind) -> Result<CalibrationReport> {
        let r = pll_regs(kind);
        let mut report = CalibrationReport::new(kind);
        let name = kind.name();
        log::info!("{name} PLL: calibration start");

        // 步骤 1: 释放 PLL 复位
        self.ops
            .car
            .reset_deassert(ResetId::from(kind))
            .map_err(|e| PadctlError::hw(format!("{name} PLL reset deassert: {e}")))?;

        // 步骤 2: 校准与 DCO 参数
        if kind == PllKind::Pcie && self.soc.is_b01() {
            self.regs
                .uphy_cfg_write(UPHY_PLL_CTL10, USB3_PLL_G1_INIT_DATA);
        } else {
            self.regs
                .modify(r.ctl2, UPHY_PLL_CTL2::CAL_CTRL.val(PLL_CAL_CTRL_VAL));
            self.regs
                .modify(r.ctl5, UPHY_PLL_CTL5::DCO_CTRL.val(PLL_DCO_CTRL_VAL));
        }

        // 步骤 3: 软件接管电源、校准和 RCAL
        self.regs.modify(r.ctl1, UPHY_PLL_CTL1::PWR_OVRD::SET);
        self.regs.modify(r.ctl2, UPHY_PLL_CTL2::CAL_OVRD::SET);
        self.regs.modify(r.ctl8, UPHY_PLL_CTL8::RCAL_OVRD::SET);
        report.advance(CalState::PowerOverrideSet);

        // 步骤 4: 参考时钟、分频，退出 IDDQ 和睡眠
        self.ops
            .car
            .select_pll_refclk(kind)
            .map_err(|e| PadctlError::hw(format!("{name} PLL refclk parent: {e}")))?;

        let usb_clocking = kind == PllKind::Pcie || self.sata_used_by_xusb;
        let (txclkref, ndiv) = if usb_clocking {
            (
                UPHY_PLL_CTL4::TXCLKREF_SEL::Usb,
                UPHY_PLL_CTL1::FREQ_NDIV::Usb,
            )
        } else {
            (
                UPHY_PLL_CTL4::TXCLKREF_SEL::Sata,
                UPHY_PLL_CTL1::FREQ_NDIV::Sata,
            )
        };
        self.regs.modify(
            r.ctl4,
            txclkref + UPHY_PLL_CTL4::TXCLKREF_EN::SET + UPHY_PLL_CTL4::REFCLK_SEL.val(0),
        );
        self.regs
            .modify(r.ctl1, ndiv + UPHY_PLL_CTL1::FREQ_MDIV.val(0));
        self.regs.modify(r.ctl1, UPHY_PLL_CTL1::IDDQ::CLEAR);
        self.regs.modify(r.ctl1, UPHY_PLL_CTL1::SLEEP.val(0));
        usleep_range(self.kernel(), 10, 20);

        // 步骤 5: 开始校准
        self.regs.modify(r.ctl4, UPHY_PLL_CTL4::REFCLKBUF_EN::SET);
        self.regs.modify(r.ctl2, UPHY_PLL_CTL2::CAL_EN::SET);
        report.advance(CalState::CalEnabled);
        self.cal_poll(&mut report, CalState::CalDone, r.ctl2, UPHY_PLL_CTL2::CAL_DONE, true)?;
        report.advance(CalState::CalDone);

        // 步骤 6: 结束校准
        self.regs.modify(r.ctl2, UPHY_PLL_CTL2::CAL_EN::CLEAR);
        self.cal_poll(&mut report, CalState::CalCleared, r.ctl2, UPHY_PLL_CTL2::CAL_DONE, false)?;
        report.advance(CalState::CalCleared);

        // 步骤 7: 使能 PLL 并等待锁定
        self.regs.modify(r.ctl1, UPHY_PLL_CTL1::ENABLE::SET);
        self.cal_poll(&mut report, CalState::Locked, r.ctl1, UPHY_PLL_CTL1::LOCKDET_STATUS, true)?;
        report.advance(CalState::Locked);

        // 步骤 8: 电阻校准
        self.regs.modify(
            r.ctl8,
            UPHY_PLL_CTL8::RCAL_EN::SET + UPHY_PLL_CTL8::RCAL_CLK_EN::SET,
        );
        report.advance(CalState::RcalEnabled);
        self.cal_poll(&mut report, CalState::RcalDone, r.ctl8, UPHY_PLL_CTL8::RCAL_DONE, true)?;
        report.advance(CalState::RcalDone);

        self.regs.modify(r.ctl8, UPHY_PLL_CTL8::RCAL_EN::CLEAR);
        self.cal_poll(&mut report, CalState::RcalCleared, r.ctl8, UPHY_PLL_CTL8::RCAL_DONE, false)?;
        self.regs.modify(r.ctl8, UPHY_PLL_CTL8::RCAL_CLK_EN::CLEAR);
        report.advance(CalState::RcalCleared);

        // 步骤 9: 交给硬件电源序列
        self.ops.car.pll_hw_control_enable(kind);
        self.regs.modify(r.ctl1, UPHY_PLL_CTL1::PWR_OVRD::CLEAR);
        self.regs.modify(r.ctl2, UPHY_PLL_CTL2::CAL_OVRD::CLEAR);
        self.regs.modify(r.ctl8, UPHY_PLL_CTL8::RCAL_OVRD::CLEAR);
        usleep_range(self.kernel(), 10, 20);
        self.ops.car.pll_hw_sequence_start(kind);
        report.advance(CalState::HwHandoff);

        if report.is_clean() {
            log::info!("{name} PLL: locked and handed to hardware");
        } else {
            log::warn!("{name} PLL: handed to hardware after {:?} timeouts", report.timeouts);
        }
        Ok(report)
    }
}
