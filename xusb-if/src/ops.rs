//! Pad 控制器的外部协作者接口
//!
//! 每个协作者都以 `Arc<dyn XxxOp>` 形式注入，由系统组装者提供实现。

use core::time::Duration;

use crate::{ClockId, DeviceSpeed, PadctlError, PllKind, ResetId, UtmiPadConfig};

type Result<T = ()> = core::result::Result<T, PadctlError>;

/// 时间服务：阻塞延时和单调时钟
pub trait Kernel: Send + Sync + 'static {
    fn delay(&self, duration: Duration);
    fn now(&self) -> Duration;
}

/// 时钟与复位单元 (CAR)
pub trait CarOp: Send + Sync + 'static {
    fn clk_enable(&self, clk: ClockId) -> Result;
    fn clk_disable(&self, clk: ClockId);
    fn reset_deassert(&self, rst: ResetId) -> Result;

    /// 为 PLL 选择参考时钟父节点
    fn select_pll_refclk(&self, _pll: PllKind) -> Result {
        Ok(())
    }

    /// 把 PLL 交给硬件电源序列控制
    fn pll_hw_control_enable(&self, pll: PllKind);
    fn pll_hw_sequence_start(&self, pll: PllKind);

    fn plle_hw_sequence_start(&self);
    fn plle_hw_sequence_is_enabled(&self) -> bool;
}

/// 按名字寻址的稳压器
pub trait RegulatorOp: Send + Sync + 'static {
    fn exists(&self, name: &str) -> bool;
    fn enable(&self, name: &str) -> Result;
    fn disable(&self, name: &str) -> Result;
    fn is_enabled(&self, name: &str) -> bool;
}

/// 电源管理控制器 (PMC) 的 sleepwalk 接口
pub trait PmcOp: Send + Sync + 'static {
    fn utmi_replay_sleepwalk(&self, port: u8, speed: DeviceSpeed, cfg: &UtmiPadConfig) -> Result;
    fn utmi_clear_sleepwalk(&self, port: u8) -> Result;
    fn hsic_replay_sleepwalk(&self, port: u8) -> Result;
    fn hsic_clear_sleepwalk(&self, port: u8) -> Result;
}

/// 熔丝读取
pub trait FuseOp: Send + Sync + 'static {
    fn readl(&self, offset: usize) -> Result<u32>;
}

/// 延迟工作队列：调度后由宿主在工作上下文中调用 `otg_vbus_work`
pub trait OtgWork: Send + Sync + 'static {
    fn schedule(&self);
}

/// 过流引脚的 VBUS 使能状态切换
pub trait VbusPinOp: Send + Sync + 'static {
    fn select_vbus_en_state(&self, oc_pin: i32, enable: bool) -> Result;
}
