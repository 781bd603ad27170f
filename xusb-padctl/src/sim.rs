//! 主机侧寄存器模型
//!
//! 在没有硬件的环境下运行整套序列：保存每个寄存器的值、记录所有写操作，
//! 并模拟 UPHY PLL 的三个状态位：
//!
//! - `CTL2.CAL_DONE` 跟随 `CTL2.CAL_EN`
//! - `CTL1.LOCKDET_STATUS` 跟随 `CTL1.ENABLE`
//! - `CTL8.RCAL_DONE` 跟随 `CTL8.RCAL_EN`
//!
//! `stall` 可以冻结某些状态位，用来制造轮询超时。

use alloc::{collections::BTreeMap, vec::Vec};

use spin::Mutex;
use tock_registers::fields::Field;

use crate::{
    regmap::RegisterIo,
    regs::{UPHY_PLL_CTL1, UPHY_PLL_CTL2, UPHY_PLL_CTL8, UPHY_PLL_P0, UPHY_PLL_S0},
};

/// 一次写操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegWrite {
    pub offset: usize,
    pub value: u32,
}

#[derive(Default)]
struct SimState {
    regs: BTreeMap<usize, u32>,
    log: Vec<RegWrite>,
    /// offset -> 冻结的状态位
    stalled: BTreeMap<usize, u32>,
}

#[derive(Default)]
pub struct SimRegs {
    state: Mutex<SimState>,
}

impl SimRegs {
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取当前值，不产生副作用
    pub fn peek(&self, offset: usize) -> u32 {
        self.state.lock().regs.get(&offset).copied().unwrap_or(0)
    }

    /// 直接设置寄存器值，不记录、不模拟
    pub fn poke(&self, offset: usize, value: u32) {
        self.state.lock().regs.insert(offset, value);
    }

    /// 冻结 `offset` 处 `mask` 覆盖的状态位
    pub fn stall(&self, offset: usize, mask: u32) {
        *self.state.lock().stalled.entry(offset).or_default() |= mask;
    }

    pub fn writes(&self) -> Vec<RegWrite> {
        self.state.lock().log.clone()
    }

    pub fn writes_to(&self, offset: usize) -> Vec<u32> {
        self.state
            .lock()
            .log
            .iter()
            .filter(|w| w.offset == offset)
            .map(|w| w.value)
            .collect()
    }

    pub fn clear_log(&self) {
        self.state.lock().log.clear();
    }
}

fn follow<A, B>(val: u32, en: Field<u32, A>, status: Field<u32, B>) -> u32
where
    A: tock_registers::RegisterLongName,
    B: tock_registers::RegisterLongName,
{
    let mask = status.mask << status.shift;
    if en.is_set(val) { val | mask } else { val & !mask }
}

fn simulate(offset: usize, val: u32) -> u32 {
    for pll in [UPHY_PLL_P0, UPHY_PLL_S0] {
        if offset == pll.ctl1 {
            return follow(val, UPHY_PLL_CTL1::ENABLE, UPHY_PLL_CTL1::LOCKDET_STATUS);
        }
        if offset == pll.ctl2 {
            return follow(val, UPHY_PLL_CTL2::CAL_EN, UPHY_PLL_CTL2::CAL_DONE);
        }
        if offset == pll.ctl8 {
            return follow(val, UPHY_PLL_CTL8::RCAL_EN, UPHY_PLL_CTL8::RCAL_DONE);
        }
    }
    val
}

impl RegisterIo for SimRegs {
    fn read(&self, offset: usize) -> u32 {
        self.peek(offset)
    }

    fn write(&self, offset: usize, value: u32) {
        let mut state = self.state.lock();
        state.log.push(RegWrite { offset, value });

        let old = state.regs.get(&offset).copied().unwrap_or(0);
        let mut new = simulate(offset, value);
        if let Some(&frozen) = state.stalled.get(&offset) {
            new = (new & !frozen) | (old & frozen);
        }
        state.regs.insert(offset, new);
    }
}
