//! 寄存器访问层
//!
//! `Regmap` 只能通过控制器锁拿到，所有读-改-写都在锁内完成。底层 I/O 由
//! `RegisterIo` 抽象，真实硬件使用 [`MmioIo`]，主机测试使用 [`crate::sim::SimRegs`]。

use alloc::sync::Arc;

use tock_registers::{
    LocalRegisterCopy, RegisterLongName,
    fields::{Field, FieldValue},
    interfaces::{Readable, Writeable},
    registers::ReadWrite,
};

use crate::{Mmio, regs::UphyCfg};

/// 32 位寄存器块的读写接口，`offset` 为字节偏移
pub trait RegisterIo: Send + Sync {
    fn read(&self, offset: usize) -> u32;
    fn write(&self, offset: usize, val: u32);
}

/// MMIO 寄存器块
pub struct MmioIo {
    base: usize,
}

impl MmioIo {
    /// # Safety
    ///
    /// 调用者必须确保 `base` 指向有效的 pad 控制器寄存器区域，并在本对象
    /// 生命周期内保持映射
    pub unsafe fn new(base: Mmio) -> Self {
        Self {
            base: base.as_ptr() as usize,
        }
    }

    fn reg(&self, offset: usize) -> &ReadWrite<u32> {
        unsafe { &*((self.base + offset) as *const ReadWrite<u32>) }
    }
}

impl RegisterIo for MmioIo {
    fn read(&self, offset: usize) -> u32 {
        self.reg(offset).get()
    }

    fn write(&self, offset: usize, val: u32) {
        self.reg(offset).set(val)
    }
}

#[derive(Clone)]
pub struct Regmap {
    io: Arc<dyn RegisterIo>,
}

impl Regmap {
    pub fn new(io: Arc<dyn RegisterIo>) -> Self {
        Self { io }
    }

    pub fn readl(&self, offset: usize) -> u32 {
        self.io.read(offset)
    }

    pub fn writel(&self, offset: usize, val: u32) {
        log::trace!("padctl write {offset:#05x} = {val:#010x}");
        self.io.write(offset, val)
    }

    pub fn read<R: RegisterLongName>(&self, offset: usize) -> LocalRegisterCopy<u32, R> {
        LocalRegisterCopy::new(self.readl(offset))
    }

    /// 读-改-写：只改 `field` 覆盖的位
    pub fn modify<R: RegisterLongName>(&self, offset: usize, field: FieldValue<u32, R>) {
        let val = self.readl(offset);
        self.writel(offset, field.modify(val));
    }

    /// 整字写入，未覆盖的位写 0
    pub fn write<R: RegisterLongName>(&self, offset: usize, field: FieldValue<u32, R>) {
        self.writel(offset, field.value);
    }

    pub fn is_set<R: RegisterLongName>(&self, offset: usize, field: Field<u32, R>) -> bool {
        field.is_set(self.readl(offset))
    }

    pub fn read_field<R: RegisterLongName>(&self, offset: usize, field: Field<u32, R>) -> u32 {
        field.read(self.readl(offset))
    }

    pub fn update_bits(&self, offset: usize, mask: u32, val: u32) {
        let current = self.readl(offset);
        self.writel(offset, (current & !mask) | (val & mask));
    }

    /// 通过 CFG_ADDR/CFG_WDATA 间接写口写一组 UPHY 配置字
    pub fn uphy_cfg_write(&self, offset: usize, seq: &[UphyCfg]) {
        use crate::regs::UPHY_CFG;

        for cfg in seq {
            self.write(
                offset,
                UPHY_CFG::CFG_ADDR.val(cfg.addr)
                    + UPHY_CFG::CFG_WDATA.val(cfg.data)
                    + UPHY_CFG::CFG_RESET::SET
                    + UPHY_CFG::CFG_WS::SET,
            );
        }
    }
}
