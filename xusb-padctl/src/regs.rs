//! XUSB pad 控制器寄存器定义
//!
//! 所有偏移均相对于 pad 控制器 MMIO 基址。按端口或按 lane 重复的寄存器
//! 用 `fn(index) -> usize` 计算偏移；按端口重复的位域放在 `const` 数组里，
//! 由下标选择。
//!
//! 参考 Tegra X1 TRM "XUSB Pad Controller" 一章。

use tock_registers::{fields::Field, register_bitfields};

// =============================================================================
// 寄存器偏移
// =============================================================================

pub const USB2_PAD_MUX: usize = 0x004;
pub const USB2_PORT_CAP: usize = 0x008;
pub const SS_PORT_MAP: usize = 0x014;
pub const ELPG_PROGRAM_0: usize = 0x020;
pub const ELPG_PROGRAM_1: usize = 0x024;
pub const USB3_PAD_MUX: usize = 0x028;

pub const fn battery_chrg_otgpad_ctl0(index: u8) -> usize {
    0x080 + index as usize * 0x40
}

pub const fn battery_chrg_otgpad_ctl1(index: u8) -> usize {
    0x084 + index as usize * 0x40
}

pub const fn usb2_otg_pad_ctl0(index: u8) -> usize {
    0x088 + index as usize * 0x40
}

pub const fn usb2_otg_pad_ctl1(index: u8) -> usize {
    0x08c + index as usize * 0x40
}

pub const USB2_BIAS_PAD_CTL0: usize = 0x284;
pub const USB2_BIAS_PAD_CTL1: usize = 0x288;

pub const fn hsic_pad_ctl0(index: u8) -> usize {
    0x300 + index as usize * 0x20
}

pub const fn hsic_pad_ctl1(index: u8) -> usize {
    0x304 + index as usize * 0x20
}

pub const fn hsic_pad_ctl2(index: u8) -> usize {
    0x308 + index as usize * 0x20
}

pub const HSIC_PAD_TRK_CTL: usize = 0x340;
pub const HSIC_STRB_TRIM_CONTROL: usize = 0x344;

/// B01 PCIe PLL 初始化数据写口
pub const UPHY_PLL_CTL10: usize = 0x384;

pub const fn uphy_misc_pad_px_ctl1(lane: u8) -> usize {
    0x460 + lane as usize * 0x40
}

pub const fn uphy_misc_pad_px_ctl8(lane: u8) -> usize {
    0x47c + lane as usize * 0x40
}

pub const UPHY_MISC_PAD_S0_CTL1: usize = 0x960;

pub const fn uphy_usb3_pad_ectl1(port: u8) -> usize {
    0xa60 + port as usize * 0x40
}

pub const fn uphy_usb3_pad_ectl2(port: u8) -> usize {
    0xa64 + port as usize * 0x40
}

pub const fn uphy_usb3_pad_ectl3(port: u8) -> usize {
    0xa68 + port as usize * 0x40
}

pub const fn uphy_usb3_pad_ectl4(port: u8) -> usize {
    0xa6c + port as usize * 0x40
}

pub const fn uphy_usb3_pad_ectl6(port: u8) -> usize {
    0xa74 + port as usize * 0x40
}

pub const USB2_VBUS_ID: usize = 0xc60;

/// ECTL3 / ECTL6 整字写入的 RX 均衡参数
pub const USB3_PAD_ECTL3_RX_DFE_VAL: u32 = 0xc007_7f1f;
pub const USB3_PAD_ECTL6_RX_EQ_CTRL_H_VAL: u32 = 0xfcf0_1368;

/// `SS_PORT_MAP` 中表示端口未映射的值
pub const SS_PORT_MAP_DISABLED: u32 = 0x7;

// =============================================================================
// UPHY PLL 寄存器组
// =============================================================================

/// 一个 UPHY PLL 实例的寄存器偏移
#[derive(Debug, Clone, Copy)]
pub struct UphyPllRegs {
    pub ctl1: usize,
    pub ctl2: usize,
    pub ctl4: usize,
    pub ctl5: usize,
    pub ctl8: usize,
}

pub const UPHY_PLL_P0: UphyPllRegs = UphyPllRegs {
    ctl1: 0x360,
    ctl2: 0x364,
    ctl4: 0x36c,
    ctl5: 0x370,
    ctl8: 0x37c,
};

pub const UPHY_PLL_S0: UphyPllRegs = UphyPllRegs {
    ctl1: 0x860,
    ctl2: 0x864,
    ctl4: 0x86c,
    ctl5: 0x870,
    ctl8: 0x87c,
};

pub const PLL_CAL_CTRL_VAL: u32 = 0x136;
pub const PLL_DCO_CTRL_VAL: u32 = 0x2a;

// =============================================================================
// 位域
// =============================================================================

register_bitfields![u32,
    pub USB2_PAD_MUX [
        HSIC_PAD_TRK OFFSET(16) NUMBITS(2) [
            Snps = 0,
            Xusb = 1
        ],
        USB2_BIAS_PAD OFFSET(18) NUMBITS(2) [
            Snps = 0,
            Xusb = 1
        ]
    ],

    pub USB2_PORT_CAP [
        PORT0_CAP OFFSET(0) NUMBITS(2) [],
        PORT1_CAP OFFSET(4) NUMBITS(2) [],
        PORT2_CAP OFFSET(8) NUMBITS(2) [],
        PORT3_CAP OFFSET(12) NUMBITS(2) []
    ],

    pub SS_PORT_MAP [
        PORT0_MAP OFFSET(0) NUMBITS(3) [],
        PORT0_INTERNAL OFFSET(4) NUMBITS(1) [],
        PORT1_MAP OFFSET(5) NUMBITS(3) [],
        PORT1_INTERNAL OFFSET(9) NUMBITS(1) [],
        PORT2_MAP OFFSET(10) NUMBITS(3) [],
        PORT2_INTERNAL OFFSET(14) NUMBITS(1) [],
        PORT3_MAP OFFSET(15) NUMBITS(3) [],
        PORT3_INTERNAL OFFSET(19) NUMBITS(1) []
    ],

    pub ELPG_PROGRAM_0 [
        USB2_PORT0_WAKE_INTERRUPT_ENABLE OFFSET(0) NUMBITS(1) [],
        USB2_PORT1_WAKE_INTERRUPT_ENABLE OFFSET(1) NUMBITS(1) [],
        USB2_PORT2_WAKE_INTERRUPT_ENABLE OFFSET(2) NUMBITS(1) [],
        USB2_PORT3_WAKE_INTERRUPT_ENABLE OFFSET(3) NUMBITS(1) [],
        USB2_PORT0_WAKEUP_EVENT OFFSET(7) NUMBITS(1) [],
        USB2_PORT1_WAKEUP_EVENT OFFSET(8) NUMBITS(1) [],
        USB2_PORT2_WAKEUP_EVENT OFFSET(9) NUMBITS(1) [],
        USB2_PORT3_WAKEUP_EVENT OFFSET(10) NUMBITS(1) [],
        SS_PORT0_WAKE_INTERRUPT_ENABLE OFFSET(14) NUMBITS(1) [],
        SS_PORT1_WAKE_INTERRUPT_ENABLE OFFSET(15) NUMBITS(1) [],
        SS_PORT2_WAKE_INTERRUPT_ENABLE OFFSET(16) NUMBITS(1) [],
        SS_PORT3_WAKE_INTERRUPT_ENABLE OFFSET(17) NUMBITS(1) [],
        SS_PORT0_WAKEUP_EVENT OFFSET(21) NUMBITS(1) [],
        SS_PORT1_WAKEUP_EVENT OFFSET(22) NUMBITS(1) [],
        SS_PORT2_WAKEUP_EVENT OFFSET(23) NUMBITS(1) [],
        SS_PORT3_WAKEUP_EVENT OFFSET(24) NUMBITS(1) [],
        USB2_HSIC_PORT0_WAKE_INTERRUPT_ENABLE OFFSET(28) NUMBITS(1) [],
        USB2_HSIC_PORT0_WAKEUP_EVENT OFFSET(30) NUMBITS(1) []
    ],

    pub ELPG_PROGRAM_1 [
        SSP0_ELPG_CLAMP_EN OFFSET(0) NUMBITS(1) [],
        SSP0_ELPG_CLAMP_EN_EARLY OFFSET(1) NUMBITS(1) [],
        SSP0_ELPG_VCORE_DOWN OFFSET(2) NUMBITS(1) [],
        SSP1_ELPG_CLAMP_EN OFFSET(3) NUMBITS(1) [],
        SSP1_ELPG_CLAMP_EN_EARLY OFFSET(4) NUMBITS(1) [],
        SSP1_ELPG_VCORE_DOWN OFFSET(5) NUMBITS(1) [],
        SSP2_ELPG_CLAMP_EN OFFSET(6) NUMBITS(1) [],
        SSP2_ELPG_CLAMP_EN_EARLY OFFSET(7) NUMBITS(1) [],
        SSP2_ELPG_VCORE_DOWN OFFSET(8) NUMBITS(1) [],
        SSP3_ELPG_CLAMP_EN OFFSET(9) NUMBITS(1) [],
        SSP3_ELPG_CLAMP_EN_EARLY OFFSET(10) NUMBITS(1) [],
        SSP3_ELPG_VCORE_DOWN OFFSET(11) NUMBITS(1) [],
        AUX_MUX_LP0_CLAMP_EN OFFSET(29) NUMBITS(1) [],
        AUX_MUX_LP0_CLAMP_EN_EARLY OFFSET(30) NUMBITS(1) [],
        AUX_MUX_LP0_VCORE_DOWN OFFSET(31) NUMBITS(1) []
    ],

    pub USB3_PAD_MUX [
        PCIE_IDDQ_DISABLE0 OFFSET(1) NUMBITS(1) [],
        PCIE_IDDQ_DISABLE1 OFFSET(2) NUMBITS(1) [],
        PCIE_IDDQ_DISABLE2 OFFSET(3) NUMBITS(1) [],
        PCIE_IDDQ_DISABLE3 OFFSET(4) NUMBITS(1) [],
        PCIE_IDDQ_DISABLE4 OFFSET(5) NUMBITS(1) [],
        PCIE_IDDQ_DISABLE5 OFFSET(6) NUMBITS(1) [],
        PCIE_IDDQ_DISABLE6 OFFSET(7) NUMBITS(1) [],
        SATA_IDDQ_DISABLE0 OFFSET(8) NUMBITS(1) []
    ],

    pub BATTERY_CHRG_OTGPAD_CTL0 [
        ZIP OFFSET(18) NUMBITS(1) [],
        ZIN OFFSET(22) NUMBITS(1) []
    ],

    pub BATTERY_CHRG_OTGPAD_CTL1 [
        VREG_FIX18 OFFSET(6) NUMBITS(1) [],
        VREG_LEV OFFSET(7) NUMBITS(2) []
    ],

    pub USB2_OTG_PAD_CTL0 [
        HS_CURR_LEVEL OFFSET(0) NUMBITS(6) [],
        PD OFFSET(26) NUMBITS(1) [],
        PD2 OFFSET(27) NUMBITS(1) [],
        PD_ZI OFFSET(29) NUMBITS(1) []
    ],

    pub USB2_OTG_PAD_CTL1 [
        PD_DR OFFSET(2) NUMBITS(1) [],
        TERM_RANGE_ADJ OFFSET(3) NUMBITS(4) [],
        RPD_CTRL OFFSET(26) NUMBITS(5) []
    ],

    pub USB2_BIAS_PAD_CTL0 [
        HS_SQUELCH_LEVEL OFFSET(0) NUMBITS(3) [],
        HS_DISCON_LEVEL OFFSET(3) NUMBITS(3) [],
        PD OFFSET(11) NUMBITS(1) []
    ],

    pub USB2_BIAS_PAD_CTL1 [
        TCTRL OFFSET(0) NUMBITS(6) [],
        PCTRL OFFSET(6) NUMBITS(6) [],
        TRK_START_TIMER OFFSET(12) NUMBITS(7) [],
        TRK_DONE_RESET_TIMER OFFSET(19) NUMBITS(7) [],
        PD_TRK OFFSET(26) NUMBITS(1) []
    ],

    pub HSIC_PAD_CTL0 [
        PD_TX_DATA0 OFFSET(1) NUMBITS(1) [],
        PD_TX_DATA1 OFFSET(2) NUMBITS(1) [],
        PD_TX_STROBE OFFSET(3) NUMBITS(1) [],
        PD_RX_DATA0 OFFSET(4) NUMBITS(1) [],
        PD_RX_DATA1 OFFSET(5) NUMBITS(1) [],
        PD_RX_STROBE OFFSET(6) NUMBITS(1) [],
        PD_ZI_DATA0 OFFSET(7) NUMBITS(1) [],
        PD_ZI_DATA1 OFFSET(8) NUMBITS(1) [],
        PD_ZI_STROBE OFFSET(9) NUMBITS(1) [],
        RPD_DATA0 OFFSET(13) NUMBITS(1) [],
        RPD_DATA1 OFFSET(14) NUMBITS(1) [],
        RPD_STROBE OFFSET(15) NUMBITS(1) [],
        RPU_DATA0 OFFSET(16) NUMBITS(1) [],
        RPU_DATA1 OFFSET(17) NUMBITS(1) [],
        RPU_STROBE OFFSET(18) NUMBITS(1) []
    ],

    pub HSIC_PAD_CTL1 [
        TX_RTUNEP OFFSET(0) NUMBITS(4) []
    ],

    pub HSIC_PAD_CTL2 [
        RX_DATA_TRIM OFFSET(0) NUMBITS(8) [],
        RX_STROBE_TRIM OFFSET(8) NUMBITS(4) []
    ],

    pub HSIC_PAD_TRK_CTL [
        TRK_START_TIMER OFFSET(5) NUMBITS(7) [],
        TRK_DONE_RESET_TIMER OFFSET(12) NUMBITS(7) [],
        PD_TRK OFFSET(19) NUMBITS(1) []
    ],

    pub UPHY_PLL_CTL1 [
        IDDQ OFFSET(0) NUMBITS(1) [],
        SLEEP OFFSET(1) NUMBITS(2) [],
        ENABLE OFFSET(3) NUMBITS(1) [],
        PWR_OVRD OFFSET(4) NUMBITS(1) [],
        LOCKDET_STATUS OFFSET(15) NUMBITS(1) [],
        FREQ_MDIV OFFSET(16) NUMBITS(2) [],
        FREQ_NDIV OFFSET(20) NUMBITS(8) [
            Sata = 0x1e,
            Usb = 0x19
        ]
    ],

    pub UPHY_PLL_CTL2 [
        CAL_EN OFFSET(0) NUMBITS(1) [],
        CAL_DONE OFFSET(1) NUMBITS(1) [],
        CAL_OVRD OFFSET(2) NUMBITS(1) [],
        CAL_CTRL OFFSET(4) NUMBITS(24) []
    ],

    pub UPHY_PLL_CTL4 [
        REFCLK_SEL OFFSET(4) NUMBITS(4) [],
        REFCLKBUF_EN OFFSET(8) NUMBITS(1) [],
        TXCLKREF_SEL OFFSET(12) NUMBITS(2) [
            Sata = 0,
            Usb = 2
        ],
        TXCLKREF_EN OFFSET(15) NUMBITS(1) []
    ],

    pub UPHY_PLL_CTL5 [
        DCO_CTRL OFFSET(16) NUMBITS(8) []
    ],

    pub UPHY_PLL_CTL8 [
        RCAL_EN OFFSET(12) NUMBITS(1) [],
        RCAL_CLK_EN OFFSET(13) NUMBITS(1) [],
        RCAL_OVRD OFFSET(15) NUMBITS(1) [],
        RCAL_DONE OFFSET(31) NUMBITS(1) []
    ],

    pub UPHY_CFG [
        CFG_WDATA OFFSET(0) NUMBITS(16) [],
        CFG_ADDR OFFSET(16) NUMBITS(8) [],
        CFG_WS OFFSET(24) NUMBITS(1) [],
        CFG_RESET OFFSET(27) NUMBITS(1) []
    ],

    pub UPHY_MISC_PAD_CTL1 [
        AUX_RX_MODE_OVRD OFFSET(13) NUMBITS(1) [],
        AUX_RX_TERM_EN OFFSET(18) NUMBITS(1) [],
        AUX_RX_IDLE_MODE OFFSET(20) NUMBITS(2) []
    ],

    pub UPHY_USB3_PAD_ECTL1 [
        TX_TERM_CTRL OFFSET(16) NUMBITS(2) []
    ],

    pub UPHY_USB3_PAD_ECTL2 [
        RX_CTLE OFFSET(0) NUMBITS(16) []
    ],

    pub UPHY_USB3_PAD_ECTL4 [
        RX_CDR_CTRL OFFSET(16) NUMBITS(16) []
    ],

    pub USB2_VBUS_ID [
        VBUS_OVERRIDE OFFSET(14) NUMBITS(1) [],
        ID_OVERRIDE OFFSET(18) NUMBITS(4) [
            Grounded = 0,
            Floating = 8
        ]
    ]
];

// =============================================================================
// 按端口选择位域
// =============================================================================

pub const USB2_PORT_CAP_FIELDS: [Field<u32, USB2_PORT_CAP::Register>; 4] = [
    USB2_PORT_CAP::PORT0_CAP,
    USB2_PORT_CAP::PORT1_CAP,
    USB2_PORT_CAP::PORT2_CAP,
    USB2_PORT_CAP::PORT3_CAP,
];

pub const SS_PORT_MAP_FIELDS: [Field<u32, SS_PORT_MAP::Register>; 4] = [
    SS_PORT_MAP::PORT0_MAP,
    SS_PORT_MAP::PORT1_MAP,
    SS_PORT_MAP::PORT2_MAP,
    SS_PORT_MAP::PORT3_MAP,
];

pub const SS_PORT_INTERNAL_FIELDS: [Field<u32, SS_PORT_MAP::Register>; 4] = [
    SS_PORT_MAP::PORT0_INTERNAL,
    SS_PORT_MAP::PORT1_INTERNAL,
    SS_PORT_MAP::PORT2_INTERNAL,
    SS_PORT_MAP::PORT3_INTERNAL,
];

/// 每个 SuperSpeed 端口的三个钳位位
#[derive(Clone, Copy)]
pub struct SspClamp {
    pub clamp_en: Field<u32, ELPG_PROGRAM_1::Register>,
    pub clamp_en_early: Field<u32, ELPG_PROGRAM_1::Register>,
    pub vcore_down: Field<u32, ELPG_PROGRAM_1::Register>,
}

pub const SSP_CLAMP: [SspClamp; 4] = [
    SspClamp {
        clamp_en: ELPG_PROGRAM_1::SSP0_ELPG_CLAMP_EN,
        clamp_en_early: ELPG_PROGRAM_1::SSP0_ELPG_CLAMP_EN_EARLY,
        vcore_down: ELPG_PROGRAM_1::SSP0_ELPG_VCORE_DOWN,
    },
    SspClamp {
        clamp_en: ELPG_PROGRAM_1::SSP1_ELPG_CLAMP_EN,
        clamp_en_early: ELPG_PROGRAM_1::SSP1_ELPG_CLAMP_EN_EARLY,
        vcore_down: ELPG_PROGRAM_1::SSP1_ELPG_VCORE_DOWN,
    },
    SspClamp {
        clamp_en: ELPG_PROGRAM_1::SSP2_ELPG_CLAMP_EN,
        clamp_en_early: ELPG_PROGRAM_1::SSP2_ELPG_CLAMP_EN_EARLY,
        vcore_down: ELPG_PROGRAM_1::SSP2_ELPG_VCORE_DOWN,
    },
    SspClamp {
        clamp_en: ELPG_PROGRAM_1::SSP3_ELPG_CLAMP_EN,
        clamp_en_early: ELPG_PROGRAM_1::SSP3_ELPG_CLAMP_EN_EARLY,
        vcore_down: ELPG_PROGRAM_1::SSP3_ELPG_VCORE_DOWN,
    },
];

pub const PCIE_IDDQ_DISABLE_FIELDS: [Field<u32, USB3_PAD_MUX::Register>; 7] = [
    USB3_PAD_MUX::PCIE_IDDQ_DISABLE0,
    USB3_PAD_MUX::PCIE_IDDQ_DISABLE1,
    USB3_PAD_MUX::PCIE_IDDQ_DISABLE2,
    USB3_PAD_MUX::PCIE_IDDQ_DISABLE3,
    USB3_PAD_MUX::PCIE_IDDQ_DISABLE4,
    USB3_PAD_MUX::PCIE_IDDQ_DISABLE5,
    USB3_PAD_MUX::PCIE_IDDQ_DISABLE6,
];

pub const SATA_IDDQ_DISABLE_FIELDS: [Field<u32, USB3_PAD_MUX::Register>; 1] =
    [USB3_PAD_MUX::SATA_IDDQ_DISABLE0];

/// 一个端口在 `ELPG_PROGRAM_0` 中的唤醒位：中断使能 + 事件 (写 1 清除)
#[derive(Clone, Copy)]
pub struct WakeBits {
    pub interrupt_enable: Field<u32, ELPG_PROGRAM_0::Register>,
    pub event: Field<u32, ELPG_PROGRAM_0::Register>,
}

pub const USB2_WAKE: [WakeBits; 4] = [
    WakeBits {
        interrupt_enable: ELPG_PROGRAM_0::USB2_PORT0_WAKE_INTERRUPT_ENABLE,
        event: ELPG_PROGRAM_0::USB2_PORT0_WAKEUP_EVENT,
    },
    WakeBits {
        interrupt_enable: ELPG_PROGRAM_0::USB2_PORT1_WAKE_INTERRUPT_ENABLE,
        event: ELPG_PROGRAM_0::USB2_PORT1_WAKEUP_EVENT,
    },
    WakeBits {
        interrupt_enable: ELPG_PROGRAM_0::USB2_PORT2_WAKE_INTERRUPT_ENABLE,
        event: ELPG_PROGRAM_0::USB2_PORT2_WAKEUP_EVENT,
    },
    WakeBits {
        interrupt_enable: ELPG_PROGRAM_0::USB2_PORT3_WAKE_INTERRUPT_ENABLE,
        event: ELPG_PROGRAM_0::USB2_PORT3_WAKEUP_EVENT,
    },
];

pub const SS_WAKE: [WakeBits; 4] = [
    WakeBits {
        interrupt_enable: ELPG_PROGRAM_0::SS_PORT0_WAKE_INTERRUPT_ENABLE,
        event: ELPG_PROGRAM_0::SS_PORT0_WAKEUP_EVENT,
    },
    WakeBits {
        interrupt_enable: ELPG_PROGRAM_0::SS_PORT1_WAKE_INTERRUPT_ENABLE,
        event: ELPG_PROGRAM_0::SS_PORT1_WAKEUP_EVENT,
    },
    WakeBits {
        interrupt_enable: ELPG_PROGRAM_0::SS_PORT2_WAKE_INTERRUPT_ENABLE,
        event: ELPG_PROGRAM_0::SS_PORT2_WAKEUP_EVENT,
    },
    WakeBits {
        interrupt_enable: ELPG_PROGRAM_0::SS_PORT3_WAKE_INTERRUPT_ENABLE,
        event: ELPG_PROGRAM_0::SS_PORT3_WAKEUP_EVENT,
    },
];

pub const HSIC_WAKE: [WakeBits; 1] = [WakeBits {
    interrupt_enable: ELPG_PROGRAM_0::USB2_HSIC_PORT0_WAKE_INTERRUPT_ENABLE,
    event: ELPG_PROGRAM_0::USB2_HSIC_PORT0_WAKEUP_EVENT,
}];

bitflags::bitflags! {
    /// `ELPG_PROGRAM_0` 中全部唤醒事件位
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WakeEvents: u32 {
        const USB2_PORT0 = 1 << 7;
        const USB2_PORT1 = 1 << 8;
        const USB2_PORT2 = 1 << 9;
        const USB2_PORT3 = 1 << 10;
        const SS_PORT0 = 1 << 21;
        const SS_PORT1 = 1 << 22;
        const SS_PORT2 = 1 << 23;
        const SS_PORT3 = 1 << 24;
        const HSIC_PORT0 = 1 << 30;
    }
}

// =============================================================================
// UPHY 配置字
// =============================================================================

/// 通过 `CFG_ADDR`/`CFG_WDATA` 间接写入的 UPHY 配置字
#[derive(Debug, Clone, Copy)]
pub struct UphyCfg {
    pub addr: u32,
    pub data: u32,
}

const fn cfg(addr: u32, data: u32) -> UphyCfg {
    UphyCfg { addr, data }
}

/// B01 PCIe PLL 的 gen1 初始化数据，替代 CAL_CTRL/DCO_CTRL 编程
pub const USB3_PLL_G1_INIT_DATA: &[UphyCfg] = &[
    cfg(0x02, 0x0000),
    cfg(0x03, 0x7051),
    cfg(0x25, 0x0130),
    cfg(0x1e, 0x0017),
];

pub const PCIE_LANE_DEFAULTS: &[UphyCfg] = &[cfg(0x97, 0x0080)];

pub const USB3_LANE_DEFAULTS: &[UphyCfg] = &[
    cfg(0x01, 0x0002),
    cfg(0x04, 0x0032),
    cfg(0x07, 0x0022),
    cfg(0x35, 0x2587),
    cfg(0x49, 0x0fc7),
    cfg(0x52, 0x0001),
    cfg(0x53, 0x3c0f),
    cfg(0x56, 0xc00f),
    cfg(0x5d, 0xff07),
    cfg(0x5e, 0x141a),
    cfg(0x97, 0x0080),
];
