//! USB2 pad 的熔丝校准值，构造控制器时读取一次

use tock_registers::{LocalRegisterCopy, fields::Field, register_bitfields};
use xusb_if::ops::FuseOp;

use crate::err::Result;

pub const FUSE_SKU_CALIB_0: usize = 0xf0;
pub const FUSE_USB_CALIB_EXT_0: usize = 0x250;

register_bitfields![u32,
    SKU_CALIB [
        HS_CURR_LEVEL_PAD0 OFFSET(0) NUMBITS(6) [],
        HS_TERM_RANGE_ADJ OFFSET(7) NUMBITS(4) []
    ],
    USB_CALIB_EXT [
        RPD_CTRL OFFSET(0) NUMBITS(5) []
    ]
];

/// pad `index` 的 HS 电流档位字段；pad 0 在 bit0，其余从 bit11 起每 6 位一个
const fn hs_curr_level_field(index: usize) -> Field<u32, SKU_CALIB::Register> {
    if index == 0 {
        SKU_CALIB::HS_CURR_LEVEL_PAD0
    } else {
        Field::new(0x3f, 11 + (index - 1) * 6)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FuseCalibration {
    pub hs_curr_level: [u32; 4],
    pub hs_term_range_adj: u32,
    pub rpd_ctrl: u32,
}

impl FuseCalibration {
    pub fn read(fuse: &dyn FuseOp) -> Result<Self> {
        let sku = LocalRegisterCopy::<u32, SKU_CALIB::Register>::new(fuse.readl(FUSE_SKU_CALIB_0)?);

        let mut hs_curr_level = [0; 4];
        for (i, level) in hs_curr_level.iter_mut().enumerate() {
            *level = sku.read(hs_curr_level_field(i));
        }

        let ext = LocalRegisterCopy::<u32, USB_CALIB_EXT::Register>::new(
            fuse.readl(FUSE_USB_CALIB_EXT_0)?,
        );

        let cal = Self {
            hs_curr_level,
            hs_term_range_adj: sku.read(SKU_CALIB::HS_TERM_RANGE_ADJ),
            rpd_ctrl: ext.read(USB_CALIB_EXT::RPD_CTRL),
        };
        log::debug!("fuse calibration: {cal:?}");
        Ok(cal)
    }
}
