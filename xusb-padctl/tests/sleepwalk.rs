mod common;

use common::*;
use xusb_padctl::{
    BoardConfig, DeviceSpeed, LaneConfig, LaneFunction, PadKind, PadctlError, SocRevision,
    UtmiPadConfig,
    ops::Kernel,
    regs::{ELPG_PROGRAM_0, ELPG_PROGRAM_1, USB2_BIAS_PAD_CTL1},
};

#[test]
fn usb2_sleepwalk_hands_pad_snapshot_to_pmc() {
    let h = harness();
    let lane = h.ctl.lane(PadKind::Usb2, 0).unwrap();
    let phy = h.ctl.phy(lane);
    phy.init().unwrap();
    phy.power_on().unwrap();

    // tracking 结果：tctrl=0x15, pctrl=0x2a
    let bias = h.regs.peek(USB2_BIAS_PAD_CTL1) & !0xfff;
    h.regs.poke(USB2_BIAS_PAD_CTL1, bias | 0x15 | (0x2a << 6));

    phy.enable_sleepwalk(DeviceSpeed::High).unwrap();
    phy.disable_sleepwalk().unwrap();

    assert_eq!(
        h.pmc.calls(),
        vec![
            PmcCall::UtmiEnable(
                0,
                DeviceSpeed::High,
                UtmiPadConfig {
                    tctrl: 0x15,
                    pctrl: 0x2a,
                    rpd_ctrl: USB_CALIB_EXT,
                },
            ),
            PmcCall::UtmiDisable(0),
        ]
    );
}

#[test]
fn hsic_sleepwalk_is_delegated() {
    let h = harness();
    let phy = h.ctl.phy(h.ctl.lane(PadKind::Hsic, 0).unwrap());

    phy.enable_sleepwalk(DeviceSpeed::High).unwrap();
    phy.disable_sleepwalk().unwrap();

    assert_eq!(
        h.pmc.calls(),
        vec![PmcCall::HsicEnable(0), PmcCall::HsicDisable(0)]
    );
}

#[test]
fn sleepwalk_without_pmc_is_unavailable() {
    let h = HarnessBuilder::new(t210_board()).without_pmc().build();
    let phy = h.ctl.phy(h.ctl.lane(PadKind::Usb2, 1).unwrap());

    assert!(matches!(
        phy.enable_sleepwalk(DeviceSpeed::Full),
        Err(PadctlError::ResourceUnavailable(_))
    ));
}

#[test]
fn ss_sleepwalk_clamps_early_then_clamp() {
    let h = harness();
    let phy = h.ctl.phy(h.ctl.lane(PadKind::Pcie, 5).unwrap());
    let before = h.clock.now();

    // pcie-5 是 usb3-1，钳位位在 bit3..5
    phy.enable_sleepwalk(DeviceSpeed::SuperSpeed).unwrap();
    assert_eq!(
        h.regs.writes_to(ELPG_PROGRAM_1),
        vec![0b010 << 3, 0b011 << 3]
    );
    assert!(h.clock.now() - before >= std::time::Duration::from_micros(350));

    h.regs.clear_log();
    phy.disable_sleepwalk().unwrap();
    assert_eq!(h.regs.writes_to(ELPG_PROGRAM_1), vec![0b001 << 3, 0]);
    assert!(h.pmc.calls().is_empty());
}

#[test]
fn unmapped_ss_lane_has_no_sleepwalk() {
    // B01 的映射表里没有 pcie-0
    let b01 = BoardConfig::new(SocRevision::T210B01)
        .with_lane(LaneConfig::new(PadKind::Pcie, 0, LaneFunction::PcieX1));
    let h = HarnessBuilder::new(b01).build();
    let phy = h.ctl.phy(h.ctl.lane(PadKind::Pcie, 0).unwrap());

    assert!(matches!(
        phy.enable_sleepwalk(DeviceSpeed::SuperSpeed),
        Err(PadctlError::Configuration(_))
    ));
    assert!(phy.enable_wake().is_err());
}

#[test]
fn usb2_wake_enable_and_disable() {
    let h = harness();
    let phy = h.ctl.phy(h.ctl.lane(PadKind::Usb2, 1).unwrap());
    // usb2-0 已使能唤醒且有未处理事件
    h.regs.poke(ELPG_PROGRAM_0, (1 << 0) | (1 << 7));

    phy.enable_wake().unwrap();
    assert_eq!(
        h.regs.writes_to(ELPG_PROGRAM_0),
        vec![(1 << 0) | (1 << 8), (1 << 0) | (1 << 1)]
    );
    assert!(!phy.remote_wake_detected().unwrap());

    h.regs.poke(ELPG_PROGRAM_0, (1 << 1) | (1 << 8));
    assert!(phy.remote_wake_detected().unwrap());

    h.regs.clear_log();
    phy.disable_wake().unwrap();
    assert_eq!(h.regs.writes_to(ELPG_PROGRAM_0), vec![0, 1 << 8]);
    assert!(!phy.remote_wake_detected().unwrap());
}

#[test]
fn ss_and_hsic_wake_bits() {
    let h = harness();

    // pcie-6 是 usb3-0：中断使能 bit14，事件 bit21
    let ss = h.ctl.phy(h.ctl.lane(PadKind::Pcie, 6).unwrap());
    ss.enable_wake().unwrap();
    assert_eq!(h.regs.writes_to(ELPG_PROGRAM_0), vec![1 << 21, 1 << 14]);

    h.regs.clear_log();
    h.regs.poke(ELPG_PROGRAM_0, 0);
    let hsic = h.ctl.phy(h.ctl.lane(PadKind::Hsic, 0).unwrap());
    hsic.enable_wake().unwrap();
    assert_eq!(h.regs.writes_to(ELPG_PROGRAM_0), vec![1 << 30, 1 << 28]);

    h.regs.poke(ELPG_PROGRAM_0, (1 << 28) | (1 << 30));
    assert!(hsic.remote_wake_detected().unwrap());
    assert!(!ss.remote_wake_detected().unwrap());
}
