mod common;

use common::*;
use xusb_padctl::{
    BoardConfig, Capability, ClockId, HsicTrims, LaneConfig, LaneFunction, PadKind, PadctlError,
    PortConfig, PortKind, SocRevision,
    regs::{
        HSIC_PAD_TRK_CTL, HSIC_STRB_TRIM_CONTROL, UPHY_MISC_PAD_S0_CTL1, USB2_BIAS_PAD_CTL0,
        USB2_PORT_CAP, USB3_PAD_MUX, hsic_pad_ctl0, hsic_pad_ctl1, hsic_pad_ctl2,
        uphy_misc_pad_px_ctl1, uphy_misc_pad_px_ctl8, usb2_otg_pad_ctl0, usb2_otg_pad_ctl1,
    },
};

const BIAS_PD: u32 = 1 << 11;

#[test]
fn lane_init_and_exit_share_one_enable() {
    let h = harness();
    let usb2 = h.ctl.phy(h.ctl.lane(PadKind::Usb2, 1).unwrap());
    let pcie = h.ctl.phy(h.ctl.lane(PadKind::Pcie, 6).unwrap());
    let sata = h.ctl.phy(h.ctl.lane(PadKind::Sata, 0).unwrap());

    usb2.init().unwrap();
    pcie.init().unwrap();
    sata.init().unwrap();
    assert_eq!(h.ctl.enable_count(), 3);
    assert_eq!(h.ctl.stats().calibration_runs, 1);

    sata.exit().unwrap();
    pcie.exit().unwrap();
    usb2.exit().unwrap();
    assert_eq!(h.ctl.enable_count(), 0);
    assert_eq!(h.ctl.stats().clamp_applies, 1);
    assert!(!h.regulator.is_on("vbus1"));
}

#[test]
fn usb2_power_on_programs_fuse_values() {
    let h = harness();
    let phy = h.ctl.phy(h.ctl.lane(PadKind::Usb2, 1).unwrap());

    phy.power_on().unwrap();

    // 熔丝 pad1=0x10，lane 偏移 -2
    let ctl0 = h.regs.peek(usb2_otg_pad_ctl0(1));
    assert_eq!(ctl0 & 0x3f, 0x0e);
    assert_eq!(ctl0 & (0b1011 << 26), 0);

    let ctl1 = h.regs.peek(usb2_otg_pad_ctl1(1));
    assert_eq!((ctl1 >> 3) & 0xf, 0x6);
    assert_eq!((ctl1 >> 26) & 0x1f, USB_CALIB_EXT);

    // usb2-1 主机
    assert_eq!((h.regs.peek(USB2_PORT_CAP) >> 4) & 0x3, 1);

    let bias = h.regs.peek(USB2_BIAS_PAD_CTL0);
    assert_eq!((bias >> 3) & 0x7, 7);
    assert_eq!(bias & 0x7, 0);
    assert_eq!(bias & BIAS_PD, 0);
}

#[test]
fn pre_a02_silicon_raises_squelch_level() {
    let h = HarnessBuilder::new(t210_board().with_pre_a02_silicon(true)).build();
    let phy = h.ctl.phy(h.ctl.lane(PadKind::Usb2, 0).unwrap());

    phy.power_on().unwrap();

    assert_eq!(h.regs.peek(USB2_BIAS_PAD_CTL0) & 0x7, 2);
    // usb2-0 OTG
    assert_eq!(h.regs.peek(USB2_PORT_CAP) & 0x3, 3);
}

#[test]
fn usb2_bias_tracks_only_on_first_and_last_lane() {
    let h = harness();
    h.regs.poke(USB2_BIAS_PAD_CTL0, BIAS_PD);
    let p0 = h.ctl.phy(h.ctl.lane(PadKind::Usb2, 0).unwrap());
    let p1 = h.ctl.phy(h.ctl.lane(PadKind::Usb2, 1).unwrap());

    p0.power_on().unwrap();
    p1.power_on().unwrap();
    assert_eq!(h.ctl.pad_enable_count(PadKind::Usb2), 2);
    assert_eq!(h.car.count(&CarEvent::ClkEnable(ClockId::Usb2Trk)), 1);
    assert_eq!(h.car.count(&CarEvent::ClkDisable(ClockId::Usb2Trk)), 1);
    assert_eq!(h.regs.peek(USB2_BIAS_PAD_CTL0) & BIAS_PD, 0);

    p0.power_off().unwrap();
    assert_eq!(h.regs.peek(USB2_BIAS_PAD_CTL0) & BIAS_PD, 0);
    p1.power_off().unwrap();
    assert_ne!(h.regs.peek(USB2_BIAS_PAD_CTL0) & BIAS_PD, 0);
    assert_eq!(h.ctl.pad_enable_count(PadKind::Usb2), 0);

    assert!(matches!(
        p1.power_off(),
        Err(PadctlError::Configuration(_))
    ));
}

#[test]
fn usb2_lane_without_port_cannot_power_on() {
    let board = BoardConfig::new(SocRevision::T210)
        .with_lane(LaneConfig::new(PadKind::Usb2, 2, LaneFunction::Xusb));
    let h = HarnessBuilder::new(board).build();
    let phy = h.ctl.phy(h.ctl.lane(PadKind::Usb2, 2).unwrap());

    assert!(matches!(
        phy.power_on(),
        Err(PadctlError::Configuration(_))
    ));
    assert!(phy.init().is_err());
    assert_eq!(h.ctl.enable_count(), 0);
}

#[test]
fn uphy_lane_power_toggles_iddq() {
    let h = harness();
    let pcie = h.ctl.phy(h.ctl.lane(PadKind::Pcie, 6).unwrap());
    let sata = h.ctl.phy(h.ctl.lane(PadKind::Sata, 0).unwrap());

    pcie.power_on().unwrap();
    sata.power_on().unwrap();
    let mux = h.regs.peek(USB3_PAD_MUX);
    assert_ne!(mux & (1 << 7), 0);
    assert_ne!(mux & (1 << 8), 0);
    assert_eq!(h.ctl.pad_enable_count(PadKind::Pcie), 1);

    pcie.power_off().unwrap();
    assert_eq!(h.regs.peek(USB3_PAD_MUX) & (1 << 7), 0);
    assert_ne!(h.regs.peek(USB3_PAD_MUX) & (1 << 8), 0);
    // 复用字段不受影响
    assert_eq!((h.regs.peek(USB3_PAD_MUX) >> 24) & 0x3, 1);

    assert!(pcie.power_off().is_err());
}

#[test]
fn b01_lane_power_on_writes_lane_defaults() {
    let board = BoardConfig::new(SocRevision::T210B01)
        .with_lane(LaneConfig::new(PadKind::Pcie, 5, LaneFunction::Xusb))
        .with_lane(LaneConfig::new(PadKind::Pcie, 0, LaneFunction::PcieX1));
    let h = HarnessBuilder::new(board).build();

    h.ctl
        .phy(h.ctl.lane(PadKind::Pcie, 5).unwrap())
        .power_on()
        .unwrap();
    h.ctl
        .phy(h.ctl.lane(PadKind::Pcie, 0).unwrap())
        .power_on()
        .unwrap();

    let usb3 = h.regs.writes_to(uphy_misc_pad_px_ctl8(5));
    assert!(usb3.len() > 1);
    // CFG_RESET | CFG_WS，地址在 [23:16]
    assert!(usb3.iter().all(|w| w & (1 << 27 | 1 << 24) == (1 << 27 | 1 << 24)));
    assert_eq!(h.regs.writes_to(uphy_misc_pad_px_ctl8(0)), vec![
        (1 << 27) | (1 << 24) | (0x97 << 16) | 0x0080
    ]);
}

#[test]
fn hsic_power_on_applies_trims_and_supply() {
    let trims = HsicTrims {
        strobe_trim: 0x1b,
        tx_rtune_p: 0x4,
        rx_strobe_trim: 0x3,
        rx_data_trim: 0x2,
    };
    let board = BoardConfig::new(SocRevision::T210)
        .with_lane(LaneConfig::new(PadKind::Hsic, 0, LaneFunction::Xusb).with_hsic_trims(trims))
        .with_port(PortConfig::new(PortKind::Hsic, 0, Capability::Host))
        .with_hsic_supply("vdd_hsic");
    let h = HarnessBuilder::new(board).build();
    h.regs.poke(HSIC_PAD_TRK_CTL, 1 << 19);
    let phy = h.ctl.phy(h.ctl.lane(PadKind::Hsic, 0).unwrap());

    phy.power_on().unwrap();

    assert!(h.regulator.is_on("vdd_hsic"));
    assert_eq!(h.regs.peek(HSIC_STRB_TRIM_CONTROL), 0x1b);
    assert_eq!(h.regs.peek(hsic_pad_ctl1(0)) & 0xf, 0x4);
    assert_eq!(h.regs.peek(hsic_pad_ctl2(0)), (0x3 << 8) | 0x2);
    // RPD_DATA0/1/STROBE 下拉
    assert_eq!(h.regs.peek(hsic_pad_ctl0(0)), 0b111 << 13);
    assert_eq!(h.regs.peek(HSIC_PAD_TRK_CTL) & (1 << 19), 0);
    assert_eq!(h.car.count(&CarEvent::ClkEnable(ClockId::HsicTrk)), 1);

    phy.power_off().unwrap();
    // PD_TX/RX/ZI 全部置位
    assert_eq!(h.regs.peek(hsic_pad_ctl0(0)) & 0x3fe, 0x3fe);
    assert!(!h.regulator.is_on("vdd_hsic"));
}

#[test]
fn hsic_tracking_clock_failure_turns_supply_back_off() {
    let board = BoardConfig::new(SocRevision::T210)
        .with_lane(LaneConfig::new(PadKind::Hsic, 0, LaneFunction::Xusb))
        .with_port(PortConfig::new(PortKind::Hsic, 0, Capability::Host))
        .with_hsic_supply("vdd_hsic");
    let h = HarnessBuilder::new(board).build();
    *h.car.fail_clock.lock().unwrap() = Some(ClockId::HsicTrk);
    let phy = h.ctl.phy(h.ctl.lane(PadKind::Hsic, 0).unwrap());

    assert!(matches!(
        phy.power_on(),
        Err(PadctlError::ResourceUnavailable(_))
    ));
    assert_eq!(h.regulator.enable_calls("vdd_hsic"), 1);
    assert!(!h.regulator.is_on("vdd_hsic"));
    assert_eq!(h.ctl.pad_enable_count(PadKind::Hsic), 0);
}

#[test]
fn usb2_init_failure_turns_vbus_back_off() {
    let h = harness();
    *h.car.fail_clock.lock().unwrap() = Some(ClockId::Plle);
    let phy = h.ctl.phy(h.ctl.lane(PadKind::Usb2, 1).unwrap());

    assert!(matches!(phy.init(), Err(PadctlError::HardwareSequence(_))));
    assert_eq!(h.regulator.enable_calls("vbus1"), 1);
    assert!(!h.regulator.is_on("vbus1"));
    assert_eq!(h.ctl.enable_count(), 0);
}

#[test]
fn failed_rollback_still_reports_first_error() {
    let h = harness();
    *h.car.fail_clock.lock().unwrap() = Some(ClockId::Plle);
    h.regulator.stuck_on.lock().unwrap().insert("vbus1".into());
    let phy = h.ctl.phy(h.ctl.lane(PadKind::Usb2, 1).unwrap());

    // PLLE 的错误优先于稳压器关断失败
    match phy.init() {
        Err(PadctlError::HardwareSequence(msg)) => assert!(msg.contains("PLLE")),
        other => panic!("unexpected result {other:?}"),
    }
    assert!(h.regulator.is_on("vbus1"));
    assert_eq!(h.ctl.enable_count(), 0);
}

#[test]
fn missing_hsic_supply_is_dropped() {
    let board = t210_board().with_hsic_supply("vdd_hsic");
    let h = HarnessBuilder::new(board)
        .missing_supply("vdd_hsic")
        .build();
    let phy = h.ctl.phy(h.ctl.lane(PadKind::Hsic, 0).unwrap());

    phy.power_on().unwrap();
    assert_eq!(h.regulator.enable_calls("vdd_hsic"), 0);
}

#[test]
fn hsic_idle_pulls() {
    let h = harness();

    h.ctl.hsic_set_idle(0, true).unwrap();
    // RPD_DATA0/1 + RPU_STROBE
    assert_eq!(h.regs.peek(hsic_pad_ctl0(0)), (0b11 << 13) | (1 << 18));

    h.ctl.hsic_set_idle(0, false).unwrap();
    assert_eq!(h.regs.peek(hsic_pad_ctl0(0)), 0);

    assert!(h.ctl.hsic_set_idle(1, true).is_err());
}

#[test]
fn lfps_detect_targets_lane_of_port() {
    let h = harness();

    // usb3-0 在 pcie-6
    h.ctl.usb3_set_lfps_detect(0, false).unwrap();
    let v = h.regs.peek(uphy_misc_pad_px_ctl1(6));
    assert_eq!(v, (1 << 13) | (1 << 18) | (1 << 20));

    h.ctl.usb3_set_lfps_detect(0, true).unwrap();
    assert_eq!(h.regs.peek(uphy_misc_pad_px_ctl1(6)), 0);

    // usb3-3 在 sata-0
    h.ctl.usb3_set_lfps_detect(3, false).unwrap();
    assert_ne!(h.regs.peek(UPHY_MISC_PAD_S0_CTL1), 0);
}

#[test]
fn utmi_pad_power_is_idempotent() {
    let h = harness();
    let lane = h.ctl.lane(PadKind::Usb2, 0).unwrap();
    h.regs.poke(usb2_otg_pad_ctl0(0), 1 << 26);
    h.regs.poke(usb2_otg_pad_ctl1(0), 1 << 2);

    h.ctl.utmi_pad_power_on(lane).unwrap();
    assert_eq!(h.regs.peek(usb2_otg_pad_ctl0(0)), 0);
    assert_eq!(h.regs.peek(usb2_otg_pad_ctl1(0)), 0);

    h.regs.clear_log();
    h.ctl.utmi_pad_power_on(lane).unwrap();
    assert!(h.regs.writes().is_empty());

    h.ctl.utmi_pad_power_down(lane).unwrap();
    assert_eq!(h.regs.peek(usb2_otg_pad_ctl0(0)), 1 << 26);
    assert_eq!(h.regs.peek(usb2_otg_pad_ctl1(0)), 1 << 2);

    let pcie = h.ctl.lane(PadKind::Pcie, 6).unwrap();
    assert_eq!(h.ctl.utmi_pad_power_on(pcie), Err(PadctlError::NotSupported));
}
