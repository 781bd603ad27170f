mod common;

use std::thread;

use common::*;
use xusb_padctl::{PadKind, PortKind, regs::SS_PORT_MAP};

#[test]
fn racing_lane_inits_calibrate_once() {
    init_log();

    for _ in 0..32 {
        let h = harness();
        let usb2 = h.ctl.lane(PadKind::Usb2, 0).unwrap();
        let pcie = h.ctl.lane(PadKind::Pcie, 6).unwrap();

        thread::scope(|s| {
            s.spawn(|| h.ctl.phy(usb2).init().unwrap());
            s.spawn(|| h.ctl.phy(pcie).init().unwrap());
        });

        assert_eq!(h.ctl.enable_count(), 2);
        assert_eq!(h.ctl.stats().calibration_runs, 1);
        assert_eq!(h.ctl.stats().clamp_releases, 1);
    }
}

#[test]
fn racing_port_power_keeps_count_balanced() {
    let h = harness();
    let port = h.ctl.port(PortKind::Usb3, 2).unwrap();

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..50 {
                    h.ctl.port_power_on(port).unwrap();
                    h.ctl.port_power_off(port).unwrap();
                }
            });
        }
    });

    assert_eq!(h.ctl.port_enable_count(port), 0);
    // 最后一次下电写回禁用映射
    assert_eq!((h.regs.peek(SS_PORT_MAP) >> 10) & 0x7, 7);
}

#[test]
fn otg_work_runs_alongside_overrides() {
    let h = harness();
    h.ctl.phy(h.ctl.lane(PadKind::Usb2, 0).unwrap()).init().unwrap();

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..100 {
                h.ctl.id_override(i % 2 == 0).unwrap();
            }
        });
        s.spawn(|| {
            for _ in 0..100 {
                h.ctl.otg_vbus_work();
            }
        });
    });

    // 最后一次覆盖是 floating
    h.ctl.otg_vbus_work();
    assert!(!h.ctl.otg_vbus_on());
    assert!(!h.regulator.is_on("vbus0"));
    assert_eq!(h.work.count(), 100);
}
