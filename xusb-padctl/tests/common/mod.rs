#![allow(dead_code)]

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
    time::Duration,
};

use xusb_padctl::{
    BoardConfig, Capability, ClockId, DeviceSpeed, LaneConfig, LaneFunction, PadController,
    PadKind, PadctlError, PadctlOps, PllKind, PortConfig, PortKind, ResetId, SocRevision,
    UtmiPadConfig,
    ops::{CarOp, FuseOp, Kernel, OtgWork, PmcOp, RegulatorOp, VbusPinOp},
    sim::SimRegs,
};

type Result<T = ()> = core::result::Result<T, PadctlError>;

pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

// =============================================================================
// 协作者
// =============================================================================

#[derive(Default)]
pub struct VirtualClock {
    nanos: AtomicU64,
}

impl Kernel for VirtualClock {
    fn delay(&self, duration: Duration) {
        self.nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::SeqCst);
    }

    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarEvent {
    ClkEnable(ClockId),
    ClkDisable(ClockId),
    ResetDeassert(ResetId),
    PllHwControl(PllKind),
    PllHwSequence(PllKind),
    PlleHwSequence,
}

#[derive(Default)]
pub struct MockCar {
    pub events: Mutex<Vec<CarEvent>>,
    pub fail_clock: Mutex<Option<ClockId>>,
}

impl MockCar {
    pub fn events(&self) -> Vec<CarEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, event: &CarEvent) -> usize {
        self.events().iter().filter(|e| *e == event).count()
    }

    fn push(&self, e: CarEvent) {
        self.events.lock().unwrap().push(e);
    }
}

impl CarOp for MockCar {
    fn clk_enable(&self, clk: ClockId) -> Result {
        if *self.fail_clock.lock().unwrap() == Some(clk) {
            return Err(PadctlError::unavailable("clock"));
        }
        self.push(CarEvent::ClkEnable(clk));
        Ok(())
    }

    fn clk_disable(&self, clk: ClockId) {
        self.push(CarEvent::ClkDisable(clk));
    }

    fn reset_deassert(&self, rst: ResetId) -> Result {
        self.push(CarEvent::ResetDeassert(rst));
        Ok(())
    }

    fn pll_hw_control_enable(&self, pll: PllKind) {
        self.push(CarEvent::PllHwControl(pll));
    }

    fn pll_hw_sequence_start(&self, pll: PllKind) {
        self.push(CarEvent::PllHwSequence(pll));
    }

    fn plle_hw_sequence_start(&self) {
        self.push(CarEvent::PlleHwSequence);
    }

    fn plle_hw_sequence_is_enabled(&self) -> bool {
        false
    }
}

/// 默认所有名字都存在，记录开关状态；`stuck_on` 中的名字关不掉
#[derive(Default)]
pub struct MockRegulator {
    pub enabled: Mutex<BTreeSet<String>>,
    pub missing: Mutex<BTreeSet<String>>,
    pub enable_calls: Mutex<BTreeMap<String, usize>>,
    pub stuck_on: Mutex<BTreeSet<String>>,
}

impl MockRegulator {
    pub fn is_on(&self, name: &str) -> bool {
        self.enabled.lock().unwrap().contains(name)
    }

    pub fn enable_calls(&self, name: &str) -> usize {
        self.enable_calls
            .lock()
            .unwrap()
            .get(name)
            .copied()
            .unwrap_or(0)
    }
}

impl RegulatorOp for MockRegulator {
    fn exists(&self, name: &str) -> bool {
        !self.missing.lock().unwrap().contains(name)
    }

    fn enable(&self, name: &str) -> Result {
        *self
            .enable_calls
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default() += 1;
        self.enabled.lock().unwrap().insert(name.to_string());
        Ok(())
    }

    fn disable(&self, name: &str) -> Result {
        if self.stuck_on.lock().unwrap().contains(name) {
            return Err(PadctlError::hw("regulator refused to turn off"));
        }
        self.enabled.lock().unwrap().remove(name);
        Ok(())
    }

    fn is_enabled(&self, name: &str) -> bool {
        self.is_on(name)
    }
}

pub struct MockFuse {
    pub sku_calib: u32,
    pub usb_calib_ext: u32,
}

impl FuseOp for MockFuse {
    fn readl(&self, offset: usize) -> Result<u32> {
        match offset {
            0xf0 => Ok(self.sku_calib),
            0x250 => Ok(self.usb_calib_ext),
            _ => Err(PadctlError::unavailable("fuse")),
        }
    }
}

#[derive(Default)]
pub struct CountingWork {
    pub scheduled: AtomicUsize,
}

impl CountingWork {
    pub fn count(&self) -> usize {
        self.scheduled.load(Ordering::SeqCst)
    }
}

impl OtgWork for CountingWork {
    fn schedule(&self) {
        self.scheduled.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PmcCall {
    UtmiEnable(u8, DeviceSpeed, UtmiPadConfig),
    UtmiDisable(u8),
    HsicEnable(u8),
    HsicDisable(u8),
}

#[derive(Default)]
pub struct MockPmc {
    pub calls: Mutex<Vec<PmcCall>>,
}

impl MockPmc {
    pub fn calls(&self) -> Vec<PmcCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl PmcOp for MockPmc {
    fn utmi_replay_sleepwalk(&self, port: u8, speed: DeviceSpeed, cfg: &UtmiPadConfig) -> Result {
        self.calls
            .lock()
            .unwrap()
            .push(PmcCall::UtmiEnable(port, speed, *cfg));
        Ok(())
    }

    fn utmi_clear_sleepwalk(&self, port: u8) -> Result {
        self.calls.lock().unwrap().push(PmcCall::UtmiDisable(port));
        Ok(())
    }

    fn hsic_replay_sleepwalk(&self, port: u8) -> Result {
        self.calls.lock().unwrap().push(PmcCall::HsicEnable(port));
        Ok(())
    }

    fn hsic_clear_sleepwalk(&self, port: u8) -> Result {
        self.calls.lock().unwrap().push(PmcCall::HsicDisable(port));
        Ok(())
    }
}

#[derive(Default)]
pub struct MockVbusPin {
    pub calls: Mutex<Vec<(i32, bool)>>,
}

impl VbusPinOp for MockVbusPin {
    fn select_vbus_en_state(&self, oc_pin: i32, enable: bool) -> Result {
        self.calls.lock().unwrap().push((oc_pin, enable));
        Ok(())
    }
}

// =============================================================================
// 组装
// =============================================================================

/// pad0=0x20, term=0x6, pad1..3=0x10/0x11/0x12
pub const SKU_CALIB: u32 = 0x20 | (0x6 << 7) | (0x10 << 11) | (0x11 << 17) | (0x12 << 23);
pub const USB_CALIB_EXT: u32 = 0x0d;

pub struct Harness {
    pub regs: Arc<SimRegs>,
    pub clock: Arc<VirtualClock>,
    pub car: Arc<MockCar>,
    pub regulator: Arc<MockRegulator>,
    pub work: Arc<CountingWork>,
    pub pmc: Arc<MockPmc>,
    pub vbus_pin: Arc<MockVbusPin>,
    pub ctl: PadController,
}

pub struct HarnessBuilder {
    config: BoardConfig,
    with_pmc: bool,
    with_vbus_pin: bool,
    regulator: MockRegulator,
}

impl HarnessBuilder {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            config,
            with_pmc: true,
            with_vbus_pin: false,
            regulator: MockRegulator::default(),
        }
    }

    pub fn without_pmc(mut self) -> Self {
        self.with_pmc = false;
        self
    }

    pub fn with_vbus_pin(mut self) -> Self {
        self.with_vbus_pin = true;
        self
    }

    pub fn missing_supply(self, name: &str) -> Self {
        self.regulator
            .missing
            .lock()
            .unwrap()
            .insert(name.to_string());
        self
    }

    pub fn build(self) -> Harness {
        init_log();

        let regs = Arc::new(SimRegs::new());
        let clock = Arc::new(VirtualClock::default());
        let car = Arc::new(MockCar::default());
        let regulator = Arc::new(self.regulator);
        let work = Arc::new(CountingWork::default());
        let pmc = Arc::new(MockPmc::default());
        let vbus_pin = Arc::new(MockVbusPin::default());

        let ops = PadctlOps {
            kernel: clock.clone(),
            car: car.clone(),
            regulator: regulator.clone(),
            fuse: Arc::new(MockFuse {
                sku_calib: SKU_CALIB,
                usb_calib_ext: USB_CALIB_EXT,
            }),
            otg_work: work.clone(),
            pmc: self.with_pmc.then(|| pmc.clone() as Arc<dyn PmcOp>),
            vbus_pin: self
                .with_vbus_pin
                .then(|| vbus_pin.clone() as Arc<dyn VbusPinOp>),
        };

        let ctl = PadController::new(regs.clone(), self.config, ops).unwrap();

        Harness {
            regs,
            clock,
            car,
            regulator,
            work,
            pmc,
            vbus_pin,
            ctl,
        }
    }
}

/// 典型 T210 板级配置
///
/// - usb2-0 OTG (vbus0)，usb2-1 主机 (vbus1)，hsic-0 主机
/// - pcie-6/5/3 与 sata-0 作 USB3，pcie-0 作 PCIe x1，pcie-4 作 PCIe x4
/// - usb3-0..3 分别落在 pcie-6、pcie-5、pcie-3、sata-0
pub fn t210_board() -> BoardConfig {
    BoardConfig::new(SocRevision::T210)
        .with_lane(LaneConfig::new(PadKind::Usb2, 0, LaneFunction::Xusb))
        .with_lane(
            LaneConfig::new(PadKind::Usb2, 1, LaneFunction::Xusb).with_hs_curr_level_offset(-2),
        )
        .with_lane(LaneConfig::new(PadKind::Hsic, 0, LaneFunction::Xusb))
        .with_lane(LaneConfig::new(PadKind::Pcie, 0, LaneFunction::PcieX1))
        .with_lane(LaneConfig::new(PadKind::Pcie, 3, LaneFunction::Xusb))
        .with_lane(LaneConfig::new(PadKind::Pcie, 4, LaneFunction::PcieX4))
        .with_lane(LaneConfig::new(PadKind::Pcie, 5, LaneFunction::Xusb))
        .with_lane(LaneConfig::new(PadKind::Pcie, 6, LaneFunction::Xusb))
        .with_lane(LaneConfig::new(PadKind::Sata, 0, LaneFunction::Xusb))
        .with_port(PortConfig::new(PortKind::Usb2, 0, Capability::Otg).with_supply("vbus0"))
        .with_port(PortConfig::new(PortKind::Usb2, 1, Capability::Host).with_supply("vbus1"))
        .with_port(PortConfig::new(PortKind::Hsic, 0, Capability::Host))
        .with_port(PortConfig::new(PortKind::Usb3, 0, Capability::Otg))
        .with_port(PortConfig::new(PortKind::Usb3, 1, Capability::Host).internal())
        .with_port(PortConfig::new(PortKind::Usb3, 2, Capability::Host))
        .with_port(PortConfig::new(PortKind::Usb3, 3, Capability::Host))
}

pub fn harness() -> Harness {
    HarnessBuilder::new(t210_board()).build()
}
