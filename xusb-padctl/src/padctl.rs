//! Pad 控制器聚合体
//!
//! 持有寄存器块、lane/pad/port 三张表、全局使能计数和 OTG 状态。一把
//! 自旋锁串行化所有寄存器读-改-写和状态机迁移，并在整段多步序列（包括
//! 轮询）期间一直持有。所有硬件序列都实现在 [`PadctlGuard`] 上，拿到 guard
//! 即证明已持锁。

use alloc::{collections::BTreeSet, format, string::String, sync::Arc, vec::Vec};
use core::ops::{Deref, DerefMut};

use id_arena::Arena;
use spin::{Mutex, MutexGuard};
use xusb_if::{
    PllKind,
    ops::{CarOp, FuseOp, Kernel, OtgWork, PmcOp, RegulatorOp, VbusPinOp},
};

use crate::{
    config::{BoardConfig, LaneConfig, PortConfig},
    err::{PadctlError, Result},
    fuse::FuseCalibration,
    lane::{Lane, LaneFunction, LaneId},
    pad::{Pad, PadId, PadKind},
    phy::Phy,
    pll::{CalTimeoutPolicy, CalibrationReport},
    port::{Port, PortId, PortKind},
    regmap::{RegisterIo, Regmap},
    soc::SocConfig,
};

/// 外部协作者集合
#[derive(Clone)]
pub struct PadctlOps {
    pub kernel: Arc<dyn Kernel>,
    pub car: Arc<dyn CarOp>,
    pub regulator: Arc<dyn RegulatorOp>,
    pub fuse: Arc<dyn FuseOp>,
    pub otg_work: Arc<dyn OtgWork>,
    /// 缺失时 sleepwalk 返回 `ResourceUnavailable`
    pub pmc: Option<Arc<dyn PmcOp>>,
    /// 缺失时过流端口退回稳压器路径
    pub vbus_pin: Option<Arc<dyn VbusPinOp>>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Policy {
    pub otg_vbus_alwayson: bool,
    pub pre_a02_silicon: bool,
    pub cal_timeout_policy: CalTimeoutPolicy,
}

/// 运行统计，供调用方观察共享使能路径
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PadctlStats {
    /// 完整执行 PLL 校准序列的次数（每次 0→1 计一次）
    pub calibration_runs: u32,
    /// 校准过程中的轮询超时次数
    pub calibration_timeouts: u32,
    pub clamp_releases: u32,
    pub clamp_applies: u32,
}

pub(crate) struct PadctlInner {
    pub regs: Regmap,
    pub soc: &'static SocConfig,
    pub fuse: FuseCalibration,
    pub pads: Arena<Pad>,
    pub lanes: Arena<Lane>,
    pub ports: Arena<Port>,
    pub enable: u32,
    pub otg_vbus_on: bool,
    pub usb2_otg_port: Option<u8>,
    pub sata_used_by_xusb: bool,
    pub stats: PadctlStats,
    pub reports: Vec<CalibrationReport>,
}

pub struct PadController {
    inner: Mutex<PadctlInner>,
    ops: PadctlOps,
    policy: Policy,
}

/// 持锁证明
pub(crate) struct PadctlGuard<'a> {
    inner: MutexGuard<'a, PadctlInner>,
    pub ops: &'a PadctlOps,
    pub policy: &'a Policy,
}

impl Deref for PadctlGuard<'_> {
    type Target = PadctlInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for PadctlGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl PadctlGuard<'_> {
    pub fn kernel(&self) -> &dyn Kernel {
        self.ops.kernel.as_ref()
    }
}

impl PadController {
    /// 探测并构建控制器
    ///
    /// 读熔丝、建 pad、按板级配置建 lane 并写复用字段、建端口、打开 SoC
    /// 级供电。单个 lane 或端口配置有误只会跳过该项。
    pub fn new(io: Arc<dyn RegisterIo>, config: BoardConfig, ops: PadctlOps) -> Result<Self> {
        let soc = config.soc.config();
        log::info!("XUSB padctl: probing {:?}", soc.revision);

        // 步骤 1: 熔丝校准
        let fuse = FuseCalibration::read(ops.fuse.as_ref())?;

        let mut inner = PadctlInner {
            regs: Regmap::new(io),
            soc,
            fuse,
            pads: Arena::new(),
            lanes: Arena::new(),
            ports: Arena::new(),
            enable: 0,
            otg_vbus_on: false,
            usb2_otg_port: None,
            sata_used_by_xusb: false,
            stats: PadctlStats::default(),
            reports: Vec::new(),
        };

        // 步骤 2: pad
        for pad in soc.pads {
            let mut p = Pad::new(pad.kind);
            if pad.kind == PadKind::Hsic {
                p.supply = checked_supply(&ops, config.hsic_supply.clone());
            }
            inner.pads.alloc(p);
        }

        // 步骤 3: lane 与复用
        for lane in &config.lanes {
            if let Err(e) = inner.add_lane(lane) {
                log::error!("skip lane {}-{}: {e}", lane.pad.name(), lane.index);
            }
        }

        // 步骤 4: 端口
        let mut seen = BTreeSet::new();
        for port in &config.ports {
            if !seen.insert((port.kind, port.index)) {
                log::error!("skip {}-{}: duplicated", port.kind.name(), port.index);
                continue;
            }
            if let Err(e) = inner.add_port(port, &ops) {
                log::error!("skip {}-{}: {e}", port.kind.name(), port.index);
            }
        }

        // 步骤 5: SoC 级供电
        for &name in soc.supplies {
            if !ops.regulator.exists(name) {
                log::warn!("supply {name} not available");
                continue;
            }
            if let Err(e) = ops.regulator.enable(name) {
                log::warn!("failed to enable supply {name}: {e}");
            }
        }

        log::info!(
            "XUSB padctl: {} lanes, {} ports, sata used by xusb: {}",
            inner.lanes.len(),
            inner.ports.len(),
            inner.sata_used_by_xusb
        );

        Ok(Self {
            inner: Mutex::new(inner),
            ops,
            policy: Policy {
                otg_vbus_alwayson: config.otg_vbus_alwayson,
                pre_a02_silicon: config.pre_a02_silicon,
                cal_timeout_policy: config.cal_timeout_policy,
            },
        })
    }

    pub(crate) fn lock(&self) -> PadctlGuard<'_> {
        PadctlGuard {
            inner: self.inner.lock(),
            ops: &self.ops,
            policy: &self.policy,
        }
    }

    pub(crate) fn ops(&self) -> &PadctlOps {
        &self.ops
    }

    pub fn soc(&self) -> &'static SocConfig {
        self.lock().soc
    }

    pub fn lane(&self, pad: PadKind, index: u8) -> Option<LaneId> {
        self.lock().find_lane(pad, index)
    }

    pub fn port(&self, kind: PortKind, index: u8) -> Option<PortId> {
        self.lock().find_port(kind, index)
    }

    /// 以 lane 为键的 phy 操作句柄
    pub fn phy(&self, lane: LaneId) -> Phy<'_> {
        Phy::new(self, lane)
    }

    pub fn lane_function(&self, lane: LaneId) -> Option<LaneFunction> {
        self.lock().lanes.get(lane).map(|l| l.function)
    }

    pub fn lane_owner(&self, lane: LaneId) -> Option<PortId> {
        self.lock().lanes.get(lane).and_then(|l| l.owning_port)
    }

    pub fn pad_enable_count(&self, kind: PadKind) -> u32 {
        let inner = self.lock();
        inner
            .pad_of_kind(kind)
            .and_then(|id| inner.pads.get(id))
            .map_or(0, |p| p.enable)
    }

    /// 全局使能计数快照
    pub fn enable_count(&self) -> u32 {
        self.lock().enable
    }

    pub fn stats(&self) -> PadctlStats {
        self.lock().stats
    }

    /// 最近一次共享使能中该 PLL 的校准记录
    pub fn calibration_report(&self, pll: PllKind) -> Option<CalibrationReport> {
        self.lock().reports.iter().rev().find(|r| r.pll == pll).cloned()
    }

    /// 共享使能：0→1 时校准 PLL 并释放全局钳位
    pub fn shared_enable(&self) -> Result {
        self.lock().shared_enable()
    }

    /// 共享去使能：N→0 时重新施加全局钳位
    pub fn shared_disable(&self) -> Result {
        self.lock().shared_disable()
    }
}

fn checked_supply(ops: &PadctlOps, supply: Option<String>) -> Option<String> {
    let name = supply?;
    if ops.regulator.exists(&name) {
        Some(name)
    } else {
        log::warn!("supply {name} not available, continuing without it");
        None
    }
}

impl PadctlInner {
    pub fn pad_of_kind(&self, kind: PadKind) -> Option<PadId> {
        self.pads
            .iter()
            .find(|(_, p)| p.kind == kind)
            .map(|(id, _)| id)
    }

    pub fn find_lane(&self, pad: PadKind, index: u8) -> Option<LaneId> {
        let pad = self.pads.get(self.pad_of_kind(pad)?)?;
        pad.lanes
            .iter()
            .copied()
            .find(|&id| self.lanes.get(id).is_some_and(|l| l.index == index))
    }

    pub fn lane_ref(&self, lane: LaneId) -> Result<&Lane> {
        self.lanes
            .get(lane)
            .ok_or_else(|| PadctlError::config("unknown lane"))
    }

    pub fn port_ref(&self, port: PortId) -> Result<&Port> {
        self.ports
            .get(port)
            .ok_or_else(|| PadctlError::config("unknown port"))
    }

    pub fn lane_kind(&self, lane: LaneId) -> Result<PadKind> {
        let lane = self.lane_ref(lane)?;
        self.pads
            .get(lane.pad)
            .map(|p| p.kind)
            .ok_or_else(|| PadctlError::config("lane without pad"))
    }

    fn add_lane(&mut self, cfg: &LaneConfig) -> Result {
        let pad_id = self
            .pad_of_kind(cfg.pad)
            .ok_or_else(|| PadctlError::config("pad not present on this SoC"))?;
        let soc = self
            .soc
            .pad(cfg.pad)
            .and_then(|p| p.lanes.get(cfg.index as usize))
            .ok_or_else(|| PadctlError::config("lane index out of range"))?;
        let mux = soc.mux_value(cfg.function).ok_or_else(|| {
            PadctlError::config(format!("function {} invalid", cfg.function.name()))
        })?;
        if self.find_lane(cfg.pad, cfg.index).is_some() {
            return Err(PadctlError::config("duplicated"));
        }

        self.regs
            .update_bits(soc.offset, soc.mask << soc.shift, mux << soc.shift);

        if cfg.pad == PadKind::Sata && cfg.function == LaneFunction::Xusb {
            self.sata_used_by_xusb = true;
        }

        let id = self.lanes.alloc(Lane {
            soc,
            index: cfg.index,
            pad: pad_id,
            function: cfg.function,
            owning_port: None,
            hs_curr_level_offset: cfg.hs_curr_level_offset,
            hsic: cfg.hsic,
            powered_on: false,
        });
        if let Some(pad) = self.pads.get_mut(pad_id) {
            pad.lanes.push(id);
        }
        log::info!("lane {}: function {}", soc.name, cfg.function.name());
        Ok(())
    }

    fn add_port(&mut self, cfg: &PortConfig, ops: &PadctlOps) -> Result {
        if cfg.index >= self.soc.port_count(cfg.kind) {
            return Err(PadctlError::config("port index out of range"));
        }

        // USB2/HSIC 端口与同号 lane 一一对应，USB3 端口在首次使用时解析
        let lane = match cfg.kind {
            PortKind::Usb2 => Some(PadKind::Usb2),
            PortKind::Hsic => Some(PadKind::Hsic),
            PortKind::Usb3 => None,
        }
        .map(|pad| {
            self.find_lane(pad, cfg.index)
                .ok_or_else(|| PadctlError::config("no lane for port"))
        })
        .transpose()?;

        let id = self.ports.alloc(Port {
            kind: cfg.kind,
            index: cfg.index,
            capability: cfg.capability,
            lane,
            internal: cfg.internal,
            oc_pin: cfg.oc_pin,
            supply: checked_supply(ops, cfg.supply.clone()),
            enable: 0,
        });
        if let Some(lane) = lane.and_then(|l| self.lanes.get_mut(l)) {
            lane.owning_port = Some(id);
        }
        log::info!(
            "port {}-{}: {:?}{}",
            cfg.kind.name(),
            cfg.index,
            cfg.capability,
            if cfg.internal { " (internal)" } else { "" }
        );
        Ok(())
    }
}
