//! 生命周期管理
//!
//! [`AllegroNode`] 负责启动顺序、急停检测与关闭：
//!
//! - **启动**: 读取手部身份 → open 传输层 → 等待硬件稳定 → 预热事务 → 初始化计时
//! - **运行**: 周期调度，直到外部停止请求、达到 `max_ticks` 或急停
//! - **关闭**: 关闭发布器与传输层，恰好一次；`Drop` 兜底
//!
//! 急停是唯一会传播到进程级终止的条件：[`AllegroNode::run`] 返回
//! [`DriverError::EmergencyStop`]，由调用方决定退出码。
//!
//! # 示例
//!
//! ```rust,no_run
//! use allegro_can::SimulatedHand;
//! use allegro_driver::{AllegroNode, LoopConfig, TracingSink, ZeroTorque};
//!
//! # fn main() -> Result<(), allegro_driver::DriverError> {
//! let mut node = AllegroNode::builder(
//!     SimulatedHand::default(),
//!     ZeroTorque,
//!     TracingSink::new("allegroHand/joint_states"),
//! )
//! .loop_config(LoopConfig {
//!     max_ticks: Some(1000),
//!     ..Default::default()
//! })
//! .start()?;
//!
//! let summary = node.run()?;
//! println!("ran {} ticks", summary.ticks);
//! # Ok(())
//! # }
//! ```

use crate::control::Controller;
use crate::control_loop::ControlCore;
use crate::error::DriverError;
use crate::observer::Observer;
use crate::scheduler::{LoopConfig, PeriodicScheduler, StopHandle};
use crate::sink::StateSink;
use crate::state::LoopState;
use allegro_can::HandTransport;
use allegro_protocol::{DOF_JOINTS, JOINT_NAMES};
use allegro_tools::{ConfigSource, HandInfo};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{error, info, warn};

/// 循环结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// 外部停止请求
    Requested,
    /// 达到 `max_ticks`
    MaxTicks,
}

/// 运行摘要
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub overruns: u64,
    pub reason: StopReason,
}

/// Allegro Hand 节点 Builder
pub struct AllegroNodeBuilder<T, C, S> {
    transport: T,
    controller: C,
    sink: S,
    loop_config: LoopConfig,
    hand_info: HandInfo,
    stop: StopHandle,
}

impl<T, C, S> AllegroNodeBuilder<T, C, S>
where
    T: HandTransport,
    C: Controller,
    S: StateSink,
{
    pub fn new(transport: T, controller: C, sink: S) -> Self {
        Self {
            transport,
            controller,
            sink,
            loop_config: LoopConfig::default(),
            hand_info: HandInfo::default(),
            stop: StopHandle::new(),
        }
    }

    /// 设置循环配置（可选，默认 1 kHz）
    pub fn loop_config(mut self, config: LoopConfig) -> Self {
        self.loop_config = config;
        self
    }

    /// 从配置源读取手部身份（缺失的键保持默认值）
    pub fn config_source(mut self, source: &dyn ConfigSource) -> Self {
        self.hand_info = HandInfo::load(source);
        self
    }

    /// 直接指定手部身份
    pub fn hand_info(mut self, info: HandInfo) -> Self {
        self.hand_info = info;
        self
    }

    /// 使用外部停止句柄（如与 Ctrl+C 处理器共享）
    pub fn stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    /// 启动节点
    ///
    /// 失败时已打开的传输层会被关闭。
    pub fn start(self) -> Result<AllegroNode<T, C, S>, DriverError> {
        let scheduler = PeriodicScheduler::new(&self.loop_config)?;

        let mut transport = self.transport;
        transport.open()?;

        let mut node = AllegroNode {
            core: ControlCore::new(transport, self.controller, self.sink),
            scheduler,
            config: self.loop_config,
            hand_info: self.hand_info,
            stop: self.stop,
            closed: false,
        };

        std::thread::sleep(node.config.settle_delay);

        if let Err(e) = node.core.prime() {
            if e.is_emergency_stop() {
                error!("Allegro Hand node is shutting down (emergency stop): {}", e);
            } else {
                error!("Failed to prime Allegro Hand: {}", e);
            }
            if let Err(close_err) = node.shutdown() {
                warn!("Error while closing transport: {}", close_err);
            }
            return Err(e);
        }

        node.scheduler.start(Instant::now());
        info!(
            robot_name = %node.hand_info.robot_name,
            which_hand = %node.hand_info.which_hand,
            serial = %node.hand_info.serial,
            controller = node.core.controller().name(),
            topic = node.core.sink().topic(),
            "Allegro Hand node started at {} Hz",
            node.config.frequency_hz
        );
        Ok(node)
    }
}

/// Allegro Hand 控制节点
pub struct AllegroNode<T, C, S>
where
    T: HandTransport,
    C: Controller,
    S: StateSink,
{
    core: ControlCore<T, C, S>,
    scheduler: PeriodicScheduler,
    config: LoopConfig,
    hand_info: HandInfo,
    stop: StopHandle,
    closed: bool,
}

impl<T, C, S> AllegroNode<T, C, S>
where
    T: HandTransport,
    C: Controller,
    S: StateSink,
{
    pub fn builder(transport: T, controller: C, sink: S) -> AllegroNodeBuilder<T, C, S> {
        AllegroNodeBuilder::new(transport, controller, sink)
    }

    /// 运行控制循环（阻塞）
    ///
    /// 返回：
    /// - `Ok(summary)`: 外部停止或达到 `max_ticks`
    /// - `Err(DriverError::EmergencyStop)`: 设备返回负状态码，本拍及之后不再发布任何消息
    /// - `Err(..)`: 传输层错误或 dt 异常，同样终止
    ///
    /// 无论哪种情况，返回前传输层都已关闭。
    pub fn run(&mut self) -> Result<RunSummary, DriverError> {
        if self.closed {
            return Err(DriverError::ShutDown);
        }

        // 设置线程优先级（可选 feature）
        #[cfg(feature = "realtime")]
        {
            use thread_priority::*;

            match set_current_thread_priority(ThreadPriority::Max) {
                Ok(_) => {
                    info!("Control thread priority set to MAX (realtime)");
                },
                Err(e) => {
                    warn!(
                        "Failed to set control thread priority: {:?}. \
                        On Linux, you may need to run with CAP_SYS_NICE or use rtkit.",
                        e
                    );
                },
            }
        }

        // 第一拍的 dt 以循环开始时刻为基准
        self.scheduler.start(Instant::now());

        let reason = loop {
            if self.stop.is_stop_requested() {
                break StopReason::Requested;
            }
            if let Some(max) = self.config.max_ticks
                && self.core.ticks() >= max
            {
                break StopReason::MaxTicks;
            }

            let dt = self.scheduler.wait_next();
            if let Err(e) = self.core.tick(dt, unix_micros()) {
                match &e {
                    DriverError::EmergencyStop { .. } | DriverError::Transport(_) => {
                        error!("Allegro Hand node is shutting down (emergency stop): {}", e);
                    },
                    _ => error!("Control loop aborted: {}", e),
                }
                if let Err(close_err) = self.shutdown() {
                    warn!("Error while closing transport: {}", close_err);
                }
                return Err(e);
            }
        };

        let summary = RunSummary {
            ticks: self.core.ticks(),
            overruns: self.scheduler.overruns(),
            reason,
        };
        self.shutdown()?;
        info!(
            ticks = summary.ticks,
            overruns = summary.overruns,
            "Allegro Hand node stopped ({:?})",
            summary.reason
        );
        Ok(summary)
    }

    /// 关闭发布器与传输层（幂等）
    pub fn shutdown(&mut self) -> Result<(), DriverError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.core.sink_mut().shutdown();
        self.core.transport_mut().close()?;
        info!("Allegro Hand transport closed");
        Ok(())
    }

    pub fn is_shut_down(&self) -> bool {
        self.closed
    }

    pub fn hand_info(&self) -> &HandInfo {
        &self.hand_info
    }

    pub fn joint_names(&self) -> &'static [&'static str; DOF_JOINTS] {
        &JOINT_NAMES
    }

    pub fn state(&self) -> &LoopState {
        self.core.state()
    }

    pub fn ticks(&self) -> u64 {
        self.core.ticks()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn observer(&self) -> Observer {
        self.core.observer()
    }
}

impl<T, C, S> Drop for AllegroNode<T, C, S>
where
    T: HandTransport,
    C: Controller,
    S: StateSink,
{
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("Error while closing transport on drop: {}", e);
        }
    }
}

fn unix_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}
