//! 单拍控制序列
//!
//! [`ControlCore`] 持有传输层、控制律、发布器和循环状态，执行一拍的固定序列：
//!
//! 1. 归档 current → previous
//! 2. 一次事务：发出上一拍的力矩，读回新的原始位置；负状态码立即返回急停错误
//! 3. 滤波更新位置/速度
//! 4. 控制律计算下一次事务要发出的力矩
//! 5. 发布状态
//! 6. tick 计数加一
//!
//! dt 由调用方（调度器）给出，便于在测试中精确控制。

use crate::control::Controller;
use crate::error::DriverError;
use crate::filter;
use crate::observer::Observer;
use crate::sink::{JointStateMessage, StateSink};
use crate::state::{HandSnapshot, LoopState};
use allegro_can::HandTransport;
use std::time::Duration;
use tracing::trace;

/// 控制循环核心
pub struct ControlCore<T, C, S> {
    transport: T,
    controller: C,
    sink: S,
    state: LoopState,
    ticks: u64,
    observer: Observer,
}

impl<T, C, S> ControlCore<T, C, S>
where
    T: HandTransport,
    C: Controller,
    S: StateSink,
{
    /// 创建核心；传输层须已 open
    pub fn new(transport: T, controller: C, sink: S) -> Self {
        Self {
            transport,
            controller,
            sink,
            state: LoopState::new(),
            ticks: 0,
            observer: Observer::new(),
        }
    }

    /// 预热事务：用全零力矩读回第一帧原始位置，不滤波、不发布
    pub fn prime(&mut self) -> Result<(), DriverError> {
        self.transact()
    }

    /// 执行一拍
    pub fn tick(&mut self, dt: Duration, stamp_us: u64) -> Result<(), DriverError> {
        if dt.is_zero() {
            return Err(DriverError::InvalidDt(dt));
        }
        let dt_s = dt.as_secs_f64();

        self.state.archive();
        self.transact()?;
        filter::update(&mut self.state, dt_s);
        self.controller.compute_desired_torque(&mut self.state);

        let msg = JointStateMessage::from_state(&self.state, self.ticks, stamp_us);
        self.sink.publish(&msg);

        self.ticks += 1;
        self.observer.store(HandSnapshot {
            tick: self.ticks,
            dt: dt_s,
            stamp_us,
            position: self.state.position_filtered,
            velocity: self.state.velocity,
            torque: self.state.torque,
        });
        trace!(tick = self.ticks, dt_s, "tick complete");
        Ok(())
    }

    fn transact(&mut self) -> Result<(), DriverError> {
        let sample = self.transport.transact(&self.state.torque)?;
        if sample.status.is_emergency_stop() {
            return Err(DriverError::EmergencyStop {
                status: sample.status,
                tick: self.ticks,
            });
        }
        self.state.position = sample.position;
        Ok(())
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    /// 已完成的 tick 数
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn observer(&self) -> Observer {
        self.observer.clone()
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub(crate) fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub(crate) fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
