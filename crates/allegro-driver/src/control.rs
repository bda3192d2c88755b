//! Controller trait - 控制律通用接口
//!
//! 控制循环每拍调用一次 [`Controller::compute_desired_torque`]，传入当前滤波后的状态，
//! 控制律把力矩命令写入 [`LoopState::torque`]，由下一次事务发出。
//!
//! # 约定
//!
//! - 必须在一个控制周期内返回
//! - 不得自行访问硬件（IO 只由控制循环经传输层完成）
//! - 只应写 `torque` 字段；其余字段是本拍的测量结果
//!
//! # 示例
//!
//! ```rust
//! use allegro_driver::{Controller, LoopState};
//!
//! /// 把所有关节推向零位的弹簧
//! struct Spring {
//!     k: f64,
//! }
//!
//! impl Controller for Spring {
//!     fn compute_desired_torque(&mut self, state: &mut LoopState) {
//!         state.torque = state.position_filtered.map(|q| -self.k * q);
//!     }
//! }
//! ```

use crate::state::LoopState;
use allegro_protocol::JointVector;

/// 控制律通用接口
///
/// `Controller` 本身不要求 `Send`；控制循环是单线程的。
pub trait Controller {
    /// 计算力矩命令并写入 `state.torque`
    fn compute_desired_torque(&mut self, state: &mut LoopState);

    /// 控制律名称（用于日志）
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<C: Controller + ?Sized> Controller for Box<C> {
    fn compute_desired_torque(&mut self, state: &mut LoopState) {
        (**self).compute_desired_torque(state)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// 零力矩控制律（被动手）
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroTorque;

impl Controller for ZeroTorque {
    fn compute_desired_torque(&mut self, state: &mut LoopState) {
        state.torque = JointVector::default();
    }

    fn name(&self) -> &'static str {
        "zero"
    }
}

/// 固定目标的关节 PD
///
/// ```text
/// torque = clamp(kp * (setpoint - position) - kd * velocity, ±max_torque)
/// ```
///
/// 未指定目标时，在第一次调用时锁存当前原始位置作为目标（保持姿态）。
/// 误差与锁存使用同一信号（原始位置）：滤波位置从零起步且稳态只有原始值的 0.99 倍，
/// 用它计算误差会在启动时产生力矩冲击并留下静差。
#[derive(Debug, Clone)]
pub struct JointPd {
    setpoint: Option<JointVector>,
    kp: f64,
    kd: f64,
    max_torque: f64,
}

impl JointPd {
    /// 默认参数：kp = 1.0, kd = 0.05, 力矩限幅 0.7
    pub fn new() -> Self {
        Self {
            setpoint: None,
            kp: 1.0,
            kd: 0.05,
            max_torque: 0.7,
        }
    }

    pub fn with_setpoint(mut self, setpoint: JointVector) -> Self {
        self.setpoint = Some(setpoint);
        self
    }

    pub fn with_gains(mut self, kp: f64, kd: f64) -> Self {
        self.kp = kp;
        self.kd = kd;
        self
    }

    pub fn with_max_torque(mut self, max_torque: f64) -> Self {
        self.max_torque = max_torque.abs();
        self
    }

    /// 当前目标（尚未锁存时为 None）
    pub fn setpoint(&self) -> Option<&JointVector> {
        self.setpoint.as_ref()
    }
}

impl Default for JointPd {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for JointPd {
    fn compute_desired_torque(&mut self, state: &mut LoopState) {
        let setpoint = *self.setpoint.get_or_insert(state.position);
        let (kp, kd, limit) = (self.kp, self.kd, self.max_torque);

        let error = setpoint.map_with(state.position, |sp, q| sp - q);
        state.torque = error.map_with(state.velocity, |e, v| (kp * e - kd * v).clamp(-limit, limit));
    }

    fn name(&self) -> &'static str {
        "pd"
    }
}
