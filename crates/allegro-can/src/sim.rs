//! 仿真手
//!
//! 无硬件时的替代后端：每个关节是一个阻尼惯性环节，力矩积分得到速度，速度积分得到位置。
//! 每次事务推进固定仿真步长，与真实时间无关，结果可复现。

use crate::{CanError, HandTransport, Transaction};
use allegro_protocol::{DOF_JOINTS, DeviceStatus, JointVector};
use tracing::{debug, info, warn};

/// 仿真参数
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// 每次事务推进的仿真时间（秒）
    pub step_s: f64,
    /// 关节等效惯量
    pub inertia: f64,
    /// 粘滞阻尼系数
    pub damping: f64,
    /// 初始关节位置（rad）
    pub initial_position: JointVector,
    /// 在第 N 次事务时模拟断电（返回负状态码）
    pub power_off_after: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            step_s: 0.001,
            inertia: 0.01,
            damping: 0.5,
            initial_position: JointVector::default(),
            power_off_after: None,
        }
    }
}

/// 仿真 Allegro Hand
pub struct SimulatedHand {
    config: SimConfig,
    position: JointVector,
    velocity: JointVector,
    transactions: u64,
    opened: bool,
}

impl SimulatedHand {
    pub fn new(config: SimConfig) -> Self {
        let position = config.initial_position;
        Self {
            config,
            position,
            velocity: JointVector::default(),
            transactions: 0,
            opened: false,
        }
    }

    /// 已完成的事务数
    pub fn transactions(&self) -> u64 {
        self.transactions
    }

    fn integrate(&mut self, torque: &JointVector) {
        let h = self.config.step_s;
        for i in 0..DOF_JOINTS {
            let accel = (torque[i] - self.config.damping * self.velocity[i]) / self.config.inertia;
            self.velocity[i] += accel * h;
            self.position[i] += self.velocity[i] * h;
        }
    }
}

impl Default for SimulatedHand {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl HandTransport for SimulatedHand {
    fn open(&mut self) -> Result<(), CanError> {
        if self.config.inertia <= 0.0 || self.config.step_s <= 0.0 {
            return Err(CanError::Device(format!(
                "invalid simulation parameters: inertia={}, step_s={}",
                self.config.inertia, self.config.step_s
            )));
        }
        self.opened = true;
        info!("Simulated Allegro Hand opened");
        Ok(())
    }

    fn transact(&mut self, torque: &JointVector) -> Result<Transaction, CanError> {
        if !self.opened {
            return Err(CanError::NotStarted);
        }
        self.transactions += 1;

        if let Some(limit) = self.config.power_off_after
            && self.transactions > limit
        {
            warn!("Simulated hand powered off after {} transactions", limit);
            return Ok(Transaction {
                status: DeviceStatus::EMERGENCY_STOP,
                position: self.position,
            });
        }

        self.integrate(torque);
        Ok(Transaction::ok(self.position))
    }

    fn close(&mut self) -> Result<(), CanError> {
        if !self.opened {
            return Err(CanError::Closed);
        }
        self.opened = false;
        debug!("Simulated hand closed after {} transactions", self.transactions);
        Ok(())
    }
}
