//! # Allegro Hand Transport Layer
//!
//! 硬件传输层抽象。控制循环只依赖一个同步、阻塞的"写力矩 + 读关节位置"事务，
//! CAN 帧布局与设备寻址由具体后端负责。
//!
//! - [`HandTransport`]: 传输层 trait（open / transact / close）
//! - [`SimulatedHand`]: 无硬件时使用的一阶关节模型
//! - `mock::MockHandTransport`: 脚本化响应，用于测试（feature `mock`）

use allegro_protocol::{DeviceStatus, JointVector};
use thiserror::Error;

pub mod sim;

#[cfg(feature = "mock")]
pub mod mock;

pub use sim::{SimConfig, SimulatedHand};

#[cfg(feature = "mock")]
pub use mock::{MockHandTransport, MockLog};

/// 传输层统一错误类型
#[derive(Error, Debug)]
pub enum CanError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Device Error: {0}")]
    Device(String),
    #[error("Device not started")]
    NotStarted,
    #[error("Device already closed")]
    Closed,
}

/// 一次事务的结果
///
/// `status` 为负时 `position` 内容无意义（设备已断开）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transaction {
    pub status: DeviceStatus,
    pub position: JointVector,
}

impl Transaction {
    pub fn ok(position: JointVector) -> Self {
        Self {
            status: DeviceStatus::OK,
            position,
        }
    }

    pub fn emergency_stop() -> Self {
        Self {
            status: DeviceStatus::EMERGENCY_STOP,
            position: JointVector::default(),
        }
    }
}

/// 硬件传输 trait
///
/// # 调用约定
///
/// 1. `open()` 一次
/// 2. 由调用方等待硬件稳定（约 3ms）
/// 3. 重复调用 `transact()`；传入的力矩是**上一拍**计算的命令，
///    因为采样先于控制律执行
/// 4. `close()` 一次
///
/// `transact()` 必须阻塞直到事务完成，不允许返回部分结果。
pub trait HandTransport {
    fn open(&mut self) -> Result<(), CanError>;

    fn transact(&mut self, torque: &JointVector) -> Result<Transaction, CanError>;

    fn close(&mut self) -> Result<(), CanError>;
}

impl<T: HandTransport + ?Sized> HandTransport for Box<T> {
    fn open(&mut self) -> Result<(), CanError> {
        (**self).open()
    }

    fn transact(&mut self, torque: &JointVector) -> Result<Transaction, CanError> {
        (**self).transact(torque)
    }

    fn close(&mut self) -> Result<(), CanError> {
        (**self).close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_constructors() {
        let t = Transaction::ok(JointVector::splat(1.0));
        assert_eq!(t.status, DeviceStatus::OK);
        assert_eq!(t.position[3], 1.0);

        let t = Transaction::emergency_stop();
        assert!(t.status.is_emergency_stop());
    }

    #[test]
    fn test_can_error_display() {
        assert_eq!(format!("{}", CanError::NotStarted), "Device not started");
        let msg = format!("{}", CanError::Device("bus off".to_string()));
        assert!(msg.contains("bus off"));
    }
}
