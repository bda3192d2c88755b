//! 驱动层错误类型定义

use allegro_can::CanError;
use allegro_protocol::DeviceStatus;
use std::time::Duration;
use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 传输层错误（链路 IO 失败，与急停同等处理）
    #[error("Transport error: {0}")]
    Transport(#[from] CanError),

    /// 事务返回负状态码：本体断电或 CAN 断开，不可恢复
    #[error("Emergency stop: device status {status} at tick {tick}")]
    EmergencyStop { status: DeviceStatus, tick: u64 },

    /// 调度器给出的 dt 不为正（时钟/环境缺陷）
    #[error("Non-positive loop dt: {0:?}")]
    InvalidDt(Duration),

    /// 无效配置
    #[error("Config error: {0}")]
    Config(String),

    /// 节点已关闭
    #[error("Node already shut down")]
    ShutDown,
}

impl DriverError {
    /// 是否为急停
    pub fn is_emergency_stop(&self) -> bool {
        matches!(self, DriverError::EmergencyStop { .. })
    }
}
