//! 设备状态码
//!
//! 每次 CAN 事务返回一个有符号状态码。负值表示硬件链路丢失或本体已断电（急停），
//! 不可恢复，必须由生命周期管理器终止控制会话。

use std::fmt;

/// 设备事务状态码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceStatus(pub i32);

impl DeviceStatus {
    /// 正常
    pub const OK: DeviceStatus = DeviceStatus(0);

    /// 驱动在本体断电/CAN 断开时返回的状态码
    pub const EMERGENCY_STOP: DeviceStatus = DeviceStatus(-1);

    #[inline]
    pub const fn code(self) -> i32 {
        self.0
    }

    /// 负值即急停
    #[inline]
    pub const fn is_emergency_stop(self) -> bool {
        self.0 < 0
    }
}

impl From<i32> for DeviceStatus {
    fn from(code: i32) -> Self {
        DeviceStatus(code)
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_emergency_stop() {
            write!(f, "{} (emergency stop)", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}
