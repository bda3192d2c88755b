//! 跨 tick 的循环状态
//!
//! 只由控制循环自身修改。"previous" 字段在每次事务之前由 [`LoopState::archive`]
//! 从 "current" 字段复制，因此总是反映上一拍的值。

use allegro_protocol::JointVector;

/// 控制循环状态
///
/// 启动时全部为零：力矩、速度为零，位置在首次（预热）事务后写入 `position`。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoopState {
    /// 当前原始位置（最近一次事务的采样）
    pub position: JointVector,
    /// 上一拍原始位置
    pub previous_position: JointVector,
    /// 当前滤波位置
    pub position_filtered: JointVector,
    /// 上一拍滤波位置
    pub previous_position_filtered: JointVector,
    /// 当前速度：原始位置的有限差分，对外发布
    pub velocity: JointVector,
    /// 上一拍速度
    pub previous_velocity: JointVector,
    /// 滤波速度（每拍计算，但不发布，见 [`crate::filter`]）
    pub velocity_filtered: JointVector,
    /// 力矩命令，由控制律写入，下一次事务发出
    pub torque: JointVector,
}

impl LoopState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 把 current 复制到 previous（每拍事务之前调用）
    #[inline]
    pub fn archive(&mut self) {
        self.previous_position = self.position;
        self.previous_position_filtered = self.position_filtered;
        self.previous_velocity = self.velocity;
    }
}

/// 供诊断线程读取的状态快照
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandSnapshot {
    /// 已完成的 tick 数
    pub tick: u64,
    /// 最近一拍的 dt（秒）
    pub dt: f64,
    /// 最近一拍的时间戳（UNIX 微秒）
    pub stamp_us: u64,
    /// 滤波位置（与发布值一致）
    pub position: JointVector,
    /// 原始位置有限差分
    pub velocity: JointVector,
    /// 本拍算出、下一次事务发出的力矩
    pub torque: JointVector,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_zero() {
        let state = LoopState::new();
        assert!(state.torque.iter().all(|&v| v == 0.0));
        assert!(state.velocity.iter().all(|&v| v == 0.0));
        assert!(state.velocity_filtered.iter().all(|&v| v == 0.0));
        assert!(state.position_filtered.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_archive_copies_current_to_previous() {
        let mut state = LoopState::new();
        state.position = JointVector::splat(1.0);
        state.position_filtered = JointVector::splat(2.0);
        state.velocity = JointVector::splat(3.0);
        state.velocity_filtered = JointVector::splat(4.0);
        state.torque = JointVector::splat(5.0);

        state.archive();

        assert_eq!(state.previous_position, JointVector::splat(1.0));
        assert_eq!(state.previous_position_filtered, JointVector::splat(2.0));
        assert_eq!(state.previous_velocity, JointVector::splat(3.0));
        // 其余字段不受影响
        assert_eq!(state.velocity_filtered, JointVector::splat(4.0));
        assert_eq!(state.torque, JointVector::splat(5.0));
    }
}
