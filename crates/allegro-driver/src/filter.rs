//! 低通滤波与速度估计
//!
//! 每个关节：
//!
//! ```text
//! filtered'       = A*filtered + B*prev_raw + B*raw
//! v_from_filtered = (filtered' - prev_filtered) / dt
//! vel_filtered'   = A*vel_filtered + B*prev_vel + B*v_from_filtered
//! velocity        = (raw - prev_raw) / dt
//! ```
//!
//! 系数之和 `A + 2B = 0.996`，不等于 1，滤波值会缓慢向零偏移。这是固定常数，不做修正。
//!
//! 发布的速度是原始位置的有限差分；`vel_filtered` 每拍都会计算并保存在
//! [`LoopState::velocity_filtered`]，但不参与发布。保留这一计算顺序，
//! 下游若依赖该字段仍可读取。
//!
//! `dt <= 0` 不在这里处理，由 [`crate::ControlCore::tick`] 拒绝。

use crate::state::LoopState;
use allegro_protocol::DOF_JOINTS;

/// 上一拍滤波值的权重
pub const A: f64 = 0.6;
/// 每个原始样本的权重
pub const B: f64 = 0.198;

/// 单关节滤波位置更新
#[inline]
pub fn filter_position(filtered: f64, previous_raw: f64, raw: f64) -> f64 {
    A * filtered + B * previous_raw + B * raw
}

/// 用刚采样的原始位置和已归档的上一拍值更新滤波位置与速度
pub fn update(state: &mut LoopState, dt: f64) {
    debug_assert!(dt > 0.0, "dt must be positive, got {}", dt);

    for i in 0..DOF_JOINTS {
        state.position_filtered[i] = filter_position(
            state.position_filtered[i],
            state.previous_position[i],
            state.position[i],
        );
        let velocity_from_filtered =
            (state.position_filtered[i] - state.previous_position_filtered[i]) / dt;
        state.velocity_filtered[i] = A * state.velocity_filtered[i]
            + B * state.previous_velocity[i]
            + B * velocity_from_filtered;
        state.velocity[i] = (state.position[i] - state.previous_position[i]) / dt;
    }
}
