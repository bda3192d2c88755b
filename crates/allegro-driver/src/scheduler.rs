//! 周期调度器
//!
//! 固定名义周期驱动控制循环，测量相邻两拍之间的实际时间。
//!
//! - **绝对截止时间**: 下一拍截止时间 = 上一拍截止时间 + 周期，避免累积漂移
//! - **不重叠**: 回调体运行结束后才计算下一次等待
//! - **超时只延后不追赶**: 某一拍超时后立即执行下一拍，随后以该时刻重新对齐，
//!   不会连续补发多拍
//! - **精确定时**: 可选 `spin_sleep` 实现低抖动延时

use crate::DriverError;
use allegro_tools::LoopSettings;
use spin_sleep::SpinSleeper;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::warn;

/// 控制循环配置
#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    /// 控制频率（Hz），参考系统为 1000 Hz
    pub frequency_hz: f64,
    /// open 之后的硬件稳定延时
    pub settle_delay: Duration,
    /// 最大 tick 数（None 表示无限循环）
    pub max_ticks: Option<u64>,
    /// 使用 spin_sleep（更低抖动，更高 CPU 占用）
    pub spin: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        LoopConfig {
            frequency_hz: 1000.0,
            settle_delay: Duration::from_millis(3),
            max_ticks: None,
            spin: true,
        }
    }
}

impl From<&LoopSettings> for LoopConfig {
    fn from(s: &LoopSettings) -> Self {
        LoopConfig {
            frequency_hz: s.frequency_hz,
            settle_delay: Duration::from_millis(s.settle_delay_ms),
            max_ticks: s.max_ticks,
            spin: s.spin,
        }
    }
}

impl LoopConfig {
    /// 名义周期
    pub fn period(&self) -> Result<Duration, DriverError> {
        if !(self.frequency_hz > 0.0) || !self.frequency_hz.is_finite() {
            return Err(DriverError::Config(format!(
                "Invalid frequency_hz: {} (must be > 0)",
                self.frequency_hz
            )));
        }
        if self.frequency_hz > 10000.0 {
            warn!(
                "Very high control frequency: {} Hz. This may cause performance issues.",
                self.frequency_hz
            );
        }
        match Duration::try_from_secs_f64(1.0 / self.frequency_hz) {
            Ok(period) if !period.is_zero() => Ok(period),
            _ => Err(DriverError::Config(format!(
                "Invalid frequency_hz: {} (period not representable)",
                self.frequency_hz
            ))),
        }
    }
}

/// 停止请求句柄
///
/// 外部（如 Ctrl+C 处理器）请求停止；调度器只在两拍之间检查。
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// 周期调度器
pub struct PeriodicScheduler {
    period: Duration,
    sleeper: Option<SpinSleeper>,
    next_deadline: Instant,
    last_tick: Instant,
    overruns: u64,
}

impl PeriodicScheduler {
    pub fn new(config: &LoopConfig) -> Result<Self, DriverError> {
        let period = config.period()?;
        let now = Instant::now();
        Ok(Self {
            period,
            sleeper: config.spin.then(SpinSleeper::default),
            next_deadline: now + period,
            last_tick: now,
            overruns: 0,
        })
    }

    /// (重新)初始化计时：以 `now` 作为上一拍时刻
    pub fn start(&mut self, now: Instant) {
        self.last_tick = now;
        self.next_deadline = now + self.period;
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// 截止时间已过的次数
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// 等待下一拍，返回距上一拍的实际时间
    pub fn wait_next(&mut self) -> Duration {
        let now = Instant::now();
        let late = now > self.next_deadline;

        if late {
            self.overruns += 1;
            if self.overruns == 1 || self.overruns % 1000 == 0 {
                warn!(
                    "Control loop overrun: {:?} past deadline (total overruns: {})",
                    now - self.next_deadline,
                    self.overruns
                );
            }
        } else {
            let remaining = self.next_deadline - now;
            match self.sleeper {
                Some(sleeper) => sleeper.sleep(remaining),
                None => std::thread::sleep(remaining),
            }
        }

        let fired = Instant::now();
        let dt = fired.saturating_duration_since(self.last_tick);
        self.last_tick = fired;
        self.next_deadline = if late {
            fired + self.period
        } else {
            self.next_deadline + self.period
        };
        dt
    }
}
