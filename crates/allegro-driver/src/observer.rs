//! 诊断读取接口
//!
//! 控制循环每拍结束时把状态快照复制进共享槽；其他线程通过 [`Observer`] 读取。
//! 锁只在复制期间持有，绝不跨越事务。

use crate::state::HandSnapshot;
use parking_lot::Mutex;
use std::sync::Arc;

/// 状态观察器（可克隆，跨线程共享）
#[derive(Debug, Clone, Default)]
pub struct Observer {
    slot: Arc<Mutex<HandSnapshot>>,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取最新快照
    pub fn snapshot(&self) -> HandSnapshot {
        *self.slot.lock()
    }

    /// 已完成的 tick 数
    pub fn tick(&self) -> u64 {
        self.slot.lock().tick
    }

    pub(crate) fn store(&self, snapshot: HandSnapshot) {
        *self.slot.lock() = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allegro_protocol::JointVector;
    use std::thread;

    #[test]
    fn test_initial_snapshot_is_zero() {
        let observer = Observer::new();
        assert_eq!(observer.snapshot(), HandSnapshot::default());
        assert_eq!(observer.tick(), 0);
    }

    #[test]
    fn test_snapshot_visible_across_threads() {
        let observer = Observer::new();
        let writer = observer.clone();

        thread::spawn(move || {
            writer.store(HandSnapshot {
                tick: 7,
                torque: JointVector::splat(0.1),
                ..Default::default()
            });
        })
        .join()
        .unwrap();

        let snap = observer.snapshot();
        assert_eq!(snap.tick, 7);
        assert_eq!(snap.torque, JointVector::splat(0.1));
    }
}
