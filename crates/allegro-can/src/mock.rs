//! Mock 传输层
//!
//! 按脚本返回事务结果，并把收到的力矩命令、open/close 调用记录到共享日志，
//! 以便在控制节点接管传输层所有权之后仍能检查。

use crate::{CanError, HandTransport, Transaction};
use allegro_protocol::{DeviceStatus, JointVector};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Mock 调用日志
#[derive(Debug, Default, Clone)]
pub struct MockLog {
    pub open_calls: usize,
    pub close_calls: usize,
    /// 每次 transact 收到的力矩（按调用顺序）
    pub torques: Vec<JointVector>,
}

/// 脚本化 Mock 传输层
pub struct MockHandTransport {
    script: VecDeque<Transaction>,
    /// 脚本耗尽后重复返回的样本
    last: Transaction,
    fail_open: bool,
    opened: bool,
    log: Arc<Mutex<MockLog>>,
}

impl MockHandTransport {
    pub fn new(script: impl IntoIterator<Item = Transaction>) -> Self {
        Self {
            script: script.into_iter().collect(),
            last: Transaction::ok(JointVector::default()),
            fail_open: false,
            opened: false,
            log: Arc::new(Mutex::new(MockLog::default())),
        }
    }

    /// 所有事务均返回 OK 的位置序列
    pub fn from_positions(positions: impl IntoIterator<Item = JointVector>) -> Self {
        Self::new(positions.into_iter().map(Transaction::ok))
    }

    /// 在脚本末尾追加一个指定状态码的事务（负值即急停）
    pub fn then_status(mut self, status: DeviceStatus) -> Self {
        self.script.push_back(Transaction {
            status,
            position: JointVector::default(),
        });
        self
    }

    /// 模拟 open 失败
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// 共享日志句柄
    pub fn log(&self) -> Arc<Mutex<MockLog>> {
        Arc::clone(&self.log)
    }

    fn log_mut(&self) -> MutexGuard<'_, MockLog> {
        self.log.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl HandTransport for MockHandTransport {
    fn open(&mut self) -> Result<(), CanError> {
        self.log_mut().open_calls += 1;
        if self.fail_open {
            return Err(CanError::Device("mock open failure".to_string()));
        }
        self.opened = true;
        Ok(())
    }

    fn transact(&mut self, torque: &JointVector) -> Result<Transaction, CanError> {
        if !self.opened {
            return Err(CanError::NotStarted);
        }
        self.log_mut().torques.push(*torque);

        match self.script.pop_front() {
            Some(t) => {
                if !t.status.is_emergency_stop() {
                    self.last = t;
                }
                Ok(t)
            },
            None => Ok(self.last),
        }
    }

    fn close(&mut self) -> Result<(), CanError> {
        self.log_mut().close_calls += 1;
        self.opened = false;
        Ok(())
    }
}
