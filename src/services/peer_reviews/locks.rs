use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// 按作业划分的分配锁
///
/// 同一作业的分配轮次串行执行，不同作业互不影响。
pub struct AllocationLocks {
    /// 作业 ID -> 锁
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl AllocationLocks {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            locks: DashMap::with_capacity(capacity),
        }
    }

    /// 等待并持有作业的分配锁，guard 释放时解锁
    pub async fn acquire(&self, assignment_id: i64) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(assignment_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// 已创建锁的作业数
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Default for AllocationLocks {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_assignment_is_serialized() {
        let locks = AllocationLocks::default();
        let guard = locks.acquire(1).await;

        let second = tokio::time::timeout(Duration::from_millis(50), locks.acquire(1)).await;
        assert!(second.is_err());

        drop(guard);
        let third = tokio::time::timeout(Duration::from_millis(50), locks.acquire(1)).await;
        assert!(third.is_ok());
    }

    #[tokio::test]
    async fn test_different_assignments_do_not_block() {
        let locks = AllocationLocks::with_capacity(4);
        let _first = locks.acquire(1).await;
        let other = tokio::time::timeout(Duration::from_millis(50), locks.acquire(2)).await;
        assert!(other.is_ok());
        assert_eq!(locks.len(), 2);
    }
}
