//! 互评通知
//!
//! 通知投递由外部系统负责，这里只定义三个单向调用。
//! 调用失败只记录日志，不影响触发它的分配、评审或评分操作。

use std::future::Future;

use tracing::{info, warn};

use crate::errors::Result;

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// 新的评审任务已分配给评审人
    async fn notify_reviewer_assigned(&self, reviewer_id: i64, submission_id: i64) -> Result<()>;

    /// 作者收到一份完成的评审
    async fn notify_review_received(&self, student_id: i64, submission_id: i64) -> Result<()>;

    /// 教师已评分
    async fn notify_graded(
        &self,
        student_id: i64,
        submission_id: i64,
        final_score: f64,
    ) -> Result<()>;
}

/// 默认实现：只写日志
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

#[async_trait::async_trait]
impl Notifier for TracingNotifier {
    async fn notify_reviewer_assigned(&self, reviewer_id: i64, submission_id: i64) -> Result<()> {
        info!("通知评审人 {} 评审提交 {}", reviewer_id, submission_id);
        Ok(())
    }

    async fn notify_review_received(&self, student_id: i64, submission_id: i64) -> Result<()> {
        info!("通知学生 {} 提交 {} 收到新评审", student_id, submission_id);
        Ok(())
    }

    async fn notify_graded(
        &self,
        student_id: i64,
        submission_id: i64,
        final_score: f64,
    ) -> Result<()> {
        info!(
            "通知学生 {} 提交 {} 已评分，最终成绩 {}",
            student_id, submission_id, final_score
        );
        Ok(())
    }
}

/// 发送通知，失败时记录 warn 并忽略
pub(crate) async fn deliver<F>(kind: &str, notification: F)
where
    F: Future<Output = Result<()>>,
{
    if let Err(e) = notification.await {
        warn!("{} 通知发送失败: {}", kind, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PeerReviewError;

    #[tokio::test]
    async fn test_deliver_swallows_errors() {
        deliver("reviewer_assigned", async {
            Err::<(), _>(PeerReviewError::file_operation("mail server down"))
        })
        .await;
        deliver("graded", TracingNotifier.notify_graded(1, 2, 84.0)).await;
    }
}
