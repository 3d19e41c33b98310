//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod allocation;
mod assignments;
mod grades;
mod peer_reviews;
mod submissions;
#[cfg(test)]
mod test_utils;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{PeerReviewError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

const SQLITE_MEMORY_URL: &str = "sqlite::memory:";

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 使用全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(&config.database).await
    }

    /// 按给定数据库配置连接并执行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| PeerReviewError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url == SQLITE_MEMORY_URL;

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| PeerReviewError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");
        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .pragma("mmap_size", "536870912")
                .pragma("wal_autocheckpoint", "1000");
        }

        // 内存库的每个连接都是独立的库，只能保留唯一一个常驻连接
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .acquire_timeout(Duration::from_secs(config.timeout))
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.pool_size)
                .min_connections(1)
                .test_before_acquire(true)
                .acquire_timeout(Duration::from_secs(config.timeout))
                .idle_timeout(Duration::from_secs(300))
        }
        .connect_with(opt)
        .await
        .map_err(|e| PeerReviewError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| PeerReviewError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url == ":memory:" || url == SQLITE_MEMORY_URL {
            Ok(SQLITE_MEMORY_URL.to_string())
        } else if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(PeerReviewError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::domain::lifecycle::SubmitAction;
use crate::models::{
    assignments::{
        entities::{Assignment, AssignmentStatus},
        requests::CreateAssignmentRequest,
    },
    peer_reviews::{entities::PeerReview, responses::AllocationOutcome},
    submissions::entities::Submission,
};
use crate::storage::{ReviewCompletion, Storage};
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 作业模块
    async fn create_assignment(
        &self,
        instructor_id: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.create_assignment_impl(instructor_id, req).await
    }

    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(assignment_id).await
    }

    async fn update_assignment_status(
        &self,
        assignment_id: i64,
        expected: AssignmentStatus,
        status: AssignmentStatus,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_status_impl(assignment_id, expected, status)
            .await
    }

    // 提交模块
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(submission_id).await
    }

    async fn get_submission_by_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_submission_by_student_impl(assignment_id, student_id)
            .await
    }

    async fn list_assignment_submissions(&self, assignment_id: i64) -> Result<Vec<Submission>> {
        self.list_assignment_submissions_impl(assignment_id).await
    }

    async fn write_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        content: String,
        action: SubmitAction,
    ) -> Result<Option<Submission>> {
        self.write_submission_impl(assignment_id, student_id, content, action)
            .await
    }

    async fn count_completed_reviews(&self, submission_id: i64) -> Result<u64> {
        self.count_completed_reviews_impl(submission_id).await
    }

    // 分配模块
    async fn allocate_reviewers(&self, assignment_id: i64) -> Result<AllocationOutcome> {
        self.allocate_reviewers_impl(assignment_id).await
    }

    // 评审模块
    async fn get_peer_review_by_id(&self, review_id: i64) -> Result<Option<PeerReview>> {
        self.get_peer_review_by_id_impl(review_id).await
    }

    async fn list_submission_reviews(&self, submission_id: i64) -> Result<Vec<PeerReview>> {
        self.list_submission_reviews_impl(submission_id).await
    }

    async fn list_reviewer_reviews(
        &self,
        assignment_id: i64,
        reviewer_id: i64,
    ) -> Result<Vec<PeerReview>> {
        self.list_reviewer_reviews_impl(assignment_id, reviewer_id)
            .await
    }

    async fn list_assignment_reviews(&self, assignment_id: i64) -> Result<Vec<PeerReview>> {
        self.list_assignment_reviews_impl(assignment_id).await
    }

    async fn complete_review(
        &self,
        review_id: i64,
        completion: ReviewCompletion,
    ) -> Result<(PeerReview, Submission)> {
        self.complete_review_impl(review_id, completion).await
    }

    async fn set_helpfulness_rating(
        &self,
        review_id: i64,
        rating: i32,
    ) -> Result<Option<PeerReview>> {
        self.set_helpfulness_rating_impl(review_id, rating).await
    }

    // 评分模块
    async fn record_instructor_grade(
        &self,
        submission_id: i64,
        score: f64,
        feedback: Option<String>,
    ) -> Result<Submission> {
        self.record_instructor_grade_impl(submission_id, score, feedback)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            SQLITE_MEMORY_URL
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("peer_review.db").unwrap(),
            "sqlite://peer_review.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/pr").unwrap(),
            "postgres://u:p@localhost/pr"
        );
        assert!(SeaOrmStorage::build_database_url("redis://localhost").is_err());
    }
}
