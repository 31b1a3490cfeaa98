use anyhow::Context;
use redis::AsyncCommands;

/// Queues the worker fleet consumes. The dashboard only reads their
/// counters; job processing lives in the worker processes.
pub const QUEUE_NAMES: &[&str] = &[
    "auth",
    "user",
    "post",
    "comment",
    "reaction",
    "follower",
    "notification",
    "email",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueCounts {
    pub waiting: i64,
    pub active: i64,
    pub completed: i64,
    pub failed: i64,
}

/// Read-only view over the broker-backed job queues. Connections are opened
/// per request so an unreachable broker degrades the dashboard, not startup.
#[derive(Clone)]
pub struct QueueBoard {
    client: redis::Client,
}

impl QueueBoard {
    pub fn from_url(redis_url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(redis_url).context("redis_open")?;
        Ok(Self { client })
    }

    pub fn contains(name: &str) -> bool {
        QUEUE_NAMES.contains(&name)
    }

    pub async fn counts(&self, name: &str) -> anyhow::Result<QueueCounts> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .context("redis_connect")?;
        let waiting: i64 = conn
            .llen(format!("bull:{name}:wait"))
            .await
            .context("redis_llen_wait")?;
        let active: i64 = conn
            .llen(format!("bull:{name}:active"))
            .await
            .context("redis_llen_active")?;
        let completed: i64 = conn
            .zcard(format!("bull:{name}:completed"))
            .await
            .context("redis_zcard_completed")?;
        let failed: i64 = conn
            .zcard(format!("bull:{name}:failed"))
            .await
            .context("redis_zcard_failed")?;
        Ok(QueueCounts {
            waiting,
            active,
            completed,
            failed,
        })
    }

    pub async fn snapshot(&self) -> anyhow::Result<Vec<(&'static str, QueueCounts)>> {
        let mut out = Vec::with_capacity(QUEUE_NAMES.len());
        for name in QUEUE_NAMES {
            out.push((*name, self.counts(name).await?));
        }
        Ok(out)
    }
}
