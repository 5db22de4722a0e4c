//! Shared constants for liftlog.

/// Maximum number of rows any list query may return.
pub const MAX_QUERY_LIMIT: usize = 500;

/// Default page size when the caller does not specify a limit.
pub const DEFAULT_QUERY_LIMIT: usize = 50;

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 10;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Inclusive bounds for rate of perceived exertion.
pub const RPE_MIN: u8 = 1;
pub const RPE_MAX: u8 = 10;

/// Largest accepted reps, set number, target or order value (PostgreSQL `INTEGER`).
pub const MAX_COUNT_VALUE: i64 = 2_147_483_647;

/// Minutes budgeted per prescribed set (work + rest) when estimating routine length.
pub const ESTIMATED_MINUTES_PER_SET: u32 = 3;

/// Longest accepted routine name.
pub const MAX_NAME_LEN: usize = 200;

/// Number of sessions shown in the dashboard's recent list.
pub const DASHBOARD_RECENT_COUNT: usize = 5;

/// Default HTTP header carrying the acting owner id.
pub const DEFAULT_OWNER_HEADER: &str = "x-liftlog-owner";

/// Owner used when no identity is supplied (single-user deployments).
pub const DEFAULT_OWNER: &str = "local";

pub const DEFAULT_HTTP_PORT: u16 = 38080;
