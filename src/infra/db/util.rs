use crate::application::repos::StoreError;

pub fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut => StoreError::Timeout,
        sqlx::Error::Io(io) => StoreError::Transport(io.to_string()),
        sqlx::Error::Tls(tls) => StoreError::Transport(tls.to_string()),
        sqlx::Error::PoolClosed => StoreError::Transport("connection pool is closed".to_string()),
        sqlx::Error::Configuration(config) => StoreError::Transport(config.to_string()),
        sqlx::Error::Database(db)
            if db
                .message()
                .contains("canceling statement due to statement timeout") =>
        {
            StoreError::Timeout
        }
        sqlx::Error::Database(db) => StoreError::Query(db.message().to_string()),
        err @ (sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_)) => StoreError::Decode(err.to_string()),
        other => StoreError::Query(other.to_string()),
    }
}
