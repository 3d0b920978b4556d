use schedcore_shared::State;

/// Shared axum state: the read/write-split evento executor plus both pools,
/// handed straight to `schedcore_shared::State` for each domain crate's
/// `Command<E>` (§10.4).
pub type AppState = State<evento::sql::RwSqlite>;
