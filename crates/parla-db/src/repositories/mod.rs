// All repository functions are generic over `E: Executor<'e, Database = Postgres>`
// so they accept both a `&PgPool` (direct query) and a `&mut Transaction` (atomic operations).

pub mod chat;
pub mod exercise;
pub mod learner;
pub mod progress;
pub mod vocabulary;
