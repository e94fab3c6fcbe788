pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::InMemoryMovieStore;
pub use postgres::{create_pool, run_migrations, PgMovieStore};
pub use store::MovieStore;

#[cfg(test)]
pub use store::MockMovieStore;
