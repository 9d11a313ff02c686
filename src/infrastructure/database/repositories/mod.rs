pub mod postgres_vector_repository;

pub use postgres_vector_repository::PostgresVectorRepository;
