pub mod local_vector_repository;

pub use local_vector_repository::LocalVectorRepository;
