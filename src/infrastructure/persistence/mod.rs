mod repositories;

pub use repositories::InMemoryJobStore;
