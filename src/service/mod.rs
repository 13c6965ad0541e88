//! CrudService: the five entity operations, validated against the entity schema.

mod crud;
mod validation;
pub use crud::CrudService;
pub use validation::RequestValidator;
