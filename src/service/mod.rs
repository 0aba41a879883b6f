//! CrudService: generic CRUD using the safe SQL builder, plus relation helpers.

mod crud;
pub mod relations;
pub use crud::CrudService;
