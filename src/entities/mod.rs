//! Entity module - `SeaORM` entity definitions for the database.

pub mod stored_state;

pub use stored_state::Entity as StoredState;
