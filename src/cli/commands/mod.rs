pub mod migration;
pub mod option;

pub use migration::migration_command;
pub use option::option_command;
