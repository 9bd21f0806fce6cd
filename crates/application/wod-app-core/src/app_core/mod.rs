pub mod commands;
pub mod events;
pub mod reducer;

pub use commands::BoardCommand;
pub use events::BoardEvent;
pub use reducer::reduce;
