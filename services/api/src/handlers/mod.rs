//! REST API handlers

pub mod favorites;
pub mod health;
pub mod restaurants;
pub mod session;
pub mod status;
pub mod users;
pub mod visits;

pub use favorites::*;
pub use health::*;
pub use restaurants::*;
pub use session::*;
pub use status::*;
pub use users::*;
pub use visits::*;
