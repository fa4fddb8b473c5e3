mod comment;
mod reaction;
mod user;

pub use comment::*;
pub use reaction::*;
pub use user::*;
