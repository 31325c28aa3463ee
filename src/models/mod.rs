pub mod notification;
pub mod rate;

pub use notification::*;
pub use rate::*;
