mod data;
mod event;
mod integration;
mod property;
mod slot;

pub use self::data::*;
pub use self::event::*;
pub use self::integration::*;
pub use self::property::*;
pub use self::slot::*;
