pub mod load;
pub mod save;

pub use self::load::Load;
pub use self::save::Save;
