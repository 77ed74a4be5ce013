pub mod board;
pub mod image;
pub mod stylist;
pub mod tryon;

pub use self::board::*;
pub use self::image::*;
pub use self::stylist::*;
pub use self::tryon::*;
