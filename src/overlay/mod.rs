pub mod cell;
pub mod detail;
pub mod reducer;

pub use cell::{OverlayCell, OverlayHandle};
pub use detail::DetailCell;
pub use reducer::reduce;
