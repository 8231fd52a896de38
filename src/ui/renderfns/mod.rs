pub mod footer;
pub mod header;
pub mod utils;

pub use footer::{draw_footer, FooterMode};
pub use header::draw_header;
pub use utils::{state_color, truncate};
