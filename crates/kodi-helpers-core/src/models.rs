mod display;

pub use display::{DisplayState, MediaType};
