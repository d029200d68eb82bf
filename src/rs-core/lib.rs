use wasm_bindgen::prelude::*;

mod back_buffer;
mod bindings;
pub mod dispatcher;
mod media_element;
mod utils;

pub use utils::logger::Logger;
