//! @ai:module:intent Paginated PDF assembly from narrative text, tables and chart
//! @ai:module:layer infrastructure
//! @ai:module:public_api DocumentRenderer, Line, classify_line

pub mod markup;
pub mod renderer;

pub use markup::{classify_line, classify_narrative, Line, PREAMBLE_SENTINEL};
pub use renderer::DocumentRenderer;
