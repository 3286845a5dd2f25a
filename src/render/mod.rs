mod events;
mod renderer;
mod status;
mod viewport;

pub use events::{HoverEvent, HoverHandlers, Tooltip};
pub use renderer::{RenderState, Renderer};
pub use status::{STATUS_TTL, StatusLine};
pub use viewport::Viewport;
