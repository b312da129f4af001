//! 区块渲染器 - 将区块树与数据上下文渲染为渲染树

mod block_renderer;
pub mod components;
pub mod node;
mod state;
pub mod style_resolver;

pub use block_renderer::{BlockRenderer, DRAWER_KEY};
pub use node::RenderNode;
pub use state::ViewState;
pub use style_resolver::{StyleMap, StyleResolver};
