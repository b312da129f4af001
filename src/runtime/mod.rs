//! 运行时 - 页面组合与主题外壳

mod page;
mod shell;

pub use page::PageComposer;
pub use shell::{ShellState, ThemeShell, CART_DRAWER, MOBILE_MENU};
