pub mod view;

pub use view::View;
