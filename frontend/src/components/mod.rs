pub mod map_component;
pub mod panel;
