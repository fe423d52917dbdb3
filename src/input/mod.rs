pub mod action;
pub mod drag;
pub mod keymap;
