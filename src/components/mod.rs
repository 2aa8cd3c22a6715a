pub mod command_line;
pub mod output;
pub mod status_bar;
pub mod tree;
