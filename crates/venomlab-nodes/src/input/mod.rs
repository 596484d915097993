//! Input nodes

mod shellcode_input;

pub use shellcode_input::ShellcodeInputNode;
