pub mod compositor;
pub mod content;
pub mod dice;
pub mod generator;
pub mod naming;
pub mod template;
