//! Text generator implementations

mod anthropic;

pub use anthropic::AnthropicGenerator;
