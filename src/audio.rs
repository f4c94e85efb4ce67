mod element;
mod fetch;
mod player;
mod sink;
mod thread;
mod types;

pub use element::MediaElement;
pub use player::*;
pub use types::*;

#[cfg(test)]
mod tests;
