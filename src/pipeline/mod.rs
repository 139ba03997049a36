//! Conversion stages for Markdown-to-Notion block conversion.
//!
//! Each submodule implements exactly one concern. Collectors never move the
//! dispatcher's cursor themselves: they report how many lines they consumed
//! in a [`Collected`] and the dispatcher in [`crate::convert`] advances.
//!
//! ## Dependency Order
//!
//! ```text
//! link ◀── inline ◀──┬── list
//!                    ├── table
//!                    └── paragraph
//! fence (no inline formatting)
//! ```
//!
//! 1. [`link`]: sanitise link targets
//! 2. [`inline`]: split text into bold / italic / code / link spans
//! 3. [`fence`]: fenced code blocks, chunked to Notion's size limit
//! 4. [`list`]: runs of bullet or numbered items
//! 5. [`table`]: pipe tables
//! 6. [`paragraph`]: multi-line paragraphs with lookahead
//! 7. [`marker`]: heading, quote and rule line markers

use crate::block::Block;

pub mod fence;
pub mod inline;
pub mod link;
pub mod list;
pub mod marker;
pub mod paragraph;
pub mod table;

/// Output of a collector: the blocks it produced and how many input lines
/// it consumed, starting at the index it was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collected {
    pub blocks: Vec<Block>,
    pub consumed: usize,
}

impl Collected {
    pub fn new(blocks: Vec<Block>, consumed: usize) -> Self {
        Self { blocks, consumed }
    }
}
