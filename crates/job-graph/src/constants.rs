//! Layout and design constants shared across the job graph.

/// Inset subtracted from the top-left corner when computing the minimum bound.
pub const BORDER_INDENT: i32 = 20;

/// Margin added to the bottom-right corner when computing the maximum bound.
pub const MAXIMUM_MARGIN: i32 = 100;

/// Width and height of an entry icon on the canvas.
pub const ICON_SIZE: i32 = 32;

/// Default depth of the layout undo stack.
pub const DEFAULT_MAX_UNDO: usize = 100;

/// Name given to the START special entry.
pub const START_ENTRY_NAME: &str = "START";

/// Name given to the DUMMY special entry.
pub const DUMMY_ENTRY_NAME: &str = "DUMMY";
