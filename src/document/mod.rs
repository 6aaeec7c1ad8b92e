/*!
 * Document model and host interfaces.
 *
 * - `style`: style attribute keys and values
 * - `host`: the `TextSpan` trait the pipeline works against, plus the
 *   interaction-suppression guard
 * - `memory`: a JSON-persisted in-memory document implementing the host traits
 * - `selection`: resolving user selections into span targets
 */

pub mod host;
pub mod memory;
pub mod selection;
pub mod style;

pub use self::host::{
    CharPos, DirectionMechanism, InteractionControl, InteractionGuard, InteractionLevel, Justification,
    PARAGRAPH_BREAK, ReadingDirection, TextSpan,
};
pub use self::memory::{Document, FaultPlan, MemorySpan, ResourceTable, StyledChar, TextFrame};
pub use self::selection::{ElementKind, Selection, SelectionResolver, SpanTarget, order_for_processing};
pub use self::style::{
    AppliedValue, AttributeValue, ColorRef, Leading, ResourceHandle, ResourceKind, StyleAttributeSet, StyleKey,
    ValueKind,
};
