/*!
 * Formatting preservation across content replacement.
 *
 * - `snapshot`: capture paragraph and character styles before translation
 * - `reapply`: write captured styles back onto the replaced text
 * - `direction`: normalize paragraph reading direction afterwards
 */

pub mod direction;
pub mod reapply;
pub mod snapshot;

pub use self::direction::{DirectionNormalizer, DirectionPolicy, DirectionReport};
pub use self::reapply::{ReapplyReport, StyleReapplier};
pub use self::snapshot::FormattingSnapshot;
