/*!
 * Style reapplication onto replaced text.
 *
 * After the span content is replaced the host has reset every new character
 * to the style of the first old one. `StyleReapplier` writes the captured
 * paragraph styles back, paragraph by paragraph, in `StyleKey::APPLY_ORDER`.
 * Every single write is guarded and counted; nothing here aborts the
 * pipeline.
 *
 * Named resources are resolved through a fallback chain: the direct color
 * handle captured with the snapshot, then a lookup by name, then a linear
 * scan of the resource table. If all three fail the attribute is left as
 * the host has it.
 */

use log::{debug, trace, warn};
use std::collections::HashMap;
use std::fmt;

use crate::document::{
    AppliedValue, AttributeValue, CharPos, ResourceHandle, ResourceKind, StyleAttributeSet, StyleKey, TextSpan,
};

use super::snapshot::FormattingSnapshot;

/// Outcome counters of one or more reapplication passes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReapplyReport {
    /// Paragraphs that received styles
    pub paragraphs: usize,

    /// Paragraphs restored character by character
    pub refined_paragraphs: usize,

    /// Attribute writes the host accepted
    pub applied: usize,

    /// Attribute writes the host refused
    pub failed: usize,

    /// Attributes skipped because no resource matched their name
    pub unresolved: usize,
}

impl ReapplyReport {
    /// Add the counters of a later pass
    pub fn merge(&mut self, other: &ReapplyReport) {
        self.paragraphs = self.paragraphs.max(other.paragraphs);
        self.refined_paragraphs = self.refined_paragraphs.max(other.refined_paragraphs);
        self.applied += other.applied;
        self.failed += other.failed;
        self.unresolved += other.unresolved;
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.unresolved > 0
    }
}

impl fmt::Display for ReapplyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} paragraph(s), {} write(s) applied, {} failed, {} unresolved",
            self.paragraphs, self.applied, self.failed, self.unresolved
        )?;
        if self.refined_paragraphs > 0 {
            write!(f, ", {} restored per character", self.refined_paragraphs)?;
        }
        Ok(())
    }
}

/// Where a new paragraph takes its styles from
enum StyleSource<'a> {
    Paragraph(&'a StyleAttributeSet),
    Characters(&'a [StyleAttributeSet]),
}

/// Writes snapshot styles back onto a span
#[derive(Debug, Clone)]
pub struct StyleReapplier {
    refine_unchanged: bool,
    /// Paragraphs whose text was replaced by a translation; those always get the paragraph style
    translated: Vec<bool>,
}

impl Default for StyleReapplier {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleReapplier {
    pub fn new() -> Self {
        Self {
            refine_unchanged: true,
            translated: Vec::new(),
        }
    }

    /// Turn per-character restoration of same-length paragraphs on or off
    pub fn with_refinement(mut self, enabled: bool) -> Self {
        self.refine_unchanged = enabled;
        self
    }

    /// Mark which paragraphs carry translated text.
    ///
    /// Per-character restoration only lines up with text that was kept, so
    /// translated paragraphs take their paragraph style on every character.
    /// Paragraphs past the end of `translated` count as kept.
    pub fn with_translated(mut self, translated: Vec<bool>) -> Self {
        self.translated = translated;
        self
    }

    fn is_translated(&self, paragraph: usize) -> bool {
        self.translated.get(paragraph).copied().unwrap_or(false)
    }

    /// Full pass: every captured attribute, in apply order
    pub fn apply<S: TextSpan + ?Sized>(&self, span: &mut S, snapshot: &FormattingSnapshot) -> ReapplyReport {
        let report = self.run_pass(span, snapshot, &StyleKey::APPLY_ORDER);
        debug!("Reapplication pass on '{}': {}", span.owner(), report);
        report
    }

    /// Corrective pass: font, size and fill color again, for hosts that dropped them
    pub fn apply_corrective<S: TextSpan + ?Sized>(
        &self,
        span: &mut S,
        snapshot: &FormattingSnapshot,
    ) -> ReapplyReport {
        let report = self.run_pass(span, snapshot, &StyleKey::CORRECTIVE);
        debug!("Corrective pass on '{}': {}", span.owner(), report);
        report
    }

    fn run_pass<S: TextSpan + ?Sized>(
        &self,
        span: &mut S,
        snapshot: &FormattingSnapshot,
        keys: &[StyleKey],
    ) -> ReapplyReport {
        let mut report = ReapplyReport::default();
        let new_count = match span.paragraph_count() {
            Ok(count) => count,
            Err(e) => {
                warn!("Cannot enumerate paragraphs of '{}', skipping reapplication: {}", span.owner(), e);
                return report;
            }
        };
        let count_preserved = new_count == snapshot.paragraph_count();
        let mut resolver = ResourceResolver::default();

        for paragraph in 0..new_count.min(snapshot.paragraph_count()) {
            let len = match span.paragraph_len(paragraph) {
                Ok(len) => len,
                Err(e) => {
                    trace!("Skipping paragraph {}: {}", paragraph, e);
                    continue;
                }
            };
            let Some(source) = self.source_for(snapshot, paragraph, len, count_preserved) else {
                continue;
            };

            report.paragraphs += 1;
            if matches!(source, StyleSource::Characters(_)) {
                report.refined_paragraphs += 1;
            }

            for offset in 0..len {
                let style = match &source {
                    StyleSource::Paragraph(style) => *style,
                    StyleSource::Characters(styles) => &styles[offset],
                };
                let at = CharPos::new(paragraph, offset);
                for &key in keys {
                    if let Some(value) = style.get(key) {
                        write_guarded(span, &mut resolver, at, key, value, &mut report);
                    }
                }
            }
        }
        report
    }

    fn source_for<'a>(
        &self,
        snapshot: &'a FormattingSnapshot,
        paragraph: usize,
        new_len: usize,
        count_preserved: bool,
    ) -> Option<StyleSource<'a>> {
        if self.refine_unchanged
            && count_preserved
            && !self.is_translated(paragraph)
            && snapshot.paragraph_len(paragraph) == Some(new_len)
        {
            if let Some(chars) = snapshot.character_styles(paragraph) {
                if chars.len() == new_len {
                    return Some(StyleSource::Characters(chars));
                }
            }
        }
        snapshot.paragraph_style(paragraph).map(StyleSource::Paragraph)
    }
}

/// Resolves resource names to handles, remembering results for one pass
#[derive(Default)]
struct ResourceResolver {
    resolved: HashMap<(ResourceKind, String), Option<ResourceHandle>>,
}

impl ResourceResolver {
    fn resolve<S: TextSpan + ?Sized>(&mut self, span: &S, kind: ResourceKind, name: &str) -> Option<ResourceHandle> {
        if let Some(handle) = self.resolved.get(&(kind, name.to_string())) {
            return *handle;
        }
        let handle = match span.lookup(kind, name) {
            Ok(handle) => Some(handle),
            Err(e) => {
                trace!("Lookup of {} '{}' failed ({}), scanning the table", kind, name, e);
                span.list_resources(kind)
                    .ok()
                    .and_then(|entries| entries.into_iter().find(|(n, _)| n == name))
                    .map(|(_, handle)| handle)
            }
        };
        if handle.is_none() {
            debug!("{} '{}' not found in document", kind, name);
        }
        self.resolved.insert((kind, name.to_string()), handle);
        handle
    }
}

fn write_guarded<S: TextSpan + ?Sized>(
    span: &mut S,
    resolver: &mut ResourceResolver,
    at: CharPos,
    key: StyleKey,
    value: &AttributeValue,
    report: &mut ReapplyReport,
) {
    let applied = match (key.resource_kind(), value) {
        (Some(kind), AttributeValue::Color(color)) => {
            if let Some(handle) = color.handle {
                if span.write_attribute(at, key, &AppliedValue::Resource(handle)).is_ok() {
                    report.applied += 1;
                    return;
                }
                trace!("Direct handle for '{}' rejected, resolving by name", color.name);
            }
            resolver.resolve(span, kind, &color.name).map(AppliedValue::Resource)
        }
        (Some(kind), _) => match value.resource_name() {
            Some(name) => resolver.resolve(span, kind, name).map(AppliedValue::Resource),
            None => None,
        },
        (None, _) => AppliedValue::direct(value),
    };

    let Some(applied) = applied else {
        report.unresolved += 1;
        return;
    };
    match span.write_attribute(at, key, &applied) {
        Ok(()) => report.applied += 1,
        Err(e) => {
            trace!("Write of {} at {:?} failed: {}", key, at, e);
            report.failed += 1;
        }
    }
}
