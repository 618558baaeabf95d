//! Parser state.
//!
//! The rule stack is a `Vec<Frame>`: the last frame is the rule being matched
//! and each frame's predecessor is the rule it was pushed from. Cloning a
//! [`State`] snapshots the whole parse, so parsing can resume from any saved
//! state without re-reading earlier text.

use serde::{Deserialize, Serialize};

use crate::grammar::{rule_for, Rule, RuleKind, StatePatch, Step};

/// One entry of the rule stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub kind: RuleKind,
    /// Index into the rule's step sequence.
    pub step: usize,
    /// Name recorded by a terminal of this rule (field, fragment, argument...).
    pub name: Option<String>,
    /// Type name recorded by a nested `NamedType`.
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub needs_separator: bool,
}

impl Frame {
    fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            step: 0,
            name: None,
            type_name: None,
            needs_separator: false,
        }
    }

    #[must_use]
    pub fn rule(&self) -> Rule {
        rule_for(self.kind)
    }

    /// The step this frame is positioned at, if its rule is a sequence.
    #[must_use]
    pub fn current_step(&self) -> Option<&'static Step> {
        self.rule().step(self.step)
    }
}

/// Full state of the online parser between two tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct State {
    frames: Vec<Frame>,
    /// Indentation levels opened by `{`, `(` and `[`.
    pub levels: Vec<usize>,
    /// Indentation of the current line, in tab stops.
    pub indent_level: Option<usize>,
    /// The last terminal matched a non-punctuation token; advance before the
    /// next one.
    pub needs_advance: bool,
    /// Inside a `"""` string that did not close on its line.
    pub in_block_string: bool,
}

impl State {
    /// The start state: a single `Document` frame.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new(RuleKind::Document)],
            ..Self::default()
        }
    }

    /// Frames from the root (`Document`) to the current rule.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn current(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// The frame `depth` levels above the current one; `0` is the current
    /// frame and `1` the rule it was pushed from.
    #[must_use]
    pub fn ancestor(&self, depth: usize) -> Option<&Frame> {
        self.frames
            .len()
            .checked_sub(depth + 1)
            .and_then(|index| self.frames.get(index))
    }

    #[must_use]
    pub fn kind(&self) -> Option<RuleKind> {
        self.current().map(|frame| frame.kind)
    }

    #[must_use]
    pub fn step(&self) -> usize {
        self.current().map_or(0, |frame| frame.step)
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.current().and_then(|frame| frame.name.as_deref())
    }

    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.current().and_then(|frame| frame.type_name.as_deref())
    }

    #[must_use]
    pub fn needs_separator(&self) -> bool {
        self.current().is_some_and(|frame| frame.needs_separator)
    }

    /// The state as it was before the current rule was pushed.
    #[must_use]
    pub fn prev_state(&self) -> Option<Self> {
        if self.frames.is_empty() {
            return None;
        }
        let mut prev = self.clone();
        prev.frames.pop();
        Some(prev)
    }

    pub(crate) fn current_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    pub(crate) fn push(&mut self, kind: RuleKind) {
        self.frames.push(Frame::new(kind));
    }

    pub(crate) fn pop(&mut self) {
        self.frames.pop();
    }

    /// Apply a terminal's update.
    pub(crate) fn apply(&mut self, patch: StatePatch) {
        match patch {
            StatePatch::SetName(name) => {
                if let Some(frame) = self.current_mut() {
                    frame.name = Some(name);
                }
            }
            StatePatch::SetNameAndAncestorType { depth, name } => {
                // Only applies when the ancestor exists.
                let Some(index) = self.frames.len().checked_sub(depth + 1) else {
                    return;
                };
                if let Some(ancestor) = self.frames.get_mut(index) {
                    ancestor.type_name = Some(name.clone());
                }
                if let Some(frame) = self.current_mut() {
                    frame.name = Some(name);
                }
            }
            StatePatch::BlockString(open) => self.in_block_string = open,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_state() {
        let state = State::new();
        assert_eq!(state.kind(), Some(RuleKind::Document));
        assert_eq!(state.step(), 0);
        assert!(state.prev_state().is_some_and(|prev| prev.is_empty()));
    }

    #[test]
    fn test_ancestor_type_patch() {
        let mut state = State::new();
        state.push(RuleKind::FragmentDefinition);
        state.push(RuleKind::TypeCondition);
        state.push(RuleKind::NamedType);
        state.apply(StatePatch::SetNameAndAncestorType {
            depth: 2,
            name: "User".to_string(),
        });

        assert_eq!(state.name(), Some("User"));
        assert_eq!(
            state.ancestor(2).map(|frame| frame.kind),
            Some(RuleKind::FragmentDefinition)
        );
        assert_eq!(
            state.ancestor(2).and_then(|frame| frame.type_name.as_deref()),
            Some("User")
        );
        assert_eq!(state.ancestor(1).and_then(|frame| frame.type_name.clone()), None);
    }

    #[test]
    fn test_ancestor_type_patch_without_grandparent() {
        let mut state = State::new();
        state.apply(StatePatch::SetNameAndAncestorType {
            depth: 2,
            name: "User".to_string(),
        });
        assert_eq!(state.name(), None);
    }

    #[test]
    fn test_state_serializes() {
        let mut state = State::new();
        state.push(RuleKind::Query);
        state.in_block_string = true;

        let json = serde_json::to_string(&state).unwrap();
        let restored: State = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
        assert!(json.contains("\"Query\""));
    }
}
