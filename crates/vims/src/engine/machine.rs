//! The mode state machine's input side: typed tokens are matched against the
//! current mode's table and matched bindings wait in a queue.

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use tracing::debug;
use vims_chord::{char_token, is_escape, token_char};

use crate::error::VimError;
use crate::vim::{
    default_table, Action, ActionArgs, Binding, CommandTable, EditOp, ModeId, Suggestion,
    TableMatch,
};

/// A matched binding waiting to run.
#[derive(Debug, Clone)]
pub struct Pending {
    pub binding: Rc<Binding>,
    pub args: ActionArgs,
}

/// What feeding input did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// The typed tokens are a prefix of a longer chord.
    Waiting,
    /// At least one binding was queued.
    Queued,
    /// Nothing matched; the input buffer was reset.
    Failed,
}

#[derive(Debug)]
pub struct ModeMachine {
    tables: HashMap<ModeId, CommandTable>,
    current: ModeId,
    inputs: Vec<String>,
    pending: VecDeque<Pending>,
}

impl ModeMachine {
    /// A machine with the default table of every mode.
    pub fn new(initial: ModeId) -> Self {
        Self {
            tables: ModeId::ALL
                .into_iter()
                .map(|mode| (mode, default_table(mode)))
                .collect(),
            current: initial,
            inputs: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn mode(&self) -> ModeId {
        self.current
    }

    /// Tokens typed so far for the chord in progress.
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn table(&self, mode: ModeId) -> Option<&CommandTable> {
        self.tables.get(&mode)
    }

    pub fn table_mut(&mut self, mode: ModeId) -> &mut CommandTable {
        self.tables
            .entry(mode)
            .or_insert_with(|| CommandTable::new(mode))
    }

    /// Feeds one key token. Escape always starts a fresh chord.
    pub fn input(&mut self, token: &str) -> Feed {
        if is_escape(token) {
            self.inputs.clear();
        }
        self.inputs.push(token.to_string());
        self.resolve(false)
    }

    /// Treats the typed tokens as a complete chord.
    pub fn commit(&mut self) -> Feed {
        if self.inputs.is_empty() {
            return Feed::Failed;
        }
        self.resolve(true)
    }

    /// Feeds text typed or pasted by the host.
    ///
    /// Insert and Replace take it as a whole; other modes see it as keys.
    pub fn type_text(&mut self, text: &str) -> Feed {
        if text.is_empty() {
            return Feed::Failed;
        }
        let typed = self.typed(text);
        if !typed.is_empty() {
            self.inputs.clear();
            self.pending.extend(typed);
            return Feed::Queued;
        }

        let mut feed = Feed::Failed;
        let mut queued = false;
        for c in text.chars() {
            feed = self.input(&char_token(c));
            queued |= feed == Feed::Queued;
        }
        if queued && feed == Feed::Failed {
            Feed::Queued
        } else {
            feed
        }
    }

    /// Switches the current mode, resetting the input buffer and the queue.
    /// Returns how many queued bindings were dropped.
    pub fn enter(&mut self, mode: ModeId) -> usize {
        self.current = mode;
        self.inputs.clear();
        self.clear_pending()
    }

    pub fn pop_pending(&mut self) -> Option<Pending> {
        self.pending.pop_front()
    }

    /// Drops every queued binding and returns how many there were.
    pub fn clear_pending(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Chords that complete what has been typed.
    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.table(self.current)
            .map(|t| t.suggestions(&self.inputs))
            .unwrap_or_default()
    }

    /// Status bar text: the mode banner, then the typed keys while waiting.
    pub fn hint(&self) -> String {
        let banner = format!("-- {} --", self.current.label());
        if self.inputs.is_empty() {
            banner
        } else {
            format!("{} {} and...", banner, self.inputs.join(" "))
        }
    }

    fn resolve(&mut self, complete: bool) -> Feed {
        let mut queued = false;

        while !self.inputs.is_empty() {
            let result = match self.tables.get(&self.current) {
                Some(table) if complete => table.commit(&self.inputs),
                Some(table) => table.match_tokens(&self.inputs),
                None => TableMatch::Failed,
            };

            match result {
                TableMatch::Waiting => return Feed::Waiting,
                TableMatch::Found {
                    binding,
                    args,
                    consumed,
                } => {
                    self.pending.push_back(Pending {
                        binding,
                        args: args.in_mode(self.current),
                    });
                    let consumed = consumed.clamp(1, self.inputs.len());
                    self.inputs.drain(..consumed);
                    queued = true;
                }
                TableMatch::Failed => {
                    let text: Option<String> = self.inputs.iter().map(|t| token_char(t)).collect();
                    let typed = text.map(|text| self.typed(&text)).unwrap_or_default();
                    if typed.is_empty() {
                        let err = VimError::MatchFailed {
                            keys: self.inputs.join(" "),
                        };
                        debug!(mode = %self.current, "{}", err);
                    } else {
                        self.pending.extend(typed);
                        queued = true;
                    }
                    self.inputs.clear();
                }
            }
        }

        if queued {
            Feed::Queued
        } else {
            Feed::Failed
        }
    }

    /// Bindings that type `text` in the current mode; empty unless the mode
    /// takes text.
    ///
    /// Every line break gets a binding of its own, inserted even in Replace,
    /// the same as the `enter` chord.
    fn typed(&self, text: &str) -> Vec<Pending> {
        let op = match self.current {
            ModeId::Insert => EditOp::InsertText,
            ModeId::Replace => EditOp::OverwriteText,
            _ => return Vec::new(),
        };
        let pending = |keys: &str, op: EditOp| {
            let args = ActionArgs::text(keys);
            let binding = Binding::new(keys, vec![Action::edit(op)]).with_args(args.clone());
            Pending {
                binding: Rc::new(binding),
                args,
            }
        };

        let mut out = Vec::new();
        for (i, segment) in text.split('\n').enumerate() {
            if i > 0 {
                out.push(pending("\n", EditOp::InsertText));
            }
            if !segment.is_empty() {
                out.push(pending(segment, op));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vims_chord::MotionKind;

    fn feed(machine: &mut ModeMachine, script: &str) -> Feed {
        let mut last = Feed::Failed;
        for token in vims_chord::tokenize(script) {
            last = machine.input(&token);
        }
        last
    }

    #[test]
    fn test_prefix_waits_and_shows_keys() {
        let mut machine = ModeMachine::new(ModeId::Normal);
        assert_eq!(feed(&mut machine, "d"), Feed::Waiting);
        assert_eq!(machine.hint(), "-- NORMAL -- d and...");
        assert_eq!(feed(&mut machine, "w"), Feed::Queued);
        assert_eq!(machine.hint(), "-- NORMAL --");

        let pending = machine.pop_pending().unwrap();
        assert_eq!(pending.binding.keys, "d {motion}");
        assert_eq!(pending.args.motions[0].kind, MotionKind::WordNextStart);
        assert!(pending.args.should_yank);
    }

    #[test]
    fn test_unknown_keys_reset_the_buffer() {
        let mut machine = ModeMachine::new(ModeId::Normal);
        assert_eq!(feed(&mut machine, "d q"), Feed::Failed);
        assert!(machine.inputs().is_empty());
        assert_eq!(machine.pending_len(), 0);
    }

    #[test]
    fn test_escape_restarts_the_chord() {
        let mut machine = ModeMachine::new(ModeId::Normal);
        feed(&mut machine, "d");
        assert_eq!(machine.input("escape"), Feed::Queued);
        let pending = machine.pop_pending().unwrap();
        assert_eq!(pending.binding.keys, "escape");
    }

    #[test]
    fn test_count_ten() {
        let mut machine = ModeMachine::new(ModeId::Normal);
        assert_eq!(feed(&mut machine, "1 0 x"), Feed::Queued);
        assert_eq!(machine.pop_pending().unwrap().args.count, Some(10));
    }

    #[test]
    fn test_visual_bindings_know_their_mode() {
        let mut machine = ModeMachine::new(ModeId::VisualLine);
        feed(&mut machine, "d");
        let pending = machine.pop_pending().unwrap();
        assert!(pending.args.is_visual_line_mode);
        assert!(!pending.args.is_visual_mode);
    }

    #[test]
    fn test_insert_types_unmatched_keys() {
        let mut machine = ModeMachine::new(ModeId::Insert);
        assert_eq!(machine.input("x"), Feed::Queued);
        let pending = machine.pop_pending().unwrap();
        assert_eq!(pending.args.text.as_deref(), Some("x"));

        assert_eq!(machine.input("ctrl+k"), Feed::Failed);
        assert_eq!(machine.pending_len(), 0);
    }

    #[test]
    fn test_type_text_by_mode() {
        let mut machine = ModeMachine::new(ModeId::Replace);
        assert_eq!(machine.type_text("ab"), Feed::Queued);
        let pending = machine.pop_pending().unwrap();
        assert_eq!(pending.binding.actions.len(), 1);
        assert_eq!(pending.args.text.as_deref(), Some("ab"));

        machine.enter(ModeId::Normal);
        assert_eq!(machine.type_text("dd"), Feed::Queued);
        assert_eq!(machine.pop_pending().unwrap().binding.keys, "d d");
    }

    #[test]
    fn test_typed_text_splits_at_line_breaks() {
        let mut machine = ModeMachine::new(ModeId::Insert);
        assert_eq!(machine.type_text("ab\ncd"), Feed::Queued);
        let texts: Vec<String> = std::iter::from_fn(|| machine.pop_pending())
            .filter_map(|p| p.args.text)
            .collect();
        assert_eq!(texts, vec!["ab", "\n", "cd"]);

        let mut machine = ModeMachine::new(ModeId::Replace);
        machine.type_text("x\n");
        let first = machine.pop_pending().unwrap();
        assert!(matches!(
            first.binding.actions[0].op,
            crate::vim::Op::Edit(EditOp::OverwriteText)
        ));
        let second = machine.pop_pending().unwrap();
        assert!(matches!(
            second.binding.actions[0].op,
            crate::vim::Op::Edit(EditOp::InsertText)
        ));
        assert_eq!(machine.pending_len(), 0);
    }

    #[test]
    fn test_enter_resets_input_and_queue() {
        let mut machine = ModeMachine::new(ModeId::Normal);
        machine.type_text("xd");
        assert_eq!(machine.pending_len(), 1);
        assert_eq!(machine.enter(ModeId::Visual), 1);
        assert!(machine.inputs().is_empty());
        assert_eq!(machine.pending_len(), 0);
        assert_eq!(machine.mode(), ModeId::Visual);
    }

    #[test]
    fn test_custom_table_entries() {
        let mut machine = ModeMachine::new(ModeId::Normal);
        machine
            .table_mut(ModeId::Normal)
            .map("g x", vec![Action::edit(EditOp::SwitchCase)]);
        assert_eq!(feed(&mut machine, "g x"), Feed::Queued);
        assert_eq!(machine.pop_pending().unwrap().binding.keys, "g x");
    }
}
