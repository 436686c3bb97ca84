//! Recording of the last change for `.`.
//!
//! Normal and Visual commands are recorded as the binding that ran, minus
//! the actions that only make sense when typed (mode switches). Insert and
//! Replace typing is not recorded key by key: the line under the cursor is
//! snapshotted when typing starts and compared with its final text when
//! typing ends, which turns whatever happened in between (typing, backspace,
//! completion, paste) into at most three replayable edits.

use std::rc::Rc;

use tracing::debug;
use vims_chord::{Motion, MotionArgs, MotionKind};

use crate::actions::{line_ends, line_len, line_span};
use crate::host::{Editor, Position, Selection};
use crate::vim::{Action, ActionArgs, Binding, EditOp, ModeId};

/// Size of the Visual selection a recorded command acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    /// Lines below the first selected line.
    pub lines: usize,
    /// Characters on the last line; for a single line, the selection width.
    pub last_line_chars: usize,
}

impl Extent {
    fn of(editor: &dyn Editor, mode: ModeId) -> Option<Self> {
        let sel = *editor.selections().first()?;
        match mode {
            ModeId::VisualLine => {
                let (anchor, cursor) = line_ends(sel);
                Some(Self {
                    lines: anchor.abs_diff(cursor),
                    last_line_chars: 0,
                })
            }
            ModeId::Visual => {
                let (start, end) = (sel.start(), sel.end());
                let lines = end.line - start.line;
                let last_line_chars = if lines == 0 {
                    end.character - start.character
                } else {
                    end.character
                };
                Some(Self {
                    lines,
                    last_line_chars,
                })
            }
            _ => None,
        }
    }

    /// Reselects the same amount of text at every cursor.
    pub fn restore(&self, editor: &mut dyn Editor, linewise: bool) {
        let last_line = editor.line_count().saturating_sub(1);
        let out: Vec<Selection> = editor
            .selections()
            .into_iter()
            .map(|sel| {
                let at = sel.start();
                let end_line = (at.line + self.lines).min(last_line);
                if linewise {
                    return line_span(&*editor, at.line, end_line);
                }
                let character = if self.lines == 0 {
                    at.character + self.last_line_chars
                } else {
                    self.last_line_chars
                };
                let end = Position::new(end_line, character.min(line_len(&*editor, end_line)));
                Selection::new(at, end)
            })
            .collect();
        editor.set_selections(out);
    }
}

/// Where `.` leaves the cursor after replaying a unit.
///
/// Leaving Insert steps back onto the last typed character. A unit whose
/// typing ends by deleting `n` characters to the right replays a move left
/// of `n - 1` after the delete; that move stops at the line start, so the
/// step back is taken from where it began instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    Stay,
    StepLeft,
    LeftOfLastMove,
}

/// One recorded binding with the arguments it ran with.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub binding: Rc<Binding>,
    pub args: ActionArgs,
    pub extent: Option<Extent>,
}

impl Recorded {
    fn pseudo(op: EditOp, args: ActionArgs) -> Self {
        let mut binding = Binding::new("", vec![Action::edit(op)]).with_args(args.clone());
        binding.is_repeating = true;
        Self {
            binding: Rc::new(binding),
            args,
            extent: None,
        }
    }
}

/// The line under the cursor when Insert typing started.
#[derive(Debug, Clone)]
struct Session {
    line: usize,
    character: usize,
    text: String,
}

/// Builds the unit replayed by `.`.
#[derive(Debug, Default)]
pub struct Recorder {
    last_change: Vec<Recorded>,
    typed: Vec<Recorded>,
    session: Option<Session>,
    /// A command was recorded by the binding now running.
    armed: bool,
    /// A newline was typed; recording restarts on the new line.
    restart: bool,
    /// The unit ends with typing, so replaying it steps back like Escape.
    ends_in_insert: bool,
    /// Columns the unit's final move left covers after deleting right.
    trailing_left: usize,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The unit `.` replays.
    pub fn last_change(&self) -> &[Recorded] {
        &self.last_change
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    /// True when the unit was finished by leaving Insert or Replace.
    pub fn ends_in_insert(&self) -> bool {
        self.ends_in_insert
    }

    /// Where a replayed unit leaves the cursor.
    pub fn settle(&self) -> Settle {
        match (self.ends_in_insert, self.trailing_left) {
            (false, _) => Settle::Stay,
            (true, 0) => Settle::StepLeft,
            (true, _) => Settle::LeftOfLastMove,
        }
    }

    /// Runs before a binding that changes the buffer.
    pub fn before_change(
        &mut self,
        mode: ModeId,
        binding: &Rc<Binding>,
        args: &ActionArgs,
        editor: &dyn Editor,
    ) {
        if binding.is_repeating {
            return;
        }

        if mode.is_insert_like() {
            if self.session.is_none() {
                self.start_session(editor);
            }
            if args.text.as_deref() == Some("\n") {
                self.finish_session(editor);
                self.typed
                    .push(Recorded::pseudo(EditOp::InsertText, ActionArgs::text("\n")));
                self.trailing_left = 0;
                self.restart = true;
            }
            return;
        }

        self.last_change = vec![Recorded {
            binding: Rc::new(binding.stripped()),
            args: args.clone(),
            extent: Extent::of(editor, mode),
        }];
        self.typed.clear();
        self.armed = true;
        self.ends_in_insert = false;
        self.trailing_left = 0;
    }

    /// Runs after a binding that changed the buffer.
    pub fn after_change(&mut self, editor: &dyn Editor) {
        if self.restart {
            self.restart = false;
            self.start_session(editor);
        }
        self.armed = false;
    }

    /// Runs on every mode switch, before the new mode is set up.
    pub fn mode_switched(&mut self, from: ModeId, to: ModeId, editor: &dyn Editor) {
        if from.is_insert_like() && !to.is_insert_like() {
            self.finish_session(editor);
            if !self.typed.is_empty() {
                debug!(edits = self.typed.len(), "insert recording finished");
            }
            self.last_change.append(&mut self.typed);
            self.ends_in_insert = !self.last_change.is_empty();
        } else if to.is_insert_like() && !from.is_insert_like() {
            if !self.armed {
                self.last_change.clear();
            }
            self.typed.clear();
            self.trailing_left = 0;
            self.start_session(editor);
        }
    }

    /// Ends recording when the cursor left the recorded line.
    pub fn end_session_if_line_changed(&mut self, editor: &dyn Editor) {
        let Some(session) = &self.session else {
            return;
        };
        let moved = editor
            .selections()
            .first()
            .is_some_and(|s| s.active.line != session.line);
        if moved {
            self.finish_session(editor);
        }
    }

    /// Forgets the snapshot; the document it was taken from is gone.
    pub fn discard_session(&mut self) {
        self.session = None;
        self.restart = false;
    }

    fn start_session(&mut self, editor: &dyn Editor) {
        let Some(sel) = editor.selections().first().copied() else {
            return;
        };
        if !editor.has_document() {
            return;
        }
        self.session = Some(Session {
            line: sel.active.line,
            character: sel.active.character,
            text: editor.line_text(sel.active.line),
        });
    }

    fn finish_session(&mut self, editor: &dyn Editor) {
        let Some(session) = self.session.take() else {
            return;
        };
        if !editor.has_document() || session.line >= editor.line_count() {
            return;
        }
        let current = editor.line_text(session.line);
        let diff = line_diff(&session.text, &current, session.character);
        if diff.deleted_before > 0 || !diff.inserted.is_empty() || diff.deleted_after > 0 {
            self.trailing_left = 0;
        }

        if diff.deleted_before > 0 {
            self.typed.push(Recorded::pseudo(
                EditOp::DeleteByMotions,
                char_motion(MotionKind::CharLeft, diff.deleted_before),
            ));
        }
        if !diff.inserted.is_empty() {
            self.typed
                .push(Recorded::pseudo(EditOp::InsertText, ActionArgs::text(diff.inserted)));
        }
        if diff.deleted_after > 0 {
            self.typed.push(Recorded::pseudo(
                EditOp::DeleteByMotions,
                char_motion(MotionKind::CharRight, diff.deleted_after),
            ));
            // A count of zero would still move one column.
            if diff.deleted_after > 1 {
                self.typed.push(Recorded::pseudo(
                    EditOp::MoveByMotions,
                    char_motion(MotionKind::CharLeft, diff.deleted_after - 1),
                ));
            }
            self.trailing_left = diff.deleted_after - 1;
        }
    }
}

fn char_motion(kind: MotionKind, n: usize) -> ActionArgs {
    ActionArgs::motions(vec![Motion::with_args(
        kind,
        MotionArgs {
            n: Some(n),
            ..Default::default()
        },
    )])
}

/// How a line changed around the point typing started at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiff {
    pub deleted_before: usize,
    pub inserted: String,
    pub deleted_after: usize,
}

/// Compares a line before and after typing that started at `at`.
///
/// Deletions are bounded by the original line: text before `at` that no
/// longer matches counts as deleted before, the original tail that is no
/// longer at the end of the line counts as deleted after.
pub fn line_diff(before: &str, after: &str, at: usize) -> LineDiff {
    let b: Vec<char> = before.chars().collect();
    let a: Vec<char> = after.chars().collect();
    let at = at.min(b.len());

    let deleted_before = (0..at)
        .find(|&i| a.get(i) != Some(&b[i]))
        .map_or(0, |i| at - i);

    let kept_head = at - deleted_before;
    let limit = b.len() - at + 1;
    let deleted_after = (1..limit)
        .find(|&i| a.len() < kept_head + i || a[a.len() - i] != b[b.len() - i])
        .map_or(0, |i| limit - i);

    let kept_tail = b.len() - at - deleted_after;
    let end = a.len().saturating_sub(kept_tail).max(kept_head);
    LineDiff {
        deleted_before,
        inserted: a[kept_head..end].iter().collect(),
        deleted_after,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryEditor;

    fn diff(before: &str, after: &str, at: usize) -> (usize, String, usize) {
        let d = line_diff(before, after, at);
        (d.deleted_before, d.inserted, d.deleted_after)
    }

    #[test]
    fn test_pure_insertion() {
        assert_eq!(
            diff("Hello world", "Hello there world", 5),
            (0, " there".to_string(), 0)
        );
    }

    #[test]
    fn test_backspace_then_type() {
        assert_eq!(diff("Hello world", "Help! world", 5), (2, "p!".to_string(), 0));
    }

    #[test]
    fn test_delete_forward() {
        assert_eq!(diff("abcdef", "abXef", 2), (0, "X".to_string(), 2));
    }

    #[test]
    fn test_overwrite() {
        assert_eq!(diff("abcdef", "aXYdef", 1), (0, "XY".to_string(), 2));
    }

    #[test]
    fn test_unchanged_line() {
        assert_eq!(diff("abc", "abc", 1), (0, String::new(), 0));
        assert_eq!(diff("", "", 0), (0, String::new(), 0));
    }

    #[test]
    fn test_whole_line_cleared() {
        assert_eq!(diff("abc", "", 3), (3, String::new(), 0));
    }

    #[test]
    fn test_normal_change_is_recorded_stripped() {
        let editor = MemoryEditor::from_marked("a[]bc");
        let binding = Rc::new(Binding::new(
            "x",
            vec![
                Action::edit(EditOp::DeleteSelectionsOrRight),
                Action::switch_mode(ModeId::Insert),
            ],
        ));
        let mut recorder = Recorder::new();
        recorder.before_change(ModeId::Normal, &binding, &ActionArgs::default(), &editor);
        recorder.after_change(&editor);

        let unit = recorder.last_change();
        assert_eq!(unit.len(), 1);
        assert!(unit[0].binding.is_repeating);
        assert_eq!(unit[0].binding.actions.len(), 1);
        assert_eq!(unit[0].extent, None);
    }

    #[test]
    fn test_insert_typing_extends_the_command() {
        let mut editor = MemoryEditor::from_marked("one []two");
        let binding = Rc::new(Binding::new("c {motion}", vec![Action::switch_mode(ModeId::Insert)]));
        let mut recorder = Recorder::new();

        recorder.before_change(ModeId::Normal, &binding, &ActionArgs::default(), &editor);
        recorder.mode_switched(ModeId::Normal, ModeId::Insert, &editor);
        recorder.after_change(&editor);
        assert!(recorder.is_recording());

        editor = MemoryEditor::from_marked("one XY[]two");
        recorder.mode_switched(ModeId::Insert, ModeId::Normal, &editor);

        let unit = recorder.last_change();
        assert_eq!(unit.len(), 2);
        assert_eq!(unit[1].args.text.as_deref(), Some("XY"));
        assert!(!recorder.is_recording());
        assert!(recorder.ends_in_insert());
    }

    fn typed_unit(before: &str, after: &str) -> Recorder {
        let mut recorder = Recorder::new();
        recorder.mode_switched(ModeId::Normal, ModeId::Insert, &MemoryEditor::from_marked(before));
        recorder.mode_switched(ModeId::Insert, ModeId::Normal, &MemoryEditor::from_marked(after));
        recorder
    }

    fn ops(recorder: &Recorder) -> Vec<String> {
        recorder
            .last_change()
            .iter()
            .map(|r| r.binding.summary())
            .collect()
    }

    #[test]
    fn test_delete_forward_moves_back_over_all_but_one() {
        let recorder = typed_unit("[]abcdef", "X[]cdef");
        assert_eq!(ops(&recorder), ["insert", "delete by motions", "move"]);
        let unit = recorder.last_change();
        assert_eq!(unit[1].args.motions[0].kind, MotionKind::CharRight);
        assert_eq!(unit[1].args.motions[0].args.n, Some(2));
        assert_eq!(unit[2].args.motions[0].kind, MotionKind::CharLeft);
        assert_eq!(unit[2].args.motions[0].args.n, Some(1));
        assert_eq!(recorder.settle(), Settle::LeftOfLastMove);
    }

    #[test]
    fn test_single_delete_forward_has_no_move() {
        let recorder = typed_unit("[]abc", "X[]bc");
        assert_eq!(ops(&recorder), ["insert", "delete by motions"]);
        assert_eq!(recorder.settle(), Settle::StepLeft);
    }

    #[test]
    fn test_typing_after_a_delete_forward_steps_left() {
        let mut recorder = Recorder::new();
        let editor = MemoryEditor::from_marked("[]abc\ndef");
        recorder.mode_switched(ModeId::Normal, ModeId::Insert, &editor);

        let editor = MemoryEditor::from_marked("X[]c\ndef");
        let enter = Rc::new(Binding::new("enter", vec![Action::edit(EditOp::InsertText)]));
        recorder.before_change(ModeId::Insert, &enter, &ActionArgs::text("\n"), &editor);
        assert_eq!(recorder.settle(), Settle::Stay);

        recorder.after_change(&MemoryEditor::from_marked("X\n[]c\ndef"));
        let editor = MemoryEditor::from_marked("X\nY[]c\ndef");
        recorder.mode_switched(ModeId::Insert, ModeId::Normal, &editor);
        assert_eq!(
            ops(&recorder),
            ["insert", "delete by motions", "move", "insert", "insert"]
        );
        assert_eq!(recorder.last_change()[3].args.text.as_deref(), Some("\n"));
        assert_eq!(recorder.settle(), Settle::StepLeft);
    }

    #[test]
    fn test_entering_insert_without_a_command_forgets_the_last_change() {
        let editor = MemoryEditor::from_marked("[]abc");
        let binding = Rc::new(Binding::new("x", vec![Action::edit(EditOp::DeleteSelectionsOrRight)]));
        let mut recorder = Recorder::new();
        recorder.before_change(ModeId::Normal, &binding, &ActionArgs::default(), &editor);
        recorder.after_change(&editor);

        recorder.mode_switched(ModeId::Normal, ModeId::Insert, &editor);
        assert!(recorder.last_change().is_empty());
    }

    #[test]
    fn test_visual_extent() {
        let editor = MemoryEditor::from_marked("a[bc\nde]f");
        assert_eq!(
            Extent::of(&editor, ModeId::Visual),
            Some(Extent {
                lines: 1,
                last_line_chars: 2
            })
        );

        let mut editor = MemoryEditor::from_marked("[]xyz\nabc");
        Extent {
            lines: 0,
            last_line_chars: 2,
        }
        .restore(&mut editor, false);
        assert_eq!(editor.to_marked(), "[xy]z\nabc");
    }
}
