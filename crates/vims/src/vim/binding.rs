//! What a chord does once it matches: bindings, actions and their arguments.

use std::fmt;
use std::rc::Rc;

use anyhow::Result;
use futures_util::future::LocalBoxFuture;
use vims_chord::{ChordArgs, Motion, TextObject};

use super::ModeId;

/// Built-in operations run against the host editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditOp {
    MoveByMotions,
    DeleteByMotions,
    DeleteByTextObject,
    DeleteSelectionsOrRight,
    DeleteSelectionsOrLeft,
    DeleteLines,
    /// Insert mode backspace; joins with the previous line at column zero.
    DeleteLeft,
    /// Insert mode delete; joins with the next line at line end.
    DeleteRight,
    InsertText,
    InsertTab,
    OverwriteText,
    NewLineAfter,
    NewLineBefore,
    ReplaceChars,
    ReplaceSelectionsWithChar,
    SwitchCase,
    SwitchCaseSelections,
    LowerCaseSelections,
    UpperCaseSelections,
    YankLines,
    YankByMotions,
    YankByTextObject,
    YankSelections,
    PutAfter,
    PutBefore,
    ReplaceSelectionsWithRegister,
    JoinLines,
    Indent,
    Outdent,
    SelectByTextObject,
    ShrinkToPrimaryActive,
    ShrinkToActives,
    ShrinkToStarts,
    ShrinkToEnds,
    ExpandToOne,
    ExpandToLines,
    ValidateSelections,
    NativeEscape,
}

impl EditOp {
    /// Whether the operation modifies the buffer.
    pub fn is_change(&self) -> bool {
        !matches!(
            self,
            EditOp::MoveByMotions
                | EditOp::YankLines
                | EditOp::YankByMotions
                | EditOp::YankByTextObject
                | EditOp::YankSelections
                | EditOp::SelectByTextObject
                | EditOp::ShrinkToPrimaryActive
                | EditOp::ShrinkToActives
                | EditOp::ShrinkToStarts
                | EditOp::ShrinkToEnds
                | EditOp::ExpandToOne
                | EditOp::ExpandToLines
                | EditOp::ValidateSelections
                | EditOp::NativeEscape
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            EditOp::MoveByMotions => "move",
            EditOp::DeleteByMotions => "delete by motions",
            EditOp::DeleteByTextObject => "delete text object",
            EditOp::DeleteSelectionsOrRight => "delete right",
            EditOp::DeleteSelectionsOrLeft => "delete left",
            EditOp::DeleteLines => "delete lines",
            EditOp::DeleteLeft => "backspace",
            EditOp::DeleteRight => "delete",
            EditOp::InsertText => "insert",
            EditOp::InsertTab => "tab",
            EditOp::OverwriteText => "overwrite",
            EditOp::NewLineAfter => "open line below",
            EditOp::NewLineBefore => "open line above",
            EditOp::ReplaceChars => "replace",
            EditOp::ReplaceSelectionsWithChar => "replace selections",
            EditOp::SwitchCase => "switch case",
            EditOp::SwitchCaseSelections => "switch case of selections",
            EditOp::LowerCaseSelections => "lowercase",
            EditOp::UpperCaseSelections => "uppercase",
            EditOp::YankLines => "yank lines",
            EditOp::YankByMotions => "yank by motions",
            EditOp::YankByTextObject => "yank text object",
            EditOp::YankSelections => "yank selections",
            EditOp::PutAfter => "put after",
            EditOp::PutBefore => "put before",
            EditOp::ReplaceSelectionsWithRegister => "put over selections",
            EditOp::JoinLines => "join lines",
            EditOp::Indent => "indent",
            EditOp::Outdent => "outdent",
            EditOp::SelectByTextObject => "select text object",
            EditOp::ShrinkToPrimaryActive => "keep primary cursor",
            EditOp::ShrinkToActives => "collapse to cursors",
            EditOp::ShrinkToStarts => "collapse to starts",
            EditOp::ShrinkToEnds => "collapse to ends",
            EditOp::ExpandToOne => "select character",
            EditOp::ExpandToLines => "select lines",
            EditOp::ValidateSelections => "validate",
            EditOp::NativeEscape => "escape",
        }
    }
}

type CustomFn = dyn Fn(&ActionArgs) -> LocalBoxFuture<'static, Result<()>>;

/// A host supplied asynchronous action.
#[derive(Clone)]
pub struct CustomAction {
    pub name: String,
    run: Rc<CustomFn>,
}

impl CustomAction {
    pub fn new(
        name: impl Into<String>,
        run: impl Fn(&ActionArgs) -> LocalBoxFuture<'static, Result<()>> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            run: Rc::new(run),
        }
    }

    pub fn call(&self, args: &ActionArgs) -> LocalBoxFuture<'static, Result<()>> {
        (self.run)(args)
    }
}

impl fmt::Debug for CustomAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomAction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum Op {
    Edit(EditOp),
    SwitchMode(ModeId),
    /// Replays the last recorded change.
    Repeat,
    Custom(CustomAction),
}

/// One step of a binding.
#[derive(Debug, Clone)]
pub struct Action {
    pub op: Op,
    pub is_change: bool,
    /// Left out when the binding is recorded for `.`.
    pub should_skip_on_repeat: bool,
}

impl Action {
    pub fn edit(op: EditOp) -> Self {
        Self {
            op: Op::Edit(op),
            is_change: op.is_change(),
            should_skip_on_repeat: false,
        }
    }

    /// Entering Insert or Replace counts as a change so the command that
    /// led there is recorded.
    pub fn switch_mode(mode: ModeId) -> Self {
        Self {
            op: Op::SwitchMode(mode),
            is_change: mode.is_insert_like(),
            should_skip_on_repeat: true,
        }
    }

    pub fn repeat() -> Self {
        Self {
            op: Op::Repeat,
            is_change: false,
            should_skip_on_repeat: true,
        }
    }

    pub fn custom(
        name: impl Into<String>,
        is_change: bool,
        run: impl Fn(&ActionArgs) -> LocalBoxFuture<'static, Result<()>> + 'static,
    ) -> Self {
        Self {
            op: Op::Custom(CustomAction::new(name, run)),
            is_change,
            should_skip_on_repeat: false,
        }
    }

    pub fn skip_on_repeat(mut self) -> Self {
        self.should_skip_on_repeat = true;
        self
    }

    pub fn label(&self) -> String {
        match &self.op {
            Op::Edit(op) => op.label().to_string(),
            Op::SwitchMode(mode) => format!("switch to {}", mode),
            Op::Repeat => "repeat".to_string(),
            Op::Custom(custom) => custom.name.clone(),
        }
    }
}

/// Arguments handed to every action of a binding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionArgs {
    pub count: Option<usize>,
    pub character: Option<char>,
    pub motions: Vec<Motion>,
    pub text_object: Option<TextObject>,
    pub text: Option<String>,
    pub replace_count: Option<usize>,
    pub should_yank: bool,
    pub no_empty_at_line_end: bool,
    pub is_visual_mode: bool,
    pub is_visual_line_mode: bool,
    pub is_selection: bool,
    /// Deleting for a change: `c w` stops at the end of the word.
    pub is_change_action: bool,
}

impl ActionArgs {
    /// Chord arguments with the binding defaults laid over them.
    pub fn merged(chord: ChordArgs, defaults: &ActionArgs) -> Self {
        let mut args = ActionArgs {
            count: chord.count,
            character: chord.character,
            motions: chord.motions,
            text_object: chord.text_object,
            ..Default::default()
        };
        args.overlay(defaults);
        args
    }

    fn overlay(&mut self, defaults: &ActionArgs) {
        if defaults.count.is_some() {
            self.count = defaults.count;
        }
        if defaults.character.is_some() {
            self.character = defaults.character;
        }
        if !defaults.motions.is_empty() {
            self.motions = defaults.motions.clone();
        }
        if defaults.text_object.is_some() {
            self.text_object = defaults.text_object;
        }
        if defaults.text.is_some() {
            self.text = defaults.text.clone();
        }
        if defaults.replace_count.is_some() {
            self.replace_count = defaults.replace_count;
        }
        self.should_yank |= defaults.should_yank;
        self.no_empty_at_line_end |= defaults.no_empty_at_line_end;
        self.is_visual_mode |= defaults.is_visual_mode;
        self.is_visual_line_mode |= defaults.is_visual_line_mode;
        self.is_selection |= defaults.is_selection;
        self.is_change_action |= defaults.is_change_action;
    }

    /// Tags the arguments with the mode they run in.
    pub fn in_mode(mut self, mode: ModeId) -> Self {
        self.is_visual_mode |= mode == ModeId::Visual;
        self.is_visual_line_mode |= mode == ModeId::VisualLine;
        self
    }

    /// Count or one.
    pub fn n(&self) -> usize {
        self.count.unwrap_or(1).max(1)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn motions(motions: Vec<Motion>) -> Self {
        Self {
            motions,
            ..Default::default()
        }
    }
}

/// A chord's action list and default arguments.
#[derive(Debug, Clone)]
pub struct Binding {
    pub keys: String,
    pub actions: Vec<Action>,
    pub args: ActionArgs,
    /// Set on recorded copies replayed by `.`.
    pub is_repeating: bool,
    pub description: Option<String>,
}

impl Binding {
    pub fn new(keys: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            keys: keys.into(),
            actions,
            args: ActionArgs::default(),
            is_repeating: false,
            description: None,
        }
    }

    pub fn with_args(mut self, args: ActionArgs) -> Self {
        self.args = args;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// True when any action changes the buffer.
    pub fn is_change(&self) -> bool {
        self.actions.iter().any(|a| a.is_change)
    }

    /// A copy for replay: skipped actions removed, tagged as repeating.
    pub fn stripped(&self) -> Binding {
        Binding {
            keys: self.keys.clone(),
            actions: self
                .actions
                .iter()
                .filter(|a| !a.should_skip_on_repeat)
                .cloned()
                .collect(),
            args: self.args.clone(),
            is_repeating: true,
            description: self.description.clone(),
        }
    }

    /// Text shown for the binding in listings.
    pub fn summary(&self) -> String {
        match &self.description {
            Some(d) => d.clone(),
            None => self
                .actions
                .iter()
                .map(Action::label)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}
