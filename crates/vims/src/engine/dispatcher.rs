//! The single-flight dispatch loop.
//!
//! Keys are matched into bindings, bindings wait in a queue and run one at a
//! time, each action awaited before the next starts. While an action is in
//! flight the loop keeps taking events off its channel; they wait in a
//! backlog and are handled, in arrival order, once the binding is done, so a
//! mode switch made by the binding applies to the keys typed behind it.

use std::collections::VecDeque;
use std::future::Future;

use anyhow::{anyhow, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use vims_chord::{char_token, Motion, MotionKind};

use super::machine::{Feed, ModeMachine, Pending};
use super::record::{Recorder, Settle};
use crate::actions::{self, ActionContext};
use crate::config::Config;
use crate::error::VimError;
use crate::host::{registers_for, Editor, NullStatus, Registers, Selection, StatusSurface};
use crate::vim::{Action, ActionArgs, CommandTable, EditOp, ModeId, Op};

/// Everything the host tells the engine.
#[derive(Debug, Clone)]
pub enum Event {
    /// One key token, such as `d`, `escape` or `ctrl+c`.
    Key(String),
    /// Text typed or pasted natively.
    Text(String),
    /// Treat the keys typed so far as a complete chord.
    CommitInput,
    SelectionChanged,
    ActiveEditorChanged,
    ConfigChanged(Config),
    Shutdown,
}

/// Sends events to a running [`Dispatcher`].
#[derive(Debug, Clone)]
pub struct Handle {
    tx: mpsc::UnboundedSender<Event>,
}

impl Handle {
    pub fn send(&self, event: Event) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| anyhow!("dispatcher has stopped"))
    }

    pub fn key(&self, token: impl Into<String>) -> Result<()> {
        self.send(Event::Key(token.into()))
    }

    pub fn text(&self, text: impl Into<String>) -> Result<()> {
        self.send(Event::Text(text.into()))
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send(Event::Shutdown)
    }
}

/// Creates the event channel of a dispatcher.
pub fn channel() -> (Handle, mpsc::UnboundedReceiver<Event>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Handle { tx }, rx)
}

/// Counters kept by the dispatcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Bindings that ran to completion.
    pub executed: usize,
    /// Bindings stopped by a failing action.
    pub rejected: usize,
    /// Queued bindings and inputs thrown away after a rejection.
    pub aborted: usize,
}

/// Events received while an action was in flight.
#[derive(Debug, Default)]
struct Inbox {
    events: Option<mpsc::UnboundedReceiver<Event>>,
    backlog: VecDeque<Event>,
    /// Notifications wait until the queue is drained.
    deferred: VecDeque<Event>,
}

impl Inbox {
    /// Awaits `fut`, moving events that arrive meanwhile to the backlog.
    async fn settle<F>(&mut self, fut: F) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        tokio::pin!(fut);
        loop {
            let Some(events) = self.events.as_mut() else {
                return fut.await;
            };
            let closed = tokio::select! {
                biased;
                result = &mut fut => return result,
                event = events.recv() => match event {
                    Some(event) => {
                        self.backlog.push_back(event);
                        false
                    }
                    None => true,
                },
            };
            if closed {
                self.events = None;
            }
        }
    }
}

/// Runs the engine against one host editor.
pub struct Dispatcher<E: Editor> {
    editor: E,
    registers: Box<dyn Registers>,
    status: Box<dyn StatusSurface>,
    config: Config,
    machine: ModeMachine,
    recorder: Recorder,
    inbox: Inbox,
    last_feed: Feed,
    shutdown: bool,
    stats: Stats,
}

impl<E: Editor> Dispatcher<E> {
    pub fn new(editor: E, config: Config) -> Self {
        Self {
            editor,
            registers: registers_for(&config.clipboard),
            status: Box::new(NullStatus),
            machine: ModeMachine::new(config.editor.default_mode),
            config,
            recorder: Recorder::new(),
            inbox: Inbox::default(),
            last_feed: Feed::Failed,
            shutdown: false,
            stats: Stats::default(),
        }
    }

    pub fn with_status(mut self, status: impl StatusSurface + 'static) -> Self {
        self.status = Box::new(status);
        self
    }

    pub fn with_registers(mut self, registers: Box<dyn Registers>) -> Self {
        self.registers = registers;
        self
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    pub fn into_editor(self) -> E {
        self.editor
    }

    pub fn mode(&self) -> ModeId {
        self.machine.mode()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown
    }

    /// The command table of `mode`, for adding or replacing chords.
    pub fn table_mut(&mut self, mode: ModeId) -> &mut CommandTable {
        self.machine.table_mut(mode)
    }

    /// Sets up the configured default mode.
    pub async fn start(&mut self) {
        let mode = self.machine.mode();
        if let Err(err) = self.enter_mode(mode).await {
            warn!(error = %format!("{:#}", err), "mode setup failed");
        }
        self.status.mode_changed(mode.external());
        self.refresh_hint();
        info!(mode = %mode, "started");
    }

    /// Handles events from `events` until a shutdown event or until every
    /// sender is gone.
    pub async fn run(mut self, events: mpsc::UnboundedReceiver<Event>) -> Self {
        self.inbox.events = Some(events);
        self.start().await;
        while !self.shutdown {
            let Some(events) = self.inbox.events.as_mut() else {
                break;
            };
            let Some(event) = events.recv().await else {
                break;
            };
            self.dispatch(event).await;
        }
        self.inbox.events = None;
        info!(stats = ?self.stats, "stopped");
        self
    }

    /// Handles one event and everything it leads to.
    pub async fn dispatch(&mut self, event: Event) {
        self.inbox.backlog.push_back(event);
        self.drain().await;
    }

    pub async fn input(&mut self, token: &str) -> Feed {
        self.dispatch(Event::Key(token.to_string())).await;
        self.last_feed
    }

    pub async fn type_text(&mut self, text: &str) -> Feed {
        self.dispatch(Event::Text(text.to_string())).await;
        self.last_feed
    }

    pub async fn commit_input(&mut self) -> Feed {
        self.dispatch(Event::CommitInput).await;
        self.last_feed
    }

    pub async fn selection_changed(&mut self) {
        self.dispatch(Event::SelectionChanged).await;
    }

    pub async fn active_editor_changed(&mut self) {
        self.dispatch(Event::ActiveEditorChanged).await;
    }

    pub async fn configure(&mut self, config: Config) {
        self.dispatch(Event::ConfigChanged(config)).await;
    }

    /// Runs queued bindings, then the backlog, then deferred notifications,
    /// until all three are empty.
    ///
    /// A selection change made along the way is handled like a host
    /// notification once everything else is done.
    async fn drain(&mut self) {
        let mut seen = self.editor.selections();
        loop {
            if self.shutdown {
                return;
            }
            if let Some(pending) = self.machine.pop_pending() {
                self.execute(pending).await;
                continue;
            }
            if let Some(event) = self.inbox.backlog.pop_front() {
                match event {
                    Event::Key(token) => self.feed(|m| m.input(&token)),
                    Event::Text(text) if !self.machine.mode().is_insert_like() => {
                        // Each key is matched in the mode left by the keys before it.
                        for c in text.chars().rev() {
                            self.inbox.backlog.push_front(Event::Key(char_token(c)));
                        }
                    }
                    Event::Text(text) => self.feed(|m| m.type_text(&text)),
                    Event::CommitInput => self.feed(ModeMachine::commit),
                    other => self.inbox.deferred.push_back(other),
                }
                continue;
            }
            if let Some(event) = self.inbox.deferred.pop_front() {
                self.notify(event).await;
                continue;
            }
            let now = self.editor.selections();
            if now != seen {
                seen = now;
                self.inbox.deferred.push_back(Event::SelectionChanged);
                continue;
            }
            break;
        }
    }

    fn feed(&mut self, f: impl FnOnce(&mut ModeMachine) -> Feed) {
        let feed = f(&mut self.machine);
        self.last_feed = feed;
        self.refresh_hint();
        if self.config.suggestions.enabled && feed == Feed::Waiting {
            let suggestions = self.machine.suggestions();
            self.status.show_suggestions(&suggestions);
        } else {
            self.status.hide_suggestions();
        }
    }

    fn refresh_hint(&mut self) {
        let hint = self.machine.hint();
        self.status.set_hint(&hint);
    }

    async fn notify(&mut self, event: Event) {
        let result = match event {
            Event::SelectionChanged => self.apply_selection_rule(false).await,
            Event::ActiveEditorChanged => self.switch_for_new_editor().await,
            Event::ConfigChanged(config) => {
                self.apply_config(config);
                Ok(())
            }
            Event::Shutdown => {
                self.shutdown = true;
                Ok(())
            }
            input @ (Event::Key(_) | Event::Text(_) | Event::CommitInput) => {
                self.inbox.backlog.push_back(input);
                Ok(())
            }
        };
        if let Err(err) = result {
            warn!(error = %format!("{:#}", err), "notification failed");
        }
    }

    /// Runs one binding. Its first failing action stops it and throws away
    /// everything queued behind it.
    async fn execute(&mut self, pending: Pending) {
        let Pending { binding, args } = pending;
        let is_change = binding.is_change();
        if is_change {
            self.recorder
                .before_change(self.machine.mode(), &binding, &args, &self.editor);
        }

        for action in &binding.actions {
            let Err(source) = self.run_action(action, &args).await else {
                continue;
            };
            if VimError::is_no_active_context(&source) {
                continue;
            }
            let cause = format!("{:#}", source);
            let err = VimError::ActionRejected {
                action: action.label(),
                source,
            };
            warn!(keys = %binding.keys, cause = %cause, "{}", err);
            self.abort();
            return;
        }

        if is_change {
            self.recorder.after_change(&self.editor);
        } else if self.machine.mode().is_insert_like() {
            self.recorder.end_session_if_line_changed(&self.editor);
        }
        if self.machine.mode() == ModeId::Normal {
            if let Err(err) = self
                .run_quiet(EditOp::ValidateSelections, ActionArgs::default())
                .await
            {
                warn!(error = %format!("{:#}", err), "validation failed");
            }
        }
        self.stats.executed += 1;
    }

    fn abort(&mut self) {
        let mut dropped = self.machine.clear_pending();
        for event in std::mem::take(&mut self.inbox.backlog) {
            match event {
                Event::Key(_) | Event::Text(_) | Event::CommitInput => dropped += 1,
                other => self.inbox.deferred.push_back(other),
            }
        }
        self.stats.rejected += 1;
        self.stats.aborted += dropped;
        if dropped > 0 {
            debug!(dropped, "discarded queued input");
        }
        self.refresh_hint();
    }

    async fn run_action(&mut self, action: &Action, args: &ActionArgs) -> Result<()> {
        match &action.op {
            Op::Edit(op) => self.run_op(*op, args).await,
            Op::SwitchMode(mode) => self.switch_mode(*mode, true).await,
            Op::Repeat => self.repeat(args).await,
            Op::Custom(custom) => self.inbox.settle(custom.call(args)).await,
        }
    }

    async fn run_op(&mut self, op: EditOp, args: &ActionArgs) -> Result<()> {
        let cx = ActionContext {
            editor: &mut self.editor,
            registers: self.registers.as_mut(),
            config: &self.config.editor,
            mode: self.machine.mode(),
        };
        self.inbox.settle(actions::run(op, args, cx)).await
    }

    /// Runs a housekeeping operation; a missing document is not an error.
    async fn run_quiet(&mut self, op: EditOp, args: ActionArgs) -> Result<()> {
        let args = args.in_mode(self.machine.mode());
        match self.run_op(op, &args).await {
            Err(err) if VimError::is_no_active_context(&err) => Ok(()),
            other => other,
        }
    }

    /// Replays the last recorded change `n` times.
    async fn repeat(&mut self, args: &ActionArgs) -> Result<()> {
        let unit = self.recorder.last_change().to_vec();
        if unit.is_empty() {
            return Ok(());
        }
        let settle = self.recorder.settle();
        debug!(bindings = unit.len(), times = args.n(), ?settle, "repeating last change");

        for _ in 0..args.n() {
            let mut before_last = Vec::new();
            for (i, recorded) in unit.iter().enumerate() {
                if i + 1 == unit.len() {
                    before_last = self.editor.selections();
                }
                if let Some(extent) = recorded.extent {
                    extent.restore(&mut self.editor, recorded.args.is_visual_line_mode);
                }
                for action in &recorded.binding.actions {
                    match &action.op {
                        Op::Edit(op) => self.run_op(*op, &recorded.args).await?,
                        Op::Custom(custom) => {
                            self.inbox.settle(custom.call(&recorded.args)).await?
                        }
                        Op::SwitchMode(_) | Op::Repeat => {}
                    }
                }
            }
            match settle {
                Settle::Stay => {}
                Settle::StepLeft => {
                    self.run_quiet(EditOp::MoveByMotions, step_left()).await?;
                }
                Settle::LeftOfLastMove => {
                    self.editor.set_selections(before_last);
                    self.run_quiet(EditOp::MoveByMotions, step_left()).await?;
                }
            }
            self.run_quiet(EditOp::ValidateSelections, ActionArgs::default())
                .await?;
        }
        Ok(())
    }

    /// Leaves the current mode for `to`.
    ///
    /// `step_back` is set when a command asked for the switch, as opposed
    /// to the host changing documents; only then does leaving Insert move
    /// the cursor back onto the last typed character.
    async fn switch_mode(&mut self, to: ModeId, step_back: bool) -> Result<()> {
        let from = self.machine.mode();
        if from == ModeId::Visual
            && to == ModeId::VisualLine
            && self.editor.selections().iter().all(Selection::is_empty)
        {
            return Ok(());
        }

        self.recorder.mode_switched(from, to, &self.editor);
        self.exit_mode(from, to, step_back).await?;
        let dropped = self.machine.enter(to);
        if dropped > 0 {
            debug!(dropped, "queued bindings dropped on mode change");
        }
        self.enter_mode(to).await?;
        self.status.mode_changed(to.external());
        self.refresh_hint();
        debug!(from = %from, to = %to, "mode changed");
        Ok(())
    }

    async fn exit_mode(&mut self, from: ModeId, to: ModeId, step_back: bool) -> Result<()> {
        match from {
            ModeId::Normal => {
                self.status
                    .set_cursor_style(self.config.editor.insert_cursor_style);
                Ok(())
            }
            ModeId::Insert | ModeId::Replace if step_back && !to.is_insert_like() => {
                self.run_quiet(EditOp::MoveByMotions, step_left()).await
            }
            _ => Ok(()),
        }
    }

    async fn enter_mode(&mut self, to: ModeId) -> Result<()> {
        let relative = self.config.editor.smart_relative_line_numbers;
        match to {
            ModeId::Normal => {
                self.status.set_cursor_style(self.config.editor.cursor_style);
                if relative {
                    self.status.set_relative_line_numbers(true);
                }
                self.run_quiet(EditOp::ValidateSelections, ActionArgs::default())
                    .await
            }
            ModeId::Visual | ModeId::VisualLine => {
                if relative {
                    self.status.set_relative_line_numbers(true);
                }
                let op = if to == ModeId::Visual {
                    EditOp::ExpandToOne
                } else {
                    EditOp::ExpandToLines
                };
                self.run_quiet(op, ActionArgs::default()).await
            }
            ModeId::Insert | ModeId::Replace => {
                self.status
                    .set_cursor_style(self.config.editor.insert_cursor_style);
                if relative {
                    self.status.set_relative_line_numbers(false);
                }
                Ok(())
            }
        }
    }

    /// Picks the mode the selections call for.
    ///
    /// Insert and Replace never switch on their own. Any other mode becomes
    /// Normal when every selection is empty and Visual otherwise, except
    /// that VisualLine stays VisualLine. `forced` switches even when the
    /// mode would not change.
    async fn apply_selection_rule(&mut self, forced: bool) -> Result<()> {
        if !self.editor.has_document() {
            return Ok(());
        }
        let current = self.machine.mode();
        if current.is_insert_like() && !forced {
            self.recorder.end_session_if_line_changed(&self.editor);
            return Ok(());
        }

        let empty = self.editor.selections().iter().all(Selection::is_empty);
        let target = if empty {
            ModeId::Normal
        } else if current == ModeId::VisualLine {
            ModeId::VisualLine
        } else {
            ModeId::Visual
        };

        if target == current && !forced {
            self.run_quiet(EditOp::ValidateSelections, ActionArgs::default())
                .await
        } else {
            self.switch_mode(target, false).await
        }
    }

    async fn switch_for_new_editor(&mut self) -> Result<()> {
        self.recorder.discard_session();
        if self.config.editor.default_mode == ModeId::Insert {
            self.switch_mode(ModeId::Insert, false).await
        } else {
            self.apply_selection_rule(true).await
        }
    }

    fn apply_config(&mut self, config: Config) {
        if config.clipboard != self.config.clipboard {
            self.registers = registers_for(&config.clipboard);
        }
        self.config = config;

        let mode = self.machine.mode();
        let editor = &self.config.editor;
        let style = if mode == ModeId::Normal {
            editor.cursor_style
        } else {
            editor.insert_cursor_style
        };
        self.status.set_cursor_style(style);
        if editor.smart_relative_line_numbers {
            self.status
                .set_relative_line_numbers(!mode.is_insert_like());
        }
        if !self.config.suggestions.enabled {
            self.status.hide_suggestions();
        }
        debug!("configuration updated");
    }
}

fn step_left() -> ActionArgs {
    ActionArgs::motions(vec![Motion::new(MotionKind::CharLeft)])
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use futures_util::FutureExt;
    use tokio::sync::Notify;

    use super::*;
    use crate::host::MemoryEditor;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    fn gated(name: &'static str, log: &Log, gate: &Rc<Notify>, fail: bool) -> Action {
        let (log, gate) = (Rc::clone(log), Rc::clone(gate));
        Action::custom(name, false, move |_| {
            let (log, gate) = (Rc::clone(&log), Rc::clone(&gate));
            async move {
                gate.notified().await;
                if fail {
                    anyhow::bail!("{} failed", name);
                }
                log.borrow_mut().push(name);
                Ok(())
            }
            .boxed_local()
        })
    }

    fn quick(name: &'static str, log: &Log) -> Action {
        let log = Rc::clone(log);
        Action::custom(name, false, move |_| {
            log.borrow_mut().push(name);
            futures_util::future::ready(Ok(())).boxed_local()
        })
    }

    fn dispatcher(log: &Log, gate: &Rc<Notify>, fail: bool) -> Dispatcher<MemoryEditor> {
        let mut dispatcher = Dispatcher::new(MemoryEditor::new("abc"), Config::default());
        dispatcher
            .table_mut(ModeId::Normal)
            .map("q", vec![gated("q", log, gate, fail)])
            .map("Q", vec![quick("Q", log)]);
        dispatcher
    }

    #[tokio::test]
    async fn test_keys_typed_during_an_action_run_after_it() {
        let log = Log::default();
        let gate = Rc::new(Notify::new());
        let dispatcher = dispatcher(&log, &gate, false);
        let (handle, events) = channel();
        for key in ["q", "Q", "Q"] {
            handle.key(key).unwrap();
        }

        let driver = async {
            tokio::task::yield_now().await;
            assert!(log.borrow().is_empty());
            gate.notify_one();
            handle.shutdown().unwrap();
        };
        let (dispatcher, ()) = tokio::join!(dispatcher.run(events), driver);

        assert_eq!(*log.borrow(), vec!["q", "Q", "Q"]);
        assert_eq!(dispatcher.stats().executed, 3);
        assert!(dispatcher.is_shutdown());
    }

    #[tokio::test]
    async fn test_rejection_discards_the_queue() {
        let log = Log::default();
        let gate = Rc::new(Notify::new());
        let dispatcher = dispatcher(&log, &gate, true);
        let (handle, events) = channel();
        for key in ["q", "Q", "Q"] {
            handle.key(key).unwrap();
        }

        let driver = async {
            tokio::task::yield_now().await;
            gate.notify_one();
            handle.shutdown().unwrap();
        };
        let (dispatcher, ()) = tokio::join!(dispatcher.run(events), driver);

        assert!(log.borrow().is_empty());
        assert_eq!(
            dispatcher.stats(),
            Stats {
                executed: 0,
                rejected: 1,
                aborted: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_later_keys_continue_after_a_rejection() {
        let log = Log::default();
        let gate = Rc::new(Notify::new());
        let mut dispatcher = dispatcher(&log, &gate, true);
        gate.notify_one();
        dispatcher.input("q").await;
        dispatcher.input("Q").await;
        assert_eq!(*log.borrow(), vec!["Q"]);
        assert_eq!(dispatcher.stats().rejected, 1);
    }

    #[tokio::test]
    async fn test_no_document_is_not_a_rejection() {
        let mut editor = MemoryEditor::new("abc");
        editor.set_has_document(false);
        let mut dispatcher = Dispatcher::new(editor, Config::default());
        dispatcher.input("x").await;
        assert_eq!(dispatcher.stats().rejected, 0);
        assert_eq!(dispatcher.stats().executed, 1);
        assert_eq!(dispatcher.editor().text(), "abc");
    }

    #[tokio::test]
    async fn test_handle_fails_once_stopped() {
        let (handle, events) = channel();
        drop(events);
        assert!(handle.key("x").is_err());
    }
}
