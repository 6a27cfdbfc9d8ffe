//! Interactive session shell
//!
//! One shell is one session: the list is loaded from session storage when
//! the shell starts and everything is gone when the process exits. Each input
//! line is parsed into a [`Command`], applied to the [`TodoList`], and any new
//! save failure is handed to the notification surface. Dismissals come back
//! through a channel carrying the notice id.

use crate::command::{self, Command, HELP};
use crate::controller::{Outcome, TodoList};
use crate::formatting;
use crate::ids::IdGenerator;
use crate::notification::NotificationSurface;
use crate::storage::SessionStore;
use anyhow::{Context, Result};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// Text printed in response to a line, and whether the session should end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub output: String,
    pub quit: bool,
}

impl Reply {
    fn text(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            quit: false,
        }
    }
}

/// Session shell over a todo list and a notification surface
pub struct Shell<S, G, N> {
    list: TodoList<S, G>,
    surface: N,
    notification_duration: Duration,
    dismissals: UnboundedSender<u64>,
}

impl<S, G, N> Shell<S, G, N>
where
    S: SessionStore,
    G: IdGenerator,
    N: NotificationSurface,
{
    /// Create a shell; the receiver yields ids of dismissed notices
    pub fn new(
        list: TodoList<S, G>,
        surface: N,
        notification_duration: Duration,
    ) -> (Self, UnboundedReceiver<u64>) {
        let (dismissals, receiver) = mpsc::unbounded_channel();
        let shell = Self {
            list,
            surface,
            notification_duration,
            dismissals,
        };
        (shell, receiver)
    }

    /// Load the list from session storage
    pub fn start(&mut self) {
        self.list.initialize();
        self.present_notice();
    }

    /// Parse and execute one input line
    pub fn handle_line(&mut self, line: &str) -> Reply {
        let reply = match command::parse(line) {
            Ok(command) => self.execute(command),
            Err(e) => Reply::text(e.to_string()),
        };
        self.present_notice();
        reply
    }

    /// Execute a parsed command
    pub fn execute(&mut self, command: Command) -> Reply {
        match command {
            Command::Add { title, description } => {
                let item = self.list.add(title, description);
                Reply::text(format!("Todo created with ID: {}", item.id))
            }
            Command::Edit { id, patch } => {
                let outcome = self.list.edit(&id, patch);
                Reply::text(self.describe(&id, outcome, "updated"))
            }
            Command::Toggle { id } => {
                let outcome = self.list.toggle_completion(&id);
                let done = self.list.get(&id).is_some_and(|item| item.completed);
                let action = if done { "marked completed" } else { "marked open" };
                Reply::text(self.describe(&id, outcome, action))
            }
            Command::Delete { id } => {
                let outcome = self.list.delete(&id);
                Reply::text(self.describe(&id, outcome, "deleted"))
            }
            Command::List { keyword } => {
                let output = match keyword {
                    Some(keyword) => formatting::format_todos(formatting::apply_keyword_filter(
                        self.list.items(),
                        &keyword,
                    )),
                    None => formatting::format_todos(self.list.items()),
                };
                Reply::text(output)
            }
            Command::Acknowledge => {
                if self.list.notice().is_some() {
                    self.surface.acknowledge();
                    Reply::text("Notification dismissed")
                } else {
                    Reply::text("No notification to dismiss")
                }
            }
            Command::Help => Reply::text(HELP),
            Command::Quit => Reply {
                output: "Session ended, todos discarded".to_string(),
                quit: true,
            },
        }
    }

    /// Clear the notice a dismissal was sent for
    pub fn on_dismissed(&mut self, notice_id: u64) {
        if self.list.dismiss_notice(notice_id) {
            debug!(notice_id, "notice dismissed");
        }
    }

    pub fn list(&self) -> &TodoList<S, G> {
        &self.list
    }

    /// Read commands from `input` until it ends or `quit` is entered
    pub async fn run<R>(mut self, input: R, mut dismissals: UnboundedReceiver<u64>) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        self.start();
        println!("Todo session started. Type 'help' for commands.");

        let mut lines = input.lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read input")? else {
                        break;
                    };
                    let reply = self.handle_line(&line);
                    if !reply.output.is_empty() {
                        println!("{}", reply.output);
                    }
                    if reply.quit {
                        break;
                    }
                }
                Some(notice_id) = dismissals.recv() => self.on_dismissed(notice_id),
            }
        }
        Ok(())
    }

    fn describe(&self, id: &str, outcome: Outcome, action: &str) -> String {
        match outcome {
            Outcome::Applied => format!("Todo {} {}", id, action),
            Outcome::NotFound => format!(
                "No todo with ID '{}'. Use list to see available todos.",
                id
            ),
        }
    }

    fn present_notice(&mut self) {
        let Some(notice) = self.list.unshown_notice() else {
            return;
        };
        let notice_id = notice.id;
        let notification = notice.to_notification(self.notification_duration);
        let dismissals = self.dismissals.clone();
        self.surface.show(
            notification,
            Box::new(move || {
                // The receiver is gone only when the session is over
                let _ = dismissals.send(notice_id);
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{STORAGE_KEY, SaveError};
    use crate::ids::SequentialIds;
    use crate::notification::{DismissCallback, Notification};
    use crate::storage::MemorySessionStore;

    /// Surface that records what it was asked to show
    #[derive(Default)]
    struct RecordingSurface {
        shown: Vec<Notification>,
        pending: Option<DismissCallback>,
    }

    impl NotificationSurface for RecordingSurface {
        fn show(&mut self, notification: Notification, on_dismiss: DismissCallback) {
            if let Some(previous) = self.pending.take() {
                previous();
            }
            self.shown.push(notification);
            self.pending = Some(on_dismiss);
        }

        fn acknowledge(&mut self) {
            if let Some(callback) = self.pending.take() {
                callback();
            }
        }
    }

    type TestShell = Shell<MemorySessionStore, SequentialIds, RecordingSurface>;

    fn get_test_shell(quota: usize) -> (TestShell, UnboundedReceiver<u64>) {
        let list = TodoList::new(MemorySessionStore::with_quota(quota), SequentialIds::new());
        let (mut shell, rx) = Shell::new(
            list,
            RecordingSurface::default(),
            Duration::from_millis(6000),
        );
        shell.start();
        (shell, rx)
    }

    fn stored(shell: &TestShell) -> String {
        shell
            .list()
            .store()
            .get_item(STORAGE_KEY)
            .unwrap()
            .unwrap_or_default()
    }

    #[test]
    fn test_add_toggle_delete_flow() {
        let (mut shell, _rx) = get_test_shell(4096);

        let reply = shell.handle_line("add Buy milk | Oat");
        assert_eq!(reply.output, "Todo created with ID: #1");
        assert!(!reply.quit);
        assert!(stored(&shell).contains("\"title\":\"Buy milk\""));

        assert_eq!(shell.handle_line("toggle #1").output, "Todo #1 marked completed");
        assert_eq!(shell.handle_line("toggle #1").output, "Todo #1 marked open");

        let listing = shell.handle_line("list").output;
        assert!(listing.contains("- [ ] Buy milk (#1)"));

        assert_eq!(shell.handle_line("delete #1").output, "Todo #1 deleted");
        assert_eq!(stored(&shell), "[]");
        assert_eq!(shell.handle_line("list").output, "No todos found");
    }

    #[test]
    fn test_edit_and_keyword_list() {
        let (mut shell, _rx) = get_test_shell(4096);
        shell.handle_line("add Buy milk");
        shell.handle_line("add Call John");

        let reply = shell.handle_line(r#"edit #2 description="About the lease""#);
        assert_eq!(reply.output, "Todo #2 updated");

        let listing = shell.handle_line("list lease").output;
        assert!(listing.starts_with("1 todo(s)"));
        assert!(listing.contains("Call John"));
        assert!(!listing.contains("Buy milk"));
    }

    #[test]
    fn test_unknown_id_reports_but_still_saves() {
        let (mut shell, _rx) = get_test_shell(4096);
        shell.handle_line("add Only");
        shell.list.store_mut().remove_item(STORAGE_KEY).unwrap();

        let reply = shell.handle_line("toggle #9");
        assert_eq!(
            reply.output,
            "No todo with ID '#9'. Use list to see available todos."
        );
        assert!(stored(&shell).contains("\"title\":\"Only\""));
    }

    #[test]
    fn test_parse_errors_are_replies() {
        let (mut shell, _rx) = get_test_shell(4096);
        let reply = shell.handle_line("frobnicate");
        assert!(reply.output.starts_with("Unknown command 'frobnicate'"));
        assert!(shell.handle_line("quit").quit);
    }

    #[test]
    fn test_save_failure_is_shown_once_and_dismissed() {
        let (mut shell, mut rx) = get_test_shell(8);

        shell.handle_line("add Too big for the quota");
        assert_eq!(shell.surface.shown.len(), 1);
        assert_eq!(
            shell.surface.shown[0].message,
            SaveError::QuotaExceeded.to_string()
        );
        assert_eq!(shell.list().len(), 1);

        // Not shown again on the next command
        shell.handle_line("list");
        assert_eq!(shell.surface.shown.len(), 1);

        assert_eq!(shell.handle_line("ok").output, "Notification dismissed");
        let notice_id = rx.try_recv().unwrap();
        shell.on_dismissed(notice_id);
        assert!(shell.list().notice().is_none());
        assert_eq!(shell.handle_line("ok").output, "No notification to dismiss");

        // A new failure produces a new notification
        shell.handle_line("add Also too big");
        assert_eq!(shell.surface.shown.len(), 2);
    }

    #[test]
    fn test_superseded_notice_dismissal_is_ignored() {
        let (mut shell, mut rx) = get_test_shell(8);
        shell.handle_line("add First failure");
        shell.handle_line("add Second failure");

        // Showing the second released the first
        let first = rx.try_recv().unwrap();
        shell.on_dismissed(first);
        assert_eq!(shell.list().notice().map(|n| n.id), Some(2));
    }
}
