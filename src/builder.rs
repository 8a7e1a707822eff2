//! Session construction.
//!
//! [`SessionBuilder`] walks a [`SessionSpecification`] and issues the tmux
//! calls that realize it, in this order:
//!
//! 1. `create_session` with the first window's name. This creates window 0
//!    and pane 0 of window 0.
//! 2. For each window `i`:
//!    - `create_window` when `i > 0` (creates pane 0 of that window);
//!    - for each pane `j`: `split_pane` when `j > 0`, then `send_text` to
//!      `session:i.j`;
//!    - `select_layout` when the window has a layout.
//!
//! The build stops at the first failing call. Windows and panes created
//! before the failure are left in place.

use crate::error::{BuildError, Step};
use crate::spec::{Pane, SessionSpecification};
use crate::tmux::{Multiplexer, WindowTarget};
use tracing::debug;

/// Check that a spec can be built before any tmux call is made.
///
/// # Errors
///
/// [`BuildError::InvalidSpec`] if the session name is empty, there are no
/// windows, or some window has no panes.
pub fn validate(spec: &SessionSpecification) -> Result<(), BuildError> {
    if spec.session.is_empty() {
        return Err(BuildError::InvalidSpec("session name is empty".into()));
    }
    if spec.windows.is_empty() {
        return Err(BuildError::InvalidSpec(format!(
            "session {} has no windows",
            spec.session
        )));
    }
    if let Some((i, win)) = spec
        .windows
        .iter()
        .enumerate()
        .find(|(_, w)| w.panes.is_empty())
    {
        return Err(BuildError::InvalidSpec(format!(
            "window {} ({:?}) has no panes",
            i, win.name
        )));
    }
    Ok(())
}

/// Text typed into a pane: `cd <path> && <command>` when the pane has a
/// path, otherwise the command unchanged. Nothing is quoted.
pub fn compose_command(pane: &Pane) -> String {
    match pane.dir() {
        Some(dir) => format!("cd {} && {}", dir, pane.command),
        None => pane.command.clone(),
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}

/// Drives a [`Multiplexer`] to build sessions.
pub struct SessionBuilder<M> {
    mux: M,
}

impl<M: Multiplexer> SessionBuilder<M> {
    pub fn new(mux: M) -> Self {
        Self { mux }
    }

    /// The underlying multiplexer.
    pub fn multiplexer(&self) -> &M {
        &self.mux
    }

    pub fn into_inner(self) -> M {
        self.mux
    }

    /// Create the session described by `spec`.
    ///
    /// # Errors
    ///
    /// - [`BuildError::InvalidSpec`] if [`validate`] rejects the spec; no
    ///   tmux call is made.
    /// - [`BuildError::Step`] for the first tmux call that fails; no later
    ///   call is made.
    pub fn build(&mut self, spec: &SessionSpecification) -> Result<(), BuildError> {
        validate(spec)?;

        let session = spec.session.as_str();
        debug!(
            session,
            windows = spec.windows.len(),
            panes = spec.pane_count(),
            "building session"
        );

        self.mux
            .create_session(session, non_empty(&spec.windows[0].name))
            .map_err(|source| BuildError::Step {
                step: Step::CreateSession(session.to_string()),
                source,
            })?;

        for (i, win) in spec.windows.iter().enumerate() {
            let window = WindowTarget::new(session, i);

            if i > 0 {
                debug!(%window, name = %win.name, "creating window");
                self.mux
                    .create_window(session, non_empty(&win.name))
                    .map_err(|source| BuildError::Step {
                        step: Step::CreateWindow(win.name.clone()),
                        source,
                    })?;
            }

            for (j, pane) in win.panes.iter().enumerate() {
                if j > 0 {
                    debug!(%window, dir = ?pane.dir(), "splitting pane");
                    self.mux
                        .split_pane(&window, pane.dir())
                        .map_err(|source| BuildError::Step {
                            step: Step::SplitPane(window.to_string()),
                            source,
                        })?;
                }

                let target = window.pane(j);
                let text = compose_command(pane);
                debug!(pane = %target, %text, "sending command");
                self.mux
                    .send_text(&target, &text)
                    .map_err(|source| BuildError::Step {
                        step: Step::SendCommand(target.to_string()),
                        source,
                    })?;
            }

            if let Some(layout) = win.layout() {
                debug!(%window, layout, "selecting layout");
                self.mux
                    .select_layout(&window, layout)
                    .map_err(|source| BuildError::Step {
                        step: Step::SelectLayout(window.to_string()),
                        source,
                    })?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TmuxError;
    use crate::spec::Window;
    use crate::tmux::PaneTarget;
    use std::collections::HashSet;

    /// One recorded multiplexer call.
    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        NewSession(String, Option<String>),
        NewWindow(String, Option<String>),
        Split(String, Option<String>),
        Send(String, String),
        Layout(String, String),
    }

    /// In-memory multiplexer that records calls.
    ///
    /// Rejects a session name it has already created, and can be told to
    /// fail the n-th call (0-based).
    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
        sessions: HashSet<String>,
        fail_at: Option<usize>,
    }

    impl Recorder {
        fn failing_at(n: usize) -> Self {
            Self {
                fail_at: Some(n),
                ..Self::default()
            }
        }

        fn record(&mut self, call: Call) -> Result<(), TmuxError> {
            let n = self.calls.len();
            self.calls.push(call);
            if self.fail_at == Some(n) {
                return Err(TmuxError::Other(format!("call {} failed", n)));
            }
            Ok(())
        }

        fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|c| pred(*c)).count()
        }
    }

    impl Multiplexer for Recorder {
        fn create_session(&mut self, session: &str, name: Option<&str>) -> Result<(), TmuxError> {
            if !self.sessions.insert(session.to_string()) {
                return Err(TmuxError::Other(format!("duplicate session: {}", session)));
            }
            self.record(Call::NewSession(session.into(), name.map(String::from)))
        }

        fn create_window(&mut self, session: &str, name: Option<&str>) -> Result<(), TmuxError> {
            self.record(Call::NewWindow(session.into(), name.map(String::from)))
        }

        fn split_pane(&mut self, window: &WindowTarget, dir: Option<&str>) -> Result<(), TmuxError> {
            self.record(Call::Split(window.to_string(), dir.map(String::from)))
        }

        fn send_text(&mut self, pane: &PaneTarget, text: &str) -> Result<(), TmuxError> {
            self.record(Call::Send(pane.to_string(), text.into()))
        }

        fn select_layout(&mut self, window: &WindowTarget, layout: &str) -> Result<(), TmuxError> {
            self.record(Call::Layout(window.to_string(), layout.into()))
        }
    }

    fn pane(command: &str, path: Option<&str>) -> Pane {
        Pane {
            command: command.into(),
            path: path.map(String::from),
        }
    }

    fn window(name: &str, layout: Option<&str>, panes: Vec<Pane>) -> Window {
        Window {
            name: name.into(),
            layout: layout.map(String::from),
            panes,
        }
    }

    fn session(name: &str, windows: Vec<Window>) -> SessionSpecification {
        SessionSpecification {
            session: name.into(),
            windows,
        }
    }

    fn build(spec: &SessionSpecification) -> (Result<(), BuildError>, Vec<Call>) {
        let mut builder = SessionBuilder::new(Recorder::default());
        let result = builder.build(spec);
        (result, builder.into_inner().calls)
    }

    fn send(target: &str, text: &str) -> Call {
        Call::Send(target.into(), text.into())
    }

    #[test]
    fn test_single_window_single_pane() {
        let spec = session("s", vec![window("main", None, vec![pane("htop", None)])]);
        let (result, calls) = build(&spec);
        result.unwrap();
        assert_eq!(
            calls,
            vec![
                Call::NewSession("s".into(), Some("main".into())),
                send("s:0.0", "htop"),
            ]
        );
    }

    #[test]
    fn test_single_window_two_panes_with_layout() {
        let spec = session(
            "s",
            vec![window(
                "dev",
                Some("even-horizontal"),
                vec![pane("vim", Some("/a")), pane("make", Some("/b"))],
            )],
        );
        let (result, calls) = build(&spec);
        result.unwrap();
        assert_eq!(
            calls,
            vec![
                Call::NewSession("s".into(), Some("dev".into())),
                send("s:0.0", "cd /a && vim"),
                Call::Split("s:0".into(), Some("/b".into())),
                send("s:0.1", "cd /b && make"),
                Call::Layout("s:0".into(), "even-horizontal".into()),
            ]
        );
    }

    #[test]
    fn test_two_windows_single_pane_each() {
        let spec = session(
            "s",
            vec![
                window("first", None, vec![pane("a", None)]),
                window("logs", None, vec![pane("b", None)]),
            ],
        );
        let (result, calls) = build(&spec);
        result.unwrap();
        assert_eq!(
            calls,
            vec![
                Call::NewSession("s".into(), Some("first".into())),
                send("s:0.0", "a"),
                Call::NewWindow("s".into(), Some("logs".into())),
                send("s:1.0", "b"),
            ]
        );
    }

    #[test]
    fn test_empty_windows_is_rejected_before_any_call() {
        let (result, calls) = build(&session("s", vec![]));
        assert!(matches!(result, Err(BuildError::InvalidSpec(_))));
        assert!(calls.is_empty());
    }

    #[test]
    fn test_window_without_panes_is_rejected_before_any_call() {
        let spec = session(
            "s",
            vec![
                window("ok", None, vec![pane("a", None)]),
                window("empty", None, vec![]),
            ],
        );
        let (result, calls) = build(&spec);
        assert!(matches!(result, Err(BuildError::InvalidSpec(_))));
        assert!(calls.is_empty());
    }

    #[test]
    fn test_empty_session_name_is_rejected() {
        let spec = session("", vec![window("w", None, vec![pane("a", None)])]);
        let (result, calls) = build(&spec);
        assert!(matches!(result, Err(BuildError::InvalidSpec(_))));
        assert!(calls.is_empty());
    }

    #[test]
    fn test_call_counts_and_order() {
        let spec = session(
            "proj",
            vec![
                window("a", Some("tiled"), vec![pane("1", None), pane("2", None), pane("3", None)]),
                window("b", None, vec![pane("4", None)]),
                window("c", Some("main-vertical"), vec![pane("5", None), pane("6", None)]),
            ],
        );
        let (result, calls) = build(&spec);
        result.unwrap();

        let rec = Recorder {
            calls: calls.clone(),
            ..Recorder::default()
        };
        assert_eq!(rec.count(|c| matches!(c, Call::NewSession(..))), 1);
        assert_eq!(rec.count(|c| matches!(c, Call::NewWindow(..))), 2);
        assert_eq!(rec.count(|c| matches!(c, Call::Split(..))), 3);
        assert_eq!(rec.count(|c| matches!(c, Call::Send(..))), 6);
        assert_eq!(rec.count(|c| matches!(c, Call::Layout(..))), 2);

        let targets: Vec<&str> = calls
            .iter()
            .filter_map(|c| match c {
                Call::Send(t, _) => Some(t.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            targets,
            vec!["proj:0.0", "proj:0.1", "proj:0.2", "proj:1.0", "proj:2.0", "proj:2.1"]
        );

        assert!(matches!(calls[0], Call::NewSession(..)));
        assert_eq!(calls[1], send("proj:0.0", "1"));
        assert_eq!(calls[2], Call::Split("proj:0".into(), None));
        assert_eq!(calls[6], Call::Layout("proj:0".into(), "tiled".into()));
        assert_eq!(calls[7], Call::NewWindow("proj".into(), Some("b".into())));
        assert_eq!(calls.last(), Some(&Call::Layout("proj:2".into(), "main-vertical".into())));
    }

    #[test]
    fn test_targets_ignore_layout_and_path() {
        let spec = session(
            "x",
            vec![
                window("a", Some("tiled"), vec![pane("p", Some("/tmp"))]),
                window("b", None, vec![pane("q", Some("/var")), pane("r", None)]),
            ],
        );
        let (result, calls) = build(&spec);
        result.unwrap();
        assert!(calls.contains(&send("x:0.0", "cd /tmp && p")));
        assert!(calls.contains(&send("x:1.0", "cd /var && q")));
        assert!(calls.contains(&send("x:1.1", "r")));
    }

    #[test]
    fn test_fail_fast_stops_at_failing_step() {
        let spec = session(
            "s",
            vec![
                window("a", Some("tiled"), vec![pane("1", None), pane("2", None)]),
                window("b", None, vec![pane("3", None)]),
            ],
        );
        // 0 new-session, 1 send, 2 split, 3 send, 4 layout, 5 new-window, 6 send
        let expected = [
            Step::CreateSession("s".into()),
            Step::SendCommand("s:0.0".into()),
            Step::SplitPane("s:0".into()),
            Step::SendCommand("s:0.1".into()),
            Step::SelectLayout("s:0".into()),
            Step::CreateWindow("b".into()),
            Step::SendCommand("s:1.0".into()),
        ];
        for (k, step) in expected.iter().enumerate() {
            let mut builder = SessionBuilder::new(Recorder::failing_at(k));
            let err = builder.build(&spec).unwrap_err();
            assert_eq!(err.step(), Some(step), "failing call {}", k);
            assert_eq!(builder.multiplexer().calls.len(), k + 1);
        }
    }

    #[test]
    fn test_second_build_fails_on_duplicate_session() {
        let spec = session("dup", vec![window("w", None, vec![pane("a", None)])]);
        let mut builder = SessionBuilder::new(Recorder::default());
        builder.build(&spec).unwrap();

        let err = builder.build(&spec).unwrap_err();
        assert_eq!(err.step(), Some(&Step::CreateSession("dup".into())));
        assert!(err.to_string().contains("duplicate session: dup"));
        assert_eq!(builder.multiplexer().calls.len(), 2);
    }

    #[test]
    fn test_empty_window_name_is_not_passed() {
        let spec = session(
            "s",
            vec![
                window("", None, vec![pane("a", None)]),
                window("", None, vec![pane("b", None)]),
            ],
        );
        let (result, calls) = build(&spec);
        result.unwrap();
        assert_eq!(calls[0], Call::NewSession("s".into(), None));
        assert_eq!(calls[2], Call::NewWindow("s".into(), None));
    }

    #[test]
    fn test_compose_command() {
        assert_eq!(compose_command(&pane("ls", None)), "ls");
        assert_eq!(compose_command(&pane("ls", Some(""))), "ls");
        assert_eq!(compose_command(&pane("ls -la", Some("~/src"))), "cd ~/src && ls -la");
        assert_eq!(compose_command(&pane("", Some("/tmp"))), "cd /tmp && ");
        assert_eq!(compose_command(&pane("", None)), "");
    }

    #[test]
    fn test_empty_command_is_still_sent() {
        let spec = session("s", vec![window("w", None, vec![pane("", None)])]);
        let (result, calls) = build(&spec);
        result.unwrap();
        assert_eq!(calls[1], send("s:0.0", ""));
    }
}
