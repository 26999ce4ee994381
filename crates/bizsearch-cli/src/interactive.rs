//! Line-driven search loop.
//!
//! Each input line is a submission. The network call runs on its own task and
//! reports back over a channel, so a new line can supersede a search that is
//! still in flight. The screen is redrawn after every state transition.

use std::io::Write;

use bizsearch_client::{SearchError, SearchService};
use bizsearch_core::{BusinessRecord, FallbackProvider};
use bizsearch_view::render::{render, render_plain, submit_label};
use bizsearch_view::{Completion, SearchView};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

type Outcome = (u64, Result<Vec<BusinessRecord>, SearchError>);

/// Runs until a quit command, or until input ends and the last search settles.
///
/// `hyperlinks` selects terminal hyperlinks for business names; pass `false`
/// when `out` is not a terminal.
///
/// # Errors
///
/// Returns an error if reading `input` or writing `out` fails.
pub(crate) async fn run<S, F, R, W>(
    view: &mut SearchView<S, F>,
    input: R,
    out: &mut W,
    hyperlinks: bool,
) -> anyhow::Result<()>
where
    S: SearchService + Clone + 'static,
    F: FallbackProvider,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Outcome>();
    let mut lines = input.lines();
    let mut in_flight: Option<JoinHandle<()>> = None;
    let mut input_open = true;

    redraw(view, out, hyperlinks)?;

    loop {
        if !input_open && in_flight.is_none() {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    input_open = false;
                    continue;
                };
                if is_quit(&line) {
                    break;
                }
                let Some(submission) = view.begin(&line) else {
                    write_prompt(view, out)?;
                    continue;
                };
                if let Some(previous) = in_flight.take() {
                    tracing::debug!(seq = submission.seq, "superseding in-flight search");
                    previous.abort();
                }
                let service = view.service().clone();
                let tx = tx.clone();
                in_flight = Some(tokio::spawn(async move {
                    let outcome = service.search(&submission.query).await;
                    if tx.send((submission.seq, outcome)).is_err() {
                        tracing::debug!(seq = submission.seq, "search loop exited before outcome");
                    }
                }));
                redraw(view, out, hyperlinks)?;
            }
            Some((seq, outcome)) = rx.recv() => {
                if view.complete(seq, outcome) != Completion::Stale {
                    in_flight = None;
                    redraw(view, out, hyperlinks)?;
                }
            }
        }
    }

    if let Some(task) = in_flight {
        task.abort();
    }
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

fn is_quit(line: &str) -> bool {
    matches!(line.trim(), ":q" | "quit" | "exit")
}

fn redraw<S, F, W>(view: &SearchView<S, F>, out: &mut W, hyperlinks: bool) -> std::io::Result<()>
where
    S: SearchService,
    F: FallbackProvider,
    W: Write,
{
    let text = if hyperlinks {
        render(view.state())
    } else {
        render_plain(view.state())
    };
    if !text.is_empty() {
        writeln!(out)?;
        write!(out, "{text}")?;
    }
    write_prompt(view, out)
}

fn write_prompt<S, F, W>(view: &SearchView<S, F>, out: &mut W) -> std::io::Result<()>
where
    S: SearchService,
    F: FallbackProvider,
    W: Write,
{
    write!(out, "[{}] > ", submit_label(view.state()))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use bizsearch_core::DemoDataset;

    use super::*;

    /// Answers with one record named after the query; `slow` queries sleep first.
    #[derive(Clone, Default)]
    struct EchoService {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SearchService for EchoService {
        async fn search(&self, query: &str) -> Result<Vec<BusinessRecord>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if query.starts_with("slow") {
                tokio::time::sleep(Duration::from_millis(300)).await;
            }
            if query == "broken" {
                return Err(SearchError::Timeout { timeout_ms: 3000 });
            }
            Ok(vec![BusinessRecord {
                place_id: Some(format!("id-{query}")),
                name: format!("Result for {query}"),
                address: None,
                rating: Some(4.5),
                website: None,
                phone_number: None,
                matched_on: None,
                matched_text: None,
                relevance_score: None,
            }])
        }
    }

    async fn run_with(input: &str) -> (String, usize) {
        run_with_links(input, false).await
    }

    async fn run_with_links(input: &str, hyperlinks: bool) -> (String, usize) {
        let service = EchoService::default();
        let calls = Arc::clone(&service.calls);
        let mut view = SearchView::new(service, DemoDataset);
        let mut out = Vec::new();
        run(&mut view, input.as_bytes(), &mut out, hyperlinks)
            .await
            .expect("loop should not fail");
        (
            String::from_utf8(out).expect("utf-8 output"),
            calls.load(Ordering::SeqCst),
        )
    }

    #[tokio::test]
    async fn line_submits_and_waits_for_outcome_at_eof() {
        let (out, calls) = run_with("coffee\n").await;
        assert_eq!(calls, 1);
        assert!(out.contains("Searching businesses..."));
        assert!(out.contains("Found 1 businesses matching \"coffee\""));
        assert!(out.contains("Result for coffee"));
        assert!(out.contains("★ 4.5"));
    }

    #[tokio::test]
    async fn blank_lines_issue_no_requests() {
        let (out, calls) = run_with("\n   \n").await;
        assert_eq!(calls, 0);
        assert!(!out.contains("Searching businesses..."));
        assert!(out.contains("[Search] > "));
    }

    #[tokio::test]
    async fn quit_stops_before_later_lines() {
        let (out, calls) = run_with("quit\ncoffee\n").await;
        assert_eq!(calls, 0);
        assert!(!out.contains("coffee"));
    }

    #[tokio::test]
    async fn failure_redraws_with_demo_banner() {
        let (out, _) = run_with("broken\n").await;
        assert!(out.contains("Demo Mode"));
        assert!(out.contains("Brew & Bytes Coffee"));
        assert!(!out.contains('\x1b'));
    }

    #[tokio::test]
    async fn hyperlinks_flag_links_demo_names() {
        let (out, _) = run_with_links("broken\n", true).await;
        assert!(out.contains("\x1b]8;;https://brewandbytes.com\x1b\\Brew & Bytes Coffee\x1b]8;;"));
    }

    #[tokio::test]
    async fn newer_line_supersedes_slow_search() {
        let (out, _) = run_with("slow first\nsecond\n").await;
        assert!(out.contains("matching \"second\""));
        assert!(!out.contains("Result for slow first"));
    }

    #[tokio::test]
    async fn prompt_reflects_loading_state() {
        let (out, _) = run_with("coffee\n").await;
        let searching = out.find("[Searching...] > ").expect("loading prompt");
        let idle = out.rfind("[Search] > ").expect("idle prompt");
        assert!(searching < idle);
    }

    #[test]
    fn quit_commands_are_recognised() {
        assert!(is_quit(":q"));
        assert!(is_quit(" quit "));
        assert!(is_quit("exit"));
        assert!(!is_quit("quitting time cafe"));
    }
}
