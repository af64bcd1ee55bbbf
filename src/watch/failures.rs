use futures::future::try_join_all;
use log::debug;

use crate::error::{CircleError, Result};
use crate::providers::{BuildDetail, CiProvider, OutputChunk};

/// Joins a step's output chunks in timestamp order, one line per chunk.
///
/// Timed chunks are sorted among the positions timed chunks occupy; chunks
/// without a timestamp stay where the provider put them.
fn join_chunks(mut chunks: Vec<OutputChunk>) -> String {
    let slots: Vec<usize> = chunks
        .iter()
        .enumerate()
        .filter(|(_, chunk)| chunk.time.is_some())
        .map(|(i, _)| i)
        .collect();
    let mut timed: Vec<OutputChunk> = slots.iter().map(|&i| chunks[i].clone()).collect();
    timed.sort_by_key(|chunk| chunk.time);
    for (slot, chunk) in slots.into_iter().zip(timed) {
        chunks[slot] = chunk;
    }

    chunks.iter().fold(String::new(), |mut text, chunk| {
        text.push_str(&chunk.message);
        text.push('\n');
        text
    })
}

/// Fetches the output of every failed action of `build` concurrently.
///
/// Returns one text block per failed `(step, container)` pair, in step then
/// container order regardless of which request finishes first. The first
/// failing request cancels the others and its error is returned; no partial
/// output is kept.
pub async fn failure_texts<P>(
    provider: &P,
    org: &str,
    project: &str,
    build: &BuildDetail,
) -> Result<Vec<String>>
where
    P: CiProvider + ?Sized,
{
    let failures = build.failures();
    debug!(
        "Fetching output for {} failed actions of build {}",
        failures.len(),
        build.build_num
    );

    let fetches = failures.into_iter().map(|(step, container)| async move {
        let chunks = provider
            .failure_output(org, project, build.build_num, step, container)
            .await?;
        Ok::<_, CircleError>(join_chunks(chunks))
    });

    try_join_all(fetches).await
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::providers::{Action, Step, TreeBuild};

    /// Serves canned output per `(step, container)`, with per-pair latency.
    #[derive(Default)]
    struct OutputProvider {
        outputs: HashMap<(usize, usize), Result<Vec<OutputChunk>>>,
        delays: HashMap<(usize, usize), Duration>,
        started: AtomicUsize,
        completed: Mutex<Vec<(usize, usize)>>,
    }

    #[async_trait]
    impl CiProvider for OutputProvider {
        async fn list_builds(&self, _: &str, _: &str, _: &str) -> Result<Vec<TreeBuild>> {
            unreachable!()
        }

        async fn build_detail(&self, _: &str, _: &str, _: u32) -> Result<BuildDetail> {
            unreachable!()
        }

        async fn failure_output(
            &self,
            _: &str,
            _: &str,
            _: u32,
            step: usize,
            container: usize,
        ) -> Result<Vec<OutputChunk>> {
            self.started.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(&(step, container)) {
                tokio::time::sleep(*delay).await;
            }
            self.completed.lock().unwrap().push((step, container));
            match &self.outputs[&(step, container)] {
                Ok(chunks) => Ok(chunks.clone()),
                Err(e) => Err(CircleError::Api {
                    status: 500,
                    message: e.to_string(),
                }),
            }
        }
    }

    fn chunk(message: &str, second: i64) -> OutputChunk {
        OutputChunk {
            message: message.to_string(),
            time: Utc.timestamp_opt(1_464_804_000 + second, 0).single(),
            kind: "out".to_string(),
        }
    }

    fn action(status: &str) -> Action {
        Action {
            name: "go test ./...".to_string(),
            status: status.to_string(),
            runtime: Duration::from_secs(3),
            output_url: None,
        }
    }

    fn build() -> BuildDetail {
        BuildDetail {
            build_num: 99,
            parallel: 2,
            steps: vec![
                Step {
                    name: "checkout".to_string(),
                    actions: vec![action("success"), action("success")],
                },
                Step {
                    name: "go test ./...".to_string(),
                    actions: vec![action("failed"), action("timedout")],
                },
            ],
        }
    }

    #[test]
    fn test_join_chunks_orders_by_timestamp() {
        let text = join_chunks(vec![chunk("second", 2), chunk("first", 1), chunk("third", 3)]);
        assert_eq!(text, "first\nsecond\nthird\n");
    }

    #[test]
    fn test_untimed_chunks_keep_their_position() {
        let untimed = OutputChunk {
            time: None,
            ..chunk("middle", 0)
        };

        let text = join_chunks(vec![chunk("first", 1), untimed.clone(), chunk("last", 2)]);
        assert_eq!(text, "first\nmiddle\nlast\n");

        let text = join_chunks(vec![chunk("last", 2), untimed, chunk("first", 1)]);
        assert_eq!(text, "first\nmiddle\nlast\n");
    }

    #[tokio::test]
    async fn test_results_follow_enumeration_order() {
        let mut provider = OutputProvider::default();
        provider
            .outputs
            .insert((1, 0), Ok(vec![chunk("--- FAIL: TestA", 0)]));
        provider
            .outputs
            .insert((1, 1), Ok(vec![chunk("--- FAIL: TestB", 0), chunk("FAIL", 1)]));
        // The first failure finishes last.
        provider.delays.insert((1, 0), Duration::from_millis(50));

        let texts = failure_texts(&provider, "Shyp", "go-circle", &build())
            .await
            .unwrap();

        assert_eq!(texts, vec!["--- FAIL: TestA\n", "--- FAIL: TestB\nFAIL\n"]);
        assert_eq!(*provider.completed.lock().unwrap(), vec![(1, 1), (1, 0)]);
    }

    #[tokio::test]
    async fn test_first_error_cancels_remaining_fetches() {
        let mut provider = OutputProvider::default();
        provider
            .outputs
            .insert((1, 0), Ok(vec![chunk("never seen", 0)]));
        provider.outputs.insert(
            (1, 1),
            Err(CircleError::Config("output unavailable".to_string())),
        );
        provider.delays.insert((1, 0), Duration::from_secs(30));

        let started = std::time::Instant::now();
        let err = failure_texts(&provider, "Shyp", "go-circle", &build())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("output unavailable"));
        assert_eq!(provider.started.load(Ordering::SeqCst), 2);
        // The slow fetch was dropped instead of awaited.
        assert_eq!(*provider.completed.lock().unwrap(), vec![(1, 1)]);
        assert!(started.elapsed() < Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_no_failed_actions_fetches_nothing() {
        let provider = OutputProvider::default();
        let mut build = build();
        build.steps.truncate(1);

        let texts = failure_texts(&provider, "Shyp", "go-circle", &build)
            .await
            .unwrap();

        assert!(texts.is_empty());
        assert_eq!(provider.started.load(Ordering::SeqCst), 0);
    }
}
