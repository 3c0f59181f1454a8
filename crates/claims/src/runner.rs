use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Skip reason recorded for files not started before the deadline
pub const BUDGET_EXCEEDED_REASON: &str = "time budget exceeded";

/// Per-file unit of work; `Err` carries a human-readable skip reason
pub type FileJob<T> = dyn Fn(&Path) -> std::result::Result<T, String> + Send + Sync;

/// Worker fan-out for file processing
///
/// File work mixes IO with CPU-heavy parsing; a small adaptive cap avoids
/// CPU/RAM spikes on large corpora.
#[must_use]
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .clamp(2, 8)
}

/// Run `job` for every file on blocking workers and return results in input order
///
/// Files are processed in chunks of `concurrency`. A panicking worker yields an
/// `Err` for its file only. Once `deadline` passes, the remaining files are
/// reported with [`BUDGET_EXCEEDED_REASON`] instead of being started.
pub async fn process_files<T>(
    files: Vec<PathBuf>,
    concurrency: usize,
    deadline: Option<Instant>,
    job: Arc<FileJob<T>>,
) -> Vec<(PathBuf, std::result::Result<T, String>)>
where
    T: Send + 'static,
{
    let mut aggregated = Vec::with_capacity(files.len());
    let concurrency = concurrency.max(1);

    for file_chunk in files.chunks(concurrency) {
        if budget_exhausted(deadline) {
            aggregated.extend(
                file_chunk
                    .iter()
                    .map(|path| (path.clone(), Err(BUDGET_EXCEEDED_REASON.to_string()))),
            );
            continue;
        }

        let mut tasks = Vec::with_capacity(file_chunk.len());
        for file_path in file_chunk {
            let job = Arc::clone(&job);
            let path = file_path.clone();
            tasks.push(tokio::task::spawn_blocking(move || (*job)(&path)));
        }

        for (file_path, task) in file_chunk.iter().zip(tasks) {
            let outcome = match task.await {
                Ok(result) => result,
                Err(e) => Err(format!("worker panicked: {e}")),
            };
            aggregated.push((file_path.clone(), outcome));
        }
    }

    aggregated
}

fn budget_exhausted(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|deadline| Instant::now() >= deadline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let files: Vec<PathBuf> = (0..10).map(|i| PathBuf::from(format!("f{i}"))).collect();
        let job: Arc<FileJob<String>> = Arc::new(|path: &Path| {
            let name = path.display().to_string();
            if name == "f3" {
                return Err("bad file".to_string());
            }
            Ok(name)
        });

        let results = process_files(files.clone(), 3, None, job).await;
        let paths: Vec<_> = results.iter().map(|(p, _)| p.clone()).collect();
        assert_eq!(paths, files);
        assert_eq!(results[3].1, Err("bad file".to_string()));
        assert_eq!(results[9].1, Ok("f9".to_string()));
    }

    #[tokio::test]
    async fn test_panicking_worker_only_fails_its_file() {
        let files = vec![PathBuf::from("ok"), PathBuf::from("boom")];
        let job: Arc<FileJob<()>> = Arc::new(|path: &Path| {
            if path == Path::new("boom") {
                panic!("parser exploded");
            }
            Ok(())
        });

        let results = process_files(files, 2, None, job).await;
        assert!(results[0].1.is_ok());
        assert!(results[1].1.as_ref().unwrap_err().contains("panicked"));
    }

    #[tokio::test]
    async fn test_expired_budget_skips_everything() {
        let files = vec![PathBuf::from("a"), PathBuf::from("b")];
        let job: Arc<FileJob<()>> = Arc::new(|_: &Path| Ok(()));
        let deadline = Instant::now();
        std::thread::sleep(Duration::from_millis(2));

        let results = process_files(files, 4, Some(deadline), job).await;
        assert!(results.iter().all(|(_, r)| {
            r.as_ref().err().map(String::as_str) == Some(BUDGET_EXCEEDED_REASON)
        }));
    }
}
