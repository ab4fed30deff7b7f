use tokio::task::JoinSet;
use tracing::error;

/// A set of spawned workers whose results are collected together.
pub struct TaskManager<R: Send + 'static> {
    tasks: JoinSet<R>,
}

impl<R: Send + 'static> Default for TaskManager<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Send + 'static> TaskManager<R> {
    pub fn new() -> Self {
        Self {
            tasks: JoinSet::new(),
        }
    }

    pub fn spawn<F>(&mut self, future: F)
    where
        F: std::future::Future<Output = R> + Send + 'static,
    {
        self.tasks.spawn(future);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Waits for every task. A task that panicked is logged and left out of
    /// the results; the others still run to completion.
    pub async fn wait(&mut self) -> Vec<R> {
        let mut results = Vec::new();
        while let Some(res) = self.tasks.join_next().await {
            match res {
                Ok(r) => results.push(r),
                Err(e) => error!("worker ended abnormally: {}", e),
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collects_every_result() {
        let mut tasks = TaskManager::new();
        for n in 0..3u32 {
            tasks.spawn(async move { n * 2 });
        }
        assert_eq!(tasks.len(), 3);

        let mut results = tasks.wait().await;
        results.sort();
        assert_eq!(results, vec![0, 2, 4]);
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn panicking_task_does_not_stop_the_rest() {
        let mut tasks = TaskManager::new();
        tasks.spawn(async { 1u32 });
        let fail = true;
        tasks.spawn(async move {
            if fail {
                panic!("boom");
            }
            2
        });
        tasks.spawn(async { 3u32 });

        let mut results = tasks.wait().await;
        results.sort();
        assert_eq!(results, vec![1, 3]);
    }
}
