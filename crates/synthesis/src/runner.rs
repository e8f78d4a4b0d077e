use tokio_util::task::TaskTracker;

/// Runs pipeline futures in the background and tracks them for shutdown
#[derive(Debug, Clone)]
pub struct PipelineRunner {
    tracker: TaskTracker,
}

impl PipelineRunner {
    pub fn new() -> Self {
        Self { tracker: TaskTracker::new() }
    }

    /// Hand a pipeline future to the runtime
    pub fn spawn<F>(&self, pipeline: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tracker.spawn(pipeline);
    }

    /// Number of pipelines still running
    pub fn active(&self) -> usize {
        self.tracker.len()
    }

    /// Wait for every in-flight pipeline to reach its end
    pub async fn shutdown(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}

impl Default for PipelineRunner {
    fn default() -> Self {
        Self::new()
    }
}
