use std::cell::RefCell;
use std::rc::Rc;
use tokio::task::JoinSet;
use tokio_shutdown::Shutdown;
use tracing::{Instrument, debug, info_span};

type MutableJoinSet = Rc<RefCell<JoinSet<()>>>;

/// Spawns named, long-running tasks that are joined together at shutdown.
pub struct Builder {
    join_set: MutableJoinSet,
    shutdown: Shutdown,
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to install shutdown handler: {0}")]
pub struct BuilderError(String);

impl Builder {
    pub fn new() -> Result<Self, BuilderError> {
        let shutdown = Shutdown::new().map_err(|err| BuilderError(err.to_string()))?;
        Ok(Self {
            join_set: MutableJoinSet::default(),
            shutdown,
        })
    }

    pub fn new_task(&self, name: &'static str) -> Spawner {
        Spawner {
            name,
            join_set: self.join_set.clone(),
            shutdown: self.shutdown.clone(),
        }
    }

    pub async fn join_all(self) {
        let join_set = self.join_set.take();
        let _ = join_set.join_all().await;
    }
}

pub struct Spawner {
    name: &'static str,
    join_set: MutableJoinSet,
    shutdown: Shutdown,
}

impl Spawner {
    /// Runs `task` until it completes or shutdown is requested, whichever is first.
    #[track_caller]
    pub fn spawn<F>(self, task: F)
    where
        F: Future<Output = ()>,
        F: Send + 'static,
    {
        let name = self.name;
        let shutdown = self.shutdown.clone();
        self.join_set.borrow_mut().spawn(
            async move {
                tokio::select! {
                    () = task => debug!("Task '{}' completed", name),
                    () = shutdown.handle() => debug!("Task '{}' stopped on shutdown", name),
                }
            }
            .instrument(info_span!("task", task.name = name)),
        );
    }
}
