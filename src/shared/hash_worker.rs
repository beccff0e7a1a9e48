use async_trait::async_trait;
use bcrypt::{hash, verify, BcryptError};
use rayon::ThreadPool;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HashWorkerError {
  #[error("Bcrypt error: {0}")]
  Bcrypt(#[from] BcryptError),
  #[error("Channel send error")]
  Send,
  #[error("Channel receive error")]
  Receive,
}

type Reply<T> = flume::Sender<Result<T, HashWorkerError>>;

enum WorkOrder {
  Hash {
    password: String,
    reply: Reply<String>,
  },
  Verify {
    password: String,
    hashed: String,
    reply: Reply<bool>,
  },
}

impl WorkOrder {
  /// The requester dropped its receiver, nobody will read the answer.
  fn is_abandoned(&self) -> bool {
    match self {
      WorkOrder::Hash { reply, .. } => reply.is_disconnected(),
      WorkOrder::Verify { reply, .. } => reply.is_disconnected(),
    }
  }

  fn execute(self, cost: u32) {
    match self {
      WorkOrder::Hash { password, reply } => {
        let _ = reply.send(hash(password, cost).map_err(HashWorkerError::from));
      }
      WorkOrder::Verify {
        password,
        hashed,
        reply,
      } => {
        let _ =
          reply.send(verify(password, &hashed).map_err(HashWorkerError::from));
      }
    }
  }
}

/// Runs bcrypt on a dedicated rayon pool so hashing never blocks the
/// actix workers.
pub struct HashWorker {
  sender: flume::Sender<WorkOrder>,
  skipped: Arc<AtomicUsize>,
}

impl HashWorker {
  pub fn new(thread_pool: ThreadPool, num_threads: usize, cost: u32) -> Self {
    // A bcrypt round at cost 10 takes tens of milliseconds, so three queued
    // orders per thread keeps the pool busy without letting the backlog grow.
    let channels_capacity = num_threads * 3;
    let (tx, rx) = flume::bounded::<WorkOrder>(channels_capacity);
    let rx = Arc::new(rx);
    let skipped = Arc::new(AtomicUsize::new(0));

    for _ in 0..num_threads {
      thread_pool.spawn({
        let rx = Arc::clone(&rx);
        let skipped = Arc::clone(&skipped);
        move || {
          while let Ok(order) = rx.recv() {
            if order.is_abandoned() {
              let total = skipped.fetch_add(1, Ordering::Relaxed) + 1;
              tracing::debug!(total, "Skipped hash order, requester is gone");
              continue;
            }
            order.execute(cost);
          }
        }
      });
    }

    Self {
      sender: tx,
      skipped,
    }
  }

  /// Orders dropped unprocessed because their requester went away.
  pub fn skipped_orders(&self) -> usize {
    self.skipped.load(Ordering::Relaxed)
  }

  async fn submit<T: Send>(
    &self,
    order: WorkOrder,
    response: flume::Receiver<Result<T, HashWorkerError>>,
  ) -> Result<T, HashWorkerError> {
    self
      .sender
      .send_async(order)
      .await
      .map_err(|_| HashWorkerError::Send)?;

    response
      .recv_async()
      .await
      .map_err(|_| HashWorkerError::Receive)?
  }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Hasher {
  async fn hash_password(
    &self,
    password: &str,
  ) -> Result<String, HashWorkerError>;
  async fn verify_password(
    &self,
    password: &str,
    hash: &str,
  ) -> Result<bool, HashWorkerError>;
}

#[async_trait]
impl Hasher for HashWorker {
  async fn hash_password(
    &self,
    password: &str,
  ) -> Result<String, HashWorkerError> {
    let (reply, response) = flume::bounded(1);
    let order = WorkOrder::Hash {
      password: password.to_owned(),
      reply,
    };
    self.submit(order, response).await
  }

  async fn verify_password(
    &self,
    password: &str,
    hash: &str,
  ) -> Result<bool, HashWorkerError> {
    let (reply, response) = flume::bounded(1);
    let order = WorkOrder::Verify {
      password: password.to_owned(),
      hashed: hash.to_owned(),
      reply,
    };
    self.submit(order, response).await
  }
}
