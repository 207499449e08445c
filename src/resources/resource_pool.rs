//! A fixed count of interchangeable slots (disks, printers) that can each be checked
//! out by one holder at a time.
//!
//! Acquiring always hands out the lowest free index so runs are repeatable. There is no
//! fairness between waiters, a release wakes one of them and whoever gets the lock first wins.
use thiserror::Error;
use tokio::sync::{Mutex, Notify};

#[derive(Debug)]
pub struct ResourcePool {
    name: &'static str,
    size: usize,
    //true = free
    slots: Mutex<Vec<bool>>,
    released: Notify,
}

impl ResourcePool {
    pub fn new(name: &'static str, size: usize) -> ResourcePool {
        ResourcePool {
            name,
            size,
            slots: Mutex::new(vec![true; size]),
            released: Notify::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Waits until a slot is free, then takes it. The returned index belongs to the caller
    /// until it is handed back with release.
    pub async fn acquire(&self) -> usize {
        loop {
            // Register interest before looking so a release between the scan and the
            // await still reaches us.
            let notified = self.released.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(index) = self.try_acquire().await {
                return index;
            }

            trace!("No free {} slot, waiting for a release", self.name);
            notified.await;
        }
    }

    /// Takes the lowest free slot if there is one, never waits.
    pub async fn try_acquire(&self) -> Option<usize> {
        let mut slots = self.slots.lock().await;
        let index = slots.iter().position(|free| *free)?;
        slots[index] = false;
        Some(index)
    }

    pub async fn release(&self, index: usize) -> Result<(), ResourcePoolError> {
        let mut slots = self.slots.lock().await;
        match slots.get_mut(index) {
            Some(slot) if !*slot => {
                *slot = true;
            }
            Some(_) => {
                return Err(ResourcePoolError::InvalidResourceIndex(
                    self.name,
                    index,
                    "slot is not checked out",
                ));
            }
            None => {
                return Err(ResourcePoolError::InvalidResourceIndex(
                    self.name,
                    index,
                    "out of range",
                ));
            }
        }
        drop(slots);

        self.released.notify_one();
        Ok(())
    }

    pub async fn free_count(&self) -> usize {
        self.slots.lock().await.iter().filter(|free| **free).count()
    }
}

#[derive(Debug, Error)]
pub enum ResourcePoolError {
    #[error("Cannot release {0} {1}, {2}")]
    InvalidResourceIndex(&'static str, usize, &'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_lowest_free_first() -> Result<(), Box<dyn std::error::Error>> {
        let pool = ResourcePool::new("disk", 3);

        assert_eq!(pool.acquire().await, 0);
        assert_eq!(pool.acquire().await, 1);
        assert_eq!(pool.acquire().await, 2);
        assert_eq!(pool.try_acquire().await, None);

        pool.release(1).await?;
        assert_eq!(pool.free_count().await, 1);
        assert_eq!(pool.acquire().await, 1);

        pool.release(0).await?;
        pool.release(2).await?;
        assert_eq!(pool.acquire().await, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_bad_release() -> Result<(), Box<dyn std::error::Error>> {
        let pool = ResourcePool::new("printer", 2);

        assert!(matches!(
            pool.release(0).await,
            Err(ResourcePoolError::InvalidResourceIndex(_, 0, _))
        ));
        assert!(pool.release(5).await.is_err());

        let index = pool.acquire().await;
        pool.release(index).await?;
        assert!(pool.release(index).await.is_err());
        assert_eq!(pool.free_count().await, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_release_wakes_waiter() -> Result<(), Box<dyn std::error::Error>> {
        let pool = Arc::new(ResourcePool::new("disk", 1));
        let held = pool.acquire().await;

        let waiter_pool = pool.clone();
        let waiter = tokio::spawn(async move { waiter_pool.acquire().await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        pool.release(held).await?;
        let got = timeout(Duration::from_secs(5), waiter).await??;
        assert_eq!(got, held);

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_mutual_exclusion() -> Result<(), Box<dyn std::error::Error>> {
        let pool = Arc::new(ResourcePool::new("disk", 3));
        let held: Arc<Vec<AtomicBool>> = Arc::new((0..3).map(|_| AtomicBool::new(false)).collect());
        let collisions = Arc::new(AtomicUsize::new(0));

        let mut handles = vec![];
        for _ in 0..24 {
            let pool = pool.clone();
            let held = held.clone();
            let collisions = collisions.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..10 {
                    let index = pool.acquire().await;
                    if held[index].swap(true, Ordering::SeqCst) {
                        collisions.fetch_add(1, Ordering::SeqCst);
                    }
                    tokio::task::yield_now().await;
                    held[index].store(false, Ordering::SeqCst);
                    pool.release(index).await.unwrap();
                }
            }));
        }

        let all = futures::future::join_all(handles);
        for res in timeout(Duration::from_secs(30), all).await? {
            res?;
        }

        assert_eq!(collisions.load(Ordering::SeqCst), 0);
        assert_eq!(pool.free_count().await, 3);

        Ok(())
    }
}
