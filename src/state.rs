use std::sync::{Arc, Mutex};

use crate::common::LoadBalancerConfig;

#[derive(thiserror::Error, Debug, PartialEq, PartialOrd)]
pub enum StorageError {
    LockingError,
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// The last configuration known to be applied on the load balancer. Empty at startup and after any failed
/// deployment, when the remote state has to be treated as unknown.
#[derive(Clone, Default)]
pub struct ConfigCache {
    last_applied: Arc<Mutex<Option<Arc<LoadBalancerConfig>>>>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn peek(&self) -> Result<Option<Arc<LoadBalancerConfig>>, StorageError> {
        let lock = self.last_applied.lock().map_err(|_| StorageError::LockingError)?;
        Ok(lock.clone())
    }

    pub fn commit(&self, config: LoadBalancerConfig) -> Result<(), StorageError> {
        let mut lock = self.last_applied.lock().map_err(|_| StorageError::LockingError)?;
        *lock = Some(Arc::new(config));
        Ok(())
    }

    pub fn invalidate(&self) -> Result<(), StorageError> {
        let mut lock = self.last_applied.lock().map_err(|_| StorageError::LockingError)?;
        *lock = None;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let last_applied = Arc::clone(&self.last_applied);
        let _ = std::thread::spawn(move || {
            let _lock = last_applied.lock();
            panic!("poisoning the cache lock");
        })
        .join();
    }

    pub fn is_same(&self, config: &LoadBalancerConfig) -> Result<bool, StorageError> {
        let lock = self.last_applied.lock().map_err(|_| StorageError::LockingError)?;
        Ok(lock.as_deref().is_some_and(|applied| applied == config))
    }
}
