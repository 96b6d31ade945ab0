use {
    crate::{config::Config, context::Context, error::ContextError},
    std::{
        ops::Deref,
        sync::{
            atomic::{AtomicU32, Ordering},
            Arc, Mutex, MutexGuard, PoisonError,
        },
    },
};

static REFCOUNT: AtomicU32 = AtomicU32::new(0);
static CONTEXT: Mutex<Option<Arc<Context>>> = Mutex::new(None);

fn slot() -> MutexGuard<'static, Option<Arc<Context>>> {
    CONTEXT.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reference to process-wide [`Context`].
///
/// The first `acquire` creates the context, dropping the last reference destroys it.
/// Prefer owning a [`Context`] unless the process needs a single shared one.
#[derive(Debug)]
pub struct GlobalContext {
    context: Arc<Context>,
}

impl GlobalContext {
    /// Acquires reference to the global context, creating it from `config` if there is none.
    /// `config` is ignored while the context is alive.
    #[cfg_attr(feature = "tracing", tracing::instrument)]
    pub fn acquire(config: Config) -> Result<Self, ContextError> {
        let mut slot = slot();

        let context = match &*slot {
            Some(context) => {
                #[cfg(feature = "tracing")]
                if *context.config() != config {
                    tracing::warn!("Global context exists with different configuration");
                }
                context.clone()
            }
            None => {
                let context = Arc::new(Context::new(config)?);
                *slot = Some(context.clone());
                context
            }
        };

        REFCOUNT.fetch_add(1, Ordering::AcqRel);
        Ok(GlobalContext { context })
    }

    /// Number of live references.
    pub fn refcount() -> u32 {
        REFCOUNT.load(Ordering::Acquire)
    }
}

impl Deref for GlobalContext {
    type Target = Context;

    fn deref(&self) -> &Context {
        &self.context
    }
}

impl Clone for GlobalContext {
    fn clone(&self) -> Self {
        REFCOUNT.fetch_add(1, Ordering::AcqRel);
        GlobalContext {
            context: self.context.clone(),
        }
    }
}

impl Drop for GlobalContext {
    fn drop(&mut self) {
        if REFCOUNT.fetch_sub(1, Ordering::AcqRel) == 1 {
            let mut slot = slot();

            // Another thread may have acquired it meanwhile.
            if REFCOUNT.load(Ordering::Acquire) == 0 {
                #[cfg(feature = "tracing")]
                tracing::debug!("Destroying global context");

                *slot = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::platform::Generation,
        std::thread,
    };

    #[test]
    fn lifecycle() {
        assert_eq!(GlobalContext::refcount(), 0);

        let first = GlobalContext::acquire(Config::for_generation(Generation::Gen12)).unwrap();
        let second = GlobalContext::acquire(Config::for_generation(Generation::Gen9)).unwrap();
        assert_eq!(GlobalContext::refcount(), 2);
        assert_eq!(second.platform().generation, Generation::Gen12);
        assert!(Arc::ptr_eq(&first.context, &second.context));

        drop(first);
        assert!(slot().is_some());
        drop(second);
        assert_eq!(GlobalContext::refcount(), 0);
        assert!(slot().is_none());

        let config = Arc::new(Config::for_generation(Generation::Xe2Lpg));
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let config = config.clone();
                thread::spawn(move || {
                    let context = GlobalContext::acquire((*config).clone()).unwrap();
                    context.platform().generation
                })
            })
            .collect();

        for thread in threads {
            assert_eq!(thread.join().unwrap(), Generation::Xe2Lpg);
        }
        assert_eq!(GlobalContext::refcount(), 0);
        assert!(slot().is_none());
    }
}
