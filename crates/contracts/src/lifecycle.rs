//! Lifecycle capabilities and the managed handle that orders them.

use crate::{ComponentContext, ContractError};

/// Component that must be initialized before use
#[trait_variant::make(Initializable: Send)]
pub trait LocalInitializable {
    /// Acquire resources (connections, recorders, ...)
    async fn initialize(&mut self, context: &ComponentContext) -> Result<(), ContractError>;
}

/// Component that holds resources to release at shutdown
#[trait_variant::make(Disposable: Send)]
pub trait LocalDisposable {
    /// Release resources
    async fn dispose(&mut self) -> Result<(), ContractError>;
}

/// Lifecycle state of a managed component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Initialized,
    Disposed,
}

/// Owning handle enforcing `initialize` → use → `dispose`
#[derive(Debug)]
pub struct Lifecycle<T> {
    name: String,
    inner: T,
    state: LifecycleState,
}

impl<T> Lifecycle<T> {
    /// Wrap a freshly constructed component
    pub fn new(name: impl Into<String>, inner: T) -> Self {
        Self {
            name: name.into(),
            inner,
            state: LifecycleState::Created,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Borrow the component; only valid while initialized
    pub fn get(&self) -> Result<&T, ContractError> {
        match self.state {
            LifecycleState::Initialized => Ok(&self.inner),
            LifecycleState::Created | LifecycleState::Disposed => {
                Err(ContractError::not_initialized(&self.name))
            }
        }
    }
}

impl<T: Initializable + Disposable> Lifecycle<T> {
    /// Initialize the inner component exactly once
    pub async fn initialize(&mut self, context: &ComponentContext) -> Result<(), ContractError> {
        match self.state {
            LifecycleState::Created => {
                Initializable::initialize(&mut self.inner, context).await?;
                self.state = LifecycleState::Initialized;
                Ok(())
            }
            LifecycleState::Initialized => Err(ContractError::AlreadyInitialized {
                component: self.name.clone(),
            }),
            LifecycleState::Disposed => Err(ContractError::initialization(
                &self.name,
                "component was already disposed",
            )),
        }
    }

    /// Release the inner component; a second call is a no-op
    pub async fn dispose(&mut self) -> Result<(), ContractError> {
        if self.state == LifecycleState::Disposed {
            return Ok(());
        }
        // A failed release still leaves the handle disposed
        self.state = LifecycleState::Disposed;
        Disposable::dispose(&mut self.inner).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counting {
        inits: u32,
        disposes: u32,
        fail_init: bool,
    }

    impl Initializable for Counting {
        async fn initialize(&mut self, _context: &ComponentContext) -> Result<(), ContractError> {
            self.inits += 1;
            if self.fail_init {
                return Err(ContractError::initialization("counting", "boom"));
            }
            Ok(())
        }
    }

    impl Disposable for Counting {
        async fn dispose(&mut self) -> Result<(), ContractError> {
            self.disposes += 1;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_get_requires_initialize() {
        let mut handle = Lifecycle::new("counting", Counting::default());
        assert!(matches!(
            handle.get(),
            Err(ContractError::NotInitialized { .. })
        ));

        handle.initialize(&ComponentContext::default()).await.unwrap();
        assert_eq!(handle.state(), LifecycleState::Initialized);
        assert_eq!(handle.get().unwrap().inits, 1);
    }

    #[tokio::test]
    async fn test_double_initialize_rejected() {
        let mut handle = Lifecycle::new("counting", Counting::default());
        let ctx = ComponentContext::default();
        handle.initialize(&ctx).await.unwrap();

        let err = handle.initialize(&ctx).await.unwrap_err();
        assert!(matches!(err, ContractError::AlreadyInitialized { .. }));
        assert_eq!(handle.get().unwrap().inits, 1);
    }

    #[tokio::test]
    async fn test_dispose_is_idempotent() {
        let mut handle = Lifecycle::new("counting", Counting::default());
        handle.initialize(&ComponentContext::default()).await.unwrap();

        handle.dispose().await.unwrap();
        handle.dispose().await.unwrap();

        assert_eq!(handle.state(), LifecycleState::Disposed);
        assert_eq!(handle.inner.disposes, 1);
        assert!(handle.get().is_err());
    }

    #[tokio::test]
    async fn test_failed_initialize_still_disposable() {
        let mut handle = Lifecycle::new(
            "counting",
            Counting {
                fail_init: true,
                ..Default::default()
            },
        );

        assert!(handle.initialize(&ComponentContext::default()).await.is_err());
        assert_eq!(handle.state(), LifecycleState::Created);

        handle.dispose().await.unwrap();
        assert_eq!(handle.inner.disposes, 1);
    }
}
