//! Tenant execution context.
//!
//! Cache operations run on behalf of a tenant. The active tenant is tracked
//! per thread as a stack of flow frames: entering a flow pushes a frame,
//! dropping the [`TenantFlow`] guard restores whatever was active before.
//! Guards are tied to the thread that created them and cannot be sent
//! elsewhere.

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use tracing::warn;

/// Identifier of the super tenant, the administrative tenant that owns
/// system-wide state.
pub const SUPER_TENANT_ID: i32 = -1234;

/// Domain name of the super tenant.
pub const SUPER_TENANT_DOMAIN: &str = "super";

thread_local! {
    static FLOW_STACK: RefCell<Vec<Option<TenantIdentity>>> = const { RefCell::new(Vec::new()) };
}

/// A tenant as seen by the cache layer: numeric id plus domain name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantIdentity {
    pub id: i32,
    pub domain: String,
}

impl TenantIdentity {
    pub fn new(id: i32, domain: impl Into<String>) -> Self {
        Self {
            id,
            domain: domain.into(),
        }
    }

    /// The super tenant.
    pub fn super_tenant() -> Self {
        Self::new(SUPER_TENANT_ID, SUPER_TENANT_DOMAIN)
    }

    pub fn is_super(&self) -> bool {
        self.id == SUPER_TENANT_ID
    }
}

impl fmt::Display for TenantIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.domain, self.id)
    }
}

/// RAII guard for a tenant flow on the current thread.
///
/// Entering a flow starts with no active tenant; callers assign one with
/// [`set_active_tenant`]. Dropping the guard restores the state from before
/// the flow was entered, also when the stack unwinds through a panic.
#[must_use = "dropping the guard immediately exits the flow"]
pub struct TenantFlow {
    restore_depth: usize,
    // Frames belong to the thread that pushed them.
    _not_send: PhantomData<*const ()>,
}

impl TenantFlow {
    /// Enter a new tenant flow with no active tenant yet.
    pub fn enter() -> Self {
        let restore_depth = FLOW_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            let depth = stack.len();
            stack.push(None);
            depth
        });
        Self {
            restore_depth,
            _not_send: PhantomData,
        }
    }

    /// Enter a new tenant flow running as the super tenant.
    pub fn enter_super() -> Self {
        let flow = Self::enter();
        set_active_tenant(TenantIdentity::super_tenant());
        flow
    }
}

impl Drop for TenantFlow {
    fn drop(&mut self) {
        FLOW_STACK.with(|stack| {
            // Truncation also discards frames left behind by guards that
            // were leaked or dropped out of order.
            stack.borrow_mut().truncate(self.restore_depth);
        });
    }
}

/// Assign the active tenant of the innermost flow.
///
/// Returns `false` when no flow is active on this thread; the identity is
/// discarded in that case.
pub fn set_active_tenant(identity: TenantIdentity) -> bool {
    FLOW_STACK.with(|stack| match stack.borrow_mut().last_mut() {
        Some(frame) => {
            *frame = Some(identity);
            true
        }
        None => {
            warn!(tenant = %identity, "No tenant flow active, identity not set");
            false
        }
    })
}

/// The tenant of the innermost flow on this thread, if one is set.
pub fn current_tenant() -> Option<TenantIdentity> {
    FLOW_STACK.with(|stack| stack.borrow().last().cloned().flatten())
}

/// Nesting depth of tenant flows on this thread.
pub fn flow_depth() -> usize {
    FLOW_STACK.with(|stack| stack.borrow().len())
}

/// Run `f` inside a flow with `identity` active, restoring the previous
/// state afterwards.
pub fn with_tenant<T>(identity: TenantIdentity, f: impl FnOnce() -> T) -> T {
    let _flow = TenantFlow::enter();
    set_active_tenant(identity);
    f()
}
