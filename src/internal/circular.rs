//! Circular dependency detection infrastructure.

use std::cell::RefCell;

use crate::error::{DiError, DiResult};
use crate::key::ServiceName;

// Thread-local stack of in-flight resolutions, tagged with the owning registry
thread_local! {
    static RESOLUTION_TLS: RefCell<Vec<(u64, ServiceName)>> = const { RefCell::new(Vec::new()) };
}

/// Guard for one in-flight resolution.
///
/// Entering pushes `name` onto the current thread's resolution stack; dropping
/// pops it. Resolution is depth-first, so guards always drop in LIFO order.
pub(crate) struct StackGuard {
    registry: u64,
}

impl StackGuard {
    /// Marks `name` as in flight for `registry`.
    ///
    /// Fails with [`DiError::Circular`] when `name` is already in flight, the
    /// path running from its first occurrence back to itself, and with
    /// [`DiError::DepthExceeded`] when the stack is already `max_depth` deep.
    pub(crate) fn enter(registry: u64, name: &ServiceName, max_depth: usize) -> DiResult<Self> {
        RESOLUTION_TLS.with(|tls| {
            let mut stack = tls.borrow_mut();
            let frames: Vec<&ServiceName> = stack
                .iter()
                .filter(|(id, _)| *id == registry)
                .map(|(_, frame)| frame)
                .collect();

            if let Some(start) = frames.iter().position(|frame| *frame == name) {
                let mut path: Vec<ServiceName> = frames[start..].iter().map(|frame| (*frame).clone()).collect();
                path.push(name.clone());
                return Err(DiError::Circular(path));
            }

            if frames.len() >= max_depth {
                return Err(DiError::DepthExceeded(max_depth));
            }

            stack.push((registry, name.clone()));
            Ok(Self { registry })
        })
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        RESOLUTION_TLS.with(|tls| {
            let mut stack = tls.borrow_mut();
            if let Some(position) = stack.iter().rposition(|(id, _)| *id == self.registry) {
                stack.remove(position);
            }
        });
    }
}

/// Number of in-flight resolutions on this thread, across all registries.
#[cfg(test)]
pub(crate) fn depth() -> usize {
    RESOLUTION_TLS.with(|tls| tls.borrow().len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_guards_unwind() {
        let a = ServiceName::from("a");
        let b = ServiceName::from("b");
        {
            let _outer = StackGuard::enter(1, &a, 8).unwrap();
            let _inner = StackGuard::enter(1, &b, 8).unwrap();
            assert_eq!(depth(), 2);
        }
        assert_eq!(depth(), 0);
    }

    #[test]
    fn reentry_reports_cycle_from_first_occurrence() {
        let root = ServiceName::from("root");
        let a = ServiceName::from("a");
        let b = ServiceName::from("b");
        let _g1 = StackGuard::enter(7, &root, 8).unwrap();
        let _g2 = StackGuard::enter(7, &a, 8).unwrap();
        let _g3 = StackGuard::enter(7, &b, 8).unwrap();

        match StackGuard::enter(7, &a, 8) {
            Err(DiError::Circular(path)) => assert_eq!(path, ["a", "b", "a"].map(ServiceName::from)),
            _ => panic!("Expected Circular error"),
        }
    }

    #[test]
    fn registries_do_not_share_frames() {
        let name = ServiceName::from("shared");
        let _first = StackGuard::enter(10, &name, 8).unwrap();
        assert!(StackGuard::enter(11, &name, 8).is_ok());
    }

    #[test]
    fn depth_limit() {
        let a = ServiceName::from("a");
        let b = ServiceName::from("b");
        let _g = StackGuard::enter(3, &a, 1).unwrap();
        assert!(matches!(StackGuard::enter(3, &b, 1), Err(DiError::DepthExceeded(1))));
    }
}
