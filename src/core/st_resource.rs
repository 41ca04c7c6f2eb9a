use std::{
    cell::{Ref, RefCell, RefMut},
    rc::Rc,
};

/// A single-threaded, reference-counted handle with interior mutability.
///
/// `StResource` is how the render context is shared between the code driving a
/// tile and the [`RenderMode`](crate::rendermodes::RenderMode) rendering it: both
/// sides hold a clone, the caller updates the current block between queries and
/// the mode hands the same value to every primitive hook.
///
/// # Type Parameters
/// - `T`: The type of the contained resource
///
/// # Examples
///
/// ```
/// use voxel_rendermodes::core::StResource;
///
/// let resource = StResource::new(vec![1, 2, 3]);
/// let clone = resource.clone();
///
/// // All clones share the same underlying data
/// clone.get_mut().push(4);
/// assert_eq!(resource.get().len(), 4);
/// ```
///
/// # Panics
/// Borrow rules are checked at runtime: taking `get_mut` while any other guard
/// from the same resource is alive panics. Render modes never hold a guard
/// across calls, so this only happens if the caller keeps one alive while
/// calling into a mode.
pub struct StResource<T> {
    resource: Rc<RefCell<T>>,
}

impl<T> StResource<T> {
    /// Creates a new `StResource` containing the given value.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Rc::new(RefCell::new(resource)),
        }
    }

    /// Returns a guard that allows reading the contained value.
    pub fn get(&self) -> Ref<'_, T> {
        self.resource.borrow()
    }

    /// Returns a guard that allows modifying the contained value.
    pub fn get_mut(&self) -> RefMut<'_, T> {
        self.resource.borrow_mut()
    }

    /// Returns `true` if both handles point at the same value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.resource, &other.resource)
    }
}

impl<T> Clone for StResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

impl<T: Default> Default for StResource<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_value() {
        let a = StResource::new(1);
        let b = a.clone();
        *b.get_mut() += 41;
        assert_eq!(*a.get(), 42);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&StResource::new(42)));
    }
}
