//! Identity-bearing object handles and call-site argument vectors
//!
//! Aliasing is decided by object identity, never by value. A [`Handle`] is a
//! shared reference whose `Clone` produces another reference to the *same*
//! object; copying the object itself is the job of the `Replicate`
//! capability.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// Stable identity of the object behind a handle.
///
/// Only meaningful while at least one handle to the object is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{:x}", self.0)
    }
}

/// Shared reference to a domain object.
pub struct Handle<T>(Rc<RefCell<T>>);

impl<T> Handle<T> {
    /// Wrap a freshly created object.
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    /// Identity of the underlying object.
    pub fn id(&self) -> ObjectId {
        ObjectId(Rc::as_ptr(&self.0) as *const () as usize)
    }

    /// Returns `true` if both handles refer to the identical object.
    pub fn same_object(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Immutably borrow the object.
    ///
    /// Panics if the object is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Mutably borrow the object.
    ///
    /// Panics if the object is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Number of live handles to this object.
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.id()).finish()
    }
}

/// Ordered arguments of one guarded call.
///
/// Slot 0 is the receiver; slots `1..` are the explicit arguments followed by
/// the variadic tail, if any.
#[derive(Debug)]
pub struct ArgVector<T> {
    slots: Vec<Handle<T>>,
}

impl<T> ArgVector<T> {
    /// Arguments consisting of the receiver alone.
    pub fn new(receiver: Handle<T>) -> Self {
        Self {
            slots: vec![receiver],
        }
    }

    /// Receiver followed by `others` in order.
    pub fn with_others<I>(receiver: Handle<T>, others: I) -> Self
    where
        I: IntoIterator<Item = Handle<T>>,
    {
        let mut slots = vec![receiver];
        slots.extend(others);
        Self { slots }
    }

    /// Append one argument.
    pub fn push(mut self, arg: Handle<T>) -> Self {
        self.slots.push(arg);
        self
    }

    /// The receiver (slot 0).
    pub fn receiver(&self) -> &Handle<T> {
        &self.slots[0]
    }

    /// Everything after the receiver.
    pub fn others(&self) -> &[Handle<T>] {
        &self.slots[1..]
    }

    /// Handle at `position`, receiver included.
    pub fn get(&self, position: usize) -> Option<&Handle<T>> {
        self.slots.get(position)
    }

    /// Number of slots, receiver included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false`: a call has at least a receiver.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate over all slots.
    pub fn iter(&self) -> std::slice::Iter<'_, Handle<T>> {
        self.slots.iter()
    }

    /// Object identities per slot.
    pub fn ids(&self) -> Vec<ObjectId> {
        self.slots.iter().map(Handle::id).collect()
    }

    pub(crate) fn slot(&self, position: usize) -> &Handle<T> {
        &self.slots[position]
    }

    pub(crate) fn replace(&mut self, position: usize, handle: Handle<T>) -> Handle<T> {
        std::mem::replace(&mut self.slots[position], handle)
    }
}

impl<'a, T> IntoIterator for &'a ArgVector<T> {
    type Item = &'a Handle<T>;
    type IntoIter = std::slice::Iter<'a, Handle<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_clone_aliases() {
        let a = Handle::new(5u32);
        let b = a.clone();
        assert!(a.same_object(&b));
        assert_eq!(a.id(), b.id());
        *b.borrow_mut() += 1;
        assert_eq!(*a.borrow(), 6);
    }

    #[test]
    fn test_equal_values_are_distinct_objects() {
        let a = Handle::new(String::from("same"));
        let b = Handle::new(String::from("same"));
        assert!(!a.same_object(&b));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_arg_vector_layout() {
        let x = Handle::new(1);
        let y = Handle::new(2);
        let args = ArgVector::with_others(x.clone(), [y.clone(), x.clone()]);
        assert_eq!(args.len(), 3);
        assert!(args.receiver().same_object(&x));
        assert_eq!(args.others().len(), 2);
        assert_eq!(args.ids(), vec![x.id(), y.id(), x.id()]);
        assert!(args.get(3).is_none());
    }

    #[test]
    fn test_push_shares_the_object() {
        let x = Handle::new(1);
        assert_eq!(x.handle_count(), 1);

        let args = ArgVector::new(x.clone()).push(Handle::new(2)).push(x.clone());
        assert_eq!(args.len(), 3);
        assert!(args.get(2).is_some_and(|slot| slot.same_object(&x)));
        assert_eq!(x.handle_count(), 3);

        drop(args);
        assert_eq!(x.handle_count(), 1);
    }
}
