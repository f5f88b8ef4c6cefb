use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use crate::{
    executor::{Executor, FieldResult, FieldTarget, Resolved, output::Output},
    parser::SourcePosition,
    schema::model::TypeType,
};

/// A value produced after the whole request has been walked
///
/// Resolvers return one wrapped into [`Resolved::Deferred`] to postpone
/// fetching data: all deferred values of a request are resolved together
/// afterwards, so a loader can collect the keys requested by all of them
/// and fetch them in a single batch.
///
/// Any `FnOnce() -> FieldResult<Resolved>` closure is a deferred resolver.
pub trait DeferredResolver {
    /// Produces the value, which may be deferred again.
    fn resolve(self: Box<Self>) -> FieldResult<Resolved>;
}

impl<F> DeferredResolver for F
where
    F: FnOnce() -> FieldResult<Resolved>,
{
    fn resolve(self: Box<Self>) -> FieldResult<Resolved> {
        (*self)()
    }
}

/// Completion of a field value once it's available.
pub(crate) struct Continuation<'a> {
    ty: TypeType<'a>,
    target: FieldTarget<'a>,
}

impl<'a> Continuation<'a> {
    pub(crate) fn new(ty: TypeType<'a>, target: FieldTarget<'a>) -> Self {
        Self { ty, target }
    }

    /// Completes `resolved` as a value of the field, possibly scheduling
    /// deferred values again.
    pub(crate) fn apply(
        self,
        executor: &Executor<'a>,
        resolved: Resolved,
    ) -> FieldResult<Output<'a>> {
        executor.complete(self.ty, self.target, resolved)
    }
}

/// A queued deferred value along with what to do with it
///
/// The result tree points to it until it is drained, and its output replaces
/// it when the tree is turned into a value.
pub(crate) struct DeferredResult<'a> {
    pending: RefCell<Option<(Box<dyn DeferredResolver>, Continuation<'a>)>>,
    result: RefCell<Option<Output<'a>>>,
    location: SourcePosition,
}

impl<'a> DeferredResult<'a> {
    fn run(&self, executor: &Executor<'a>) {
        let Some((resolver, continuation)) = self.pending.borrow_mut().take() else {
            return;
        };
        let output = resolver
            .resolve()
            .and_then(|resolved| continuation.apply(executor, resolved))
            .unwrap_or_else(|e| {
                executor.push_error_at(e, self.location);
                Output::default()
            });
        *self.result.borrow_mut() = Some(output);
    }

    /// Takes the completed output out, if the value was ever produced.
    pub(crate) fn take(&self) -> Option<Output<'a>> {
        self.result.borrow_mut().take()
    }
}

/// Deferred values waiting to be resolved
///
/// Values of leaf fields are queued apart, so they're only resolved once all
/// composite values have been, and with them every leaf field below them
/// has been queued as well.
#[derive(Default)]
pub(crate) struct DeferredQueues<'a> {
    complex: RefCell<VecDeque<Rc<DeferredResult<'a>>>>,
    leaf: RefCell<VecDeque<Rc<DeferredResult<'a>>>>,
}

impl<'a> DeferredQueues<'a> {
    fn next(&self) -> Option<Rc<DeferredResult<'a>>> {
        let next = self.complex.borrow_mut().pop_front();
        next.or_else(|| self.leaf.borrow_mut().pop_front())
    }
}

impl<'a> Executor<'a> {
    /// Queues a deferred value of a field, returning the placeholder standing
    /// for it in the result tree.
    pub(crate) fn defer(
        &self,
        resolver: Box<dyn DeferredResolver>,
        continuation: Continuation<'a>,
    ) -> Output<'a> {
        let is_leaf = continuation.ty.innermost_concrete().is_leaf();
        let location = continuation.target.location();
        tracing::trace!(
            field = continuation.target.name(),
            %location,
            queue = if is_leaf { "leaf" } else { "complex" },
            "deferring field",
        );

        let entry = Rc::new(DeferredResult {
            pending: RefCell::new(Some((resolver, continuation))),
            result: RefCell::new(None),
            location,
        });
        let queue = if is_leaf {
            &self.deferred.leaf
        } else {
            &self.deferred.complex
        };
        queue.borrow_mut().push_back(Rc::clone(&entry));

        Output::Deferred(entry)
    }

    /// Resolves queued deferred values until both queues are empty.
    ///
    /// Composite values go first, including the ones queued while draining.
    /// A failing value is recorded and becomes null.
    pub(crate) fn drain(&self) {
        let mut resolved = 0usize;
        while let Some(entry) = self.deferred.next() {
            entry.run(self);
            resolved += 1;
        }
        tracing::debug!(resolved, "drained deferred values");
    }
}
