//! Actions backed by caller-supplied functions.

use async_trait::async_trait;
use dandori_core::{
    Action, ActionError, ActionId, BoxError, ExecutionContext, Outcome, ParamsMeta, Result,
};
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

type BlockingFn<P> = dyn Fn(&P, &ExecutionContext) -> Result<Outcome> + Send + Sync;
type AsyncFn<P> = dyn Fn(P, ExecutionContext) -> BoxFuture<Result<Outcome>> + Send + Sync;

enum Handler<P> {
    Blocking(Arc<BlockingFn<P>>),
    Async(Arc<AsyncFn<P>>),
}

impl<P> Clone for Handler<P> {
    fn clone(&self) -> Self {
        match self {
            Handler::Blocking(f) => Handler::Blocking(Arc::clone(f)),
            Handler::Async(f) => Handler::Async(Arc::clone(f)),
        }
    }
}

/// An action whose effect is a caller-supplied function.
///
/// Whatever the function returns as an error becomes the action's failure
/// unchanged: it displays the same, and the original error can be recovered
/// with [`ActionError::handler_error`] and `downcast_ref`.
///
/// # Examples
///
/// ```
/// use dandori::prelude::*;
/// use serde::Serialize;
///
/// #[derive(Debug, Clone, Serialize)]
/// struct Banner {
///     title: String,
/// }
///
/// # #[tokio::main]
/// # async fn main() {
/// let action = HandlerAction::from_fn(
///     "banner",
///     Banner { title: "setup".into() },
///     |params: &Banner, _ctx: &ExecutionContext| Ok::<_, ActionError>(format!("== {} ==", params.title)),
/// );
///
/// let outcome = action.execute(&ExecutionContext::new(".")).await.unwrap();
/// assert_eq!(outcome, Outcome::from("== setup =="));
/// # }
/// ```
pub struct HandlerAction<P> {
    id: ActionId,
    params: P,
    params_meta: Option<ParamsMeta>,
    handler: Handler<P>,
}

impl<P> HandlerAction<P>
where
    P: Clone + Send + Sync + 'static,
{
    /// Creates an action running an async handler.
    ///
    /// The handler receives owned clones of the parameters and the context so
    /// that the returned future can outlive the call.
    pub fn new<F, Fut, R, E>(id: impl Into<ActionId>, params: P, handler: F) -> Self
    where
        F: Fn(P, ExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<R, E>> + Send + 'static,
        R: Into<Outcome> + Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        let handler = move |params: P, ctx: ExecutionContext| -> BoxFuture<Result<Outcome>> {
            let future = handler(params, ctx);
            Box::pin(async move {
                future
                    .await
                    .map(Into::into)
                    .map_err(ActionError::from_handler)
            })
        };

        Self {
            id: id.into(),
            params,
            params_meta: None,
            handler: Handler::Async(Arc::new(handler)),
        }
    }

    /// Creates an action running a synchronous handler.
    pub fn from_fn<F, R, E>(id: impl Into<ActionId>, params: P, handler: F) -> Self
    where
        F: Fn(&P, &ExecutionContext) -> std::result::Result<R, E> + Send + Sync + 'static,
        R: Into<Outcome>,
        E: Into<BoxError>,
    {
        let handler = move |params: &P, ctx: &ExecutionContext| -> Result<Outcome> {
            handler(params, ctx)
                .map(Into::into)
                .map_err(ActionError::from_handler)
        };

        Self {
            id: id.into(),
            params,
            params_meta: None,
            handler: Handler::Blocking(Arc::new(handler)),
        }
    }
}

impl<P> HandlerAction<P> {
    /// Attach descriptive parameter metadata
    pub fn with_params_meta(mut self, meta: ParamsMeta) -> Self {
        self.params_meta = Some(meta);
        self
    }

    /// Returns a new action sharing this handler, bound to other parameters.
    pub fn bind(&self, id: impl Into<ActionId>, params: P) -> Self {
        Self {
            id: id.into(),
            params,
            params_meta: self.params_meta.clone(),
            handler: self.handler.clone(),
        }
    }

    pub fn id(&self) -> &ActionId {
        &self.id
    }

    pub fn params(&self) -> &P {
        &self.params
    }
}

impl<P: fmt::Debug> fmt::Debug for HandlerAction<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.handler {
            Handler::Blocking(_) => "blocking",
            Handler::Async(_) => "async",
        };
        f.debug_struct("HandlerAction")
            .field("id", &self.id)
            .field("params", &self.params)
            .field("handler", &kind)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<P> Action for HandlerAction<P>
where
    P: Serialize + Clone + fmt::Debug + Send + Sync + 'static,
{
    type Params = P;

    fn id(&self) -> &ActionId {
        &self.id
    }

    fn params(&self) -> &P {
        &self.params
    }

    fn params_meta(&self) -> Option<&ParamsMeta> {
        self.params_meta.as_ref()
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<Outcome> {
        match &self.handler {
            Handler::Blocking(handler) => handler(&self.params, ctx),
            Handler::Async(handler) => handler(self.params.clone(), ctx.clone()).await,
        }
    }
}
