use futures_util::future::BoxFuture;
use std::task::{Context, Poll};
use tower::Service;

/// A boxed, cloneable, `Sync` service with a boxed future
pub(crate) struct BoxCloneService<Req, Res, Err> {
    inner: Box<dyn CloneService<Req, Res, Err> + Send + Sync>,
}

impl<Req, Res, Err> BoxCloneService<Req, Res, Err> {
    pub fn new<S>(service: S) -> Self
    where
        S: Service<Req, Response = Res, Error = Err> + Clone + Send + Sync + 'static,
        S::Future: Send + 'static,
    {
        Self {
            inner: Box::new(service),
        }
    }
}

impl<Req, Res, Err> Clone for BoxCloneService<Req, Res, Err> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_box(),
        }
    }
}

impl<Req, Res, Err> Service<Req> for BoxCloneService<Req, Res, Err> {
    type Response = Res;
    type Error = Err;
    type Future = BoxFuture<'static, Result<Res, Err>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        self.inner.call(req)
    }
}

trait CloneService<Req, Res, Err>: Send + Sync {
    fn clone_box(&self) -> Box<dyn CloneService<Req, Res, Err> + Send + Sync>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Err>>;

    fn call(&mut self, req: Req) -> BoxFuture<'static, Result<Res, Err>>;
}

impl<S, Req, Res, Err> CloneService<Req, Res, Err> for S
where
    S: Service<Req, Response = Res, Error = Err> + Clone + Send + Sync + 'static,
    S::Future: Send + 'static,
{
    fn clone_box(&self) -> Box<dyn CloneService<Req, Res, Err> + Send + Sync> {
        Box::new(self.clone())
    }

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Err>> {
        Service::poll_ready(self, cx)
    }

    fn call(&mut self, req: Req) -> BoxFuture<'static, Result<Res, Err>> {
        Box::pin(Service::call(self, req))
    }
}
