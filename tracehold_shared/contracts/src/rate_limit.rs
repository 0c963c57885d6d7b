use std::{future::Future, net::IpAddr};

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait RateLimitService: Send + Sync + 'static {
    /// Try to take one request slot for `client_ip`.
    ///
    /// Returns `false` if the client has exhausted its quota. Requests whose
    /// address is unknown share a single quota.
    fn acquire(&self, client_ip: Option<IpAddr>) -> impl Future<Output = bool> + Send;
}

#[cfg(feature = "mock")]
impl MockRateLimitService {
    pub fn with_acquire(mut self, client_ip: Option<IpAddr>, result: bool) -> Self {
        self.expect_acquire()
            .once()
            .with(mockall::predicate::eq(client_ip))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
