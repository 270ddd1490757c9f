//! Sliding-window rate limiting for outbound calls

mod limiter;

#[cfg(test)]
mod tests;

pub use limiter::RateLimiter;
