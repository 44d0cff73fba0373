// This file is part of Sponsor.
//
// Sponsor is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// Sponsor is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with Sponsor.
// If not, see https://www.gnu.org/licenses/.

//! Bounded retries with exponential backoff and jitter.

use std::{fmt::Display, future::Future, time::Duration};

use rand::Rng;
use tokio::time;
use tracing::warn;

/// Settings for [`with_retries`].
#[derive(Clone, Copy, Debug)]
pub struct RetryOpts {
    /// Maximum number of attempts to make, including the first one.
    pub max_attempts: u64,
    /// The first retry is immediately after the first failure (plus jitter).
    /// The next retry after that will wait this long.
    pub min_nonzero_wait: Duration,
    /// The maximum amount of time to wait between retries. Takes precedence
    /// over `min_nonzero_wait` when smaller.
    pub max_wait: Duration,
    /// The maximum amount of jitter to add to the wait time.
    pub max_jitter: Duration,
}

impl Default for RetryOpts {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_nonzero_wait: Duration::from_millis(250),
            max_wait: Duration::from_secs(2),
            max_jitter: Duration::from_millis(100),
        }
    }
}

/// Runs `func` until it succeeds, `should_retry` rejects its error, or
/// `opts.max_attempts` attempts were made. Returns the last error in the
/// latter two cases.
pub async fn with_retries<Func, Fut, Out, Err, Pred>(
    description: &str,
    func: Func,
    should_retry: Pred,
    opts: RetryOpts,
) -> Result<Out, Err>
where
    Func: Fn() -> Fut,
    Fut: Future<Output = Result<Out, Err>>,
    Err: Display,
    Pred: Fn(&Err) -> bool,
{
    let mut next_wait = Duration::ZERO;
    let mut attempt_number = 1;
    loop {
        match func().await {
            Ok(out) => return Ok(out),
            Err(error) if attempt_number < opts.max_attempts && should_retry(&error) => {
                warn!("Failed to {description} (attempt {attempt_number}): {error}");
            }
            Err(error) => return Err(error),
        }
        // Grab a new rng each iteration because we can't hold it across awaits.
        let jitter = if opts.max_jitter.is_zero() {
            Duration::ZERO
        } else {
            rand::thread_rng().gen_range(Duration::ZERO..opts.max_jitter)
        };
        time::sleep(next_wait + jitter).await;
        next_wait = (2 * next_wait)
            .max(opts.min_nonzero_wait)
            .min(opts.max_wait);
        attempt_number += 1;
    }
}
