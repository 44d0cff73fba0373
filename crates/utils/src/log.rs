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

//! Logging extensions for results.

use std::fmt::Display;

use tracing::Level;

/// Logs errors without changing the error type.
pub trait LogOnError {
    /// Log an error at `ERROR` level if there is one, prefixed with `context`
    fn log_on_error<C>(self, context: C) -> Self
    where
        C: Display;

    /// Log an error at the given level if there is one, prefixed with `context`
    fn log_on_error_level<C>(self, level: Level, context: C) -> Self
    where
        C: Display;
}

impl<T, E> LogOnError for Result<T, E>
where
    E: Display,
{
    fn log_on_error<C>(self, context: C) -> Self
    where
        C: Display,
    {
        self.log_on_error_level(Level::ERROR, context)
    }

    fn log_on_error_level<C>(self, level: Level, context: C) -> Self
    where
        C: Display,
    {
        if let Err(error) = &self {
            log_at_level(level, &format!("{context}: {error}"));
        }
        self
    }
}

fn log_at_level(level: Level, s: &str) {
    match level {
        Level::TRACE => tracing::trace!("{s}"),
        Level::DEBUG => tracing::debug!("{s}"),
        Level::INFO => tracing::info!("{s}"),
        Level::WARN => tracing::warn!("{s}"),
        Level::ERROR => tracing::error!("{s}"),
    }
}
