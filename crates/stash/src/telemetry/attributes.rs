// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#[cfg(any(feature = "metrics", test))]
pub(crate) const STASH_NAME: &str = "stash.name";

#[cfg(test)]
pub(crate) const STASH_KEY: &str = "stash.key";

#[cfg(test)]
pub(crate) const STASH_EVENT_NAME: &str = "stash.event";

#[cfg(any(feature = "metrics", test))]
pub(crate) const STASH_OPERATION_NAME: &str = "stash.operation";

#[cfg(any(feature = "metrics", test))]
pub(crate) const STASH_ACTIVITY_NAME: &str = "stash.activity";

#[cfg(test)]
pub(crate) const STASH_DURATION_NAME: &str = "stash.duration_ns";
