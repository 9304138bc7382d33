// Copyright 2025 Pacer Contributors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Yield repeatedly so every ready task reaches its next await point.
///
/// On a paused current-thread runtime this lets spawned callers, timer tasks,
/// and watchers settle without advancing the clock, keeping intermediate
/// assertions deterministic.
pub async fn drain_tasks() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
