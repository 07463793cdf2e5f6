// Memory lifecycle events (allocate, release, map, unmap) are only traced on
// debug builds with the `debug` feature.
#[cfg(all(debug_assertions, feature = "debug"))]
macro_rules! tracing {
    ($( $args:expr ),*) => { tracing::trace!(target: "rawbuf::memory", $( $args ),* ); }
}

#[cfg(not(all(debug_assertions, feature = "debug")))]
macro_rules! tracing {
    ($( $args:expr ),*) => {};
}
