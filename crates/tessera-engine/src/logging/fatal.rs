/// Logs `message` at error level, flushes the logger and aborts the process.
///
/// Reserved for memory exhaustion the runtime cannot recover from: the GPU
/// running out of memory while acquiring a frame. Everything else, including
/// a missing adapter or a failed decode, is reported through `Result`.
pub fn fatal(message: impl std::fmt::Display) -> ! {
    log::error!("fatal: {message}");
    log::logger().flush();
    std::process::abort()
}
