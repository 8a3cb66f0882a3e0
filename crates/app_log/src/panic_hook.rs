//! Panic hook for crash reporting

use backtrace::Backtrace;
use chrono::Local;
use std::any::Any;
use std::panic::PanicHookInfo;
use std::path::PathBuf;

/// Install a hook that logs the panic and writes a crash report into `crash_dir`
pub fn init_panic_hook(crash_dir: PathBuf) {
    std::panic::set_hook(Box::new(move |info| {
        let report = crash_report(info);

        eprintln!("{}", report);
        tracing::error!("{}", report);

        let file_name = format!("folio_crash_{}.txt", Local::now().format("%Y%m%d_%H%M%S"));
        let dump_path = crash_dir.join(file_name);
        if let Err(e) = std::fs::create_dir_all(&crash_dir).and_then(|_| std::fs::write(&dump_path, &report)) {
            eprintln!("Failed to write crash report: {}", e);
        } else {
            eprintln!("Crash report written to {}", dump_path.display());
        }
    }));
    tracing::debug!("Panic hook initialized");
}

fn crash_report(info: &PanicHookInfo) -> String {
    let thread = std::thread::current();
    let location = info
        .location()
        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
        .unwrap_or_else(|| "<unknown>".to_string());

    format!(
        "=== folio panic ===\n\
         Timestamp: {}\n\
         Thread: {}\n\
         Location: {}\n\
         Message: {}\n\n\
         Stack Trace:\n{:?}",
        Local::now().to_rfc3339(),
        thread.name().unwrap_or("<unnamed>"),
        location,
        panic_message(info.payload()),
        Backtrace::new()
    )
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string payload>".to_string()
    }
}
