//! Panic hook that releases FUSE mounts.
//!
//! A panicking process would otherwise leave its mountpoint attached to a
//! dead daemon, and every access to it would fail with `ENOTCONN` until
//! someone runs `fusermount -u` by hand. The hook unmounts every registered
//! mountpoint, then chains to the previously installed hook.
//!
//! Panic hooks must be `'static`, so mountpoints live in a global registry.

use std::any::Any;
use std::io::Write;
use std::panic::{self, PanicHookInfo};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Mutex, OnceLock};

static MOUNT_REGISTRY: OnceLock<Mutex<Vec<PathBuf>>> = OnceLock::new();

/// Install the hook. Calls after the first are ignored.
pub fn init() {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    if INSTALLED.set(()).is_err() {
        return;
    }

    let _ = MOUNT_REGISTRY.get_or_init(|| Mutex::new(Vec::new()));

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info: &PanicHookInfo<'_>| {
        handle_panic(info);
        original_hook(info);
    }));
}

/// Track `path` for cleanup until [`unregister_mount`] is called.
pub fn register_mount(path: PathBuf) {
    if let Some(registry) = MOUNT_REGISTRY.get() {
        if let Ok(mut guard) = registry.lock() {
            guard.push(path);
        }
    }
}

/// Stop tracking `path` after a normal unmount.
pub fn unregister_mount(path: &Path) {
    if let Some(registry) = MOUNT_REGISTRY.get() {
        if let Ok(mut guard) = registry.lock() {
            guard.retain(|p| p != path);
        }
    }
}

/// Mountpoints currently registered.
pub fn registered_mounts() -> Vec<PathBuf> {
    MOUNT_REGISTRY
        .get()
        .and_then(|registry| registry.lock().ok().map(|guard| guard.clone()))
        .unwrap_or_default()
}

/// Text of a panic payload caught with `catch_unwind`.
pub fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn handle_panic(info: &PanicHookInfo<'_>) {
    // Logging may be what panicked; write to stderr directly.
    let mut stderr = std::io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "shrinkfs panicked");
    if let Some(location) = info.location() {
        let _ = writeln!(
            stderr,
            "  at {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        );
    }

    let mounts = registered_mounts();
    for mount_point in &mounts {
        let _ = write!(stderr, "  unmounting {}... ", mount_point.display());
        let _ = writeln!(stderr, "{}", unmount(mount_point));
    }

    let _ = stderr.flush();
}

/// Try `fusermount -u`, then `fusermount3 -u`, then a lazy unmount.
fn unmount(mount_point: &Path) -> &'static str {
    let attempts: [(&str, &str, &'static str); 3] = [
        ("fusermount", "-u", "ok"),
        ("fusermount3", "-u", "ok (fusermount3)"),
        ("fusermount", "-uz", "ok (lazy)"),
    ];

    for (program, flag, outcome) in attempts {
        let result = Command::new(program).arg(flag).arg(mount_point).output();
        if matches!(result, Ok(output) if output.status.success()) {
            return outcome;
        }
    }
    "failed"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_registry_register_unregister() {
        init();
        init();

        let path1 = PathBuf::from("/tmp/shrinkfs_test_mount_1");
        let path2 = PathBuf::from("/tmp/shrinkfs_test_mount_2");

        register_mount(path1.clone());
        register_mount(path2.clone());

        let mounts = registered_mounts();
        assert!(mounts.contains(&path1));
        assert!(mounts.contains(&path2));

        unregister_mount(&path1);

        let mounts = registered_mounts();
        assert!(!mounts.contains(&path1));
        assert!(mounts.contains(&path2));

        unregister_mount(&path2);
    }

    #[test]
    fn test_payload_message() {
        let literal = std::panic::catch_unwind(|| panic!("static text")).unwrap_err();
        assert_eq!(payload_message(&*literal), "static text");

        let formatted = std::panic::catch_unwind(|| panic!("code {}", 7)).unwrap_err();
        assert_eq!(payload_message(&*formatted), "code 7");

        let other = std::panic::catch_unwind(|| std::panic::panic_any(42u8)).unwrap_err();
        assert_eq!(payload_message(&*other), "unknown panic payload");
    }

    #[test]
    fn test_unmount_of_unmounted_path_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        assert_eq!(unmount(dir.path()), "failed");
    }
}
