//! Reboot-deferred deletion.
//!
//! Last resort for paths locked by a running process: register them with
//! the OS to be removed on the next restart. Fire-and-forget; the engine
//! only records whether the registration itself succeeded.

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RebootScheduleError {
    #[error("MoveFileExW failed with OS error {0}")]
    Os(i32),
    #[error("delete-on-reboot is only available on Windows")]
    Unsupported,
}

/// Register `path` for deletion on the next reboot via
/// `MoveFileExW(path, NULL, MOVEFILE_DELAY_UNTIL_REBOOT)`.
#[cfg(windows)]
pub fn schedule_delete_on_reboot(path: &Path) -> Result<(), RebootScheduleError> {
    use std::os::windows::ffi::OsStrExt;
    use windows_sys::Win32::Storage::FileSystem::{MoveFileExW, MOVEFILE_DELAY_UNTIL_REBOOT};

    let wide: Vec<u16> = path
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();

    let ok = unsafe { MoveFileExW(wide.as_ptr(), std::ptr::null(), MOVEFILE_DELAY_UNTIL_REBOOT) };
    if ok != 0 {
        Ok(())
    } else {
        Err(RebootScheduleError::Os(
            std::io::Error::last_os_error().raw_os_error().unwrap_or(0),
        ))
    }
}

#[cfg(not(windows))]
pub fn schedule_delete_on_reboot(_path: &Path) -> Result<(), RebootScheduleError> {
    Err(RebootScheduleError::Unsupported)
}
