//! Administrator detection and relaunch.
//!
//! Elevation is requested lazily, only when the user opts into a
//! category that needs it (all-users temp, service temps, Windows Temp,
//! Prefetch); cleaning the current user's own data never triggers UAC.

use anyhow::Result;

/// True when the current process runs as a member of the built-in
/// Administrators group.
#[cfg(windows)]
pub fn is_admin() -> bool {
    use windows_sys::Win32::Security::{
        CheckTokenMembership, CreateWellKnownSid, WinBuiltinAdministratorsSid,
        SECURITY_MAX_SID_SIZE,
    };

    unsafe {
        let mut sid = [0u8; SECURITY_MAX_SID_SIZE as usize];
        let mut sid_size: u32 = SECURITY_MAX_SID_SIZE as u32;
        let sid_ptr = sid.as_mut_ptr() as *mut core::ffi::c_void;
        if CreateWellKnownSid(
            WinBuiltinAdministratorsSid,
            std::ptr::null_mut(),
            sid_ptr,
            &mut sid_size,
        ) == 0
        {
            return false;
        }
        let mut is_member: i32 = 0;
        if CheckTokenMembership(std::ptr::null_mut(), sid_ptr as _, &mut is_member) == 0 {
            return false;
        }
        is_member != 0
    }
}

#[cfg(not(windows))]
pub fn is_admin() -> bool {
    false
}

/// Relaunch the current executable elevated via the "runas" verb.
///
/// The caller must have appended the internal `--elevated` marker to
/// `args`; the relaunched process sees it and will not relaunch again.
#[cfg(windows)]
pub fn relaunch_as_admin(args: &[String]) -> Result<()> {
    use anyhow::bail;
    use std::os::windows::ffi::OsStrExt;
    use windows_sys::Win32::UI::Shell::ShellExecuteW;

    fn to_wide(s: &std::ffi::OsStr) -> Vec<u16> {
        s.encode_wide().chain(std::iter::once(0)).collect()
    }

    let exe = std::env::current_exe()?;
    let params: String = args
        .iter()
        .map(|arg| format!("\"{}\"", arg))
        .collect::<Vec<_>>()
        .join(" ");

    let verb = to_wide(std::ffi::OsStr::new("runas"));
    let file = to_wide(exe.as_os_str());
    let params_w = to_wide(std::ffi::OsStr::new(&params));

    const SW_SHOWNORMAL: i32 = 1;
    let instance = unsafe {
        ShellExecuteW(
            std::ptr::null_mut(),
            verb.as_ptr(),
            file.as_ptr(),
            params_w.as_ptr(),
            std::ptr::null(),
            SW_SHOWNORMAL,
        )
    };

    // ShellExecute reports success with a value greater than 32.
    if instance as usize <= 32 {
        bail!("Elevation request was refused or failed");
    }
    Ok(())
}

#[cfg(not(windows))]
pub fn relaunch_as_admin(_args: &[String]) -> Result<()> {
    anyhow::bail!("Elevation is only available on Windows")
}
