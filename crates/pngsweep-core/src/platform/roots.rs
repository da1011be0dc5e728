/// Full-system scan roots.
///
/// On Windows every local drive (fixed, removable, optical) is a candidate
/// root; network drives are excluded. Everywhere else the only root is `/`.
use std::path::PathBuf;

/// A filesystem root that can be scanned as a "full system" target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemRoot {
    /// Mount point, e.g. `C:\` or `/`.
    pub path: PathBuf,
    /// Short display name, e.g. `C: (Windows)`.
    pub label: String,
    /// Filesystem and drive kind when known, e.g. `NTFS · Fixed`.
    pub detail: String,
}

/// Enumerate scannable roots.
#[cfg(not(windows))]
pub fn system_roots() -> Vec<SystemRoot> {
    vec![SystemRoot {
        path: PathBuf::from("/"),
        label: "/".to_string(),
        detail: "Entire filesystem".to_string(),
    }]
}

/// Enumerate scannable roots.
///
/// Returns an empty vec if the Windows API call fails (should not happen
/// on any supported Windows version).
#[cfg(windows)]
pub fn system_roots() -> Vec<SystemRoot> {
    use std::ffi::OsString;
    use std::os::windows::ffi::OsStringExt;
    use windows::Win32::Storage::FileSystem::{
        GetDriveTypeW, GetLogicalDriveStringsW, GetVolumeInformationW,
    };

    // Drive type constants from the Windows API.
    const DRIVE_REMOVABLE_VAL: u32 = 2;
    const DRIVE_FIXED_VAL: u32 = 3;
    const DRIVE_REMOTE_VAL: u32 = 4;
    const DRIVE_CDROM_VAL: u32 = 5;

    let mut roots = Vec::new();

    // GetLogicalDriveStringsW returns null-separated drive root strings.
    let mut buffer = [0u16; 256];
    let len = unsafe { GetLogicalDriveStringsW(Some(&mut buffer)) };
    if len == 0 {
        tracing::warn!("GetLogicalDriveStringsW returned 0");
        return roots;
    }

    let full = OsString::from_wide(&buffer[..len as usize]);
    let full_str = full.to_string_lossy();

    for root in full_str.split('\0').filter(|s| !s.is_empty()) {
        let root_wide: Vec<u16> = root.encode_utf16().chain(std::iter::once(0)).collect();
        let root_pcwstr = windows::core::PCWSTR(root_wide.as_ptr());

        let kind = match unsafe { GetDriveTypeW(root_pcwstr) } {
            DRIVE_FIXED_VAL => "Fixed",
            DRIVE_REMOVABLE_VAL => "Removable",
            DRIVE_CDROM_VAL => "CD-ROM",
            // Network shares are never scanned as part of a full-system run.
            DRIVE_REMOTE_VAL => continue,
            _ => "Unknown",
        };

        let mut label_buf = [0u16; 256];
        let mut fs_buf = [0u16; 256];
        let has_volume_info = unsafe {
            GetVolumeInformationW(
                root_pcwstr,
                Some(&mut label_buf),
                None,
                None,
                None,
                Some(&mut fs_buf),
            )
            .is_ok()
        };

        let until_nul = |buf: &[u16]| {
            String::from_utf16_lossy(&buf[..buf.iter().position(|&c| c == 0).unwrap_or(0)])
        };
        let (volume_label, filesystem) = if has_volume_info {
            (until_nul(&label_buf), until_nul(&fs_buf))
        } else {
            (String::new(), String::new())
        };

        let letter = root.trim_end_matches('\\').to_string();
        let label = if volume_label.is_empty() {
            letter
        } else {
            format!("{letter} ({volume_label})")
        };
        let detail = if filesystem.is_empty() {
            kind.to_string()
        } else {
            format!("{filesystem} · {kind}")
        };

        roots.push(SystemRoot {
            path: PathBuf::from(root),
            label,
            detail,
        });
    }

    roots
}
