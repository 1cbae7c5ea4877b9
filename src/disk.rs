//! On-disk size accounting.
//!
//! The filesystem stores file data in whole allocation units ("clusters"), so
//! the bytes a file really occupies are its reported on-disk size rounded up
//! to a cluster boundary. Files small enough to live inside filesystem
//! metadata occupy no data clusters at all and are reported as zero.
//!
//! Platform specifics live behind the [`DiskUsage`] trait so the walker stays
//! platform-neutral; [`LogicalDisk`] is the portable fallback where the OS
//! offers no on-disk size metadata.

use std::io;
use std::path::Path;

use serde::Serialize;
use tracing::warn;

/// Files with reported size equal to their logical size and below this many
/// bytes are treated as metadata-resident: they occupy zero data clusters.
pub const RESIDENT_MAX: u64 = 600;

/// Logical and allocated byte sizes for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SizeInfo {
    /// The file length as reported by ordinary metadata.
    pub logical: u64,
    /// Bytes actually occupied on disk, cluster-rounded (0 for resident files).
    pub allocated: u64,
}

/// Platform capability for on-disk size queries.
pub trait DiskUsage {
    /// Allocation unit size of the volume holding `path`, in bytes.
    fn allocation_unit(&self, path: &Path) -> io::Result<u64>;

    /// The filesystem's reported on-disk (compressed/real) size of a file,
    /// before cluster rounding. `logical` is passed so implementations that
    /// have no better answer can return it unchanged.
    fn reported_size(&self, path: &Path, logical: u64) -> io::Result<u64>;
}

/// Round a reported size up to the cluster boundary, applying the
/// resident-file override first.
pub fn allocated_size(reported: u64, logical: u64, cluster: u64) -> u64 {
    if reported == logical && logical < RESIDENT_MAX {
        return 0;
    }
    if cluster <= 1 {
        return reported;
    }
    reported.div_ceil(cluster) * cluster
}

/// Compute [`SizeInfo`] for one file.
///
/// A failing on-disk size query is logged and falls back to the logical size,
/// so one odd file never aborts a scan. Only the logical-size query itself can
/// return an error.
pub fn size_info(path: &Path, cluster: u64, disk: &dyn DiskUsage) -> io::Result<SizeInfo> {
    let logical = path.metadata()?.len();
    let reported = match disk.reported_size(path, logical) {
        Ok(reported) => reported,
        Err(err) => {
            warn!("on-disk size query failed for {}: {err}", path.display());
            logical
        }
    };
    Ok(SizeInfo {
        logical,
        allocated: allocated_size(reported, logical, cluster),
    })
}

/// Disk usage backed by the running platform's filesystem metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformDisk;

impl DiskUsage for PlatformDisk {
    fn allocation_unit(&self, path: &Path) -> io::Result<u64> {
        imp::allocation_unit(path)
    }

    fn reported_size(&self, path: &Path, logical: u64) -> io::Result<u64> {
        imp::reported_size(path, logical)
    }
}

/// Portable fallback: no on-disk metadata, every file occupies exactly its
/// logical size (resident override still applies).
#[derive(Debug, Clone, Copy, Default)]
pub struct LogicalDisk;

impl DiskUsage for LogicalDisk {
    fn allocation_unit(&self, _path: &Path) -> io::Result<u64> {
        Ok(1)
    }

    fn reported_size(&self, _path: &Path, logical: u64) -> io::Result<u64> {
        Ok(logical)
    }
}

#[cfg(windows)]
mod imp {
    use std::io;
    use std::path::{Component, Path, PathBuf};

    use windows::Win32::Storage::FileSystem::{GetCompressedFileSizeW, GetDiskFreeSpaceW};
    use windows::core::HSTRING;

    /// The drive root of `path`, e.g. `C:\` for `C:\Users\me\file.txt`.
    fn volume_root(path: &Path) -> PathBuf {
        match path.components().next() {
            Some(Component::Prefix(prefix)) => {
                let mut root = PathBuf::from(prefix.as_os_str());
                root.push("\\");
                root
            }
            _ => PathBuf::from("\\"),
        }
    }

    pub fn allocation_unit(path: &Path) -> io::Result<u64> {
        let root = volume_root(path);
        let mut sectors_per_cluster = 0u32;
        let mut bytes_per_sector = 0u32;
        unsafe {
            GetDiskFreeSpaceW(
                &HSTRING::from(root.as_os_str()),
                Some(&mut sectors_per_cluster),
                Some(&mut bytes_per_sector),
                None,
                None,
            )
        }
        .map_err(io::Error::other)?;
        Ok(u64::from(sectors_per_cluster) * u64::from(bytes_per_sector))
    }

    pub fn reported_size(path: &Path, _logical: u64) -> io::Result<u64> {
        let mut high = 0u32;
        let low =
            unsafe { GetCompressedFileSizeW(&HSTRING::from(path.as_os_str()), Some(&mut high)) };
        if low == u32::MAX {
            let err = windows::core::Error::from_win32();
            if err.code().is_err() {
                return Err(io::Error::other(err));
            }
        }
        Ok((u64::from(high) << 32) | u64::from(low))
    }
}

#[cfg(unix)]
mod imp {
    use std::io;
    use std::os::unix::fs::MetadataExt;
    use std::path::Path;

    pub fn allocation_unit(path: &Path) -> io::Result<u64> {
        // st_blksize: the filesystem's preferred block size, which is the
        // allocation granularity on the common local filesystems.
        Ok(path.metadata()?.blksize())
    }

    pub fn reported_size(path: &Path, _logical: u64) -> io::Result<u64> {
        // st_blocks counts 512-byte units regardless of the block size.
        Ok(path.metadata()?.blocks() * 512)
    }
}

#[cfg(not(any(windows, unix)))]
mod imp {
    use std::io;
    use std::path::Path;

    pub fn allocation_unit(_path: &Path) -> io::Result<u64> {
        Ok(1)
    }

    pub fn reported_size(_path: &Path, logical: u64) -> io::Result<u64> {
        Ok(logical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resident_file_occupies_nothing() {
        // Reported == logical and tiny: stored in metadata, zero clusters.
        assert_eq!(allocated_size(10, 10, 4096), 0);
        assert_eq!(allocated_size(599, 599, 4096), 0);
    }

    #[test]
    fn test_resident_override_needs_equal_sizes() {
        // A 10-byte file whose on-disk size differs is not resident.
        assert_eq!(allocated_size(4096, 10, 4096), 4096);
    }

    #[test]
    fn test_threshold_boundary() {
        assert_eq!(allocated_size(600, 600, 4096), 4096);
    }

    #[test]
    fn test_cluster_round_up() {
        assert_eq!(allocated_size(10_000, 10_000, 4096), 12_288);
        assert_eq!(allocated_size(4096, 4096, 4096), 4096);
        assert_eq!(allocated_size(4097, 4097, 4096), 8192);
    }

    #[test]
    fn test_allocated_is_cluster_multiple_or_zero() {
        let cluster = 4096;
        for reported in [0u64, 1, 599, 600, 601, 4095, 4096, 4097, 123_456] {
            let allocated = allocated_size(reported, reported, cluster);
            assert!(
                allocated == 0 || allocated % cluster == 0,
                "reported {reported} gave allocated {allocated}"
            );
        }
    }

    #[test]
    fn test_unit_cluster_is_identity_above_threshold() {
        assert_eq!(allocated_size(10_000, 10_000, 1), 10_000);
        assert_eq!(allocated_size(100, 100, 1), 0); // resident still wins
    }

    #[test]
    fn test_logical_disk_reports_logical() {
        let disk = LogicalDisk;
        assert_eq!(disk.allocation_unit(Path::new("/")).unwrap(), 1);
        assert_eq!(disk.reported_size(Path::new("/x"), 42).unwrap(), 42);
    }
}
